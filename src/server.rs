use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, info_span};

use crate::{
    analysis::{AnalysisResult, ShoeAnalyzer},
    data_uri::{DataUriError, ImagePayload},
    gemini::GenerativeModel,
    page::INDEX_HTML,
};

pub struct AppState<M> {
    pub analyzer: ShoeAnalyzer<M>,
    pub max_upload_bytes: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("failed to read upload: {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),

    #[error("file {index} is not a supported image: {source}")]
    InvalidImage {
        index: usize,
        #[source]
        source: DataUriError,
    },

    #[error("no images were uploaded")]
    NoImages,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            // Body-limit overruns surface here as 413.
            ApiError::Multipart(e) => e.status(),
            ApiError::InvalidImage { .. } | ApiError::NoImages => StatusCode::BAD_REQUEST,
        };
        tracing::warn!(error = %self, %status, "rejected upload");
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub images: Vec<String>,
}

pub fn router<M>(state: Arc<AppState<M>>) -> Router
where
    M: GenerativeModel + 'static,
{
    let trace_layer = TraceLayer::new_for_http().make_span_with(
        |request: &axum::extract::Request| {
            let uri = request.uri().to_string();
            info_span!("http_request", method = ?request.method(), uri)
        },
    );

    Router::new()
        .route("/", get(index))
        .route("/api/analyze", post(analyze::<M>))
        .route("/upload", post(upload_images::<M>))
        .layer(
            ServiceBuilder::new()
                .layer(trace_layer)
                .layer(CorsLayer::permissive())
                .layer(DefaultBodyLimit::max(state.max_upload_bytes)),
        )
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Analyses images the page already encoded as data URIs.
async fn analyze<M: GenerativeModel>(
    State(state): State<Arc<AppState<M>>>,
    Json(request): Json<AnalyzeRequest>,
) -> Json<AnalysisResult> {
    info!(images = request.images.len(), "analysis requested");
    Json(run_analysis(&state.analyzer, &request.images).await)
}

/// Analyses raw image files from a multipart form, in field order.
async fn upload_images<M: GenerativeModel>(
    State(state): State<Arc<AppState<M>>>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisResult>, ApiError> {
    let mut images = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        let data = field.bytes().await?;
        let payload = ImagePayload::from_bytes(&data).map_err(|source| ApiError::InvalidImage {
            index: images.len(),
            source,
        })?;
        images.push(payload.to_data_uri());
    }

    if images.is_empty() {
        return Err(ApiError::NoImages);
    }

    info!(images = images.len(), "upload received");
    Ok(Json(run_analysis(&state.analyzer, &images).await))
}

async fn run_analysis<M: GenerativeModel>(
    analyzer: &ShoeAnalyzer<M>,
    images: &[String],
) -> AnalysisResult {
    let result = analyzer.analyze(images).await;
    match result.assessment() {
        Some(assessment) => info!(
            model = %assessment.model_name,
            wear_score = assessment.wear_score,
            status = ?assessment.status,
            "analysis complete"
        ),
        None if !result.is_failed() => info!("analysis complete with an off-schema reply"),
        None => {}
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{tests::FakeModel, ANALYSIS_FAILED_MESSAGE};
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    const BOUNDARY: &str = "runai-boundary";
    const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

    fn app(model: FakeModel) -> Router {
        app_with_limit(model, 1024 * 1024)
    }

    fn app_with_limit(model: FakeModel, max_upload_bytes: usize) -> Router {
        router(Arc::new(AppState {
            analyzer: ShoeAnalyzer::new(model),
            max_upload_bytes,
        }))
    }

    fn multipart_body(files: &[&[u8]]) -> Vec<u8> {
        let mut body = Vec::new();
        for (i, file) in files.iter().enumerate() {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"shoe{i}.png\"\r\nContent-Type: image/png\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(file);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn json_request(body: Value) -> Request<Body> {
        Request::post("/api/analyze")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn multipart_request(files: &[&[u8]]) -> Request<Body> {
        Request::post("/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body(files)))
            .unwrap()
    }

    #[tokio::test]
    async fn test_index_serves_page() {
        let response = app(FakeModel::replying("{}"))
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let page = String::from_utf8_lossy(&bytes);
        assert!(page.contains("RunAI Check"));
        assert!(page.contains(r#"accept="image/*,.heic,.heif""#));
    }

    #[tokio::test]
    async fn test_analyze_returns_model_json() {
        let reply = r#"{"modelName":"Test Model","wearScore":50,"status":"Desgaste medio","analysis":"ok","recommendations":[]}"#;
        let (status, body) = send(
            app(FakeModel::replying(reply)),
            json_request(json!({ "images": ["data:image/jpeg;base64,sample"] })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::from_str::<Value>(reply).unwrap());
    }

    #[tokio::test]
    async fn test_analyze_failure_is_fixed_error_body() {
        let (status, body) = send(
            app(FakeModel::failing()),
            json_request(json!({ "images": ["data:image/jpeg;base64,ZZZ"] })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "error": ANALYSIS_FAILED_MESSAGE }));
    }

    #[tokio::test]
    async fn test_upload_analyzes_every_file() {
        let (status, body) = send(
            app(FakeModel::replying(r#"{"modelName":"X"}"#)),
            multipart_request(&[PNG_SIGNATURE, PNG_SIGNATURE]),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "modelName": "X" }));
    }

    #[tokio::test]
    async fn test_upload_rejects_non_image() {
        let (status, body) = send(
            app(FakeModel::replying("{}")),
            multipart_request(&[PNG_SIGNATURE, b"plain text"]),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().starts_with("file 1"));
    }

    #[tokio::test]
    async fn test_upload_over_body_limit_is_payload_too_large() {
        let large = [PNG_SIGNATURE, &[0u8; 4096][..]].concat();
        let (status, body) = send(
            app_with_limit(FakeModel::replying("{}"), 1024),
            multipart_request(&[large.as_slice()]),
        )
        .await;

        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_upload_rejects_empty_form() {
        let (status, body) = send(app(FakeModel::replying("{}")), multipart_request(&[])).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }
}
