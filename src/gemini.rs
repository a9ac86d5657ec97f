//! Minimal client for the Gemini `generateContent` endpoint.

use std::future::Future;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{config::Config, data_uri::ImagePayload};

const JSON_MIME_TYPE: &str = "application/json";
const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, thiserror::Error)]
pub enum GeminiError {
    /// Carries no URL, so nothing request-specific reaches the logs.
    #[error("request to Gemini failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Gemini returned {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Gemini response contained no text")]
    EmptyResponse,
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

/// One piece of a prompt: free text or an inline image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text { text: text.into() }
    }
}

impl From<ImagePayload> for Part {
    fn from(image: ImagePayload) -> Self {
        Part::InlineData {
            inline_data: InlineData {
                mime_type: image.mime_type,
                data: image.data,
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    response_mime_type: String,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: ContentResponse,
}

#[derive(Debug, Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Debug, Deserialize)]
struct PartResponse {
    #[serde(default)]
    text: Option<String>,
}

impl GeminiResponse {
    fn into_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .and_then(|p| p.text)
    }
}

/// A multimodal model that answers an ordered list of parts with text.
pub trait GenerativeModel: Send + Sync {
    fn generate_content(
        &self,
        parts: Vec<Part>,
    ) -> impl Future<Output = Result<String, GeminiError>> + Send;
}

/// Gemini model configured for JSON responses.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    api_key: String,
    model_name: String,
    base_url: String,
    client: Client,
}

impl GeminiClient {
    pub fn new(
        api_key: impl Into<String>,
        model_name: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            model_name: model_name.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.api_key, &config.model, &config.api_base_url)
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url, self.model_name
        )
    }
}

impl GenerativeModel for GeminiClient {
    async fn generate_content(&self, parts: Vec<Part>) -> Result<String, GeminiError> {
        let request = GeminiRequest {
            contents: vec![Content { parts }],
            generation_config: GenerationConfig {
                response_mime_type: JSON_MIME_TYPE.to_string(),
            },
        };

        tracing::debug!(model = %self.model_name, "sending request to Gemini");

        let response = self
            .client
            .post(self.endpoint())
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| GeminiError::Transport(e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeminiError::Api { status, body });
        }

        let gemini_response: GeminiResponse = response
            .json()
            .await
            .map_err(|e| GeminiError::Transport(e.without_url()))?;
        gemini_response
            .into_text()
            .ok_or(GeminiError::EmptyResponse)
    }
}
