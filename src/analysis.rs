//! Shoe wear analysis: builds the Gemini request from uploaded images and
//! turns its reply into an [`AnalysisResult`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    data_uri::ImagePayload,
    gemini::{GeminiError, GenerativeModel, Part},
};

/// The only failure text a user ever sees.
pub const ANALYSIS_FAILED_MESSAGE: &str =
    "No pudimos analizar tus zapatillas. Intenta con una imagen más clara.";

pub const SHOE_ANALYSIS_PROMPT: &str = r#"
Eres un experto en biomecánica y zapatillas de running.
Analiza las imágenes proporcionadas (suela, talón, upper).

Responde estrictamente con este esquema JSON:
{
  "modelName": "Nombre del modelo identificado o 'Desconocido'",
  "wearScore": (número 0-100, donde 100 es inservible),
  "status": "Buen estado" | "Desgaste medio" | "Reemplazo urgente",
  "analysis": "Explicación detallada del estado de la espuma, suela y tela.",
  "recommendations": [
    { "name": "Modelo similar 1", "reason": "Por qué es similar" },
    { "name": "Modelo similar 2", "reason": "Por qué es similar" }
  ]
}
"#;

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Model(#[from] GeminiError),

    #[error("model reply is not valid JSON: {0}")]
    MalformedReply(#[from] serde_json::Error),
}

/// Outcome of one analysis, sent to the page as-is.
///
/// A success is the model's JSON untouched; a failure serializes to exactly
/// `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnalysisResult {
    Assessment(Value),
    Failed { error: String },
}

impl AnalysisResult {
    pub fn failed() -> Self {
        AnalysisResult::Failed {
            error: ANALYSIS_FAILED_MESSAGE.to_string(),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, AnalysisResult::Failed { .. })
    }

    /// Typed view of a successful reply, if it follows the prompt's schema.
    pub fn assessment(&self) -> Option<ShoeAssessment> {
        match self {
            AnalysisResult::Assessment(value) => serde_json::from_value(value.clone()).ok(),
            AnalysisResult::Failed { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WearStatus {
    #[serde(rename = "Buen estado")]
    Good,
    #[serde(rename = "Desgaste medio")]
    MediumWear,
    #[serde(rename = "Reemplazo urgente")]
    ReplaceNow,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub name: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoeAssessment {
    pub model_name: String,
    pub wear_score: u8,
    pub status: WearStatus,
    pub analysis: String,
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
}

pub struct ShoeAnalyzer<M> {
    model: M,
}

impl<M: GenerativeModel> ShoeAnalyzer<M> {
    pub fn new(model: M) -> Self {
        Self { model }
    }

    /// Analyses the given data-URI images in one model call.
    ///
    /// Never fails: every error is logged and replaced by
    /// [`ANALYSIS_FAILED_MESSAGE`].
    pub async fn analyze(&self, images: &[String]) -> AnalysisResult {
        match self.try_analyze(images).await {
            Ok(value) => AnalysisResult::Assessment(value),
            Err(e) => {
                tracing::error!(error = %e, images = images.len(), "shoe analysis failed");
                AnalysisResult::failed()
            }
        }
    }

    async fn try_analyze(&self, images: &[String]) -> Result<Value, AnalysisError> {
        let parts = build_parts(images);
        let text = self.model.generate_content(parts).await?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Prompt first, then one inline part per image in upload order.
pub fn build_parts(images: &[String]) -> Vec<Part> {
    std::iter::once(Part::text(SHOE_ANALYSIS_PROMPT))
        .chain(
            images
                .iter()
                .map(|img| Part::from(ImagePayload::parse_lenient(img))),
        )
        .collect()
}
