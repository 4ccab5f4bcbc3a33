//! Leaf diagnosis: prompt, model call and reply repair.

pub mod prompt;
pub mod repair;

use crate::providers::{ProviderError, VisionModel};
use serde::{Deserialize, Serialize};

/// MIME type assumed when the upload does not declare one.
pub const DEFAULT_MIME_TYPE: &str = "image/jpeg";

/// Crop label used when the client sends none.
pub const DEFAULT_CROP_TYPE: &str = "unknown";

/// Advice returned when the model supplies none.
pub const FALLBACK_ADVICE: [&str; 5] = [
    "Retake a clear photo: single leaf fills the frame in bright, even light.",
    "Remove the worst-affected leaves and sanitize your tools.",
    "Avoid overhead watering; water at soil level in the morning.",
    "Increase spacing and airflow between plants.",
    "Monitor neighboring plants for similar symptoms.",
];

pub const UNKNOWN_CONDITION_LABEL: &str = "Unknown leaf issue";
pub const UNKNOWN_CONDITION_CONFIDENCE: f64 = 0.4;

/// Top conditions below this confidence get [`LOW_CONFIDENCE_WARNING`].
pub const LOW_CONFIDENCE_THRESHOLD: f64 = 0.6;
pub const LOW_CONFIDENCE_WARNING: &str =
    "Low confidence result — retake 2–3 photos from different leaves in good lighting.";

/// One uploaded leaf photo awaiting diagnosis.
#[derive(Debug, Clone)]
pub struct DiagnosisRequest {
    pub image_bytes: Vec<u8>,
    pub mime_type: String,
    pub crop_type: String,
}

impl DiagnosisRequest {
    /// Build a request, falling back to the defaults for blank values.
    pub fn new(image_bytes: Vec<u8>, mime_type: Option<&str>, crop_type: Option<&str>) -> Self {
        Self {
            image_bytes,
            mime_type: non_blank(mime_type).unwrap_or(DEFAULT_MIME_TYPE).to_string(),
            crop_type: non_blank(crop_type).unwrap_or(DEFAULT_CROP_TYPE).to_string(),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// A candidate condition reported by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub label: String,
    pub confidence: f64,
}

impl Condition {
    pub fn unknown() -> Self {
        Self {
            label: UNKNOWN_CONDITION_LABEL.to_string(),
            confidence: UNKNOWN_CONDITION_CONFIDENCE,
        }
    }
}

/// Response body of `POST /api/crop-check`.
///
/// `top_conditions` and `advice` are never empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisResult {
    pub is_healthy: bool,
    pub top_conditions: Vec<Condition>,
    pub advice: Vec<String>,
}

/// Ask `model` about the leaf in `request` and repair whatever it answers.
///
/// Only failures of the model call itself are returned; a malformed reply is
/// replaced by fallback values.
pub async fn diagnose(
    model: &dyn VisionModel,
    request: &DiagnosisRequest,
) -> Result<DiagnosisResult, ProviderError> {
    let prompt = prompt::build_prompt(&request.crop_type);

    let reply = model
        .generate(&prompt, &request.image_bytes, &request.mime_type)
        .await?;

    Ok(repair::repair_reply(&reply))
}
