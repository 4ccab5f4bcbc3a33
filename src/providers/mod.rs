//! Generative model providers.
//!
//! The diagnosis handler only needs "given text and an image, return text".
//! [`VisionModel`] is that seam; Gemini is the production backend and the
//! mock backs the tests.

pub mod gemini;
pub mod mock;

use async_trait::async_trait;
use thiserror::Error;

/// Failure while talking to the external model.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    #[error("{0}")]
    NotConfigured(String),

    #[error("{0}")]
    NetworkError(String),

    #[error("Request to the model timed out")]
    Timeout,

    #[error("Model API returned {status}: {body}")]
    ApiError { status: u16, body: String },

    #[error("Rate limited by the model API")]
    RateLimited,

    #[error("blocked with reason {0}")]
    ContentFiltered(String),

    #[error("Model returned no text")]
    EmptyResponse,

    #[error("Failed to decode model response: {0}")]
    InvalidResponse(String),
}

impl ProviderError {
    /// Stable name of the failure, surfaced to clients as the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::NotConfigured(_) => "NotConfigured",
            ProviderError::NetworkError(_) => "NetworkError",
            ProviderError::Timeout => "Timeout",
            ProviderError::ApiError { .. } => "ApiError",
            ProviderError::RateLimited => "RateLimited",
            ProviderError::ContentFiltered(_) => "ContentFiltered",
            ProviderError::EmptyResponse => "EmptyResponse",
            ProviderError::InvalidResponse(_) => "InvalidResponse",
        }
    }
}

/// A multimodal model that answers a text prompt about one inline image.
#[async_trait]
pub trait VisionModel: Send + Sync {
    /// Send `prompt` together with `image` and return the model's raw text.
    async fn generate(
        &self,
        prompt: &str,
        image: &[u8],
        mime_type: &str,
    ) -> Result<String, ProviderError>;
}
