use crate::providers::ProviderError;
use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Upstream(#[from] ProviderError),

    #[error("{0}")]
    Multipart(#[from] MultipartError),

    #[error("{0}")]
    InvalidUpload(String),
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}

impl AppError {
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Upstream(err) => err.kind(),
            AppError::Multipart(_) => "MultipartError",
            AppError::InvalidUpload(_) => "InvalidUpload",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Upstream(_) | AppError::Multipart(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InvalidUpload(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    /// `"<kind>: <message>"`, the body clients see.
    pub fn detail(&self) -> String {
        format!("{}: {}", self.kind(), self)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = self.detail();

        if status.is_server_error() {
            tracing::error!(kind = self.kind(), error = %self, "Request failed");
        } else {
            tracing::warn!(kind = self.kind(), error = %self, "Request rejected");
        }

        (status, Json(ErrorResponse { detail })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_errors_are_500_with_kind_and_message() {
        let err = AppError::from(ProviderError::NetworkError("connection refused".to_string()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.detail(), "NetworkError: connection refused");

        let err = AppError::from(ProviderError::RateLimited);
        assert_eq!(err.detail(), "RateLimited: Rate limited by the model API");
    }

    #[test]
    fn invalid_upload_is_422() {
        let err = AppError::InvalidUpload("missing required field `image`".to_string());
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.detail(), "InvalidUpload: missing required field `image`");
    }

    #[tokio::test]
    async fn response_body_carries_detail() {
        let response = AppError::from(ProviderError::Timeout).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["detail"], "Timeout: Request to the model timed out");
    }
}
