use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
}

/// Liveness probe. Never touches the model.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { ok: true })
}
