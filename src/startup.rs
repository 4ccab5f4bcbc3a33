//! Router assembly and server lifecycle.

use crate::config::Settings;
use crate::handlers::{crop_check::crop_check, health::health_check};
use crate::providers::gemini::GeminiVisionModel;
use crate::providers::VisionModel;
use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared, read-only state handed to every request.
#[derive(Clone)]
pub struct AppState {
    pub model: Arc<dyn VisionModel>,
}

impl AppState {
    pub fn new(model: Arc<dyn VisionModel>) -> Self {
        Self { model }
    }
}

/// HTTP options that shape the router but not the handlers.
#[derive(Debug, Clone)]
pub struct RouterOptions {
    pub max_upload_bytes: usize,
    pub allowed_origins: Vec<String>,
}

impl RouterOptions {
    /// True when any origin may call the API.
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == "*")
    }
}

impl From<&Settings> for RouterOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            max_upload_bytes: settings.server.max_upload_bytes,
            allowed_origins: settings.server.allowed_origins.clone(),
        }
    }
}

pub fn build_router(state: AppState, options: &RouterOptions) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/crop-check", post(crop_check))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(options))
                .layer(DefaultBodyLimit::max(options.max_upload_bytes)),
        )
        .with_state(state)
}

fn cors_layer(options: &RouterOptions) -> CorsLayer {
    if options.allows_any_origin() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = options
        .allowed_origins
        .iter()
        .filter_map(|o| HeaderValue::from_str(o).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Build the Gemini client and serve until a shutdown signal arrives.
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let model = GeminiVisionModel::new(settings.gemini())?;
    tracing::info!(model = %model.model(), "Initialized Gemini vision provider");

    let state = AppState::new(Arc::new(model));
    let app = build_router(state, &RouterOptions::from(&settings));

    let address = settings.address();
    let listener = TcpListener::bind(&address).await.map_err(|e| {
        tracing::error!("Failed to bind {}: {}", address, e);
        e
    })?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
