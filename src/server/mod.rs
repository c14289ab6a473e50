//! HTTP surface: routing, CORS and the serve loop.

pub mod handlers;
pub mod response;

use crate::core::{ConfigProvider, DiagnosisPipeline, ModelRegistry};
use crate::domain::schema::{DiabetesInput, HeartDiseaseInput, ParkinsonsInput};
use crate::utils::error::{AppError, Result};
use axum::routing::{get, post};
use axum::Router;
use chrono::{DateTime, Utc};
use std::future::Future;
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared, read-only state handed to every request.
#[derive(Debug)]
pub struct AppState {
    pub pipeline: DiagnosisPipeline,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(pipeline: DiagnosisPipeline) -> Self {
        Self {
            pipeline,
            started_at: Utc::now(),
        }
    }
}

/// Any origin, any method, any header, with credentials.
///
/// A literal `*` is not allowed together with credentials, so the request's
/// own origin, method and headers are echoed back instead.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/predict/diabetes", post(handlers::predict::<DiabetesInput>))
        .route("/predict/heart", post(handlers::predict::<HeartDiseaseInput>))
        .route("/predict/parkinsons", post(handlers::predict::<ParkinsonsInput>))
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .with_state(state)
}

/// Binds the listener and serves until `shutdown` resolves.
///
/// Takes an already loaded registry, so a process whose models failed to
/// load never opens a socket.
pub async fn serve<F>(config: &dyn ConfigProvider, registry: ModelRegistry, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let pipeline = DiagnosisPipeline::new(Arc::new(registry), config.predict_timeout());
    let app = router(Arc::new(AppState::new(pipeline)));

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .map_err(|e| AppError::ServerError {
            message: format!("cannot bind {}: {}", address, e),
        })?;
    tracing::info!("Listening on http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| AppError::ServerError {
            message: e.to_string(),
        })
}

/// Resolves on Ctrl-C or, on Unix, SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
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

    tracing::info!("Shutdown signal received, draining connections");
}
