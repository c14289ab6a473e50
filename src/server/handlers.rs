use crate::core::{Domain, PredictionResponse};
use crate::domain::schema::InputSchema;
use crate::server::response::ApiError;
use crate::server::AppState;
use crate::utils::error::DiagnosisError;
use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

/// `POST /predict/{domain}`; the schema type picks the domain.
pub async fn predict<S: InputSchema>(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<PredictionResponse>, ApiError> {
    let domain = S::DOMAIN;

    match state.pipeline.diagnose::<S>(&body).await {
        Ok(message) => {
            tracing::info!(%domain, "Prediction served");
            Ok(Json(PredictionResponse {
                prediction: message.to_string(),
            }))
        }
        Err(DiagnosisError::Validation(err)) => {
            tracing::warn!(%domain, fields = ?err.fields(), "Rejected request: {}", err);
            Err(DiagnosisError::Validation(err).into())
        }
        Err(err) => {
            tracing::error!(%domain, "{}", err);
            Err(err.into())
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub models: Vec<Domain>,
    pub started_at: DateTime<Utc>,
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        models: state.pipeline.registry().domains().to_vec(),
        started_at: state.started_at,
    })
}
