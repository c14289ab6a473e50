use crate::utils::error::{DiagnosisError, ValidationError};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// One entry of a 422 body, shaped like FastAPI's validation errors.
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub loc: Vec<String>,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

#[derive(Debug, Serialize)]
struct ValidationBody {
    detail: Vec<ErrorDetail>,
}

#[derive(Debug, Serialize)]
struct MessageBody {
    detail: String,
}

impl From<&ValidationError> for ValidationBody {
    fn from(err: &ValidationError) -> Self {
        let detail = err
            .issues
            .iter()
            .map(|issue| {
                let mut loc = vec!["body".to_string()];
                if let Some(field) = issue.field {
                    loc.push(field.to_string());
                }
                ErrorDetail {
                    loc,
                    msg: issue.message.clone(),
                    kind: issue.kind.code(),
                }
            })
            .collect();
        Self { detail }
    }
}

/// HTTP face of a failed diagnosis.
#[derive(Debug)]
pub struct ApiError(pub DiagnosisError);

impl From<DiagnosisError> for ApiError {
    fn from(err: DiagnosisError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self.0 {
            DiagnosisError::Validation(err) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ValidationBody::from(err)),
            )
                .into_response(),
            DiagnosisError::Prediction(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(MessageBody {
                    detail: self.0.to_string(),
                }),
            )
                .into_response(),
        }
    }
}
