use std::fmt;
use std::time::Duration;
use thiserror::Error;

use crate::domain::model::Domain;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Artifact download failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Failed to load {domain} model from '{artifact}': {reason}")]
    ModelLoadError {
        domain: Domain,
        artifact: String,
        reason: String,
        /// The store could not be reached; a restart may succeed.
        transient: bool,
    },

    #[error("Server error: {message}")]
    ServerError { message: String },
}

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    ModelLoading,
    Server,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl AppError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AppError::ConfigError { .. }
            | AppError::ConfigValidationError { .. }
            | AppError::InvalidConfigValueError { .. }
            | AppError::MissingConfigError { .. } => ErrorCategory::Configuration,
            AppError::ModelLoadError { .. }
            | AppError::HttpError(_)
            | AppError::SerializationError(_) => ErrorCategory::ModelLoading,
            AppError::IoError(_) | AppError::ServerError { .. } => ErrorCategory::Server,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            AppError::ModelLoadError {
                transient: true, ..
            } => ErrorSeverity::Medium,
            AppError::HttpError(_) if self.is_transient() => ErrorSeverity::Medium,
            _ => match self.category() {
                ErrorCategory::Configuration => ErrorSeverity::High,
                ErrorCategory::ModelLoading | ErrorCategory::Server => ErrorSeverity::Critical,
            },
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            AppError::ConfigError { .. } | AppError::ConfigValidationError { .. } => {
                "Check the TOML syntax and that every ${VAR} placeholder is set"
            }
            AppError::InvalidConfigValueError { .. } => {
                "Fix the reported value on the command line or in the config file"
            }
            AppError::MissingConfigError { .. } => "Provide the missing setting",
            AppError::ModelLoadError {
                transient: true, ..
            } => "Check that the model store is reachable and restart",
            AppError::ModelLoadError { .. } | AppError::SerializationError(_) => {
                "Make sure all three model artifacts exist and are valid JSON exports"
            }
            AppError::HttpError(_) => "Check that the model store URL is reachable",
            AppError::IoError(_) => "Check file permissions and that the paths exist",
            AppError::ServerError { .. } => "Check that the listen address is free",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::ModelLoading => format!("Models could not be loaded: {}", self),
            ErrorCategory::Server => format!("Server failure: {}", self),
        }
    }

    pub fn model_load(domain: Domain, artifact: impl Into<String>, reason: impl fmt::Display) -> Self {
        AppError::ModelLoadError {
            domain,
            artifact: artifact.into(),
            reason: reason.to_string(),
            transient: false,
        }
    }

    /// Wraps a failed artifact read, keeping whether the store was only unreachable.
    pub fn model_fetch(domain: Domain, artifact: impl Into<String>, source: AppError) -> Self {
        AppError::ModelLoadError {
            domain,
            artifact: artifact.into(),
            transient: source.is_transient(),
            reason: source.to_string(),
        }
    }

    /// Connection failures, timeouts and 5xx answers from the model store.
    pub fn is_transient(&self) -> bool {
        match self {
            AppError::HttpError(e) => {
                e.is_connect() || e.is_timeout() || e.status().is_some_and(|s| s.is_server_error())
            }
            AppError::ModelLoadError { transient, .. } => *transient,
            _ => false,
        }
    }
}

/// Why a single request field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueKind {
    Missing,
    NotNumeric,
    NotAnObject,
    InvalidJson,
}

impl IssueKind {
    /// Machine-readable tag used in error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            IssueKind::Missing => "missing",
            IssueKind::NotNumeric => "float_parsing",
            IssueKind::NotAnObject => "model_attributes_type",
            IssueKind::InvalidJson => "json_invalid",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldIssue {
    /// `None` when the problem concerns the body as a whole.
    pub field: Option<&'static str>,
    pub kind: IssueKind,
    pub message: String,
}

/// Client-side input rejection. Carries every offending field.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Validation failed: {}", summarize(.issues))]
pub struct ValidationError {
    pub issues: Vec<FieldIssue>,
}

fn summarize(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(|issue| match issue.field {
            Some(field) => format!("{} ({})", field, issue.message),
            None => issue.message.clone(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

impl ValidationError {
    pub fn body(kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            issues: vec![FieldIssue {
                field: None,
                kind,
                message: message.into(),
            }],
        }
    }

    pub fn fields(&self) -> Vec<&'static str> {
        self.issues.iter().filter_map(|issue| issue.field).collect()
    }

    pub fn mentions(&self, field: &str) -> bool {
        self.issues.iter().any(|issue| issue.field == Some(field))
    }
}

/// Server-side failure to produce a label for valid input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictionError {
    #[error("{0}")]
    Model(String),

    #[error("model returned {0}, expected 0 or 1")]
    MalformedOutput(f64),

    #[error("expected {expected} features, got {actual}")]
    FeatureCount { expected: usize, actual: usize },

    #[error("model did not answer within {0:?}")]
    Timeout(Duration),

    #[error("prediction task aborted: {0}")]
    TaskFailed(String),
}

/// Outcome of a failed diagnosis request: either the caller's input was bad
/// or the model could not answer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DiagnosisError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Prediction failed: {0}")]
    Prediction(#[from] PredictionError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_lists_every_field() {
        let err = ValidationError {
            issues: vec![
                FieldIssue {
                    field: Some("Glucose"),
                    kind: IssueKind::Missing,
                    message: "Field required".to_string(),
                },
                FieldIssue {
                    field: Some("Age"),
                    kind: IssueKind::NotNumeric,
                    message: "Input should be a valid number".to_string(),
                },
            ],
        };

        assert_eq!(
            err.to_string(),
            "Validation failed: Glucose (Field required), Age (Input should be a valid number)"
        );
        assert_eq!(err.fields(), vec!["Glucose", "Age"]);
        assert!(err.mentions("Age"));
        assert!(!err.mentions("BMI"));
    }

    #[test]
    fn test_severity_follows_category() {
        let load = AppError::model_load(Domain::Heart, "heart_disease_model.json", "not found");
        assert_eq!(load.category(), ErrorCategory::ModelLoading);
        assert_eq!(load.severity(), ErrorSeverity::Critical);
        assert!(load.to_string().contains("heart"));

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let fetch = AppError::model_fetch(Domain::Diabetes, "diabetes_model.json", io.into());
        assert!(!fetch.is_transient());
        assert_eq!(fetch.severity(), ErrorSeverity::Critical);

        let config = AppError::MissingConfigError {
            field: "models.dir".to_string(),
        };
        assert_eq!(config.severity(), ErrorSeverity::High);

        let predict: DiagnosisError = PredictionError::MalformedOutput(0.5).into();
        assert_eq!(
            predict.to_string(),
            "Prediction failed: model returned 0.5, expected 0 or 1"
        );
    }
}
