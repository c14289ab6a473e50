use crate::domain::model::{Domain, FeatureVector};
use crate::utils::error::{PredictionError, Result};
use async_trait::async_trait;
use std::time::Duration;

/// An opaque binary classifier.
///
/// Implementations return the raw model output; callers resolve it to a
/// label and reject anything that is not exactly 0 or 1.
pub trait Predictor: Send + Sync {
    fn predict(&self, features: &FeatureVector) -> std::result::Result<f64, PredictionError>;

    /// Number of features the model was trained on, when known.
    fn expected_features(&self) -> Option<usize> {
        None
    }

    /// Feature names recorded in the artifact, when present.
    fn feature_names(&self) -> Option<&[String]> {
        None
    }
}

/// Where serialized model artifacts are read from.
#[async_trait]
pub trait ModelSource: Send + Sync {
    async fn read_artifact(&self, name: &str) -> Result<Vec<u8>>;

    /// Human-readable location, for logs and error messages.
    fn describe(&self, name: &str) -> String;
}

pub trait ConfigProvider: Send + Sync {
    fn bind_address(&self) -> String;
    fn models_dir(&self) -> &str;
    fn models_url(&self) -> Option<&str>;
    fn artifact_name(&self, domain: Domain) -> &str;
    fn predict_timeout(&self) -> Option<Duration>;
}
