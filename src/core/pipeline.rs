use crate::core::registry::ModelRegistry;
use crate::domain::model::{Domain, FeatureVector, PredictionLabel};
use crate::domain::schema::{parse_payload, InputSchema};
use crate::utils::error::{DiagnosisError, PredictionError};
use std::sync::Arc;
use std::time::Duration;

/// Runs one request through validate -> assemble -> predict -> translate.
///
/// Each step either advances or aborts the request; nothing is retried and no
/// partial result is ever returned.
#[derive(Debug, Clone)]
pub struct DiagnosisPipeline {
    registry: Arc<ModelRegistry>,
    predict_timeout: Option<Duration>,
}

impl DiagnosisPipeline {
    pub fn new(registry: Arc<ModelRegistry>, predict_timeout: Option<Duration>) -> Self {
        Self {
            registry,
            predict_timeout,
        }
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    /// Diagnoses a raw request body for the domain of `S`.
    pub async fn diagnose<S: InputSchema>(&self, body: &[u8]) -> Result<&'static str, DiagnosisError> {
        let domain = S::DOMAIN;

        let payload = parse_payload(body)?;
        let record = S::from_payload(&payload)?;
        tracing::debug!(%domain, "Request validated");

        let features = record.to_features();
        tracing::debug!(%domain, features = features.len(), "Features assembled");

        let label = self.invoke(domain, features).await?;
        tracing::debug!(%domain, label = label.as_u8(), "Prediction received");

        Ok(domain.diagnosis(label))
    }

    /// Calls the domain's predictor off the async workers and resolves its
    /// output to a label.
    pub async fn invoke(
        &self,
        domain: Domain,
        features: FeatureVector,
    ) -> Result<PredictionLabel, PredictionError> {
        let predictor = self.registry.get(domain);
        let task = tokio::task::spawn_blocking(move || predictor.predict(&features));

        let joined = match self.predict_timeout {
            Some(limit) => tokio::time::timeout(limit, task)
                .await
                .map_err(|_| PredictionError::Timeout(limit))?,
            None => task.await,
        };

        let raw = joined.map_err(|e| PredictionError::TaskFailed(e.to_string()))??;
        PredictionLabel::from_raw(raw).ok_or(PredictionError::MalformedOutput(raw))
    }
}
