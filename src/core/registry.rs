use crate::adapters::linear_model::LinearModel;
use crate::adapters::model_source::{HttpModelSource, LocalModelSource};
use crate::domain::model::Domain;
use crate::domain::ports::{ConfigProvider, ModelSource, Predictor};
use crate::domain::schema::fields_for;
use crate::utils::error::{AppError, Result};
use std::sync::Arc;

/// The three loaded classifiers. Built once before the server starts and
/// shared read-only afterwards.
#[derive(Clone)]
pub struct ModelRegistry {
    diabetes: Arc<dyn Predictor>,
    heart: Arc<dyn Predictor>,
    parkinsons: Arc<dyn Predictor>,
}

impl std::fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelRegistry")
            .field("domains", &Domain::ALL)
            .finish()
    }
}

impl ModelRegistry {
    pub fn new(
        diabetes: Arc<dyn Predictor>,
        heart: Arc<dyn Predictor>,
        parkinsons: Arc<dyn Predictor>,
    ) -> Self {
        Self {
            diabetes,
            heart,
            parkinsons,
        }
    }

    /// Loads every artifact named by `config` from `source`.
    ///
    /// Fails on the first artifact that is missing, unparsable or does not
    /// match its domain's feature layout.
    pub async fn load(source: &dyn ModelSource, config: &dyn ConfigProvider) -> Result<Self> {
        let (diabetes, heart, parkinsons) = tokio::try_join!(
            load_one(source, Domain::Diabetes, config.artifact_name(Domain::Diabetes)),
            load_one(source, Domain::Heart, config.artifact_name(Domain::Heart)),
            load_one(source, Domain::Parkinsons, config.artifact_name(Domain::Parkinsons)),
        )?;

        Ok(Self::new(diabetes, heart, parkinsons))
    }

    /// Picks the artifact store from `config` (URL if set, else directory) and loads from it.
    pub async fn from_config(config: &dyn ConfigProvider) -> Result<Self> {
        match config.models_url() {
            Some(url) => {
                tracing::info!("Fetching models from {}", url);
                let source = HttpModelSource::new(url)?;
                Self::load(&source, config).await
            }
            None => {
                tracing::info!("Loading models from {}", config.models_dir());
                let source = LocalModelSource::new(config.models_dir());
                Self::load(&source, config).await
            }
        }
    }

    pub fn get(&self, domain: Domain) -> Arc<dyn Predictor> {
        match domain {
            Domain::Diabetes => Arc::clone(&self.diabetes),
            Domain::Heart => Arc::clone(&self.heart),
            Domain::Parkinsons => Arc::clone(&self.parkinsons),
        }
    }

    pub fn domains(&self) -> &'static [Domain] {
        &Domain::ALL
    }
}

async fn load_one(
    source: &dyn ModelSource,
    domain: Domain,
    artifact: &str,
) -> Result<Arc<dyn Predictor>> {
    let location = source.describe(artifact);
    tracing::debug!(%domain, "Loading model from {}", location);

    let bytes = source
        .read_artifact(artifact)
        .await
        .map_err(|e| AppError::model_fetch(domain, &location, e))?;
    let model =
        LinearModel::from_slice(&bytes).map_err(|e| AppError::model_load(domain, &location, e))?;
    check_compatibility(domain, &model).map_err(|e| AppError::model_load(domain, &location, e))?;

    tracing::info!(
        %domain,
        kind = ?model.kind,
        features = model.coefficients.len(),
        "Loaded model from {}",
        location
    );
    Ok(Arc::new(model))
}

/// Verifies a predictor against the domain's field layout.
///
/// Feature order can only be checked when the artifact records its feature
/// names; otherwise the order is trusted and a warning is logged.
pub fn check_compatibility(
    domain: Domain,
    predictor: &dyn Predictor,
) -> std::result::Result<(), String> {
    let fields = fields_for(domain);

    if let Some(expected) = predictor.expected_features() {
        if expected != fields.len() {
            return Err(format!(
                "model expects {} features but the {} schema has {}",
                expected,
                domain,
                fields.len()
            ));
        }
    }

    match predictor.feature_names() {
        Some(names) => {
            if let Some((i, (got, want))) = names
                .iter()
                .zip(fields.iter())
                .enumerate()
                .find(|(_, (got, want))| got.as_str() != **want)
            {
                return Err(format!(
                    "feature {} is '{}' in the artifact but '{}' in the {} schema",
                    i, got, want, domain
                ));
            }
        }
        None => tracing::warn!(
            %domain,
            "Artifact does not record feature names; assuming schema order"
        ),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::linear_model::ModelKind;

    fn model(n: usize, names: Option<Vec<String>>) -> LinearModel {
        LinearModel {
            kind: ModelKind::LinearSvm,
            feature_names: names,
            scaler: None,
            coefficients: vec![0.1; n],
            intercept: 0.0,
            threshold: None,
        }
    }

    #[test]
    fn test_compatible_when_counts_match() {
        assert!(check_compatibility(Domain::Diabetes, &model(8, None)).is_ok());
        assert!(check_compatibility(Domain::Heart, &model(13, None)).is_ok());
        assert!(check_compatibility(Domain::Parkinsons, &model(22, None)).is_ok());
    }

    #[test]
    fn test_rejects_wrong_feature_count() {
        let err = check_compatibility(Domain::Heart, &model(8, None)).unwrap_err();
        assert!(err.contains("expects 8 features"));
    }

    #[test]
    fn test_checks_declared_feature_order() {
        let mut names: Vec<String> = fields_for(Domain::Diabetes)
            .iter()
            .map(|f| f.to_string())
            .collect();
        assert!(check_compatibility(Domain::Diabetes, &model(8, Some(names.clone()))).is_ok());

        names.swap(0, 1);
        let err = check_compatibility(Domain::Diabetes, &model(8, Some(names))).unwrap_err();
        assert!(err.contains("feature 0 is 'Glucose'"));
    }
}
