//! JSON-exported linear classifiers.
//!
//! Covers the two model families the service ships with: logistic regression
//! and linear-kernel SVMs, each with optional standard scaling in front.

use crate::domain::model::FeatureVector;
use crate::domain::ports::Predictor;
use crate::utils::error::PredictionError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("artifact is not a valid model export: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    LogisticRegression,
    LinearSvm,
}

impl ModelKind {
    fn default_threshold(&self) -> f64 {
        match self {
            ModelKind::LogisticRegression => 0.5,
            ModelKind::LinearSvm => 0.0,
        }
    }
}

/// Per-feature standardisation: `(x - mean) / scale`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub kind: ModelKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scaler: Option<Scaler>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
}

impl LinearModel {
    /// Parses and checks an artifact.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ArtifactError> {
        let model: LinearModel = serde_json::from_slice(bytes)?;
        model.check()?;
        Ok(model)
    }

    fn check(&self) -> Result<(), ArtifactError> {
        let n = self.coefficients.len();
        if n == 0 {
            return Err(ArtifactError::Invalid("model has no coefficients".to_string()));
        }

        fn all_finite(values: &[f64]) -> bool {
            values.iter().all(|v| v.is_finite())
        }

        if !all_finite(&self.coefficients) || !self.intercept.is_finite() {
            return Err(ArtifactError::Invalid(
                "coefficients and intercept must be finite".to_string(),
            ));
        }
        if matches!(self.threshold, Some(t) if !t.is_finite()) {
            return Err(ArtifactError::Invalid("threshold must be finite".to_string()));
        }

        if let Some(names) = &self.feature_names {
            if names.len() != n {
                return Err(ArtifactError::Invalid(format!(
                    "{} feature names for {} coefficients",
                    names.len(),
                    n
                )));
            }
        }

        if let Some(scaler) = &self.scaler {
            if scaler.mean.len() != n || scaler.scale.len() != n {
                return Err(ArtifactError::Invalid(format!(
                    "scaler has {} means and {} scales for {} coefficients",
                    scaler.mean.len(),
                    scaler.scale.len(),
                    n
                )));
            }
            if !all_finite(&scaler.mean) || !all_finite(&scaler.scale) {
                return Err(ArtifactError::Invalid("scaler values must be finite".to_string()));
            }
            if scaler.scale.iter().any(|s| *s == 0.0) {
                return Err(ArtifactError::Invalid("scaler contains a zero scale".to_string()));
            }
        }

        Ok(())
    }

    pub fn threshold(&self) -> f64 {
        self.threshold.unwrap_or_else(|| self.kind.default_threshold())
    }

    /// Raw linear score `w·x + b` after scaling.
    pub fn decision_function(&self, x: &[f64]) -> f64 {
        let dot: f64 = match &self.scaler {
            Some(scaler) => x
                .iter()
                .zip(&self.coefficients)
                .zip(scaler.mean.iter().zip(&scaler.scale))
                .map(|((xi, wi), (mean, scale))| wi * (xi - mean) / scale)
                .sum(),
            None => x.iter().zip(&self.coefficients).map(|(xi, wi)| wi * xi).sum(),
        };
        dot + self.intercept
    }

    /// Score on the scale the threshold applies to.
    pub fn score(&self, x: &[f64]) -> f64 {
        let z = self.decision_function(x);
        match self.kind {
            ModelKind::LogisticRegression => 1.0 / (1.0 + (-z).exp()),
            ModelKind::LinearSvm => z,
        }
    }
}

impl Predictor for LinearModel {
    fn predict(&self, features: &FeatureVector) -> Result<f64, PredictionError> {
        if features.len() != self.coefficients.len() {
            return Err(PredictionError::FeatureCount {
                expected: self.coefficients.len(),
                actual: features.len(),
            });
        }

        let score = self.score(features.as_slice());
        if !score.is_finite() {
            return Err(PredictionError::Model(format!(
                "decision value is not finite ({})",
                score
            )));
        }

        Ok(if score >= self.threshold() { 1.0 } else { 0.0 })
    }

    fn expected_features(&self) -> Option<usize> {
        Some(self.coefficients.len())
    }

    fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn svm() -> LinearModel {
        LinearModel {
            kind: ModelKind::LinearSvm,
            feature_names: None,
            scaler: None,
            coefficients: vec![1.0, -2.0],
            intercept: 0.5,
            threshold: None,
        }
    }

    #[test]
    fn test_svm_uses_sign_of_decision() {
        let model = svm();
        // 1*3 - 2*1 + 0.5 = 1.5
        assert_eq!(model.predict(&FeatureVector::new(vec![3.0, 1.0])).unwrap(), 1.0);
        // 1*0 - 2*1 + 0.5 = -1.5
        assert_eq!(model.predict(&FeatureVector::new(vec![0.0, 1.0])).unwrap(), 0.0);
    }

    #[test]
    fn test_logistic_with_scaler() {
        let model = LinearModel::from_slice(
            json!({
                "kind": "logistic_regression",
                "scaler": {"mean": [100.0], "scale": [20.0]},
                "coefficients": [2.0],
                "intercept": 0.0
            })
            .to_string()
            .as_bytes(),
        )
        .unwrap();

        assert_eq!(model.threshold(), 0.5);
        // standardised 140 -> 2.0, z = 4.0, p ~ 0.98
        assert_eq!(model.predict(&FeatureVector::new(vec![140.0])).unwrap(), 1.0);
        // standardised 80 -> -1.0, z = -2.0, p ~ 0.12
        assert_eq!(model.predict(&FeatureVector::new(vec![80.0])).unwrap(), 0.0);
        assert!((model.score(&[100.0]) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_custom_threshold() {
        let mut model = svm();
        model.threshold = Some(2.0);
        assert_eq!(model.predict(&FeatureVector::new(vec![3.0, 1.0])).unwrap(), 0.0);
    }

    #[test]
    fn test_feature_count_mismatch() {
        let err = svm().predict(&FeatureVector::new(vec![1.0])).unwrap_err();
        assert_eq!(
            err,
            PredictionError::FeatureCount {
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn test_rejects_broken_artifacts() {
        assert!(matches!(
            LinearModel::from_slice(b"\x80\x04\x95pickle"),
            Err(ArtifactError::Parse(_))
        ));

        let cases = [
            json!({"kind": "linear_svm", "coefficients": [], "intercept": 0.0}),
            json!({"kind": "linear_svm", "coefficients": [1.0, 2.0], "intercept": 0.0,
                   "feature_names": ["a"]}),
            json!({"kind": "linear_svm", "coefficients": [1.0], "intercept": 0.0,
                   "scaler": {"mean": [0.0], "scale": [0.0]}}),
            json!({"kind": "linear_svm", "coefficients": [1.0], "intercept": 0.0,
                   "scaler": {"mean": [0.0, 1.0], "scale": [1.0]}}),
        ];
        for case in cases {
            let result = LinearModel::from_slice(case.to_string().as_bytes());
            assert!(
                matches!(result, Err(ArtifactError::Invalid(_))),
                "accepted {}",
                case
            );
        }

        let unknown_kind = json!({"kind": "random_forest", "coefficients": [1.0], "intercept": 0.0});
        assert!(LinearModel::from_slice(unknown_kind.to_string().as_bytes()).is_err());
    }
}
