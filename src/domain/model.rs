use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the three disease-prediction contexts served by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Diabetes,
    Heart,
    Parkinsons,
}

impl Domain {
    pub const ALL: [Domain; 3] = [Domain::Diabetes, Domain::Heart, Domain::Parkinsons];

    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Diabetes => "diabetes",
            Domain::Heart => "heart",
            Domain::Parkinsons => "parkinsons",
        }
    }

    /// Diagnosis text for a label, fixed per domain.
    pub fn diagnosis(&self, label: PredictionLabel) -> &'static str {
        match (self, label) {
            (Domain::Diabetes, PredictionLabel::Positive) => "The person is diabetic",
            (Domain::Diabetes, PredictionLabel::Negative) => "The person is not diabetic",
            (Domain::Heart, PredictionLabel::Positive) => "The person is having heart disease",
            (Domain::Heart, PredictionLabel::Negative) => {
                "The person does not have any heart disease"
            }
            (Domain::Parkinsons, PredictionLabel::Positive) => {
                "The person has Parkinson's disease"
            }
            (Domain::Parkinsons, PredictionLabel::Negative) => {
                "The person does not have Parkinson's disease"
            }
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered model input. The order is the one the artifact was trained with.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector(Vec<f64>);

impl FeatureVector {
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredictionLabel {
    Negative,
    Positive,
}

impl PredictionLabel {
    /// Resolves a raw model output. Anything other than exactly 0 or 1 is rejected.
    pub fn from_raw(raw: f64) -> Option<Self> {
        if raw == 0.0 {
            Some(PredictionLabel::Negative)
        } else if raw == 1.0 {
            Some(PredictionLabel::Positive)
        } else {
            None
        }
    }

    pub fn as_u8(&self) -> u8 {
        match self {
            PredictionLabel::Negative => 0,
            PredictionLabel::Positive => 1,
        }
    }
}

/// Success envelope returned by every prediction endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub prediction: String,
}
