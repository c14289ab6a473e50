//! Typed request records for the three prediction endpoints.
//!
//! Each record lists its fields in the exact order the matching model was
//! trained with; `to_features` relies on that order.

use crate::domain::model::{Domain, FeatureVector};
use crate::utils::error::{FieldIssue, IssueKind, ValidationError};
use serde_json::{Map, Value};

pub type Payload = Map<String, Value>;

/// A fixed-shape, all-numeric request record bound to one domain.
pub trait InputSchema: Sized + Send + 'static {
    const DOMAIN: Domain;

    /// Field names in feature order.
    const FIELDS: &'static [&'static str];

    /// Builds the record from an untyped payload. Unknown keys are ignored.
    fn from_payload(payload: &Payload) -> Result<Self, ValidationError>;

    fn to_features(&self) -> FeatureVector;
}

/// Parses a request body into a JSON object.
pub fn parse_payload(body: &[u8]) -> Result<Payload, ValidationError> {
    let value: Value = serde_json::from_slice(body).map_err(|e| {
        ValidationError::body(IssueKind::InvalidJson, format!("JSON decode error: {}", e))
    })?;

    match value {
        Value::Object(map) => Ok(map),
        _ => Err(ValidationError::body(
            IssueKind::NotAnObject,
            "Input should be a valid dictionary or object",
        )),
    }
}

/// Reads one field as a finite `f64`, recording an issue when it cannot.
fn coerce_field(payload: &Payload, field: &'static str, issues: &mut Vec<FieldIssue>) -> Option<f64> {
    let value = match payload.get(field) {
        Some(value) => value,
        None => {
            issues.push(FieldIssue {
                field: Some(field),
                kind: IssueKind::Missing,
                message: "Field required".to_string(),
            });
            return None;
        }
    };

    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match parsed {
        Some(v) if v.is_finite() => Some(v),
        _ => {
            issues.push(FieldIssue {
                field: Some(field),
                kind: IssueKind::NotNumeric,
                message: "Input should be a valid number".to_string(),
            });
            None
        }
    }
}

macro_rules! input_record {
    ($(#[$meta:meta])* $name:ident, $domain:expr, [$($field:ident),+ $(,)?]) => {
        $(#[$meta])*
        #[allow(non_snake_case)]
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name {
            $(pub $field: f64,)+
        }

        #[allow(non_snake_case)]
        impl InputSchema for $name {
            const DOMAIN: Domain = $domain;
            const FIELDS: &'static [&'static str] = &[$(stringify!($field)),+];

            fn from_payload(payload: &Payload) -> Result<Self, ValidationError> {
                let mut issues = Vec::new();
                $(let $field = coerce_field(payload, stringify!($field), &mut issues);)+

                match ($($field,)+) {
                    ($(Some($field),)+) => Ok(Self { $($field),+ }),
                    _ => Err(ValidationError { issues }),
                }
            }

            fn to_features(&self) -> FeatureVector {
                FeatureVector::new(vec![$(self.$field),+])
            }
        }
    };
}

input_record!(
    /// Pima diabetes screening measurements.
    DiabetesInput,
    Domain::Diabetes,
    [
        Pregnancies,
        Glucose,
        BloodPressure,
        SkinThickness,
        Insulin,
        BMI,
        DiabetesPedigreeFunction,
        Age,
    ]
);

input_record!(
    /// Cleveland heart disease attributes.
    HeartDiseaseInput,
    Domain::Heart,
    [age, sex, cp, trestbps, chol, fbs, restecg, thalach, exang, oldpeak, slope, ca, thal]
);

input_record!(
    /// Voice measurements used for Parkinson's screening.
    ParkinsonsInput,
    Domain::Parkinsons,
    [
        fo,
        fhi,
        flo,
        Jitter_percent,
        Jitter_Abs,
        RAP,
        PPQ,
        DDP,
        Shimmer,
        Shimmer_dB,
        APQ3,
        APQ5,
        APQ,
        DDA,
        NHR,
        HNR,
        RPDE,
        DFA,
        spread1,
        spread2,
        D2,
        PPE,
    ]
);

/// Field names for a domain, in feature order.
pub fn fields_for(domain: Domain) -> &'static [&'static str] {
    match domain {
        Domain::Diabetes => DiabetesInput::FIELDS,
        Domain::Heart => HeartDiseaseInput::FIELDS,
        Domain::Parkinsons => ParkinsonsInput::FIELDS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> Payload {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {}", other),
        }
    }

    fn sequential(fields: &[&str]) -> Payload {
        fields
            .iter()
            .enumerate()
            .map(|(i, f)| (f.to_string(), json!(i as f64)))
            .collect()
    }

    #[test]
    fn test_field_counts() {
        assert_eq!(DiabetesInput::FIELDS.len(), 8);
        assert_eq!(HeartDiseaseInput::FIELDS.len(), 13);
        assert_eq!(ParkinsonsInput::FIELDS.len(), 22);
        assert_eq!(fields_for(Domain::Parkinsons)[21], "PPE");
    }

    #[test]
    fn test_features_follow_field_order() {
        for domain in Domain::ALL {
            let fields = fields_for(domain);
            let data = sequential(fields);
            let features = match domain {
                Domain::Diabetes => DiabetesInput::from_payload(&data).unwrap().to_features(),
                Domain::Heart => HeartDiseaseInput::from_payload(&data).unwrap().to_features(),
                Domain::Parkinsons => ParkinsonsInput::from_payload(&data).unwrap().to_features(),
            };

            assert_eq!(features.len(), fields.len());
            let expected: Vec<f64> = (0..fields.len()).map(|i| i as f64).collect();
            assert_eq!(features.as_slice(), expected.as_slice());
        }
    }

    #[test]
    fn test_diabetes_example_record() {
        let data = payload(json!({
            "Pregnancies": 6, "Glucose": 148, "BloodPressure": 72, "SkinThickness": 35,
            "Insulin": 0, "BMI": 33.6, "DiabetesPedigreeFunction": 0.627, "Age": 50
        }));

        let record = DiabetesInput::from_payload(&data).unwrap();
        assert_eq!(record.BMI, 33.6);
        assert_eq!(
            record.to_features().as_slice(),
            &[6.0, 148.0, 72.0, 35.0, 0.0, 33.6, 0.627, 50.0]
        );
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let mut data = sequential(DiabetesInput::FIELDS);
        data.insert("comment".to_string(), json!("walk-in"));
        data.insert("Extra".to_string(), json!([1, 2]));

        assert!(DiabetesInput::from_payload(&data).is_ok());
    }

    #[test]
    fn test_numeric_strings_are_coerced() {
        let mut data = sequential(HeartDiseaseInput::FIELDS);
        data.insert("chol".to_string(), json!(" 233.5 "));

        let record = HeartDiseaseInput::from_payload(&data).unwrap();
        assert_eq!(record.chol, 233.5);
    }

    #[test]
    fn test_reports_every_offending_field_in_order() {
        let mut data = sequential(ParkinsonsInput::FIELDS);
        data.remove("PPE");
        data.remove("fo");
        data.insert("HNR".to_string(), json!("loud"));
        data.insert("DFA".to_string(), json!(true));
        data.insert("D2".to_string(), Value::Null);

        let err = ParkinsonsInput::from_payload(&data).unwrap_err();
        assert_eq!(err.fields(), vec!["fo", "HNR", "DFA", "D2", "PPE"]);
        assert_eq!(err.issues[0].kind, IssueKind::Missing);
        assert_eq!(err.issues[1].kind, IssueKind::NotNumeric);
        assert_eq!(err.issues[4].kind, IssueKind::Missing);
    }

    #[test]
    fn test_non_finite_strings_rejected() {
        let mut data = sequential(DiabetesInput::FIELDS);
        data.insert("Insulin".to_string(), json!("NaN"));
        data.insert("Age".to_string(), json!("inf"));

        let err = DiabetesInput::from_payload(&data).unwrap_err();
        assert_eq!(err.fields(), vec!["Insulin", "Age"]);
    }

    #[test]
    fn test_parse_payload_rejects_non_objects() {
        let err = parse_payload(b"[1, 2, 3]").unwrap_err();
        assert_eq!(err.issues[0].kind, IssueKind::NotAnObject);
        assert_eq!(err.issues[0].field, None);

        let err = parse_payload(b"{\"Glucose\": ").unwrap_err();
        assert_eq!(err.issues[0].kind, IssueKind::InvalidJson);

        let map = parse_payload(br#"{"age": 63}"#).unwrap();
        assert_eq!(map.get("age"), Some(&json!(63)));
    }
}
