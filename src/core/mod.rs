pub mod pipeline;
pub mod registry;

pub use crate::domain::model::{Domain, FeatureVector, PredictionLabel, PredictionResponse};
pub use crate::domain::ports::{ConfigProvider, ModelSource, Predictor};
pub use crate::utils::error::Result;
pub use pipeline::DiagnosisPipeline;
pub use registry::ModelRegistry;
