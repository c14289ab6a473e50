// Adapters layer: concrete predictors and artifact stores behind the domain ports.

pub mod linear_model;
pub mod model_source;

pub use linear_model::{LinearModel, ModelKind, Scaler};
pub use model_source::{HttpModelSource, LocalModelSource};
