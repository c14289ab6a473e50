pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod server;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::TomlConfig;
pub use core::{DiagnosisPipeline, ModelRegistry};
pub use utils::error::{AppError, DiagnosisError, PredictionError, Result, ValidationError};
