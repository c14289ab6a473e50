use crate::core::{ConfigProvider, Domain};
use crate::utils::error::{AppError, Result};
use crate::utils::logger::LogFormat;
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Service configuration. Every section is optional; missing values fall
/// back to the defaults below.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub server: ServerConfig,
    pub models: ModelsConfig,
    pub inference: InferenceConfig,
    pub logging: LoggingConfig,
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelsConfig {
    /// Directory holding the artifacts. Ignored when `url` is set.
    pub dir: String,
    pub url: Option<String>,
    pub diabetes: String,
    pub heart: String,
    pub parkinsons: String,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            dir: "./saved_models".to_string(),
            url: None,
            diabetes: "diabetes_model.json".to_string(),
            heart: "heart_disease_model.json".to_string(),
            parkinsons: "parkinsons_model.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    pub predict_timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: LogFormat,
    pub verbose: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

pub const MAX_PREDICT_TIMEOUT_MS: u64 = 600_000;

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| AppError::ConfigError {
            message: format!("cannot read {}: {}", path.as_ref().display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| AppError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| AppError::ConfigError {
            message: format!("placeholder pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("server.host", &self.server.host)?;
        validation::validate_range("server.port", self.server.port, 1, u16::MAX)?;

        match &self.models.url {
            Some(url) => validation::validate_url("models.url", url)?,
            None => validation::validate_path("models.dir", &self.models.dir)?,
        }
        validation::validate_artifact_name("models.diabetes", &self.models.diabetes)?;
        validation::validate_artifact_name("models.heart", &self.models.heart)?;
        validation::validate_artifact_name("models.parkinsons", &self.models.parkinsons)?;

        if let Some(timeout) = self.inference.predict_timeout_ms {
            validation::validate_range(
                "inference.predict_timeout_ms",
                timeout,
                1,
                MAX_PREDICT_TIMEOUT_MS,
            )?;
        }

        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    fn models_dir(&self) -> &str {
        &self.models.dir
    }

    fn models_url(&self) -> Option<&str> {
        self.models.url.as_deref()
    }

    fn artifact_name(&self, domain: Domain) -> &str {
        match domain {
            Domain::Diabetes => &self.models.diabetes,
            Domain::Heart => &self.models.heart,
            Domain::Parkinsons => &self.models.parkinsons,
        }
    }

    fn predict_timeout(&self) -> Option<Duration> {
        self.inference.predict_timeout_ms.map(Duration::from_millis)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
