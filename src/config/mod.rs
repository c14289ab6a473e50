pub mod toml_config;

pub use toml_config::TomlConfig;

#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::logger::LogFormat;
#[cfg(feature = "cli")]
use clap::Parser;

/// Command-line flags. Anything given here overrides the TOML file.
#[cfg(feature = "cli")]
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "health-assistant")]
#[command(about = "Serves diabetes, heart disease and Parkinson's predictions over HTTP")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(long)]
    pub host: Option<String>,

    #[arg(short, long)]
    pub port: Option<u16>,

    /// Directory containing the model artifacts
    #[arg(long)]
    pub models_dir: Option<String>,

    /// Base URL to download the model artifacts from (overrides --models-dir)
    #[arg(long)]
    pub models_url: Option<String>,

    /// Abort a prediction that takes longer than this
    #[arg(long)]
    pub predict_timeout_ms: Option<u64>,

    #[arg(long, value_enum)]
    pub log_format: Option<LogFormat>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log process CPU and memory usage")]
    pub monitor: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Loads the config file (if any) and applies the flags on top.
    pub fn resolve(&self) -> Result<TomlConfig> {
        let mut config = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };
        self.apply_overrides(&mut config);
        Ok(config)
    }

    fn apply_overrides(&self, config: &mut TomlConfig) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(dir) = &self.models_dir {
            config.models.dir = dir.clone();
            // an explicit directory wins over a store URL from the file
            if self.models_url.is_none() {
                config.models.url = None;
            }
        }
        if let Some(url) = &self.models_url {
            config.models.url = Some(url.clone());
        }
        if let Some(timeout) = self.predict_timeout_ms {
            config.inference.predict_timeout_ms = Some(timeout);
        }
        if let Some(format) = self.log_format {
            config.logging.format = format;
        }
        config.logging.verbose |= self.verbose;
        config.monitoring.enabled |= self.monitor;
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;
    use crate::core::ConfigProvider;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_without_flags() {
        let cli = CliConfig::parse_from(["health-assistant"]);
        let config = cli.resolve().unwrap();
        assert_eq!(config, TomlConfig::default());
    }

    #[test]
    fn test_flags_override_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[server]\nhost = \"127.0.0.1\"\nport = 7000\n\n[models]\ndir = \"/from/file\"\n")
            .unwrap();
        let path = temp_file.path().to_str().unwrap().to_string();

        let cli = CliConfig::parse_from([
            "health-assistant",
            "--config",
            path.as_str(),
            "--port",
            "9001",
            "--predict-timeout-ms",
            "250",
            "--log-format",
            "json",
            "--monitor",
        ]);
        let config = cli.resolve().unwrap();

        assert_eq!(config.bind_address(), "127.0.0.1:9001");
        assert_eq!(config.models_dir(), "/from/file");
        assert_eq!(config.inference.predict_timeout_ms, Some(250));
        assert_eq!(config.logging.format, LogFormat::Json);
        assert!(config.monitoring.enabled);
        assert!(!config.logging.verbose);
    }

    #[test]
    fn test_models_dir_flag_overrides_file_url() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[models]\nurl = \"https://store.example.com/m\"\n")
            .unwrap();
        let path = temp_file.path().to_str().unwrap().to_string();

        let cli = CliConfig::parse_from([
            "health-assistant",
            "--config",
            path.as_str(),
            "--models-dir",
            "/local/models",
        ]);
        let config = cli.resolve().unwrap();
        assert_eq!(config.models_dir(), "/local/models");
        assert_eq!(config.models_url(), None);

        let cli = CliConfig::parse_from([
            "health-assistant",
            "--config",
            path.as_str(),
            "--models-dir",
            "/local/models",
            "--models-url",
            "https://other.example.com/m",
        ]);
        let config = cli.resolve().unwrap();
        assert_eq!(config.models_url(), Some("https://other.example.com/m"));

        let cli = CliConfig::parse_from(["health-assistant", "--config", path.as_str()]);
        let config = cli.resolve().unwrap();
        assert_eq!(config.models_url(), Some("https://store.example.com/m"));
    }
}
