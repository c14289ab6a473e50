use crate::domain::ports::ModelSource;
use crate::utils::error::{AppError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::path::PathBuf;
use url::Url;

/// Artifacts stored in a directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalModelSource {
    base_path: PathBuf,
}

impl LocalModelSource {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }
}

#[async_trait]
impl ModelSource for LocalModelSource {
    async fn read_artifact(&self, name: &str) -> Result<Vec<u8>> {
        let full_path = self.base_path.join(name);
        tracing::debug!("Reading model artifact from {}", full_path.display());
        let data = tokio::fs::read(full_path).await?;
        Ok(data)
    }

    fn describe(&self, name: &str) -> String {
        self.base_path.join(name).display().to_string()
    }
}

/// Artifacts served over HTTP(S), e.g. from an object store bucket.
#[derive(Debug, Clone)]
pub struct HttpModelSource {
    base_url: Url,
    client: Client,
}

impl HttpModelSource {
    pub fn new(base_url: &str) -> Result<Self> {
        crate::utils::validation::validate_url("models.url", base_url)?;

        // `Url::join` replaces the last segment unless the base ends with '/'.
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };
        let base_url = Url::parse(&normalized).map_err(|e| AppError::InvalidConfigValueError {
            field: "models.url".to_string(),
            value: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            base_url,
            client: Client::new(),
        })
    }

    fn artifact_url(&self, name: &str) -> Result<Url> {
        self.base_url
            .join(name)
            .map_err(|e| AppError::InvalidConfigValueError {
                field: "models.artifact".to_string(),
                value: name.to_string(),
                reason: e.to_string(),
            })
    }
}

#[async_trait]
impl ModelSource for HttpModelSource {
    async fn read_artifact(&self, name: &str) -> Result<Vec<u8>> {
        let url = self.artifact_url(name)?;
        tracing::debug!("Downloading model artifact from {}", url);

        let response = self.client.get(url).send().await?;
        tracing::debug!("Model store response status: {}", response.status());

        let response = response.error_for_status()?;
        let data = response.bytes().await?;
        Ok(data.to_vec())
    }

    fn describe(&self, name: &str) -> String {
        match self.artifact_url(name) {
            Ok(url) => url.to_string(),
            Err(_) => format!("{}{}", self.base_url, name),
        }
    }
}
