use crate::utils::error::{AppError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(AppError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(AppError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(AppError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(AppError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(AppError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

/// Artifact names are joined onto a directory or URL, so they must stay a single segment.
pub fn validate_artifact_name(field_name: &str, name: &str) -> Result<()> {
    validate_non_empty_string(field_name, name)?;

    if name.contains(['/', '\\', '?', '#', '%']) || name == "." || name == ".." {
        return Err(AppError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: name.to_string(),
            reason: "Artifact name must be a plain file name".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AppError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(AppError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("models.url", "https://example.com/models").is_ok());
        assert!(validate_url("models.url", "http://localhost:9000").is_ok());
        assert!(validate_url("models.url", "").is_err());
        assert!(validate_url("models.url", "invalid-url").is_err());
        assert!(validate_url("models.url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_artifact_name() {
        assert!(validate_artifact_name("models.diabetes", "diabetes_model.json").is_ok());
        assert!(validate_artifact_name("models.diabetes", "").is_err());
        assert!(validate_artifact_name("models.diabetes", "../secrets.json").is_err());
        assert!(validate_artifact_name("models.diabetes", "..").is_err());
        assert!(validate_artifact_name("models.diabetes", "model.json?v=2").is_err());
        assert!(validate_artifact_name("models.diabetes", "model.json#frag").is_err());
        assert!(validate_artifact_name("models.diabetes", "%2e%2e").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("inference.predict_timeout_ms", 500u64, 1, 60_000).is_ok());
        assert!(validate_range("inference.predict_timeout_ms", 0u64, 1, 60_000).is_err());
        assert!(validate_range("server.port", 0u16, 1, u16::MAX).is_err());
    }
}
