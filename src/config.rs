use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use thiserror::Error;
use validator::Validate;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Parse error for {field}: {value} - {source}")]
    Parse {
        field: String,
        value: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Catalog configuration with validation
#[derive(Clone, Debug, Validate, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CatalogConfig {
    /// Indices whose concrete name starts with this prefix are hidden from SQL
    #[validate(length(min = 1, message = "Internal index prefix cannot be empty"))]
    pub internal_index_prefix: String,

    /// Template type merged into real types, never a table of its own
    #[validate(length(min = 1, message = "Default mapping type cannot be empty"))]
    pub default_mapping_type: String,

    /// Base URL of the document store REST endpoint
    #[validate(url(message = "Metadata URL must be a valid URL"))]
    pub metadata_url: String,

    /// Timeout of a single metadata request, in milliseconds
    #[validate(range(
        min = 1,
        max = 600000,
        message = "Request timeout must be between 1 and 600000 ms"
    ))]
    pub request_timeout_ms: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            internal_index_prefix: ".".to_string(),
            default_mapping_type: "_default_".to_string(),
            metadata_url: "http://localhost:9200".to_string(),
            request_timeout_ms: 30000,
        }
    }
}

impl CatalogConfig {
    /// Create configuration from environment variables with validation
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            internal_index_prefix: env::var("SQL_CATALOG_INTERNAL_PREFIX")
                .unwrap_or(defaults.internal_index_prefix),
            default_mapping_type: env::var("SQL_CATALOG_DEFAULT_TYPE")
                .unwrap_or(defaults.default_mapping_type),
            metadata_url: env::var("SQL_CATALOG_ES_URL").unwrap_or(defaults.metadata_url),
            request_timeout_ms: parse_env_var("SQL_CATALOG_REQUEST_TIMEOUT_MS", "30000")?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Create configuration from YAML file
    pub fn from_yaml_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Parse {
            field: "yaml_file".to_string(),
            value: "file read failed".to_string(),
            source: Box::new(e),
        })?;

        let config: Self = serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
            field: "yaml_content".to_string(),
            value: content,
            source: Box::new(e),
        })?;

        config.validate()?;
        Ok(config)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Parse an environment variable with a default value
fn parse_env_var<T: std::str::FromStr>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value = env::var(key).unwrap_or_else(|_| default.to_string());
    value.parse().map_err(|e| ConfigError::Parse {
        field: key.to_string(),
        value,
        source: Box::new(e),
    })
}
