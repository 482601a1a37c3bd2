//! Configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use distributor::config::normalize_extension;
use distributor::{AgentOrder, DistributorConfig, UploadConfig};

/// Admin web server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address.
    pub addr: SocketAddr,
    /// SQLite database URL.
    pub database_url: String,
    /// Upload limits and agent ordering for the distributor.
    pub distributor: DistributorConfig,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `ADMIN_ADDR` | Server bind address | `127.0.0.1:8788` |
    /// | `SQLITE_PATH` | SQLite database URL | `sqlite:distribution.db?mode=rwc` |
    /// | `UPLOAD_MAX_BYTES` | Largest accepted upload | `5242880` |
    /// | `UPLOAD_ALLOWED_EXTENSIONS` | Comma-separated extensions | `.csv,.xlsx,.xls` |
    /// | `UPLOAD_TEMP_DIR` | Where uploads are staged | OS temp dir |
    /// | `AGENT_ORDER` | `created` or `name` | `created` |
    pub fn from_env() -> Result<Self, ConfigError> {
        let addr = env::var("ADMIN_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8788".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidAddr)?;

        let database_url = env::var("SQLITE_PATH")
            .unwrap_or_else(|_| "sqlite:distribution.db?mode=rwc".to_string());

        let mut upload = UploadConfig::default();

        if let Ok(value) = env::var("UPLOAD_MAX_BYTES") {
            upload.max_file_size_bytes = value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidUploadLimit(value))?;
        }

        if let Ok(value) = env::var("UPLOAD_ALLOWED_EXTENSIONS") {
            upload.allowed_extensions = parse_extensions(&value)?;
        }

        if let Ok(value) = env::var("UPLOAD_TEMP_DIR") {
            upload.temp_directory = PathBuf::from(value);
        }

        let agent_order = match env::var("AGENT_ORDER") {
            Ok(value) => value
                .parse::<AgentOrder>()
                .map_err(|_| ConfigError::InvalidAgentOrder(value))?,
            Err(_) => AgentOrder::default(),
        };

        Ok(Self {
            addr,
            database_url,
            distributor: DistributorConfig {
                upload,
                agent_order,
            },
        })
    }
}

fn parse_extensions(value: &str) -> Result<Vec<String>, ConfigError> {
    let extensions: Vec<String> = value
        .split(',')
        .map(str::trim)
        .filter(|ext| !ext.is_empty())
        .map(normalize_extension)
        .collect();

    if extensions.is_empty() {
        return Err(ConfigError::NoAllowedExtensions);
    }

    Ok(extensions)
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid ADMIN_ADDR format")]
    InvalidAddr,

    #[error("Invalid UPLOAD_MAX_BYTES value: {0}")]
    InvalidUploadLimit(String),

    #[error("UPLOAD_ALLOWED_EXTENSIONS must name at least one extension")]
    NoAllowedExtensions,

    #[error("Invalid AGENT_ORDER value: {0} (expected `created` or `name`)")]
    InvalidAgentOrder(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_extensions() {
        assert_eq!(
            parse_extensions(" CSV, .xlsx ,").unwrap(),
            vec![".csv".to_string(), ".xlsx".to_string()]
        );
        assert!(matches!(
            parse_extensions(" , "),
            Err(ConfigError::NoAllowedExtensions)
        ));
    }
}
