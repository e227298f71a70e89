//! Service configuration

use hello_sparql_owlrl::ReasonerConfig;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use thiserror::Error;

/// Top-level configuration handed to [`crate::ApiServer`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub reasoner: ReasonerConfig,
}

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
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

impl ServerConfig {
    pub fn address(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| ConfigError::Address(format!("{}:{}", self.host, self.port)))
    }
}

/// Cross-origin policy for browser clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub allow_credentials: bool,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![
                "http://localhost".to_string(),
                "http://localhost:8080".to_string(),
                "http://localhost:3000".to_string(),
            ],
            allow_credentials: true,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid listen address {0}")]
    Address(String),
}

impl ApiConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ApiConfig::default();
        assert_eq!(config.server.address().unwrap().port(), 8000);
        assert_eq!(config.cors.allowed_origins.len(), 3);
        assert!(config.cors.allow_credentials);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ApiConfig::from_toml_str(
            r#"
            [server]
            port = 9090

            [reasoner]
            fail_on_inconsistency = true
            "#,
        )
        .unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "0.0.0.0");
        assert!(config.reasoner.fail_on_inconsistency);
        assert_eq!(config.cors, CorsConfig::default());
    }

    #[test]
    fn test_bad_address() {
        let server = ServerConfig {
            host: "not a host".to_string(),
            port: 1,
        };
        assert!(matches!(server.address(), Err(ConfigError::Address(_))));
    }
}
