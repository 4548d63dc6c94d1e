//! # Gateway Configuration
//!
//! JSON configuration file. Every field has a default, so a file only needs
//! the settings it changes:
//!
//! ```json
//! {
//!   "server": { "port": 8080 },
//!   "backend": "external",
//!   "document_store": { "uri": "mongodb://localhost:27017", "timeout_ms": 10000 },
//!   "kv_store": { "url": "redis://localhost:6379/0" },
//!   "log": { "level": "info", "format": "json" }
//! }
//! ```

use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::store::{CreatedAtEncoding, MongoSettings};

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Listener section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origins; empty allows any origin
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            cors_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Address to bind, from `host` and `port`
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ConfigError::Invalid(format!("server address: {}", e)))
    }
}

/// Which store implementations to run against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    /// MongoDB and Redis
    #[default]
    External,
    /// Process-local stores, empty at startup
    Memory,
}

/// Document store section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentStoreConfig {
    pub uri: String,
    pub database: String,
    pub collection: String,
    pub timeout_ms: u64,
    pub created_at_encoding: CreatedAtEncoding,
}

impl Default for DocumentStoreConfig {
    fn default() -> Self {
        Self {
            uri: "mongodb://localhost:27017".to_string(),
            database: "getircase-study".to_string(),
            collection: "records".to_string(),
            timeout_ms: 10_000,
            created_at_encoding: CreatedAtEncoding::Native,
        }
    }
}

impl DocumentStoreConfig {
    pub fn settings(&self) -> MongoSettings {
        MongoSettings {
            uri: self.uri.clone(),
            database: self.database.clone(),
            collection: self.collection.clone(),
            timeout: Duration::from_millis(self.timeout_ms),
            created_at_encoding: self.created_at_encoding,
        }
    }
}

/// Key-value store section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KvStoreConfig {
    pub url: String,
    pub timeout_ms: u64,
}

impl Default for KvStoreConfig {
    fn default() -> Self {
        Self {
            url: "redis://localhost:6379/0".to_string(),
            timeout_ms: 5_000,
        }
    }
}

impl KvStoreConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Logging section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default filter directive; `RUST_LOG` takes precedence
    pub level: String,
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub server: ServerConfig,
    pub backend: Backend,
    pub document_store: DocumentStoreConfig,
    pub kv_store: KvStoreConfig,
    pub log: LogConfig,
}

impl GatewayConfig {
    /// Load and validate configuration from file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        Self::from_json(&content)
    }

    /// Parse and validate configuration from a JSON string
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: GatewayConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Invalid("server.port must be > 0".to_string()));
        }
        self.server.socket_addr()?;

        // Store settings only matter when the external stores are used
        if self.backend == Backend::External {
            let doc = &self.document_store;
            if doc.uri.is_empty() || doc.database.is_empty() || doc.collection.is_empty() {
                return Err(ConfigError::Invalid(
                    "document_store.uri, database and collection must not be empty".to_string(),
                ));
            }
            if doc.timeout_ms == 0 {
                return Err(ConfigError::Invalid(
                    "document_store.timeout_ms must be > 0".to_string(),
                ));
            }
            if self.kv_store.url.is_empty() {
                return Err(ConfigError::Invalid("kv_store.url must not be empty".to_string()));
            }
            if self.kv_store.timeout_ms == 0 {
                return Err(ConfigError::Invalid(
                    "kv_store.timeout_ms must be > 0".to_string(),
                ));
            }
        }

        Ok(())
    }
}
