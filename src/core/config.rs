//! Configuration management for the registry server.
//!
//! This module provides a centralized configuration structure populated from
//! environment variables (and a `.env` file, if present) or defaults.

use super::transport::TransportConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;

/// Default location of the shared settings document.
pub const DEFAULT_SETTINGS_PATH: &str = "mcp_settings.json";

/// Default location of the registry database.
pub const DEFAULT_DATABASE_PATH: &str = "mcp_registry.db";

/// Main configuration structure for the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Registry storage configuration.
    pub storage: StorageConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Which registry backend to open at start-up.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    pub backend: StorageBackend,
}

/// Registry backend selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StorageBackend {
    /// Records kept inside the shared JSON settings document.
    File { settings_path: PathBuf },

    /// Records kept in a SQLite database.
    Database { database_path: PathBuf },
}

impl Default for StorageBackend {
    fn default() -> Self {
        Self::File {
            settings_path: PathBuf::from(DEFAULT_SETTINGS_PATH),
        }
    }
}

impl StorageBackend {
    /// Get a description of this backend for logging.
    pub fn description(&self) -> String {
        match self {
            Self::File { settings_path } => format!("settings file {}", settings_path.display()),
            Self::Database { database_path } => {
                format!("SQLite database {}", database_path.display())
            }
        }
    }
}

impl StorageConfig {
    /// Load storage config from environment variables.
    ///
    /// `MCP_STORAGE_BACKEND` selects `file` (default) or `database`.
    pub fn from_env() -> Self {
        let backend = std::env::var("MCP_STORAGE_BACKEND")
            .unwrap_or_default()
            .to_lowercase();

        let backend = match backend.as_str() {
            "database" | "db" | "sqlite" => StorageBackend::Database {
                database_path: std::env::var("MCP_DATABASE_PATH")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATABASE_PATH)),
            },
            other => {
                if !other.is_empty() && other != "file" {
                    warn!(
                        "Unknown MCP_STORAGE_BACKEND '{}', falling back to the settings file",
                        other
                    );
                }
                StorageBackend::File {
                    settings_path: std::env::var("MCP_SETTINGS_PATH")
                        .map(PathBuf::from)
                        .unwrap_or_else(|_| PathBuf::from(DEFAULT_SETTINGS_PATH)),
                }
            }
        };

        Self { backend }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "builtin-registry-server".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            storage: StorageConfig::default(),
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            transport: TransportConfig::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Environment variables are expected to be prefixed with `MCP_`.
    /// For example: `MCP_SERVER_NAME`, `MCP_LOG_LEVEL`, `MCP_STORAGE_BACKEND`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        config.transport = TransportConfig::from_env();
        config.storage = StorageConfig::from_env();

        config
    }
}
