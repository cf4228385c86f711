//! Backend selection.
//!
//! The active backend is chosen once, at process start, from
//! [`StorageConfig`]. Everything downstream holds trait objects and never
//! learns which backend is behind them.

use std::path::Path;
use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use tracing::info;

use super::contract::Registry;
use super::error::{BackendError, RegistryResult};
use super::file::{FileRegistry, SettingsFile};
use super::sqlite::{SqliteRegistry, open_db, open_db_in_memory};
use crate::core::config::{StorageBackend, StorageConfig};
use crate::domains::prompts::Prompt;
use crate::domains::resources::Resource;

/// Entry point to the prompt and resource registries.
#[derive(Clone)]
pub struct Registries {
    prompts: Arc<dyn Registry<Prompt>>,
    resources: Arc<dyn Registry<Resource>>,
    backend: StorageBackend,
}

impl Registries {
    /// Open the backend described by the configuration.
    pub async fn open(config: &StorageConfig) -> RegistryResult<Self> {
        info!("Opening registry backend: {}", config.backend.description());

        match &config.backend {
            StorageBackend::File { settings_path } => Ok(Self::file(settings_path)),
            StorageBackend::Database { database_path } => {
                let path = database_path.clone();
                let conn = tokio::task::spawn_blocking(move || open_db(path))
                    .await
                    .map_err(|e| BackendError::Task(e.to_string()))??;
                Ok(Self::database(conn, config.backend.clone()))
            }
        }
    }

    /// Registries sharing one settings document.
    pub fn file(settings_path: impl AsRef<Path>) -> Self {
        let path = settings_path.as_ref().to_path_buf();
        let settings = Arc::new(SettingsFile::new(path.clone()));
        Self {
            prompts: Arc::new(FileRegistry::<Prompt>::new(settings.clone())),
            resources: Arc::new(FileRegistry::<Resource>::new(settings)),
            backend: StorageBackend::File {
                settings_path: path,
            },
        }
    }

    /// Registries over an already-migrated SQLite connection.
    fn database(conn: Connection, backend: StorageBackend) -> Self {
        let conn = Arc::new(Mutex::new(conn));
        Self {
            prompts: Arc::new(SqliteRegistry::<Prompt>::new(conn.clone())),
            resources: Arc::new(SqliteRegistry::<Resource>::new(conn)),
            backend,
        }
    }

    /// Registries over a private in-memory database.
    pub fn in_memory() -> RegistryResult<Self> {
        let conn = open_db_in_memory()?;
        Ok(Self::database(
            conn,
            StorageBackend::Database {
                database_path: ":memory:".into(),
            },
        ))
    }

    pub fn prompts(&self) -> Arc<dyn Registry<Prompt>> {
        self.prompts.clone()
    }

    pub fn resources(&self) -> Arc<dyn Registry<Resource>> {
        self.resources.clone()
    }

    pub fn backend(&self) -> &StorageBackend {
        &self.backend
    }
}
