//! Registry error types.
//!
//! The registry layer raises exactly two kinds of failure: a key collision
//! and an opaque backend failure. "Not found" is never an error here; it is
//! reported through `Option`/`bool` return values.

use thiserror::Error;

/// A specialized Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Errors surfaced by a [`Registry`](super::Registry) implementation.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A create or key-changing update collided with an existing record.
    #[error("Built-in {kind} with {key_field} '{key}' already exists")]
    DuplicateKey {
        kind: &'static str,
        key_field: &'static str,
        key: String,
    },

    /// The underlying storage failed.
    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl RegistryError {
    /// Create a duplicate key error for the given record kind.
    pub fn duplicate<R: super::Record>(key: impl Into<String>) -> Self {
        Self::DuplicateKey {
            kind: R::KIND,
            key_field: R::KEY_FIELD,
            key: key.into(),
        }
    }

    /// Whether this error reports a key collision.
    pub fn is_duplicate_key(&self) -> bool {
        matches!(self, Self::DuplicateKey { .. })
    }
}

/// Storage I/O failures, propagated unchanged to the caller.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Reading or writing the settings document failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The settings document or a stored column is not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The SQLite engine reported an error.
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// The database schema is newer than this binary understands.
    #[error("database schema version {db_version} is newer than supported {latest_supported}")]
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },

    /// A blocking storage task panicked or was cancelled.
    #[error("storage task failed: {0}")]
    Task(String),

    /// The connection lock was poisoned by a panicking writer.
    #[error("storage lock poisoned")]
    Poisoned,

    /// Persisted data does not match the expected shape.
    #[error("invalid persisted data: {0}")]
    InvalidData(String),
}

impl From<std::io::Error> for RegistryError {
    fn from(err: std::io::Error) -> Self {
        Self::Backend(err.into())
    }
}

impl From<serde_json::Error> for RegistryError {
    fn from(err: serde_json::Error) -> Self {
        Self::Backend(err.into())
    }
}

impl From<rusqlite::Error> for RegistryError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Backend(err.into())
    }
}
