//! Resource-specific error types.

use thiserror::Error;

use crate::storage::RegistryError;

/// Errors that can occur while reading a resource.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// No enabled resource with this URI exists.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// The registry could not be read.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl ResourceError {
    /// Create a new "not found" error.
    pub fn not_found(uri: impl Into<String>) -> Self {
        Self::NotFound(uri.into())
    }
}
