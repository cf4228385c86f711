//! Prompt-specific error types.

use thiserror::Error;

use crate::storage::RegistryError;

/// Errors that can occur while serving a prompt.
#[derive(Debug, Error)]
pub enum PromptError {
    /// No enabled prompt with this name exists.
    #[error("Prompt not found: {0}")]
    NotFound(String),

    /// Required argument is missing.
    #[error("Missing required argument: {0}")]
    MissingArgument(String),

    /// Template rendering failed.
    #[error("Template error: {0}")]
    TemplateError(String),

    /// The registry could not be read.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl PromptError {
    /// Create a new "not found" error.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }

    /// Create a new "missing argument" error.
    pub fn missing_argument(arg: impl Into<String>) -> Self {
        Self::MissingArgument(arg.into())
    }

    /// Create a new "template" error.
    pub fn template(msg: impl Into<String>) -> Self {
        Self::TemplateError(msg.into())
    }
}
