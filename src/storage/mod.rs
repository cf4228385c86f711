//! Storage for built-in prompts and resources.
//!
//! - `contract.rs` - the [`Record`] and [`Registry`] traits every backend implements
//! - `file.rs` - records kept as arrays inside one shared JSON settings document
//! - `sqlite/` - records kept in one SQLite table per kind
//! - `facade.rs` - [`Registries`], the backend chosen once at start-up
//! - `error.rs` - [`RegistryError`] (duplicate key or backend failure)

mod contract;
mod error;
mod facade;
pub mod file;
pub mod sqlite;

pub use contract::{Record, Registry};
pub use error::{BackendError, RegistryError, RegistryResult};
pub use facade::Registries;
pub use file::{FileRegistry, SettingsFile};
pub use sqlite::{SqlRecord, SqliteRegistry};

/// Serde default for `enabled`: an absent flag means enabled.
pub(crate) fn enabled_by_default() -> bool {
    true
}
