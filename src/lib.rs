//! Built-in registry MCP server.
//!
//! Operators define prompts and resources directly on the server; this crate
//! stores them, lists them next to entries coming from elsewhere, and serves
//! them over MCP.
//!
//! # Architecture
//!
//! - **storage**: the registry contract and its two backends, a shared JSON
//!   settings document or a SQLite database, selected once at start-up
//! - **domains**: business logic organized by bounded contexts
//!   - **prompts** / **resources**: record types and the protocol read paths
//!   - **listing**: merging and normalizing entries for `*/list` requests
//!   - **admin**: management operations returning a `{success, data | message}`
//!     envelope
//! - **core**: configuration, error handling, the MCP handler and transports
//!
//! # Example
//!
//! ```rust,no_run
//! use builtin_registry_server::core::{Config, McpServer};
//! use builtin_registry_server::storage::Registries;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let registries = Registries::open(&config.storage).await?;
//!     let server = McpServer::new(config, &registries);
//!     // Start the server...
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;
pub mod storage;

pub use core::{Config, Error, McpServer, Result};
pub use storage::{Registries, Registry, RegistryError};
