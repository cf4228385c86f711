//! Transport layer for the registry server.
//!
//! - **STDIO**: standard input/output, the default MCP mode (feature `stdio`)
//! - **TCP**: line-delimited JSON-RPC over a raw socket, one MCP session per
//!   connection (feature `tcp`)
//!
//! Every connection is served by a clone of the same [`McpServer`], so all
//! sessions read from the same registries.
//!
//! [`McpServer`]: crate::core::McpServer

mod config;
mod error;
mod service;

#[cfg(feature = "tcp")]
pub mod tcp;

#[cfg(feature = "stdio")]
pub mod stdio;

pub use config::TransportConfig;
pub use error::{TransportError, TransportResult};
pub use service::TransportService;

#[cfg(feature = "tcp")]
pub use config::TcpConfig;
