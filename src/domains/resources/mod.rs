//! Resources domain module.
//!
//! Built-in resources are operator-defined documents stored in the registry
//! and read by MCP clients by URI.
//!
//! ## Architecture
//!
//! - `record.rs` - The stored [`Resource`] record and its draft/patch shapes
//! - `service.rs` - Serves `resources/read` from the registry

mod error;
mod record;
mod service;

pub use error::ResourceError;
pub use record::{NewResource, Resource, ResourcePatch};
pub use service::ResourceService;
