//! Prompts domain module.
//!
//! Built-in prompts are operator-defined templates stored in the registry.
//!
//! ## Architecture
//!
//! - `record.rs` - The stored [`Prompt`] record and its draft/patch shapes
//! - `templates.rs` - Template rendering engine
//! - `service.rs` - Serves `prompts/get` from the registry

mod error;
mod record;
mod service;
pub mod templates;

pub use error::PromptError;
pub use record::{NewPrompt, Prompt, PromptArgumentSpec, PromptPatch};
pub use service::PromptService;
pub use templates::PromptTemplate;
