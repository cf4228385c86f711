//! Domain modules containing business logic.
//!
//! - **prompts**: built-in prompt records and `prompts/get`
//! - **resources**: built-in resource records and `resources/read`
//! - **listing**: merged, normalized `prompts/list` and `resources/list`
//! - **admin**: management controllers over both registries

pub mod admin;
pub mod listing;
pub mod prompts;
pub mod resources;
