//! Listing domain module.
//!
//! Builds the `prompts/list` and `resources/list` responses: enabled
//! registry entries plus entries from an [`ExternalCatalog`], each
//! normalized so every optional protocol field is present.
//!
//! ## Architecture
//!
//! - `normalize.rs` - Per-kind normalization and the defaults tables
//! - `external.rs` - The [`ExternalCatalog`] seam and stock catalogs
//! - `service.rs` - [`ListingService`], the merge step

mod external;
pub mod normalize;
mod service;

pub use external::{ExternalCatalog, ListingContext, NoExternalCatalog, StaticCatalog};
pub use normalize::{PromptEntry, PromptListing, ResourceEntry, ResourceListing};
pub use service::ListingService;
