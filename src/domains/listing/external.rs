//! Entries supplied by sources other than the built-in registry.
//!
//! How those entries are discovered (connected upstream servers, groups,
//! sessions) is the caller's business; the listing only needs them for the
//! request at hand.

use async_trait::async_trait;

use super::normalize::{PromptEntry, ResourceEntry};

/// Who a listing is being produced for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingContext {
    /// Transport-level session, when the transport has one.
    pub session_id: Option<String>,

    /// Server group the session is scoped to, if any.
    pub group: Option<String>,
}

/// Supplies non-registry prompt and resource entries for a request.
#[async_trait]
pub trait ExternalCatalog: Send + Sync {
    async fn prompts(&self, context: &ListingContext) -> Vec<PromptEntry>;

    async fn resources(&self, context: &ListingContext) -> Vec<ResourceEntry>;
}

/// A catalog with no external entries.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoExternalCatalog;

#[async_trait]
impl ExternalCatalog for NoExternalCatalog {
    async fn prompts(&self, _context: &ListingContext) -> Vec<PromptEntry> {
        Vec::new()
    }

    async fn resources(&self, _context: &ListingContext) -> Vec<ResourceEntry> {
        Vec::new()
    }
}

/// A catalog returning the same entries for every request.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    pub prompts: Vec<PromptEntry>,
    pub resources: Vec<ResourceEntry>,
}

#[async_trait]
impl ExternalCatalog for StaticCatalog {
    async fn prompts(&self, _context: &ListingContext) -> Vec<PromptEntry> {
        self.prompts.clone()
    }

    async fn resources(&self, _context: &ListingContext) -> Vec<ResourceEntry> {
        self.resources.clone()
    }
}
