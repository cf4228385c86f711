//! Listing service: merges registry entries with external ones.

use std::sync::Arc;

use tracing::debug;

use super::external::{ExternalCatalog, ListingContext, NoExternalCatalog};
use super::normalize::{
    PROMPT_DEFAULTS, PromptEntry, PromptListing, RESOURCE_DEFAULTS, ResourceEntry,
    ResourceListing, normalize_prompt, normalize_resource,
};
use crate::domains::prompts::Prompt;
use crate::domains::resources::Resource;
use crate::storage::{Registries, Registry, RegistryResult};

/// Produces the prompt and resource listings served to protocol clients.
///
/// Enabled registry entries come first, in registry order, followed by the
/// external catalog's entries. Entries are not de-duplicated across sources.
#[derive(Clone)]
pub struct ListingService {
    prompts: Arc<dyn Registry<Prompt>>,
    resources: Arc<dyn Registry<Resource>>,
    external: Arc<dyn ExternalCatalog>,
}

impl ListingService {
    pub fn new(registries: &Registries) -> Self {
        Self::with_catalog(registries, Arc::new(NoExternalCatalog))
    }

    pub fn with_catalog(registries: &Registries, external: Arc<dyn ExternalCatalog>) -> Self {
        Self {
            prompts: registries.prompts(),
            resources: registries.resources(),
            external,
        }
    }

    pub async fn list_prompts(&self, context: &ListingContext) -> RegistryResult<Vec<PromptListing>> {
        let (stored, external) = futures::join!(
            self.prompts.find_enabled(),
            self.external.prompts(context)
        );
        let stored = stored?;

        debug!(
            builtin = stored.len(),
            external = external.len(),
            "Listing prompts"
        );

        Ok(stored
            .into_iter()
            .map(PromptEntry::from)
            .chain(external)
            .map(|entry| normalize_prompt(entry, &PROMPT_DEFAULTS))
            .collect())
    }

    pub async fn list_resources(
        &self,
        context: &ListingContext,
    ) -> RegistryResult<Vec<ResourceListing>> {
        let (stored, external) = futures::join!(
            self.resources.find_enabled(),
            self.external.resources(context)
        );
        let stored = stored?;

        debug!(
            builtin = stored.len(),
            external = external.len(),
            "Listing resources"
        );

        Ok(stored
            .into_iter()
            .map(ResourceEntry::from)
            .chain(external)
            .map(|entry| normalize_resource(entry, &RESOURCE_DEFAULTS))
            .collect())
    }
}
