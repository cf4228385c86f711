//! Resource service implementation.
//!
//! Serves `resources/read` requests from the built-in resource registry.

use std::sync::Arc;

use rmcp::model::{ReadResourceResult, ResourceContents};
use tracing::debug;

use super::error::ResourceError;
use super::record::Resource;
use crate::storage::Registry;

/// Service for reading built-in resources.
#[derive(Clone)]
pub struct ResourceService {
    registry: Arc<dyn Registry<Resource>>,
}

impl ResourceService {
    pub fn new(registry: Arc<dyn Registry<Resource>>) -> Self {
        Self { registry }
    }

    /// Read a resource by URI.
    ///
    /// Disabled resources are treated as missing.
    pub async fn read_resource(&self, uri: &str) -> Result<ReadResourceResult, ResourceError> {
        let resource = self
            .registry
            .find_by_key(uri)
            .await?
            .filter(|r| r.enabled)
            .ok_or_else(|| ResourceError::not_found(uri))?;

        debug!("Reading built-in resource '{}'", resource.uri);

        Ok(ReadResourceResult {
            contents: vec![ResourceContents::TextResourceContents {
                uri: resource.uri,
                mime_type: resource.mime_type,
                text: resource.content,
                meta: None,
            }],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::resources::NewResource;
    use crate::storage::Registries;

    async fn service_with(drafts: Vec<NewResource>) -> ResourceService {
        let registries = Registries::in_memory().unwrap();
        for draft in drafts {
            registries.resources().create(draft).await.unwrap();
        }
        ResourceService::new(registries.resources())
    }

    #[tokio::test]
    async fn test_read_existing_resource() {
        let mut draft = NewResource::new("res://docs/readme", "# Readme");
        draft.mime_type = Some("text/markdown".into());
        let service = service_with(vec![draft]).await;

        let result = service.read_resource("res://docs/readme").await.unwrap();
        assert_eq!(result.contents.len(), 1);
        match &result.contents[0] {
            ResourceContents::TextResourceContents {
                text, mime_type, ..
            } => {
                assert_eq!(text, "# Readme");
                assert_eq!(mime_type.as_deref(), Some("text/markdown"));
            }
            other => panic!("unexpected contents: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_read_nonexistent_resource() {
        let service = service_with(vec![]).await;

        let result = service.read_resource("res://nonexistent").await;
        assert!(matches!(result, Err(ResourceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_disabled_resource_is_not_served() {
        let mut draft = NewResource::new("res://hidden", "secret");
        draft.enabled = Some(false);
        let service = service_with(vec![draft]).await;

        assert!(service.read_resource("res://hidden").await.is_err());
    }
}
