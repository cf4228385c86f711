//! Built-in resource endpoints.

use std::sync::Arc;

use tracing::{error, info};

use super::envelope::Reply;
use super::{Caller, is_blank, is_cleared};
use crate::domains::resources::{NewResource, Resource, ResourcePatch};
use crate::storage::Registry;

const NOT_FOUND: &str = "Built-in resource not found";

/// MIME type recorded when a resource is created without one.
pub const DEFAULT_MIME_TYPE: &str = "text/plain";

/// Controller for built-in resources.
#[derive(Clone)]
pub struct ResourceAdmin {
    registry: Arc<dyn Registry<Resource>>,
}

impl ResourceAdmin {
    pub fn new(registry: Arc<dyn Registry<Resource>>) -> Self {
        Self { registry }
    }

    /// List every built-in resource, enabled or not.
    pub async fn list(&self) -> Reply<Vec<Resource>> {
        match self.registry.find_all().await {
            Ok(resources) => Reply::ok(resources),
            Err(e) => {
                error!("Error listing built-in resources: {}", e);
                Reply::from_registry_error(&e)
            }
        }
    }

    pub async fn get(&self, id: &str) -> Reply<Resource> {
        match self.registry.find_by_id(id).await {
            Ok(Some(resource)) => Reply::ok(resource),
            Ok(None) => Reply::not_found(NOT_FOUND),
            Err(e) => {
                error!("Error getting built-in resource {}: {}", id, e);
                Reply::from_registry_error(&e)
            }
        }
    }

    /// Create a resource. `uri` and `content` are required; `mimeType`
    /// defaults to `text/plain` and `enabled` to true.
    pub async fn create(&self, caller: &Caller, body: ResourcePatch) -> Reply<Resource> {
        if !caller.privileged {
            return Reply::forbidden();
        }

        let (Some(uri), Some(content)) = (body.uri, body.content) else {
            return Reply::bad_request("uri and content are required");
        };
        if is_blank(Some(&uri)) || is_blank(Some(&content)) {
            return Reply::bad_request("uri and content are required");
        }

        let mime_type = body
            .mime_type
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string());

        let draft = NewResource {
            uri,
            name: body.name,
            description: body.description,
            mime_type: Some(mime_type),
            content,
            enabled: Some(body.enabled.unwrap_or(true)),
        };

        match self.registry.create(draft).await {
            Ok(resource) => {
                info!("Created built-in resource '{}'", resource.uri);
                Reply::created(resource)
            }
            Err(e) => {
                error!("Error creating built-in resource: {}", e);
                Reply::from_registry_error(&e)
            }
        }
    }

    pub async fn update(&self, caller: &Caller, id: &str, patch: ResourcePatch) -> Reply<Resource> {
        if !caller.privileged {
            return Reply::forbidden();
        }
        if is_cleared(patch.uri.as_deref()) || is_cleared(patch.content.as_deref()) {
            return Reply::bad_request("uri and content cannot be empty");
        }

        match self.registry.update(id, patch).await {
            Ok(Some(resource)) => Reply::ok(resource),
            Ok(None) => Reply::not_found(NOT_FOUND),
            Err(e) => {
                error!("Error updating built-in resource {}: {}", id, e);
                Reply::from_registry_error(&e)
            }
        }
    }

    pub async fn delete(&self, caller: &Caller, id: &str) -> Reply<()> {
        if !caller.privileged {
            return Reply::forbidden();
        }

        match self.registry.delete(id).await {
            Ok(true) => Reply::done("Built-in resource deleted"),
            Ok(false) => Reply::not_found(NOT_FOUND),
            Err(e) => {
                error!("Error deleting built-in resource {}: {}", id, e);
                Reply::from_registry_error(&e)
            }
        }
    }
}
