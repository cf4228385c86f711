//! Built-in resource records.

use serde::{Deserialize, Serialize};

use crate::storage::{Record, enabled_by_default};

/// An operator-defined resource stored in the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    /// Opaque identifier assigned at creation.
    pub id: String,

    /// Unique, external-facing key.
    pub uri: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,

    pub content: String,

    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

/// Input for creating a resource.
///
/// `mime_type` is stored exactly as given; the `text/plain` default is
/// applied by the admin layer, not here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewResource {
    pub uri: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub mime_type: Option<String>,
    pub content: String,
    #[serde(default)]
    pub enabled: Option<bool>,
}

impl NewResource {
    /// A draft with only the required fields set.
    pub fn new(uri: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            content: content.into(),
            ..Default::default()
        }
    }
}

/// Partial update for a resource. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourcePatch {
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub enabled: Option<bool>,
}

impl Record for Resource {
    const KIND: &'static str = "resource";
    const KEY_FIELD: &'static str = "URI";
    const COLLECTION: &'static str = "resources";

    type Draft = NewResource;
    type Patch = ResourcePatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn key(&self) -> &str {
        &self.uri
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn draft_key(draft: &NewResource) -> &str {
        &draft.uri
    }

    fn patch_key(patch: &ResourcePatch) -> Option<&str> {
        patch.uri.as_deref()
    }

    fn from_draft(id: String, draft: NewResource) -> Self {
        Self {
            id,
            uri: draft.uri,
            name: draft.name,
            description: draft.description,
            mime_type: draft.mime_type,
            content: draft.content,
            enabled: draft.enabled.unwrap_or(true),
        }
    }

    fn apply(&mut self, patch: ResourcePatch) {
        if let Some(uri) = patch.uri {
            self.uri = uri;
        }
        if let Some(name) = patch.name {
            self.name = Some(name);
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
        if let Some(mime_type) = patch.mime_type {
            self.mime_type = Some(mime_type);
        }
        if let Some(content) = patch.content {
            self.content = content;
        }
        if let Some(enabled) = patch.enabled {
            self.enabled = enabled;
        }
    }
}
