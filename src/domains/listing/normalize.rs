//! Normalization of listing entries into protocol-safe records.
//!
//! Protocol consumers validate listings against a schema that requires every
//! optional field to be present and string-typed (or a list, for prompt
//! arguments). Entries from any source pass through one function per kind
//! that fills absent fields from an explicit defaults table.

use serde::{Deserialize, Serialize};

use crate::domains::prompts::{Prompt, PromptArgumentSpec};
use crate::domains::resources::Resource;

/// How an absent optional string field is filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    /// The empty string.
    Empty,
    /// A copy of the entry's key field.
    Key,
}

impl Fallback {
    fn resolve(self, value: Option<String>, key: &str) -> String {
        value.unwrap_or_else(|| match self {
            Self::Empty => String::new(),
            Self::Key => key.to_string(),
        })
    }
}

/// Defaults for prompt listings. Absent `arguments` always become `[]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptDefaults {
    pub title: Fallback,
    pub description: Fallback,
}

/// Defaults for resource listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceDefaults {
    pub name: Fallback,
    pub description: Fallback,
    pub mime_type: Fallback,
}

pub const PROMPT_DEFAULTS: PromptDefaults = PromptDefaults {
    title: Fallback::Key,
    description: Fallback::Empty,
};

pub const RESOURCE_DEFAULTS: ResourceDefaults = ResourceDefaults {
    name: Fallback::Empty,
    description: Fallback::Empty,
    mime_type: Fallback::Empty,
};

/// A prompt as supplied by a source, with optional fields possibly absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptEntry {
    pub name: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub arguments: Option<Vec<PromptArgumentSpec>>,
}

impl From<Prompt> for PromptEntry {
    fn from(prompt: Prompt) -> Self {
        Self {
            name: prompt.name,
            title: prompt.title,
            description: prompt.description,
            arguments: prompt.arguments,
        }
    }
}

/// A resource as supplied by a source, with optional fields possibly absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceEntry {
    pub uri: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub mime_type: Option<String>,
}

impl From<Resource> for ResourceEntry {
    fn from(resource: Resource) -> Self {
        Self {
            uri: resource.uri,
            name: resource.name,
            description: resource.description,
            mime_type: resource.mime_type,
        }
    }
}

/// A fully populated prompt listing entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptListing {
    pub name: String,
    pub title: String,
    pub description: String,
    pub arguments: Vec<PromptArgumentSpec>,
}

/// A fully populated resource listing entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceListing {
    pub uri: String,
    pub name: String,
    pub description: String,
    pub mime_type: String,
}

pub fn normalize_prompt(entry: PromptEntry, defaults: &PromptDefaults) -> PromptListing {
    let title = defaults.title.resolve(entry.title, &entry.name);
    let description = defaults.description.resolve(entry.description, &entry.name);
    PromptListing {
        title,
        description,
        arguments: entry.arguments.unwrap_or_default(),
        name: entry.name,
    }
}

pub fn normalize_resource(entry: ResourceEntry, defaults: &ResourceDefaults) -> ResourceListing {
    let name = defaults.name.resolve(entry.name, &entry.uri);
    let description = defaults.description.resolve(entry.description, &entry.uri);
    let mime_type = defaults.mime_type.resolve(entry.mime_type, &entry.uri);
    ResourceListing {
        uri: entry.uri,
        name,
        description,
        mime_type,
    }
}

impl From<PromptListing> for rmcp::model::Prompt {
    fn from(listing: PromptListing) -> Self {
        rmcp::model::Prompt {
            name: listing.name,
            title: Some(listing.title),
            description: Some(listing.description),
            arguments: Some(listing.arguments.into_iter().map(Into::into).collect()),
            icons: None,
            meta: None,
        }
    }
}

impl From<ResourceListing> for rmcp::model::Resource {
    fn from(listing: ResourceListing) -> Self {
        use rmcp::model::{AnnotateAble, RawResource};

        let mut raw = RawResource::new(listing.uri, listing.name);
        raw.description = Some(listing.description);
        raw.mime_type = Some(listing.mime_type);
        raw.no_annotation()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_table() {
        assert_eq!(PROMPT_DEFAULTS.title, Fallback::Key);
        assert_eq!(PROMPT_DEFAULTS.description, Fallback::Empty);
        assert_eq!(RESOURCE_DEFAULTS.name, Fallback::Empty);
        assert_eq!(RESOURCE_DEFAULTS.description, Fallback::Empty);
        assert_eq!(RESOURCE_DEFAULTS.mime_type, Fallback::Empty);
    }

    #[test]
    fn test_bare_prompt_gets_schema_safe_fields() {
        let entry = PromptEntry {
            name: "builtin-no-optional-fields".into(),
            ..Default::default()
        };
        let listing = normalize_prompt(entry, &PROMPT_DEFAULTS);

        assert_eq!(
            serde_json::to_value(&listing).unwrap(),
            serde_json::json!({
                "name": "builtin-no-optional-fields",
                "title": "builtin-no-optional-fields",
                "description": "",
                "arguments": []
            })
        );
    }

    #[test]
    fn test_present_and_empty_values_are_kept() {
        let entry = PromptEntry {
            name: "p".into(),
            title: Some(String::new()),
            description: Some("Does things".into()),
            arguments: Some(vec![]),
        };
        let listing = normalize_prompt(entry, &PROMPT_DEFAULTS);
        assert_eq!(listing.title, "");
        assert_eq!(listing.description, "Does things");
    }

    #[test]
    fn test_bare_resource_gets_empty_strings() {
        let listing = normalize_resource(
            ResourceEntry {
                uri: "resource://docs/readme".into(),
                ..Default::default()
            },
            &RESOURCE_DEFAULTS,
        );

        assert_eq!(
            serde_json::to_value(&listing).unwrap(),
            serde_json::json!({
                "uri": "resource://docs/readme",
                "name": "",
                "description": "",
                "mimeType": ""
            })
        );
    }

    #[test]
    fn test_custom_defaults_table() {
        let defaults = ResourceDefaults {
            name: Fallback::Key,
            ..RESOURCE_DEFAULTS
        };
        let listing = normalize_resource(
            ResourceEntry {
                uri: "res://a".into(),
                ..Default::default()
            },
            &defaults,
        );
        assert_eq!(listing.name, "res://a");
    }

    #[test]
    fn test_protocol_prompt_has_every_optional_slot() {
        let prompt: rmcp::model::Prompt = normalize_prompt(
            PromptEntry {
                name: "summarize".into(),
                ..Default::default()
            },
            &PROMPT_DEFAULTS,
        )
        .into();

        assert_eq!(prompt.title.as_deref(), Some("summarize"));
        assert_eq!(prompt.description.as_deref(), Some(""));
        assert_eq!(prompt.arguments.map(|a| a.len()), Some(0));
    }
}
