//! Built-in prompt records.

use rmcp::model::PromptArgument;
use serde::{Deserialize, Serialize};

use crate::storage::{Record, enabled_by_default};

/// An operator-defined prompt stored in the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
    /// Opaque identifier assigned at creation.
    pub id: String,

    /// Unique, external-facing key.
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Template body with `{{variable}}` placeholders.
    pub template: String,

    /// Placeholders the template accepts, in declaration order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Vec<PromptArgumentSpec>>,

    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

/// Description of one template placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptArgumentSpec {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
}

impl PromptArgumentSpec {
    /// Whether the argument must be supplied when rendering.
    pub fn is_required(&self) -> bool {
        self.required.unwrap_or(false)
    }
}

impl From<PromptArgumentSpec> for PromptArgument {
    fn from(arg: PromptArgumentSpec) -> Self {
        PromptArgument {
            name: arg.name,
            title: arg.title,
            description: arg.description,
            required: arg.required,
        }
    }
}

/// Input for creating a prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPrompt {
    pub name: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub template: String,
    #[serde(default)]
    pub arguments: Option<Vec<PromptArgumentSpec>>,
    /// Defaults to `true` when omitted.
    #[serde(default)]
    pub enabled: Option<bool>,
}

impl NewPrompt {
    /// A draft with only the required fields set.
    pub fn new(name: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            template: template.into(),
            ..Default::default()
        }
    }
}

/// Partial update for a prompt. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub template: Option<String>,
    #[serde(default)]
    pub arguments: Option<Vec<PromptArgumentSpec>>,
    #[serde(default)]
    pub enabled: Option<bool>,
}

impl Record for Prompt {
    const KIND: &'static str = "prompt";
    const KEY_FIELD: &'static str = "name";
    const COLLECTION: &'static str = "prompts";

    type Draft = NewPrompt;
    type Patch = PromptPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn key(&self) -> &str {
        &self.name
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn draft_key(draft: &NewPrompt) -> &str {
        &draft.name
    }

    fn patch_key(patch: &PromptPatch) -> Option<&str> {
        patch.name.as_deref()
    }

    fn from_draft(id: String, draft: NewPrompt) -> Self {
        Self {
            id,
            name: draft.name,
            title: draft.title,
            description: draft.description,
            template: draft.template,
            arguments: draft.arguments,
            enabled: draft.enabled.unwrap_or(true),
        }
    }

    fn apply(&mut self, patch: PromptPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(title) = patch.title {
            self.title = Some(title);
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
        if let Some(template) = patch.template {
            self.template = template;
        }
        if let Some(arguments) = patch.arguments {
            self.arguments = Some(arguments);
        }
        if let Some(enabled) = patch.enabled {
            self.enabled = enabled;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_enabled_reads_as_true() {
        let prompt: Prompt = serde_json::from_str(
            r#"{"id":"p1","name":"summarize","template":"Summarize: {{text}}"}"#,
        )
        .unwrap();
        assert!(prompt.enabled);
        assert!(prompt.title.is_none());
        assert!(prompt.arguments.is_none());
    }

    #[test]
    fn test_serialization_keeps_field_names_and_omits_absent() {
        let prompt = Prompt::from_draft("p1".into(), NewPrompt::new("greet", "Hi {{who}}"));
        let value = serde_json::to_value(&prompt).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "id": "p1",
                "name": "greet",
                "template": "Hi {{who}}",
                "enabled": true
            })
        );
    }

    #[test]
    fn test_draft_enabled_flag_is_respected() {
        let mut draft = NewPrompt::new("off", "x");
        draft.enabled = Some(false);
        assert!(!Prompt::from_draft("p".into(), draft).enabled);
    }

    #[test]
    fn test_apply_only_touches_supplied_fields() {
        let mut prompt = Prompt::from_draft("p1".into(), NewPrompt::new("greet", "Hi"));
        prompt.apply(PromptPatch {
            description: Some("Says hi".into()),
            ..Default::default()
        });
        assert_eq!(prompt.name, "greet");
        assert_eq!(prompt.template, "Hi");
        assert_eq!(prompt.description.as_deref(), Some("Says hi"));
        assert!(prompt.enabled);
    }

    #[test]
    fn test_key_change_ignores_own_key() {
        let prompt = Prompt::from_draft("p1".into(), NewPrompt::new("greet", "Hi"));
        let same = PromptPatch {
            name: Some("greet".into()),
            ..Default::default()
        };
        let other = PromptPatch {
            name: Some("wave".into()),
            ..Default::default()
        };
        assert_eq!(prompt.key_change(&same), None);
        assert_eq!(prompt.key_change(&other), Some("wave"));
    }
}
