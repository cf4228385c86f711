//! Prompt service implementation.
//!
//! Resolves `prompts/get` requests against the built-in prompt registry and
//! renders the stored template with the caller's arguments.

use std::collections::HashMap;
use std::sync::Arc;

use rmcp::model::{GetPromptResult, PromptMessage, PromptMessageRole};
use tracing::debug;

use super::error::PromptError;
use super::record::Prompt;
use super::templates::PromptTemplate;
use crate::storage::Registry;

/// Service for instantiating built-in prompts.
#[derive(Clone)]
pub struct PromptService {
    registry: Arc<dyn Registry<Prompt>>,
}

impl PromptService {
    pub fn new(registry: Arc<dyn Registry<Prompt>>) -> Self {
        Self { registry }
    }

    /// Get a prompt with arguments substituted.
    ///
    /// Disabled prompts are treated as missing.
    pub async fn get_prompt(
        &self,
        name: &str,
        arguments: Option<HashMap<String, String>>,
    ) -> Result<GetPromptResult, PromptError> {
        let prompt = self
            .registry
            .find_by_key(name)
            .await?
            .filter(|p| p.enabled)
            .ok_or_else(|| PromptError::not_found(name))?;

        let template = PromptTemplate::from(prompt);
        let arguments = arguments.unwrap_or_default();

        if let Some(missing) = template.missing_required(&arguments).first() {
            return Err(PromptError::missing_argument(*missing));
        }

        let content = template.render(&arguments)?;
        debug!("Rendered prompt '{}'", template.name);

        Ok(GetPromptResult {
            description: template.description.clone(),
            messages: vec![PromptMessage::new_text(PromptMessageRole::User, content)],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::prompts::{NewPrompt, PromptArgumentSpec};
    use crate::storage::Registries;

    async fn service_with(drafts: Vec<NewPrompt>) -> PromptService {
        let registries = Registries::in_memory().unwrap();
        for draft in drafts {
            registries.prompts().create(draft).await.unwrap();
        }
        PromptService::new(registries.prompts())
    }

    fn summarize() -> NewPrompt {
        let mut draft = NewPrompt::new("summarize", "Summarize: {{text}}");
        draft.description = Some("Summarize text".into());
        draft.arguments = Some(vec![PromptArgumentSpec {
            name: "text".into(),
            title: None,
            description: None,
            required: Some(true),
        }]);
        draft
    }

    #[tokio::test]
    async fn test_get_prompt_with_arguments() {
        let service = service_with(vec![summarize()]).await;

        let mut args = HashMap::new();
        args.insert("text".to_string(), "the report".to_string());

        let result = service.get_prompt("summarize", Some(args)).await.unwrap();
        assert_eq!(result.description.as_deref(), Some("Summarize text"));
        assert_eq!(result.messages.len(), 1);
    }

    #[tokio::test]
    async fn test_get_prompt_missing_required_argument() {
        let service = service_with(vec![summarize()]).await;

        let err = service.get_prompt("summarize", None).await.unwrap_err();
        assert!(matches!(err, PromptError::MissingArgument(ref arg) if arg == "text"));
    }

    #[tokio::test]
    async fn test_get_nonexistent_prompt() {
        let service = service_with(vec![]).await;

        let err = service.get_prompt("nonexistent", None).await.unwrap_err();
        assert!(matches!(err, PromptError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_disabled_prompt_is_not_served() {
        let mut draft = NewPrompt::new("hidden", "x");
        draft.enabled = Some(false);
        let service = service_with(vec![draft]).await;

        let err = service.get_prompt("hidden", None).await.unwrap_err();
        assert!(matches!(err, PromptError::NotFound(_)));
    }
}
