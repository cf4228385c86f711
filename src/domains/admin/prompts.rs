//! Built-in prompt endpoints.

use std::sync::Arc;

use tracing::{error, info};

use super::envelope::Reply;
use super::{Caller, is_blank, is_cleared};
use crate::domains::prompts::{NewPrompt, Prompt, PromptPatch};
use crate::storage::Registry;

const NOT_FOUND: &str = "Built-in prompt not found";

/// Controller for built-in prompts.
#[derive(Clone)]
pub struct PromptAdmin {
    registry: Arc<dyn Registry<Prompt>>,
}

impl PromptAdmin {
    pub fn new(registry: Arc<dyn Registry<Prompt>>) -> Self {
        Self { registry }
    }

    /// List every built-in prompt, enabled or not.
    pub async fn list(&self) -> Reply<Vec<Prompt>> {
        match self.registry.find_all().await {
            Ok(prompts) => Reply::ok(prompts),
            Err(e) => {
                error!("Error listing built-in prompts: {}", e);
                Reply::from_registry_error(&e)
            }
        }
    }

    pub async fn get(&self, id: &str) -> Reply<Prompt> {
        match self.registry.find_by_id(id).await {
            Ok(Some(prompt)) => Reply::ok(prompt),
            Ok(None) => Reply::not_found(NOT_FOUND),
            Err(e) => {
                error!("Error getting built-in prompt {}: {}", id, e);
                Reply::from_registry_error(&e)
            }
        }
    }

    /// Create a prompt. `name` and `template` are required; `enabled`
    /// defaults to true.
    pub async fn create(&self, caller: &Caller, body: PromptPatch) -> Reply<Prompt> {
        if !caller.privileged {
            return Reply::forbidden();
        }

        let (Some(name), Some(template)) = (body.name, body.template) else {
            return Reply::bad_request("name and template are required");
        };
        if is_blank(Some(&name)) || is_blank(Some(&template)) {
            return Reply::bad_request("name and template are required");
        }

        let draft = NewPrompt {
            name,
            title: body.title,
            description: body.description,
            template,
            arguments: body.arguments,
            enabled: Some(body.enabled.unwrap_or(true)),
        };

        match self.registry.create(draft).await {
            Ok(prompt) => {
                info!("Created built-in prompt '{}'", prompt.name);
                Reply::created(prompt)
            }
            Err(e) => {
                error!("Error creating built-in prompt: {}", e);
                Reply::from_registry_error(&e)
            }
        }
    }

    pub async fn update(&self, caller: &Caller, id: &str, patch: PromptPatch) -> Reply<Prompt> {
        if !caller.privileged {
            return Reply::forbidden();
        }
        if is_cleared(patch.name.as_deref()) || is_cleared(patch.template.as_deref()) {
            return Reply::bad_request("name and template cannot be empty");
        }

        match self.registry.update(id, patch).await {
            Ok(Some(prompt)) => Reply::ok(prompt),
            Ok(None) => Reply::not_found(NOT_FOUND),
            Err(e) => {
                error!("Error updating built-in prompt {}: {}", id, e);
                Reply::from_registry_error(&e)
            }
        }
    }

    pub async fn delete(&self, caller: &Caller, id: &str) -> Reply<()> {
        if !caller.privileged {
            return Reply::forbidden();
        }

        match self.registry.delete(id).await {
            Ok(true) => Reply::done("Built-in prompt deleted"),
            Ok(false) => Reply::not_found(NOT_FOUND),
            Err(e) => {
                error!("Error deleting built-in prompt {}: {}", id, e);
                Reply::from_registry_error(&e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::admin::{
        STATUS_BAD_REQUEST, STATUS_CONFLICT, STATUS_CREATED, STATUS_FORBIDDEN, STATUS_NOT_FOUND,
    };
    use crate::storage::Registries;

    fn admin() -> PromptAdmin {
        PromptAdmin::new(Registries::in_memory().unwrap().prompts())
    }

    fn body(name: &str, template: &str) -> PromptPatch {
        PromptPatch {
            name: Some(name.into()),
            template: Some(template.into()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_requires_privilege() {
        let reply = admin()
            .create(&Caller::anonymous(), body("summarize", "x"))
            .await;
        assert_eq!(reply.status, STATUS_FORBIDDEN);
    }

    #[tokio::test]
    async fn test_create_requires_name_and_template() {
        let admin = admin();
        let reply = admin
            .create(
                &Caller::admin(),
                PromptPatch {
                    name: Some("summarize".into()),
                    ..Default::default()
                },
            )
            .await;
        assert_eq!(reply.status, STATUS_BAD_REQUEST);
        assert!(admin.list().await.body.data.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_whitespace_only_name_is_rejected() {
        let admin = admin();
        let reply = admin.create(&Caller::admin(), body("   ", "x")).await;
        assert_eq!(reply.status, STATUS_BAD_REQUEST);

        let reply = admin.create(&Caller::admin(), body("summarize", " \n")).await;
        assert_eq!(reply.status, STATUS_BAD_REQUEST);
        assert!(admin.list().await.body.data.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_then_duplicate_is_conflict() {
        let admin = admin();
        let first = admin.create(&Caller::admin(), body("summarize", "x")).await;
        assert_eq!(first.status, STATUS_CREATED);
        assert!(first.body.data.unwrap().enabled);

        let second = admin.create(&Caller::admin(), body("summarize", "y")).await;
        assert_eq!(second.status, STATUS_CONFLICT);
        assert!(second.body.message.unwrap().contains("'summarize'"));
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_are_not_found() {
        let admin = admin();
        let update = admin
            .update(&Caller::admin(), "missing", PromptPatch::default())
            .await;
        assert_eq!(update.status, STATUS_NOT_FOUND);

        let delete = admin.delete(&Caller::admin(), "missing").await;
        assert_eq!(delete.status, STATUS_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_cannot_blank_required_fields() {
        let admin = admin();
        let created = admin
            .create(&Caller::admin(), body("summarize", "x"))
            .await
            .body
            .data
            .unwrap();

        let reply = admin
            .update(
                &Caller::admin(),
                &created.id,
                PromptPatch {
                    template: Some(String::new()),
                    ..Default::default()
                },
            )
            .await;
        assert_eq!(reply.status, STATUS_BAD_REQUEST);
        assert_eq!(admin.get(&created.id).await.body.data.unwrap().template, "x");
    }

    #[tokio::test]
    async fn test_reads_do_not_need_privilege() {
        let admin = admin();
        let created = admin
            .create(&Caller::admin(), body("summarize", "x"))
            .await
            .body
            .data
            .unwrap();

        assert!(admin.get(&created.id).await.is_success());
        assert_eq!(admin.list().await.body.data.unwrap().len(), 1);
    }
}
