//! MCP server handler.
//!
//! Prompt and resource requests are answered from the built-in registries
//! through the listing, prompt and resource services. The server exposes no
//! tools.

use std::collections::HashMap;
use std::sync::Arc;

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler, model::*, service::RequestContext,
};
use serde_json::Value;
use tracing::{info, instrument, warn};

use super::config::Config;
use crate::domains::listing::{ExternalCatalog, ListingContext, ListingService};
use crate::domains::prompts::{PromptError, PromptService};
use crate::domains::resources::{ResourceError, ResourceService};
use crate::storage::{Registries, RegistryError};

/// The main MCP server handler.
///
/// Cheap to clone; every transport session gets its own clone sharing the
/// same registries.
#[derive(Clone)]
pub struct McpServer {
    config: Arc<Config>,
    session_id: Option<String>,
    listing: ListingService,
    prompts: PromptService,
    resources: ResourceService,
}

impl McpServer {
    /// Create a server listing only registry entries.
    pub fn new(config: Config, registries: &Registries) -> Self {
        Self::from_parts(config, registries, ListingService::new(registries))
    }

    /// Create a server whose listings also include entries from `catalog`.
    pub fn with_catalog(
        config: Config,
        registries: &Registries,
        catalog: Arc<dyn ExternalCatalog>,
    ) -> Self {
        Self::from_parts(
            config,
            registries,
            ListingService::with_catalog(registries, catalog),
        )
    }

    fn from_parts(config: Config, registries: &Registries, listing: ListingService) -> Self {
        Self {
            config: Arc::new(config),
            session_id: None,
            listing,
            prompts: PromptService::new(registries.prompts()),
            resources: ResourceService::new(registries.resources()),
        }
    }

    /// A clone of this server bound to one transport session.
    pub fn for_session(&self, session_id: impl Into<String>) -> Self {
        Self {
            session_id: Some(session_id.into()),
            ..self.clone()
        }
    }

    /// Who a listing is produced for: this server's session plus the
    /// optional `group` the client put in the request's `_meta`.
    pub fn listing_context(&self, meta: &Meta) -> ListingContext {
        ListingContext {
            session_id: self.session_id.clone(),
            group: meta
                .get(GROUP_META_KEY)
                .and_then(Value::as_str)
                .map(str::to_owned),
        }
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// All listed prompts, as protocol types.
    pub async fn prompt_list(&self, context: &ListingContext) -> Result<Vec<Prompt>, McpError> {
        let listings = self
            .listing
            .list_prompts(context)
            .await
            .map_err(registry_failure)?;
        Ok(listings.into_iter().map(Prompt::from).collect())
    }

    /// All listed resources, as protocol types.
    pub async fn resource_list(
        &self,
        context: &ListingContext,
    ) -> Result<Vec<Resource>, McpError> {
        let listings = self
            .listing
            .list_resources(context)
            .await
            .map_err(registry_failure)?;
        Ok(listings.into_iter().map(Resource::from).collect())
    }

    /// Render a built-in prompt.
    pub async fn render_prompt(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> Result<GetPromptResult, McpError> {
        self.prompts
            .get_prompt(name, arguments.map(string_arguments))
            .await
            .map_err(prompt_failure)
    }

    /// Read a built-in resource.
    pub async fn read_builtin_resource(&self, uri: &str) -> Result<ReadResourceResult, McpError> {
        self.resources
            .read_resource(uri)
            .await
            .map_err(resource_failure)
    }
}

/// Request `_meta` key naming the server group a listing is scoped to.
pub const GROUP_META_KEY: &str = "group";

/// Flatten JSON prompt arguments into template variables.
///
/// Strings are taken as-is and other scalars by their JSON text; `null`,
/// arrays and objects are dropped.
fn string_arguments(arguments: JsonObject) -> HashMap<String, String> {
    arguments
        .into_iter()
        .filter_map(|(key, value)| match value {
            Value::String(s) => Some((key, s)),
            Value::Number(n) => Some((key, n.to_string())),
            Value::Bool(b) => Some((key, b.to_string())),
            _ => None,
        })
        .collect()
}

fn registry_failure(err: RegistryError) -> McpError {
    warn!("Registry failure: {}", err);
    McpError::internal_error(err.to_string(), None)
}

fn prompt_failure(err: PromptError) -> McpError {
    match err {
        PromptError::Registry(err) => registry_failure(err),
        other => McpError::invalid_params(other.to_string(), None),
    }
}

fn resource_failure(err: ResourceError) -> McpError {
    match err {
        ResourceError::Registry(err) => registry_failure(err),
        ResourceError::NotFound(_) => McpError::resource_not_found(err.to_string(), None),
    }
}

impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Serves operator-defined built-in prompts and resources.".to_string(),
            ),
            capabilities: ServerCapabilities::builder()
                .enable_resources()
                .enable_prompts()
                .build(),
            server_info: Implementation {
                name: self.config.server.name.clone(),
                version: self.config.server.version.clone(),
                ..Implementation::from_build_env()
            },
            ..Default::default()
        }
    }

    #[instrument(skip(self, context))]
    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        info!("Listing resources");
        let resources = self
            .resource_list(&self.listing_context(&context.meta))
            .await?;
        Ok(ListResourcesResult {
            resources,
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip(self, _context))]
    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        info!("Reading resource: {}", request.uri);
        self.read_builtin_resource(&request.uri).await
    }

    #[instrument(skip(self, context))]
    async fn list_prompts(
        &self,
        _request: Option<PaginatedRequestParam>,
        context: RequestContext<RoleServer>,
    ) -> Result<ListPromptsResult, McpError> {
        info!("Listing prompts");
        let prompts = self
            .prompt_list(&self.listing_context(&context.meta))
            .await?;
        Ok(ListPromptsResult {
            prompts,
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip(self, _context))]
    async fn get_prompt(
        &self,
        request: GetPromptRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<GetPromptResult, McpError> {
        info!("Getting prompt: {}", request.name);
        self.render_prompt(&request.name, request.arguments).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::listing::{ResourceEntry, StaticCatalog};
    use crate::domains::prompts::{NewPrompt, PromptArgumentSpec};
    use crate::domains::resources::NewResource;

    async fn seeded() -> Registries {
        let registries = Registries::in_memory().unwrap();

        let mut summarize = NewPrompt::new("summarize", "Summarize in {{words}} words: {{text}}");
        summarize.arguments = Some(vec![
            PromptArgumentSpec {
                name: "text".into(),
                title: None,
                description: None,
                required: Some(true),
            },
            PromptArgumentSpec {
                name: "words".into(),
                title: None,
                description: None,
                required: None,
            },
        ]);
        registries.prompts().create(summarize).await.unwrap();

        registries
            .resources()
            .create(NewResource::new("res://a", "hi"))
            .await
            .unwrap();
        registries
    }

    #[tokio::test]
    async fn test_info_advertises_prompts_and_resources_only() {
        let registries = Registries::in_memory().unwrap();
        let server = McpServer::new(Config::default(), &registries);
        let info = server.get_info();

        assert!(info.capabilities.prompts.is_some());
        assert!(info.capabilities.resources.is_some());
        assert!(info.capabilities.tools.is_none());
        assert_eq!(info.server_info.name, server.name());
    }

    #[tokio::test]
    async fn test_prompt_list_fills_defaults() {
        let server = McpServer::new(Config::default(), &seeded().await);
        let prompts = server.prompt_list(&ListingContext::default()).await.unwrap();

        assert_eq!(prompts.len(), 1);
        assert_eq!(prompts[0].name, "summarize");
        assert_eq!(prompts[0].title.as_deref(), Some("summarize"));
        assert_eq!(prompts[0].description.as_deref(), Some(""));
        assert_eq!(prompts[0].arguments.as_ref().map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn test_resource_list_appends_external_entries() {
        let catalog = StaticCatalog {
            prompts: vec![],
            resources: vec![ResourceEntry {
                uri: "upstream://x".into(),
                ..Default::default()
            }],
        };
        let server =
            McpServer::with_catalog(Config::default(), &seeded().await, Arc::new(catalog));

        let resources = server
            .resource_list(&ListingContext::default())
            .await
            .unwrap();
        let uris: Vec<&str> = resources.iter().map(|r| r.raw.uri.as_str()).collect();
        assert_eq!(uris, vec!["res://a", "upstream://x"]);
    }

    #[tokio::test]
    async fn test_listing_context_carries_session_and_group() {
        let server = McpServer::new(Config::default(), &seeded().await);
        assert_eq!(server.listing_context(&Meta::new()), ListingContext::default());

        let session = server.for_session("127.0.0.1:50123");
        let mut meta = Meta::new();
        meta.insert(GROUP_META_KEY.into(), Value::String("ops".into()));

        let context = session.listing_context(&meta);
        assert_eq!(context.session_id.as_deref(), Some("127.0.0.1:50123"));
        assert_eq!(context.group.as_deref(), Some("ops"));
    }

    #[tokio::test]
    async fn test_external_catalog_sees_request_context() {
        use async_trait::async_trait;
        use crate::domains::listing::{PromptEntry, ResourceEntry};

        struct GroupCatalog;

        #[async_trait]
        impl ExternalCatalog for GroupCatalog {
            async fn prompts(&self, context: &ListingContext) -> Vec<PromptEntry> {
                context
                    .group
                    .iter()
                    .map(|group| PromptEntry {
                        name: format!("{group}-prompt"),
                        ..Default::default()
                    })
                    .collect()
            }

            async fn resources(&self, _context: &ListingContext) -> Vec<ResourceEntry> {
                Vec::new()
            }
        }

        let server = McpServer::with_catalog(
            Config::default(),
            &seeded().await,
            Arc::new(GroupCatalog),
        );
        let mut meta = Meta::new();
        meta.insert(GROUP_META_KEY.into(), Value::String("ops".into()));

        let prompts = server
            .prompt_list(&server.listing_context(&meta))
            .await
            .unwrap();
        let names: Vec<&str> = prompts.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["summarize", "ops-prompt"]);
    }

    #[tokio::test]
    async fn test_render_prompt_accepts_scalar_arguments() {
        let server = McpServer::new(Config::default(), &seeded().await);
        let mut arguments = JsonObject::new();
        arguments.insert("text".into(), Value::String("the report".into()));
        arguments.insert("words".into(), Value::from(50));

        let result = server
            .render_prompt("summarize", Some(arguments))
            .await
            .unwrap();
        assert_eq!(result.messages.len(), 1);
        match &result.messages[0].content {
            PromptMessageContent::Text { text } => {
                assert_eq!(text, "Summarize in 50 words: the report");
            }
            other => panic!("unexpected content: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_render_prompt_missing_argument_is_invalid_params() {
        let server = McpServer::new(Config::default(), &seeded().await);
        let err = server.render_prompt("summarize", None).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
        assert!(err.message.contains("text"));
    }

    #[tokio::test]
    async fn test_unknown_resource_is_resource_not_found() {
        let server = McpServer::new(Config::default(), &seeded().await);
        let err = server
            .read_builtin_resource("res://missing")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::RESOURCE_NOT_FOUND);

        let found = server.read_builtin_resource("res://a").await.unwrap();
        assert_eq!(found.contents.len(), 1);
    }
}
