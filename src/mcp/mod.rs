//! MCP server exposing Aha! records to AI agents.

mod types;

use std::sync::Arc;

pub use types::*;

use rmcp::{
    handler::server::{tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, ServerInfo},
    tool, tool_handler, tool_router,
    transport::streamable_http_server::{
        session::local::LocalSessionManager, StreamableHttpService,
    },
    ErrorData as McpError, ServerHandler, ServiceExt,
};
use serde::Serialize;
use tower_http::trace::TraceLayer;

use crate::client::{AhaClient, ClientError, Transport};
use crate::config::Config;
use crate::error::{Lookup, ServiceError};
use crate::service::RecordService;

#[derive(Clone)]
pub struct McpServer {
    service: RecordService,
    tool_router: ToolRouter<Self>,
}

impl McpServer {
    pub fn new(service: RecordService) -> Self {
        Self {
            service,
            tool_router: Self::tool_router(),
        }
    }

    /// Server backed by the real Aha! HTTP client.
    pub fn from_config(config: &Config) -> Result<Self, ClientError> {
        let transport: Arc<dyn Transport> = Arc::new(AhaClient::new(config)?);
        Ok(Self::new(RecordService::new(transport)))
    }
}

/// Pretty JSON tool result.
fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(e.to_string(), None))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}

/// Found values become JSON; not-found is a successful plain-text result.
fn lookup_result<T: Serialize>(lookup: Lookup<T>) -> Result<CallToolResult, McpError> {
    match lookup {
        Lookup::Found(value) => json_result(&value),
        Lookup::NotFound(message) => Ok(CallToolResult::success(vec![Content::text(message)])),
    }
}

fn tool_err(tool: &'static str) -> impl FnOnce(ServiceError) -> McpError {
    move |err| {
        tracing::warn!(tool, error = %err, "tool call failed");
        err.into()
    }
}

#[tool_router]
impl McpServer {
    // ============================================================
    // Records (GraphQL)
    // ============================================================

    #[tool(
        description = "Get an Aha! feature or requirement by reference. Feature references look like 'ACTIVATION-59', requirement references like 'ADT-123-1'. Returns the record name, description and workflow status."
    )]
    async fn get_record(
        &self,
        params: Parameters<GetRecordRequest>,
    ) -> Result<CallToolResult, McpError> {
        let req = params.0;

        let lookup = self
            .service
            .get_record(&req.reference)
            .await
            .map_err(tool_err("get_record"))?;

        lookup_result(lookup)
    }

    #[tool(
        description = "Get an Aha! knowledge-base page by reference, e.g. 'ABC-N-213'. Returns the page content and its child pages. Set includeParent=true to also return the parent page."
    )]
    async fn get_page(&self, params: Parameters<GetPageRequest>) -> Result<CallToolResult, McpError> {
        let req = params.0;

        let lookup = self
            .service
            .get_page(&req.reference, req.include_parent)
            .await
            .map_err(tool_err("get_page"))?;

        lookup_result(lookup)
    }

    #[tool(
        description = "Search Aha! documents by text. searchableType defaults to 'Page'. Returns matching nodes (name, url, searchableId, searchableType) with pagination info."
    )]
    async fn search_documents(
        &self,
        params: Parameters<SearchDocumentsRequest>,
    ) -> Result<CallToolResult, McpError> {
        let req = params.0;

        let results = self
            .service
            .search_documents(&req.query, req.searchable_type.as_deref())
            .await
            .map_err(tool_err("search_documents"))?;

        json_result(&results)
    }

    #[tool(
        description = "Introspect the Aha! GraphQL Feature type. Returns the raw schema description of its fields and their types."
    )]
    async fn introspect_feature(&self) -> Result<CallToolResult, McpError> {
        let schema = self
            .service
            .introspect_feature()
            .await
            .map_err(tool_err("introspect_feature"))?;

        json_result(&schema)
    }

    // ============================================================
    // Features (REST)
    // ============================================================

    #[tool(
        description = "Get the full REST payload of an Aha! feature by reference, e.g. 'ACTIVATION-59'. Includes custom fields, integration fields and other attributes not exposed by get_record."
    )]
    async fn get_record_rest(
        &self,
        params: Parameters<GetRecordRestRequest>,
    ) -> Result<CallToolResult, McpError> {
        let req = params.0;

        let feature = self
            .service
            .get_record_rest(&req.reference)
            .await
            .map_err(tool_err("get_record_rest"))?;

        json_result(&feature)
    }

    #[tool(
        description = "Update an Aha! feature. Pass the feature reference and a non-empty 'fields' object. Standard attributes (name, description, workflow_status, release, assigned_to_user, tags, start_date, due_date, ...) are set directly; any other key is treated as a custom field. Returns the updated feature."
    )]
    async fn update_feature(
        &self,
        params: Parameters<UpdateFeatureRequest>,
    ) -> Result<CallToolResult, McpError> {
        let req = params.0;

        let feature = self
            .service
            .update_feature(&req.reference, &req.fields)
            .await
            .map_err(tool_err("update_feature"))?;

        json_result(&feature)
    }

    // ============================================================
    // Releases (REST)
    // ============================================================

    #[tool(
        description = "List every feature in an Aha! release, following pagination. Returns total_count and the feature summaries (id, reference_num, name, created_at, url)."
    )]
    async fn list_features_in_release(
        &self,
        params: Parameters<ListFeaturesInReleaseRequest>,
    ) -> Result<CallToolResult, McpError> {
        let req = params.0;

        let features = self
            .service
            .list_features_in_release(&req.release_reference, req.per_page)
            .await
            .map_err(tool_err("list_features_in_release"))?;

        json_result(&features)
    }

    #[tool(
        description = "List releases of an Aha! workspace identified by its reference prefix (case-insensitive), optionally filtered by a case-insensitive substring of the release name. If no workspace matches, the known prefixes are listed."
    )]
    async fn list_releases(
        &self,
        params: Parameters<ListReleasesRequest>,
    ) -> Result<CallToolResult, McpError> {
        let req = params.0;

        let lookup = self
            .service
            .list_releases(&req.workspace_prefix, req.name.as_deref())
            .await
            .map_err(tool_err("list_releases"))?;

        lookup_result(lookup)
    }

    #[tool(
        description = "Update an Aha! release. Pass the release reference and a non-empty 'fields' object. Standard attributes (name, start_date, release_date, development_started_on, parking_lot, ...) are set directly; any other key is treated as a custom field."
    )]
    async fn update_release(
        &self,
        params: Parameters<UpdateReleaseRequest>,
    ) -> Result<CallToolResult, McpError> {
        let req = params.0;

        let update = self
            .service
            .update_release(&req.reference, &req.fields)
            .await
            .map_err(tool_err("update_release"))?;

        json_result(&update)
    }
}

#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: rmcp::model::Implementation {
                name: "aha-mcp".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                title: None,
                icons: None,
                website_url: None,
            },
            capabilities: rmcp::model::ServerCapabilities::builder()
                .enable_tools()
                .build(),
            instructions: Some(
                r#"Aha! product management data: features, requirements, pages, releases.

REFERENCES:
- Feature: PREFIX-123 (e.g. ACTIVATION-59)
- Requirement: PREFIX-123-1 (e.g. ADT-123-1)
- Page: PREFIX-N-123 (e.g. ABC-N-213)
References are case sensitive. A malformed reference is an error; a well-formed
reference with no record behind it returns a "No ... found" message instead.

READING:
- get_record: feature or requirement summary
- get_page: knowledge-base page, includeParent=true for its parent
- search_documents: full-text search, searchableType defaults to Page
- get_record_rest: full feature payload including custom fields
- introspect_feature: field list of the GraphQL Feature type

RELEASES:
- list_releases: releases of a workspace prefix, optional name filter
- list_features_in_release: every feature scheduled in a release

WRITING:
- update_feature / update_release: 'fields' must not be empty. Unknown keys
  are written as custom fields."#
                    .into(),
            ),
            ..Default::default()
        }
    }
}

pub async fn run_stdio_server(server: McpServer) -> anyhow::Result<()> {
    use tokio::io::{stdin, stdout};

    tracing::info!("Starting MCP server via stdio");

    let running = server.serve((stdin(), stdout())).await?;

    let quit_reason = running.waiting().await?;
    tracing::info!("MCP server stopped: {:?}", quit_reason);

    Ok(())
}

/// Router serving MCP streamable HTTP at `/mcp`.
pub fn http_router(server: McpServer) -> axum::Router {
    let service = StreamableHttpService::new(
        move || Ok(server.clone()),
        LocalSessionManager::default().into(),
        Default::default(),
    );

    axum::Router::new()
        .nest_service("/mcp", service)
        .layer(TraceLayer::new_for_http())
}
