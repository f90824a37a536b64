//! Request types for MCP tools.

use rmcp::schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetRecordRequest {
    #[schemars(
        description = "Feature reference like 'ACTIVATION-59' or requirement reference like 'ADT-123-1'"
    )]
    pub reference: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetPageRequest {
    #[schemars(description = "Page reference like 'ABC-N-213'")]
    pub reference: String,
    #[schemars(description = "Whether to include the parent page. Defaults to false.")]
    #[serde(default, rename = "includeParent")]
    pub include_parent: bool,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SearchDocumentsRequest {
    #[schemars(description = "Text to search for")]
    pub query: String,
    #[schemars(description = "Type of document to search. Defaults to 'Page'.")]
    #[serde(default, rename = "searchableType")]
    pub searchable_type: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetRecordRestRequest {
    #[schemars(description = "Feature reference like 'ACTIVATION-59'")]
    pub reference: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct UpdateFeatureRequest {
    #[schemars(description = "Feature reference like 'ACTIVATION-59'")]
    pub reference: String,
    #[schemars(
        description = "Fields to update. Standard attributes (name, workflow_status, release, due_date, ...) are set directly; any other key is sent as a custom field."
    )]
    pub fields: Map<String, Value>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ListFeaturesInReleaseRequest {
    #[schemars(description = "Release reference like 'PROJ-R-12'")]
    #[serde(rename = "releaseReference")]
    pub release_reference: String,
    #[schemars(description = "Features fetched per request. Defaults to 100.")]
    #[serde(default, rename = "perPage")]
    pub per_page: Option<u32>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ListReleasesRequest {
    #[schemars(description = "Workspace reference prefix like 'PROJ' (case-insensitive)")]
    #[serde(rename = "workspacePrefix")]
    pub workspace_prefix: String,
    #[schemars(description = "Only return releases whose name contains this text (case-insensitive)")]
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct UpdateReleaseRequest {
    #[schemars(description = "Release reference like 'PROJ-R-12'")]
    pub reference: String,
    #[schemars(
        description = "Fields to update. Standard attributes (name, start_date, release_date, ...) are set directly; any other key is sent as a custom field."
    )]
    pub fields: Map<String, Value>,
}
