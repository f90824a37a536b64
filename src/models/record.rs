use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::reference::RecordKind;

/// A feature or requirement as returned by the GraphQL API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub reference_num: Option<String>,
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Description>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_status: Option<NamedRef>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Description {
    pub markdown_body: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedRef {
    pub name: Option<String>,
}

/// A resolved record tagged with its kind.
///
/// Serializes as `{"feature": {...}}` or `{"requirement": {...}}`.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRecord {
    pub kind: RecordKind,
    pub record: Record,
}

impl Serialize for ResolvedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.kind.as_str(), &self.record)?;
        map.end()
    }
}

/// A knowledge-base page (note).
///
/// `parent` is only present when it was requested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub reference_num: Option<String>,
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Description>,
    #[serde(default)]
    pub children: Vec<PageLink>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<PageLink>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageLink {
    pub reference_num: Option<String>,
    pub name: Option<String>,
}

/// One page of document search results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    #[serde(default)]
    pub nodes: Vec<SearchNode>,
    pub current_page: Option<u32>,
    pub total_count: Option<u64>,
    pub total_pages: Option<u32>,
    pub is_last_page: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchNode {
    pub name: Option<String>,
    pub url: Option<String>,
    pub searchable_id: Option<String>,
    pub searchable_type: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
