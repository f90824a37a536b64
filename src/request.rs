//! Request shapes for the two Aha! backends.
//!
//! Records (features, requirements, pages) and document search go through the
//! GraphQL API. Feature updates, release listings and product lookups go
//! through the REST API. Nothing here performs I/O; the [`Transport`] executes
//! what these builders describe.
//!
//! [`Transport`]: crate::client::Transport

use reqwest::Method;
use serde::Serialize;
use serde_json::{json, Value};

use crate::reference::{RecordKind, Reference};

const RECORD_FIELDS: &str = "referenceNum name description { markdownBody } workflowStatus { name }";
const PAGE_LINK_FIELDS: &str = "referenceNum name";

/// A GraphQL operation: query text plus variables.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphqlRequest {
    pub query: String,
    pub variables: Value,
    #[serde(skip)]
    root_field: &'static str,
}

impl GraphqlRequest {
    fn new(root_field: &'static str, query: impl Into<String>, variables: Value) -> Self {
        Self {
            query: query.into(),
            variables,
            root_field,
        }
    }

    /// Top-level field the response data is keyed by (`feature`, `page`, ...).
    pub fn root_field(&self) -> &'static str {
        self.root_field
    }
}

/// A REST call relative to `/api/v1`.
#[derive(Debug, Clone, PartialEq)]
pub struct RestRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl RestRequest {
    fn get(path: String) -> Self {
        Self {
            method: Method::GET,
            path,
            query: Vec::new(),
            body: None,
        }
    }

    fn put(path: String, body: Value) -> Self {
        Self {
            method: Method::PUT,
            path,
            query: Vec::new(),
            body: Some(body),
        }
    }

    fn param(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Value of a query parameter, if present.
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Options that change the shape of a record read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadOptions {
    /// Pages only: ask for the parent record at all.
    pub include_parent: bool,
}

// ============================================================
// GraphQL
// ============================================================

/// Build the read query for a classified reference.
pub fn read_query(reference: &Reference, options: ReadOptions) -> GraphqlRequest {
    match reference.kind() {
        RecordKind::Feature => feature_query(reference.as_str()),
        RecordKind::Requirement => requirement_query(reference.as_str()),
        RecordKind::Page => page_query(reference.as_str(), options.include_parent),
    }
}

pub fn feature_query(reference: &str) -> GraphqlRequest {
    GraphqlRequest::new(
        "feature",
        format!("query GetFeature($id: ID!) {{ feature(id: $id) {{ {RECORD_FIELDS} }} }}"),
        json!({ "id": reference }),
    )
}

pub fn requirement_query(reference: &str) -> GraphqlRequest {
    GraphqlRequest::new(
        "requirement",
        format!("query GetRequirement($id: ID!) {{ requirement(id: $id) {{ {RECORD_FIELDS} }} }}"),
        json!({ "id": reference }),
    )
}

/// The parent selection is only present when requested.
pub fn page_query(reference: &str, include_parent: bool) -> GraphqlRequest {
    let parent = if include_parent {
        format!(" parent {{ {PAGE_LINK_FIELDS} }}")
    } else {
        String::new()
    };
    GraphqlRequest::new(
        "page",
        format!(
            "query GetPage($id: ID!) {{ page(id: $id) {{ {RECORD_FIELDS} children {{ {PAGE_LINK_FIELDS} }}{parent} }} }}"
        ),
        json!({ "id": reference }),
    )
}

pub fn search_documents_query(query: &str, searchable_type: &str) -> GraphqlRequest {
    GraphqlRequest::new(
        "searchDocuments",
        "query SearchDocuments($query: String!, $searchableType: [String!]!) { \
         searchDocuments(filters: { query: $query, searchableType: $searchableType }) { \
         nodes { name url searchableId searchableType } \
         currentPage totalCount totalPages isLastPage } }",
        json!({ "query": query, "searchableType": [searchable_type] }),
    )
}

pub fn introspect_feature_query() -> GraphqlRequest {
    GraphqlRequest::new(
        "__type",
        "query IntrospectFeature { __type(name: \"Feature\") { \
         name kind description \
         fields { name description type { name kind ofType { name kind } } } } }",
        json!({}),
    )
}

// ============================================================
// REST
// ============================================================

pub fn get_feature(reference: &Reference) -> RestRequest {
    RestRequest::get(format!("/features/{}", encode_segment(reference.as_str())))
}

pub fn update_feature(reference: &Reference, body: Value) -> RestRequest {
    RestRequest::put(
        format!("/features/{}", encode_segment(reference.as_str())),
        body,
    )
}

pub fn release_features_page(release: &str, page: u32, per_page: u32) -> RestRequest {
    RestRequest::get(format!("/releases/{}/features", encode_segment(release)))
        .param("page", page)
        .param("per_page", per_page)
}

pub fn products_page(page: u32) -> RestRequest {
    RestRequest::get("/products".to_string()).param("page", page)
}

pub fn product_releases_page(product_id: &str, page: u32) -> RestRequest {
    RestRequest::get(format!("/products/{}/releases", encode_segment(product_id)))
        .param("page", page)
}

pub fn update_release(reference: &str, body: Value) -> RestRequest {
    RestRequest::put(format!("/releases/{}", encode_segment(reference)), body)
}

/// Percent-encode a single path segment.
fn encode_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_reserved_characters_in_segments() {
        assert_eq!(encode_segment("PROJ-R-1"), "PROJ-R-1");
        assert_eq!(encode_segment("a/b c"), "a%2Fb%20c");
    }

    #[test]
    fn root_field_names_the_response_key() {
        assert_eq!(feature_query("A-1").root_field(), "feature");
        assert_eq!(requirement_query("A-1-1").root_field(), "requirement");
        assert_eq!(page_query("A-N-1", false).root_field(), "page");
        assert_eq!(
            search_documents_query("x", "Page").root_field(),
            "searchDocuments"
        );
        assert_eq!(introspect_feature_query().root_field(), "__type");
    }
}
