//! Record resolution: one method per tool.
//!
//! Each operation validates its arguments, picks the request shape for the
//! record kind, runs it through the [`Transport`] and normalizes the answer.
//! A well-formed reference that resolves to nothing is reported as
//! [`Lookup::NotFound`], never as an error.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::client::{ClientError, Transport};
use crate::error::{Lookup, ServiceError};
use crate::fields;
use crate::models::*;
use crate::paginate::{paginate, Batch};
use crate::reference::{RecordKind, Reference};
use crate::request::{self, GraphqlRequest, ReadOptions};

pub const DEFAULT_SEARCHABLE_TYPE: &str = "Page";
pub const DEFAULT_PER_PAGE: u32 = 100;

const FETCH_RECORD: &str = "Failed to fetch record";
const FETCH_PAGE: &str = "Failed to fetch page";
const SEARCH_DOCUMENTS: &str = "Failed to search documents";
const INTROSPECT_FEATURE: &str = "Failed to introspect Feature type";
const FETCH_FEATURE_REST: &str = "Failed to fetch feature via REST";
const UPDATE_FEATURE: &str = "Failed to update feature";
const LIST_RELEASE_FEATURES: &str = "Failed to list features in release";
const LIST_RELEASES: &str = "Failed to list releases";
const UPDATE_RELEASE: &str = "Failed to update release";

#[derive(Clone)]
pub struct RecordService {
    transport: Arc<dyn Transport>,
}

impl RecordService {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    // ============================================================
    // GraphQL reads
    // ============================================================

    /// Fetch a feature or requirement by reference.
    pub async fn get_record(&self, reference: &str) -> Result<Lookup<ResolvedRecord>, ServiceError> {
        let reference = parse_reference(
            require("reference", reference)?,
            &[RecordKind::Feature, RecordKind::Requirement],
        )?;
        let request = request::read_query(&reference, ReadOptions::default());

        let data = self
            .transport
            .graphql(&request)
            .await
            .map_err(ServiceError::upstream(FETCH_RECORD))?;

        match take_root::<Record>(data, &request, FETCH_RECORD)? {
            Some(record) => Ok(Lookup::Found(ResolvedRecord {
                kind: reference.kind(),
                record,
            })),
            None => Ok(not_found(format!(
                "No record found for reference {}",
                reference
            ))),
        }
    }

    /// Fetch a page, asking for its parent only when `include_parent` is set.
    pub async fn get_page(
        &self,
        reference: &str,
        include_parent: bool,
    ) -> Result<Lookup<Page>, ServiceError> {
        let reference = parse_reference(require("reference", reference)?, &[RecordKind::Page])?;
        let request = request::read_query(&reference, ReadOptions { include_parent });

        let data = self
            .transport
            .graphql(&request)
            .await
            .map_err(ServiceError::upstream(FETCH_PAGE))?;

        match take_root::<Page>(data, &request, FETCH_PAGE)? {
            Some(page) => Ok(Lookup::Found(page)),
            None => Ok(not_found(format!("No page found for reference {}", reference))),
        }
    }

    /// Full-text document search. No hits is an empty `nodes` list.
    pub async fn search_documents(
        &self,
        query: &str,
        searchable_type: Option<&str>,
    ) -> Result<SearchResults, ServiceError> {
        let query = require("query", query)?;
        let searchable_type = searchable_type
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_SEARCHABLE_TYPE);
        let request = request::search_documents_query(query, searchable_type);

        let data = self
            .transport
            .graphql(&request)
            .await
            .map_err(ServiceError::upstream(SEARCH_DOCUMENTS))?;

        Ok(take_root::<SearchResults>(data, &request, SEARCH_DOCUMENTS)?.unwrap_or_default())
    }

    /// Raw introspection of the GraphQL `Feature` type.
    pub async fn introspect_feature(&self) -> Result<Value, ServiceError> {
        self.transport
            .graphql(&request::introspect_feature_query())
            .await
            .map_err(ServiceError::upstream(INTROSPECT_FEATURE))
    }

    // ============================================================
    // REST features
    // ============================================================

    /// Raw REST payload for a feature. A backend 404 is an upstream error here.
    pub async fn get_record_rest(&self, reference: &str) -> Result<Value, ServiceError> {
        let reference = parse_reference(require("reference", reference)?, &[RecordKind::Feature])?;

        self.transport
            .rest(&request::get_feature(&reference))
            .await
            .map_err(ServiceError::upstream(FETCH_FEATURE_REST))
    }

    /// Update a feature; unknown keys are sent as custom fields.
    pub async fn update_feature(
        &self,
        reference: &str,
        fields: &Map<String, Value>,
    ) -> Result<Value, ServiceError> {
        let reference = parse_reference(require("reference", reference)?, &[RecordKind::Feature])?;
        require_fields(fields)?;

        let partition = fields::partition_feature_fields(fields);
        tracing::debug!(
            reference = %reference,
            standard = partition.standard.len(),
            custom = partition.extension.len(),
            "updating feature"
        );

        self.transport
            .rest(&request::update_feature(&reference, partition.into_body("feature")))
            .await
            .map_err(ServiceError::upstream(UPDATE_FEATURE))
    }

    // ============================================================
    // REST releases
    // ============================================================

    /// Every feature in a release, across all pages.
    pub async fn list_features_in_release(
        &self,
        release_reference: &str,
        per_page: Option<u32>,
    ) -> Result<ReleaseFeatures, ServiceError> {
        let release = require("releaseReference", release_reference)?;
        let per_page = per_page.unwrap_or(DEFAULT_PER_PAGE);

        let transport = &self.transport;
        let features: Vec<FeatureSummary> = paginate(|page| {
            let req = request::release_features_page(release, page, per_page);
            async move { Batch::from_envelope(transport.rest(&req).await?, "features") }
        })
        .await
        .map_err(ServiceError::upstream(LIST_RELEASE_FEATURES))?;

        Ok(ReleaseFeatures {
            total_count: features.len(),
            features,
        })
    }

    /// Releases of the workspace whose prefix matches, ignoring case.
    pub async fn list_releases(
        &self,
        workspace_prefix: &str,
        name: Option<&str>,
    ) -> Result<Lookup<ReleaseListing>, ServiceError> {
        let prefix = require("workspacePrefix", workspace_prefix)?;
        let transport = &self.transport;

        let products: Vec<Product> = paginate(|page| {
            let req = request::products_page(page);
            async move { Batch::from_envelope(transport.rest(&req).await?, "products") }
        })
        .await
        .map_err(ServiceError::upstream(LIST_RELEASES))?;

        let Some(product) = find_workspace(&products, prefix).cloned() else {
            return Ok(not_found(format!(
                "No workspace found with prefix '{}'. Available prefixes: {}",
                prefix,
                known_prefixes(&products)
            )));
        };

        let releases: Vec<Release> = paginate(|page| {
            let req = request::product_releases_page(&product.id, page);
            async move { Batch::from_envelope(transport.rest(&req).await?, "releases") }
        })
        .await
        .map_err(ServiceError::upstream(LIST_RELEASES))?;

        let releases: Vec<ReleaseSummary> = filter_by_name(releases, name)
            .into_iter()
            .map(ReleaseSummary::from)
            .collect();

        Ok(Lookup::Found(ReleaseListing {
            workspace: product.into(),
            total_count: releases.len(),
            releases,
        }))
    }

    /// Update a release; unknown keys are sent as custom fields.
    pub async fn update_release(
        &self,
        reference: &str,
        fields: &Map<String, Value>,
    ) -> Result<ReleaseUpdate, ServiceError> {
        let reference = require("reference", reference)?;
        require_fields(fields)?;

        let partition = fields::partition_release_fields(fields);
        let mut body = self
            .transport
            .rest(&request::update_release(reference, partition.into_body("release")))
            .await
            .map_err(ServiceError::upstream(UPDATE_RELEASE))?;

        let release = match body.get_mut("release").map(Value::take) {
            Some(inner) => inner,
            None => body,
        };
        Ok(ReleaseUpdate {
            message: format!("Release {} updated successfully", reference),
            release,
        })
    }
}

// ============================================================
// Helpers
// ============================================================

/// A required string argument, rejected when blank and otherwise passed on as given.
fn require<'a>(name: &str, value: &'a str) -> Result<&'a str, ServiceError> {
    if value.trim().is_empty() {
        return Err(ServiceError::invalid(format!("{} is required", name)));
    }
    Ok(value)
}

fn require_fields(fields: &Map<String, Value>) -> Result<(), ServiceError> {
    if fields.is_empty() {
        return Err(ServiceError::invalid(
            "fields must contain at least one field to update",
        ));
    }
    Ok(())
}

/// Classify `value` and check it names one of the `allowed` kinds.
fn parse_reference(value: &str, allowed: &[RecordKind]) -> Result<Reference, ServiceError> {
    let invalid = || {
        let hints: Vec<_> = allowed.iter().map(RecordKind::format_hint).collect();
        ServiceError::invalid(format!(
            "Invalid reference '{}'. Expected {}",
            value,
            hints.join(" or ")
        ))
    };

    let reference = Reference::parse(value).map_err(|_| invalid())?;
    if !allowed.contains(&reference.kind()) {
        return Err(invalid());
    }
    tracing::debug!(reference = %reference, kind = %reference.kind(), "classified reference");
    Ok(reference)
}

/// Decode `data.<root>`; `None` when the backend answered with null.
fn take_root<T: DeserializeOwned>(
    mut data: Value,
    request: &GraphqlRequest,
    context: &'static str,
) -> Result<Option<T>, ServiceError> {
    let value = data
        .get_mut(request.root_field())
        .map(Value::take)
        .unwrap_or(Value::Null);
    if value.is_null() {
        return Ok(None);
    }
    serde_json::from_value(value)
        .map(Some)
        .map_err(|e| ServiceError::upstream(context)(ClientError::Decode(e.to_string())))
}

fn not_found<T>(message: String) -> Lookup<T> {
    tracing::debug!("{}", message);
    Lookup::NotFound(message)
}

fn find_workspace<'a>(products: &'a [Product], prefix: &str) -> Option<&'a Product> {
    let wanted = prefix.to_lowercase();
    products
        .iter()
        .find(|p| p.reference_prefix.to_lowercase() == wanted)
}

fn known_prefixes(products: &[Product]) -> String {
    let mut prefixes: Vec<&str> = products.iter().map(|p| p.reference_prefix.as_str()).collect();
    prefixes.sort_unstable();
    prefixes.dedup();
    if prefixes.is_empty() {
        "none".to_string()
    } else {
        prefixes.join(", ")
    }
}

/// Case-insensitive substring filter on release names. Blank filters match all.
fn filter_by_name(releases: Vec<Release>, name: Option<&str>) -> Vec<Release> {
    let needle = match name.map(str::trim).filter(|n| !n.is_empty()) {
        Some(n) => n.to_lowercase(),
        None => return releases,
    };
    releases
        .into_iter()
        .filter(|r| r.name.to_lowercase().contains(&needle))
        .collect()
}
