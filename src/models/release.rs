use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Aha! REST ids are usually strings but older endpoints send numbers.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {}",
            other
        ))),
    }
}

/// A feature as listed under a release.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSummary {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub reference_num: Option<String>,
    pub name: Option<String>,
    pub created_at: Option<String>,
    pub url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A product (workspace).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub reference_prefix: String,
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A release as returned by the REST API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Release {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub reference_num: Option<String>,
    pub name: String,
    pub start_date: Option<String>,
    pub release_date: Option<String>,
    pub released: Option<bool>,
    pub parking_lot: Option<bool>,
    pub url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Fixed projection of a release used in listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReleaseSummary {
    pub id: String,
    pub reference_num: Option<String>,
    pub name: String,
    pub start_date: Option<String>,
    pub release_date: Option<String>,
    pub released: Option<bool>,
    pub parking_lot: Option<bool>,
    pub url: Option<String>,
}

impl From<Release> for ReleaseSummary {
    fn from(release: Release) -> Self {
        Self {
            id: release.id,
            reference_num: release.reference_num,
            name: release.name,
            start_date: release.start_date,
            release_date: release.release_date,
            released: release.released,
            parking_lot: release.parking_lot,
            url: release.url,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceInfo {
    pub prefix: String,
    pub name: Option<String>,
    pub id: String,
}

impl From<Product> for WorkspaceInfo {
    fn from(product: Product) -> Self {
        Self {
            prefix: product.reference_prefix,
            name: product.name,
            id: product.id,
        }
    }
}

/// Every feature scheduled in a release.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReleaseFeatures {
    pub total_count: usize,
    pub features: Vec<FeatureSummary>,
}

/// Releases of one workspace, optionally filtered by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReleaseListing {
    pub workspace: WorkspaceInfo,
    pub total_count: usize,
    pub releases: Vec<ReleaseSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReleaseUpdate {
    pub message: String,
    pub release: Value,
}
