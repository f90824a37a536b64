//! Splitting flat update payloads into native and custom fields.
//!
//! Aha! accepts a closed set of top-level attributes on each record type.
//! Anything else the caller sends is a custom field and has to be nested
//! under `custom_fields` in the mutation body.

use serde_json::{Map, Value};

/// Top-level attributes the features endpoint accepts directly.
pub const STANDARD_FEATURE_FIELDS: &[&str] = &[
    "name",
    "workflow_kind",
    "workflow_status",
    "release",
    "description",
    "created_by",
    "assigned_to_user",
    "tags",
    "initial_estimate_text",
    "detailed_estimate_text",
    "remaining_estimate_text",
    "initial_estimate",
    "detailed_estimate",
    "remaining_estimate",
    "start_date",
    "due_date",
    "release_phase",
    "initiative",
    "epic",
    "progress_source",
    "progress",
    "team",
    "team_workflow_status",
    "iteration",
    "program_increment",
];

/// Top-level attributes the releases endpoint accepts directly.
pub const STANDARD_RELEASE_FIELDS: &[&str] = &[
    "name",
    "start_date",
    "release_date",
    "development_started_on",
    "external_release_date",
    "parking_lot",
    "owner",
    "theme",
    "workflow_status",
    "progress_source",
    "progress",
];

/// A payload split by membership in a standard field set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldPartition {
    pub standard: Map<String, Value>,
    pub extension: Map<String, Value>,
}

impl FieldPartition {
    /// Render the mutation body, e.g. `{"feature": {"name": .., "custom_fields": {..}}}`.
    ///
    /// `custom_fields` is omitted entirely when there are no extension fields.
    pub fn into_body(self, wrapper: &str) -> Value {
        let mut record = self.standard;
        if !self.extension.is_empty() {
            record.insert("custom_fields".to_string(), Value::Object(self.extension));
        }
        let mut body = Map::new();
        body.insert(wrapper.to_string(), Value::Object(record));
        Value::Object(body)
    }
}

pub fn partition(fields: &Map<String, Value>, standard: &[&str]) -> FieldPartition {
    let mut out = FieldPartition::default();
    for (key, value) in fields {
        let target = if standard.contains(&key.as_str()) {
            &mut out.standard
        } else {
            &mut out.extension
        };
        target.insert(key.clone(), value.clone());
    }
    out
}

pub fn partition_feature_fields(fields: &Map<String, Value>) -> FieldPartition {
    partition(fields, STANDARD_FEATURE_FIELDS)
}

pub fn partition_release_fields(fields: &Map<String, Value>) -> FieldPartition {
    partition(fields, STANDARD_RELEASE_FIELDS)
}
