//! Classification of Aha! record references.
//!
//! Three reference shapes are recognised, and they never overlap:
//!
//! | Kind        | Shape                | Example          |
//! |-------------|----------------------|------------------|
//! | Feature     | `PREFIX-123`         | `ACTIVATION-59`  |
//! | Requirement | `PREFIX-123-1`       | `ADT-123-1`      |
//! | Page        | `PREFIX-N-123`       | `ABC-N-213`      |
//!
//! Matching is case sensitive: a lowercase prefix or a lowercase `n` is not
//! a reference.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;

static FEATURE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Z][A-Z0-9]*)-(\d+)$").expect("valid feature regex"));
static REQUIREMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Z][A-Z0-9]*)-(\d+)-(\d+)$").expect("valid requirement regex"));
static PAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Z][A-Z0-9]*)-N-(\d+)$").expect("valid page regex"));

/// The kind of record a reference points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Feature,
    Requirement,
    Page,
}

impl RecordKind {
    pub const ALL: [RecordKind; 3] = [Self::Feature, Self::Requirement, Self::Page];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Feature => "feature",
            Self::Requirement => "requirement",
            Self::Page => "page",
        }
    }

    /// Human readable format hint used in validation messages.
    pub fn format_hint(&self) -> &'static str {
        match self {
            Self::Feature => "PREFIX-123 (e.g. ACTIVATION-59)",
            Self::Requirement => "PREFIX-123-1 (e.g. ADT-123-1)",
            Self::Page => "PREFIX-N-123 (e.g. ABC-N-213)",
        }
    }

    fn pattern(&self) -> &'static Regex {
        match self {
            Self::Feature => &FEATURE_RE,
            Self::Requirement => &REQUIREMENT_RE,
            Self::Page => &PAGE_RE,
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Invalid reference '{0}'")]
pub struct InvalidReference(pub String);

/// A reference string that matched exactly one known shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    value: String,
    kind: RecordKind,
}

impl Reference {
    pub fn parse(value: &str) -> Result<Self, InvalidReference> {
        let kind = classify(value)?;
        Ok(Self {
            value: value.to_string(),
            kind,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn kind(&self) -> RecordKind {
        self.kind
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// Every kind whose pattern matches `value`. At most one by construction.
pub fn matching_kinds(value: &str) -> Vec<RecordKind> {
    RecordKind::ALL
        .into_iter()
        .filter(|kind| kind.pattern().is_match(value))
        .collect()
}

/// Classify a reference string into the kind of record it names.
pub fn classify(value: &str) -> Result<RecordKind, InvalidReference> {
    let kinds = matching_kinds(value);
    debug_assert!(kinds.len() <= 1, "reference patterns overlap for {value}");
    kinds
        .first()
        .copied()
        .ok_or_else(|| InvalidReference(value.to_string()))
}
