//! Typed mirrors of Aha! records.
//!
//! Each type names the attributes this server reads and keeps everything else
//! the backend sent in a flattened `extra` map, so nothing is lost when a
//! record is echoed back to the caller.
//!
//! - [`Record`], [`Page`], [`SearchResults`]: GraphQL shapes (camelCase).
//! - [`FeatureSummary`], [`Product`], [`Release`]: REST shapes (snake_case).
//! - [`ReleaseFeatures`], [`ReleaseListing`], [`ReleaseUpdate`]: tool results.

mod record;
mod release;

pub use record::*;
pub use release::*;
