//! Aggregation of paginated REST collections.
//!
//! Aha! REST listings return one page at a time along with a `pagination`
//! block. Pages are requested strictly in order because each response
//! carries the total page count that decides whether another fetch happens.

use std::future::Future;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::client::ClientError;

/// Hard stop for backends that keep reporting more pages.
pub const MAX_PAGES: u32 = 1000;

/// One fetched page.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch<T> {
    pub items: Vec<T>,
    /// Declared page count; `None` when the response has no pagination block.
    pub total_pages: Option<u32>,
}

impl<T: DeserializeOwned> Batch<T> {
    /// Decode `{ "<key>": [...], "pagination": { "total_pages": n } }`.
    pub fn from_envelope(mut body: Value, key: &str) -> Result<Self, ClientError> {
        let raw = body
            .get_mut(key)
            .map(Value::take)
            .ok_or_else(|| ClientError::Decode(format!("response has no '{}' array", key)))?;
        let items: Vec<T> = serde_json::from_value(raw)
            .map_err(|e| ClientError::Decode(format!("invalid '{}' array: {}", key, e)))?;
        let total_pages = body
            .pointer("/pagination/total_pages")
            .and_then(Value::as_u64)
            .map(|n| u32::try_from(n).unwrap_or(u32::MAX));
        Ok(Self { items, total_pages })
    }
}

/// Fetch every page starting at 1 and concatenate the items.
///
/// Any failed fetch aborts the whole listing; items gathered so far are
/// dropped.
pub async fn paginate<T, F, Fut>(fetch_page: F) -> Result<Vec<T>, ClientError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Batch<T>, ClientError>>,
{
    paginate_with_limit(MAX_PAGES, fetch_page).await
}

pub async fn paginate_with_limit<T, F, Fut>(
    max_pages: u32,
    mut fetch_page: F,
) -> Result<Vec<T>, ClientError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Batch<T>, ClientError>>,
{
    let mut items = Vec::new();
    let mut page = 1;

    loop {
        if page > max_pages {
            return Err(ClientError::PageLimit(max_pages));
        }

        let batch = fetch_page(page).await?;
        items.extend(batch.items);

        // A missing or zero count still means the first page was the only one.
        let total_pages = batch.total_pages.unwrap_or(1);
        page += 1;
        if page > total_pages {
            break;
        }
    }

    Ok(items)
}
