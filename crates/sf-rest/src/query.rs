//! Query result type.

use serde::{Deserialize, Serialize};

/// One page of a SOQL query result.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult<T> {
    /// Total number of records matching the query.
    pub total_size: u64,
    /// Whether all records are returned (no more pages).
    pub done: bool,
    /// URL to fetch the next batch of results.
    #[serde(default)]
    pub next_records_url: Option<String>,
    pub records: Vec<T>,
}

impl<T> QueryResult<T> {
    /// Returns true if another page can be fetched with `query_more`.
    pub fn has_more(&self) -> bool {
        !self.done && self.next_records_url.is_some()
    }
}
