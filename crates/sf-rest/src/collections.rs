//! SObject Collections types.

use serde::{Deserialize, Serialize};

/// Request body for collection create / update / upsert.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionRequest {
    pub all_or_none: bool,
    pub records: Vec<serde_json::Value>,
}

/// Per-record outcome of a collection operation.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SaveResult {
    #[serde(default)]
    pub id: Option<String>,
    pub success: bool,
    /// Only present for upserts: true if the record was inserted.
    #[serde(default)]
    pub created: Option<bool>,
    #[serde(default)]
    pub errors: Vec<SaveError>,
}

impl SaveResult {
    /// Error messages joined with "; ".
    pub fn error_message(&self) -> String {
        self.errors
            .iter()
            .map(|e| format!("{}: {}", e.status_code, e.message))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Salesforce error attached to a failed record.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SaveError {
    #[serde(rename = "statusCode")]
    pub status_code: String,
    pub message: String,
    #[serde(default)]
    pub fields: Vec<String>,
}
