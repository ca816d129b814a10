use crate::models::domain::{MatchRequest, MatchResult};
use serde::{Deserialize, Serialize};

/// Response for the single-match endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResponse {
    pub status: String,
    #[serde(rename = "match")]
    pub result: MatchResult,
}

/// One slot of a bulk response: the echoed input plus either a match
/// result or an error marker. Exactly one of `result`/`error` is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkMatchItem {
    pub input: MatchRequest,
    #[serde(rename = "match", skip_serializing_if = "Option::is_none")]
    pub result: Option<MatchResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ItemError>,
}

/// Per-item failure marker, distinguishable from a genuine no-match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemError {
    pub kind: String,
    pub message: String,
}

/// Response for the bulk-match endpoint.
///
/// Always carries one item per input, in input order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkMatchResponse {
    pub status: String,
    #[serde(rename = "matchCount")]
    pub match_count: usize,
    #[serde(rename = "totalCount")]
    pub total_count: usize,
    pub results: Vec<BulkMatchItem>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
