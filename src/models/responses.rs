use serde::{Deserialize, Serialize};
use crate::models::domain::{MatchResult, Neighborhood};

/// Response for the match endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResponse {
    pub matches: Vec<MatchResult>,
    #[serde(rename = "totalNeighborhoods")]
    pub total_neighborhoods: usize,
    #[serde(rename = "responseTimeMs")]
    pub response_time_ms: u64,
    #[serde(rename = "algorithmVersion")]
    pub algorithm_version: String,
}

/// One page of catalog entries
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NeighborhoodPage {
    pub neighborhoods: Vec<Neighborhood>,
    pub total: usize,
    pub page: usize,
    pub limit: usize,
    pub total_pages: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    #[serde(rename = "neighborhoodCount")]
    pub neighborhood_count: usize,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>, status_code: u16) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status_code,
        }
    }
}
