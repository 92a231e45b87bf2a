//! Response types for the reporting API.

use serde::{Deserialize, Serialize};

/// One racer with its lap aggregates, as clients see it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RacerSummary {
    pub code: String,
    pub name: String,
    pub team: String,
    pub laps: i64,
    /// Best lap in milliseconds, absent when no lap was recorded
    pub best_lap_ms: Option<i64>,
    /// Best lap formatted as `M:SS.mmm`
    pub best_lap: Option<String>,
}

/// Body of `GET /api/v1/report` and `GET /api/v1/report/drivers`
#[derive(Debug, Serialize, Deserialize)]
pub struct ReportResponse {
    pub racers: Vec<RacerSummary>,
}

/// Body of `GET /api/v1/report/drivers/{code}`
#[derive(Debug, Serialize, Deserialize)]
pub struct DriverResponse {
    pub racer: RacerSummary,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
