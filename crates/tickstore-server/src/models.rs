use serde::{Deserialize, Serialize};
use tickstore_core::{HealthReport, RawObservation, Symbol, UtcDateTime, WriteReport};

fn default_interval() -> String {
    String::from("1m")
}

#[derive(Debug, Clone, Serialize)]
pub struct IngestResponse {
    pub message: &'static str,
    pub symbol: Symbol,
    pub timestamp: UtcDateTime,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BatchRequest {
    pub data_points: Vec<RawObservation>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchResponse {
    pub message: String,
    pub count: usize,
    pub symbols: Vec<Symbol>,
    pub report: WriteReport,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QueryRequest {
    pub symbol: String,
    #[serde(default = "default_interval")]
    pub interval: String,
    #[serde(default)]
    pub start_time: Option<UtcDateTime>,
    #[serde(default)]
    pub end_time: Option<UtcDateTime>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LatestParams {
    pub limit: Option<usize>,
}

/// Store health as exposed under `/api/v1/stocks/health`.
#[derive(Debug, Clone, Serialize)]
pub struct StoreHealthResponse {
    pub status: &'static str,
    pub database_connected: bool,
    pub available_symbols_count: i64,
}

impl From<HealthReport> for StoreHealthResponse {
    fn from(report: HealthReport) -> Self {
        Self {
            status: report.status(),
            database_connected: report.store_connected,
            available_symbols_count: report.wire_symbol_count(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceInfo {
    pub service: &'static str,
    pub version: &'static str,
    pub store: &'static str,
    pub timestamp: UtcDateTime,
}

/// Process liveness, independent of the store.
#[derive(Debug, Clone, Serialize)]
pub struct LivenessResponse {
    pub status: &'static str,
    pub timestamp: UtcDateTime,
    pub version: &'static str,
    pub environment: String,
    pub started_at: UtcDateTime,
}
