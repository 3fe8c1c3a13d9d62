use axum::extract::State;
use axum::Json;
use tickstore_core::UtcDateTime;

use crate::models::{LivenessResponse, ServiceInfo};
use crate::state::AppState;

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub async fn root(State(state): State<AppState>) -> Json<ServiceInfo> {
    Json(ServiceInfo {
        service: "tickstore",
        version: VERSION,
        store: state.service.store_name(),
        timestamp: UtcDateTime::now(),
    })
}

pub async fn liveness(State(state): State<AppState>) -> Json<LivenessResponse> {
    Json(LivenessResponse {
        status: "healthy",
        timestamp: UtcDateTime::now(),
        version: VERSION,
        environment: state.environment.clone(),
        started_at: state.started_at,
    })
}
