use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use tickstore_core::{RawObservation, SeriesResult, Symbol};

use crate::error::ApiError;
use crate::models::{
    BatchRequest, BatchResponse, IngestResponse, LatestParams, QueryRequest, StoreHealthResponse,
};
use crate::state::AppState;

pub async fn ingest(
    State(state): State<AppState>,
    payload: Result<Json<RawObservation>, JsonRejection>,
) -> Result<(StatusCode, Json<IngestResponse>), ApiError> {
    let Json(raw) = payload?;
    let observation = state.service.ingest(raw).await?;

    Ok((
        StatusCode::CREATED,
        Json(IngestResponse {
            message: "Data point inserted successfully",
            symbol: observation.symbol().clone(),
            timestamp: observation.timestamp(),
        }),
    ))
}

pub async fn ingest_batch(
    State(state): State<AppState>,
    payload: Result<Json<BatchRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<BatchResponse>), ApiError> {
    let Json(request) = payload?;
    let outcome = state.service.ingest_batch(request.data_points).await?;

    Ok((
        StatusCode::CREATED,
        Json(BatchResponse {
            message: format!("Successfully inserted {} data points", outcome.count),
            count: outcome.count,
            symbols: outcome.symbols,
            report: outcome.report,
        }),
    ))
}

pub async fn query(
    State(state): State<AppState>,
    payload: Result<Json<QueryRequest>, JsonRejection>,
) -> Result<Json<SeriesResult>, ApiError> {
    let Json(request) = payload?;
    let series = state
        .service
        .query(
            &request.symbol,
            &request.interval,
            request.start_time,
            request.end_time,
        )
        .await?;
    Ok(Json(series))
}

pub async fn latest(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    params: Result<Query<LatestParams>, QueryRejection>,
) -> Result<Json<SeriesResult>, ApiError> {
    let Query(params) = params?;
    let series = state.service.latest(&symbol, params.limit).await?;
    Ok(Json(series))
}

pub async fn symbols(State(state): State<AppState>) -> Result<Json<Vec<Symbol>>, ApiError> {
    Ok(Json(state.service.symbols().await?))
}

/// Always `200`; an unreachable store shows up in the body.
pub async fn health(State(state): State<AppState>) -> Json<StoreHealthResponse> {
    Json(state.service.health().await.into())
}
