use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers::{stocks, system};
use crate::state::AppState;

pub fn create_router(state: AppState, cors_origins: &[String]) -> Router {
    let stock_routes = Router::new()
        .route("/data", post(stocks::ingest))
        .route("/data/batch", post(stocks::ingest_batch))
        .route("/query", post(stocks::query))
        .route("/:symbol/latest", get(stocks::latest))
        .route("/symbols", get(stocks::symbols))
        .route("/health", get(stocks::health));

    Router::new()
        .route("/", get(system::root))
        .route("/health", get(system::liveness))
        .nest("/api/v1/stocks", stock_routes)
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .map(|origin| origin.trim())
        .filter(|origin| !origin.is_empty())
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
}
