//! HTTP surface for tickstore.
//!
//! Routes are mounted under `/api/v1/stocks`; `/` and `/health` report on the
//! process itself.

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod router;
pub mod seed;
pub mod state;

pub use config::{Cli, Command, Settings, StoreKind};
pub use error::ApiError;
pub use router::create_router;
pub use state::AppState;

use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. `RUST_LOG` overrides the `info` default.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
