use serde::{Deserialize, Serialize};

use crate::store::{Deadline, TickStore};

/// Snapshot of store reachability.
///
/// `healthy` follows `ping` alone. `symbol_count` is `None` when the
/// symbols could not be listed; on the wire that is rendered as `-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    pub healthy: bool,
    pub store_connected: bool,
    pub symbol_count: Option<usize>,
}

impl HealthReport {
    pub const fn unreachable() -> Self {
        Self {
            healthy: false,
            store_connected: false,
            symbol_count: None,
        }
    }

    pub fn status(&self) -> &'static str {
        if self.healthy {
            "healthy"
        } else {
            "unhealthy"
        }
    }

    /// Symbol count with `-1` standing in for "unknown".
    pub fn wire_symbol_count(&self) -> i64 {
        self.symbol_count
            .and_then(|count| i64::try_from(count).ok())
            .unwrap_or(-1)
    }
}

pub struct HealthReporter;

impl HealthReporter {
    /// Pings the store and, if reachable, counts its symbols. Never fails;
    /// a failed listing leaves the report healthy with an unknown count.
    pub fn check(store: &dyn TickStore, deadline: Deadline) -> HealthReport {
        if !store.ping(deadline) {
            tracing::warn!(store = store.name(), "store ping failed");
            return HealthReport::unreachable();
        }

        match store.list_symbols(deadline) {
            Ok(symbols) => HealthReport {
                healthy: true,
                store_connected: true,
                symbol_count: Some(symbols.len()),
            },
            Err(error) => {
                tracing::warn!(store = store.name(), %error, "symbol listing failed during health check");
                HealthReport {
                    healthy: true,
                    store_connected: true,
                    symbol_count: None,
                }
            }
        }
    }
}
