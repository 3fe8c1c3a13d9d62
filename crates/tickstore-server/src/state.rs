use std::sync::Arc;

use tickstore_core::{Clock, ServiceConfig, SystemClock, TickService, TickStore, UtcDateTime};

#[derive(Clone)]
pub struct AppState {
    pub service: TickService,
    pub environment: String,
    pub started_at: UtcDateTime,
}

impl AppState {
    pub fn new(service: TickService, environment: impl Into<String>) -> Self {
        Self {
            service,
            environment: environment.into(),
            started_at: UtcDateTime::now(),
        }
    }

    /// State backed by `store` and the system clock.
    pub fn with_store(
        store: Arc<dyn TickStore>,
        config: ServiceConfig,
        environment: impl Into<String>,
    ) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        Self::new(TickService::new(store, clock, config), environment)
    }
}
