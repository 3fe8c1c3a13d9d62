//! Async facade the HTTP layer talks to.
//!
//! Pure stages (validation, planning, assembly) run inline. Every store call
//! runs on tokio's blocking pool and is bounded by the configured timeout,
//! which is also handed to the backend as a [`Deadline`].

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use crate::health::{HealthReport, HealthReporter};
use crate::planner::{PlannerConfig, QueryPlanner, DEFAULT_LATEST_LIMIT};
use crate::store::{Deadline, StoreError, TickStore, WriteReport};
use crate::validator::{validate, validate_batch};
use crate::{
    Clock, Observation, RawObservation, SeriesResult, ServiceError, Symbol, UtcDateTime,
};

pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceConfig {
    pub store_timeout: Duration,
    pub planner: PlannerConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            store_timeout: DEFAULT_STORE_TIMEOUT,
            planner: PlannerConfig::default(),
        }
    }
}

/// Result of a batch ingestion that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOutcome {
    /// Observations the store accepted.
    pub count: usize,
    /// Distinct symbols in the submitted batch, sorted.
    pub symbols: Vec<Symbol>,
    pub report: WriteReport,
}

#[derive(Clone)]
pub struct TickService {
    store: Arc<dyn TickStore>,
    planner: QueryPlanner,
    clock: Arc<dyn Clock>,
    config: ServiceConfig,
}

impl TickService {
    pub fn new(store: Arc<dyn TickStore>, clock: Arc<dyn Clock>, config: ServiceConfig) -> Self {
        Self {
            planner: QueryPlanner::new(Arc::clone(&clock), config.planner),
            store,
            clock,
            config,
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn store_name(&self) -> &'static str {
        self.store.name()
    }

    /// Validates and stores one observation.
    ///
    /// A `StoreUnavailable` from a timeout does not cancel the write: the
    /// store call keeps running and may still commit, so retrying can store
    /// the observation twice.
    #[tracing::instrument(skip(self, raw), fields(symbol = %raw.symbol))]
    pub async fn ingest(&self, raw: RawObservation) -> Result<Observation, ServiceError> {
        let observation = validate(&raw, self.clock.now())?;

        let pending = observation.clone();
        self.run_store("write", move |store, deadline| {
            store.write(&pending, deadline)
        })
        .await?;

        tracing::debug!(timestamp = %observation.timestamp(), "observation stored");
        Ok(observation)
    }

    /// Validates the whole batch, then writes it. Same timeout caveat as
    /// [`TickService::ingest`].
    #[tracing::instrument(skip(self, raws), fields(size = raws.len()))]
    pub async fn ingest_batch(&self, raws: Vec<RawObservation>) -> Result<BatchOutcome, ServiceError> {
        let observations = validate_batch(&raws, self.clock.now())?;
        let symbols: Vec<Symbol> = observations
            .iter()
            .map(|observation| observation.symbol().clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let report = self
            .run_store("write_batch", move |store, deadline| {
                store.write_batch(&observations, deadline)
            })
            .await?;

        if report.is_complete() {
            tracing::info!(accepted = report.accepted, "batch stored");
        } else {
            tracing::warn!(
                accepted = report.accepted,
                rejected = report.rejected.len(),
                "batch partially stored"
            );
        }

        Ok(BatchOutcome {
            count: report.accepted,
            symbols,
            report,
        })
    }

    #[tracing::instrument(skip(self))]
    pub async fn query(
        &self,
        symbol: &str,
        interval: &str,
        start: Option<UtcDateTime>,
        end: Option<UtcDateTime>,
    ) -> Result<SeriesResult, ServiceError> {
        let descriptor = self.planner.plan(symbol, start, end, interval)?;
        let series = self
            .run_store("query", move |store, deadline| {
                store.query(&descriptor, deadline)
            })
            .await?;
        tracing::debug!(points = series.total_points, "query served");
        Ok(series)
    }

    /// Most recent one-second buckets; `limit` defaults to 100.
    #[tracing::instrument(skip(self))]
    pub async fn latest(
        &self,
        symbol: &str,
        limit: Option<usize>,
    ) -> Result<SeriesResult, ServiceError> {
        let descriptor = self
            .planner
            .plan_latest(symbol, limit.unwrap_or(DEFAULT_LATEST_LIMIT))?;
        let series = self
            .run_store("latest", move |store, deadline| {
                store.latest(&descriptor, deadline)
            })
            .await?;
        Ok(series)
    }

    /// Known symbols in ascending order.
    #[tracing::instrument(skip(self))]
    pub async fn symbols(&self) -> Result<Vec<Symbol>, ServiceError> {
        let symbols = self
            .run_store("list_symbols", |store, deadline| store.list_symbols(deadline))
            .await?;
        Ok(symbols.into_iter().collect())
    }

    #[tracing::instrument(skip(self))]
    pub async fn health(&self) -> HealthReport {
        self.run_store("health", |store, deadline| {
            Ok(HealthReporter::check(store, deadline))
        })
        .await
        .unwrap_or_else(|error| {
            tracing::warn!(%error, "health check did not complete");
            HealthReport::unreachable()
        })
    }

    async fn run_store<T, F>(&self, operation: &'static str, call: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&dyn TickStore, Deadline) -> Result<T, StoreError> + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        let timeout = self.config.store_timeout;
        let deadline = Deadline::after(timeout);
        let task = tokio::task::spawn_blocking(move || call(store.as_ref(), deadline));

        match tokio::time::timeout(timeout, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) => Err(StoreError::unavailable(format!(
                "{operation} task failed: {join_error}"
            ))),
            Err(_) => Err(StoreError::unavailable(format!(
                "{operation} timed out after {}ms",
                timeout.as_millis()
            ))),
        }
    }
}
