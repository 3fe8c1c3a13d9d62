//! Translates a logical `(symbol, start?, end?, interval)` request into a
//! store-agnostic [`QueryDescriptor`].
//!
//! All defaulting of optional bounds happens here so that every caller gets
//! the same window semantics and none of the optionality leaks past this
//! boundary.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use time::Duration;

use crate::{Clock, Interval, ServiceError, Symbol, UtcDateTime};

/// System-wide lookback applied when a query omits `start`.
pub const DEFAULT_LOOKBACK: Duration = Duration::days(7);
/// Window searched by `latest` requests.
pub const DEFAULT_LATEST_LOOKBACK: Duration = Duration::hours(1);
pub const DEFAULT_LATEST_LIMIT: usize = 100;
pub const MAX_LATEST_LIMIT: usize = 10_000;

/// Inclusive `[start, end]` time range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: UtcDateTime,
    pub end: UtcDateTime,
}

impl TimeWindow {
    pub fn new(start: UtcDateTime, end: UtcDateTime) -> Result<Self, ServiceError> {
        if start > end {
            return Err(ServiceError::InvalidTimeRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, ts: UtcDateTime) -> bool {
        self.start <= ts && ts <= self.end
    }
}

/// How observations sharing a bucket collapse into one point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    /// Price of the last observation in the bucket, volumes summed.
    LastTrade,
}

/// Fully resolved query. Every field is concrete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryDescriptor {
    pub symbol: Symbol,
    pub window: TimeWindow,
    pub interval: Interval,
    pub aggregation: Aggregation,
    /// Keep only the most recent `limit` buckets.
    pub limit: Option<usize>,
}

impl QueryDescriptor {
    pub fn new(symbol: Symbol, window: TimeWindow, interval: Interval) -> Self {
        Self {
            symbol,
            window,
            interval,
            aggregation: Aggregation::LastTrade,
            limit: None,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn bucket_duration(&self) -> Duration {
        self.interval.duration()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannerConfig {
    pub default_lookback: Duration,
    pub latest_lookback: Duration,
    pub max_latest_limit: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            default_lookback: DEFAULT_LOOKBACK,
            latest_lookback: DEFAULT_LATEST_LOOKBACK,
            max_latest_limit: MAX_LATEST_LIMIT,
        }
    }
}

#[derive(Clone)]
pub struct QueryPlanner {
    clock: Arc<dyn Clock>,
    config: PlannerConfig,
}

impl QueryPlanner {
    pub fn new(clock: Arc<dyn Clock>, config: PlannerConfig) -> Self {
        Self { clock, config }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Resolves interval, then `end` (default now), then `start`
    /// (default `end - default_lookback`), and rejects `start > end`.
    pub fn plan(
        &self,
        symbol: &str,
        start: Option<UtcDateTime>,
        end: Option<UtcDateTime>,
        interval: &str,
    ) -> Result<QueryDescriptor, ServiceError> {
        let interval = Interval::resolve(interval).map_err(|_| ServiceError::InvalidInterval {
            token: interval.to_owned(),
        })?;
        let symbol = parse_symbol(symbol)?;

        let end = end.unwrap_or_else(|| self.clock.now());
        let start = match start {
            Some(start) => start,
            None => lookback_from(end, self.config.default_lookback)?,
        };
        let window = TimeWindow::new(start, end)?;

        Ok(QueryDescriptor::new(symbol, window, interval))
    }

    /// Descriptor for the `limit` most recent one-second buckets inside the
    /// latest-lookback window ending now.
    pub fn plan_latest(&self, symbol: &str, limit: usize) -> Result<QueryDescriptor, ServiceError> {
        let symbol = parse_symbol(symbol)?;
        if limit == 0 || limit > self.config.max_latest_limit {
            return Err(ServiceError::InvalidLimit {
                limit,
                max: self.config.max_latest_limit,
            });
        }

        let end = self.clock.now();
        let start = lookback_from(end, self.config.latest_lookback)?;
        let window = TimeWindow::new(start, end)?;

        Ok(QueryDescriptor::new(symbol, window, Interval::OneSecond).with_limit(limit))
    }
}

fn parse_symbol(symbol: &str) -> Result<Symbol, ServiceError> {
    Symbol::parse(symbol).map_err(|reason| ServiceError::InvalidSymbol { reason })
}

fn lookback_from(end: UtcDateTime, lookback: Duration) -> Result<UtcDateTime, ServiceError> {
    // Only reachable for instants near the representable minimum.
    end.checked_sub(lookback)
        .ok_or(ServiceError::InvalidTimeRange { start: end, end })
}
