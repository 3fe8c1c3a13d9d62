use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::assembler::{assemble, SeriesPoint, SeriesResult};
use crate::{Observation, QueryDescriptor, Symbol};

/// Store-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorKind {
    /// Connectivity failure or deadline expiry. Retryable.
    Unavailable,
    /// The backend could not run a well-formed query.
    QueryFailed,
    /// The backend refused a well-formed write.
    WriteRejected,
}

/// Error returned by every [`TickStore`] backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreError {
    kind: StoreErrorKind,
    message: String,
}

impl StoreError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: StoreErrorKind::Unavailable,
            message: message.into(),
        }
    }

    pub fn query_failed(message: impl Into<String>) -> Self {
        Self {
            kind: StoreErrorKind::QueryFailed,
            message: message.into(),
        }
    }

    pub fn write_rejected(message: impl Into<String>) -> Self {
        Self {
            kind: StoreErrorKind::WriteRejected,
            message: message.into(),
        }
    }

    pub const fn kind(&self) -> StoreErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn retryable(&self) -> bool {
        matches!(self.kind, StoreErrorKind::Unavailable)
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            StoreErrorKind::Unavailable => "STORE_UNAVAILABLE",
            StoreErrorKind::QueryFailed => "STORE_QUERY_FAILED",
            StoreErrorKind::WriteRejected => "STORE_WRITE_REJECTED",
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for StoreError {}

/// Point in time after which a store call must give up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    expires_at: Instant,
}

impl Deadline {
    pub fn after(timeout: Duration) -> Self {
        Self {
            expires_at: Instant::now() + timeout,
        }
    }

    pub fn remaining(&self) -> Duration {
        self.expires_at.saturating_duration_since(Instant::now())
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }

    /// Fails with `Unavailable` once the deadline has passed.
    pub fn check(&self, operation: &str) -> Result<(), StoreError> {
        if self.is_expired() {
            return Err(StoreError::unavailable(format!(
                "store deadline exceeded during {operation}"
            )));
        }
        Ok(())
    }
}

/// One observation a batch write did not persist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedPoint {
    pub index: usize,
    pub reason: String,
}

/// Outcome of a batch write. `rejected` is in caller order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteReport {
    pub accepted: usize,
    pub rejected: Vec<RejectedPoint>,
}

impl WriteReport {
    pub fn all_accepted(count: usize) -> Self {
        Self {
            accepted: count,
            rejected: Vec::new(),
        }
    }

    pub fn reject(&mut self, index: usize, reason: impl Into<String>) {
        self.rejected.push(RejectedPoint {
            index,
            reason: reason.into(),
        });
    }

    pub fn is_complete(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Capability contract for a time-series backend.
///
/// Implementations are shared across concurrent requests and must be safe
/// to use without external locking. Every call receives a [`Deadline`];
/// backends check it between rows or sub-batches.
pub trait TickStore: Send + Sync {
    /// Short backend name for logs.
    fn name(&self) -> &'static str;

    fn write(&self, observation: &Observation, deadline: Deadline) -> Result<(), StoreError>;

    /// Writes a batch, possibly in sub-batches. Fails outright only when
    /// nothing could be attempted; otherwise per-index failures go in the
    /// report.
    fn write_batch(
        &self,
        observations: &[Observation],
        deadline: Deadline,
    ) -> Result<WriteReport, StoreError>;

    /// One row per non-empty bucket: last price, summed volume, bucket
    /// start as timestamp. Honors `descriptor.limit` as "most recent N".
    fn query_rows(
        &self,
        descriptor: &QueryDescriptor,
        deadline: Deadline,
    ) -> Result<Vec<SeriesPoint>, StoreError>;

    fn list_symbols(&self, deadline: Deadline) -> Result<BTreeSet<Symbol>, StoreError>;

    fn ping(&self, deadline: Deadline) -> bool;

    fn query(
        &self,
        descriptor: &QueryDescriptor,
        deadline: Deadline,
    ) -> Result<SeriesResult, StoreError> {
        let rows = self.query_rows(descriptor, deadline)?;
        Ok(assemble(descriptor, rows))
    }

    /// Most recent buckets of a limited descriptor.
    fn latest(
        &self,
        descriptor: &QueryDescriptor,
        deadline: Deadline,
    ) -> Result<SeriesResult, StoreError> {
        if descriptor.limit.is_none() {
            return Err(StoreError::query_failed("latest requires a point limit"));
        }
        self.query(descriptor, deadline)
    }
}
