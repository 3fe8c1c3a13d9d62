use thiserror::Error;

use crate::store::StoreError;
use crate::UtcDateTime;

/// Field-level validation failures for symbols, intervals, timestamps and observations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol must start with an ASCII letter: '{ch}'")]
    SymbolInvalidStart { ch: char },
    #[error("symbol contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },

    #[error(
        "invalid interval '{value}', expected one of 1s, 5s, 10s, 30s, 1m, 5m, 15m, 30m, 1h, 4h, 1d"
    )]
    InvalidInterval { value: String },

    #[error("timestamp must be an RFC3339 instant: '{value}'")]
    InvalidTimestamp { value: String },
    #[error("timestamp is outside the representable range")]
    TimestampOutOfRange,

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
    #[error("field '{field}' must be greater than zero")]
    NonPositiveValue { field: &'static str },
    #[error("field '{field}' must be non-negative")]
    NegativeValue { field: &'static str },

    #[error("batch must contain at least one observation")]
    EmptyBatch,
}

/// Error taxonomy surfaced by the ingestion/query service.
///
/// Validation kinds are never retryable; store kinds carry their own
/// retry classification.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ServiceError {
    #[error(
        "invalid observation{}: {reason}",
        .index.map(|index| format!(" at index {index}")).unwrap_or_default()
    )]
    InvalidObservation {
        index: Option<usize>,
        reason: ValidationError,
    },

    #[error("invalid symbol: {reason}")]
    InvalidSymbol { reason: ValidationError },

    #[error(
        "invalid interval '{token}', expected one of 1s, 5s, 10s, 30s, 1m, 5m, 15m, 30m, 1h, 4h, 1d"
    )]
    InvalidInterval { token: String },

    #[error("invalid time range: start {start} is after end {end}")]
    InvalidTimeRange { start: UtcDateTime, end: UtcDateTime },

    #[error("limit {limit} must be between 1 and {max}")]
    InvalidLimit { limit: usize, max: usize },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ServiceError {
    pub(crate) fn observation(index: Option<usize>, reason: ValidationError) -> Self {
        Self::InvalidObservation { index, reason }
    }

    pub fn retryable(&self) -> bool {
        match self {
            Self::Store(error) => error.retryable(),
            _ => false,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidObservation { .. } => "INVALID_OBSERVATION",
            Self::InvalidSymbol { .. } => "INVALID_SYMBOL",
            Self::InvalidInterval { .. } => "INVALID_INTERVAL",
            Self::InvalidTimeRange { .. } => "INVALID_TIME_RANGE",
            Self::InvalidLimit { .. } => "INVALID_LIMIT",
            Self::Store(error) => error.code(),
        }
    }

    /// True for kinds produced before any store interaction.
    pub fn is_validation(&self) -> bool {
        !matches!(self, Self::Store(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn observation_error_names_the_batch_index() {
        let error = ServiceError::observation(
            Some(3),
            ValidationError::NonPositiveValue { field: "price" },
        );
        assert_eq!(
            error.to_string(),
            "invalid observation at index 3: field 'price' must be greater than zero"
        );
    }

    #[test]
    fn single_observation_error_has_no_index() {
        let error = ServiceError::observation(None, ValidationError::EmptySymbol);
        assert_eq!(error.to_string(), "invalid observation: symbol cannot be empty");
        assert!(!error.retryable());
    }

    #[test]
    fn store_errors_keep_retry_classification() {
        let unavailable = ServiceError::from(StoreError::unavailable("connection refused"));
        assert!(unavailable.retryable());
        assert!(!unavailable.is_validation());
        assert_eq!(unavailable.code(), "STORE_UNAVAILABLE");

        let rejected = ServiceError::from(StoreError::query_failed("bad bucket"));
        assert!(!rejected.retryable());
    }
}
