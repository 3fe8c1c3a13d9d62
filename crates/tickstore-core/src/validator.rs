//! Field-level checks applied before anything reaches a store.

use crate::{Observation, RawObservation, ServiceError, Symbol, UtcDateTime, ValidationError};

/// Validates one wire observation.
///
/// `received_at` stands in for a missing timestamp.
pub fn validate(
    raw: &RawObservation,
    received_at: UtcDateTime,
) -> Result<Observation, ServiceError> {
    normalize(raw, received_at).map_err(|reason| ServiceError::observation(None, reason))
}

/// Validates a batch all-or-nothing. The first invalid element fails the
/// whole batch and its index is reported.
pub fn validate_batch(
    raws: &[RawObservation],
    received_at: UtcDateTime,
) -> Result<Vec<Observation>, ServiceError> {
    if raws.is_empty() {
        return Err(ServiceError::observation(None, ValidationError::EmptyBatch));
    }

    raws.iter()
        .enumerate()
        .map(|(index, raw)| {
            normalize(raw, received_at).map_err(|reason| ServiceError::observation(Some(index), reason))
        })
        .collect()
}

fn normalize(raw: &RawObservation, received_at: UtcDateTime) -> Result<Observation, ValidationError> {
    let symbol = Symbol::parse(&raw.symbol)?;
    let timestamp = match raw.timestamp.as_deref() {
        Some(value) => UtcDateTime::parse(value)?,
        None => received_at,
    };
    Observation::new(symbol, raw.price, raw.volume, timestamp)
}
