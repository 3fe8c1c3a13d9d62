//! # Domain Models
//!
//! Strongly-typed values shared by every tickstore component.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Observation`] | Validated trade: symbol, price, volume, timestamp |
//! | [`RawObservation`] | Wire form of an observation, before validation |
//! | [`Symbol`] | Trimmed, uppercased ticker tag |
//! | [`Interval`] | Query bucket width (`1s` .. `1d`) |
//! | [`UtcDateTime`] | RFC3339 instant normalized to UTC |
//!
//! Construction validates invariants; an `Observation` that exists is valid.

mod interval;
mod observation;
mod symbol;
mod timestamp;

pub use interval::Interval;
pub use observation::{Observation, RawObservation};
pub use symbol::Symbol;
pub use timestamp::UtcDateTime;
