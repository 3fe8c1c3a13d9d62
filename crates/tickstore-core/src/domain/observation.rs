use serde::{Deserialize, Serialize};

use crate::{Symbol, UtcDateTime, ValidationError};

/// A validated trade observation. Fields are read-only; corrections are
/// written as new observations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Observation {
    symbol: Symbol,
    price: f64,
    volume: i64,
    timestamp: UtcDateTime,
}

impl Observation {
    pub fn new(
        symbol: Symbol,
        price: f64,
        volume: i64,
        timestamp: UtcDateTime,
    ) -> Result<Self, ValidationError> {
        if !price.is_finite() {
            return Err(ValidationError::NonFiniteValue { field: "price" });
        }
        if price <= 0.0 {
            return Err(ValidationError::NonPositiveValue { field: "price" });
        }
        if volume < 0 {
            return Err(ValidationError::NegativeValue { field: "volume" });
        }

        Ok(Self {
            symbol,
            price,
            volume,
            timestamp,
        })
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn volume(&self) -> i64 {
        self.volume
    }

    pub fn timestamp(&self) -> UtcDateTime {
        self.timestamp
    }
}

/// Observation as submitted on the wire, before validation.
///
/// A missing `timestamp` means "now" at ingestion time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawObservation {
    pub symbol: String,
    pub price: f64,
    pub volume: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl RawObservation {
    pub fn new(
        symbol: impl Into<String>,
        price: f64,
        volume: i64,
        timestamp: Option<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            price,
            volume,
            timestamp,
        }
    }
}

impl From<&Observation> for RawObservation {
    fn from(value: &Observation) -> Self {
        Self {
            symbol: value.symbol.to_string(),
            price: value.price,
            volume: value.volume,
            timestamp: Some(value.timestamp.format_rfc3339()),
        }
    }
}
