use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::Duration;

use crate::ValidationError;

/// Query-time bucket widths. The token set is part of the wire contract and
/// is matched case-sensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Interval {
    #[serde(rename = "1s")]
    OneSecond,
    #[serde(rename = "5s")]
    FiveSeconds,
    #[serde(rename = "10s")]
    TenSeconds,
    #[serde(rename = "30s")]
    ThirtySeconds,
    #[serde(rename = "1m")]
    OneMinute,
    #[serde(rename = "5m")]
    FiveMinutes,
    #[serde(rename = "15m")]
    FifteenMinutes,
    #[serde(rename = "30m")]
    ThirtyMinutes,
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "4h")]
    FourHours,
    #[serde(rename = "1d")]
    OneDay,
}

impl Interval {
    /// Every interval, finest first.
    pub const ALL: [Self; 11] = [
        Self::OneSecond,
        Self::FiveSeconds,
        Self::TenSeconds,
        Self::ThirtySeconds,
        Self::OneMinute,
        Self::FiveMinutes,
        Self::FifteenMinutes,
        Self::ThirtyMinutes,
        Self::OneHour,
        Self::FourHours,
        Self::OneDay,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OneSecond => "1s",
            Self::FiveSeconds => "5s",
            Self::TenSeconds => "10s",
            Self::ThirtySeconds => "30s",
            Self::OneMinute => "1m",
            Self::FiveMinutes => "5m",
            Self::FifteenMinutes => "15m",
            Self::ThirtyMinutes => "30m",
            Self::OneHour => "1h",
            Self::FourHours => "4h",
            Self::OneDay => "1d",
        }
    }

    pub const fn seconds(self) -> i64 {
        match self {
            Self::OneSecond => 1,
            Self::FiveSeconds => 5,
            Self::TenSeconds => 10,
            Self::ThirtySeconds => 30,
            Self::OneMinute => 60,
            Self::FiveMinutes => 5 * 60,
            Self::FifteenMinutes => 15 * 60,
            Self::ThirtyMinutes => 30 * 60,
            Self::OneHour => 3_600,
            Self::FourHours => 4 * 3_600,
            Self::OneDay => 86_400,
        }
    }

    pub const fn duration(self) -> Duration {
        Duration::seconds(self.seconds())
    }

    /// Bucket width in microseconds, the resolution observations are stored at.
    pub const fn micros(self) -> i64 {
        self.seconds() * 1_000_000
    }

    /// Start of the epoch-aligned bucket containing `ts_us`.
    pub const fn bucket_start_micros(self, ts_us: i64) -> i64 {
        let width = self.micros();
        ts_us - ts_us.rem_euclid(width)
    }

    /// Exact-match lookup of a wire token.
    pub fn resolve(token: &str) -> Result<Self, ValidationError> {
        Self::ALL
            .into_iter()
            .find(|interval| interval.as_str() == token)
            .ok_or_else(|| ValidationError::InvalidInterval {
                value: token.to_owned(),
            })
    }
}

impl Display for Interval {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interval {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::resolve(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_every_token_to_a_strictly_increasing_duration() {
        let mut previous = Duration::ZERO;
        for interval in Interval::ALL {
            let resolved = Interval::from_str(interval.as_str()).expect("must parse");
            assert_eq!(resolved, interval);
            assert!(resolved.duration() > previous, "{interval} must be coarser");
            previous = resolved.duration();
        }
    }

    #[test]
    fn rejects_unknown_empty_and_miscased_tokens() {
        for token in ["", "2h", "1M", "1H", " 1m", "1w", "60s"] {
            let err = Interval::from_str(token).expect_err("must fail");
            assert_eq!(
                err,
                ValidationError::InvalidInterval {
                    value: token.to_owned()
                }
            );
        }
    }

    #[test]
    fn buckets_align_to_epoch_including_before_1970() {
        let five_minutes = Interval::FiveMinutes;
        assert_eq!(five_minutes.bucket_start_micros(301_000_000), 300_000_000);
        assert_eq!(five_minutes.bucket_start_micros(300_000_000), 300_000_000);
        assert_eq!(five_minutes.bucket_start_micros(-1), -300_000_000);
    }

    #[test]
    fn serializes_as_wire_token() {
        let json = serde_json::to_string(&Interval::FourHours).expect("serialize");
        assert_eq!(json, "\"4h\"");
        let parsed: Interval = serde_json::from_str("\"30s\"").expect("deserialize");
        assert_eq!(parsed, Interval::ThirtySeconds);
    }
}
