//! Demo history generator behind `tickstore seed`.
//!
//! Each symbol follows a Gaussian random walk that is nudged back toward its
//! base price once it drifts more than 20% away. Points are emitted every
//! `step_minutes`; stepping outside 09:00-16:00 UTC or onto a weekend jumps
//! ahead 16 hours.

use serde::Serialize;
use tickstore_core::{RawObservation, ServiceError, Symbol, TickService, UtcDateTime};
use time::{Duration, Weekday};

const BASE_VOLUME: f64 = 1_000_000.0;
const MIN_VOLUME: i64 = 1_000;
const MIN_PRICE: f64 = 1.0;
const REVERSION_BAND: f64 = 0.2;
const REVERSION_STEP: f64 = 0.01;
const WRITE_BATCH_SIZE: usize = 1_000;

#[derive(Debug, Clone, Copy)]
pub struct SeedProfile {
    pub symbol: &'static str,
    pub base_price: f64,
    pub volatility: f64,
    pub volume_multiplier: f64,
}

pub const PROFILES: [SeedProfile; 5] = [
    SeedProfile {
        symbol: "AAPL",
        base_price: 150.0,
        volatility: 0.02,
        volume_multiplier: 1.5,
    },
    SeedProfile {
        symbol: "GOOGL",
        base_price: 2_800.0,
        volatility: 0.025,
        volume_multiplier: 0.8,
    },
    SeedProfile {
        symbol: "MSFT",
        base_price: 300.0,
        volatility: 0.018,
        volume_multiplier: 1.2,
    },
    SeedProfile {
        symbol: "TSLA",
        base_price: 800.0,
        volatility: 0.04,
        volume_multiplier: 2.0,
    },
    SeedProfile {
        symbol: "AMZN",
        base_price: 3_300.0,
        volatility: 0.03,
        volume_multiplier: 1.0,
    },
];

#[derive(Debug, Clone, Copy)]
pub struct SeedPlan {
    pub days: u32,
    pub step_minutes: u32,
    pub end: UtcDateTime,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeedSummary {
    pub generated: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub symbols: Vec<Symbol>,
}

/// Generates the full history for every profile, symbol by symbol.
pub fn generate(plan: SeedPlan, rng: &mut fastrand::Rng) -> Vec<RawObservation> {
    let end = plan.end.into_inner();
    let start = end - Duration::days(i64::from(plan.days));
    let step = Duration::minutes(i64::from(plan.step_minutes.max(1)));

    let mut points = Vec::new();
    for profile in &PROFILES {
        let mut price = profile.base_price;
        let mut current = start;
        while current <= end {
            price = next_price(profile, price, rng);
            points.push(RawObservation::new(
                profile.symbol,
                price,
                next_volume(profile, rng),
                Some(UtcDateTime::from_offset_datetime(current).format_rfc3339()),
            ));

            current += step;
            if outside_market_hours(current) {
                current += Duration::hours(16);
            }
        }
    }
    points
}

/// Generates and writes a seed history through the regular ingestion path.
pub async fn run(
    service: &TickService,
    plan: SeedPlan,
    rng: &mut fastrand::Rng,
) -> Result<SeedSummary, ServiceError> {
    let points = generate(plan, rng);
    let generated = points.len();
    tracing::info!(generated, days = plan.days, step_minutes = plan.step_minutes, "seeding store");

    let mut accepted = 0;
    let mut rejected = 0;
    let mut symbols = std::collections::BTreeSet::new();
    for (batch_index, batch) in points.chunks(WRITE_BATCH_SIZE).enumerate() {
        let outcome = service.ingest_batch(batch.to_vec()).await?;
        accepted += outcome.count;
        rejected += outcome.report.rejected.len();
        symbols.extend(outcome.symbols);
        tracing::debug!(batch = batch_index + 1, accepted = outcome.count, "seed batch written");
    }

    Ok(SeedSummary {
        generated,
        accepted,
        rejected,
        symbols: symbols.into_iter().collect(),
    })
}

fn next_price(profile: &SeedProfile, current: f64, rng: &mut fastrand::Rng) -> f64 {
    let mut change = gaussian(rng) * profile.volatility;
    if current > profile.base_price * (1.0 + REVERSION_BAND) {
        change -= REVERSION_STEP;
    } else if current < profile.base_price * (1.0 - REVERSION_BAND) {
        change += REVERSION_STEP;
    }
    (current * (1.0 + change)).max(MIN_PRICE)
}

fn next_volume(profile: &SeedProfile, rng: &mut fastrand::Rng) -> i64 {
    let factor = 0.5 + rng.f64();
    ((BASE_VOLUME * profile.volume_multiplier * factor) as i64).max(MIN_VOLUME)
}

/// Standard normal sample (Box-Muller).
fn gaussian(rng: &mut fastrand::Rng) -> f64 {
    let u1 = 1.0 - rng.f64();
    let u2 = rng.f64();
    (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
}

fn outside_market_hours(at: time::OffsetDateTime) -> bool {
    at.hour() < 9 || at.hour() >= 16 || matches!(at.weekday(), Weekday::Saturday | Weekday::Sunday)
}
