//! Core contracts for tickstore.
//!
//! This crate contains:
//! - Canonical domain models and validation
//! - Query planning and result assembly
//! - The store capability trait, an in-memory backend, and health reporting
//! - The async service facade used by the HTTP layer

pub mod assembler;
pub mod clock;
pub mod domain;
pub mod error;
pub mod health;
pub mod memory;
pub mod planner;
pub mod service;
pub mod store;
pub mod validator;

pub use assembler::{assemble, SeriesPoint, SeriesResult};
pub use clock::{Clock, MockClock, SystemClock};
pub use domain::{Interval, Observation, RawObservation, Symbol, UtcDateTime};
pub use error::{ServiceError, ValidationError};
pub use health::{HealthReport, HealthReporter};
pub use memory::MemoryStore;
pub use planner::{
    Aggregation, PlannerConfig, QueryDescriptor, QueryPlanner, TimeWindow, DEFAULT_LATEST_LIMIT,
    DEFAULT_LATEST_LOOKBACK, DEFAULT_LOOKBACK, MAX_LATEST_LIMIT,
};
pub use service::{BatchOutcome, ServiceConfig, TickService, DEFAULT_STORE_TIMEOUT};
pub use store::{Deadline, RejectedPoint, StoreError, StoreErrorKind, TickStore, WriteReport};
pub use validator::{validate, validate_batch};
