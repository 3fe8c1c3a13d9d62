use std::sync::{PoisonError, RwLock};

use time::Duration;

use crate::UtcDateTime;

/// Source of "now" for window defaults and missing timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> UtcDateTime;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> UtcDateTime {
        UtcDateTime::now()
    }
}

/// Manually driven clock for tests.
#[derive(Debug)]
pub struct MockClock {
    now: RwLock<UtcDateTime>,
}

impl MockClock {
    pub fn with_time(time: UtcDateTime) -> Self {
        Self {
            now: RwLock::new(time),
        }
    }

    pub fn advance(&self, duration: Duration) {
        let mut now = self.now.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(next) = now.checked_add(duration) {
            *now = next;
        }
    }

    pub fn set_time(&self, time: UtcDateTime) {
        *self.now.write().unwrap_or_else(PoisonError::into_inner) = time;
    }
}

impl Clock for MockClock {
    fn now(&self) -> UtcDateTime {
        *self.now.read().unwrap_or_else(PoisonError::into_inner)
    }
}
