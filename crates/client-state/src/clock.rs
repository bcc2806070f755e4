//! Time source for timestamps written by the stores.

use chrono::{DateTime, Utc};

/// Source of the current time.
pub trait Clock: Send + Sync {
    /// Current UTC time.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(any(test, feature = "test-util"))]
pub use manual::ManualClock;

#[cfg(any(test, feature = "test-util"))]
mod manual {
    use std::sync::Mutex;

    use chrono::{DateTime, Duration, TimeZone, Utc};

    use super::Clock;

    /// Clock that advances by one second every time it is read.
    ///
    /// Makes "newer than" assertions deterministic.
    #[derive(Debug)]
    pub struct ManualClock {
        current: Mutex<DateTime<Utc>>,
    }

    impl ManualClock {
        /// Start at 2025-01-01T00:00:00Z.
        #[must_use]
        pub fn new() -> Self {
            Self::starting_at(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).single().unwrap_or_default())
        }

        /// Start at a given instant.
        #[must_use]
        pub const fn starting_at(start: DateTime<Utc>) -> Self {
            Self {
                current: Mutex::new(start),
            }
        }
    }

    impl Default for ManualClock {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            let mut current = self
                .current
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            let now = *current;
            *current = now + Duration::seconds(1);
            now
        }
    }
}
