//! # Countdown Testing
//!
//! Testing utilities and helpers for the countdown reducer architecture.
//!
//! This crate provides:
//! - Deterministic implementations of the `Clock` environment trait
//! - A Given-When-Then harness for reducers
//! - Assertion helpers for effects
//!
//! ## Example
//!
//! ```ignore
//! use countdown_testing::{ManualClock, test_clock};
//!
//! let clock = ManualClock::new(test_clock().now());
//! clock.advance(Duration::from_secs(1));
//! ```

use chrono::{DateTime, Utc};
use countdown_core::environment::Clock;


/// Mock implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, Utc};
    use std::sync::{Arc, Mutex, PoisonError};
    use std::time::Duration;

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use countdown_testing::mocks::FixedClock;
    /// use countdown_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Clock that only moves when told to
    ///
    /// Clones share the same time, so a test can keep one handle while the
    /// environment owns another.
    ///
    /// # Example
    ///
    /// ```
    /// use countdown_testing::mocks::{ManualClock, test_clock};
    /// use countdown_core::environment::Clock;
    /// use std::time::Duration;
    ///
    /// let clock = ManualClock::new(test_clock().now());
    /// let start = clock.now();
    /// clock.advance(Duration::from_secs(2));
    /// assert_eq!((clock.now() - start).num_seconds(), 2);
    /// ```
    #[derive(Debug, Clone)]
    pub struct ManualClock {
        time: Arc<Mutex<DateTime<Utc>>>,
    }

    impl ManualClock {
        /// Create a clock starting at `time`
        #[must_use]
        pub fn new(time: DateTime<Utc>) -> Self {
            Self {
                time: Arc::new(Mutex::new(time)),
            }
        }

        /// Move the clock forward
        pub fn advance(&self, by: Duration) {
            let mut time = self.time.lock().unwrap_or_else(PoisonError::into_inner);
            *time = shifted(*time, by);
        }

        /// Jump to an absolute time
        pub fn set(&self, to: DateTime<Utc>) {
            *self.time.lock().unwrap_or_else(PoisonError::into_inner) = to;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.time.lock().unwrap_or_else(PoisonError::into_inner)
        }
    }

    /// Clock that follows tokio's time source
    ///
    /// Under `#[tokio::test(start_paused = true)]` tokio's clock is virtual,
    /// so this clock and tokio timers advance together. Must be created
    /// inside a tokio runtime.
    #[derive(Debug, Clone)]
    pub struct TokioClock {
        origin: DateTime<Utc>,
        started: tokio::time::Instant,
    }

    impl TokioClock {
        /// Create a clock reading `origin` at the current tokio instant
        #[must_use]
        pub fn new(origin: DateTime<Utc>) -> Self {
            Self {
                origin,
                started: tokio::time::Instant::now(),
            }
        }
    }

    impl Clock for TokioClock {
        fn now(&self) -> DateTime<Utc> {
            shifted(self.origin, self.started.elapsed())
        }
    }

    /// `time + by`, saturating at the largest representable instant
    fn shifted(time: DateTime<Utc>, by: Duration) -> DateTime<Utc> {
        chrono::Duration::from_std(by)
            .ok()
            .and_then(|delta| time.checked_add_signed(delta))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

// Re-export commonly used items
pub use mocks::{FixedClock, ManualClock, TokioClock, test_clock};
pub use reducer_test::{ReducerTest, assertions};
