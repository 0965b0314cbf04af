//! Countdown configuration.
//!
//! Loads configuration from environment variables with sensible defaults.

use crate::error::{CountdownError, Result};
use std::env;
use std::time::Duration;

/// Default period between recomputations.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(1000);

/// Engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountdownConfig {
    /// Period of the recomputation loop
    pub tick_interval: Duration,
}

impl CountdownConfig {
    /// Load configuration from environment variables.
    ///
    /// `COUNTDOWN_TICK_INTERVAL_MS` sets the tick interval; missing or
    /// unparseable values fall back to the default.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            tick_interval: env::var("COUNTDOWN_TICK_INTERVAL_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map_or(DEFAULT_TICK_INTERVAL, Duration::from_millis),
        }
    }

    /// Set the tick interval
    #[must_use]
    pub const fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    /// Check the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CountdownError::InvalidTickInterval`] for a zero interval.
    pub fn validate(&self) -> Result<()> {
        if self.tick_interval.is_zero() {
            return Err(CountdownError::InvalidTickInterval);
        }
        Ok(())
    }
}

impl Default for CountdownConfig {
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_TICK_INTERVAL,
        }
    }
}
