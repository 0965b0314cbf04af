//! Countdown state.

use crate::deadline::Deadline;
use crate::format::CountdownView;
use crate::remaining::RemainingTime;
use std::time::Duration;

/// State owned by one countdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountdownState {
    /// Target instant, `None` until the first `SetDeadline`
    pub deadline: Option<Deadline>,
    /// Period of the tick loop
    pub tick_interval: Duration,
    /// Last computed breakdown
    pub remaining: RemainingTime,
    /// `true` iff the last computation reached zero
    pub is_expired: bool,
    /// Latch: the expiry notification for the current deadline was emitted
    pub has_fired: bool,
    /// Whether a tick is scheduled
    pub ticking: bool,
    /// Ticks processed since creation
    pub ticks: u64,
}

impl CountdownState {
    /// Idle state with the given tick interval.
    #[must_use]
    pub const fn new(tick_interval: Duration) -> Self {
        Self {
            deadline: None,
            tick_interval,
            remaining: RemainingTime::ZERO,
            is_expired: false,
            has_fired: false,
            ticking: false,
            ticks: 0,
        }
    }

    /// Presentation snapshot of this state.
    #[must_use]
    pub fn view(&self) -> CountdownView {
        CountdownView::new(self.remaining, self.is_expired)
    }
}
