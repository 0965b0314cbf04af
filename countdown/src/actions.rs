//! Actions for the countdown reducer.

use crate::deadline::Deadline;

/// Inputs to [`CountdownReducer`](crate::reducer::CountdownReducer).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountdownAction {
    /// Target a deadline.
    ///
    /// Supplying the current deadline again is a no-op; any other value
    /// re-arms the expiry latch and restarts the tick loop.
    SetDeadline(Deadline),

    /// One periodic recomputation, dispatched by the tick loop.
    Tick,

    /// Stop the tick loop without touching the deadline.
    Stop,
}
