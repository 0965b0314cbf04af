//! # Countdown
//!
//! Counts down to a deadline, keeps a formatted remaining-time string up to
//! date, and fires an expiry notification exactly once per armed deadline.
//!
//! ## Architecture
//!
//! - [`CountdownReducer`]: pure transitions over [`CountdownState`]; time is
//!   read only through the injected clock
//! - [`CountdownEngine`]: owns a store running the reducer; the tick loop is a
//!   cancellable delayed `Tick` that reschedules itself until expiry
//! - [`compute_remaining`], [`format`] and [`format_number`]: the arithmetic
//!   and display policy, usable on their own
//!
//! ## Example
//!
//! ```no_run
//! use countdown::{CountdownConfig, CountdownEngine, CountdownEnvironment, Deadline};
//!
//! # async fn example() -> countdown::Result<()> {
//! let deadline = Deadline::parse("2030-06-01 18:00:00")?;
//! let env = CountdownEnvironment::system().with_on_expire(|| println!("doors open"));
//! let engine = CountdownEngine::start(deadline, CountdownConfig::from_env(), env).await?;
//!
//! let view = engine.view().await;
//! println!("{} (expired: {})", view.formatted, view.is_expired);
//! # Ok(())
//! # }
//! ```

pub mod actions;
pub mod config;
pub mod deadline;
pub mod engine;
pub mod environment;
pub mod error;
pub mod format;
pub mod reducer;
pub mod remaining;
pub mod state;

pub use actions::CountdownAction;
pub use config::{CountdownConfig, DEFAULT_TICK_INTERVAL};
pub use deadline::Deadline;
pub use engine::{CountdownEngine, is_disposed_error};
pub use environment::{CountdownEnvironment, ExpiryCallback};
pub use error::{CountdownError, Result};
pub use format::{CountdownView, EXPIRED_LABEL, Tile, format, format_number};
pub use reducer::{CountdownReducer, TICKER_ID, ticker_id};
pub use remaining::{RemainingTime, compute_remaining};
pub use state::CountdownState;
