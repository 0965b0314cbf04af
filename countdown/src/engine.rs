//! Host-side countdown engine.
//!
//! Wraps a [`Store`] running the [`CountdownReducer`]; the store owns the tick
//! loop, the engine owns the store and tears it down on drop.

use crate::actions::CountdownAction;
use crate::config::CountdownConfig;
use crate::deadline::Deadline;
use crate::environment::CountdownEnvironment;
use crate::error::{CountdownError, Result};
use crate::format::CountdownView;
use crate::reducer::CountdownReducer;
use crate::remaining::RemainingTime;
use crate::state::CountdownState;
use countdown_runtime::{Store, StoreError};

type CountdownStore =
    Store<CountdownState, CountdownAction, CountdownEnvironment, CountdownReducer>;

/// A running countdown.
///
/// Must be created inside a tokio runtime. Dropping the engine (or calling
/// [`dispose`](Self::dispose)) aborts the tick loop; no expiry notification
/// is delivered afterwards.
///
/// # Example
///
/// ```no_run
/// use countdown::{CountdownConfig, CountdownEngine, CountdownEnvironment};
///
/// # async fn example() -> countdown::Result<()> {
/// let env = CountdownEnvironment::system().with_on_expire(|| println!("sale closed"));
/// let engine =
///     CountdownEngine::start_from_str("2030-01-01T00:00:00Z", CountdownConfig::default(), env)
///         .await?;
/// println!("{}", engine.formatted().await);
/// # Ok(())
/// # }
/// ```
pub struct CountdownEngine {
    store: CountdownStore,
}

impl CountdownEngine {
    /// Start counting down to `deadline`.
    ///
    /// # Errors
    ///
    /// Returns [`CountdownError::InvalidTickInterval`] if the configuration is invalid.
    pub async fn start(
        deadline: Deadline,
        config: CountdownConfig,
        env: CountdownEnvironment,
    ) -> Result<Self> {
        config.validate()?;

        let store = Store::new(
            CountdownState::new(config.tick_interval),
            CountdownReducer::new(),
            env,
        );
        let engine = Self { store };
        engine.set_deadline(deadline).await?;

        tracing::debug!(
            tick_interval_ms = config.tick_interval.as_millis(),
            "Countdown engine started"
        );
        Ok(engine)
    }

    /// Parse `input` and start counting down to it.
    ///
    /// # Errors
    ///
    /// Returns [`CountdownError::InvalidDeadline`] if `input` does not parse, or
    /// [`CountdownError::InvalidTickInterval`] if the configuration is invalid.
    pub async fn start_from_str(
        input: &str,
        config: CountdownConfig,
        env: CountdownEnvironment,
    ) -> Result<Self> {
        let deadline = Deadline::parse(input)?;
        Self::start(deadline, config, env).await
    }

    /// Replace the deadline.
    ///
    /// A different deadline re-arms the expiry notification and restarts the
    /// tick loop; the current deadline again changes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`CountdownError::Store`] once the engine has been disposed.
    pub async fn set_deadline(&self, deadline: Deadline) -> Result<()> {
        self.store
            .send(CountdownAction::SetDeadline(deadline))
            .await
            .map_err(CountdownError::from)
    }

    /// Parse `input` and replace the deadline.
    ///
    /// The running countdown is left untouched when parsing fails.
    ///
    /// # Errors
    ///
    /// Returns [`CountdownError::InvalidDeadline`] if `input` does not parse, or
    /// [`CountdownError::Store`] once the engine has been disposed.
    pub async fn set_deadline_str(&self, input: &str) -> Result<()> {
        let deadline = Deadline::parse(input)?;
        self.set_deadline(deadline).await
    }

    /// Current deadline.
    pub async fn deadline(&self) -> Option<Deadline> {
        self.store.state(|s| s.deadline).await
    }

    /// Remaining time as of the last tick.
    pub async fn remaining(&self) -> RemainingTime {
        self.store.state(|s| s.remaining).await
    }

    /// Whether the deadline has passed.
    pub async fn is_expired(&self) -> bool {
        self.store.state(|s| s.is_expired).await
    }

    /// Formatted remaining time (`1d 00:01:01`, `01:01:01`, `Expired`).
    pub async fn formatted(&self) -> String {
        self.store.state(|s| s.view().formatted).await
    }

    /// Presentation snapshot.
    pub async fn view(&self) -> CountdownView {
        self.store.state(CountdownState::view).await
    }

    /// Whether a tick is currently scheduled.
    pub async fn is_ticking(&self) -> bool {
        self.store.state(|s| s.ticking).await
    }

    /// Ticks processed so far.
    pub async fn ticks(&self) -> u64 {
        self.store.state(|s| s.ticks).await
    }

    /// Whether the engine has been torn down.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.store.is_shut_down()
    }

    /// Stop the tick loop and reject further updates.
    ///
    /// Idempotent; also runs on drop.
    pub fn dispose(&self) {
        if !self.store.is_shut_down() {
            tracing::debug!("Disposing countdown engine");
        }
        self.store.cancel_all();
    }
}

impl Drop for CountdownEngine {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl std::fmt::Debug for CountdownEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CountdownEngine")
            .field("disposed", &self.is_disposed())
            .finish_non_exhaustive()
    }
}

/// Whether `error` means the engine was already disposed.
#[must_use]
pub const fn is_disposed_error(error: &CountdownError) -> bool {
    matches!(error, CountdownError::Store(StoreError::ShutdownInProgress))
}
