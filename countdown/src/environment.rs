//! Environment dependencies for the countdown reducer.

use countdown_core::environment::{Clock, SystemClock};
use std::fmt;
use std::sync::Arc;

/// Handler invoked once per armed deadline when it passes.
pub type ExpiryCallback = Arc<dyn Fn() + Send + Sync>;

/// Injected dependencies: the time source and the expiry handler.
///
/// Production uses [`SystemClock`]; tests inject a manual or tokio-driven clock.
#[derive(Clone)]
pub struct CountdownEnvironment {
    /// Current-instant accessor
    pub clock: Arc<dyn Clock>,
    /// Optional expiry notification
    pub on_expire: Option<ExpiryCallback>,
}

impl CountdownEnvironment {
    /// Environment reading time from `clock`, with no expiry handler.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            on_expire: None,
        }
    }

    /// Environment backed by the wall clock.
    #[must_use]
    pub fn system() -> Self {
        Self::new(Arc::new(SystemClock))
    }

    /// Set the expiry handler
    #[must_use]
    pub fn with_on_expire<F>(mut self, on_expire: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_expire = Some(Arc::new(on_expire));
        self
    }
}

impl fmt::Debug for CountdownEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CountdownEnvironment")
            .field("clock", &self.clock.now())
            .field("on_expire", &self.on_expire.is_some())
            .finish()
    }
}
