//! # Countdown Runtime
//!
//! Runtime implementation for the countdown reducer architecture.
//!
//! This crate provides the Store runtime that coordinates reducer execution
//! and effect handling.
//!
//! ## Core Components
//!
//! - **Store**: The runtime that manages state and executes effects
//! - **Effect Executor**: Executes effect descriptions and feeds actions back to reducers
//! - **Cancellation Registry**: Tracks cancellable effects (timers) by id so they can be
//!   restarted, cancelled, or torn down deterministically
//!
//! ## Example
//!
//! ```ignore
//! use countdown_runtime::Store;
//!
//! let store = Store::new(initial_state, my_reducer, environment);
//!
//! // Send an action
//! store.send(Action::DoSomething).await?;
//!
//! // Read state
//! let value = store.state(|s| s.some_field).await;
//!
//! // Abort every timer and stop accepting actions
//! store.cancel_all();
//! ```

use countdown_core::{
    effect::{Effect, EffectId},
    reducer::Reducer,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::AbortHandle;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StoreError {
        /// Store is shutting down and not accepting new actions
        ///
        /// Returned when `send()` is called after `cancel_all()` or `shutdown()`.
        #[error("Store is shutting down")]
        ShutdownInProgress,

        /// Shutdown timed out waiting for effects to complete
        #[error("Shutdown timed out with {0} effects still running")]
        ShutdownTimeout(usize),
    }
}

pub use error::StoreError;

/// Guard that decrements an atomic counter on drop (for shutdown tracking)
///
/// Aborted effects drop their future, so the counter stays accurate
/// even when a timer is cancelled mid-sleep.
struct AtomicCounterGuard(Arc<AtomicUsize>);

impl Drop for AtomicCounterGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// A cancellable effect in flight
struct Registration {
    token: u64,
    handle: AbortHandle,
}

type Registry = Mutex<HashMap<EffectId, Registration>>;

fn lock_registry(registry: &Registry) -> MutexGuard<'_, HashMap<EffectId, Registration>> {
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Store runtime for coordinating reducer execution and effect handling.
pub mod store {
    use super::{
        Arc, AtomicBool, AtomicCounterGuard, AtomicU64, AtomicUsize, Duration, Effect, EffectId,
        HashMap, Mutex, Ordering, Reducer, Registration, Registry, RwLock, StoreError,
        lock_registry,
    };
    use futures::future::{BoxFuture, join_all};

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (behind `RwLock` for concurrent access)
    /// 2. Reducer (business logic)
    /// 3. Environment (injected dependencies)
    /// 4. Effect execution (with feedback loop)
    /// 5. Cancellable effects, keyed by [`EffectId`]
    ///
    /// Cloning a store is cheap; all clones share the same state and registry.
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: Arc<RwLock<S>>,
        reducer: Arc<R>,
        environment: Arc<E>,
        shutdown: Arc<AtomicBool>,
        pending_effects: Arc<AtomicUsize>,
        cancellables: Arc<Registry>,
        next_token: Arc<AtomicU64>,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
        A: Send + 'static,
        S: Send + Sync + 'static,
        E: Send + Sync + 'static,
    {
        /// Create a new store with initial state, reducer, and environment
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self {
                state: Arc::new(RwLock::new(initial_state)),
                reducer: Arc::new(reducer),
                environment: Arc::new(environment),
                shutdown: Arc::new(AtomicBool::new(false)),
                pending_effects: Arc::new(AtomicUsize::new(0)),
                cancellables: Arc::new(Mutex::new(HashMap::new())),
                next_token: Arc::new(AtomicU64::new(0)),
            }
        }

        /// Whether `cancel_all()` or `shutdown()` has been called
        #[must_use]
        pub fn is_shut_down(&self) -> bool {
            self.shutdown.load(Ordering::Acquire)
        }

        /// Number of effects currently running
        #[must_use]
        pub fn pending_effects(&self) -> usize {
            self.pending_effects.load(Ordering::SeqCst)
        }

        /// Number of cancellable effects currently registered
        #[must_use]
        pub fn registered_effects(&self) -> usize {
            lock_registry(&self.cancellables).len()
        }

        /// Send an action to the store
        ///
        /// 1. Acquires write lock on state
        /// 2. Calls reducer with (state, action, environment)
        /// 3. Applies `Cancel`/`Cancellable` registrations before returning
        /// 4. Spawns the remaining effects; actions they produce are fed back
        ///
        /// `send()` returns once effects are started, not completed.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub async fn send(&self, action: A) -> Result<(), StoreError> {
            if self.is_shut_down() {
                tracing::warn!("Rejected action: store is shutting down");
                metrics::counter!("store.shutdown.rejected_actions").increment(1);
                return Err(StoreError::ShutdownInProgress);
            }

            metrics::counter!("store.commands.total").increment(1);

            let effects = {
                let mut state = self.state.write().await;
                // The shutdown flag may have been raised while waiting for the lock.
                if self.is_shut_down() {
                    return Err(StoreError::ShutdownInProgress);
                }
                self.reducer.reduce(&mut *state, action, &self.environment)
            };

            tracing::trace!("Reducer completed, returned {} effects", effects.len());
            for effect in effects {
                self.execute_effect(effect);
            }

            Ok(())
        }

        /// Read current state via a closure
        ///
        /// ```ignore
        /// let expired = store.state(|s| s.is_expired).await;
        /// ```
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().await;
            f(&*state)
        }

        /// Abort the effect registered under `id`
        ///
        /// Returns `true` if an effect was registered.
        pub fn cancel(&self, id: &EffectId) -> bool {
            let removed = lock_registry(&self.cancellables).remove(id);
            match removed {
                Some(registration) => {
                    registration.handle.abort();
                    tracing::debug!(effect_id = %id, "Cancelled effect");
                    metrics::counter!("store.effects.cancelled").increment(1);
                    true
                },
                None => false,
            }
        }

        /// Stop accepting actions and abort every registered effect
        ///
        /// Synchronous so it can run from `Drop`. Calling it twice is harmless.
        pub fn cancel_all(&self) {
            self.shutdown.store(true, Ordering::Release);

            let drained: Vec<_> = lock_registry(&self.cancellables).drain().collect();
            if !drained.is_empty() {
                tracing::debug!(count = drained.len(), "Aborting registered effects");
            }
            for (_, registration) in drained {
                registration.handle.abort();
                metrics::counter!("store.effects.cancelled").increment(1);
            }
        }

        /// Initiate graceful shutdown of the store
        ///
        /// Aborts registered effects, rejects new actions, then waits for the
        /// remaining effects to finish.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownTimeout`] if the timeout expires before all
        /// pending effects complete.
        pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
            tracing::info!("Initiating graceful shutdown");
            metrics::counter!("store.shutdown.initiated").increment(1);

            self.cancel_all();

            let start = tokio::time::Instant::now();
            let poll_interval = Duration::from_millis(10);

            loop {
                let pending = self.pending_effects();

                if pending == 0 {
                    tracing::info!("All effects completed, shutdown successful");
                    metrics::counter!("store.shutdown.completed").increment(1);
                    return Ok(());
                }

                if start.elapsed() >= timeout {
                    tracing::error!(
                        pending_effects = pending,
                        "Shutdown timeout: {} effects still running", pending
                    );
                    metrics::counter!("store.shutdown.timeout").increment(1);
                    return Err(StoreError::ShutdownTimeout(pending));
                }

                tokio::time::sleep(poll_interval).await;
            }
        }

        /// Execute an effect returned by the reducer
        ///
        /// Registration effects are applied immediately so their ordering
        /// relative to the reducer call is deterministic; everything else runs
        /// in a spawned task.
        fn execute_effect(&self, effect: Effect<A>) {
            match effect {
                Effect::None => {
                    tracing::trace!("Executing Effect::None (no-op)");
                    metrics::counter!("store.effects.executed", "type" => "none").increment(1);
                },
                Effect::Cancellable { id, effect } => self.register(id, *effect),
                Effect::Cancel { id } => {
                    metrics::counter!("store.effects.executed", "type" => "cancel").increment(1);
                    self.cancel(&id);
                },
                other => {
                    if self.is_shut_down() {
                        return;
                    }
                    let pending_guard = self.track_pending();
                    let task = self.run_effect(other);
                    tokio::spawn(async move {
                        let _pending_guard = pending_guard;
                        task.await;
                    });
                },
            }
        }

        /// Spawn `effect` and record its abort handle under `id`
        ///
        /// An effect already registered under the same id is aborted.
        fn register(&self, id: EffectId, effect: Effect<A>) {
            metrics::counter!("store.effects.executed", "type" => "cancellable").increment(1);

            let mut entries = lock_registry(&self.cancellables);
            if self.is_shut_down() {
                return;
            }

            let token = self.next_token.fetch_add(1, Ordering::Relaxed);
            let registry = Arc::clone(&self.cancellables);
            let task_id = id.clone();
            let pending_guard = self.track_pending();
            let task = self.run_effect(effect);

            let join = tokio::spawn(async move {
                let _pending_guard = pending_guard;
                task.await;
                let mut entries = lock_registry(&registry);
                if entries.get(&task_id).is_some_and(|r| r.token == token) {
                    entries.remove(&task_id);
                }
            });

            let registration = Registration {
                token,
                handle: join.abort_handle(),
            };
            if let Some(previous) = entries.insert(id.clone(), registration) {
                previous.handle.abort();
                tracing::trace!(effect_id = %id, "Replaced registered effect");
                metrics::counter!("store.effects.replaced").increment(1);
            }
        }

        fn track_pending(&self) -> AtomicCounterGuard {
            self.pending_effects.fetch_add(1, Ordering::SeqCst);
            AtomicCounterGuard(Arc::clone(&self.pending_effects))
        }

        /// Build the future that performs `effect`
        ///
        /// Boxed so effect execution can recurse through `send`.
        fn run_effect(&self, effect: Effect<A>) -> BoxFuture<'static, ()> {
            let store = self.clone();
            Box::pin(async move {
                // Spawned before teardown but first polled after it.
                if store.is_shut_down() {
                    return;
                }
                match effect {
                    Effect::None => {},
                    Effect::Future(fut) => {
                        metrics::counter!("store.effects.executed", "type" => "future").increment(1);
                        if let Some(action) = fut.await {
                            tracing::trace!("Effect::Future produced an action, sending to store");
                            store.feed_back(action).await;
                        }
                    },
                    Effect::Delay { duration, action } => {
                        tracing::trace!("Executing Effect::Delay (duration: {:?})", duration);
                        metrics::counter!("store.effects.executed", "type" => "delay").increment(1);
                        tokio::time::sleep(duration).await;
                        store.feed_back(*action).await;
                    },
                    Effect::Parallel(effects) => {
                        metrics::counter!("store.effects.executed", "type" => "parallel").increment(1);
                        join_all(effects.into_iter().map(|effect| store.run_effect(effect))).await;
                    },
                    Effect::Sequential(effects) => {
                        metrics::counter!("store.effects.executed", "type" => "sequential")
                            .increment(1);
                        for effect in effects {
                            store.run_effect(effect).await;
                        }
                    },
                    Effect::Cancellable { id, effect } => store.register(id, *effect),
                    Effect::Cancel { id } => {
                        store.cancel(&id);
                    },
                }
            })
        }

        async fn feed_back(&self, action: A) {
            if let Err(error) = self.send(action).await {
                tracing::debug!(%error, "Dropped action produced by effect");
            }
        }
    }

    impl<S, A, E, R> Clone for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        fn clone(&self) -> Self {
            Self {
                state: Arc::clone(&self.state),
                reducer: Arc::clone(&self.reducer),
                environment: Arc::clone(&self.environment),
                shutdown: Arc::clone(&self.shutdown),
                pending_effects: Arc::clone(&self.pending_effects),
                cancellables: Arc::clone(&self.cancellables),
                next_token: Arc::clone(&self.next_token),
            }
        }
    }
}

// Re-export for convenience
pub use store::Store;
