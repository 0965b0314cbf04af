//! # Countdown Core
//!
//! Core traits and types for the countdown reducer architecture.
//!
//! ## Core Concepts
//!
//! - **State**: Domain state for a feature
//! - **Action**: All possible inputs to a reducer (commands and timer ticks)
//! - **Reducer**: Pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: Side effect descriptions (not execution)
//! - **Environment**: Injected dependencies via traits
//!
//! ## Example
//!
//! ```ignore
//! use countdown_core::*;
//!
//! impl Reducer for TimerReducer {
//!     type State = TimerState;
//!     type Action = TimerAction;
//!     type Environment = TimerEnvironment;
//!
//!     fn reduce(
//!         &self,
//!         state: &mut TimerState,
//!         action: TimerAction,
//!         env: &TimerEnvironment,
//!     ) -> SmallVec<[Effect<TimerAction>; 4]> {
//!         state.last_seen = env.clock.now();
//!         smallvec![Effect::None]
//!     }
//! }
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use smallvec::{SmallVec, smallvec};

/// Reducer module - The core trait for business logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`
///
/// They contain all business logic and are deterministic and testable.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for business logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The domain state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// This is a pure function that:
        /// 1. Validates the action
        /// 2. Updates state in place
        /// 3. Returns effect descriptions to be executed
        ///
        /// # Returns
        ///
        /// The effects to be executed by the runtime
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - Side effect descriptions
///
/// Effects describe side effects to be performed by the runtime.
/// They are values (not execution) and are composable and cancellable.
pub mod effect {
    use std::fmt;
    use std::future::Future;
    use std::pin::Pin;
    use std::time::Duration;

    /// Identifier under which a cancellable effect is registered
    ///
    /// Holding the id is enough to cancel the effect later with
    /// [`Effect::Cancel`].
    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    pub struct EffectId(String);

    impl EffectId {
        /// Create a new effect id
        #[must_use]
        pub fn new(id: impl Into<String>) -> Self {
            Self(id.into())
        }

        /// The id as a string slice
        #[must_use]
        pub fn as_str(&self) -> &str {
            &self.0
        }
    }

    impl fmt::Display for EffectId {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(&self.0)
        }
    }

    /// Effect type - describes a side effect to be executed
    ///
    /// Effects are NOT executed immediately. They are descriptions of what should happen,
    /// returned from reducers and executed by the Store runtime.
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Run effects in parallel
        Parallel(Vec<Effect<Action>>),

        /// Run effects sequentially
        Sequential(Vec<Effect<Action>>),

        /// Delayed action (for timeouts and periodic ticks)
        Delay {
            /// How long to wait
            duration: Duration,
            /// Action to dispatch after delay
            action: Box<Action>,
        },

        /// Arbitrary async computation
        ///
        /// Returns `Option<Action>` - if Some, the action is fed back into the reducer
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),

        /// Run an effect that can be cancelled later by id
        ///
        /// Registering an id that is already in flight aborts the earlier effect.
        Cancellable {
            /// Registration id
            id: EffectId,
            /// The effect to run
            effect: Box<Effect<Action>>,
        },

        /// Abort the effect registered under `id`, if any
        Cancel {
            /// Registration id
            id: EffectId,
        },
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> fmt::Debug for Effect<Action>
    where
        Action: fmt::Debug,
    {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Parallel(effects) => {
                    f.debug_tuple("Effect::Parallel").field(effects).finish()
                },
                Effect::Sequential(effects) => {
                    f.debug_tuple("Effect::Sequential").field(effects).finish()
                },
                Effect::Delay { duration, action } => f
                    .debug_struct("Effect::Delay")
                    .field("duration", duration)
                    .field("action", action)
                    .finish(),
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
                Effect::Cancellable { id, effect } => f
                    .debug_struct("Effect::Cancellable")
                    .field("id", id)
                    .field("effect", effect)
                    .finish(),
                Effect::Cancel { id } => {
                    f.debug_struct("Effect::Cancel").field("id", id).finish()
                },
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Wrap this effect so it can be cancelled by `id`
        #[must_use]
        pub fn cancellable(self, id: EffectId) -> Effect<Action> {
            Effect::Cancellable {
                id,
                effect: Box::new(self),
            }
        }
    }
}

/// Environment module - Dependency injection traits
///
/// All external dependencies are abstracted behind traits and injected
/// via the Environment parameter.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    ///
    /// Production code uses [`SystemClock`]; tests inject a fixed or
    /// manually advanced clock.
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Wall clock
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::effect::{Effect, EffectId};
    use super::environment::{Clock, SystemClock};
    use std::time::Duration;

    #[test]
    fn test_cancellable_wraps_effect() {
        let effect: Effect<u32> = Effect::Delay {
            duration: Duration::from_secs(1),
            action: Box::new(7),
        }
        .cancellable(EffectId::new("ticker"));

        match effect {
            Effect::Cancellable { id, effect } => {
                assert_eq!(id.as_str(), "ticker");
                assert!(matches!(*effect, Effect::Delay { .. }));
            },
            other => unreachable!("unexpected effect {other:?}"),
        }
    }

    #[test]
    fn test_debug_output() {
        let effect: Effect<u32> = Effect::Cancel {
            id: EffectId::new("ticker"),
        };
        assert!(format!("{effect:?}").contains("ticker"));

        let future: Effect<u32> = Effect::Future(Box::pin(async { Some(1) }));
        assert_eq!(format!("{future:?}"), "Effect::Future(<future>)");
    }

    #[test]
    fn test_future_effect_resolves() {
        let effect: Effect<u32> = Effect::Future(Box::pin(async { Some(3) }));
        if let Effect::Future(fut) = effect {
            assert_eq!(tokio_test::block_on(fut), Some(3));
        }
    }

    #[test]
    fn test_system_clock_moves_forward() {
        let clock = SystemClock;
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first);
    }
}
