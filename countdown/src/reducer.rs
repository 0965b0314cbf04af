//! Reducer for the countdown.

use crate::actions::CountdownAction;
use crate::environment::CountdownEnvironment;
use crate::remaining::compute_remaining;
use crate::state::CountdownState;
use countdown_core::{
    SmallVec,
    effect::{Effect, EffectId},
    reducer::Reducer,
    smallvec,
};

/// Registration id of the tick loop.
pub const TICKER_ID: &str = "countdown.ticker";

/// The tick loop's effect id.
#[must_use]
pub fn ticker_id() -> EffectId {
    EffectId::new(TICKER_ID)
}

/// Pure state transitions for one countdown.
///
/// The tick loop is one cancellable `Delay` at a time: each `Tick` schedules
/// the next only after it has been reduced, so ticks never overlap. Once the
/// deadline passes no further tick is scheduled; a new deadline restarts the
/// loop.
#[derive(Debug, Clone, Copy, Default)]
pub struct CountdownReducer;

impl CountdownReducer {
    /// Create a new countdown reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Recompute from the clock and decide what happens next.
    fn evaluate(
        state: &mut CountdownState,
        env: &CountdownEnvironment,
    ) -> SmallVec<[Effect<CountdownAction>; 4]> {
        let Some(deadline) = state.deadline else {
            return smallvec![Effect::None];
        };

        state.remaining = compute_remaining(env.clock.now(), &deadline);

        if !state.remaining.is_zero() {
            state.is_expired = false;
            state.ticking = true;
            return smallvec![
                Effect::Delay {
                    duration: state.tick_interval,
                    action: Box::new(CountdownAction::Tick),
                }
                .cancellable(ticker_id())
            ];
        }

        state.is_expired = true;
        state.ticking = false;
        let mut effects: SmallVec<[Effect<CountdownAction>; 4]> =
            smallvec![Effect::Cancel { id: ticker_id() }];

        if !state.has_fired {
            // Latch before the handler runs so a failing handler is not retried.
            state.has_fired = true;
            tracing::info!(%deadline, "Countdown expired");
            if let Some(on_expire) = env.on_expire.clone() {
                effects.push(Effect::Future(Box::pin(async move {
                    on_expire();
                    None
                })));
            }
        }

        effects
    }
}

impl Reducer for CountdownReducer {
    type State = CountdownState;
    type Action = CountdownAction;
    type Environment = CountdownEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            CountdownAction::SetDeadline(deadline) => {
                if state.deadline == Some(deadline) {
                    return smallvec![Effect::None];
                }

                tracing::info!(%deadline, "Deadline set");
                state.deadline = Some(deadline);
                state.has_fired = false;
                state.is_expired = false;
                Self::evaluate(state, env)
            },

            CountdownAction::Tick => {
                if !state.ticking {
                    // Stale tick from a stopped loop.
                    return smallvec![Effect::None];
                }

                state.ticks += 1;
                let effects = Self::evaluate(state, env);
                tracing::debug!(
                    ticks = state.ticks,
                    remaining_ms = state.remaining.total_millis,
                    "Tick"
                );
                effects
            },

            CountdownAction::Stop => {
                state.ticking = false;
                smallvec![Effect::Cancel { id: ticker_id() }]
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deadline::Deadline;
    use countdown_core::environment::Clock;
    use countdown_testing::{ManualClock, ReducerTest, assertions, test_clock};
    use std::sync::Arc;
    use std::time::Duration;

    const INTERVAL: Duration = Duration::from_secs(1);

    fn deadline_in(secs: i64) -> Deadline {
        Deadline::new(test_clock().now() + chrono::Duration::seconds(secs))
    }

    fn env_with(clock: &ManualClock) -> CountdownEnvironment {
        CountdownEnvironment::new(Arc::new(clock.clone())).with_on_expire(|| {})
    }

    fn fresh_env() -> CountdownEnvironment {
        env_with(&ManualClock::new(test_clock().now()))
    }

    #[test]
    fn test_future_deadline_starts_ticking() {
        ReducerTest::new(CountdownReducer::new())
            .with_env(fresh_env())
            .given_state(CountdownState::new(INTERVAL))
            .when_action(CountdownAction::SetDeadline(deadline_in(3_661)))
            .then_state(|state| {
                assert!(state.ticking);
                assert!(!state.is_expired);
                assert_eq!(state.view().formatted, "01:01:01");
            })
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 1);
                assertions::assert_schedules(effects, &ticker_id());
            })
            .run();
    }

    #[test]
    fn test_past_deadline_fires_immediately() {
        ReducerTest::new(CountdownReducer::new())
            .with_env(fresh_env())
            .given_state(CountdownState::new(INTERVAL))
            .when_action(CountdownAction::SetDeadline(deadline_in(-10)))
            .then_state(|state| {
                assert!(state.is_expired);
                assert!(state.has_fired);
                assert!(!state.ticking);
                assert_eq!(state.view().formatted, "Expired");
            })
            .then_effects(|effects| {
                assertions::assert_cancels(effects, &ticker_id());
                assertions::assert_has_future_effect(effects);
            })
            .run();
    }

    #[test]
    fn test_same_deadline_is_noop() {
        ReducerTest::new(CountdownReducer::new())
            .with_env(fresh_env())
            .given_state(CountdownState::new(INTERVAL))
            .when_action(CountdownAction::SetDeadline(deadline_in(-10)))
            .when_action(CountdownAction::SetDeadline(deadline_in(-10)))
            .then_state(|state| {
                assert!(state.has_fired);
            })
            .then_effects(|effects| {
                assertions::assert_no_effects(effects);
            })
            .run();
    }

    #[test]
    fn test_fires_once_then_stops_ticking() {
        let clock = ManualClock::new(test_clock().now());
        let env = env_with(&clock);
        let reducer = CountdownReducer::new();
        let mut state = CountdownState::new(INTERVAL);

        let _ = reducer.reduce(&mut state, CountdownAction::SetDeadline(deadline_in(2)), &env);

        clock.advance(INTERVAL);
        let effects = reducer.reduce(&mut state, CountdownAction::Tick, &env);
        assertions::assert_schedules(&effects, &ticker_id());
        assertions::assert_no_future_effect(&effects);
        assert_eq!(state.remaining.seconds, 1);

        clock.advance(INTERVAL);
        let effects = reducer.reduce(&mut state, CountdownAction::Tick, &env);
        assertions::assert_has_future_effect(&effects);
        assertions::assert_does_not_schedule(&effects, &ticker_id());
        assert!(state.is_expired);
        assert!(!state.ticking);

        // A tick that was already in flight changes nothing.
        clock.advance(INTERVAL * 8);
        let effects = reducer.reduce(&mut state, CountdownAction::Tick, &env);
        assertions::assert_no_effects(&effects);
        assert_eq!(state.ticks, 2);
    }

    #[test]
    fn test_new_deadline_rearms() {
        let clock = ManualClock::new(test_clock().now());
        let env = env_with(&clock);
        let reducer = CountdownReducer::new();
        let mut state = CountdownState::new(INTERVAL);

        let _ = reducer.reduce(&mut state, CountdownAction::SetDeadline(deadline_in(1)), &env);
        clock.advance(INTERVAL);
        let _ = reducer.reduce(&mut state, CountdownAction::Tick, &env);
        assert!(state.has_fired);

        let rearmed = Deadline::new(clock.now() + chrono::Duration::seconds(5));
        let effects = reducer.reduce(&mut state, CountdownAction::SetDeadline(rearmed), &env);
        assert!(!state.is_expired);
        assert!(!state.has_fired);
        assertions::assert_schedules(&effects, &ticker_id());

        clock.advance(INTERVAL * 5);
        let effects = reducer.reduce(&mut state, CountdownAction::Tick, &env);
        assertions::assert_has_future_effect(&effects);
        assert!(state.has_fired);
    }

    #[test]
    fn test_stop_cancels_and_ignores_later_ticks() {
        ReducerTest::new(CountdownReducer::new())
            .with_env(fresh_env())
            .given_state(CountdownState::new(INTERVAL))
            .when_action(CountdownAction::SetDeadline(deadline_in(60)))
            .when_action(CountdownAction::Stop)
            .when_action(CountdownAction::Tick)
            .then_state(|state| {
                assert!(!state.ticking);
                assert_eq!(state.ticks, 0);
            })
            .then_effects(|effects| {
                assertions::assert_no_effects(effects);
            })
            .run();
    }

    #[test]
    fn test_tick_without_deadline_is_ignored() {
        ReducerTest::new(CountdownReducer::new())
            .with_env(fresh_env())
            .given_state(CountdownState::new(INTERVAL))
            .when_action(CountdownAction::Tick)
            .then_state(|state| {
                assert_eq!(state.deadline, None);
                assert_eq!(state.ticks, 0);
            })
            .run();
    }
}
