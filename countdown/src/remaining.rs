//! Remaining-time arithmetic.

use crate::deadline::Deadline;
use chrono::{DateTime, Utc};
use serde::Serialize;

const MILLIS_PER_SECOND: u64 = 1_000;
const MILLIS_PER_MINUTE: u64 = 60 * MILLIS_PER_SECOND;
const MILLIS_PER_HOUR: u64 = 60 * MILLIS_PER_MINUTE;
const MILLIS_PER_DAY: u64 = 24 * MILLIS_PER_HOUR;

/// Time left until a deadline, broken into calendar-ish units.
///
/// `hours < 24`, `minutes < 60` and `seconds < 60` always hold; `total_millis`
/// is clamped at zero and is the authoritative expiry signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemainingTime {
    /// Whole days
    pub days: u64,
    /// Hours past the whole days
    pub hours: u32,
    /// Minutes past the whole hours
    pub minutes: u32,
    /// Seconds past the whole minutes
    pub seconds: u32,
    /// Milliseconds until the deadline, never negative
    pub total_millis: u64,
}

impl RemainingTime {
    /// Nothing left.
    pub const ZERO: Self = Self {
        days: 0,
        hours: 0,
        minutes: 0,
        seconds: 0,
        total_millis: 0,
    };

    /// Decompose a positive number of milliseconds.
    ///
    /// Each unit comes from the remainder of the coarser one.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // each remainder is bounded by its modulus
    pub const fn from_millis(total_millis: u64) -> Self {
        let days = total_millis / MILLIS_PER_DAY;
        let rest = total_millis % MILLIS_PER_DAY;
        let hours = rest / MILLIS_PER_HOUR;
        let rest = rest % MILLIS_PER_HOUR;
        let minutes = rest / MILLIS_PER_MINUTE;
        let rest = rest % MILLIS_PER_MINUTE;
        let seconds = rest / MILLIS_PER_SECOND;

        Self {
            days,
            hours: hours as u32,
            minutes: minutes as u32,
            seconds: seconds as u32,
            total_millis,
        }
    }

    /// Whether the deadline has been reached.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.total_millis == 0
    }
}

/// Time left from `now` until `deadline`.
///
/// Pure. A deadline at or before `now` yields [`RemainingTime::ZERO`].
#[must_use]
pub fn compute_remaining(now: DateTime<Utc>, deadline: &Deadline) -> RemainingTime {
    let millis = deadline.at().signed_duration_since(now).num_milliseconds();
    u64::try_from(millis)
        .ok()
        .filter(|&millis| millis > 0)
        .map_or(RemainingTime::ZERO, RemainingTime::from_millis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use countdown_core::environment::Clock;
    use countdown_testing::test_clock;

    fn deadline_in(millis: i64) -> Deadline {
        Deadline::new(test_clock().now() + chrono::Duration::milliseconds(millis))
    }

    #[test]
    fn test_decomposes_day_minute_second() {
        let remaining = compute_remaining(test_clock().now(), &deadline_in(86_461_000));
        assert_eq!(
            remaining,
            RemainingTime {
                days: 1,
                hours: 0,
                minutes: 1,
                seconds: 1,
                total_millis: 86_461_000,
            }
        );
    }

    #[test]
    fn test_decomposes_every_unit() {
        let remaining = compute_remaining(test_clock().now(), &deadline_in(90_061_000));
        assert_eq!(
            remaining,
            RemainingTime {
                days: 1,
                hours: 1,
                minutes: 1,
                seconds: 1,
                total_millis: 90_061_000,
            }
        );
    }

    #[test]
    fn test_hours_stay_below_a_day() {
        let remaining = compute_remaining(test_clock().now(), &deadline_in(3 * 86_400_000 - 1));
        assert_eq!(remaining.days, 2);
        assert_eq!(remaining.hours, 23);
        assert_eq!(remaining.minutes, 59);
        assert_eq!(remaining.seconds, 59);
    }

    #[test]
    fn test_sub_second_remaining_is_not_expired() {
        let remaining = compute_remaining(test_clock().now(), &deadline_in(400));
        assert_eq!(remaining.seconds, 0);
        assert_eq!(remaining.total_millis, 400);
        assert!(!remaining.is_zero());
    }

    #[test]
    fn test_past_and_present_deadlines_clamp_to_zero() {
        assert_eq!(compute_remaining(test_clock().now(), &deadline_in(0)), RemainingTime::ZERO);
        assert_eq!(
            compute_remaining(test_clock().now(), &deadline_in(-5_000)),
            RemainingTime::ZERO
        );
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(RemainingTime::from_millis(3_661_000));
        assert_eq!(
            json.ok(),
            Some(serde_json::json!({
                "days": 0,
                "hours": 1,
                "minutes": 1,
                "seconds": 1,
                "totalMillis": 3_661_000,
            }))
        );
    }
}
