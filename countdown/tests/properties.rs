//! Property tests for remaining-time arithmetic.

use countdown::{Deadline, RemainingTime, compute_remaining, format};
use countdown_core::environment::Clock;
use countdown_testing::test_clock;
use proptest::prelude::*;

const MAX_OFFSET_MS: i64 = 400 * 86_400_000;

fn at(offset_ms: i64) -> chrono::DateTime<chrono::Utc> {
    test_clock().now() + chrono::Duration::milliseconds(offset_ms)
}

proptest! {
    #[test]
    fn remaining_never_increases(
        deadline_ms in 0..MAX_OFFSET_MS,
        a in 0..MAX_OFFSET_MS,
        b in 0..MAX_OFFSET_MS,
    ) {
        let deadline = Deadline::new(at(deadline_ms));
        let (t1, t2) = if a <= b { (a, b) } else { (b, a) };

        let earlier = compute_remaining(at(t1), &deadline);
        let later = compute_remaining(at(t2), &deadline);
        prop_assert!(later.total_millis <= earlier.total_millis);
    }

    #[test]
    fn decomposition_reconstructs_total(remaining_ms in 1..MAX_OFFSET_MS) {
        let deadline = Deadline::new(at(remaining_ms));
        let r = compute_remaining(at(0), &deadline);

        prop_assert!(r.hours < 24);
        prop_assert!(r.minutes < 60);
        prop_assert!(r.seconds < 60);

        let rebuilt = r.days * 86_400_000
            + u64::from(r.hours) * 3_600_000
            + u64::from(r.minutes) * 60_000
            + u64::from(r.seconds) * 1_000;
        prop_assert!(rebuilt <= r.total_millis);
        prop_assert!(r.total_millis < rebuilt + 1_000);
        prop_assert_eq!(r.total_millis, u64::try_from(remaining_ms).unwrap_or_default());
    }

    #[test]
    fn passed_deadlines_clamp_to_zero(deadline_ms in -MAX_OFFSET_MS..0, past_by in 0..MAX_OFFSET_MS) {
        let deadline = Deadline::new(at(deadline_ms));
        let now = at(deadline_ms + past_by);

        prop_assert_eq!(compute_remaining(now, &deadline), RemainingTime::ZERO);
    }

    #[test]
    fn formatted_units_are_two_digits(remaining_ms in 1..86_400_000i64) {
        let r = compute_remaining(at(0), &Deadline::new(at(remaining_ms)));
        let text = format(&r, false);

        prop_assert_eq!(text.len(), 8);
        prop_assert_eq!(text.matches(':').count(), 2);
    }
}
