//! Display formatting for remaining time.

use crate::remaining::RemainingTime;
use serde::Serialize;

/// Label shown once the deadline has passed.
pub const EXPIRED_LABEL: &str = "Expired";

/// Zero-pad a unit to at least two digits.
#[must_use]
pub fn format_number(n: u64) -> String {
    format!("{n:02}")
}

/// `HH:MM:SS`, prefixed with `{days}d ` when at least a day remains,
/// or [`EXPIRED_LABEL`] once expired.
#[must_use]
pub fn format(remaining: &RemainingTime, is_expired: bool) -> String {
    if is_expired {
        return EXPIRED_LABEL.to_string();
    }

    let clock = format!(
        "{}:{}:{}",
        format_number(u64::from(remaining.hours)),
        format_number(u64::from(remaining.minutes)),
        format_number(u64::from(remaining.seconds)),
    );

    if remaining.days > 0 {
        format!("{}d {clock}", remaining.days)
    } else {
        clock
    }
}

/// One padded unit of a card-style countdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tile {
    /// Unit name (`days`, `hours`, `minutes`, `seconds`)
    pub label: &'static str,
    /// Zero-padded value
    pub value: String,
}

/// Everything a presentation layer needs to render a countdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountdownView {
    /// Remaining time breakdown
    pub remaining: RemainingTime,
    /// Whether the deadline has passed
    pub is_expired: bool,
    /// Output of [`format`]
    pub formatted: String,
}

impl CountdownView {
    /// Build a view, deriving the formatted string.
    #[must_use]
    pub fn new(remaining: RemainingTime, is_expired: bool) -> Self {
        Self {
            formatted: format(&remaining, is_expired),
            remaining,
            is_expired,
        }
    }

    /// Day/hour/minute/second tiles, each zero-padded.
    #[must_use]
    pub fn tiles(&self) -> [Tile; 4] {
        let r = &self.remaining;
        [
            Tile {
                label: "days",
                value: format_number(r.days),
            },
            Tile {
                label: "hours",
                value: format_number(u64::from(r.hours)),
            },
            Tile {
                label: "minutes",
                value: format_number(u64::from(r.minutes)),
            },
            Tile {
                label: "seconds",
                value: format_number(u64::from(r.seconds)),
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number_pads() {
        assert_eq!(format_number(0), "00");
        assert_eq!(format_number(7), "07");
        assert_eq!(format_number(42), "42");
        assert_eq!(format_number(365), "365");
    }

    #[test]
    fn test_format_with_days() {
        let remaining = RemainingTime::from_millis(86_461_000);
        assert_eq!(format(&remaining, false), "1d 00:01:01");

        let remaining = RemainingTime::from_millis(90_061_000);
        assert_eq!(format(&remaining, false), "1d 01:01:01");
    }

    #[test]
    fn test_format_without_days() {
        let remaining = RemainingTime::from_millis(3_661_000);
        assert_eq!(format(&remaining, false), "01:01:01");
    }

    #[test]
    fn test_format_expired() {
        assert_eq!(format(&RemainingTime::ZERO, true), "Expired");
        // The flag wins even if a stale breakdown is passed in.
        assert_eq!(format(&RemainingTime::from_millis(5_000), true), "Expired");
    }

    #[test]
    fn test_view_tiles() {
        let view = CountdownView::new(RemainingTime::from_millis(86_461_000), false);
        assert_eq!(view.formatted, "1d 00:01:01");
        let values: Vec<_> = view.tiles().iter().map(|t| t.value.clone()).collect();
        assert_eq!(values, ["01", "00", "01", "01"]);
    }
}
