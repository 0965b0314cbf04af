//! The instant a countdown targets.

use crate::error::{CountdownError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Naive formats accepted after RFC 3339; all are read as UTC.
const NAIVE_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Absolute point in time a countdown runs to.
///
/// Always valid: construction from text or epoch milliseconds fails
/// instead of producing a placeholder instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Deadline(DateTime<Utc>);

impl Deadline {
    /// Wrap an already parsed instant.
    #[must_use]
    pub const fn new(at: DateTime<Utc>) -> Self {
        Self(at)
    }

    /// Parse a deadline from text.
    ///
    /// Accepts RFC 3339 with any offset, `YYYY-MM-DDTHH:MM:SS[.fff]` and
    /// `YYYY-MM-DD HH:MM:SS[.fff]` (UTC), or a bare `YYYY-MM-DD`
    /// (midnight UTC). Surrounding whitespace is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`CountdownError::InvalidDeadline`] for empty or unparseable input.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let invalid = || CountdownError::InvalidDeadline {
            input: input.to_string(),
        };

        if trimmed.is_empty() {
            return Err(invalid());
        }

        if let Ok(at) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(Self(at.with_timezone(&Utc)));
        }

        for format in NAIVE_DATETIME_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
                return Ok(Self(naive.and_utc()));
            }
        }

        NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| Self(naive.and_utc()))
            .ok_or_else(invalid)
    }

    /// Build a deadline from milliseconds since the Unix epoch.
    ///
    /// # Errors
    ///
    /// Returns [`CountdownError::InvalidDeadline`] when the value is outside
    /// the representable range.
    pub fn from_timestamp_millis(millis: i64) -> Result<Self> {
        DateTime::from_timestamp_millis(millis)
            .map(Self)
            .ok_or_else(|| CountdownError::InvalidDeadline {
                input: millis.to_string(),
            })
    }

    /// The underlying instant.
    #[must_use]
    pub const fn at(&self) -> DateTime<Utc> {
        self.0
    }
}

impl From<DateTime<Utc>> for Deadline {
    fn from(at: DateTime<Utc>) -> Self {
        Self(at)
    }
}

impl FromStr for Deadline {
    type Err = CountdownError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Deadline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}
