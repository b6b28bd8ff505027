//! Contest deadline resolution.
//!
//! A round's cutoff is either given explicitly (`YYYY-MM-DD_HH:MM`, read as
//! UTC) or derived from the recurring schedule: rounds close every Wednesday
//! at 23:59 UTC, so the default deadline is the most recent Wednesday,
//! inclusive of today when today is a Wednesday.

use chrono::{DateTime, Datelike, Duration, NaiveDateTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Accepted pattern for explicit deadline strings, interpreted as UTC
pub const DEADLINE_FORMAT: &str = "%Y-%m-%d_%H:%M";

/// Length of the submission window that ends at the deadline
pub const SUBMISSION_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Error)]
pub enum DeadlineError {
    #[error("malformed deadline {0:?}, expected YYYY-MM-DD_HH:MM in UTC ({1})")]
    Malformed(String, chrono::format::ParseError),
}

/// The authoritative cutoff instant for one judging run.
///
/// Always UTC by construction; immutable once resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Deadline(DateTime<Utc>);

impl Deadline {
    /// Resolve a deadline from an optional string.
    ///
    /// `None` or the literal `"None"` selects the default schedule rule
    /// evaluated at the current UTC time. Anything else must match
    /// [`DEADLINE_FORMAT`].
    pub fn resolve(deadline_str: Option<&str>) -> Result<Self, DeadlineError> {
        match deadline_str {
            None | Some("None") => Ok(Self::most_recent_wednesday(Utc::now())),
            Some(s) => Self::parse(s),
        }
    }

    /// Parse an explicit `YYYY-MM-DD_HH:MM` deadline, attaching UTC.
    pub fn parse(s: &str) -> Result<Self, DeadlineError> {
        let naive = NaiveDateTime::parse_from_str(s, DEADLINE_FORMAT)
            .map_err(|e| DeadlineError::Malformed(s.to_string(), e))?;
        Ok(Deadline(naive.and_utc()))
    }

    /// Default schedule rule: the most recent Wednesday at 23:59:00 UTC.
    ///
    /// `now` is truncated to midnight before walking backward, so a Wednesday
    /// counts as "most recent" for the whole of that Wednesday.
    pub fn most_recent_wednesday(now: DateTime<Utc>) -> Self {
        let today = now.date_naive();
        let offset = (today.weekday().num_days_from_monday() + 7
            - Weekday::Wed.num_days_from_monday())
            % 7;
        let wednesday = today - Duration::days(offset as i64);
        let cutoff = wednesday
            .and_hms_opt(23, 59, 0)
            .expect("23:59:00 is a valid time of day");
        Deadline(cutoff.and_utc())
    }

    /// Construct from an already-UTC instant (mainly for tests and callers
    /// that resolved the cutoff elsewhere).
    pub fn from_instant(instant: DateTime<Utc>) -> Self {
        Deadline(instant)
    }

    /// The cutoff instant.
    pub fn instant(&self) -> DateTime<Utc> {
        self.0
    }

    /// Start of the submission window (exclusive bound).
    pub fn window_start(&self) -> DateTime<Utc> {
        self.0 - Duration::days(SUBMISSION_WINDOW_DAYS)
    }
}

impl fmt::Display for Deadline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d %H:%M:%S UTC"))
    }
}
