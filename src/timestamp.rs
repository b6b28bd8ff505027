//! UTC timestamp conversions.
//!
//! All contest arithmetic runs on whole-second UTC instants. The judging
//! pipeline never touches local time: anything that reaches the scoring code
//! has already been forced through [`require_utc`] or [`parse_utc`], so a
//! timezone-naive or non-UTC instant cannot leak into a deadline or a
//! benchmark target.

use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use thiserror::Error;

/// Errors raised when a timestamp is not a well-formed UTC instant
#[derive(Debug, Error)]
pub enum TimestampError {
    #[error("timestamp must be in UTC, got an offset of {0} seconds")]
    NotUtc(i32),
    #[error("timestamp is missing a timezone: {0}")]
    MissingTimezone(String),
    #[error("unparseable timestamp: {0}")]
    Unparseable(String),
}

/// Convert a UTC instant to integer seconds since the Unix epoch.
///
/// Sub-second precision is truncated; the contest only deals in whole seconds.
pub fn to_epoch_seconds(dt: DateTime<Utc>) -> i64 {
    dt.timestamp()
}

/// Convert integer seconds since the Unix epoch back to a UTC instant.
pub fn from_epoch_seconds(ut: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(ut, 0).expect("epoch seconds within chrono's representable range")
}

/// Check that an offset-carrying instant is exactly UTC.
pub fn require_utc(dt: DateTime<FixedOffset>) -> Result<DateTime<Utc>, TimestampError> {
    let offset = dt.offset().local_minus_utc();
    if offset != 0 {
        return Err(TimestampError::NotUtc(offset));
    }
    Ok(dt.with_timezone(&Utc))
}

/// Parse an RFC 3339 string into a UTC instant.
///
/// Strings that parse as a datetime but carry no offset are rejected with
/// [`TimestampError::MissingTimezone`]; strings with a non-zero offset are
/// rejected with [`TimestampError::NotUtc`].
pub fn parse_utc(s: &str) -> Result<DateTime<Utc>, TimestampError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return require_utc(dt);
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if NaiveDateTime::parse_from_str(s, fmt).is_ok() {
            return Err(TimestampError::MissingTimezone(s.to_string()));
        }
    }
    Err(TimestampError::Unparseable(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_epoch_start() {
        let dt = Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(to_epoch_seconds(dt), 0);
    }

    #[test]
    fn test_one_minute_after_epoch() {
        let dt = Utc.with_ymd_and_hms(1970, 1, 1, 0, 1, 0).unwrap();
        assert_eq!(to_epoch_seconds(dt), 60);
    }

    #[test]
    fn test_from_epoch_seconds() {
        assert_eq!(
            from_epoch_seconds(0),
            Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(
            from_epoch_seconds(60),
            Utc.with_ymd_and_hms(1970, 1, 1, 0, 1, 0).unwrap()
        );
    }

    #[test]
    fn test_round_trip_both_directions() {
        for ut in [0i64, 1, 60, 86_400, 1_683_158_340, 2_000_000_000] {
            assert_eq!(to_epoch_seconds(from_epoch_seconds(ut)), ut);
        }
        let dt = Utc.with_ymd_and_hms(2011, 8, 15, 8, 15, 12).unwrap();
        assert_eq!(from_epoch_seconds(to_epoch_seconds(dt)), dt);
    }

    #[test]
    fn test_require_utc_accepts_zero_offset() {
        let dt = DateTime::parse_from_rfc3339("2011-08-15T08:15:12+00:00").unwrap();
        assert!(require_utc(dt).is_ok());
    }

    #[test]
    fn test_require_utc_rejects_other_offsets() {
        let dt = DateTime::parse_from_rfc3339("2011-08-15T08:15:12+02:00").unwrap();
        match require_utc(dt) {
            Err(TimestampError::NotUtc(offset)) => assert_eq!(offset, 7200),
            other => panic!("expected NotUtc, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_utc_rejects_naive() {
        match parse_utc("2011-08-15T08:15:12") {
            Err(TimestampError::MissingTimezone(_)) => {}
            other => panic!("expected MissingTimezone, got {:?}", other),
        }
        match parse_utc("2011-08-15 08:15:12") {
            Err(TimestampError::MissingTimezone(_)) => {}
            other => panic!("expected MissingTimezone, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_utc_rejects_garbage() {
        assert!(matches!(
            parse_utc("not a timestamp"),
            Err(TimestampError::Unparseable(_))
        ));
    }

    #[test]
    fn test_parse_utc_accepts_utc() {
        let dt = parse_utc("2023-05-03T23:59:00Z").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2023, 5, 3, 23, 59, 0).unwrap());
    }
}
