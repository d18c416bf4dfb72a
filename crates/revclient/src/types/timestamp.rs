//! ISO-8601 timestamps as exchanged with the Rev API.
//!
//! The server sends expirations like `2024-03-01T12:00:00.1234567Z`. Parsing
//! keeps millisecond precision; formatting always produces
//! `YYYY-MM-DDTHH:MM:SS.fffZ`.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, SubsecRound, Utc};

use crate::error::{Error, InvalidArgumentError};

const NAIVE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";
const OFFSET_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f%z";

/// Parse an ISO-8601 timestamp into a UTC instant truncated to milliseconds.
///
/// Fractional digits beyond milliseconds are discarded. A missing zone is
/// read as UTC; an explicit offset is converted to UTC.
pub fn parse_iso(value: &str) -> Result<DateTime<Utc>, Error> {
    let trimmed = value.trim();
    let invalid = |reason: String| -> Error {
        InvalidArgumentError::Timestamp {
            value: value.to_string(),
            reason,
        }
        .into()
    };

    let time_start = trimmed
        .find(['T', 't'])
        .ok_or_else(|| invalid("missing 'T' separator".to_string()))?;
    let (date, time) = trimmed.split_at(time_start);
    let time = &time[1..];

    let parsed = if let Some(naive_time) = time.strip_suffix(['Z', 'z']) {
        NaiveDateTime::parse_from_str(&format!("{}T{}", date, naive_time), NAIVE_FORMAT)
            .map(|dt| dt.and_utc())
            .map_err(|e| invalid(e.to_string()))?
    } else if time.contains(['+', '-']) {
        DateTime::parse_from_str(&format!("{}T{}", date, time), OFFSET_FORMAT)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| invalid(e.to_string()))?
    } else {
        NaiveDateTime::parse_from_str(trimmed, NAIVE_FORMAT)
            .map(|dt| dt.and_utc())
            .map_err(|e| invalid(e.to_string()))?
    };

    Ok(parsed.trunc_subsecs(3))
}

/// Format a UTC instant with millisecond precision and a `Z` suffix.
pub fn format_iso(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Current instant, truncated to milliseconds.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    #[test]
    fn parses_server_expiration_with_extra_digits() {
        let parsed = parse_iso("2024-03-01T12:30:45.1234567Z").unwrap();
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 45).unwrap()
            + chrono::Duration::milliseconds(123);
        assert_eq!(parsed, expected);
    }

    #[test]
    fn missing_zone_is_utc() {
        let parsed = parse_iso("2024-03-01T12:30:45.500").unwrap();
        assert_eq!(parsed.hour(), 12);
        assert_eq!(parsed.nanosecond(), 500_000_000);
    }

    #[test]
    fn explicit_offset_is_converted() {
        let parsed = parse_iso("2024-03-01T12:30:45.000+02:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 3, 1, 10, 30, 45).unwrap());
    }

    #[test]
    fn accepts_whole_seconds() {
        let parsed = parse_iso("2024-03-01T12:30:45Z").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 45).unwrap());
    }

    #[test]
    fn rejects_garbage() {
        let err = parse_iso("yesterday").unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn formats_with_millis_and_z() {
        let instant = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 45).unwrap()
            + chrono::Duration::milliseconds(7);
        assert_eq!(format_iso(&instant), "2024-03-01T12:30:45.007Z");
    }

    #[test]
    fn format_then_parse_is_identity_at_millis() {
        let instant = now();
        assert_eq!(parse_iso(&format_iso(&instant)).unwrap(), instant);
    }
}
