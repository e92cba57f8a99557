//! Lenient ISO-8601 handling for expense dates and query bounds.
//!
//! Accepted forms:
//! - RFC 3339 with an offset (`2024-01-01T08:30:00+07:00`, `...Z`)
//! - naive date-time, read as UTC (`2024-01-01T08:30:00`, `2024-01-01 08:30:00.250`)
//! - bare date, read as UTC midnight (`2024-01-01`)
//!
//! Output is always RFC 3339 UTC with millisecond precision.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serializer};

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

pub fn parse_lenient(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Some(naive) = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
    {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

pub fn format(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn serialize<S>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format(dt))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_lenient(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid ISO-8601 timestamp: {raw}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn bare_date_is_utc_midnight() {
        let parsed = parse_lenient("2024-01-01").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn offsets_are_normalised() {
        let parsed = parse_lenient("2024-01-01T07:00:00+07:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(format(&parsed), "2024-01-01T00:00:00.000Z");
    }

    #[test]
    fn naive_datetime_with_fraction() {
        let parsed = parse_lenient("2024-03-05 10:15:30.250").unwrap();
        assert_eq!(format(&parsed), "2024-03-05T10:15:30.250Z");
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(parse_lenient("yesterday").is_none());
        assert!(parse_lenient("2024-13-01").is_none());
        assert!(parse_lenient("").is_none());
    }
}
