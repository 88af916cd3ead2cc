//! Date parsing shared by request bodies and query strings.
//!
//! Clients send either full RFC 3339 timestamps (`2024-03-01T00:00:00.000Z`)
//! or plain calendar dates (`2024-03-01`). Plain dates are taken as UTC.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer};

/// Which end of a plain calendar date a timestamp should land on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayBound {
    Start,
    End,
}

/// Parse an RFC 3339 timestamp or a `YYYY-MM-DD` date.
pub fn parse_flexible(input: &str) -> Option<DateTime<Utc>> {
    parse_with_bound(input, DayBound::Start)
}

/// Like [`parse_flexible`], but a plain date resolves to the given end of the day.
pub fn parse_with_bound(input: &str, bound: DayBound) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(input) {
        return Some(ts.with_timezone(&Utc));
    }

    let date = NaiveDate::parse_from_str(input, "%Y-%m-%d").ok()?;
    Some(day_bound(date, bound))
}

/// First or last instant of a calendar day, in UTC.
pub fn day_bound(date: NaiveDate, bound: DayBound) -> DateTime<Utc> {
    let time = match bound {
        DayBound::Start => NaiveTime::MIN,
        DayBound::End => NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN),
    };
    Utc.from_utc_datetime(&date.and_time(time))
}

/// Serde helper for required date fields.
pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_flexible(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid date: {}", raw)))
}

/// Serde helper for optional date fields. `null` and a missing field both map to `None`.
pub fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(raw) => parse_flexible(&raw)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid date: {}", raw))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_parses_rfc3339() {
        let ts = parse_flexible("2024-03-15T10:30:00Z").unwrap();
        assert_eq!(ts.to_rfc3339(), "2024-03-15T10:30:00+00:00");
    }

    #[test]
    fn test_parses_offset_into_utc() {
        let ts = parse_flexible("2024-03-15T10:30:00+02:00").unwrap();
        assert_eq!(ts.hour(), 8);
    }

    #[test]
    fn test_plain_date_bounds() {
        let start = parse_with_bound("2024-03-31", DayBound::Start).unwrap();
        let end = parse_with_bound("2024-03-31", DayBound::End).unwrap();
        assert_eq!(start.hour(), 0);
        assert_eq!(end.hour(), 23);
        assert_eq!(end.minute(), 59);
        assert!(start < end);
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(parse_flexible("").is_none());
        assert!(parse_flexible("next tuesday").is_none());
        assert!(parse_flexible("2024-13-01").is_none());
    }
}
