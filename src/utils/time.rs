use crate::error::{invalid_filter_error, PulseResult};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

/// Which end of a day a date filter refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayBound {
    Start,
    End,
}

/// Parse a date string in YYYY-MM-DD format
pub fn parse_date(date_str: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d").ok()
}

/// Convert a filter date into the ISO 8601 form the Discovery API expects.
///
/// Plain dates are widened to the start or end of the day in UTC. Values that
/// already carry a time component are accepted if they parse as RFC 3339 and
/// are re-emitted in UTC without fractional seconds.
pub fn to_iso_datetime(value: &str, bound: DayBound) -> PulseResult<String> {
    let value = value.trim();

    if value.contains('T') {
        let parsed = DateTime::parse_from_rfc3339(value)
            .map_err(|e| invalid_filter_error(&format!("Invalid date-time '{}': {}", value, e)))?;
        return Ok(format_utc(parsed.with_timezone(&Utc)));
    }

    let date = parse_date(value)
        .ok_or_else(|| invalid_filter_error(&format!("Invalid date '{}', expected YYYY-MM-DD", value)))?;

    let time = match bound {
        DayBound::Start => NaiveTime::MIN,
        DayBound::End => NaiveTime::from_hms_opt(23, 59, 59)
            .ok_or_else(|| invalid_filter_error("Failed to build end of day"))?,
    };

    Ok(format_utc(date.and_time(time).and_utc()))
}

fn format_utc(dt: DateTime<Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-05-17"),
            NaiveDate::from_ymd_opt(2024, 5, 17)
        );
        assert_eq!(parse_date("17/05/2024"), None);
        assert_eq!(parse_date("2024-13-01"), None);
    }

    #[test]
    fn test_day_bounds() {
        assert_eq!(
            to_iso_datetime("2024-05-17", DayBound::Start).unwrap(),
            "2024-05-17T00:00:00Z"
        );
        assert_eq!(
            to_iso_datetime("2024-05-17", DayBound::End).unwrap(),
            "2024-05-17T23:59:59Z"
        );
    }

    #[test]
    fn test_full_datetime_passes_through_in_utc() {
        assert_eq!(
            to_iso_datetime("2024-05-17T20:30:00+02:00", DayBound::Start).unwrap(),
            "2024-05-17T18:30:00Z"
        );
        assert_eq!(
            to_iso_datetime("2024-05-17T20:30:00Z", DayBound::End).unwrap(),
            "2024-05-17T20:30:00Z"
        );
    }

    #[test]
    fn test_invalid_dates_are_rejected() {
        assert!(to_iso_datetime("next friday", DayBound::Start).is_err());
        assert!(to_iso_datetime("2024-05-17T25:00", DayBound::End).is_err());
    }
}
