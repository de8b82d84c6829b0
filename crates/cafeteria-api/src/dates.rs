//! Calendar-day arithmetic anchored to Korea Standard Time.
//!
//! Meals are stored at local midnight, so every boundary must be computed in
//! KST. Using UTC or the host zone shifts entries near midnight onto the
//! neighbouring day.

use std::fmt;

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Utc};

const KST_OFFSET_SECS: i32 = 9 * 60 * 60;
const DATE_FORMAT: &str = "%Y-%m-%d";

fn kst() -> FixedOffset {
    FixedOffset::east_opt(KST_OFFSET_SECS).expect("KST offset is in range")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    InvalidDate(String),
}

impl DateError {
    pub fn code(&self) -> &'static str {
        "INVALID_DATE"
    }
}

impl fmt::Display for DateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDate(date) => write!(f, "Invalid date: {date}"),
        }
    }
}

impl std::error::Error for DateError {}

/// Today's date in KST as `YYYY-MM-DD`
pub fn today() -> String {
    today_at(Utc::now())
}

/// The KST calendar date containing `now`
pub fn today_at(now: DateTime<Utc>) -> String {
    now.with_timezone(&kst()).format(DATE_FORMAT).to_string()
}

/// Parse a strict `YYYY-MM-DD` string that names a real calendar day
pub fn parse_calendar_date(date: &str) -> Result<NaiveDate, DateError> {
    let invalid = || DateError::InvalidDate(date.to_string());

    let bytes = date.as_bytes();
    let shape_ok = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !shape_ok {
        return Err(invalid());
    }

    let year: i32 = date[0..4].parse().map_err(|_| invalid())?;
    let month: u32 = date[5..7].parse().map_err(|_| invalid())?;
    let day: u32 = date[8..10].parse().map_err(|_| invalid())?;

    let parsed = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)?;
    if parsed.format(DATE_FORMAT).to_string() != date {
        return Err(invalid());
    }
    Ok(parsed)
}

pub fn is_valid_calendar_date(date: &str) -> bool {
    parse_calendar_date(date).is_ok()
}

/// Instant of KST midnight at the start of `date`
pub fn day_boundary(date: &str) -> Result<DateTime<Utc>, DateError> {
    let parsed = parse_calendar_date(date)?;
    let midnight = parsed
        .and_hms_opt(0, 0, 0)
        .and_then(|naive| naive.and_local_timezone(kst()).single())
        .ok_or_else(|| DateError::InvalidDate(date.to_string()))?;
    Ok(midnight.with_timezone(&Utc))
}

/// Half-open `[from 00:00, to+1 00:00)` covering both days entirely
pub fn range_boundary(from: &str, to: &str) -> Result<(DateTime<Utc>, DateTime<Utc>), DateError> {
    let start = day_boundary(from)?;
    let end = day_boundary(to)? + Duration::days(1);
    Ok((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_leap_day_is_valid() {
        assert!(day_boundary("2024-02-29").is_ok());
    }

    #[test]
    fn test_non_leap_day_is_rejected() {
        let err = day_boundary("2023-02-29").unwrap_err();
        assert_eq!(err, DateError::InvalidDate("2023-02-29".to_string()));
        assert_eq!(err.code(), "INVALID_DATE");
    }

    #[test]
    fn test_malformed_dates_are_rejected() {
        for bad in [
            "2024-13-01",
            "2024-02-30",
            "2024-6-01",
            "2024/06/01",
            "20240601",
            "2024-06-01T00:00",
            "+024-06-01",
            "",
        ] {
            assert!(!is_valid_calendar_date(bad), "{bad} should be invalid");
        }
    }

    #[test]
    fn test_day_boundary_is_kst_midnight() {
        let boundary = day_boundary("2024-06-01").unwrap();
        assert_eq!(boundary, Utc.with_ymd_and_hms(2024, 5, 31, 15, 0, 0).unwrap());
    }

    #[test]
    fn test_single_day_range_spans_24_hours() {
        let (from, to) = range_boundary("2024-06-01", "2024-06-01").unwrap();
        assert_eq!(to - from, Duration::hours(24));
    }

    #[test]
    fn test_range_is_inclusive_of_last_day() {
        let (from, to) = range_boundary("2024-06-01", "2024-06-07").unwrap();
        assert_eq!(to - from, Duration::days(7));
        assert_eq!(to, day_boundary("2024-06-08").unwrap());
    }

    #[test]
    fn test_today_uses_kst_not_utc() {
        // 16:00 UTC is already 01:00 the next day in Seoul
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 16, 0, 0).unwrap();
        assert_eq!(today_at(now), "2024-06-02");

        let now = Utc.with_ymd_and_hms(2024, 6, 1, 14, 59, 59).unwrap();
        assert_eq!(today_at(now), "2024-06-01");
    }
}
