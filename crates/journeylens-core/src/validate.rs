// Input validation helpers
//
// Raise AnalyticsError::Validation for anything a caller got wrong, so the
// API boundary can map it to a 400 without inspecting messages.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::error::AnalyticsError;

pub const MAX_STRING_LENGTH: usize = 500;

/// Trim and bound-check a required string field.
pub fn validate_string(
    value: &str,
    field_name: &str,
    max_length: usize,
) -> Result<String, AnalyticsError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AnalyticsError::validation(format!(
            "{field_name} cannot be empty"
        )));
    }
    // Length is counted in characters, not bytes, so multi-byte input
    // gets the same budget as ASCII.
    if trimmed.chars().count() > max_length {
        return Err(AnalyticsError::validation(format!(
            "{field_name} exceeds maximum length of {max_length}"
        )));
    }
    Ok(trimmed.to_string())
}

/// Parse a date given either as RFC 3339 or as a bare `YYYY-MM-DD`
/// (midnight UTC).
pub fn parse_date(value: &str, field_name: &str) -> Result<DateTime<Utc>, AnalyticsError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(d) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(DateTime::from_naive_utc_and_offset(
            d.and_time(NaiveTime::MIN),
            Utc,
        ));
    }
    Err(AnalyticsError::validation(format!(
        "{field_name} is not a valid date"
    )))
}

/// Resolve an optional date-range filter.
///
/// When both bounds are supplied, both must parse and start must not be
/// after end. A single bound is parsed directly without range validation.
/// Runs before any database access.
pub fn parse_date_range(
    start_date: Option<&str>,
    end_date: Option<&str>,
) -> Result<(Option<DateTime<Utc>>, Option<DateTime<Utc>>), AnalyticsError> {
    match (start_date, end_date) {
        (Some(s), Some(e)) => {
            let start = parse_date(s, "startDate")?;
            let end = parse_date(e, "endDate")?;
            if start > end {
                return Err(AnalyticsError::validation(
                    "startDate must be before endDate",
                ));
            }
            Ok((Some(start), Some(end)))
        }
        (Some(s), None) => Ok((Some(parse_date(s, "startDate")?), None)),
        (None, Some(e)) => Ok((None, Some(parse_date(e, "endDate")?))),
        (None, None) => Ok((None, None)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn validate_string_trims_and_rejects_empty() {
        assert_eq!(validate_string("  abc ", "name", 500).unwrap(), "abc");
        assert!(validate_string("   ", "name", 500).is_err());
        assert!(validate_string(&"x".repeat(501), "name", 500).is_err());
    }

    #[test]
    fn validate_string_counts_characters_not_bytes() {
        // 500 two-byte characters fit the 500-character budget
        let s = "é".repeat(500);
        assert_eq!(validate_string(&s, "name", 500).unwrap(), s);
        assert!(validate_string(&"é".repeat(501), "name", 500).is_err());
    }

    #[test]
    fn parse_date_accepts_bare_and_rfc3339() {
        let d = parse_date("2024-01-02", "startDate").unwrap();
        assert_eq!(d, Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap());

        let d = parse_date("2024-01-02T10:30:00Z", "startDate").unwrap();
        assert_eq!(d, Utc.with_ymd_and_hms(2024, 1, 2, 10, 30, 0).unwrap());

        assert!(parse_date("not-a-date", "startDate").is_err());
    }

    #[test]
    fn inverted_range_is_rejected() {
        let err = parse_date_range(Some("2024-02-01"), Some("2024-01-01")).unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert!(err.to_string().contains("startDate must be before endDate"));
    }

    #[test]
    fn single_bound_skips_range_validation() {
        let (start, end) = parse_date_range(Some("2024-02-01"), None).unwrap();
        assert!(start.is_some());
        assert!(end.is_none());

        let (start, end) = parse_date_range(None, None).unwrap();
        assert!(start.is_none() && end.is_none());
    }

    #[test]
    fn equal_bounds_are_allowed() {
        let (start, end) = parse_date_range(Some("2024-01-01"), Some("2024-01-01")).unwrap();
        assert_eq!(start, end);
    }
}
