//! Date and time comparisons: `before`, `after`, `past` and `future`.
//!
//! Date-times compare as instants, dates compare against the bound's UTC
//! calendar date, and integers are read as epoch milliseconds. Other values
//! pass.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::error::ValidationError;
use crate::validator::Validator;
use crate::value::Value;

/// Format used when a constraint does not supply one.
pub const DEFAULT_FORMAT: &str = "%Y-%m-%dT%H:%MZ";

/// Parses a bound with a `strftime`-style format.
///
/// Formats carrying an offset yield that instant. Formats without one are
/// read as UTC, and date-only formats as midnight UTC.
pub fn parse_bound(input: &str, format: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    if let Ok(dt) = DateTime::parse_from_str(input, format) {
        return Ok(dt.with_timezone(&Utc));
    }
    match NaiveDateTime::parse_from_str(input, format) {
        Ok(naive) => Ok(naive.and_utc()),
        Err(datetime_err) => NaiveDate::parse_from_str(input, format)
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
            .ok_or(datetime_err),
    }
}

fn compare(value: &Value<'_>, bound: &DateTime<Utc>) -> Option<Ordering> {
    match value {
        Value::DateTime(dt) => Some(dt.cmp(bound)),
        Value::Date(date) => Some(date.cmp(&bound.date_naive())),
        Value::Integer(millis) => DateTime::from_timestamp_millis(*millis).map(|dt| dt.cmp(bound)),
        _ => None,
    }
}

fn check_before(value: &Value<'_>, bound: &DateTime<Utc>, code: &str) -> Result<(), ValidationError> {
    match compare(value, bound) {
        Some(Ordering::Less) | None => Ok(()),
        Some(_) => Err(ValidationError::new(format!("{value} isn't before {bound}")).with_code(code)),
    }
}

fn check_after(value: &Value<'_>, bound: &DateTime<Utc>, code: &str) -> Result<(), ValidationError> {
    match compare(value, bound) {
        Some(Ordering::Greater) | None => Ok(()),
        Some(_) => Err(ValidationError::new(format!("{value} isn't after {bound}")).with_code(code)),
    }
}

/// Requires a value strictly before a fixed instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Before(pub DateTime<Utc>);

impl Validator for Before {
    fn name(&self) -> Option<&str> {
        Some("before")
    }

    fn validate(&self, value: &Value<'_>) -> Result<(), ValidationError> {
        check_before(value, &self.0, "before")
    }
}

/// Requires a value strictly after a fixed instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct After(pub DateTime<Utc>);

impl Validator for After {
    fn name(&self) -> Option<&str> {
        Some("after")
    }

    fn validate(&self, value: &Value<'_>) -> Result<(), ValidationError> {
        check_after(value, &self.0, "after")
    }
}

/// Requires a value before the time of validation.
#[derive(Debug, Clone, Copy, Default)]
pub struct Past;

impl Validator for Past {
    fn name(&self) -> Option<&str> {
        Some("past")
    }

    fn validate(&self, value: &Value<'_>) -> Result<(), ValidationError> {
        check_before(value, &Utc::now(), "past")
    }
}

/// Requires a value after the time of validation.
#[derive(Debug, Clone, Copy, Default)]
pub struct Future;

impl Validator for Future {
    fn name(&self) -> Option<&str> {
        Some("future")
    }

    fn validate(&self, value: &Value<'_>) -> Result<(), ValidationError> {
        check_after(value, &Utc::now(), "future")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_parse_default_format() {
        assert_eq!(parse_bound("2020-01-02T03:00Z", DEFAULT_FORMAT).unwrap(), at(2020, 1, 2, 3));
    }

    #[test]
    fn test_parse_with_offset_and_date_only() {
        assert_eq!(
            parse_bound("2020-01-02 05:00 +0200", "%Y-%m-%d %H:%M %z").unwrap(),
            at(2020, 1, 2, 3)
        );
        assert_eq!(parse_bound("2020-01-02", "%Y-%m-%d").unwrap(), at(2020, 1, 2, 0));
        assert!(parse_bound("yesterday", DEFAULT_FORMAT).is_err());
    }

    #[test]
    fn test_before_and_after_are_strict() {
        let bound = at(2020, 1, 1, 0);
        let before = Before(bound);
        let after = After(bound);

        assert!(before.validate(&Value::DateTime(at(2019, 12, 31, 23))).is_ok());
        assert!(before.validate(&Value::DateTime(bound)).is_err());
        assert!(after.validate(&Value::DateTime(bound)).is_err());
        assert!(after.validate(&Value::DateTime(at(2020, 1, 1, 1))).is_ok());
    }

    #[test]
    fn test_dates_and_epoch_millis() {
        let bound = at(2020, 6, 1, 12);
        let before = Before(bound);

        let may = NaiveDate::from_ymd_opt(2020, 5, 31).unwrap();
        assert!(before.validate(&Value::Date(may)).is_ok());
        let june = NaiveDate::from_ymd_opt(2020, 6, 1).unwrap();
        assert!(before.validate(&Value::Date(june)).is_err());

        let millis = at(2020, 1, 1, 0).timestamp_millis();
        assert!(before.validate(&Value::Integer(millis)).is_ok());
    }

    #[test]
    fn test_past_and_future() {
        let yesterday = Utc::now() - Duration::days(1);
        let tomorrow = Utc::now() + Duration::days(1);

        assert!(Past.validate(&Value::DateTime(yesterday)).is_ok());
        assert!(Past.validate(&Value::DateTime(tomorrow)).is_err());
        assert!(Future.validate(&Value::DateTime(tomorrow)).is_ok());
        assert!(Future.validate(&Value::DateTime(yesterday)).is_err());
    }

    #[test]
    fn test_other_values_pass() {
        assert!(Past.validate(&Value::from("2020-01-01")).is_ok());
        assert!(Future.validate(&Value::Null).is_ok());
    }
}
