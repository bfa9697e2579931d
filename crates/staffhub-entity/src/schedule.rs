//! Parsing of the heterogeneous due-date, due-time, and reminder values
//! stored on tasks.
//!
//! Tasks have accumulated several representations over time: dates as
//! ISO strings or US-style `MM/DD/YYYY`, times as 24-hour or 12-hour clock
//! strings, and reminders either as a legacy integer of minutes or a
//! freeform `Reminder` custom field such as `"1 day"` or `"2 hours"`.

use std::sync::LazyLock;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use regex::Regex;
use serde_json::Value;

use staffhub_core::error::AppError;

/// Minutes in a day.
pub const MINUTES_PER_DAY: i64 = 1440;
/// Minutes in an hour.
pub const MINUTES_PER_HOUR: i64 = 60;
/// Longest reminder lead time accepted: ten years.
pub const MAX_REMINDER_MINUTES: i64 = 3650 * MINUTES_PER_DAY;

static REMINDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+)\s*([a-z]+)?").expect("reminder pattern is valid")
});

static BARE_HOUR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2})\s*(AM|PM)$").expect("bare hour pattern is valid")
});

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];

const TIME_FORMATS: &[&str] = &["%H:%M", "%H:%M:%S", "%I:%M %p", "%I:%M%p", "%I:%M:%S %p"];

/// Parse a freeform reminder string into minutes.
///
/// The first run of digits is the amount; a following word starting with
/// `d` means days and one starting with `h` means hours. Anything else,
/// including no unit, is taken as minutes. Empty strings, `"None"`,
/// strings without digits, and lead times beyond [`MAX_REMINDER_MINUTES`]
/// mean "no reminder".
pub fn parse_reminder_minutes(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("none") {
        return None;
    }

    let caps = REMINDER_RE.captures(raw)?;
    let amount: i64 = caps.get(1)?.as_str().parse().ok()?;
    let unit = caps
        .get(2)
        .map(|m| m.as_str().to_ascii_lowercase())
        .unwrap_or_default();

    let factor = if unit.starts_with('d') {
        MINUTES_PER_DAY
    } else if unit.starts_with('h') {
        MINUTES_PER_HOUR
    } else {
        1
    };
    amount
        .checked_mul(factor)
        .filter(|minutes| reminder_offset(*minutes).is_some())
}

/// The lead time for `minutes`, or `None` when it is negative or longer
/// than [`MAX_REMINDER_MINUTES`].
pub fn reminder_offset(minutes: i64) -> Option<Duration> {
    if !(0..=MAX_REMINDER_MINUTES).contains(&minutes) {
        return None;
    }
    Duration::try_minutes(minutes)
}

/// Reject a stored `Reminder` value that names a lead time the reminder
/// engine cannot schedule. Text without digits is allowed and means
/// "no reminder".
pub fn check_reminder_value(value: &Value) -> Result<(), AppError> {
    let usable = match value {
        Value::Null => true,
        Value::String(raw) => {
            !REMINDER_RE.is_match(raw) || parse_reminder_minutes(raw).is_some()
        }
        Value::Number(n) => n.as_i64().and_then(reminder_offset).is_some(),
        _ => false,
    };
    if usable {
        Ok(())
    } else {
        Err(AppError::validation(format!(
            "Invalid Reminder '{value}'. Use a lead time such as '30 minutes', '2 hours', or '1 day', up to {} days",
            MAX_REMINDER_MINUTES / MINUTES_PER_DAY
        )))
    }
}

/// Parse a due date in any of the accepted representations.
///
/// Accepts `YYYY-MM-DD`, `MM/DD/YYYY`, `YYYY/MM/DD`, and full RFC 3339
/// timestamps (whose UTC calendar date is used).
pub fn parse_due_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc).date_naive());
    }
    // "2024-05-01T09:00:00" without an offset
    if let Some((date_part, _)) = raw.split_once('T') {
        return NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok();
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

/// Parse a due time in 24-hour or 12-hour clock notation.
pub fn parse_due_time(raw: &str) -> Option<NaiveTime> {
    let normalized = raw.trim().to_ascii_uppercase();
    if normalized.is_empty() {
        return None;
    }
    if let Some(caps) = BARE_HOUR_RE.captures(&normalized) {
        let expanded = format!("{}:00 {}", &caps[1], &caps[2]);
        return NaiveTime::parse_from_str(&expanded, "%I:%M %p").ok();
    }
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(&normalized, fmt).ok())
}

/// The UTC instant a task is due: `due_date` at `due_time`, midnight when
/// the time is absent or unparseable.
pub fn due_instant(due_date: NaiveDate, due_time: Option<&str>) -> DateTime<Utc> {
    let time = due_time.and_then(parse_due_time).unwrap_or(NaiveTime::MIN);
    Utc.from_utc_datetime(&due_date.and_time(time))
}

/// The instant after which a reminder becomes eligible, or `None` when
/// the lead time is out of range.
pub fn reminder_instant(
    due_date: NaiveDate,
    due_time: Option<&str>,
    reminder_minutes: i64,
) -> Option<DateTime<Utc>> {
    due_instant(due_date, due_time).checked_sub_signed(reminder_offset(reminder_minutes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reminder_minutes_units() {
        assert_eq!(parse_reminder_minutes("1 day"), Some(1440));
        assert_eq!(parse_reminder_minutes("2 days"), Some(2880));
        assert_eq!(parse_reminder_minutes("2 hours"), Some(120));
        assert_eq!(parse_reminder_minutes("1hr"), Some(60));
        assert_eq!(parse_reminder_minutes("30 minutes"), Some(30));
        assert_eq!(parse_reminder_minutes("5"), Some(5));
        assert_eq!(parse_reminder_minutes("15 min before"), Some(15));
    }

    #[test]
    fn test_reminder_minutes_absent() {
        assert_eq!(parse_reminder_minutes(""), None);
        assert_eq!(parse_reminder_minutes("   "), None);
        assert_eq!(parse_reminder_minutes("None"), None);
        assert_eq!(parse_reminder_minutes("none"), None);
        assert_eq!(parse_reminder_minutes("soon"), None);
    }

    #[test]
    fn test_reminder_minutes_case_insensitive() {
        assert_eq!(parse_reminder_minutes("1 DAY"), Some(1440));
        assert_eq!(parse_reminder_minutes("3 Hours"), Some(180));
    }

    #[test]
    fn test_due_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        assert_eq!(parse_due_date("2024-05-01"), Some(expected));
        assert_eq!(parse_due_date("05/01/2024"), Some(expected));
        assert_eq!(parse_due_date("2024/05/01"), Some(expected));
        assert_eq!(parse_due_date("2024-05-01T00:00:00.000Z"), Some(expected));
        assert_eq!(parse_due_date("2024-05-01T09:30:00"), Some(expected));
        assert_eq!(parse_due_date("tomorrow"), None);
        assert_eq!(parse_due_date(""), None);
    }

    #[test]
    fn test_due_time_formats() {
        let t = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap();
        assert_eq!(parse_due_time("14:30"), Some(t(14, 30)));
        assert_eq!(parse_due_time("14:30:00"), Some(t(14, 30)));
        assert_eq!(parse_due_time("2:30 PM"), Some(t(14, 30)));
        assert_eq!(parse_due_time("2:30pm"), Some(t(14, 30)));
        assert_eq!(parse_due_time("9 am"), Some(t(9, 0)));
        assert_eq!(parse_due_time("12:00 AM"), Some(t(0, 0)));
        assert_eq!(parse_due_time("noon"), None);
    }

    #[test]
    fn test_due_instant_defaults_to_midnight() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let instant = due_instant(date, None);
        assert_eq!(instant.to_rfc3339(), "2024-05-01T00:00:00+00:00");
        let garbled = due_instant(date, Some("later"));
        assert_eq!(garbled, instant);
    }

    #[test]
    fn test_reminder_instant_subtracts_minutes() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
        let instant = reminder_instant(date, Some("09:00"), 1440).unwrap();
        assert_eq!(instant.to_rfc3339(), "2024-05-01T09:00:00+00:00");
    }

    #[test]
    fn test_reminder_minutes_out_of_range() {
        assert_eq!(parse_reminder_minutes("999999999999 days"), None);
        assert_eq!(parse_reminder_minutes("99999999999999999999"), None);
        assert_eq!(parse_reminder_minutes("3651 days"), None);
        assert_eq!(parse_reminder_minutes("3650 days"), Some(MAX_REMINDER_MINUTES));
    }

    #[test]
    fn test_reminder_instant_rejects_unusable_offsets() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
        assert_eq!(reminder_instant(date, None, 1_439_999_999_998_560), None);
        assert_eq!(reminder_instant(date, None, i64::MAX), None);
        assert_eq!(reminder_instant(date, None, -10), None);
        assert!(reminder_instant(NaiveDate::MIN, None, MAX_REMINDER_MINUTES).is_none());
    }

    #[test]
    fn test_check_reminder_value() {
        use serde_json::json;

        assert!(check_reminder_value(&json!("1 day")).is_ok());
        assert!(check_reminder_value(&json!("None")).is_ok());
        assert!(check_reminder_value(&json!("")).is_ok());
        assert!(check_reminder_value(&json!("soon")).is_ok());
        assert!(check_reminder_value(&json!(null)).is_ok());
        assert!(check_reminder_value(&json!(45)).is_ok());

        assert!(check_reminder_value(&json!("999999999999 days")).is_err());
        assert!(check_reminder_value(&json!(-5)).is_err());
        assert!(check_reminder_value(&json!(1.5)).is_err());
        assert!(check_reminder_value(&json!(["1 day"])).is_err());
    }
}
