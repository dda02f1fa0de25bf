//! Tolerant date parsing and calendar bucketing.

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveDateTime};

use crate::models::{CellValue, GroupingMode};

/// Accepted textual date-time layouts, tried in order.
const DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
    "%d/%m/%Y %H:%M:%S",
];

/// Accepted textual date layouts. Day-first wins over month-first.
const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%d.%m.%Y", "%d/%m/%Y", "%Y/%m/%d", "%d-%m-%Y"];

/// Category-key date rendering (`dd.MM.yyyy`).
pub const CATEGORY_DATE_FORMAT: &str = "%d.%m.%Y";

/// Parse a date from text, or `None`.
pub fn parse_date_str(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Tolerant parse of a cell: real dates pass through, text is tried against
/// the known layouts, anything else is not a date.
pub fn parse_date(value: &CellValue) -> Option<NaiveDateTime> {
    match value {
        CellValue::Date(d) => Some(*d),
        CellValue::Text(s) => parse_date_str(s),
        _ => None,
    }
}

/// Bucket start for a time grouping mode; non-time modes keep the day.
pub fn bucket(date: NaiveDate, mode: GroupingMode) -> NaiveDate {
    match mode {
        GroupingMode::Weekly => {
            let back = u64::from(date.weekday().num_days_from_monday());
            date.checked_sub_days(Days::new(back)).unwrap_or(date)
        }
        GroupingMode::Monthly => date.with_day(1).unwrap_or(date),
        _ => date,
    }
}

/// Axis label for a bucket.
pub fn format_bucket(date: NaiveDate, mode: GroupingMode) -> String {
    match mode {
        GroupingMode::Monthly => date.format("%m.%Y").to_string(),
        _ => date.format(CATEGORY_DATE_FORMAT).to_string(),
    }
}

/// Seconds since the Unix epoch at midnight, used as the x value on date axes.
pub fn timestamp(date: NaiveDate) -> f64 {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp() as f64)
        .unwrap_or(0.0)
}
