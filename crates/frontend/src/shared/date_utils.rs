/// Utilities for date and time formatting
///
/// Every page shows dates the French way (`DD/MM/YYYY`).
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// 2024-03-15 -> "15/03/2024"
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

pub fn format_date_opt(date: Option<NaiveDate>) -> String {
    date.map(format_date).unwrap_or_else(|| "-".to_string())
}

/// 2024-03-15T14:02:26Z -> "15/03/2024 14:02"
pub fn format_datetime(datetime: DateTime<Utc>) -> String {
    datetime.format("%d/%m/%Y %H:%M").to_string()
}

pub fn format_datetime_opt(datetime: Option<DateTime<Utc>>) -> String {
    datetime.map(format_datetime).unwrap_or_else(|| "-".to_string())
}

/// ISO date text ("2024-03-15" or a full timestamp) -> "15/03/2024"; other text is returned as is
pub fn format_iso_date(text: &str) -> String {
    let date_part = text.split('T').next().unwrap_or(text);
    match parse_date_input(date_part) {
        Some(date) => format_date(date),
        None => text.to_string(),
    }
}

/// RFC 3339 timestamp text -> "15/03/2024 14:02"; falls back to [`format_iso_date`]
pub fn format_timestamp(text: &str) -> String {
    match DateTime::parse_from_rfc3339(text) {
        Ok(dt) => format_datetime(dt.with_timezone(&Utc)),
        Err(_) => format_iso_date(text),
    }
}

/// Value of an `<input type="date">`
pub fn parse_date_input(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// Value of an `<input type="datetime-local">`, with or without seconds
pub fn parse_datetime_input(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
        .ok()
}

/// Inverse of [`parse_datetime_input`]
pub fn to_datetime_input(value: NaiveDateTime) -> String {
    value.format("%Y-%m-%dT%H:%M").to_string()
}

/// Hours with one decimal and a French comma: 2.26 -> "2,3 h"
pub fn format_hours(hours: f64) -> String {
    format!("{:.1} h", hours).replace('.', ",")
}

/// 90 -> "1 h 30", 45 -> "45 min"
pub fn format_minutes(minutes: i32) -> String {
    match (minutes / 60, minutes % 60) {
        (0, m) => format!("{} min", m),
        (h, 0) => format!("{} h", h),
        (h, m) => format!("{} h {:02}", h, m),
    }
}

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(format_date(date), "15/03/2024");
        assert_eq!(format_date_opt(None), "-");
    }

    #[test]
    fn test_format_datetime() {
        let dt = Utc.with_ymd_and_hms(2024, 12, 31, 23, 59, 59).unwrap();
        assert_eq!(format_datetime(dt), "31/12/2024 23:59");
    }

    #[test]
    fn test_iso_text() {
        assert_eq!(format_iso_date("2024-03-15"), "15/03/2024");
        assert_eq!(format_iso_date("2024-03-15T14:02:26Z"), "15/03/2024");
        assert_eq!(format_iso_date("invalid"), "invalid");
        assert_eq!(format_timestamp("2024-03-15T14:02:26+00:00"), "15/03/2024 14:02");
        assert_eq!(format_timestamp("2024-03-15"), "15/03/2024");
    }

    #[test]
    fn test_datetime_inputs() {
        let parsed = parse_datetime_input("2025-05-02T08:30").unwrap();
        assert_eq!(to_datetime_input(parsed), "2025-05-02T08:30");
        assert!(parse_datetime_input("2025-05-02T08:30:15").is_some());
        assert!(parse_datetime_input("02/05/2025").is_none());
    }

    #[test]
    fn test_hours() {
        assert_eq!(format_hours(2.26), "2,3 h");
        assert_eq!(format_hours(0.0), "0,0 h");
    }

    #[test]
    fn test_minutes() {
        assert_eq!(format_minutes(45), "45 min");
        assert_eq!(format_minutes(120), "2 h");
        assert_eq!(format_minutes(95), "1 h 35");
        assert_eq!(format_minutes(65), "1 h 05");
    }
}
