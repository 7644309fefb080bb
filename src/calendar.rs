//! Calendar-day helpers shared by the generator and the aggregator.
//!
//! Everything here works on `NaiveDate` (no time-of-day, no time zone), which is
//! exactly the granularity of the persisted series.

use chrono::{Datelike, Days, Local, Months, NaiveDate};

use crate::error::AppError;

/// Persisted date format (`YYYY-MM-DD`).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Today's local calendar day.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn parse_day(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|e| AppError::usage(format!("Invalid date '{raw}' (expected YYYY-MM-DD): {e}")))
}

pub fn jan_first(year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, 1, 1)
}

/// Zero-based day of the year (Jan 1 = 0).
pub fn day_of_year0(date: NaiveDate) -> u32 {
    date.ordinal0()
}

/// Calendar quarter `1..=4` (`ceil(month / 3)`).
pub fn quarter_of(date: NaiveDate) -> u32 {
    (date.month() + 2) / 3
}

pub fn add_days(date: NaiveDate, days: u64) -> Option<NaiveDate> {
    date.checked_add_days(Days::new(days))
}

pub fn sub_days(date: NaiveDate, days: u64) -> Option<NaiveDate> {
    date.checked_sub_days(Days::new(days))
}

/// Same day `months` months earlier, clamped to the end of shorter months.
pub fn months_before(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    date.checked_sub_months(Months::new(months))
}

pub fn years_before(date: NaiveDate, years: u32) -> Option<NaiveDate> {
    months_before(date, years.checked_mul(12)?)
}

/// Whole days from `start` to `end` (negative when `end` precedes `start`).
pub fn days_between(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn quarter_is_ceiling_of_month_over_three() {
        assert_eq!(quarter_of(d(2024, 1, 31)), 1);
        assert_eq!(quarter_of(d(2024, 3, 1)), 1);
        assert_eq!(quarter_of(d(2024, 4, 1)), 2);
        assert_eq!(quarter_of(d(2024, 9, 30)), 3);
        assert_eq!(quarter_of(d(2024, 12, 31)), 4);
    }

    #[test]
    fn years_before_clamps_leap_day() {
        assert_eq!(years_before(d(2024, 2, 29), 1), Some(d(2023, 2, 28)));
        assert_eq!(years_before(d(2025, 6, 10), 10), Some(d(2015, 6, 10)));
    }

    #[test]
    fn ten_year_window_spans_leap_days() {
        let end = d(2025, 6, 10);
        let start = years_before(end, 10).unwrap();
        // 2016, 2020 and 2024 contribute a leap day each.
        assert_eq!(days_between(start, end), 3653);
    }

    #[test]
    fn parse_day_rejects_garbage() {
        assert_eq!(parse_day("2024-03-05").unwrap(), d(2024, 3, 5));
        assert!(parse_day("2024-13-05").is_err());
        assert!(parse_day("05/03/2024").is_err());
    }
}
