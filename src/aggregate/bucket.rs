//! Calendar bucket keys and their display anchors.
//!
//! Each coarse granularity maps a day to a `(year, period)` key:
//!
//! | granularity | period                         | display date                  |
//! |-------------|--------------------------------|-------------------------------|
//! | week        | `day_of_year0 / 7`             | Jan 1 + `7 * period + 3` days |
//! | month       | month `1..=12`                 | 15th of the month             |
//! | quarter     | `ceil(month / 3)`              | 15th of the middle month      |
//! | year        | `0`                            | July 1                        |
//!
//! The week index counts 7-day blocks from Jan 1. It is not an ISO week: the
//! last block of a year has one or two days and its anchor lands in January of
//! the next year. Changing that would move every stored weekly display date.

use chrono::{Datelike, NaiveDate};

use crate::calendar;
use crate::domain::Granularity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BucketKey {
    pub year: i32,
    pub period: u32,
}

/// Bucket containing `date`; `None` for `Granularity::Day` (no bucketing).
pub fn bucket_key(date: NaiveDate, granularity: Granularity) -> Option<BucketKey> {
    let year = date.year();
    let period = match granularity {
        Granularity::Day => return None,
        Granularity::Week => calendar::day_of_year0(date) / 7,
        Granularity::Month => date.month(),
        Granularity::Quarter => calendar::quarter_of(date),
        Granularity::Year => 0,
    };
    Some(BucketKey { year, period })
}

/// Representative display date of a bucket.
pub fn display_date(key: BucketKey, granularity: Granularity) -> Option<NaiveDate> {
    match granularity {
        Granularity::Day => None,
        Granularity::Week => {
            let jan1 = calendar::jan_first(key.year)?;
            calendar::add_days(jan1, u64::from(key.period) * 7 + 3)
        }
        Granularity::Month => NaiveDate::from_ymd_opt(key.year, key.period, 15),
        Granularity::Quarter => {
            let middle_month = (key.period.checked_sub(1)?) * 3 + 2;
            NaiveDate::from_ymd_opt(key.year, middle_month, 15)
        }
        Granularity::Year => NaiveDate::from_ymd_opt(key.year, 7, 1),
    }
}
