//! Bucket key computation and chronological ordering.
//!
//! Keys are plain strings so they can be shown as chart labels as-is:
//!
//! | Granularity | Key        | Example      |
//! |-------------|------------|--------------|
//! | daily       | raw date   | `2024-01-05` |
//! | weekly      | `%Y-%W`    | `2024-01`    |
//! | monthly     | `YYYY-MM`  | `2024-01`    |
//!
//! Weekly keys use Monday-based week numbers on the calendar date: week `01`
//! starts on the first Monday of the year and any days before it fall in
//! week `00`. The year part is always the calendar year of the date, so
//! `2024-12-31` maps to `2024-53` and `2025-01-01` to `2025-00`.

use chrono::{Datelike, NaiveDate};

use crate::analyzers::types::{AggregatedPoint, Granularity};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Computes the bucket key for `date`, or `None` if it has no valid key
/// under `granularity`.
pub fn bucket_key(date: &str, granularity: Granularity) -> Option<String> {
    match granularity {
        Granularity::Daily => (!date.is_empty()).then(|| date.to_string()),
        Granularity::Weekly => parse_date(date).map(week_key),
        Granularity::Monthly => month_key(date),
    }
}

/// Parses a `YYYY-MM-DD` date string.
pub fn parse_date(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date, DATE_FORMAT).ok()
}

/// Monday-based week of year, `0..=53`.
pub fn week_of_year(date: NaiveDate) -> u32 {
    let ordinal0 = date.ordinal0();
    let weekday = date.weekday().num_days_from_monday();
    (ordinal0 + 7 - weekday) / 7
}

pub fn week_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), week_of_year(date))
}

/// First seven characters of the date (`YYYY-MM`).
pub fn month_key(date: &str) -> Option<String> {
    date.get(..7).map(str::to_string)
}

/// Label for month `month` (1-based) of `year`.
pub fn month_label(year: i32, month: u32) -> String {
    format!("{year:04}-{month:02}")
}

/// The date a bucket key stands for, used to order buckets in time.
///
/// Weekly keys resolve to the Monday that starts the week, or January 1st
/// for week `00`.
pub fn representative_date(key: &str, granularity: Granularity) -> Option<NaiveDate> {
    match granularity {
        Granularity::Daily => parse_date(key),
        Granularity::Monthly => parse_date(&format!("{key}-01")),
        Granularity::Weekly => {
            let (year, week) = key.split_once('-')?;
            let year: i32 = year.parse().ok()?;
            let week: u32 = week.parse().ok()?;
            let jan1 = NaiveDate::from_ymd_opt(year, 1, 1)?;
            if week == 0 {
                return Some(jan1);
            }
            let days_to_monday = (7 - jan1.weekday().num_days_from_monday()) % 7;
            let first_monday = jan1 + chrono::Days::new(u64::from(days_to_monday));
            let start = first_monday + chrono::Days::new(u64::from(week - 1) * 7);
            (start.year() == year).then_some(start)
        }
    }
}

/// Sorts points into ascending chronological order.
///
/// Keys that do not map to a date are placed after all dated keys, ordered
/// lexically among themselves.
pub fn sort_chronologically(points: &mut [AggregatedPoint], granularity: Granularity) {
    points.sort_by_cached_key(|p| {
        let date = representative_date(&p.bucket, granularity);
        (date.is_none(), date, p.bucket.clone())
    });
}
