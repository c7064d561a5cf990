//! Calendar helpers for report naming.
//!
//! Every helper takes `today` explicitly; the `*_from_today` wrappers feed it
//! the local date.

use crate::reports::error::{ReportError, ReportResult};
use chrono::format::{Item, StrftimeItems};
use chrono::{Datelike, Duration, Local, NaiveDate};

/// Month number `delta` months away from `today`, wrapped into 1..=12 and
/// zero-padded to `digits`.
pub fn month_with_delta(today: NaiveDate, delta: i32, digits: usize) -> String {
    let month = (today.month0() as i32 + delta).rem_euclid(12) + 1;
    format!("{:0width$}", month, width = digits)
}

/// Calendar year of the month `delta` months away from `today`.
pub fn year_with_delta(today: NaiveDate, delta: i32) -> i32 {
    today.year() + (today.month0() as i32 + delta).div_euclid(12)
}

/// Most recent Monday-to-Friday date at or before `today + delta` days.
/// `delta` must lie in `-6..=0`.
pub fn last_weekday(today: NaiveDate, delta: i64, fmt: &str) -> ReportResult<String> {
    if !(-6..=0).contains(&delta) {
        return Err(ReportError::InvalidArgument(format!(
            "delta '{}' for last_weekday must be between -6 and 0",
            delta
        )));
    }
    check_format(fmt)?;
    let mut date = today + Duration::days(delta);
    while !is_weekday(date) {
        date = date - Duration::days(1);
    }
    Ok(date.format(fmt).to_string())
}

/// The `n`-th Monday-to-Friday date of `today`'s month; `0` yields the 1st.
/// `n` beyond the month's weekday count is rejected.
pub fn month_weekday(today: NaiveDate, n: u32, fmt: &str) -> ReportResult<String> {
    check_format(fmt)?;
    let mut date = today - Duration::days(i64::from(today.day0()));
    let mut seen = 0;
    while date.month() == today.month() {
        if is_weekday(date) {
            seen += 1;
        }
        if seen >= n {
            return Ok(date.format(fmt).to_string());
        }
        date = match date.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }
    Err(ReportError::InvalidArgument(format!(
        "month {} has only {} weekday(s), asked for weekday {}",
        today.format("%Y-%m"),
        seen,
        n
    )))
}

pub fn month_from_today(delta: i32, digits: usize) -> String {
    month_with_delta(Local::now().date_naive(), delta, digits)
}

pub fn year_from_today(delta: i32) -> i32 {
    year_with_delta(Local::now().date_naive(), delta)
}

pub fn last_weekday_from_today(delta: i64, fmt: &str) -> ReportResult<String> {
    last_weekday(Local::now().date_naive(), delta, fmt)
}

pub fn month_weekday_from_today(n: u32, fmt: &str) -> ReportResult<String> {
    month_weekday(Local::now().date_naive(), n, fmt)
}

fn is_weekday(date: NaiveDate) -> bool {
    date.weekday().num_days_from_monday() < 5
}

// chrono panics when rendering a malformed format string.
fn check_format(fmt: &str) -> ReportResult<()> {
    if StrftimeItems::new(fmt).any(|item| matches!(item, Item::Error)) {
        return Err(ReportError::InvalidArgument(format!(
            "invalid date format '{}'",
            fmt
        )));
    }
    Ok(())
}
