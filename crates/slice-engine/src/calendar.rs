//! Civil-calendar queries used by alignment and recurrence stepping.

use chrono::{Datelike, NaiveDate};

use crate::error::SliceError;

/// Number of days in the given month (28–31).
///
/// # Errors
///
/// Returns [`SliceError::InvalidArgument`] if `month` is not in `1..=12` or the
/// year is outside chrono's calendar range.
///
/// # Examples
///
/// ```
/// use slice_engine::calendar::days_in_month;
///
/// assert_eq!(days_in_month(2024, 2).unwrap(), 29);
/// assert_eq!(days_in_month(2023, 2).unwrap(), 28);
/// assert_eq!(days_in_month(2026, 4).unwrap(), 30);
/// ```
pub fn days_in_month(year: i32, month: u32) -> Result<u32, SliceError> {
    if !(1..=12).contains(&month) {
        return Err(SliceError::InvalidArgument(format!(
            "month must be in 1..=12, got {month}"
        )));
    }
    add_months(year, month, 1)
        .and_then(|(ny, nm)| NaiveDate::from_ymd_opt(ny, nm, 1))
        .and_then(|first_next| first_next.pred_opt())
        .map(|last| last.day())
        .ok_or_else(|| SliceError::InvalidArgument(format!("year out of range: {year}")))
}

/// ISO 8601 weekday number, Monday = 1 … Sunday = 7.
pub fn iso_weekday(date: NaiveDate) -> u32 {
    date.weekday().number_from_monday()
}

/// Shift `(year, month)` by `delta` months, rolling the year as needed.
pub(crate) fn add_months(year: i32, month: u32, delta: i64) -> Option<(i32, u32)> {
    let index = i64::from(year) * 12 + i64::from(month) - 1 + delta;
    let year = i32::try_from(index.div_euclid(12)).ok()?;
    let month = u32::try_from(index.rem_euclid(12)).ok()? + 1;
    Some((year, month))
}
