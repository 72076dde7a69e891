//! The nth occurrence of a weekday within a month ("3rd Wednesday").

use chrono::{Datelike, NaiveDate};

use crate::calendar::{add_months, days_in_month, iso_weekday as weekday_of};
use crate::error::SliceError;

/// Locates the `nth` occurrence of an ISO weekday (Monday = 1 … Sunday = 7)
/// in a given month.
///
/// Construction fails when that occurrence does not exist, e.g. a fifth
/// Monday in a month that only has four.
///
/// # Examples
///
/// ```
/// use slice_engine::NthWeekdayCalculator;
///
/// // 3rd Wednesday of March 2024
/// let calc = NthWeekdayCalculator::new(2024, 3, 3, 3).unwrap();
/// assert_eq!(calc.day(), 20);
/// assert_eq!(calc.next().unwrap().day(), 17);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NthWeekdayCalculator {
    year: i32,
    month: u32,
    nth: u32,
    iso_weekday: u32,
    date: NaiveDate,
}

impl NthWeekdayCalculator {
    /// # Errors
    ///
    /// Returns [`SliceError::InvalidArgument`] if `month` is not in `1..=12`,
    /// `iso_weekday` is not in `1..=7`, `nth` is zero, or the month has no
    /// such occurrence.
    pub fn new(year: i32, month: u32, nth: u32, iso_weekday: u32) -> Result<Self, SliceError> {
        if !(1..=7).contains(&iso_weekday) {
            return Err(SliceError::InvalidArgument(format!(
                "iso weekday must be in 1..=7, got {iso_weekday}"
            )));
        }
        if nth == 0 {
            return Err(SliceError::InvalidArgument(
                "occurrence must be at least 1".to_string(),
            ));
        }
        let last_day = days_in_month(year, month)?;
        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
            SliceError::InvalidArgument(format!("{year}-{month:02} is out of range"))
        })?;

        let offset = i64::from(iso_weekday) - i64::from(weekday_of(first));
        let mut day = 7 * (i64::from(nth) - 1) + 1 + offset;
        if offset < 0 {
            day += 7;
        }

        let date = u32::try_from(day)
            .ok()
            .filter(|d| *d <= last_day)
            .and_then(|d| NaiveDate::from_ymd_opt(year, month, d))
            .ok_or_else(|| {
                SliceError::InvalidArgument(format!(
                    "{year}-{month:02} has no occurrence {nth} of iso weekday {iso_weekday}"
                ))
            })?;

        Ok(Self {
            year,
            month,
            nth,
            iso_weekday,
            date,
        })
    }

    /// Same occurrence, in the month containing `date`.
    pub fn from_date(date: NaiveDate, nth: u32, iso_weekday: u32) -> Result<Self, SliceError> {
        Self::new(date.year(), date.month(), nth, iso_weekday)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn nth(&self) -> u32 {
        self.nth
    }

    pub fn iso_weekday(&self) -> u32 {
        self.iso_weekday
    }

    /// Day of the month.
    pub fn day(&self) -> u32 {
        self.date.day()
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Same occurrence in the previous month.
    ///
    /// # Errors
    ///
    /// Returns [`SliceError::InvalidArgument`] if that month has no such
    /// occurrence.
    pub fn previous(&self) -> Result<Self, SliceError> {
        self.shifted(-1)
    }

    /// Same occurrence in the next month.
    ///
    /// # Errors
    ///
    /// Returns [`SliceError::InvalidArgument`] if that month has no such
    /// occurrence.
    pub fn next(&self) -> Result<Self, SliceError> {
        self.shifted(1)
    }

    fn shifted(&self, months: i64) -> Result<Self, SliceError> {
        let (year, month) = add_months(self.year, self.month, months).ok_or_else(|| {
            SliceError::InvalidArgument(format!(
                "{}-{:02} shifted by {months} months is out of range",
                self.year, self.month
            ))
        })?;
        Self::new(year, month, self.nth, self.iso_weekday)
    }
}
