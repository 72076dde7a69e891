//! Recurrence stepping over a time slice.
//!
//! [`SliceIter`] walks a slice in consecutive, non-overlapping sub-slices of a
//! fixed [`Step`]. Two calendar irregularities are corrected on the way:
//!
//! - **Anchor day.** Month and year steps remember the starting day-of-month
//!   when it is past the 28th and clamp every boundary to
//!   `min(anchor, days_in_month)`. Stepping from January 31st visits
//!   February 28th and then March 31st again, instead of drifting to the 28th
//!   for good.
//! - **Daylight saving.** Day-or-longer fixed steps are counted in wall-clock
//!   time from the origin, so a boundary is pulled back (spring forward) or
//!   pushed forward (fall back) by the change in DST offset and never drifts.
//!   A boundary that lands in a DST gap moves past the gap for that step only.

use std::iter::FusedIterator;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, Timelike, Utc};
use chrono_tz::Tz;
use tracing::{trace, warn};

use crate::align::{start_of_day, Edge};
use crate::calendar::{add_months, days_in_month};
use crate::error::SliceError;
use crate::slice::{epsilon, TimeSlice};
use crate::zone::{dst_offset, localize};

/// The length of each generated sub-slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    /// An absolute length of time.
    Fixed(Duration),
    /// A number of calendar months.
    Months(u32),
    /// A number of calendar years.
    Years(u32),
}

impl Step {
    pub fn days(n: u32) -> Self {
        Step::Fixed(Duration::days(i64::from(n)))
    }

    pub fn weeks(n: u32) -> Self {
        Step::Fixed(Duration::days(7 * i64::from(n)))
    }

    pub fn months(n: u32) -> Self {
        Step::Months(n)
    }

    pub fn years(n: u32) -> Self {
        Step::Years(n)
    }

    /// Calendar steps whose length depends on where they start.
    pub fn is_calendar(&self) -> bool {
        matches!(self, Step::Months(_) | Step::Years(_))
    }

    fn months_per_step(&self) -> Option<i64> {
        match self {
            Step::Fixed(_) => None,
            Step::Months(n) => Some(i64::from(*n)),
            Step::Years(n) => Some(12 * i64::from(*n)),
        }
    }

    fn validate(&self) -> Result<(), SliceError> {
        let positive = match self {
            Step::Fixed(d) => *d > Duration::zero(),
            Step::Months(n) | Step::Years(n) => *n > 0,
        };
        if positive {
            Ok(())
        } else {
            Err(SliceError::InvalidArgument(format!(
                "recurrence step must be positive, got {self:?}"
            )))
        }
    }
}

impl From<Duration> for Step {
    fn from(duration: Duration) -> Self {
        Step::Fixed(duration)
    }
}

/// Lazy sequence of sub-slices covering a parent slice.
///
/// Created by [`TimeSlice::iter`] and friends. Every sub-slice has the
/// parent's timezone and rounding options; the last one is truncated to the
/// parent's end. Iteration stops once the left cursor reaches the end, so a
/// zero-length parent yields nothing.
#[derive(Debug, Clone)]
pub struct SliceIter {
    parent: TimeSlice,
    step: Step,
    cursor: Option<DateTime<Utc>>,
    origin: NaiveDateTime,
    anchor_day: Option<u32>,
    emitted: i64,
}

impl SliceIter {
    fn new(parent: &TimeSlice, step: Step) -> Result<Self, SliceError> {
        step.validate()?;
        let origin = parent.start().naive_local();
        let anchor_day = (step.is_calendar() && origin.day() > 28).then_some(origin.day());
        Ok(Self {
            parent: parent.clone(),
            step,
            cursor: Some(parent.start_utc()),
            origin,
            anchor_day,
            emitted: 0,
        })
    }

    /// The left boundary of the next sub-slice, or `None` if it cannot be
    /// represented.
    fn advance(&self, left: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let tz = self.parent.timezone();

        match self.step {
            Step::Fixed(length) if length < Duration::days(1) => {
                left.checked_add_signed(length)
            }
            Step::Fixed(length) => {
                let steps = i32::try_from(self.emitted + 1).ok()?;
                let wall = self.origin.checked_add_signed(length.checked_mul(steps)?)?;
                let next = Self::resolve(tz, wall)?;
                let delta =
                    dst_offset(&next.with_timezone(&tz)) - dst_offset(&left.with_timezone(&tz));
                if !delta.is_zero() {
                    trace!(
                        boundary = %next,
                        delta_minutes = delta.num_minutes(),
                        "corrected recurrence boundary for DST transition"
                    );
                }
                Some(next)
            }
            Step::Months(_) | Step::Years(_) => {
                let months = self.step.months_per_step()? * (self.emitted + 1);
                let (year, month) = add_months(self.origin.year(), self.origin.month(), months)?;
                let day = match self.anchor_day {
                    Some(anchor) => {
                        let clamped = anchor.min(days_in_month(year, month).ok()?);
                        if clamped != anchor {
                            trace!(year, month, anchor, clamped, "clamping anchor day");
                        }
                        clamped
                    }
                    None => self.origin.day(),
                };
                let date = NaiveDate::from_ymd_opt(year, month, day)?;
                Self::resolve(tz, date.and_time(self.origin.time()))
            }
        }
    }

    fn resolve(tz: Tz, wall: NaiveDateTime) -> Option<DateTime<Utc>> {
        localize(tz, wall, Edge::Left)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

impl Iterator for SliceIter {
    type Item = TimeSlice;

    fn next(&mut self) -> Option<Self::Item> {
        let left = self.cursor.take()?;
        let end = self.parent.end_utc();
        if left >= end {
            return None;
        }

        let next_left = match self.advance(left) {
            Some(next) if next > left => Some(next),
            _ => {
                warn!(
                    "recurrence from {} by {:?} left the representable range, stopping",
                    left, self.step
                );
                None
            }
        };

        let is_last = next_left.is_none_or(|next| next >= end);
        let right = next_left.map_or(end, |next| (next - epsilon()).min(end));

        let slice = self.parent.with_bounds(left, right);

        self.emitted += 1;
        if !is_last {
            self.cursor = next_left;
        }
        Some(slice)
    }
}

impl FusedIterator for SliceIter {}

impl TimeSlice {
    /// Step through the slice in sub-slices of length `step`.
    ///
    /// # Errors
    ///
    /// Returns [`SliceError::InvalidArgument`] if `step` is zero or negative.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{Duration, TimeZone};
    /// use chrono_tz::UTC;
    /// use slice_engine::TimeSlice;
    ///
    /// let morning = TimeSlice::new(
    ///     UTC.with_ymd_and_hms(2026, 3, 16, 9, 0, 0).unwrap(),
    ///     UTC.with_ymd_and_hms(2026, 3, 16, 12, 0, 0).unwrap(),
    /// )
    /// .unwrap();
    /// let hours: Vec<_> = morning.iter(Duration::hours(1)).unwrap().collect();
    /// assert_eq!(hours.len(), 3);
    /// ```
    pub fn iter(&self, step: impl Into<Step>) -> Result<SliceIter, SliceError> {
        SliceIter::new(self, step.into())
    }

    pub fn iter_days(&self, step: u32) -> Result<SliceIter, SliceError> {
        self.iter(Step::days(step))
    }

    pub fn iter_weeks(&self, step: u32) -> Result<SliceIter, SliceError> {
        self.iter(Step::weeks(step))
    }

    /// Step in calendar months, snapped to calendar-month boundaries.
    ///
    /// The first sub-slice runs from the slice start to the end of the
    /// `step`-month block containing it; every interior sub-slice covers
    /// exactly `step` whole calendar months and the last is truncated to the
    /// slice end. Use [`iter`](Self::iter) with [`Step::months`] to step from
    /// the start's own day-of-month instead.
    pub fn iter_months(&self, step: u32) -> Result<SliceIter, SliceError> {
        let mut iter = SliceIter::new(self, Step::months(step))?;
        let origin = iter.origin;
        let aligned = origin.day() == 1
            && origin.num_seconds_from_midnight() == 0
            && origin.nanosecond() == 0;
        if !aligned {
            let first = NaiveDate::from_ymd_opt(origin.year(), origin.month(), 1)
                .ok_or_else(|| {
                    SliceError::InvalidDatetime(format!("month containing {origin} is out of range"))
                })?;
            iter.origin = first.and_time(start_of_day());
            iter.anchor_day = None;
        }
        Ok(iter)
    }

    pub fn iter_years(&self, step: u32) -> Result<SliceIter, SliceError> {
        self.iter(Step::years(step))
    }
}
