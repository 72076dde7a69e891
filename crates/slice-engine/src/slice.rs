//! The time slice: a closed interval `[start, end]` of absolute instants.
//!
//! Instants are stored in UTC at microsecond resolution so that comparisons
//! never depend on the zone they were built in. A display timezone rides
//! along and is used whenever a wall-clock view is needed: reading
//! [`TimeSlice::start`], aligning to calendar periods, and recurrence
//! stepping.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, Duration, SubsecRound, TimeZone, Utc};
use chrono_tz::Tz;
use rust_decimal::Decimal;

use crate::align::{align, Edge, Granularity};
use crate::error::SliceError;
use crate::format::{format_duration, DurationLabels, FormattedDuration};
use crate::hours::{duration_to_unit_hours, RoundingOptions};

/// The smallest gap between two distinct instants.
pub fn epsilon() -> Duration {
    Duration::microseconds(1)
}

/// Bring an instant into the internal reference frame: UTC, truncated to
/// microseconds.
pub(crate) fn normalize<T: TimeZone>(instant: &DateTime<T>) -> DateTime<Utc> {
    instant.with_timezone(&Utc).trunc_subsecs(6)
}

/// A closed interval of time with a display timezone.
///
/// Identity is `(start, end)` only: two slices covering the same instants
/// compare equal even when their display zones differ.
///
/// # Examples
///
/// ```
/// use chrono::TimeZone;
/// use chrono_tz::UTC;
/// use slice_engine::TimeSlice;
///
/// let day = TimeSlice::new(
///     UTC.with_ymd_and_hms(2026, 3, 16, 9, 0, 0).unwrap(),
///     UTC.with_ymd_and_hms(2026, 3, 16, 17, 0, 0).unwrap(),
/// )
/// .unwrap();
/// let lunch = TimeSlice::new(
///     UTC.with_ymd_and_hms(2026, 3, 16, 12, 0, 0).unwrap(),
///     UTC.with_ymd_and_hms(2026, 3, 16, 13, 0, 0).unwrap(),
/// )
/// .unwrap();
///
/// let pieces = day.punch_hole(&lunch);
/// assert_eq!(pieces.len(), 2);
/// assert_eq!(pieces[1].start(), lunch.end());
/// ```
#[derive(Debug, Clone)]
pub struct TimeSlice {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    tz: Tz,
    rounding: RoundingOptions,
}

// ── construction ────────────────────────────────────────────────────────────

impl TimeSlice {
    /// Build a slice from explicit endpoints. The display timezone is the
    /// start's timezone.
    ///
    /// # Errors
    ///
    /// Returns [`SliceError::InvalidArgument`] if `end` is before `start`.
    pub fn new(start: DateTime<Tz>, end: DateTime<Tz>) -> Result<Self, SliceError> {
        Self::from_utc(normalize(&start), normalize(&end), start.timezone())
    }

    /// Build a slice from a start and a length.
    ///
    /// # Errors
    ///
    /// Returns [`SliceError::InvalidArgument`] for a negative duration and
    /// [`SliceError::InvalidDatetime`] if the end overflows chrono's range.
    pub fn with_duration(start: DateTime<Tz>, duration: Duration) -> Result<Self, SliceError> {
        let end = start.checked_add_signed(duration).ok_or_else(|| {
            SliceError::InvalidDatetime(format!(
                "{} + {} is out of range",
                start.to_rfc3339(),
                duration
            ))
        })?;
        Self::new(start, end)
    }

    /// A zero-length slice representing a single instant.
    pub fn at(instant: DateTime<Tz>) -> Self {
        let point = normalize(&instant);
        Self {
            start: point,
            end: point,
            tz: instant.timezone(),
            rounding: RoundingOptions::default(),
        }
    }

    /// Build a slice from a start and at most one of `end` or `duration`.
    ///
    /// With neither, the slice is zero-length at `start`.
    ///
    /// # Errors
    ///
    /// Returns [`SliceError::InvalidArgument`] if both `end` and `duration`
    /// are given, or if the resulting end is before the start.
    pub fn from_parts(
        start: DateTime<Tz>,
        end: Option<DateTime<Tz>>,
        duration: Option<Duration>,
    ) -> Result<Self, SliceError> {
        match (end, duration) {
            (Some(end), None) => Self::new(start, end),
            (None, Some(duration)) => Self::with_duration(start, duration),
            (None, None) => Ok(Self::at(start)),
            (Some(_), Some(_)) => Err(SliceError::InvalidArgument(
                "end and duration cannot both be set".to_string(),
            )),
        }
    }

    /// Build a slice from UTC endpoints with an explicit display timezone.
    ///
    /// # Errors
    ///
    /// Returns [`SliceError::InvalidArgument`] if `end` is before `start`.
    pub fn from_utc(start: DateTime<Utc>, end: DateTime<Utc>, tz: Tz) -> Result<Self, SliceError> {
        let start = start.trunc_subsecs(6);
        let end = end.trunc_subsecs(6);
        if start > end {
            return Err(SliceError::InvalidArgument(format!(
                "start {} cannot come after end {}",
                start.to_rfc3339(),
                end.to_rfc3339()
            )));
        }
        Ok(Self {
            start,
            end,
            tz,
            rounding: RoundingOptions::default(),
        })
    }

    /// A slice sharing this one's timezone and rounding, with new bounds.
    ///
    /// Callers guarantee `start <= end`.
    pub(crate) fn with_bounds(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        debug_assert!(start <= end);
        Self {
            start,
            end,
            tz: self.tz,
            rounding: self.rounding,
        }
    }

    /// Attach unit-hours rounding configuration.
    pub fn with_rounding(mut self, rounding: RoundingOptions) -> Self {
        self.rounding = rounding;
        self
    }

    /// The same interval displayed in another timezone.
    pub fn with_timezone(mut self, tz: Tz) -> Self {
        self.tz = tz;
        self
    }
}

// ── accessors and mutators ──────────────────────────────────────────────────

impl TimeSlice {
    pub fn start(&self) -> DateTime<Tz> {
        self.start.with_timezone(&self.tz)
    }

    pub fn end(&self) -> DateTime<Tz> {
        self.end.with_timezone(&self.tz)
    }

    pub fn start_utc(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end_utc(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn range(&self) -> (DateTime<Tz>, DateTime<Tz>) {
        (self.start(), self.end())
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    pub fn set_timezone(&mut self, tz: Tz) {
        self.tz = tz;
    }

    pub fn rounding(&self) -> &RoundingOptions {
        &self.rounding
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn is_zero_length(&self) -> bool {
        self.start == self.end
    }

    /// Move the start. The slice is left untouched on error.
    ///
    /// # Errors
    ///
    /// Returns [`SliceError::InvariantViolation`] if `value` is after the end.
    pub fn set_start<T: TimeZone>(&mut self, value: DateTime<T>) -> Result<(), SliceError> {
        let value = normalize(&value);
        if value > self.end {
            return Err(SliceError::InvariantViolation(format!(
                "start cannot be set to {}, after the end {}",
                value.to_rfc3339(),
                self.end.to_rfc3339()
            )));
        }
        self.start = value;
        Ok(())
    }

    /// Move the end. The slice is left untouched on error.
    ///
    /// # Errors
    ///
    /// Returns [`SliceError::InvariantViolation`] if `value` is before the start.
    pub fn set_end<T: TimeZone>(&mut self, value: DateTime<T>) -> Result<(), SliceError> {
        let value = normalize(&value);
        if value < self.start {
            return Err(SliceError::InvariantViolation(format!(
                "end cannot be set to {}, before the start {}",
                value.to_rfc3339(),
                self.start.to_rfc3339()
            )));
        }
        self.end = value;
        Ok(())
    }

    /// Translate both endpoints back in time.
    ///
    /// # Errors
    ///
    /// Returns [`SliceError::InvalidDatetime`] if either endpoint would leave
    /// the representable range. The slice is left untouched on error.
    pub fn shift_left(&mut self, duration: Duration) -> Result<(), SliceError> {
        self.shift_by(-duration)
    }

    /// Translate both endpoints forward in time.
    ///
    /// # Errors
    ///
    /// Returns [`SliceError::InvalidDatetime`] if either endpoint would leave
    /// the representable range. The slice is left untouched on error.
    pub fn shift_right(&mut self, duration: Duration) -> Result<(), SliceError> {
        self.shift_by(duration)
    }

    fn shift_by(&mut self, duration: Duration) -> Result<(), SliceError> {
        match (
            self.start.checked_add_signed(duration),
            self.end.checked_add_signed(duration),
        ) {
            (Some(start), Some(end)) => {
                self.start = start.trunc_subsecs(6);
                self.end = end.trunc_subsecs(6);
                Ok(())
            }
            _ => Err(SliceError::InvalidDatetime(format!(
                "shifting {self} by {duration} is out of range"
            ))),
        }
    }
}

// ── alignment ───────────────────────────────────────────────────────────────

impl TimeSlice {
    /// Move the start to an edge of the period containing it, evaluated in the
    /// slice's display timezone.
    ///
    /// # Errors
    ///
    /// Returns [`SliceError::InvariantViolation`] if the aligned start would
    /// pass the end (possible with [`Edge::Right`]).
    pub fn align_start(&mut self, granularity: Granularity, edge: Edge) -> Result<(), SliceError> {
        let aligned = align(&self.start(), edge, granularity)?;
        self.set_start(aligned)
    }

    /// Move the end to an edge of the period containing it.
    ///
    /// # Errors
    ///
    /// Returns [`SliceError::InvariantViolation`] if the aligned end would
    /// precede the start (possible with [`Edge::Left`]).
    pub fn align_end(&mut self, granularity: Granularity, edge: Edge) -> Result<(), SliceError> {
        let aligned = align(&self.end(), edge, granularity)?;
        self.set_end(aligned)
    }

    pub fn align_start_to_day(&mut self, edge: Edge) -> Result<(), SliceError> {
        self.align_start(Granularity::Day, edge)
    }

    pub fn align_end_to_day(&mut self, edge: Edge) -> Result<(), SliceError> {
        self.align_end(Granularity::Day, edge)
    }

    pub fn align_start_to_week(&mut self, edge: Edge) -> Result<(), SliceError> {
        self.align_start(Granularity::Week, edge)
    }

    pub fn align_end_to_week(&mut self, edge: Edge) -> Result<(), SliceError> {
        self.align_end(Granularity::Week, edge)
    }

    pub fn align_start_to_month(&mut self, edge: Edge) -> Result<(), SliceError> {
        self.align_start(Granularity::Month, edge)
    }

    pub fn align_end_to_month(&mut self, edge: Edge) -> Result<(), SliceError> {
        self.align_end(Granularity::Month, edge)
    }

    pub fn align_start_to_year(&mut self, edge: Edge) -> Result<(), SliceError> {
        self.align_start(Granularity::Year, edge)
    }

    pub fn align_end_to_year(&mut self, edge: Edge) -> Result<(), SliceError> {
        self.align_end(Granularity::Year, edge)
    }
}

// ── predicates ──────────────────────────────────────────────────────────────

impl TimeSlice {
    /// True if the two closed intervals share at least one instant.
    /// Touching endpoints count.
    pub fn overlaps(&self, other: &TimeSlice) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// True if `instant` lies within `[start, end]`.
    pub fn overlaps_instant<T: TimeZone>(&self, instant: &DateTime<T>) -> bool {
        let instant = normalize(instant);
        self.start <= instant && instant <= self.end
    }

    /// True if this slice ends no later than `other` starts.
    pub fn before(&self, other: &TimeSlice) -> bool {
        self.end <= other.start
    }

    /// True if this slice starts no earlier than `other` ends.
    pub fn after(&self, other: &TimeSlice) -> bool {
        self.start >= other.end
    }

    pub fn before_instant<T: TimeZone>(&self, instant: &DateTime<T>) -> bool {
        self.end <= normalize(instant)
    }

    pub fn after_instant<T: TimeZone>(&self, instant: &DateTime<T>) -> bool {
        self.start >= normalize(instant)
    }

    /// True if this slice fully contains `other`.
    pub fn occludes(&self, other: &TimeSlice) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// True if `other` fully contains this slice.
    pub fn occluded_by(&self, other: &TimeSlice) -> bool {
        other.occludes(self)
    }
}

// ── split / punch / merge ───────────────────────────────────────────────────

impl TimeSlice {
    /// Split into `[start, point - ε]` and `[point, end]`.
    ///
    /// The left piece is `None` when `point` equals the start.
    ///
    /// # Errors
    ///
    /// Returns [`SliceError::InvalidArgument`] if `point` is outside the slice.
    pub fn split<T: TimeZone>(
        &self,
        point: &DateTime<T>,
    ) -> Result<(Option<TimeSlice>, TimeSlice), SliceError> {
        let point = normalize(point);
        if point < self.start || point > self.end {
            return Err(SliceError::InvalidArgument(format!(
                "split point {} is outside {}",
                point.to_rfc3339(),
                self
            )));
        }
        Ok(self.split_within(point))
    }

    /// [`split`](Self::split) for a point already known to be inside the slice.
    pub(crate) fn split_within(&self, point: DateTime<Utc>) -> (Option<TimeSlice>, TimeSlice) {
        let left = (point > self.start).then(|| self.with_bounds(self.start, point - epsilon()));
        (left, self.with_bounds(point, self.end))
    }

    /// Remove the part of this slice covered by `hole`.
    ///
    /// Returns zero, one or two pieces in chronological order.
    pub fn punch_hole(&self, hole: &TimeSlice) -> Vec<TimeSlice> {
        if hole.occludes(self) {
            return Vec::new();
        }
        if !self.overlaps(hole) {
            return vec![self.clone()];
        }

        let mut pieces = Vec::with_capacity(2);
        // Overlapping but not covered, so whichever hole edge lies strictly
        // inside is a valid split point.
        if hole.start > self.start {
            if let (Some(left), _) = self.split_within(hole.start) {
                pieces.push(left);
            }
        }
        if hole.end < self.end {
            let (_, right) = self.split_within(hole.end);
            pieces.push(right);
        }
        pieces
    }

    /// The union of two overlapping (or touching) slices.
    ///
    /// # Errors
    ///
    /// Returns [`SliceError::InvalidArgument`] if the slices are disjoint.
    pub fn merge(&self, other: &TimeSlice) -> Result<TimeSlice, SliceError> {
        if !self.overlaps(other) {
            return Err(SliceError::InvalidArgument(format!(
                "cannot merge non-overlapping slices {} and {}",
                self, other
            )));
        }
        Ok(self.with_bounds(self.start.min(other.start), self.end.max(other.end)))
    }
}

// ── durations ───────────────────────────────────────────────────────────────

impl TimeSlice {
    /// Length in hours, rounded to the configured decimal places if any.
    pub fn unit_hours(&self) -> Decimal {
        duration_to_unit_hours(Some(self.duration()), self.rounding.decimal_places)
    }

    /// Length in hours with the configured step rounding applied.
    pub fn rounded_unit_hours(&self) -> Result<Decimal, SliceError> {
        self.rounding.apply(Some(self.duration()))
    }

    pub fn formatted_duration(&self, labels: &DurationLabels) -> FormattedDuration {
        format_duration(self.duration(), labels)
    }
}

// ── trait impls ─────────────────────────────────────────────────────────────

impl PartialEq for TimeSlice {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start && self.end == other.end
    }
}

impl Eq for TimeSlice {}

impl Hash for TimeSlice {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.start.hash(state);
        self.end.hash(state);
    }
}

impl PartialOrd for TimeSlice {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimeSlice {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.start, self.end).cmp(&(other.start, other.end))
    }
}

impl fmt::Display for TimeSlice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Time Slice: {} - {}",
            self.start().to_rfc3339(),
            self.end().to_rfc3339()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::America::New_York;
    use chrono_tz::UTC;

    fn at(h: u32, m: u32) -> DateTime<Tz> {
        UTC.with_ymd_and_hms(2026, 3, 16, h, m, 0).unwrap()
    }

    fn slice(h1: u32, m1: u32, h2: u32, m2: u32) -> TimeSlice {
        TimeSlice::new(at(h1, m1), at(h2, m2)).unwrap()
    }

    // ── construction tests ──────────────────────────────────────────────

    #[test]
    fn test_new_rejects_end_before_start() {
        let err = TimeSlice::new(at(10, 0), at(9, 0)).unwrap_err();
        assert!(matches!(err, SliceError::InvalidArgument(_)));
    }

    #[test]
    fn test_with_duration_derives_end() {
        let s = TimeSlice::with_duration(at(9, 0), Duration::minutes(90)).unwrap();
        assert_eq!(s.end(), at(10, 30));
    }

    #[test]
    fn test_with_negative_duration_is_invalid() {
        let err = TimeSlice::with_duration(at(9, 0), Duration::minutes(-1)).unwrap_err();
        assert!(matches!(err, SliceError::InvalidArgument(_)));
    }

    #[test]
    fn test_from_parts_rejects_end_and_duration() {
        let err = TimeSlice::from_parts(at(9, 0), Some(at(10, 0)), Some(Duration::hours(1)))
            .unwrap_err();
        assert_eq!(
            err,
            SliceError::InvalidArgument("end and duration cannot both be set".to_string())
        );
    }

    #[test]
    fn test_from_parts_start_only_is_zero_length() {
        let s = TimeSlice::from_parts(at(9, 0), None, None).unwrap();
        assert!(s.is_zero_length());
        assert_eq!(s.duration(), Duration::zero());
        assert_eq!(s, TimeSlice::at(at(9, 0)));
    }

    #[test]
    fn test_instants_truncate_to_microseconds() {
        let start = at(9, 0) + Duration::nanoseconds(1_500);
        let s = TimeSlice::at(start);
        assert_eq!(s.start_utc(), normalize(&at(9, 0)) + Duration::microseconds(1));
    }

    #[test]
    fn test_equality_ignores_timezone() {
        let utc = slice(14, 0, 15, 0);
        let ny = utc.clone().with_timezone(New_York);
        assert_eq!(utc, ny);
        assert_eq!(ny.start().timezone(), New_York);
        // 14:00 UTC in March (EDT) is 10:00 local
        assert!(ny.start().to_rfc3339().starts_with("2026-03-16T10:00:00"));
    }

    // ── mutation tests ──────────────────────────────────────────────────

    #[test]
    fn test_set_start_after_end_fails_without_mutating() {
        let mut s = slice(9, 0, 10, 0);
        let err = s.set_start(at(11, 0)).unwrap_err();
        assert!(matches!(err, SliceError::InvariantViolation(_)));
        assert_eq!(s, slice(9, 0, 10, 0));
    }

    #[test]
    fn test_set_end_before_start_fails() {
        let mut s = slice(9, 0, 10, 0);
        assert!(matches!(
            s.set_end(at(8, 0)),
            Err(SliceError::InvariantViolation(_))
        ));
        s.set_end(at(9, 0)).unwrap();
        assert!(s.is_zero_length());
    }

    #[test]
    fn test_shift_moves_both_endpoints() {
        let mut s = slice(9, 0, 10, 0);
        s.shift_right(Duration::hours(2)).unwrap();
        assert_eq!(s, slice(11, 0, 12, 0));
        s.shift_left(Duration::minutes(30)).unwrap();
        assert_eq!(s, slice(10, 30, 11, 30));
    }

    #[test]
    fn test_shift_out_of_range_leaves_slice_untouched() {
        let mut s = slice(9, 0, 10, 0);
        assert!(matches!(
            s.shift_right(Duration::MAX),
            Err(SliceError::InvalidDatetime(_))
        ));
        assert!(matches!(
            s.shift_left(Duration::MAX),
            Err(SliceError::InvalidDatetime(_))
        ));
        assert_eq!(s, slice(9, 0, 10, 0));
    }

    #[test]
    fn test_align_start_and_end_to_month() {
        let mut s = slice(9, 0, 10, 0);
        s.align_start_to_month(Edge::Left).unwrap();
        s.align_end_to_month(Edge::Right).unwrap();
        assert_eq!(s.start().to_rfc3339(), "2026-03-01T00:00:00+00:00");
        assert_eq!(s.end().to_rfc3339(), "2026-03-31T23:59:59.999999+00:00");
    }

    #[test]
    fn test_align_start_right_past_end_is_invariant_violation() {
        let mut s = slice(9, 0, 10, 0);
        let err = s.align_start_to_day(Edge::Right).unwrap_err();
        assert!(matches!(err, SliceError::InvariantViolation(_)));
    }

    #[test]
    fn test_align_uses_display_timezone() {
        // 02:00 UTC on the 16th is still the 15th in New York
        let mut s = TimeSlice::new(at(2, 0), at(3, 0))
            .unwrap()
            .with_timezone(New_York);
        s.align_start_to_day(Edge::Left).unwrap();
        assert_eq!(s.start().to_rfc3339(), "2026-03-15T00:00:00-04:00");
    }

    // ── predicate tests ─────────────────────────────────────────────────

    #[test]
    fn test_overlaps_touching_counts() {
        assert!(slice(9, 0, 10, 0).overlaps(&slice(10, 0, 11, 0)));
        assert!(!slice(9, 0, 10, 0).overlaps(&slice(10, 1, 11, 0)));
    }

    #[test]
    fn test_overlaps_containment_both_ways() {
        let outer = slice(9, 0, 17, 0);
        let inner = slice(12, 0, 13, 0);
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }

    #[test]
    fn test_overlaps_instant_inclusive() {
        let s = slice(9, 0, 10, 0);
        assert!(s.overlaps_instant(&at(9, 0)));
        assert!(s.overlaps_instant(&at(10, 0)));
        assert!(!s.overlaps_instant(&at(10, 1)));
        assert!(s.overlaps_instant(&New_York.with_ymd_and_hms(2026, 3, 16, 5, 30, 0).unwrap()));
    }

    #[test]
    fn test_before_and_after_touching() {
        let a = slice(9, 0, 10, 0);
        let b = slice(10, 0, 11, 0);
        assert!(a.before(&b));
        assert!(b.after(&a));
        assert!(!b.before(&a));
        assert!(a.before_instant(&at(10, 0)));
        assert!(b.after_instant(&at(10, 0)));
    }

    #[test]
    fn test_occludes() {
        let outer = slice(9, 0, 17, 0);
        let inner = slice(12, 0, 13, 0);
        assert!(outer.occludes(&inner));
        assert!(inner.occluded_by(&outer));
        assert!(outer.occludes(&outer));
        assert!(!inner.occludes(&outer));
    }

    // ── split tests ─────────────────────────────────────────────────────

    #[test]
    fn test_split_interior_point() {
        let (left, right) = slice(9, 0, 17, 0).split(&at(12, 0)).unwrap();
        let left = left.unwrap();
        assert_eq!(left.start(), at(9, 0));
        assert_eq!(left.end(), at(12, 0) - epsilon());
        assert_eq!(right, slice(12, 0, 17, 0));
    }

    #[test]
    fn test_split_at_start_omits_left() {
        let (left, right) = slice(9, 0, 17, 0).split(&at(9, 0)).unwrap();
        assert!(left.is_none());
        assert_eq!(right, slice(9, 0, 17, 0));
    }

    #[test]
    fn test_split_at_end_leaves_zero_length_right() {
        let (left, right) = slice(9, 0, 17, 0).split(&at(17, 0)).unwrap();
        assert_eq!(left.unwrap().end(), at(17, 0) - epsilon());
        assert!(right.is_zero_length());
    }

    #[test]
    fn test_split_outside_is_invalid_argument() {
        let err = slice(9, 0, 17, 0).split(&at(18, 0)).unwrap_err();
        assert!(matches!(err, SliceError::InvalidArgument(_)));
    }

    // ── punch_hole tests ────────────────────────────────────────────────

    #[test]
    fn test_punch_hole_middle_gives_two_pieces() {
        let pieces = slice(9, 0, 17, 0).punch_hole(&slice(12, 0, 13, 0));
        assert_eq!(pieces.len(), 2);
        assert_eq!(pieces[0].start(), at(9, 0));
        assert_eq!(
            pieces[0].end().to_rfc3339(),
            "2026-03-16T11:59:59.999999+00:00"
        );
        assert_eq!(pieces[1], slice(13, 0, 17, 0));
    }

    #[test]
    fn test_punch_hole_covering_gives_nothing() {
        let s = slice(9, 0, 17, 0);
        assert!(s.punch_hole(&s).is_empty());
        assert!(s.punch_hole(&slice(8, 0, 18, 0)).is_empty());
    }

    #[test]
    fn test_punch_hole_disjoint_returns_copy() {
        let s = slice(9, 0, 10, 0);
        assert_eq!(s.punch_hole(&slice(11, 0, 12, 0)), vec![s.clone()]);
    }

    #[test]
    fn test_punch_hole_left_overhang_keeps_right() {
        let pieces = slice(9, 0, 17, 0).punch_hole(&slice(8, 0, 12, 0));
        assert_eq!(pieces, vec![slice(12, 0, 17, 0)]);
    }

    #[test]
    fn test_punch_hole_right_overhang_keeps_left() {
        let pieces = slice(9, 0, 17, 0).punch_hole(&slice(12, 0, 18, 0));
        assert_eq!(pieces.len(), 1);
        assert_eq!(pieces[0].end(), at(12, 0) - epsilon());
    }

    #[test]
    fn test_punch_hole_keeps_timezone() {
        let s = slice(9, 0, 17, 0).with_timezone(New_York);
        let pieces = s.punch_hole(&slice(12, 0, 13, 0));
        assert!(pieces.iter().all(|p| p.timezone() == New_York));
    }

    // ── merge tests ─────────────────────────────────────────────────────

    #[test]
    fn test_merge_touching() {
        let merged = slice(9, 0, 10, 0).merge(&slice(10, 0, 11, 0)).unwrap();
        assert_eq!(merged, slice(9, 0, 11, 0));
    }

    #[test]
    fn test_merge_disjoint_is_invalid_argument() {
        let err = slice(9, 0, 10, 0).merge(&slice(11, 0, 12, 0)).unwrap_err();
        assert!(matches!(err, SliceError::InvalidArgument(_)));
    }

    // ── duration tests ──────────────────────────────────────────────────

    #[test]
    fn test_unit_hours_with_rounding_options() {
        let s = slice(9, 0, 10, 10).with_rounding(RoundingOptions {
            decimal_places: Some(2),
            rounding_step: Some(Decimal::new(25, 2)),
            rounding_mode: Some(crate::hours::RoundingMode::Ceiling),
        });
        assert_eq!(s.unit_hours(), Decimal::new(117, 2));
        assert_eq!(s.rounded_unit_hours().unwrap(), Decimal::new(125, 2));
    }

    #[test]
    fn test_display() {
        assert_eq!(
            slice(9, 0, 10, 0).to_string(),
            "Time Slice: 2026-03-16T09:00:00+00:00 - 2026-03-16T10:00:00+00:00"
        );
    }

    #[test]
    fn test_ordering_by_start_then_end() {
        let mut slices = vec![slice(10, 0, 11, 0), slice(9, 0, 12, 0), slice(9, 0, 10, 0)];
        slices.sort();
        assert_eq!(
            slices,
            vec![slice(9, 0, 10, 0), slice(9, 0, 12, 0), slice(10, 0, 11, 0)]
        );
    }
}
