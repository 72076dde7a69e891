//! Ordered collections of time slices and their set algebra.
//!
//! A [`TimeLine`] is canonical after [`flatten`](TimeLine::flatten): sorted by
//! `(start, end)` and pairwise disjoint. Every other operation restores the
//! configured sort order but leaves overlapping members alone, so callers that
//! need a union must flatten explicitly.

use chrono::{DateTime, Duration, TimeZone, Utc};
use tracing::debug;

use crate::error::SliceError;
use crate::slice::{epsilon, normalize, TimeSlice};

/// An ordered collection of [`TimeSlice`] values.
///
/// # Examples
///
/// ```
/// use chrono::TimeZone;
/// use chrono_tz::UTC;
/// use slice_engine::{TimeLine, TimeSlice};
///
/// let at = |h| UTC.with_ymd_and_hms(2026, 3, 16, h, 0, 0).unwrap();
/// let mut line: TimeLine = vec![
///     TimeSlice::new(at(10), at(11)).unwrap(),
///     TimeSlice::new(at(9), at(10)).unwrap(),
/// ]
/// .into_iter()
/// .collect();
///
/// line.flatten();
/// assert_eq!(line.len(), 1);
/// assert_eq!(line.slices()[0].start(), at(9));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeLine {
    slices: Vec<TimeSlice>,
    reverse: bool,
}

// ── construction and container access ───────────────────────────────────────

impl TimeLine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap the given slices as-is. No sorting or merging happens here.
    pub fn from_slices(slices: Vec<TimeSlice>) -> Self {
        Self {
            slices,
            reverse: false,
        }
    }

    /// Sort newest first from now on. Takes effect at the next reordering
    /// operation.
    pub fn with_reverse(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    pub fn set_reverse(&mut self, reverse: bool) {
        self.reverse = reverse;
    }

    pub fn is_reverse(&self) -> bool {
        self.reverse
    }

    pub fn slices(&self) -> &[TimeSlice] {
        &self.slices
    }

    pub fn len(&self) -> usize {
        self.slices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TimeSlice> {
        self.slices.iter()
    }

    pub fn push(&mut self, slice: TimeSlice) {
        self.slices.push(slice);
    }

    /// Remove and return the slice at `index`, or `None` if out of bounds.
    pub fn remove(&mut self, index: usize) -> Option<TimeSlice> {
        (index < self.slices.len()).then(|| self.slices.remove(index))
    }

    pub fn into_slices(self) -> Vec<TimeSlice> {
        self.slices
    }

    fn with_same_direction(&self, slices: Vec<TimeSlice>) -> Self {
        let mut line = Self {
            slices,
            reverse: self.reverse,
        };
        line.sort();
        line
    }
}

// ── canonicalization ────────────────────────────────────────────────────────

impl TimeLine {
    /// Order slices by `(start, end)` in the configured direction.
    pub fn sort(&mut self) {
        self.sort_by_direction(self.reverse);
    }

    /// Order slices by `(start, end)`, descending when `reverse` is set. The
    /// configured direction is not changed.
    pub fn sort_by_direction(&mut self, reverse: bool) {
        if reverse {
            self.slices.sort_by(|a, b| b.cmp(a));
        } else {
            self.slices.sort();
        }
    }

    /// Merge every group of overlapping or touching slices into one.
    ///
    /// Slices are scanned in ascending order with a single accumulator; the
    /// result is re-sorted in the configured direction.
    pub fn merge_overlap(&mut self) {
        let before = self.slices.len();
        self.sort_by_direction(false);

        let mut merged: Vec<TimeSlice> = Vec::with_capacity(before);
        let mut current: Option<TimeSlice> = None;
        for slice in self.slices.drain(..) {
            current = Some(match current.take() {
                None => slice,
                Some(acc) => match acc.merge(&slice) {
                    Ok(joined) => joined,
                    Err(_) => {
                        merged.push(acc);
                        slice
                    }
                },
            });
        }
        merged.extend(current);

        debug!(before, after = merged.len(), "merged overlapping slices");
        self.slices = merged;
        self.sort();
    }

    /// Sort and merge, producing the canonical disjoint cover.
    pub fn flatten(&mut self) {
        self.sort();
        self.merge_overlap();
    }
}

// ── set algebra ─────────────────────────────────────────────────────────────

impl TimeLine {
    /// Remove the part of every member covered by `hole`.
    ///
    /// Members that do not overlap the hole are kept unchanged.
    pub fn punch_hole(&mut self, hole: &TimeSlice) {
        self.sort_by_direction(false);
        let mut remaining = Vec::with_capacity(self.slices.len() + 1);
        for slice in self.slices.drain(..) {
            if slice.overlaps(hole) {
                remaining.extend(slice.punch_hole(hole));
            } else {
                remaining.push(slice);
            }
        }
        self.slices = remaining;
        self.sort();
    }

    /// [`punch_hole`](Self::punch_hole) for each hole in turn.
    pub fn punch_holes<'a, I>(&mut self, holes: I)
    where
        I: IntoIterator<Item = &'a TimeSlice>,
    {
        for hole in holes {
            self.punch_hole(hole);
        }
    }

    /// Partition the timeline at `point` into a left and a right timeline.
    ///
    /// A member straddling `point` is split as by [`TimeSlice::split`]. If
    /// the outer extent does not contain `point`, the result is a single copy
    /// of the whole timeline. Either side of a real split may be empty.
    pub fn split<T: TimeZone>(&self, point: &DateTime<T>) -> Vec<TimeLine> {
        let contains = self
            .outer_time_slice()
            .is_some_and(|outer| outer.overlaps_instant(point));
        if !contains {
            return vec![self.clone()];
        }

        let (left, right) = self.split_parts(normalize(point));
        vec![
            self.with_same_direction(left),
            self.with_same_direction(right),
        ]
    }

    /// Distribute members around `point`: everything ending before it goes
    /// left, everything starting at or after it goes right, straddlers are
    /// cut.
    fn split_parts(&self, point: DateTime<Utc>) -> (Vec<TimeSlice>, Vec<TimeSlice>) {
        let mut left = Vec::new();
        let mut right = Vec::new();
        for slice in &self.slices {
            if slice.end_utc() < point {
                left.push(slice.clone());
            } else if slice.start_utc() >= point {
                right.push(slice.clone());
            } else {
                let (head, tail) = slice.split_within(point);
                left.extend(head);
                right.push(tail);
            }
        }
        (left, right)
    }

    /// The part of the timeline inside the closed interval `bound`.
    ///
    /// # Errors
    ///
    /// Returns [`SliceError::InvalidArgument`] if the timeline is empty or its
    /// outer extent does not overlap `bound`.
    pub fn crop(&self, bound: &TimeSlice) -> Result<TimeLine, SliceError> {
        let outer = self.outer_time_slice().ok_or_else(|| {
            SliceError::InvalidArgument("cannot crop an empty timeline".to_string())
        })?;
        if !outer.overlaps(bound) {
            return Err(SliceError::InvalidArgument(format!(
                "crop bound {} does not overlap the timeline {}",
                bound, outer
            )));
        }

        let (_, from_start) = self.split_parts(bound.start_utc());
        let cropped = match bound.end_utc().checked_add_signed(epsilon()) {
            Some(past_end) => {
                let (inside, _) = TimeLine::from_slices(from_start).split_parts(past_end);
                inside
            }
            None => from_start,
        };

        debug!(
            "cropped {} slices to {} within {}",
            self.slices.len(),
            cropped.len(),
            bound
        );
        Ok(self.with_same_direction(cropped))
    }

    /// [`crop`](Self::crop) to the outer extent of another timeline.
    ///
    /// # Errors
    ///
    /// Returns [`SliceError::InvalidArgument`] if either timeline is empty or
    /// they do not overlap.
    pub fn crop_to_timeline(&self, bound: &TimeLine) -> Result<TimeLine, SliceError> {
        let outer = bound.outer_time_slice().ok_or_else(|| {
            SliceError::InvalidArgument("cannot crop to an empty timeline".to_string())
        })?;
        self.crop(&outer)
    }
}

// ── derived properties ──────────────────────────────────────────────────────

impl TimeLine {
    /// The smallest slice covering every member, in the first member's
    /// timezone. `None` for an empty timeline.
    pub fn outer_time_slice(&self) -> Option<TimeSlice> {
        let first = self.slices.first()?;
        let start = self.slices.iter().map(TimeSlice::start_utc).min()?;
        let end = self.slices.iter().map(TimeSlice::end_utc).max()?;
        Some(first.with_bounds(start, end))
    }

    /// Sum of member durations. Overlapping members are counted twice.
    ///
    /// Saturates at [`Duration::MAX`].
    pub fn cumulative_duration(&self) -> Duration {
        self.slices.iter().fold(Duration::zero(), |total, slice| {
            total.checked_add(&slice.duration()).unwrap_or(Duration::MAX)
        })
    }
}

// ── trait impls ─────────────────────────────────────────────────────────────

impl From<TimeSlice> for TimeLine {
    fn from(slice: TimeSlice) -> Self {
        Self::from_slices(vec![slice])
    }
}

impl From<Vec<TimeSlice>> for TimeLine {
    fn from(slices: Vec<TimeSlice>) -> Self {
        Self::from_slices(slices)
    }
}

impl FromIterator<TimeSlice> for TimeLine {
    fn from_iter<I: IntoIterator<Item = TimeSlice>>(iter: I) -> Self {
        Self::from_slices(iter.into_iter().collect())
    }
}

impl Extend<TimeSlice> for TimeLine {
    fn extend<I: IntoIterator<Item = TimeSlice>>(&mut self, iter: I) {
        self.slices.extend(iter);
    }
}

impl IntoIterator for TimeLine {
    type Item = TimeSlice;
    type IntoIter = std::vec::IntoIter<TimeSlice>;

    fn into_iter(self) -> Self::IntoIter {
        self.slices.into_iter()
    }
}

impl<'a> IntoIterator for &'a TimeLine {
    type Item = &'a TimeSlice;
    type IntoIter = std::slice::Iter<'a, TimeSlice>;

    fn into_iter(self) -> Self::IntoIter {
        self.slices.iter()
    }
}
