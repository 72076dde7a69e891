//! # slice-engine
//!
//! Interval algebra over time.
//!
//! The Slice Engine models closed time ranges and collections of them, with
//! the operations scheduling and reporting code needs: calendar alignment,
//! recurrence stepping that survives month-length and daylight-saving
//! irregularities, and set algebra (merge, subtract, split, crop).
//!
//! ## Modules
//!
//! - [`slice`] — `TimeSlice`, the closed interval value with predicates, split, punch-hole and merge
//! - [`iter`] — Recurrence stepping with anchor-day and DST correction
//! - [`timeline`] — `TimeLine`, ordered slice collections with flatten, punch-hole, split and crop
//! - [`align`] — Day/week/month/year boundary alignment
//! - [`hours`] — Decimal unit-hours and step rounding
//! - [`weekday`] — Nth weekday of a month
//! - [`format`] — Human-readable duration text
//! - [`calendar`] — Civil-calendar queries (month length, ISO weekday)
//! - [`zone`] — Timezone parsing, conversion and DST offset queries
//! - [`error`] — Error types

pub mod align;
pub mod calendar;
pub mod error;
pub mod format;
pub mod hours;
pub mod iter;
pub mod slice;
pub mod timeline;
pub mod weekday;
pub mod zone;

pub use align::{
    align, align_to_day, align_to_month, align_to_week, align_to_year, Edge, Granularity,
};
pub use error::SliceError;
pub use format::{format_duration, DurationLabels, FormattedDuration};
pub use hours::{
    duration_to_rounded_unit_hours, duration_to_unit_hours, RoundingMode, RoundingOptions,
};
pub use iter::{SliceIter, Step};
pub use slice::{epsilon, TimeSlice};
pub use timeline::TimeLine;
pub use weekday::NthWeekdayCalculator;
pub use zone::parse_timezone;
