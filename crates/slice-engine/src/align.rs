//! Period boundary alignment.
//!
//! Given an instant, find the first or last microsecond of the day, ISO week,
//! month or year that contains it, in the instant's own timezone.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime};
use chrono_tz::Tz;

use crate::calendar::{days_in_month, iso_weekday};
use crate::error::SliceError;
use crate::zone::localize;

/// Which boundary of a period to align to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Edge {
    /// First instant of the period (00:00:00.000000 of its first day).
    Left,
    /// Last instant of the period (23:59:59.999999 of its last day).
    Right,
}

/// Calendar period used for alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Granularity {
    Day,
    /// ISO week, Monday through Sunday.
    Week,
    Month,
    Year,
}

impl FromStr for Edge {
    type Err = SliceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "left" => Ok(Edge::Left),
            "right" => Ok(Edge::Right),
            _ => Err(SliceError::InvalidArgument(format!("invalid edge: '{s}'"))),
        }
    }
}

impl FromStr for Granularity {
    type Err = SliceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "day" => Ok(Granularity::Day),
            "week" => Ok(Granularity::Week),
            "month" => Ok(Granularity::Month),
            "year" => Ok(Granularity::Year),
            _ => Err(SliceError::InvalidArgument(format!(
                "invalid alignment granularity: '{s}'"
            ))),
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Edge::Left => "left",
            Edge::Right => "right",
        })
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Granularity::Day => "day",
            Granularity::Week => "week",
            Granularity::Month => "month",
            Granularity::Year => "year",
        })
    }
}

/// Midnight.
pub(crate) fn start_of_day() -> NaiveTime {
    NaiveTime::default()
}

/// The last representable time of a day at microsecond resolution.
pub(crate) fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_micro_opt(23, 59, 59, 999_999).unwrap_or_default()
}

/// Align an instant to the left or right edge of its enclosing period.
///
/// The result keeps the instant's timezone: a Tuesday afternoon in Tokyo
/// aligns to Monday 00:00 Tokyo time, not Monday 00:00 UTC.
///
/// # Errors
///
/// Returns [`SliceError::InvalidDatetime`] if the boundary falls outside
/// chrono's representable range.
///
/// # Examples
///
/// ```
/// use chrono::TimeZone;
/// use chrono_tz::UTC;
/// use slice_engine::align::{align, Edge, Granularity};
///
/// // Wednesday
/// let t = UTC.with_ymd_and_hms(2026, 2, 18, 14, 30, 0).unwrap();
/// let monday = align(&t, Edge::Left, Granularity::Week).unwrap();
/// assert_eq!(monday.to_rfc3339(), "2026-02-16T00:00:00+00:00");
/// ```
pub fn align(
    instant: &DateTime<Tz>,
    edge: Edge,
    granularity: Granularity,
) -> Result<DateTime<Tz>, SliceError> {
    let date = instant.date_naive();

    let new_date = match granularity {
        Granularity::Day => Some(date),
        Granularity::Week => {
            let weekday = i64::from(iso_weekday(date));
            match edge {
                Edge::Left => date.checked_sub_signed(Duration::days(weekday - 1)),
                Edge::Right => date.checked_add_signed(Duration::days(7 - weekday)),
            }
        }
        Granularity::Month => {
            let day = match edge {
                Edge::Left => 1,
                Edge::Right => days_in_month(date.year(), date.month())?,
            };
            NaiveDate::from_ymd_opt(date.year(), date.month(), day)
        }
        Granularity::Year => match edge {
            Edge::Left => NaiveDate::from_ymd_opt(date.year(), 1, 1),
            Edge::Right => NaiveDate::from_ymd_opt(date.year(), 12, 31),
        },
    }
    .ok_or_else(|| {
        SliceError::InvalidDatetime(format!(
            "{} edge of {} containing {} is out of range",
            edge,
            granularity,
            instant.to_rfc3339()
        ))
    })?;

    let time = match edge {
        Edge::Left => start_of_day(),
        Edge::Right => end_of_day(),
    };

    localize(instant.timezone(), new_date.and_time(time), edge)
}

pub fn align_to_day(instant: &DateTime<Tz>, edge: Edge) -> Result<DateTime<Tz>, SliceError> {
    align(instant, edge, Granularity::Day)
}

pub fn align_to_week(instant: &DateTime<Tz>, edge: Edge) -> Result<DateTime<Tz>, SliceError> {
    align(instant, edge, Granularity::Week)
}

pub fn align_to_month(instant: &DateTime<Tz>, edge: Edge) -> Result<DateTime<Tz>, SliceError> {
    align(instant, edge, Granularity::Month)
}

pub fn align_to_year(instant: &DateTime<Tz>, edge: Edge) -> Result<DateTime<Tz>, SliceError> {
    align(instant, edge, Granularity::Year)
}
