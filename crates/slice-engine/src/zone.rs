//! Timezone adapter over `chrono-tz`.
//!
//! Slices store UTC instants plus a zone identifier; everything that needs a
//! wall-clock view goes through the helpers here.

use chrono::{DateTime, Duration, NaiveDateTime, Offset, TimeZone};
use chrono_tz::{OffsetComponents, Tz};

use crate::align::Edge;
use crate::error::SliceError;

/// Parse an IANA timezone string into `Tz`.
///
/// # Errors
///
/// Returns [`SliceError::InvalidTimezone`] for unknown identifiers.
pub fn parse_timezone(s: &str) -> Result<Tz, SliceError> {
    s.parse::<Tz>()
        .map_err(|_| SliceError::InvalidTimezone(format!("'{}'", s)))
}

/// Express an instant in the given zone.
pub fn to_zone<T: TimeZone>(instant: &DateTime<T>, tz: Tz) -> DateTime<Tz> {
    instant.with_timezone(&tz)
}

/// The daylight-saving component of the UTC offset in effect at `instant`
/// (zero outside DST and for zones that never observe it).
pub fn dst_offset(instant: &DateTime<Tz>) -> Duration {
    instant.offset().dst_offset()
}

/// Resolve a wall-clock time in `tz` to an instant.
///
/// Ambiguous times (fall back) pick the earliest candidate for a left edge and
/// the latest for a right edge. Nonexistent times (spring forward) are read
/// with the offset from the far side of the gap, which moves a left edge past
/// the gap and a right edge before it.
pub(crate) fn localize(
    tz: Tz,
    naive: NaiveDateTime,
    edge: Edge,
) -> Result<DateTime<Tz>, SliceError> {
    let mapped = tz.from_local_datetime(&naive);
    let resolved = match edge {
        Edge::Left => mapped.earliest(),
        Edge::Right => mapped.latest(),
    };
    if let Some(dt) = resolved {
        return Ok(dt);
    }

    let probe = match edge {
        Edge::Left => naive.checked_sub_signed(Duration::days(1)),
        Edge::Right => naive.checked_add_signed(Duration::days(1)),
    };
    probe
        .map(|p| tz.offset_from_utc_datetime(&p).fix())
        .and_then(|offset| {
            naive.checked_sub_signed(Duration::seconds(i64::from(offset.local_minus_utc())))
        })
        .map(|utc| tz.from_utc_datetime(&utc))
        .ok_or_else(|| {
            SliceError::InvalidDatetime(format!(
                "cannot resolve local time {} in {}",
                naive,
                tz.name()
            ))
        })
}
