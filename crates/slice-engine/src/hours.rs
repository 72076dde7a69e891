//! Duration to decimal unit-hours conversion and billable rounding.
//!
//! Hours are computed exactly as `microseconds / 3_600_000_000` using
//! [`rust_decimal::Decimal`], so a 20 minute span is `0.333…` and a 90 minute
//! span is exactly `1.5`.

use std::fmt;
use std::str::FromStr;

use chrono::Duration;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::SliceError;

const MICROS_PER_HOUR: i64 = 3_600_000_000;

/// Policy for rounding unit-hours to a multiple of a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum RoundingMode {
    /// Round down to the previous multiple.
    Floor,
    /// Round up to the next multiple when there is any remainder.
    Ceiling,
    /// Round to the nearest multiple, halves away from zero.
    Standard,
}

impl FromStr for RoundingMode {
    type Err = SliceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "floor" => Ok(RoundingMode::Floor),
            "ceiling" => Ok(RoundingMode::Ceiling),
            "standard" => Ok(RoundingMode::Standard),
            _ => Err(SliceError::InvalidArgument(format!(
                "invalid rounding mode: '{s}'"
            ))),
        }
    }
}

impl fmt::Display for RoundingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RoundingMode::Floor => "floor",
            RoundingMode::Ceiling => "ceiling",
            RoundingMode::Standard => "standard",
        })
    }
}

/// Rounding configuration carried by a [`TimeSlice`](crate::TimeSlice).
///
/// Only consulted when converting a duration to unit-hours; it has no effect
/// on interval algebra.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoundingOptions {
    pub decimal_places: Option<u32>,
    pub rounding_step: Option<Decimal>,
    pub rounding_mode: Option<RoundingMode>,
}

/// Convert a duration into fractional hours.
///
/// `None` yields zero. When `decimal_places` is given the result is rounded
/// half away from zero to that many places.
///
/// # Examples
///
/// ```
/// use chrono::Duration;
/// use rust_decimal::Decimal;
/// use slice_engine::hours::duration_to_unit_hours;
///
/// let hours = duration_to_unit_hours(Some(Duration::minutes(90)), None);
/// assert_eq!(hours, Decimal::new(15, 1));
/// ```
pub fn duration_to_unit_hours(duration: Option<Duration>, decimal_places: Option<u32>) -> Decimal {
    let Some(duration) = duration else {
        return Decimal::ZERO;
    };

    let hours = match duration.num_microseconds() {
        Some(micros) => Decimal::from(micros) / Decimal::from(MICROS_PER_HOUR),
        // Spans too long for i64 microseconds still fit as whole seconds.
        None => Decimal::from(duration.num_seconds()) / Decimal::from(3600),
    };

    match decimal_places {
        Some(dp) => hours.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero),
        None => hours,
    }
}

/// Convert a duration into fractional hours rounded to a step.
///
/// Rounding applies only when both `rounding_step` and `rounding_mode` are
/// supplied; otherwise this is [`duration_to_unit_hours`].
///
/// # Errors
///
/// Returns [`SliceError::InvalidArgument`] if `rounding_step` is zero or
/// negative, or so small that rounding to it overflows `Decimal`.
///
/// # Examples
///
/// ```
/// use chrono::Duration;
/// use rust_decimal::Decimal;
/// use slice_engine::hours::{duration_to_rounded_unit_hours, RoundingMode};
///
/// // 1h10m billed in quarter hours, rounded up
/// let billed = duration_to_rounded_unit_hours(
///     Some(Duration::minutes(70)),
///     None,
///     Some(Decimal::new(25, 2)),
///     Some(RoundingMode::Ceiling),
/// )
/// .unwrap();
/// assert_eq!(billed, Decimal::new(125, 2));
/// ```
pub fn duration_to_rounded_unit_hours(
    duration: Option<Duration>,
    decimal_places: Option<u32>,
    rounding_step: Option<Decimal>,
    rounding_mode: Option<RoundingMode>,
) -> Result<Decimal, SliceError> {
    let hours = duration_to_unit_hours(duration, decimal_places);

    let (Some(step), Some(mode)) = (rounding_step, rounding_mode) else {
        return Ok(hours);
    };

    if step <= Decimal::ZERO {
        return Err(SliceError::InvalidArgument(format!(
            "rounding step must be positive, got {step}"
        )));
    }

    let overflow =
        || SliceError::InvalidArgument(format!("rounding {hours} by {step} overflows"));
    let remainder = hours.checked_rem(step).ok_or_else(overflow)?;

    let rounded = match mode {
        RoundingMode::Floor => hours.checked_sub(remainder),
        RoundingMode::Ceiling => {
            if remainder.is_zero() {
                Some(hours)
            } else {
                hours
                    .checked_sub(remainder)
                    .and_then(|floor| floor.checked_add(step))
            }
        }
        RoundingMode::Standard => hours.checked_div(step).and_then(|quotient| {
            quotient
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                .checked_mul(step)
        }),
    };

    rounded.ok_or_else(overflow)
}

impl RoundingOptions {
    /// Apply these options to a duration.
    pub fn apply(&self, duration: Option<Duration>) -> Result<Decimal, SliceError> {
        duration_to_rounded_unit_hours(
            duration,
            self.decimal_places,
            self.rounding_step,
            self.rounding_mode,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn rounded(minutes: i64, step: &str, mode: RoundingMode) -> Decimal {
        duration_to_rounded_unit_hours(
            Some(Duration::minutes(minutes)),
            None,
            Some(dec(step)),
            Some(mode),
        )
        .unwrap()
    }

    // ── unit hours ──────────────────────────────────────────────────────

    #[test]
    fn test_unit_hours_none_is_zero() {
        assert_eq!(duration_to_unit_hours(None, None), Decimal::ZERO);
        assert_eq!(duration_to_unit_hours(None, Some(2)), Decimal::ZERO);
    }

    #[test]
    fn test_unit_hours_exact() {
        assert_eq!(duration_to_unit_hours(Some(Duration::hours(8)), None), dec("8"));
        assert_eq!(duration_to_unit_hours(Some(Duration::minutes(45)), None), dec("0.75"));
        assert_eq!(
            duration_to_unit_hours(Some(Duration::seconds(36)), None),
            dec("0.01")
        );
    }

    #[test]
    fn test_unit_hours_decimal_places() {
        // 20 minutes = 0.3333...
        assert_eq!(
            duration_to_unit_hours(Some(Duration::minutes(20)), Some(2)),
            dec("0.33")
        );
        // 40 minutes = 0.6666...
        assert_eq!(
            duration_to_unit_hours(Some(Duration::minutes(40)), Some(2)),
            dec("0.67")
        );
    }

    #[test]
    fn test_unit_hours_decimal_places_midpoint_rounds_up() {
        // 0.125 h = 7m30s
        assert_eq!(
            duration_to_unit_hours(Some(Duration::seconds(450)), Some(2)),
            dec("0.13")
        );
    }

    // ── rounding ────────────────────────────────────────────────────────

    #[test]
    fn test_floor_subtracts_remainder() {
        assert_eq!(rounded(70, "0.25", RoundingMode::Floor), dec("1.0"));
        assert_eq!(rounded(89, "0.5", RoundingMode::Floor), dec("1.0"));
    }

    #[test]
    fn test_ceiling_rounds_up_only_with_remainder() {
        assert_eq!(rounded(70, "0.25", RoundingMode::Ceiling), dec("1.25"));
        assert_eq!(rounded(75, "0.25", RoundingMode::Ceiling), dec("1.25"));
        assert_eq!(rounded(60, "0.25", RoundingMode::Ceiling), dec("1"));
    }

    #[test]
    fn test_standard_rounds_to_nearest() {
        assert_eq!(rounded(70, "0.25", RoundingMode::Standard), dec("1.25"));
        assert_eq!(rounded(67, "0.25", RoundingMode::Standard), dec("1.0"));
    }

    #[test]
    fn test_standard_midpoint_is_not_bankers() {
        // 1.25 h to the nearest half hour: the midpoint goes up to 1.5,
        // banker's rounding would give 1.0
        assert_eq!(rounded(75, "0.5", RoundingMode::Standard), dec("1.5"));
        // 0.25 h to the nearest half: up to 0.5
        assert_eq!(rounded(15, "0.5", RoundingMode::Standard), dec("0.5"));
    }

    #[test]
    fn test_missing_step_or_mode_returns_unrounded() {
        let d = Some(Duration::minutes(70));
        let unrounded = duration_to_unit_hours(d, None);
        assert_eq!(
            duration_to_rounded_unit_hours(d, None, Some(dec("0.25")), None).unwrap(),
            unrounded
        );
        assert_eq!(
            duration_to_rounded_unit_hours(d, None, None, Some(RoundingMode::Floor)).unwrap(),
            unrounded
        );
    }

    #[test]
    fn test_non_positive_step_is_invalid_argument() {
        let err = duration_to_rounded_unit_hours(
            Some(Duration::hours(1)),
            None,
            Some(Decimal::ZERO),
            Some(RoundingMode::Floor),
        )
        .unwrap_err();
        assert!(matches!(err, SliceError::InvalidArgument(_)));
    }

    #[test]
    fn test_tiny_step_overflow_is_invalid_argument() {
        // 10 / 1e-28 does not fit in a Decimal
        let result = duration_to_rounded_unit_hours(
            Some(Duration::hours(10)),
            None,
            Some(Decimal::new(1, 28)),
            Some(RoundingMode::Standard),
        );
        assert!(matches!(result, Err(SliceError::InvalidArgument(_))), "got: {result:?}");
    }

    #[test]
    fn test_parse_rounding_mode() {
        assert_eq!("floor".parse::<RoundingMode>().unwrap(), RoundingMode::Floor);
        assert_eq!("Ceiling".parse::<RoundingMode>().unwrap(), RoundingMode::Ceiling);
        let err = "bankers".parse::<RoundingMode>().unwrap_err();
        assert!(err.to_string().contains("invalid rounding mode"), "got: {err}");
    }

    #[test]
    fn test_options_apply_uses_all_fields() {
        let options = RoundingOptions {
            decimal_places: Some(4),
            rounding_step: Some(dec("0.1")),
            rounding_mode: Some(RoundingMode::Ceiling),
        };
        assert_eq!(options.apply(Some(Duration::minutes(61))).unwrap(), dec("1.1"));
        assert_eq!(RoundingOptions::default().apply(None).unwrap(), Decimal::ZERO);
    }
}
