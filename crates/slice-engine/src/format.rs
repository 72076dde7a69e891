//! Human-readable duration text such as `"3 hrs 12 min"`.

use std::fmt;

use chrono::Duration;

const MINUTES_PER_HOUR: i64 = 60;
const MINUTES_PER_DAY: i64 = 24 * MINUTES_PER_HOUR;

/// Singular and plural unit labels.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DurationLabels {
    pub day: String,
    pub days: String,
    pub hour: String,
    pub hours: String,
    pub minute: String,
    pub minutes: String,
}

impl Default for DurationLabels {
    fn default() -> Self {
        Self {
            day: "day".to_string(),
            days: "days".to_string(),
            hour: "hr".to_string(),
            hours: "hrs".to_string(),
            minute: "min".to_string(),
            minutes: "min".to_string(),
        }
    }
}

impl DurationLabels {
    fn pick<'a>(count: i64, singular: &'a str, plural: &'a str) -> &'a str {
        if count == 1 {
            singular
        } else {
            plural
        }
    }
}

/// A duration broken into whole days, hours and minutes, plus its text.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FormattedDuration {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub text: String,
}

impl fmt::Display for FormattedDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Format a duration as `"<m> min"`, `"<h> hr <m> min"` or
/// `"<d> day <h> hr <m> min"`, dropping leading zero units.
///
/// Seconds are truncated. Negative durations are treated as zero.
///
/// # Examples
///
/// ```
/// use chrono::Duration;
/// use slice_engine::format::{format_duration, DurationLabels};
///
/// let labels = DurationLabels::default();
/// assert_eq!(format_duration(Duration::minutes(192), &labels).text, "3 hrs 12 min");
/// assert_eq!(format_duration(Duration::minutes(61), &labels).text, "1 hr 1 min");
/// ```
pub fn format_duration(duration: Duration, labels: &DurationLabels) -> FormattedDuration {
    let total = duration.num_minutes().max(0);
    let days = total / MINUTES_PER_DAY;
    let hours = (total % MINUTES_PER_DAY) / MINUTES_PER_HOUR;
    let minutes = total % MINUTES_PER_HOUR;

    let mut parts = Vec::with_capacity(3);
    if days > 0 {
        parts.push(format!(
            "{days} {}",
            DurationLabels::pick(days, &labels.day, &labels.days)
        ));
    }
    if days > 0 || hours > 0 {
        parts.push(format!(
            "{hours} {}",
            DurationLabels::pick(hours, &labels.hour, &labels.hours)
        ));
    }
    parts.push(format!(
        "{minutes} {}",
        DurationLabels::pick(minutes, &labels.minute, &labels.minutes)
    ));

    FormattedDuration {
        days,
        hours,
        minutes,
        text: parts.join(" "),
    }
}
