//! Small formatting and numeric helpers.

/// Formats a playback position as `m:ss`.
///
/// Minutes are not capped, so an hour-long story renders as `60:00`.
/// Negative, NaN and infinite inputs render as `0:00`.
///
/// # Example
///
/// ```rust
/// use themekeeper::format_time;
///
/// assert_eq!(format_time(75.0), "1:15");
/// assert_eq!(format_time(9.9), "0:09");
/// assert_eq!(format_time(f64::NAN), "0:00");
/// ```
pub fn format_time(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{}:{:02}", total / 60, total % 60)
}

/// Clamps `value` into `[min, max]`, mapping NaN to `min`.
pub(crate) fn clamp_or_min(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        min
    } else {
        value.clamp(min, max)
    }
}
