//! Compact human-readable durations.
//!
//! Every relative time shown by `today` ("1h30m remaining", "in 45s") goes
//! through [`format_duration`].

use chrono::Duration;

/// Formats a duration using its two largest meaningful units.
///
/// Durations of an hour or more render as hours and minutes, shorter ones as
/// minutes and seconds. A zero sub-unit is dropped entirely, so two hours is
/// `"2h"` and half an hour is `"30m"`. Anything below one second, including
/// negative input, renders as `"0s"`.
///
/// ```
/// use chrono::Duration;
/// use today_core::duration::format_duration;
///
/// assert_eq!(format_duration(Duration::seconds(90)), "1m30s");
/// assert_eq!(format_duration(Duration::hours(2)), "2h");
/// assert_eq!(format_duration(Duration::minutes(45)), "45m");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let total_secs = duration.num_seconds().max(0);
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    if hours > 0 {
        if minutes > 0 {
            format!("{}h{}m", hours, minutes)
        } else {
            format!("{}h", hours)
        }
    } else if minutes > 0 {
        if seconds > 0 {
            format!("{}m{}s", minutes, seconds)
        } else {
            format!("{}m", minutes)
        }
    } else {
        format!("{}s", seconds)
    }
}
