//! Fixed-width progress bar for running events.

use chrono::{DateTime, Duration, FixedOffset};
use owo_colors::OwoColorize;

use crate::duration::format_duration;

/// Rendered instead of a bar once the event is effectively over.
pub const FINISHED: &str = "[ FINISHED             ]";

/// Minimum number of columns between the brackets.
pub const MIN_BAR_WIDTH: usize = 20;

/// Rendering switches for the progress bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressStyle {
    /// Highlight the elapsed part of the bar with ANSI colors.
    pub highlight: bool,
}

impl Default for ProgressStyle {
    fn default() -> Self {
        Self { highlight: true }
    }
}

impl ProgressStyle {
    /// A style that emits no escape sequences.
    pub fn plain() -> Self {
        Self { highlight: false }
    }
}

/// Renders the progress of `[start, end)` at `reference`.
///
/// The bar holds the label `"<elapsed> / <total>"`. The part of the bar up to
/// the fill boundary is highlighted, so the label itself acts as the gauge.
/// The visible width is `max(20, label length) + 4` for any progress value.
pub fn render_progress(
    start: DateTime<FixedOffset>,
    end: DateTime<FixedOffset>,
    reference: DateTime<FixedOffset>,
    style: ProgressStyle,
) -> String {
    let total = end - start;
    let elapsed = (reference - start).max(Duration::zero());

    if elapsed >= total {
        return FINISHED.to_string();
    }

    let ratio = seconds(elapsed) / seconds(total);
    let label = format!("{} / {}", format_duration(elapsed), format_duration(total));

    let width = MIN_BAR_WIDTH.max(label.len());
    let fill = ((ratio * width as f64).round() as usize).min(width);
    let (before, after) = label.split_at(fill.min(label.len()));

    let filled = format!("{}{}", before, " ".repeat(fill - before.len()));
    let rest = format!("{}{}", after, " ".repeat(width - fill - after.len()));

    let filled = if style.highlight && elapsed > Duration::zero() && !filled.is_empty() {
        filled.black().on_bright_white().to_string()
    } else {
        filled
    };

    format!("[ {}{} ]", filled, rest)
}

fn seconds(d: Duration) -> f64 {
    d.to_std().map(|d| d.as_secs_f64()).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn utc(h: u32, m: u32) -> DateTime<FixedOffset> {
        Utc.with_ymd_and_hms(2025, 2, 5, h, m, 0)
            .unwrap()
            .fixed_offset()
    }

    fn strip_ansi(s: &str) -> String {
        let mut out = String::new();
        let mut chars = s.chars();
        while let Some(c) = chars.next() {
            if c == '\x1b' {
                for c in chars.by_ref() {
                    if c == 'm' {
                        break;
                    }
                }
            } else {
                out.push(c);
            }
        }
        out
    }

    #[test]
    fn quarter_way() {
        let bar = render_progress(utc(9, 0), utc(10, 0), utc(9, 15), ProgressStyle::plain());
        assert_eq!(bar, format!("[ 15m / 1h{} ]", " ".repeat(12)));
        assert_eq!(bar.len(), MIN_BAR_WIDTH + 4);
    }

    #[test]
    fn fill_past_label() {
        let bar = render_progress(utc(9, 0), utc(10, 0), utc(9, 45), ProgressStyle::plain());
        assert_eq!(bar, format!("[ 45m / 1h{} ]", " ".repeat(12)));
    }

    #[test]
    fn highlight_covers_elapsed_part() {
        let bar = render_progress(utc(9, 0), utc(10, 0), utc(9, 15), ProgressStyle::default());
        let highlighted = "15m /".black().on_bright_white().to_string();
        assert_eq!(
            bar,
            format!("[ {} 1h{} ]", highlighted, " ".repeat(12))
        );
        assert_eq!(
            strip_ansi(&bar),
            render_progress(utc(9, 0), utc(10, 0), utc(9, 15), ProgressStyle::plain())
        );
    }

    #[test]
    fn no_highlight_before_start() {
        let bar = render_progress(utc(9, 0), utc(10, 0), utc(8, 0), ProgressStyle::default());
        assert!(!bar.contains('\x1b'));
        assert_eq!(bar, format!("[ 0s / 1h{} ]", " ".repeat(13)));
    }

    #[test]
    fn finished_when_elapsed_reaches_total() {
        let style = ProgressStyle::default();
        assert_eq!(render_progress(utc(9, 0), utc(10, 0), utc(10, 0), style), FINISHED);
        assert_eq!(render_progress(utc(9, 0), utc(10, 0), utc(23, 0), style), FINISHED);
    }

    #[test]
    fn zero_length_event_is_finished() {
        let bar = render_progress(utc(9, 0), utc(9, 0), utc(8, 0), ProgressStyle::plain());
        assert_eq!(bar, FINISHED);
    }

    #[test]
    fn finished_marker_matches_bar_width() {
        assert_eq!(FINISHED.len(), MIN_BAR_WIDTH + 4);
    }

    #[test]
    fn width_is_constant_for_short_labels() {
        let style = ProgressStyle::plain();
        for minute in [1, 10, 20, 30, 40, 50, 59] {
            let bar = render_progress(utc(9, 0), utc(10, 0), utc(9, minute), style);
            assert_eq!(bar.len(), MIN_BAR_WIDTH + 4, "minute {}", minute);
        }
    }

    #[test]
    fn width_follows_long_labels() {
        let style = ProgressStyle::plain();
        let start = utc(0, 0);
        let end = start + Duration::hours(99_999) + Duration::minutes(59);

        // "NNNNNh30m / 99999h59m" is 21 columns for every elapsed value below
        let widths: Vec<usize> = [10_000, 50_000, 90_000]
            .into_iter()
            .map(|h| {
                let reference = start + Duration::hours(h) + Duration::minutes(30);
                strip_ansi(&render_progress(start, end, reference, style)).len()
            })
            .collect();

        assert_eq!(widths, vec![25, 25, 25]);
    }
}
