//! Event classification relative to a reference time.
//!
//! [`Classification`] is the single place where `today` decides whether an
//! event is running and which relative phrase describes it. Styles and
//! templates only ever read its output.

use chrono::{DateTime, Duration, FixedOffset};

use crate::duration::format_duration;
use crate::event::CalendarEvent;

/// Position of an event relative to the reference time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relative {
    /// The event is running; time until it ends.
    Remaining(Duration),
    /// The event is over; time since it ended.
    Ago(Duration),
    /// The event has not started; time until it starts.
    Until(Duration),
}

impl Relative {
    /// The duration component, without any wording.
    pub fn duration(&self) -> Duration {
        match self {
            Self::Remaining(d) | Self::Ago(d) | Self::Until(d) => *d,
        }
    }

    /// The humanized phrase: `"X remaining"`, `"X ago"` or `"in X"`.
    pub fn phrase(&self) -> String {
        match self {
            Self::Remaining(d) => format!("{} remaining", format_duration(*d)),
            Self::Ago(d) => format!("{} ago", format_duration(*d)),
            Self::Until(d) => format!("in {}", format_duration(*d)),
        }
    }

    /// Only the formatted duration, e.g. `"15m"`.
    pub fn raw(&self) -> String {
        format_duration(self.duration())
    }
}

/// Derived, per-event view used by formatters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    /// Whether the reference time lies strictly inside the event.
    pub is_current: bool,
    /// Relative position of the event.
    pub relative: Relative,
}

impl Classification {
    /// Classifies an event, or returns `None` when it lacks a timestamp.
    pub fn of(event: &CalendarEvent, reference: DateTime<FixedOffset>) -> Option<Self> {
        let (start, end) = event.span()?;
        Some(classify(start, end, reference))
    }

    /// The humanized relative phrase.
    pub fn phrase(&self) -> String {
        self.relative.phrase()
    }
}

/// Classifies the interval `[start, end)` against `reference`.
///
/// An event is current only once the reference is strictly after its start
/// and strictly before its end. At exactly `end` the event is over ("0s
/// ago"); at exactly `start` it has not begun ("in 0s").
pub fn classify(
    start: DateTime<FixedOffset>,
    end: DateTime<FixedOffset>,
    reference: DateTime<FixedOffset>,
) -> Classification {
    let is_current = reference > start && reference < end;

    let relative = if is_current {
        Relative::Remaining(end - reference)
    } else if reference >= end {
        Relative::Ago(reference - end)
    } else {
        Relative::Until(start - reference)
    };

    Classification {
        is_current,
        relative,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn utc(h: u32, m: u32, s: u32) -> DateTime<FixedOffset> {
        Utc.with_ymd_and_hms(2025, 2, 5, h, m, s)
            .unwrap()
            .fixed_offset()
    }

    #[test]
    fn inside_is_current_and_remaining() {
        let c = classify(utc(9, 0, 0), utc(10, 0, 0), utc(9, 45, 0));
        assert!(c.is_current);
        assert_eq!(c.relative, Relative::Remaining(Duration::minutes(15)));
        assert_eq!(c.phrase(), "15m remaining");
        assert!(c.phrase().ends_with("remaining"));
    }

    #[test]
    fn past_event_is_ago() {
        let c = classify(utc(9, 0, 0), utc(10, 0, 0), utc(11, 30, 0));
        assert!(!c.is_current);
        assert_eq!(c.phrase(), "1h30m ago");
        assert_eq!(c.relative.raw(), "1h30m");
    }

    #[test]
    fn future_event_is_in() {
        let c = classify(utc(14, 0, 0), utc(15, 0, 0), utc(13, 59, 30));
        assert!(!c.is_current);
        assert_eq!(c.phrase(), "in 30s");
    }

    #[test]
    fn exactly_at_end_is_over() {
        let c = classify(utc(9, 0, 0), utc(10, 0, 0), utc(10, 0, 0));
        assert!(!c.is_current);
        assert_eq!(c.relative, Relative::Ago(Duration::zero()));
        assert_eq!(c.phrase(), "0s ago");
    }

    #[test]
    fn exactly_at_start_is_not_yet_current() {
        let c = classify(utc(9, 0, 0), utc(10, 0, 0), utc(9, 0, 0));
        assert!(!c.is_current);
        assert_eq!(c.phrase(), "in 0s");
    }

    #[test]
    fn offsets_do_not_matter() {
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        let start = plus_two.with_ymd_and_hms(2025, 2, 5, 11, 0, 0).unwrap();
        let end = plus_two.with_ymd_and_hms(2025, 2, 5, 12, 0, 0).unwrap();
        // 09:30 UTC is 11:30 at +02:00
        let c = classify(start, end, utc(9, 30, 0));
        assert!(c.is_current);
        assert_eq!(c.phrase(), "30m remaining");
    }

    #[test]
    fn missing_timestamp_is_unclassified() {
        let event = CalendarEvent::with_times("Broken", Some(utc(9, 0, 0)), None);
        assert_eq!(Classification::of(&event, utc(9, 30, 0)), None);
    }
}
