//! Time window used to select which events are shown.

use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, NaiveTime, TimeZone};
use today_core::CalendarEvent;
use tracing::debug;

use crate::error::{SourceError, SourceResult};

/// Layout accepted for `--time-start` and `--time-end`.
pub const WINDOW_TIME_FORMAT: &str = "%d.%m.%Y %H:%M:%S";

/// An inclusive time range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionWindow {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

impl SelectionWindow {
    pub fn new(start: DateTime<FixedOffset>, end: DateTime<FixedOffset>) -> Self {
        Self { start, end }
    }

    /// The local day containing `now`, from 00:00:00 to 23:59:59.
    pub fn today(now: DateTime<FixedOffset>) -> Self {
        let date = now.with_timezone(&Local).date_naive();
        let start = at_local(date.and_time(NaiveTime::MIN)).unwrap_or(now);
        let end = NaiveTime::from_hms_opt(23, 59, 59)
            .and_then(|time| at_local(date.and_time(time)))
            .unwrap_or(now);
        Self { start, end }
    }

    /// Parses a bound written as `%d.%m.%Y %H:%M:%S` in local time.
    pub fn parse_bound(text: &str) -> SourceResult<DateTime<FixedOffset>> {
        let invalid = || SourceError::InvalidTime {
            text: text.to_string(),
        };
        let naive =
            NaiveDateTime::parse_from_str(text.trim(), WINDOW_TIME_FORMAT).map_err(|_| invalid())?;
        at_local(naive).ok_or_else(invalid)
    }

    /// Whether an event spanning `start..end` overlaps this window.
    pub fn intersects(&self, start: DateTime<FixedOffset>, end: DateTime<FixedOffset>) -> bool {
        start <= self.end && end >= self.start
    }

    /// Keeps the events overlapping this window.
    ///
    /// Events without both timestamps are kept; the pipeline drops them later.
    pub fn retain(&self, events: &mut Vec<CalendarEvent>) {
        let before = events.len();
        events.retain(|event| match event.span() {
            Some((start, end)) => self.intersects(start, end),
            None => true,
        });
        debug!(
            before,
            after = events.len(),
            start = %self.start,
            end = %self.end,
            "Applied selection window"
        );
    }
}

fn at_local(naive: NaiveDateTime) -> Option<DateTime<FixedOffset>> {
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.fixed_offset())
}
