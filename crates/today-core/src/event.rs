//! Calendar event types.
//!
//! This module provides [`CalendarEvent`], the read-only event representation
//! handed to the formatting pipeline by the calendar parser, and
//! [`CalendarInput`], which pairs the parsed events with the source text they
//! came from.

use chrono::{DateTime, FixedOffset, Local};
use serde::{Deserialize, Serialize};

/// A calendar event as produced by the ICS parser.
///
/// `start` and `end` are optional because real-world calendars contain
/// malformed entries; the pipeline silently skips events lacking either.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    /// Display text. May be empty.
    pub summary: String,
    /// When the event starts.
    pub start: Option<DateTime<FixedOffset>>,
    /// When the event ends.
    pub end: Option<DateTime<FixedOffset>>,
    /// The iCalendar UID, if present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    /// Event location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Event description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CalendarEvent {
    /// Creates a new event with both timestamps set.
    pub fn new(
        summary: impl Into<String>,
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            summary: summary.into(),
            start: Some(start),
            end: Some(end),
            uid: None,
            location: None,
            description: None,
        }
    }

    /// Creates an event with possibly missing timestamps.
    pub fn with_times(
        summary: impl Into<String>,
        start: Option<DateTime<FixedOffset>>,
        end: Option<DateTime<FixedOffset>>,
    ) -> Self {
        Self {
            summary: summary.into(),
            start,
            end,
            uid: None,
            location: None,
            description: None,
        }
    }

    /// Sets the UID.
    pub fn with_uid(mut self, uid: impl Into<String>) -> Self {
        self.uid = Some(uid.into());
        self
    }

    /// Sets the location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Returns both timestamps when the event has them.
    pub fn span(&self) -> Option<(DateTime<FixedOffset>, DateTime<FixedOffset>)> {
        Some((self.start?, self.end?))
    }

    /// Converts both timestamps to the process-local timezone.
    ///
    /// The instants are unchanged; only the offset used for display moves.
    pub fn with_local_timezone(mut self) -> Self {
        self.start = self
            .start
            .map(|dt| dt.with_timezone(&Local).fixed_offset());
        self.end = self.end.map(|dt| dt.with_timezone(&Local).fixed_offset());
        self
    }
}

/// The calendar as read from its source: raw text plus parsed events.
///
/// Whole-input formatters work on `source`; everything else uses `events`.
#[derive(Debug, Clone, Default)]
pub struct CalendarInput {
    /// The unparsed calendar text.
    pub source: String,
    /// Events parsed (and possibly filtered) from `source`.
    pub events: Vec<CalendarEvent>,
}

impl CalendarInput {
    /// Creates a new input.
    pub fn new(source: impl Into<String>, events: Vec<CalendarEvent>) -> Self {
        Self {
            source: source.into(),
            events,
        }
    }
}
