//! ICS parsing using the icalendar crate.

use chrono::{DateTime, Duration, FixedOffset, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use icalendar::{
    Calendar, CalendarComponent, CalendarDateTime, Component, DatePerhapsTime, Event, EventLike,
};
use today_core::CalendarEvent;
use tracing::{debug, trace, warn};

use crate::error::{SourceError, SourceResult};
use crate::recurrence;
use crate::window::SelectionWindow;

/// Parses iCalendar text into events.
///
/// Only `VEVENT` components are read; todos and other components are
/// ignored. Timestamps keep the offset they were declared with, except
/// floating times and all-day dates which are placed in the local timezone.
///
/// Events with an `RRULE` are expanded into their occurrences around
/// `window`. A rule that cannot be expanded leaves just the first occurrence.
pub fn parse_calendar(ics: &str, window: &SelectionWindow) -> SourceResult<Vec<CalendarEvent>> {
    let calendar = ics
        .parse::<Calendar>()
        .map_err(|e| SourceError::parse(e.to_string()))?;

    let vevents: Vec<&Event> = calendar
        .iter()
        .filter_map(|component| match component {
            CalendarComponent::Event(event) => Some(event),
            _ => None,
        })
        .collect();
    let overrides = recurrence::overrides(vevents.iter().copied());

    let mut events = Vec::with_capacity(vevents.len());
    for event in vevents {
        let converted = convert_event(event);
        match event.property_value("RRULE") {
            Some(rule) if event.get_recurrence_id().is_none() => {
                match recurrence::expand(event, &converted, rule, window, &overrides) {
                    Ok(instances) => events.extend(instances),
                    Err(e) => {
                        warn!(error = %e, "Keeping only the first occurrence");
                        events.push(converted);
                    }
                }
            }
            _ => events.push(converted),
        }
    }

    debug!(count = events.len(), "Parsed calendar events");
    Ok(events)
}

fn convert_event(event: &Event) -> CalendarEvent {
    let summary = event.get_summary().unwrap_or_default();
    let start = event.get_start().and_then(to_fixed);
    let end = match event.get_end() {
        Some(end) => to_fixed(end),
        None => implied_end(event, start),
    };

    if start.is_none() || end.is_none() {
        trace!(summary, "Event has incomplete timestamps");
    }

    let mut converted = CalendarEvent::with_times(summary, start, end);
    converted.uid = event.get_uid().map(String::from);
    converted.location = event.get_location().map(String::from);
    converted.description = event.get_description().map(String::from);
    converted
}

/// The end of an event without `DTEND`: start plus `DURATION`, or the next
/// day for an all-day event.
fn implied_end(
    event: &Event,
    start: Option<DateTime<FixedOffset>>,
) -> Option<DateTime<FixedOffset>> {
    let start = start?;
    if let Some(text) = event.property_value("DURATION") {
        let duration = parse_duration(text);
        if duration.is_none() {
            warn!(duration = text, "Invalid event duration");
        }
        return duration.map(|duration| start + duration);
    }

    match event.get_start()? {
        DatePerhapsTime::Date(date) => date.succ_opt().and_then(local_midnight),
        DatePerhapsTime::DateTime(_) => None,
    }
}

/// Parses an iCalendar duration such as `PT1H30M`, `P1D` or `-P1W`.
fn parse_duration(text: &str) -> Option<Duration> {
    let text = text.trim();
    let (negative, text) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let duration: std::time::Duration = iso8601::duration(text).ok()?.into();
    let duration = Duration::from_std(duration).ok()?;
    Some(if negative { -duration } else { duration })
}

pub(crate) fn to_fixed(time: DatePerhapsTime) -> Option<DateTime<FixedOffset>> {
    match time {
        DatePerhapsTime::Date(date) => local_midnight(date),
        DatePerhapsTime::DateTime(CalendarDateTime::Utc(dt)) => Some(dt.fixed_offset()),
        DatePerhapsTime::DateTime(CalendarDateTime::Floating(naive)) => local(naive),
        DatePerhapsTime::DateTime(CalendarDateTime::WithTimezone { date_time, tzid }) => {
            match tzid.parse::<Tz>() {
                Ok(tz) => tz
                    .from_local_datetime(&date_time)
                    .earliest()
                    .map(|dt| dt.fixed_offset()),
                Err(_) => {
                    warn!(tzid = %tzid, "Unknown timezone, assuming UTC");
                    Some(Utc.from_utc_datetime(&date_time).fixed_offset())
                }
            }
        }
    }
}

pub(crate) fn local(naive: NaiveDateTime) -> Option<DateTime<FixedOffset>> {
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.fixed_offset())
}

pub(crate) fn local_midnight(date: NaiveDate) -> Option<DateTime<FixedOffset>> {
    date.and_hms_opt(0, 0, 0).and_then(local)
}
