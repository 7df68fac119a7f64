//! Expansion of recurring events into the occurrences near a window.
//!
//! The `rrule` crate needs a datetime start, so all-day and floating starts
//! are expanded as if they were UTC and mapped back to local time afterwards.

use std::collections::HashSet;

use chrono::{DateTime, Duration, FixedOffset, Utc};
use icalendar::{CalendarDateTime, Component, DatePerhapsTime, Event, Property};
use rrule::RRuleSet;
use today_core::CalendarEvent;
use tracing::debug;

use crate::error::{SourceError, SourceResult};
use crate::ics::{local, local_midnight, to_fixed};
use crate::window::SelectionWindow;

/// Upper bound on the occurrences generated for one event.
const MAX_OCCURRENCES: u16 = 1000;

/// Occurrences replaced by their own `RECURRENCE-ID` component, as (UID, instant).
pub(crate) type Overrides = HashSet<(String, DateTime<Utc>)>;

/// Collects the occurrences that a calendar overrides.
pub(crate) fn overrides<'a>(events: impl IntoIterator<Item = &'a Event>) -> Overrides {
    events
        .into_iter()
        .filter_map(|event| {
            let uid = event.get_uid()?;
            let id = to_fixed(event.get_recurrence_id()?)?;
            Some((uid.to_string(), id.to_utc()))
        })
        .collect()
}

/// Expands `event` by `rule` into the occurrences that may overlap `window`.
///
/// `master` is the already converted first occurrence; every instance copies
/// its fields and keeps its length. `EXDATE`s and overridden occurrences are
/// left out. The result is padded by a day on each side, so callers still
/// narrow it with [`SelectionWindow::retain`].
pub(crate) fn expand(
    event: &Event,
    master: &CalendarEvent,
    rule: &str,
    window: &SelectionWindow,
    overrides: &Overrides,
) -> SourceResult<Vec<CalendarEvent>> {
    let Some(start) = event.get_start() else {
        return Ok(vec![master.clone()]);
    };

    let exdates = event
        .multi_properties()
        .get("EXDATE")
        .map(Vec::as_slice)
        .unwrap_or_default();
    let set = rule_text(&start, rule, exdates)
        .parse::<RRuleSet>()
        .map_err(|e| SourceError::Recurrence {
            summary: master.summary.clone(),
            message: e.to_string(),
        })?;

    let length = master.span().map(|(begin, end)| end - begin);
    let tz: rrule::Tz = Utc.into();
    let after = window.start - length.unwrap_or_else(Duration::zero) - Duration::days(1);
    let before = window.end + Duration::days(1);
    let result = set
        .after(after.with_timezone(&tz))
        .before(before.with_timezone(&tz))
        .all(MAX_OCCURRENCES);

    if result.limited {
        debug!(summary = %master.summary, limit = MAX_OCCURRENCES, "Recurrence truncated");
    }

    let uid = master.uid.clone().unwrap_or_default();
    let instances: Vec<CalendarEvent> = result
        .dates
        .iter()
        .filter_map(|occurrence| occurrence_start(occurrence, &start))
        .filter(|begin| !overrides.contains(&(uid.clone(), begin.to_utc())))
        .map(|begin| CalendarEvent {
            start: Some(begin),
            end: length.map(|length| begin + length),
            ..master.clone()
        })
        .collect();

    debug!(
        summary = %master.summary,
        count = instances.len(),
        "Expanded recurring event"
    );
    Ok(instances)
}

/// Builds the `DTSTART`/`RRULE`/`EXDATE` block the `rrule` parser reads.
fn rule_text(start: &DatePerhapsTime, rule: &str, exdates: &[Property]) -> String {
    let mut lines = vec![format!("DTSTART{}", stamp(start)), format!("RRULE:{rule}")];

    for exdate in exdates {
        let tzid = exdate.params().get("TZID").map(|p| p.value());
        let is_date = exdate
            .params()
            .get("VALUE")
            .is_some_and(|p| p.value() == "DATE");

        for value in exdate.value().split(',').map(str::trim) {
            if value.is_empty() {
                continue;
            }
            lines.push(match (is_date, tzid) {
                (true, _) => format!("EXDATE:{value}T000000Z"),
                (false, Some(tzid)) => format!("EXDATE;TZID={tzid}:{value}"),
                (false, None) if value.ends_with('Z') => format!("EXDATE:{value}"),
                (false, None) => format!("EXDATE:{value}Z"),
            });
        }
    }

    lines.join("\n")
}

fn stamp(start: &DatePerhapsTime) -> String {
    match start {
        DatePerhapsTime::Date(date) => format!(":{}T000000Z", date.format("%Y%m%d")),
        DatePerhapsTime::DateTime(CalendarDateTime::Utc(dt)) => {
            format!(":{}", dt.format("%Y%m%dT%H%M%SZ"))
        }
        DatePerhapsTime::DateTime(CalendarDateTime::Floating(naive)) => {
            format!(":{}Z", naive.format("%Y%m%dT%H%M%S"))
        }
        DatePerhapsTime::DateTime(CalendarDateTime::WithTimezone { date_time, tzid }) => {
            format!(";TZID={tzid}:{}", date_time.format("%Y%m%dT%H%M%S"))
        }
    }
}

fn occurrence_start(
    occurrence: &DateTime<rrule::Tz>,
    start: &DatePerhapsTime,
) -> Option<DateTime<FixedOffset>> {
    match start {
        DatePerhapsTime::Date(_) => local_midnight(occurrence.date_naive()),
        DatePerhapsTime::DateTime(CalendarDateTime::Floating(_)) => local(occurrence.naive_utc()),
        DatePerhapsTime::DateTime(_) => Some(occurrence.fixed_offset()),
    }
}
