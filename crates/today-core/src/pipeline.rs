//! The event rendering pipeline.
//!
//! [`EventPipeline`] is a pure function from events, a reference time and a
//! formatter to one block of text. It never reads the clock and never
//! writes to a stream; the caller decides where the text goes.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::FormatError;
use crate::event::{CalendarEvent, CalendarInput};
use crate::format::{EventFormatter, FormatContext, FormatterKind};

/// Options controlling selection and joining.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineOptions {
    /// Only keep events running at the reference time.
    pub current_only: bool,
    /// Joins the tokens of one event into a line.
    pub word_joiner: String,
    /// Joins the lines of all events.
    pub line_joiner: String,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            current_only: false,
            word_joiner: " ".to_string(),
            line_joiner: "\n".to_string(),
        }
    }
}

/// Filters, classifies, formats, sorts and joins events.
#[derive(Debug, Clone, Default)]
pub struct EventPipeline {
    options: PipelineOptions,
}

impl EventPipeline {
    /// Creates a pipeline with the given options.
    pub fn new(options: PipelineOptions) -> Self {
        Self { options }
    }

    /// Returns the pipeline options.
    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Renders `input` with whichever kind of formatter was selected.
    pub fn render(
        &self,
        kind: &FormatterKind,
        input: &CalendarInput,
        reference: DateTime<FixedOffset>,
    ) -> Result<String, FormatError> {
        match kind {
            FormatterKind::PerEvent(formatter) => {
                self.run(&input.events, reference, formatter.as_ref())
            }
            FormatterKind::WholeInput(lines) => {
                Ok(lines(&input.source).join(&self.options.line_joiner))
            }
        }
    }

    /// Renders events one line each, ordered by start time.
    ///
    /// Events lacking a start or end are skipped. The first formatter error
    /// aborts the run, so output is all or nothing.
    pub fn run(
        &self,
        events: &[CalendarEvent],
        reference: DateTime<FixedOffset>,
        formatter: &dyn EventFormatter,
    ) -> Result<String, FormatError> {
        let mut rendered = Vec::with_capacity(events.len());

        for event in events {
            let Some(ctx) = FormatContext::new(event, reference) else {
                trace!(summary = %event.summary, "Skipping event without start or end");
                continue;
            };

            if self.options.current_only && !ctx.is_current() {
                continue;
            }

            let tokens = formatter.format(&ctx)?;
            rendered.push((ctx.start, tokens));
        }

        // stable: events starting at the same instant keep their input order
        rendered.sort_by_key(|(start, _)| *start);

        debug!(
            total = events.len(),
            rendered = rendered.len(),
            current_only = self.options.current_only,
            "Rendered events"
        );

        Ok(rendered
            .iter()
            .map(|(_, tokens)| tokens.join(&self.options.word_joiner))
            .collect::<Vec<_>>()
            .join(&self.options.line_joiner))
    }
}
