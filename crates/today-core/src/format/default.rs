//! The decorated default style.

use owo_colors::Style;

use crate::duration::format_duration;
use crate::error::{ConfigError, FormatError};
use crate::format::{EventFormatter, FormatContext, FormatOptions, FormatterKind};
use crate::progress::render_progress;

const CLOCK_FORMAT: &str = "%H:%M";

/// Marker, summary, duration, clock times and either the progress bar with
/// the remaining time (running events) or the relative phrase.
#[derive(Debug, Clone)]
pub struct DefaultStyle {
    options: FormatOptions,
}

impl DefaultStyle {
    /// Creates the style.
    pub fn new(options: FormatOptions) -> Self {
        Self { options }
    }
}

pub(crate) fn init(options: &FormatOptions) -> Result<FormatterKind, ConfigError> {
    Ok(FormatterKind::PerEvent(Box::new(DefaultStyle::new(
        options.clone(),
    ))))
}

impl EventFormatter for DefaultStyle {
    fn format(&self, ctx: &FormatContext<'_>) -> Result<Vec<String>, FormatError> {
        let opts = &self.options;
        let summary = &ctx.event.summary;
        let mut content = Vec::new();

        if ctx.is_current() {
            content.push(">".to_string());
            if opts.color {
                content.push(opts.paint(
                    format!(" {} ", summary),
                    Style::new().black().on_bright_magenta(),
                ));
            } else {
                content.push(summary.clone());
            }
            content.push(format!("[{}]", format_duration(ctx.reference - ctx.start)));
        } else {
            content.push(" ".to_string());
            content.push(opts.paint(summary, Style::new().blue()));
            content.push(format!("[{}]", format_duration(ctx.end - ctx.start)));
        }

        content.push("from".to_string());
        content.push(opts.paint(ctx.start.format(CLOCK_FORMAT), Style::new().yellow()));
        content.push("to".to_string());
        content.push(opts.paint(ctx.end.format(CLOCK_FORMAT), Style::new().yellow()));

        let phrase = format!("({})", ctx.classification.phrase());
        if ctx.is_current() {
            content.push(render_progress(
                ctx.start,
                ctx.end,
                ctx.reference,
                opts.progress_style(),
            ));
            content.push(opts.paint(phrase, Style::new().green()));
        } else {
            content.push(opts.paint(phrase, Style::new().white()));
        }

        Ok(content)
    }
}
