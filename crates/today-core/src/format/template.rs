//! User-supplied output templates.
//!
//! A template is plain text with `{field}` placeholders, compiled once at
//! startup. Time fields take an optional strftime pattern after a colon:
//!
//! ```text
//! {start:%H:%M}-{end:%H:%M} {summary} ({relative})
//! ```
//!
//! Available fields: `summary`, `location`, `description`, `uid`,
//! `relative`, `relative_raw`, `progress`, `start`, `end`, `duration` and
//! `is_current`. Use `{{` and `}}` for literal braces.

use std::fmt::Write as _;

use chrono::format::{Item, StrftimeItems};
use thiserror::Error;

use crate::duration::format_duration;
use crate::error::{ConfigError, FormatError};
use crate::format::{EventFormatter, FormatContext, FormatOptions};
use crate::progress::{ProgressStyle, render_progress};

/// Time format used by `{start}` and `{end}` without an explicit pattern.
pub const DEFAULT_TIME_FORMAT: &str = "%H:%M";

/// Errors found while compiling a template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("unclosed '{{' at offset {offset}")]
    Unclosed { offset: usize },

    #[error("unmatched '}}' at offset {offset}")]
    UnmatchedBrace { offset: usize },

    #[error("empty placeholder at offset {offset}")]
    EmptyField { offset: usize },

    #[error("unknown field '{name}' at offset {offset}")]
    UnknownField { name: String, offset: usize },

    #[error("field '{name}' does not take a format (offset {offset})")]
    UnexpectedFormat { name: String, offset: usize },

    #[error("invalid time format '{spec}' at offset {offset}")]
    InvalidTimeFormat { spec: String, offset: usize },
}

/// A value a placeholder can refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Summary,
    Location,
    Description,
    Uid,
    Relative,
    RelativeRaw,
    Progress,
    Start,
    End,
    Duration,
    IsCurrent,
}

impl Field {
    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "summary" => Self::Summary,
            "location" => Self::Location,
            "description" => Self::Description,
            "uid" => Self::Uid,
            "relative" => Self::Relative,
            "relative_raw" => Self::RelativeRaw,
            "progress" => Self::Progress,
            "start" => Self::Start,
            "end" => Self::End,
            "duration" => Self::Duration,
            "is_current" => Self::IsCurrent,
            _ => return None,
        })
    }

    fn takes_time_format(&self) -> bool {
        matches!(self, Self::Start | Self::End)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field { field: Field, spec: Option<String> },
}

/// A compiled template.
#[derive(Debug, Clone)]
pub struct Template {
    segments: Vec<Segment>,
    needs_progress: bool,
}

impl Template {
    /// Parses `pattern` into literal and field segments.
    pub fn compile(pattern: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = pattern.char_indices().peekable();

        while let Some((offset, c)) = chars.next() {
            match c {
                '{' => {
                    if chars.next_if(|&(_, c)| c == '{').is_some() {
                        literal.push('{');
                        continue;
                    }

                    let mut inner = String::new();
                    let mut closed = false;
                    for (_, c) in chars.by_ref() {
                        if c == '}' {
                            closed = true;
                            break;
                        }
                        inner.push(c);
                    }
                    if !closed {
                        return Err(TemplateError::Unclosed { offset });
                    }

                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(parse_placeholder(&inner, offset)?);
                }
                '}' => {
                    if chars.next_if(|&(_, c)| c == '}').is_none() {
                        return Err(TemplateError::UnmatchedBrace { offset });
                    }
                    literal.push('}');
                }
                c => literal.push(c),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        let needs_progress = segments.iter().any(|s| {
            matches!(
                s,
                Segment::Field {
                    field: Field::Progress,
                    ..
                }
            )
        });

        Ok(Self {
            segments,
            needs_progress,
        })
    }

    /// Whether rendering requires the progress bar.
    pub fn needs_progress(&self) -> bool {
        self.needs_progress
    }

    /// Renders the template for one event.
    pub fn render(
        &self,
        ctx: &FormatContext<'_>,
        progress_style: ProgressStyle,
    ) -> Result<String, FormatError> {
        let progress = self
            .needs_progress
            .then(|| render_progress(ctx.start, ctx.end, ctx.reference, progress_style));

        let event = ctx.event;
        let mut out = String::new();

        for segment in &self.segments {
            let (field, spec) = match segment {
                Segment::Literal(text) => {
                    out.push_str(text);
                    continue;
                }
                Segment::Field { field, spec } => (field, spec.as_deref()),
            };

            match field {
                Field::Summary => out.push_str(&event.summary),
                Field::Location => out.push_str(event.location.as_deref().unwrap_or_default()),
                Field::Description => {
                    out.push_str(event.description.as_deref().unwrap_or_default())
                }
                Field::Uid => out.push_str(event.uid.as_deref().unwrap_or_default()),
                Field::Relative => out.push_str(&ctx.classification.phrase()),
                Field::RelativeRaw => out.push_str(&ctx.classification.relative.raw()),
                Field::Progress => out.push_str(progress.as_deref().unwrap_or_default()),
                Field::Start | Field::End => {
                    let at = if *field == Field::Start {
                        ctx.start
                    } else {
                        ctx.end
                    };
                    write!(out, "{}", at.format(spec.unwrap_or(DEFAULT_TIME_FORMAT)))
                        .map_err(|e| FormatError::render(&event.summary, e))?;
                }
                Field::Duration => out.push_str(&format_duration(ctx.end - ctx.start)),
                Field::IsCurrent => out.push_str(if ctx.is_current() { "true" } else { "false" }),
            }
        }

        Ok(out)
    }
}

fn parse_placeholder(inner: &str, offset: usize) -> Result<Segment, TemplateError> {
    let (name, spec) = match inner.split_once(':') {
        Some((name, spec)) => (name.trim(), Some(spec)),
        None => (inner.trim(), None),
    };

    if name.is_empty() {
        return Err(TemplateError::EmptyField { offset });
    }

    let field = Field::from_name(name).ok_or_else(|| TemplateError::UnknownField {
        name: name.to_string(),
        offset,
    })?;

    if let Some(spec) = spec {
        if !field.takes_time_format() {
            return Err(TemplateError::UnexpectedFormat {
                name: name.to_string(),
                offset,
            });
        }
        if spec.is_empty() || StrftimeItems::new(spec).any(|item| matches!(item, Item::Error)) {
            return Err(TemplateError::InvalidTimeFormat {
                spec: spec.to_string(),
                offset,
            });
        }
    }

    Ok(Segment::Field {
        field,
        spec: spec.map(str::to_string),
    })
}

/// Formatter backed by a compiled [`Template`].
///
/// The rendered text is split on single spaces into word tokens.
#[derive(Debug, Clone)]
pub struct TemplateFormatter {
    template: Template,
    progress_style: ProgressStyle,
}

impl TemplateFormatter {
    /// Compiles `pattern` into a formatter.
    pub fn compile(pattern: &str, options: &FormatOptions) -> Result<Self, ConfigError> {
        Ok(Self {
            template: Template::compile(pattern)?,
            progress_style: options.progress_style(),
        })
    }
}

impl EventFormatter for TemplateFormatter {
    fn format(&self, ctx: &FormatContext<'_>) -> Result<Vec<String>, FormatError> {
        let rendered = self.template.render(ctx, self.progress_style)?;
        Ok(rendered.split(' ').map(str::to_string).collect())
    }
}
