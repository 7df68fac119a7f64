//! Output styles for calendar events.
//!
//! Every style turns one classified event into a list of word tokens that
//! the [`EventPipeline`](crate::pipeline::EventPipeline) joins into a line:
//! - **default**: decorated output with times, progress bar and colors
//! - **simple**: summary plus a bracketed relative phrase
//! - **raw**: the unparsed calendar text, line by line
//! - **template**: a user-supplied pattern compiled at startup
//!
//! # Example
//!
//! ```rust
//! use today_core::format::{FormatOptions, FormatterRegistry};
//!
//! let registry = FormatterRegistry::builtin();
//! let options = FormatOptions::plain();
//!
//! assert!(registry.resolve(Some("simple"), None, &options).is_ok());
//! assert!(registry.resolve(Some("nonexistent"), None, &options).is_err());
//! assert!(registry.resolve(None, Some("{summary} {relative}"), &options).is_ok());
//! ```

pub mod default;
pub mod raw;
pub mod simple;
pub mod template;


use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, FixedOffset};
use owo_colors::{OwoColorize, Style};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::classify::Classification;
use crate::error::{ConfigError, FormatError};
use crate::event::CalendarEvent;
use crate::progress::ProgressStyle;

pub use default::DefaultStyle;
pub use simple::SimpleStyle;
pub use template::{Template, TemplateError, TemplateFormatter};

/// Name of the style used when none is requested.
pub const DEFAULT_STYLE: &str = "default";

/// Configuration options shared by all styles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatOptions {
    /// Whether to emit ANSI colors.
    pub color: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self { color: true }
    }
}

impl FormatOptions {
    /// Options producing plain text without escape sequences.
    pub fn plain() -> Self {
        Self { color: false }
    }

    /// The progress bar style matching these options.
    pub fn progress_style(&self) -> ProgressStyle {
        ProgressStyle {
            highlight: self.color,
        }
    }

    /// Applies `style` to `text` when colors are enabled.
    pub(crate) fn paint(&self, text: impl fmt::Display, style: Style) -> String {
        if self.color {
            text.style(style).to_string()
        } else {
            text.to_string()
        }
    }
}

/// Everything a style may look at when formatting one event.
#[derive(Debug, Clone, Copy)]
pub struct FormatContext<'a> {
    /// The event being formatted.
    pub event: &'a CalendarEvent,
    /// The event start.
    pub start: DateTime<FixedOffset>,
    /// The event end.
    pub end: DateTime<FixedOffset>,
    /// The classification computed by the pipeline.
    pub classification: Classification,
    /// The reference time of this invocation.
    pub reference: DateTime<FixedOffset>,
}

impl<'a> FormatContext<'a> {
    /// Builds a context, or `None` when the event lacks a timestamp.
    pub fn new(event: &'a CalendarEvent, reference: DateTime<FixedOffset>) -> Option<Self> {
        let (start, end) = event.span()?;
        Some(Self {
            event,
            start,
            end,
            classification: crate::classify::classify(start, end, reference),
            reference,
        })
    }

    /// Whether the event is running at the reference time.
    pub fn is_current(&self) -> bool {
        self.classification.is_current
    }
}

/// A strategy turning one event into display tokens.
pub trait EventFormatter: Send + Sync {
    /// Formats one event into word tokens.
    fn format(&self, ctx: &FormatContext<'_>) -> Result<Vec<String>, FormatError>;
}

/// A whole-input formatter working on the unparsed calendar text.
pub type WholeInputFn = fn(&str) -> Vec<String>;

/// The formatter selected for one invocation.
pub enum FormatterKind {
    /// Formats each event on its own.
    PerEvent(Box<dyn EventFormatter>),
    /// Bypasses the event loop and works on the raw source.
    WholeInput(WholeInputFn),
}

impl fmt::Debug for FormatterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PerEvent(_) => f.write_str("PerEvent(..)"),
            Self::WholeInput(_) => f.write_str("WholeInput(..)"),
        }
    }
}

/// Initializer for a named style.
pub type FormatterInit = fn(&FormatOptions) -> Result<FormatterKind, ConfigError>;

/// Named set of available styles.
#[derive(Debug, Clone)]
pub struct FormatterRegistry {
    styles: BTreeMap<&'static str, FormatterInit>,
}

impl Default for FormatterRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl FormatterRegistry {
    /// Creates an empty registry.
    pub fn empty() -> Self {
        Self {
            styles: BTreeMap::new(),
        }
    }

    /// Creates a registry with the built-in styles.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.register(DEFAULT_STYLE, default::init);
        registry.register("simple", simple::init);
        registry.register("raw", raw::init);
        registry
    }

    /// Registers (or replaces) a style.
    pub fn register(&mut self, name: &'static str, init: FormatterInit) {
        self.styles.insert(name, init);
    }

    /// Returns the registered style names in alphabetical order.
    pub fn names(&self) -> Vec<&'static str> {
        self.styles.keys().copied().collect()
    }

    /// Returns the initializer for a style.
    pub fn get(&self, name: &str) -> Option<FormatterInit> {
        self.styles.get(name).copied()
    }

    /// Selects and initializes the formatter for one invocation.
    ///
    /// A template takes the place of a style name; supplying both is an
    /// error. Without either, the `default` style is used. Empty strings
    /// count as not supplied.
    pub fn resolve(
        &self,
        style: Option<&str>,
        template: Option<&str>,
        options: &FormatOptions,
    ) -> Result<FormatterKind, ConfigError> {
        let style = style.filter(|s| !s.is_empty());
        let template = template.filter(|t| !t.is_empty());

        match (style, template) {
            (Some(style), Some(_)) => Err(ConfigError::ConflictingFormat {
                style: style.to_string(),
            }),
            (None, Some(pattern)) => {
                debug!(pattern, "Compiling template formatter");
                let formatter = TemplateFormatter::compile(pattern, options)?;
                Ok(FormatterKind::PerEvent(Box::new(formatter)))
            }
            (style, None) => {
                let name = style.unwrap_or(DEFAULT_STYLE);
                let init = self
                    .get(name)
                    .ok_or_else(|| ConfigError::unknown_style(name, &self.names()))?;
                debug!(style = name, "Initializing formatter");
                init(options)
            }
        }
    }
}
