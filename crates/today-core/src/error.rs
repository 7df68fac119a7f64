//! Core error types.

use thiserror::Error;

use crate::format::template::TemplateError;

/// Errors detected while selecting the output formatter.
///
/// These are always reported before any event is processed.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No style is registered under the requested name.
    #[error("cannot find formatter: {name} (available: {available})")]
    UnknownStyle { name: String, available: String },

    /// Both a style name and a template pattern were supplied.
    #[error("cannot combine a template with a named format ({style})")]
    ConflictingFormat { style: String },

    /// The template pattern failed to compile.
    #[error("invalid template: {0}")]
    Template(#[from] TemplateError),
}

impl ConfigError {
    /// Creates an unknown style error listing the registered names.
    pub fn unknown_style(name: impl Into<String>, available: &[&str]) -> Self {
        Self::UnknownStyle {
            name: name.into(),
            available: available.join(", "),
        }
    }
}

/// Errors raised while formatting an individual event.
///
/// Any such error aborts the whole run.
#[derive(Debug, Error)]
pub enum FormatError {
    /// Writing the output text failed.
    #[error("failed to render '{summary}': {message}")]
    Render { summary: String, message: String },
}

impl FormatError {
    /// Creates a render error for the event with the given summary.
    pub fn render(summary: impl Into<String>, message: impl ToString) -> Self {
        Self::Render {
            summary: summary.into(),
            message: message.to_string(),
        }
    }
}
