//! Core types: events, relative time, progress, formatting pipeline

pub mod classify;
pub mod duration;
pub mod error;
pub mod event;
pub mod format;
pub mod pipeline;
pub mod progress;
pub mod tracing;

pub use classify::{Classification, Relative, classify};
pub use duration::format_duration;
pub use error::{ConfigError, FormatError};
pub use event::{CalendarEvent, CalendarInput};
pub use format::{
    DEFAULT_STYLE, EventFormatter, FormatContext, FormatOptions, FormatterKind, FormatterRegistry,
    Template, TemplateError, TemplateFormatter,
};
pub use pipeline::{EventPipeline, PipelineOptions};
pub use progress::{FINISHED, ProgressStyle, render_progress};
pub use crate::tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
