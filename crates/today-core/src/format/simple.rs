//! The minimal `simple` style: `Summary [in 15m]`.

use crate::error::{ConfigError, FormatError};
use crate::format::{EventFormatter, FormatContext, FormatOptions, FormatterKind};

/// Summary followed by the bracketed relative phrase.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleStyle;

pub(crate) fn init(_options: &FormatOptions) -> Result<FormatterKind, ConfigError> {
    Ok(FormatterKind::PerEvent(Box::new(SimpleStyle)))
}

impl EventFormatter for SimpleStyle {
    fn format(&self, ctx: &FormatContext<'_>) -> Result<Vec<String>, FormatError> {
        Ok(vec![
            ctx.event.summary.clone(),
            format!("[{}]", ctx.classification.phrase()),
        ])
    }
}
