//! The `raw` style: the calendar source, unparsed.

use crate::error::ConfigError;
use crate::format::{FormatOptions, FormatterKind};

/// Splits the source text into lines.
pub fn raw_lines(source: &str) -> Vec<String> {
    source.split('\n').map(str::to_string).collect()
}

pub(crate) fn init(_options: &FormatOptions) -> Result<FormatterKind, ConfigError> {
    Ok(FormatterKind::WholeInput(raw_lines))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_newlines() {
        assert_eq!(
            raw_lines("BEGIN:VCALENDAR\nEND:VCALENDAR"),
            vec!["BEGIN:VCALENDAR", "END:VCALENDAR"]
        );
    }

    #[test]
    fn keeps_trailing_empty_line() {
        assert_eq!(raw_lines("a\n"), vec!["a", ""]);
    }
}
