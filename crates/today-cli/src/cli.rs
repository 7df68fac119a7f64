//! Command-line interface definition.

use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, FixedOffset};
use clap::{ArgAction, Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use today_core::TracingOutputFormat;
use today_source::SelectionWindow;

/// today - iCal CLI viewer
#[derive(Debug, Parser)]
#[command(name = "today")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "TODAY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug output on stderr
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Log line format
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,

    // --- Input ---
    /// Path or http(s)/file URL of the iCal file
    #[arg(long, short, env = "ICAL_PATH")]
    pub path: Option<String>,

    /// Cache directory for downloaded calendars
    #[arg(long, env = "TODAY_CACHE")]
    pub cache_dir: Option<PathBuf>,

    /// How long a downloaded calendar stays fresh (e.g. "5m", "1h 30m")
    #[arg(long, value_parser = humantime::parse_duration)]
    pub cache_expiry: Option<Duration>,

    // --- Calendar selection ---
    /// Show only active events
    #[arg(long)]
    pub now: bool,

    /// Start of the selection window (dd.mm.yyyy HH:MM:SS, default: today 00:00:00)
    #[arg(long, value_parser = parse_window_time)]
    pub time_start: Option<DateTime<FixedOffset>>,

    /// End of the selection window (dd.mm.yyyy HH:MM:SS, default: today 23:59:59)
    #[arg(long, value_parser = parse_window_time)]
    pub time_end: Option<DateTime<FixedOffset>>,

    /// Convert timestamps to the local timezone
    #[arg(long, action = ArgAction::Set, default_value_t = true)]
    pub local: bool,

    // --- Output ---
    /// Formatter for output
    #[arg(long, short, conflicts_with = "template")]
    pub format: Option<String>,

    /// Custom template, e.g. "{start}-{end} {summary}"
    #[arg(long)]
    pub template: Option<String>,

    /// Text joining the words of one event
    #[arg(long)]
    pub join_words: Option<String>,

    /// Text joining the lines of all events
    #[arg(long)]
    pub join_lines: Option<String>,

    /// List available formats
    #[arg(long, short = 'L')]
    pub list_formats: bool,

    /// Also write the output to this file
    #[arg(long)]
    pub write_file: Option<PathBuf>,

    /// Write the output to stdout
    #[arg(long, action = ArgAction::Set, default_value_t = true)]
    pub write_stdout: bool,

    /// When to use colors
    #[arg(long, value_enum)]
    pub color: Option<ColorChoice>,
}

impl Cli {
    /// Whether the style or template was chosen on the command line.
    pub fn has_formatter(&self) -> bool {
        self.format.is_some() || self.template.is_some()
    }
}

/// Color mode for styled output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    /// Color when stdout is a terminal and NO_COLOR is unset
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    pub fn enabled(self, stdout_is_terminal: bool, no_color: bool) -> bool {
        match self {
            Self::Auto => stdout_is_terminal && !no_color,
            Self::Always => true,
            Self::Never => false,
        }
    }
}

/// Log line format for `--log-format`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Pretty,
    #[default]
    Compact,
    Json,
}

impl From<LogFormat> for TracingOutputFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
            LogFormat::Json => Self::Json,
        }
    }
}

fn parse_window_time(text: &str) -> Result<DateTime<FixedOffset>, String> {
    SelectionWindow::parse_bound(text).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["today"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    mod flags {
        use super::*;

        #[test]
        fn defaults() {
            let cli = parse(&["--path", "cal.ics"]);
            assert_eq!(cli.path.as_deref(), Some("cal.ics"));
            assert!(cli.local);
            assert!(cli.write_stdout);
            assert!(!cli.now);
            assert!(!cli.list_formats);
            assert!(cli.format.is_none());
            assert!(cli.color.is_none());
            assert_eq!(cli.log_format, LogFormat::Compact);
        }

        #[test]
        fn booleans_take_values() {
            let cli = parse(&["--local", "false", "--write-stdout", "false"]);
            assert!(!cli.local);
            assert!(!cli.write_stdout);
        }

        #[test]
        fn short_flags() {
            let cli = parse(&["-p", "cal.ics", "-f", "simple", "-L", "-v"]);
            assert_eq!(cli.path.as_deref(), Some("cal.ics"));
            assert_eq!(cli.format.as_deref(), Some("simple"));
            assert!(cli.list_formats);
            assert!(cli.verbose);
            assert!(cli.has_formatter());
        }

        #[test]
        fn format_conflicts_with_template() {
            let result = Cli::try_parse_from(["today", "-f", "simple", "--template", "{summary}"]);
            assert!(result.is_err());
        }

        #[test]
        fn cache_expiry_is_humantime() {
            let cli = parse(&["--cache-expiry", "1h 30m"]);
            assert_eq!(cli.cache_expiry, Some(Duration::from_secs(5400)));
        }

        #[test]
        fn window_bounds_use_layout() {
            let cli = parse(&["--time-start", "05.02.2025 08:00:00"]);
            assert!(cli.time_start.is_some());

            let result = Cli::try_parse_from(["today", "--time-start", "2025-02-05"]);
            assert!(result.is_err());
        }

        #[test]
        fn color_values() {
            let cli = parse(&["--color", "never"]);
            assert_eq!(cli.color, Some(ColorChoice::Never));
        }
    }

    mod color {
        use super::*;

        #[test]
        fn auto_follows_terminal_and_no_color() {
            assert!(ColorChoice::Auto.enabled(true, false));
            assert!(!ColorChoice::Auto.enabled(false, false));
            assert!(!ColorChoice::Auto.enabled(true, true));
        }

        #[test]
        fn always_and_never_ignore_environment() {
            assert!(ColorChoice::Always.enabled(false, true));
            assert!(!ColorChoice::Never.enabled(true, false));
        }
    }

    #[test]
    fn log_format_maps_to_tracing() {
        assert_eq!(
            TracingOutputFormat::from(LogFormat::Json),
            TracingOutputFormat::Json
        );
    }
}
