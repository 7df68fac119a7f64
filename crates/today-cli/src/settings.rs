//! Effective settings for one run: flags layered over the config file.

use std::path::PathBuf;

use chrono::{DateTime, FixedOffset};
use today_core::{FormatOptions, PipelineOptions};
use today_source::{DEFAULT_EXPIRY, RuleConfig, SelectionWindow, SourceCache};

use crate::cli::{Cli, ColorChoice};
use crate::config::TodayConfig;
use crate::error::CliResult;

/// Everything a run needs, with all defaults filled in.
#[derive(Debug, Clone)]
pub struct Settings {
    pub source: Option<String>,
    pub window: SelectionWindow,
    pub local: bool,
    pub style: Option<String>,
    pub template: Option<String>,
    pub color: ColorChoice,
    pub pipeline: PipelineOptions,
    pub cache: SourceCache,
    pub rules: RuleConfig,
    pub write_file: Option<PathBuf>,
    pub write_stdout: bool,
}

impl Settings {
    /// Merges `cli` over `config`. `now` anchors the default selection window.
    pub fn resolve(cli: &Cli, config: TodayConfig, now: DateTime<FixedOffset>) -> CliResult<Self> {
        let TodayConfig {
            display,
            source,
            rules,
        } = config;

        let today = SelectionWindow::today(now);
        let window = SelectionWindow::new(
            cli.time_start.unwrap_or(today.start),
            cli.time_end.unwrap_or(today.end),
        );

        // a style or template on the command line replaces both config keys
        let (style, template) = if cli.has_formatter() {
            (cli.format.clone(), cli.template.clone())
        } else {
            (display.style, display.template)
        };

        let expiry = match cli.cache_expiry {
            Some(expiry) => expiry,
            None => source.cache_expiry()?.unwrap_or(DEFAULT_EXPIRY),
        };
        let cache_dir = cli
            .cache_dir
            .clone()
            .or(source.cache_dir)
            .unwrap_or_else(SourceCache::default_dir);

        Ok(Self {
            source: cli.path.clone().or(source.path),
            window,
            local: cli.local,
            style,
            template,
            color: cli.color.unwrap_or(display.color),
            pipeline: PipelineOptions {
                current_only: cli.now,
                word_joiner: cli.join_words.clone().unwrap_or(display.join_words),
                line_joiner: cli.join_lines.clone().unwrap_or(display.join_lines),
            },
            cache: SourceCache::new(cache_dir, expiry),
            rules,
            write_file: cli.write_file.clone(),
            write_stdout: cli.write_stdout,
        })
    }

    /// Formatter options for the given terminal state.
    pub fn format_options(&self, stdout_is_terminal: bool, no_color: bool) -> FormatOptions {
        FormatOptions {
            color: self.color.enabled(stdout_is_terminal, no_color),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DisplaySettings, SourceSettings};
    use chrono::{Local, Timelike};
    use clap::Parser;
    use std::time::Duration;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["today"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    fn now() -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }

    fn config() -> TodayConfig {
        TodayConfig {
            display: DisplaySettings {
                style: Some("simple".to_string()),
                join_lines: " | ".to_string(),
                color: ColorChoice::Never,
                ..Default::default()
            },
            source: SourceSettings {
                path: Some("/srv/lectures.ics".to_string()),
                cache_dir: Some(PathBuf::from("/var/cache/today")),
                cache_expiry: Some("10m".to_string()),
            },
            rules: RuleConfig::default(),
        }
    }

    mod layering {
        use super::*;

        #[test]
        fn config_fills_missing_flags() {
            let settings = Settings::resolve(&cli(&[]), config(), now()).unwrap();
            assert_eq!(settings.source.as_deref(), Some("/srv/lectures.ics"));
            assert_eq!(settings.style.as_deref(), Some("simple"));
            assert_eq!(settings.pipeline.word_joiner, " ");
            assert_eq!(settings.pipeline.line_joiner, " | ");
            assert_eq!(settings.color, ColorChoice::Never);
            assert_eq!(
                settings.cache,
                SourceCache::new("/var/cache/today", Duration::from_secs(600))
            );
        }

        #[test]
        fn flags_override_config() {
            let settings = Settings::resolve(
                &cli(&[
                    "-p",
                    "other.ics",
                    "--join-lines",
                    ";",
                    "--color",
                    "always",
                    "--cache-expiry",
                    "1m",
                    "--cache-dir",
                    "/tmp/c",
                ]),
                config(),
                now(),
            )
            .unwrap();
            assert_eq!(settings.source.as_deref(), Some("other.ics"));
            assert_eq!(settings.pipeline.line_joiner, ";");
            assert_eq!(settings.color, ColorChoice::Always);
            assert_eq!(settings.cache, SourceCache::new("/tmp/c", Duration::from_secs(60)));
        }

        #[test]
        fn template_flag_replaces_config_style() {
            let settings =
                Settings::resolve(&cli(&["--template", "{summary}"]), config(), now()).unwrap();
            assert!(settings.style.is_none());
            assert_eq!(settings.template.as_deref(), Some("{summary}"));
        }

        #[test]
        fn now_flag_selects_current_only() {
            let settings = Settings::resolve(&cli(&["--now"]), config(), now()).unwrap();
            assert!(settings.pipeline.current_only);
        }

        #[test]
        fn defaults_without_config() {
            let settings = Settings::resolve(&cli(&[]), TodayConfig::default(), now()).unwrap();
            assert!(settings.style.is_none());
            assert_eq!(settings.pipeline, PipelineOptions::default());
            assert_eq!(settings.cache.expiry(), DEFAULT_EXPIRY);
            assert!(settings.local);
            assert!(settings.write_stdout);
        }
    }

    mod window {
        use super::*;

        #[test]
        fn defaults_to_today() {
            let reference = now();
            let settings = Settings::resolve(&cli(&[]), TodayConfig::default(), reference).unwrap();
            assert_eq!(settings.window, SelectionWindow::today(reference));
            let start = settings.window.start.with_timezone(&Local);
            assert_eq!((start.hour(), start.minute()), (0, 0));
        }

        #[test]
        fn explicit_bounds() {
            let settings = Settings::resolve(
                &cli(&["--time-start", "05.02.2025 08:00:00"]),
                TodayConfig::default(),
                now(),
            )
            .unwrap();
            let start = settings.window.start.with_timezone(&Local);
            assert_eq!(
                start.format("%d.%m.%Y %H:%M:%S").to_string(),
                "05.02.2025 08:00:00"
            );
        }
    }

    #[test]
    fn color_follows_terminal() {
        let settings = Settings::resolve(&cli(&[]), TodayConfig::default(), now()).unwrap();
        assert!(settings.format_options(true, false).color);
        assert!(!settings.format_options(false, false).color);
        assert!(!settings.format_options(true, true).color);
    }
}
