//! One `today` run from parsed flags to written output.

use std::io::{IsTerminal, Write};

use chrono::{DateTime, FixedOffset};
use today_core::{
    CalendarEvent, EventPipeline, FormatOptions, FormatterRegistry, TracingConfig, init_tracing,
};
use today_source::{CalendarSource, RuleSet};
use tracing::{debug, info};

use crate::cli::Cli;
use crate::config::TodayConfig;
use crate::error::{CliError, CliResult};
use crate::output::deliver;
use crate::settings::Settings;

/// Tracing settings for the parsed flags.
pub fn tracing_config(cli: &Cli) -> TracingConfig {
    let config = if cli.verbose {
        TracingConfig::cli_verbose()
    } else {
        TracingConfig::default()
    };
    config.with_format(cli.log_format.into())
}

/// Installs the global subscriber. Fails when one is already installed.
pub fn init_logging(cli: &Cli) -> CliResult<()> {
    init_tracing(tracing_config(cli))?;
    Ok(())
}

/// The `--list-formats` line.
pub fn list_formats(registry: &FormatterRegistry) -> String {
    format!("Available formats: {}", registry.names().join(", "))
}

/// Runs the command. `now` is the single reference time for the whole run.
pub async fn run(cli: &Cli, now: DateTime<FixedOffset>) -> CliResult<()> {
    if cli.list_formats {
        println!("{}", list_formats(&FormatterRegistry::builtin()));
        return Ok(());
    }

    let config = match cli.config {
        Some(ref path) => TodayConfig::load_from(path)?,
        None => TodayConfig::load()?,
    };
    let settings = Settings::resolve(cli, config, now)?;

    let no_color = std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
    let options = settings.format_options(std::io::stdout().is_terminal(), no_color);

    let text = render(&settings, &options, now).await?;

    let mut lock = std::io::stdout().lock();
    let stdout: Option<&mut dyn Write> = if settings.write_stdout {
        Some(&mut lock)
    } else {
        None
    };
    deliver(&text, stdout, settings.write_file.as_deref())
}

/// Loads the calendar and renders it to text.
///
/// The formatter and rules are validated before the source is read, so
/// configuration mistakes never cost a download.
pub async fn render(
    settings: &Settings,
    options: &FormatOptions,
    now: DateTime<FixedOffset>,
) -> CliResult<String> {
    let registry = FormatterRegistry::builtin();
    let kind = registry.resolve(
        settings.style.as_deref(),
        settings.template.as_deref(),
        options,
    )?;
    let rules = RuleSet::compile(&settings.rules)?;

    let location = settings.source.as_deref().ok_or(CliError::MissingSource)?;
    let source = CalendarSource::parse(location)?;
    info!(%source, "Loading calendar");
    let mut input = source.load(&settings.cache, &settings.window).await?;

    debug!(
        start = %settings.window.start,
        end = %settings.window.end,
        "Selection window"
    );
    settings.window.retain(&mut input.events);
    if settings.local {
        input.events = input
            .events
            .into_iter()
            .map(CalendarEvent::with_local_timezone)
            .collect();
    }
    rules.apply(&mut input.events);

    let pipeline = EventPipeline::new(settings.pipeline.clone());
    Ok(pipeline.render(&kind, &input, now)?)
}
