//! today CLI entry point.

use std::process::ExitCode;

use chrono::Local;
use clap::Parser;
use today_cli::{Cli, CliResult, app};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> CliResult<()> {
    app::init_logging(cli)?;

    // the only clock read of the whole run
    let now = Local::now().fixed_offset();
    app::run(cli, now).await
}
