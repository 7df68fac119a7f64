//! The `today` command-line interface.
//!
//! Flags and the config file are merged into [`settings::Settings`], the
//! calendar is loaded through `today_source`, and `today_core` renders it.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod settings;

pub use cli::Cli;
pub use error::{CliError, CliResult};
