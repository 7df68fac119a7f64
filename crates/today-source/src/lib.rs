//! Calendar acquisition for today.
//!
//! Reads a calendar from a local file or a cached HTTP download, parses it
//! (expanding recurring events), and narrows the events down to a selection
//! window and the configured rules before they reach the formatting pipeline
//! in `today_core`.

pub mod cache;
pub mod error;
pub mod ics;
mod recurrence;
pub mod rules;
pub mod source;
pub mod window;

pub use cache::{DEFAULT_EXPIRY, SourceCache};
pub use error::{SourceError, SourceResult};
pub use ics::parse_calendar;
pub use rules::{RewriteConfig, RuleConfig, RuleSet};
pub use source::CalendarSource;
pub use window::{SelectionWindow, WINDOW_TIME_FORMAT};
