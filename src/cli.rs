//! CLI domain: parse, route and presentation only.
//! No config logic lives here; routes call into `ConfigState`.

mod parse;
mod presentation;
mod route;

pub use parse::{Cli, Commands};
pub use presentation::{format_report, format_schedule, format_watched_files};
pub use route::RunContext;
