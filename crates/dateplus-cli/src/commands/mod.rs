//! Command handlers, one module per subcommand.
//!
//! Handlers translate arguments into core calls and hand the result to the
//! [`OutputManager`](crate::output::OutputManager). No date logic lives here.

use dateplus_core::application::DateService;

use crate::{cli::GlobalArgs, config::AppConfig};

pub mod completions;
pub mod config;
pub mod from_format;
pub mod from_parts;
pub mod nth_weekday;
pub mod occurrence;
pub mod parse;
pub mod timestamp;

/// Service built from the `--tz` flag and the loaded configuration.
pub fn date_service(global: &GlobalArgs, config: &AppConfig) -> DateService {
    DateService::new(config.timezone(global.tz.as_deref()), config.settings())
}
