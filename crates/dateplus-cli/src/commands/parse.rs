//! Implementation of the `dateplus parse` command.

use tracing::{debug, instrument};

use crate::{
    cli::{GlobalArgs, ParseArgs},
    config::AppConfig,
    error::CliResult,
    output::{DateReport, OutputManager},
};

/// Read `args.time` as free text and print it with the requested pattern.
#[instrument(skip_all, fields(time = %args.time))]
pub fn execute(
    args: ParseArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let service = super::date_service(&global, &config);
    let mut value = service.parse(&args.time);
    debug!(timezone = %value.timezone(), valid = !value.has_errors(), "Parsed");

    let pattern = args.format.as_deref().unwrap_or(&config.output.pattern);
    let report = DateReport::new(&args.time, &mut value, pattern)?;
    output.date(&report)
}
