//! Implementation of the `dateplus timestamp` command.

use tracing::instrument;

use crate::{
    cli::{GlobalArgs, TimestampArgs},
    config::AppConfig,
    error::CliResult,
    output::{DateReport, OutputManager},
};

#[instrument(skip_all, fields(timestamp = %args.timestamp))]
pub fn execute(
    args: TimestampArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let service = super::date_service(&global, &config);
    let mut value = service.from_timestamp(&args.timestamp)?;

    let report = DateReport::new(&args.timestamp, &mut value, &config.output.pattern)?;
    output.date(&report)
}
