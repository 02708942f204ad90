//! Implementation of the `dateplus occurrence` command.

use tracing::instrument;

use crate::{
    cli::{GlobalArgs, OccurrenceArgs},
    config::AppConfig,
    error::CliResult,
    output::{DateReport, OutputManager},
};

/// Report which occurrence of its weekday `args.time` is within its month.
#[instrument(skip_all, fields(time = %args.time))]
pub fn execute(
    args: OccurrenceArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let service = super::date_service(&global, &config);
    let (mut value, occurrence) = service.occurrence(&args.time)?;

    let report = DateReport::new(&args.time, &mut value, "l, j F Y")?.with_occurrence(occurrence);
    output.date(&report)
}
