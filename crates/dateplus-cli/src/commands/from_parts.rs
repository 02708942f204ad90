//! Implementation of the `dateplus from-parts` command.

use dateplus_core::domain::DateParts;
use tracing::instrument;

use crate::{
    cli::{FromPartsArgs, GlobalArgs},
    config::AppConfig,
    error::CliResult,
    output::{DateReport, OutputManager},
};

#[instrument(skip_all)]
pub fn execute(
    args: FromPartsArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let parts = to_parts(&args);
    let service = super::date_service(&global, &config);
    let mut value = service.from_parts(&parts)?;

    // Echo what was built so the input column is meaningful in JSON output.
    let input = parts.to_iso(true);
    let report = DateReport::new(&input, &mut value, &config.output.pattern)?;
    output.date(&report)
}

fn to_parts(args: &FromPartsArgs) -> DateParts {
    DateParts {
        year: args.year,
        month: args.month,
        day: args.day,
        hour: args.hour,
        minute: args.minute,
        second: args.second,
    }
}
