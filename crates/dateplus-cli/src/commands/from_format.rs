//! Implementation of the `dateplus from-format` command.

use dateplus_core::domain::strip_parse_modifiers;
use tracing::instrument;

use crate::{
    cli::{FromFormatArgs, GlobalArgs},
    config::AppConfig,
    error::CliResult,
    output::{DateReport, OutputManager},
};

/// Read `args.time` with the pattern `args.format`.
///
/// The result is printed with the same pattern (minus the `!` and `|`
/// markers), so a validated read echoes the input back. The one exception
/// is an offset that is not a whole number of hours, which is printed in
/// the requested zone instead.
#[instrument(skip_all, fields(format = %args.format, time = %args.time))]
pub fn execute(
    args: FromFormatArgs,
    global: GlobalArgs,
    mut config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    if args.no_validate {
        config.defaults.validate_format = false;
    }
    let service = super::date_service(&global, &config);
    let mut value = service.from_format(&args.format, &args.time)?;

    let pattern = strip_parse_modifiers(&args.format);
    let report = DateReport::new(&args.time, &mut value, &pattern)?;
    if args.no_validate && report.formatted != args.time {
        output.warning(&format!(
            "'{}' was normalised to '{}'",
            args.time, report.formatted
        ))?;
    }
    output.date(&report)
}
