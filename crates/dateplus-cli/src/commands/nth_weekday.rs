//! Implementation of the `dateplus nth-weekday` command.

use tracing::{debug, instrument};

use crate::{
    cli::{GlobalArgs, NthWeekdayArgs},
    config::AppConfig,
    error::CliResult,
    output::{DateReport, OutputManager},
};

/// Print the `occurrence`-th `weekday` of the chosen month at midnight.
#[instrument(skip_all, fields(occurrence = args.occurrence, weekday = %args.weekday))]
pub fn execute(
    args: NthWeekdayArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let service = super::date_service(&global, &config);
    let mut value = service.nth_weekday(args.occurrence, args.weekday, args.month, args.year)?;

    let occurrence = value.day_occurrence_of_month();
    if occurrence.is_some_and(|n| n < args.occurrence) {
        debug!(?occurrence, "Occurrence clamped to the last one in the month");
    }

    let input = describe(&args);
    let mut report = DateReport::new(&input, &mut value, &config.output.pattern)?;
    if let Some(n) = occurrence {
        report = report.with_occurrence(n);
    }
    output.date(&report)
}

fn describe(args: &NthWeekdayArgs) -> String {
    let mut text = format!("{} {}", args.occurrence, args.weekday);
    if let Some(month) = args.month {
        text.push_str(&format!(" month {month}"));
    }
    if let Some(year) = args.year {
        text.push_str(&format!(" year {year}"));
    }
    text
}
