//! # dateplus CLI
//!
//! Read, validate and format dates from the command line.
//!
//! ## Startup sequence
//!
//! 1. Parse CLI arguments (clap handles `--help` / `--version` early-exit).
//! 2. Initialise the tracing subscriber (logging).
//! 3. Load configuration (defaults + file + env).
//! 4. Build the [`OutputManager`].
//! 5. Dispatch to the appropriate command handler.
//! 6. Translate any [`CliError`] into a user-facing message and exit code.
//!
//! ## Exit codes
//!
//! | Code | Meaning                          |
//! |------|----------------------------------|
//! |  0   | Success                          |
//! |  1   | Internal / system error          |
//! |  2   | Invalid date or bad input        |
//! |  3   | Resource not found               |
//! |  4   | Configuration error              |

use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, info, instrument};

use crate::{
    cli::{Cli, Commands, OutputFormat},
    config::AppConfig,
    error::{CliError, CliResult},
    logging::{init_logging, log_date_context},
    output::OutputManager,
};

mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod output;

fn main() -> ExitCode {
    // Load .env before anything else, including tracing init.
    let _ = dotenvy::dotenv();

    // ── 1. Parse arguments ────────────────────────────────────────────────
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => e.exit(),
    };

    // ── 2. Initialise tracing ─────────────────────────────────────────────
    if let Err(e) = init_logging(&cli.global) {
        eprintln!("Failed to initialise logging: {e}");
        return ExitCode::from(1);
    }

    debug!(
        verbose = cli.global.verbose,
        quiet = cli.global.quiet,
        no_color = cli.global.no_color,
        tz = cli.global.tz.as_deref().unwrap_or("-"),
        "CLI started"
    );

    // ── 3. Load configuration ─────────────────────────────────────────────
    let config = match AppConfig::load(cli.global.config.as_ref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            return handle_error(
                CliError::ConfigError {
                    message: format!("{e:#}"),
                    source: None,
                },
                &Report::default(),
            );
        }
    };

    log_date_context(&cli.global, &config);

    // ── 4. Build output manager ───────────────────────────────────────────
    let output = OutputManager::new(&cli.global, &config);
    let report = Report {
        format: output.format(),
        color: output.supports_color(),
        verbose: cli.global.verbose > 0,
    };

    // ── 5. Dispatch + 6. Error handling ──────────────────────────────────
    match run(cli, config, output) {
        Ok(()) => {
            info!("dateplus completed successfully");
            ExitCode::SUCCESS
        }
        Err(e) => handle_error(e, &report),
    }
}

/// Dispatch to the correct command handler.
#[instrument(skip_all)]
fn run(cli: Cli, config: AppConfig, output: OutputManager) -> CliResult<()> {
    match cli.command {
        Commands::Parse(args) => commands::parse::execute(args, cli.global, config, output),
        Commands::FromFormat(args) => {
            commands::from_format::execute(args, cli.global, config, output)
        }
        Commands::FromParts(args) => commands::from_parts::execute(args, cli.global, config, output),
        Commands::Timestamp(args) => commands::timestamp::execute(args, cli.global, config, output),
        Commands::NthWeekday(args) => {
            commands::nth_weekday::execute(args, cli.global, config, output)
        }
        Commands::Occurrence(args) => {
            commands::occurrence::execute(args, cli.global, config, output)
        }
        Commands::Completions(args) => commands::completions::execute(args),
        Commands::Config(cmd) => commands::config::execute(cmd, config, output),
    }
}

/// How errors are reported, decided once the output settings are known.
#[derive(Debug, Default)]
struct Report {
    format: OutputFormat,
    color: bool,
    verbose: bool,
}

/// Translate a `CliError` into a user message and an appropriate exit code.
fn handle_error(err: CliError, report: &Report) -> ExitCode {
    err.log();

    if report.format == OutputFormat::Json {
        // JSON consumers read stdout.
        match serde_json::to_string_pretty(&err.to_json()) {
            Ok(text) => println!("{text}"),
            Err(_) => eprint!("{}", err.format_plain(report.verbose)),
        }
    } else {
        let color = report.color && std::io::IsTerminal::is_terminal(&std::io::stderr());
        let msg = if color {
            err.format_colored(report.verbose)
        } else {
            err.format_plain(report.verbose)
        };
        eprint!("{msg}");
    }

    ExitCode::from(err.exit_code())
}

// ── tests ─────────────────────────────────────────────────────────────────────
