//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No date logic lives here.

use chrono::Weekday;
use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "dateplus",
    bin_name = "dateplus",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Read, validate and format dates",
    long_about = "dateplus reads dates from free text, letter patterns, \
                  numeric parts or Unix timestamps, and reports every \
                  problem with the input instead of guessing.",
    after_help = "EXAMPLES:\n\
        \x20 dateplus parse '2020-06-15 14:30' --tz Europe/Paris\n\
        \x20 dateplus from-format 'Y-m-d' '2020-02-29'\n\
        \x20 dateplus from-parts --year 2020 --month 6 --day 15\n\
        \x20 dateplus nth-weekday 2 tuesday --month 6 --year 2020\n\
        \x20 dateplus completions bash > /usr/share/bash-completion/completions/dateplus",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Read a date from free text.
    #[command(
        visible_alias = "p",
        about = "Read a date from free text",
        after_help = "EXAMPLES:\n\
            \x20 dateplus parse now\n\
            \x20 dateplus parse 'next week' --format 'l, d F Y'\n\
            \x20 dateplus parse '2011-02-30'   # reports 'The date is invalid.'"
    )]
    Parse(ParseArgs),

    /// Read a date with an explicit pattern.
    #[command(
        name = "from-format",
        visible_alias = "ff",
        about = "Read a date with a letter pattern",
        after_help = "EXAMPLES:\n\
            \x20 dateplus from-format 'd/m/Y H:i' '15/06/2020 14:30'\n\
            \x20 dateplus from-format '!Y-m-d' '2020-06-15'\n\
            \x20 dateplus from-format 'Y' '11' --no-validate"
    )]
    FromFormat(FromFormatArgs),

    /// Build a date from numeric parts.
    #[command(
        name = "from-parts",
        about = "Build a date from year, month, day, hour, minute and second",
        after_help = "EXAMPLES:\n\
            \x20 dateplus from-parts --year 2020 --month 2 --day 29\n\
            \x20 dateplus from-parts --hour 23 --minute 59"
    )]
    FromParts(FromPartsArgs),

    /// Build a date from a Unix timestamp.
    #[command(
        visible_alias = "ts",
        about = "Build a date from a Unix timestamp",
        after_help = "EXAMPLES:\n\
            \x20 dateplus timestamp 1592231400\n\
            \x20 dateplus timestamp -86400 --tz America/New_York"
    )]
    Timestamp(TimestampArgs),

    /// Find the n-th weekday of a month.
    #[command(
        name = "nth-weekday",
        about = "Find the n-th weekday of a month",
        after_help = "EXAMPLES:\n\
            \x20 dateplus nth-weekday 1 monday\n\
            \x20 dateplus nth-weekday 5 friday --month 2 --year 2021   # clamps to the last Friday"
    )]
    NthWeekday(NthWeekdayArgs),

    /// Report which occurrence of its weekday a date is.
    #[command(
        about = "Report which occurrence of its weekday a date is",
        after_help = "EXAMPLES:\n\
            \x20 dateplus occurrence 2020-06-30   # 5th Tuesday"
    )]
    Occurrence(OccurrenceArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 dateplus completions bash > ~/.local/share/bash-completion/completions/dateplus\n\
            \x20 dateplus completions zsh  > ~/.zfunc/_dateplus\n\
            \x20 dateplus completions fish > ~/.config/fish/completions/dateplus.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the dateplus configuration.
    #[command(
        about = "Configuration inspection",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 dateplus config get defaults.timezone\n\
            \x20 dateplus config list\n\
            \x20 dateplus config path"
    )]
    Config(ConfigCommands),
}

// ── parse ─────────────────────────────────────────────────────────────────────

/// Arguments for `dateplus parse`.
#[derive(Debug, Args)]
pub struct ParseArgs {
    /// Free-text date, e.g. `2020-06-15`, `tomorrow noon`, `@1592231400`.
    #[arg(value_name = "TIME", help = "Date text to read")]
    pub time: String,

    /// Pattern used to print the result.
    #[arg(
        short = 'f',
        long = "format",
        value_name = "PATTERN",
        help = "Output pattern (default from output.pattern)"
    )]
    pub format: Option<String>,
}

// ── from-format ───────────────────────────────────────────────────────────────

/// Arguments for `dateplus from-format`.
#[derive(Debug, Args)]
pub struct FromFormatArgs {
    /// Letter pattern the input follows, e.g. `Y-m-d`.
    #[arg(value_name = "FORMAT", help = "Pattern the input follows")]
    pub format: String,

    /// Text to read.
    #[arg(value_name = "TIME", help = "Date text to read")]
    pub time: String,

    /// Accept input that does not render back to itself.
    #[arg(long = "no-validate", help = "Skip the render-back comparison")]
    pub no_validate: bool,
}

// ── from-parts ────────────────────────────────────────────────────────────────

/// Arguments for `dateplus from-parts`.
///
/// Missing parts default to the current year, January, the 1st and midnight.
#[derive(Debug, Args)]
pub struct FromPartsArgs {
    #[arg(long, allow_negative_numbers = true, help = "Year")]
    pub year: Option<i64>,

    #[arg(long, help = "Month (1-12)")]
    pub month: Option<i64>,

    #[arg(long, help = "Day of the month")]
    pub day: Option<i64>,

    #[arg(long, help = "Hour (0-23)")]
    pub hour: Option<i64>,

    #[arg(long, help = "Minute (0-59)")]
    pub minute: Option<i64>,

    #[arg(long, help = "Second (0-59)")]
    pub second: Option<i64>,
}

// ── timestamp ─────────────────────────────────────────────────────────────────

/// Arguments for `dateplus timestamp`.
#[derive(Debug, Args)]
pub struct TimestampArgs {
    /// Seconds since 1970-01-01T00:00:00Z; decimals are truncated.
    #[arg(
        value_name = "TS",
        allow_hyphen_values = true,
        help = "Unix timestamp"
    )]
    pub timestamp: String,
}

// ── nth-weekday ───────────────────────────────────────────────────────────────

/// Arguments for `dateplus nth-weekday`.
#[derive(Debug, Args)]
pub struct NthWeekdayArgs {
    /// 1 for the first, 2 for the second... Past the end clamps to the last.
    #[arg(value_name = "OCCURRENCE", help = "Which occurrence (1-based)")]
    pub occurrence: u32,

    /// Weekday name, full or abbreviated.
    #[arg(
        value_name = "WEEKDAY",
        value_parser = parse_weekday,
        help = "Weekday, e.g. monday or mon"
    )]
    pub weekday: Weekday,

    #[arg(long, help = "Month (1-12, default: current)")]
    pub month: Option<u32>,

    #[arg(long, help = "Year (default: current)")]
    pub year: Option<i32>,
}

fn parse_weekday(value: &str) -> Result<Weekday, String> {
    value
        .parse::<Weekday>()
        .map_err(|_| format!("'{value}' is not a weekday name"))
}

// ── occurrence ────────────────────────────────────────────────────────────────

/// Arguments for `dateplus occurrence`.
#[derive(Debug, Args)]
pub struct OccurrenceArgs {
    #[arg(value_name = "TIME", help = "Date text to inspect")]
    pub time: String,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `dateplus completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `dateplus config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `defaults.timezone`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the default configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────
