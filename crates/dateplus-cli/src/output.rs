//! Output management and formatting.

use std::io::{self, IsTerminal};

use console::Term;
use dateplus_core::domain::DateValue;
use owo_colors::OwoColorize;
use serde::Serialize;

use crate::cli::global::{GlobalArgs, OutputFormat};
use crate::config::AppConfig;
use crate::error::{CliError, CliResult};

/// What a date command prints, in every output format.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateReport {
    pub input: String,
    pub formatted: String,
    pub timestamp: i64,
    pub timezone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub langcode: Option<String>,
    /// Set by `occurrence`: which occurrence of its weekday the date is.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occurrence: Option<u32>,
}

impl DateReport {
    /// Render `value` with `pattern`, or fail with its soft errors.
    pub fn new(input: &str, value: &mut DateValue, pattern: &str) -> CliResult<Self> {
        let invalid = |value: &DateValue| CliError::InvalidDate {
            input: input.to_owned(),
            errors: value.errors().to_vec(),
        };

        let formatted = value.format(pattern).ok_or_else(|| invalid(value))?;
        let timestamp = value.timestamp().ok_or_else(|| invalid(value))?;

        Ok(Self {
            input: input.to_owned(),
            formatted,
            timestamp,
            timezone: value.timezone().name().to_owned(),
            langcode: value.langcode().map(str::to_owned),
            occurrence: None,
        })
    }

    pub fn with_occurrence(mut self, occurrence: u32) -> Self {
        self.occurrence = Some(occurrence);
        self
    }
}

/// Manages CLI output based on configuration.
pub struct OutputManager {
    resolved_format: OutputFormat,
    quiet: bool,
    no_color: bool,
    term: Term,
}

impl OutputManager {
    /// Build an `OutputManager` from parsed CLI flags and loaded config.
    pub fn new(args: &GlobalArgs, config: &AppConfig) -> Self {
        // The flag wins unless left on auto; then the config decides.
        let requested = match args.output_format {
            OutputFormat::Auto => OutputFormat::from_config(&config.output.format),
            explicit => explicit,
        };
        let no_color = args.no_color || config.output.no_color;

        let resolved_format = match requested {
            OutputFormat::Auto if io::stdout().is_terminal() && !no_color => OutputFormat::Human,
            OutputFormat::Auto => OutputFormat::Plain,
            other => other,
        };

        Self {
            resolved_format,
            quiet: args.quiet,
            no_color: no_color || resolved_format == OutputFormat::Plain,
            term: Term::stdout(),
        }
    }

    // ── Public write methods ───────────────────────────────────────────────

    /// Print the result of a date command.
    ///
    /// Results are the point of every invocation, so quiet mode does not
    /// hide them; it only drops the human decorations.
    pub fn date(&self, report: &DateReport) -> CliResult<()> {
        match self.resolved_format {
            OutputFormat::Json => self.json(report)?,
            OutputFormat::Human if !self.quiet => {
                let headline = if self.no_color {
                    report.formatted.clone()
                } else {
                    report.formatted.cyan().bold().to_string()
                };
                self.term.write_line(&headline)?;

                let mut detail = format!("{}  @{}", report.timezone, report.timestamp);
                if let Some(langcode) = &report.langcode {
                    detail.push_str(&format!("  [{langcode}]"));
                }
                if let Some(n) = report.occurrence {
                    detail.push_str(&format!("  occurrence {n}"));
                }
                self.term.write_line(&self.dim(&detail))?;
            }
            _ => {
                let line = match report.occurrence {
                    Some(n) => format!("{}\t{n}", report.formatted),
                    None => report.formatted.clone(),
                };
                self.term.write_line(&line)?;
            }
        }
        Ok(())
    }

    /// Pretty-printed JSON on stdout.
    pub fn json<T: Serialize + ?Sized>(&self, value: &T) -> CliResult<()> {
        let text = serde_json::to_string_pretty(value).map_err(|e| CliError::IoError {
            message: format!("Failed to serialise output: {e}"),
            source: io::Error::other(e),
        })?;
        self.term.write_line(&text)?;
        Ok(())
    }

    /// Generic message; suppressed in quiet mode.
    pub fn print(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.term.write_line(msg)
    }

    /// Warning indicator on stderr: `⚠ <msg>`. Dropped in JSON mode.
    pub fn warning(&self, msg: &str) -> io::Result<()> {
        if self.quiet || self.resolved_format == OutputFormat::Json {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{26a0} {msg}") // ⚠
        } else {
            format!("{} {}", "\u{26a0}".yellow().bold(), msg.yellow())
        };
        Term::stderr().write_line(&line)
    }

    /// Bold cyan header line.
    pub fn header(&self, text: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            text.to_owned()
        } else {
            text.cyan().bold().to_string()
        };
        self.term.write_line(&line)
    }

    fn dim(&self, text: &str) -> String {
        if self.no_color {
            text.to_owned()
        } else {
            text.dimmed().to_string()
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    /// `true` if ANSI colours are enabled.
    pub fn supports_color(&self) -> bool {
        !self.no_color
    }

    /// The resolved (non-Auto) output format.
    pub fn format(&self) -> OutputFormat {
        self.resolved_format
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
