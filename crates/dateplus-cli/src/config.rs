//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate only ever sees the [`Settings`]
//! and zone derived from it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. `DATEPLUS_*` environment variables, `__` between sections
//!    (`DATEPLUS_DEFAULTS__TIMEZONE=Europe/Paris`)
//! 3. Config file (`--config`, else the platform path, if it exists)
//! 4. Built-in defaults (always present)

use std::path::PathBuf;

use anyhow::Context;
use config::{Config, Environment, File, FileFormat};
use dateplus_core::domain::{DateValue, Settings};
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Defaults applied to every date the CLI builds.
    pub defaults: Defaults,
    /// Output settings.
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    /// IANA zone name; empty means UTC.
    pub timezone: String,
    pub langcode: Option<String>,
    pub validate_format: bool,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            timezone: "UTC".into(),
            langcode: None,
            validate_format: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    pub format: String,
    /// Pattern used to print dates when a command has no `--format`.
    pub pattern: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            format: "auto".into(),
            pattern: DateValue::FORMAT.into(),
        }
    }
}

impl AppConfig {
    /// Load configuration, layering defaults, file and environment.
    ///
    /// An explicit `config_file` must exist; the default location is only
    /// read when present.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let defaults = Config::try_from(&Self::default())
            .context("Failed to build default configuration")?;

        let mut builder = Config::builder().add_source(defaults);

        builder = match config_file {
            Some(path) => {
                if !path.exists() {
                    anyhow::bail!("Config file not found: {}", path.display());
                }
                builder.add_source(File::from(path.as_path()).format(FileFormat::Toml))
            }
            None => builder.add_source(
                File::from(Self::config_path().as_path())
                    .format(FileFormat::Toml)
                    .required(false),
            ),
        };

        let config = builder
            .add_source(
                Environment::with_prefix("DATEPLUS")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to read configuration")?;

        config
            .try_deserialize()
            .context("Configuration has invalid values")
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.dateplus.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "dateplus", "dateplus")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".dateplus.toml"))
    }

    /// Construction settings for the core services.
    pub fn settings(&self) -> Settings {
        let settings = Settings::new().with_validate_format(self.defaults.validate_format);
        match &self.defaults.langcode {
            Some(langcode) => settings.with_langcode(langcode.as_str()),
            None => settings,
        }
    }

    /// Zone name to use: the `--tz` flag wins over the configured default.
    pub fn timezone(&self, flag: Option<&str>) -> String {
        flag.unwrap_or(&self.defaults.timezone).to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_timezone_is_utc() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.defaults.timezone, "UTC");
        assert!(cfg.defaults.validate_format);
    }

    #[test]
    fn default_pattern_is_canonical_format() {
        assert_eq!(AppConfig::default().output.pattern, "Y-m-d H:i:s");
    }

    #[test]
    fn explicit_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[defaults]\ntimezone = \"Europe/Paris\"\nvalidate_format = false\n\n[output]\npattern = \"d/m/Y\""
        )
        .unwrap();

        let cfg = AppConfig::load(Some(&file.path().to_path_buf())).unwrap();
        assert_eq!(cfg.defaults.timezone, "Europe/Paris");
        assert!(!cfg.defaults.validate_format);
        assert_eq!(cfg.output.pattern, "d/m/Y");
        // untouched keys keep their defaults
        assert!(!cfg.output.no_color);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let path = PathBuf::from("/definitely/not/here/dateplus.toml");
        assert!(AppConfig::load(Some(&path)).is_err());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[defaults\ntimezone = ").unwrap();
        assert!(AppConfig::load(Some(&file.path().to_path_buf())).is_err());
    }

    #[test]
    fn settings_carry_langcode_and_validation() {
        let mut cfg = AppConfig::default();
        cfg.defaults.langcode = Some("fr".into());
        cfg.defaults.validate_format = false;

        let settings = cfg.settings();
        assert_eq!(settings.langcode.as_deref(), Some("fr"));
        assert!(!settings.validate_format);
    }

    #[test]
    fn tz_flag_wins() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.timezone(Some("Asia/Tokyo")), "Asia/Tokyo");
        assert_eq!(cfg.timezone(None), "UTC");
    }

    #[test]
    fn config_path_is_not_empty() {
        let p = AppConfig::config_path();
        assert!(!p.as_os_str().is_empty());
    }
}
