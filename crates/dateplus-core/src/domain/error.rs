// ============================================================================
// domain/error.rs - HARD FAILURES OF THE DATE DOMAIN
// ============================================================================

use thiserror::Error;

/// Hard failures raised by the typed constructors.
///
/// Free-text input never produces one of these: it degrades into the error
/// list carried by [`crate::domain::DateValue`]. Timestamps, formats, part
/// arrays and occurrence lookups come from code the caller controls, so a
/// malformed one aborts construction immediately.
///
/// All errors are:
/// - Cloneable (so a caller can keep them next to the value they rejected)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DateError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    #[error("The timestamp must be numeric, got '{input}'")]
    NotNumeric { input: String },

    #[error("The array contains invalid values: {reason}")]
    InvalidParts { reason: String },

    #[error("Occurrence must be at least 1, got {occurrence}")]
    InvalidOccurrence { occurrence: u32 },

    #[error("Month must be between 1 and 12, got {month}")]
    InvalidMonth { month: u32 },

    #[error("Invalid interval specification '{spec}': {reason}")]
    InvalidInterval { spec: String, reason: String },

    // ========================================================================
    // Parse Errors
    // ========================================================================
    #[error("The date cannot be created from format '{format}': {reason}")]
    FormatUnparsable { format: String, reason: String },

    #[error("The created date does not match the input value: '{input}' was read back as '{rendered}'")]
    FormatMismatch { input: String, rendered: String },

    // ========================================================================
    // Range Errors
    // ========================================================================
    #[error("The timestamp {timestamp} is outside the supported range")]
    TimestampOutOfRange { timestamp: i64 },

    #[error("The date could not be resolved: {}", errors.join("; "))]
    Unresolved { errors: Vec<String> },
}

impl DateError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::NotNumeric { input } => vec![
                format!("'{input}' is not a number"),
                "Pass seconds since 1970-01-01T00:00:00Z, e.g. 1592231400".into(),
            ],
            Self::InvalidParts { reason } => vec![
                format!("Details: {reason}"),
                "Year, month and day must form a real calendar date".into(),
                "Hours run 0-23, minutes and seconds 0-59".into(),
            ],
            Self::FormatUnparsable { format, .. } => vec![
                format!("The input must follow the pattern '{format}' exactly"),
                "Pattern letters: Y year, m month, d day, H hour, i minute, s second".into(),
            ],
            Self::FormatMismatch { input, rendered } => vec![
                format!("'{input}' was accepted but normalised to '{rendered}'"),
                "Check for truncated years or out-of-range fields".into(),
                "Disable the round-trip check if normalisation is intended".into(),
            ],
            Self::InvalidOccurrence { .. } => {
                vec!["Occurrences are counted from 1 (1st, 2nd, ...)".into()]
            }
            Self::InvalidMonth { .. } => vec!["Months are numbered 1 (January) to 12".into()],
            Self::InvalidInterval { .. } => vec![
                "Intervals use ISO 8601 durations, e.g. P1D, P2W, PT1H30M".into(),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NotNumeric { .. }
            | Self::InvalidParts { .. }
            | Self::InvalidOccurrence { .. }
            | Self::InvalidMonth { .. }
            | Self::InvalidInterval { .. } => ErrorCategory::Validation,
            Self::FormatUnparsable { .. } | Self::FormatMismatch { .. } => ErrorCategory::Parse,
            Self::TimestampOutOfRange { .. } | Self::Unresolved { .. } => ErrorCategory::Range,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Parse,
    Range,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_parts_message_keeps_historical_prefix() {
        let err = DateError::InvalidParts {
            reason: "2011-02-30 is not a calendar date".into(),
        };
        assert!(err.to_string().starts_with("The array contains invalid values"));
        assert_eq!(err.category(), ErrorCategory::Validation);
    }

    #[test]
    fn mismatch_suggestions_mention_both_values() {
        let err = DateError::FormatMismatch {
            input: "11".into(),
            rendered: "0011".into(),
        };
        let suggestions = err.suggestions();
        assert!(suggestions[0].contains("11"));
        assert!(suggestions[0].contains("0011"));
        assert_eq!(err.category(), ErrorCategory::Parse);
    }

    #[test]
    fn unresolved_joins_messages() {
        let err = DateError::Unresolved {
            errors: vec!["a".into(), "b".into()],
        };
        assert_eq!(err.to_string(), "The date could not be resolved: a; b");
    }
}
