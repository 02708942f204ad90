use serde::{Deserialize, Serialize};

/// Construction options shared by every [`DateValue`](crate::domain::DateValue)
/// constructor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Locale tag carried along for downstream formatting.
    pub langcode: Option<String>,
    /// Reject format-parsed input that does not render back to itself.
    pub validate_format: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            langcode: None,
            validate_format: true,
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_langcode(mut self, langcode: impl Into<String>) -> Self {
        let langcode = langcode.into();
        self.langcode = (!langcode.trim().is_empty()).then_some(langcode);
        self
    }

    pub fn with_validate_format(mut self, validate: bool) -> Self {
        self.validate_format = validate;
        self
    }
}
