//! Error-message lookup.

use serde::{Deserialize, Serialize};

/// Which constraint a validation failure comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MessageKind {
    BadInput,
    Required,
    Max,
    Min,
    Step,
}

/// Localized error messages. Unset messages read as `""`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct NumberFieldI18n {
    pub bad_input_error_message: Option<String>,
    pub required_error_message: Option<String>,
    pub max_error_message: Option<String>,
    pub min_error_message: Option<String>,
    pub step_error_message: Option<String>,
}

impl NumberFieldI18n {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    pub fn message(&self, kind: MessageKind) -> &str {
        let slot = match kind {
            MessageKind::BadInput => &self.bad_input_error_message,
            MessageKind::Required => &self.required_error_message,
            MessageKind::Max => &self.max_error_message,
            MessageKind::Min => &self.min_error_message,
            MessageKind::Step => &self.step_error_message,
        };
        slot.as_deref().unwrap_or("")
    }

    pub fn with_bad_input_error_message(mut self, message: impl Into<String>) -> Self {
        self.bad_input_error_message = Some(message.into());
        self
    }

    pub fn with_required_error_message(mut self, message: impl Into<String>) -> Self {
        self.required_error_message = Some(message.into());
        self
    }

    pub fn with_max_error_message(mut self, message: impl Into<String>) -> Self {
        self.max_error_message = Some(message.into());
        self
    }

    pub fn with_min_error_message(mut self, message: impl Into<String>) -> Self {
        self.min_error_message = Some(message.into());
        self
    }

    pub fn with_step_error_message(mut self, message: impl Into<String>) -> Self {
        self.step_error_message = Some(message.into());
        self
    }
}
