//! Invalid/error-message presentation and validation modes.

use crate::validator::ValidationResult;
use core_types::ValidationMode;

/// What the remote surface shows about the field's validity.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Presentation {
    pub invalid: bool,
    pub error_message: String,
}

/// Owns the presentation state and decides whether validation results are
/// allowed to change it.
///
/// In manual mode the presentation belongs to an external caller: results
/// are still computed by the engine for the status feed, but `apply` ignores
/// them. Toggling the mode never touches the presentation and never
/// re-validates on its own.
#[derive(Clone, Debug, Default)]
pub struct ValidationStateController {
    mode: ValidationMode,
    presentation: Presentation,
}

impl ValidationStateController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> ValidationMode {
        self.mode
    }

    pub fn is_manual(&self) -> bool {
        self.mode == ValidationMode::Manual
    }

    pub fn presentation(&self) -> &Presentation {
        &self.presentation
    }

    pub fn is_invalid(&self) -> bool {
        self.presentation.invalid
    }

    pub fn error_message(&self) -> &str {
        &self.presentation.error_message
    }

    pub fn set_manual_validation(&mut self, enabled: bool) {
        self.mode = if enabled {
            ValidationMode::Manual
        } else {
            ValidationMode::Automatic
        };
    }

    /// Apply a validation result to the presentation.
    ///
    /// Returns `true` if the presentation changed. Always `false` in manual
    /// mode.
    pub fn apply(&mut self, result: &ValidationResult) -> bool {
        if self.is_manual() {
            return false;
        }
        let next = Presentation {
            invalid: result.is_error(),
            error_message: result.message().to_string(),
        };
        if next == self.presentation {
            return false;
        }
        self.presentation = next;
        true
    }

    /// External write of the invalid flag. Returns `true` if it changed.
    pub fn set_invalid(&mut self, invalid: bool) -> bool {
        let changed = self.presentation.invalid != invalid;
        self.presentation.invalid = invalid;
        changed
    }

    /// External write of the error message. Returns `true` if it changed.
    pub fn set_error_message(&mut self, message: impl Into<String>) -> bool {
        let message = message.into();
        let changed = self.presentation.error_message != message;
        self.presentation.error_message = message;
        changed
    }
}
