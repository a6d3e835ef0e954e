use serde::{Deserialize, Serialize};

pub type FieldId = u64;

/// Who owns the invalid/error-message presentation of a field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValidationMode {
    #[default]
    Automatic,
    /// Presentation is written only by an external caller.
    Manual,
}

/// Which remote events push the raw text through the sync pipeline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValueChangeMode {
    Eager,
    /// Client debounces input events by the given interval in milliseconds.
    Lazy(u32),
    /// Client throttles input events by the given interval in milliseconds.
    Timeout(u32),
    #[default]
    OnChange,
    OnBlur,
}

impl ValueChangeMode {
    pub fn syncs_on_input(self) -> bool {
        matches!(self, Self::Eager | Self::Lazy(_) | Self::Timeout(_))
    }

    pub fn syncs_on_change(self) -> bool {
        matches!(self, Self::OnChange)
    }

    pub fn syncs_on_blur(self) -> bool {
        matches!(self, Self::OnBlur)
    }

    /// Client-side timeout mirrored to the remote surface, if any.
    pub fn timeout_ms(self) -> Option<u32> {
        match self {
            Self::Lazy(ms) | Self::Timeout(ms) => Some(ms),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_input_driven_modes_sync_on_input() {
        assert!(ValueChangeMode::Eager.syncs_on_input());
        assert!(ValueChangeMode::Lazy(300).syncs_on_input());
        assert!(ValueChangeMode::Timeout(400).syncs_on_input());
        assert!(!ValueChangeMode::OnChange.syncs_on_input());
        assert!(!ValueChangeMode::OnBlur.syncs_on_input());
    }

    #[test]
    fn timeout_is_only_reported_for_debounced_modes() {
        assert_eq!(ValueChangeMode::Lazy(250).timeout_ms(), Some(250));
        assert_eq!(ValueChangeMode::Eager.timeout_ms(), None);
        assert_eq!(ValueChangeMode::default(), ValueChangeMode::OnChange);
    }
}
