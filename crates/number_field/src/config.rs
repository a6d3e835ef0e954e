//! Declarative field configuration loaded from TOML.
//!
//! ```toml
//! kind = "integer"
//! min = 2
//! step = 2
//! required = true
//! value-change-mode = { lazy = 300 }
//!
//! [i18n]
//! step-error-message = "Use an even number"
//! ```

use crate::error::{ConfigError, Result};
use crate::i18n::NumberFieldI18n;
use core_types::ValueChangeMode;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldKind {
    #[default]
    Float,
    Integer,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct FieldConfig {
    pub kind: FieldKind,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub step: Option<f64>,
    pub required: bool,
    pub manual_validation: bool,
    pub step_buttons_visible: bool,
    pub value_change_mode: ValueChangeMode,
    pub i18n: Option<NumberFieldI18n>,
}

impl FieldConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::MessageKind;

    #[test]
    fn empty_config_is_a_plain_float_field() {
        let config = FieldConfig::from_toml_str("").unwrap();
        assert_eq!(config, FieldConfig::default());
        assert_eq!(config.kind, FieldKind::Float);
        assert_eq!(config.value_change_mode, ValueChangeMode::OnChange);
    }

    #[test]
    fn parses_every_setting() {
        let config = FieldConfig::from_toml_str(
            r#"
            kind = "integer"
            min = 2
            max = 40
            step = 2
            required = true
            manual-validation = true
            step-buttons-visible = true
            value-change-mode = { lazy = 300 }

            [i18n]
            step-error-message = "even numbers only"
            "#,
        )
        .unwrap();

        assert_eq!(config.kind, FieldKind::Integer);
        assert_eq!(config.min, Some(2.0));
        assert_eq!(config.max, Some(40.0));
        assert_eq!(config.step, Some(2.0));
        assert!(config.required);
        assert!(config.manual_validation);
        assert!(config.step_buttons_visible);
        assert_eq!(config.value_change_mode, ValueChangeMode::Lazy(300));
        let i18n = config.i18n.unwrap();
        assert_eq!(i18n.message(MessageKind::Step), "even numbers only");
    }

    #[test]
    fn unit_value_change_modes_are_strings() {
        let config = FieldConfig::from_toml_str(r#"value-change-mode = "on-blur""#).unwrap();
        assert_eq!(config.value_change_mode, ValueChangeMode::OnBlur);
    }

    #[test]
    fn unknown_keys_fail() {
        let err = FieldConfig::from_toml_str("minimum = 3").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = FieldConfig::load(Path::new("/nonexistent/field.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/field.toml"));
    }
}
