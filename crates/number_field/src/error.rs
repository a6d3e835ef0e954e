//! Configuration errors.
//!
//! Validation failures are not errors: they are [`ValidationResult`] values
//! that end up as presentation state and status events. The only thing a
//! field refuses outright is a configuration it cannot honor.
//!
//! [`ValidationResult`]: crate::ValidationResult

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Rejected configuration. The field is left exactly as it was.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("step must be a positive finite number, got {step}")]
    InvalidStep { step: f64 },

    #[error("{name} must be a number, got NaN")]
    NotANumber { name: &'static str },

    #[error("{name} {value} is not representable by this field type")]
    OutOfDomain { name: &'static str, value: f64 },

    #[error("invalid field configuration: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to read field configuration {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
