//! # number_field
//!
//! Backend core of remotely rendered number inputs.
//!
//! A field receives raw text from a remote UI surface, reconciles it with an
//! authoritative typed value, runs an ordered constraint pipeline and reports
//! the outcome twice: as presentation state pushed back to the surface, and
//! as a validation-status feed for binding consumers.
//!
//! Components, leaf first:
//! - [`NumericDomain`]: parse/format pair and bounds ([`FloatDomain`], [`IntegerDomain`])
//! - [`ConstraintSet`]: required/min/max/step
//! - [`ConstraintValidator`]: first-failure pipeline, bad input first
//! - [`ValidationStateController`]: presentation, automatic vs. manual mode
//! - [`FieldSyncEngine`]: value-slot transitions and event decisions
//! - [`NumberField`]: shared handle that dispatches events to listeners
//!
//! ```
//! use number_field::{FloatField, NumberFieldI18n};
//!
//! let field = FloatField::new(1);
//! field.set_min(2.0).unwrap();
//! field.set_step(2.0).unwrap();
//! field.set_i18n(NumberFieldI18n::new().with_step_error_message("even only"));
//!
//! field.sync_from_remote("5");
//! assert!(field.is_invalid());
//! assert_eq!(field.error_message(), "even only");
//!
//! field.sync_from_remote("6");
//! assert!(!field.is_invalid());
//! ```

mod coercion;
mod config;
mod constraints;
mod controller;
mod engine;
mod error;
mod field;
mod i18n;
mod listeners;
mod remote;
mod validator;

pub use coercion::{FloatDomain, IntegerDomain, NumericDomain};
pub use config::{FieldConfig, FieldKind};
pub use constraints::ConstraintSet;
pub use controller::{Presentation, ValidationStateController};
pub use engine::{Events, FieldEvent, FieldSyncEngine, ValidationStatusEvent, ValueChangeEvent};
pub use error::{ConfigError, Result};
pub use field::{FloatField, IntegerField, NumberField};
pub use i18n::{MessageKind, NumberFieldI18n};
pub use listeners::{Listeners, Registration};
pub use validator::{ConstraintValidator, ValidationOrigin, ValidationResult, is_valid_by_step};

pub use core_types::{FieldId, ValidationMode, ValueChangeMode};
pub use input_core::ValueSlot;
