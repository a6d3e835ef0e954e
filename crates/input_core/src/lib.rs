//! # input_core
//!
//! UI-agnostic value slot for number-field inputs.
//!
//! This crate models what a single field holds between updates:
//! - [`FieldValue`]: typed value, raw text and the unparsable flag
//! - [`ValueSlot`]: the three states a field can be in
//! - [`Transition`]: what the slot looked like right before a change
//!
//! ## Design Principles
//!
//! Parsing, validation and the property channel live elsewhere. The slot only
//! enforces its own invariant: text the backend rejected is tracked
//! separately from "nothing entered", and it never leaks out as a typed value.

mod state;
mod text;

pub use state::{FieldValue, Transition, ValueSlot};
pub use text::{is_blank, normalize_raw_text};
