//! Text <-> typed value coercion for numeric fields.
//!
//! A field is generic over a [`NumericDomain`], which bundles the parser,
//! the formatter and the bounds of the underlying number type. Float and
//! integer fields share every other piece of the pipeline.

use std::fmt::Debug;

/// Parse/format pair plus the bounds of a numeric type.
///
/// `parse` must reject anything the type cannot hold exactly, including
/// literals that overflow it, even when the remote surface's looser number
/// parsing accepted them. `format` must produce text that `parse` maps back
/// to an equal value.
pub trait NumericDomain: 'static {
    type Value: Copy + PartialEq + PartialOrd + Debug + 'static;

    /// Smallest representable value; the default `min` constraint.
    const ABSOLUTE_MIN: f64;
    /// Largest representable value; the default `max` constraint.
    const ABSOLUTE_MAX: f64;

    fn parse(text: &str) -> Option<Self::Value>;

    fn format(value: Self::Value) -> String;

    fn to_f64(value: Self::Value) -> f64;

    /// Checked conversion used when constraints come from configuration.
    fn from_f64(value: f64) -> Option<Self::Value>;

    /// Plain decimal spelling (no exponent) used for exact step arithmetic.
    fn decimal_literal(value: Self::Value) -> String {
        Self::format(value)
    }
}

/// Double-precision field. Unbounded, so min/max are unset by default.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FloatDomain;

impl NumericDomain for FloatDomain {
    type Value = f64;

    const ABSOLUTE_MIN: f64 = f64::NEG_INFINITY;
    const ABSOLUTE_MAX: f64 = f64::INFINITY;

    fn parse(text: &str) -> Option<f64> {
        // Rust also accepts "inf" and "NaN"; neither is a number a user can
        // type into a number input, and overflow lands on infinity.
        text.parse::<f64>().ok().filter(|v| v.is_finite())
    }

    fn format(value: f64) -> String {
        // Shortest round-trip form, never in exponent notation.
        format!("{value}")
    }

    fn to_f64(value: f64) -> f64 {
        value
    }

    fn from_f64(value: f64) -> Option<f64> {
        (!value.is_nan()).then_some(value)
    }
}

/// 32-bit signed integer field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IntegerDomain;

impl NumericDomain for IntegerDomain {
    type Value = i32;

    const ABSOLUTE_MIN: f64 = i32::MIN as f64;
    const ABSOLUTE_MAX: f64 = i32::MAX as f64;

    fn parse(text: &str) -> Option<i32> {
        text.parse::<i32>().ok()
    }

    fn format(value: i32) -> String {
        value.to_string()
    }

    fn to_f64(value: i32) -> f64 {
        f64::from(value)
    }

    fn from_f64(value: f64) -> Option<i32> {
        if value.fract() != 0.0 || value < Self::ABSOLUTE_MIN || value > Self::ABSOLUTE_MAX {
            return None;
        }
        Some(value as i32)
    }
}
