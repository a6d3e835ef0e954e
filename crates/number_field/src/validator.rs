//! Ordered constraint pipeline.
//!
//! The pipeline is a pure function of the candidate value, the unparsable
//! flag, the constraint set and the i18n messages. It stops at the first
//! failing constraint, so a run yields exactly one result:
//!
//! 1. bad input (overrides everything else)
//! 2. required, unless a binding consumer is asking
//! 3. max
//! 4. min
//! 5. step, only once configured, in exact decimal arithmetic

use crate::coercion::NumericDomain;
use crate::constraints::ConstraintSet;
use crate::i18n::{MessageKind, NumberFieldI18n};
use bigdecimal::{BigDecimal, Zero};
use std::str::FromStr;

/// Outcome of one validation run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ValidationResult {
    Ok,
    Error { kind: MessageKind, message: String },
}

impl ValidationResult {
    fn error(kind: MessageKind, i18n: Option<&NumberFieldI18n>) -> Self {
        let message = i18n.map(|i| i.message(kind)).unwrap_or("").to_string();
        Self::Error { kind, message }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }

    pub fn is_error(&self) -> bool {
        !self.is_ok()
    }

    pub fn kind(&self) -> Option<MessageKind> {
        match self {
            Self::Ok => None,
            Self::Error { kind, .. } => Some(*kind),
        }
    }

    /// Error message, `""` for success.
    pub fn message(&self) -> &str {
        match self {
            Self::Ok => "",
            Self::Error { message, .. } => message,
        }
    }
}

/// Who asked for validation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ValidationOrigin {
    /// The field validating itself after an update.
    #[default]
    Field,
    /// An external binding consumer. It runs its own required check, so the
    /// pipeline skips it to avoid reporting the same problem twice.
    Binding,
}

pub struct ConstraintValidator<'a> {
    constraints: &'a ConstraintSet,
    i18n: Option<&'a NumberFieldI18n>,
}

impl<'a> ConstraintValidator<'a> {
    pub fn new(constraints: &'a ConstraintSet, i18n: Option<&'a NumberFieldI18n>) -> Self {
        Self { constraints, i18n }
    }

    pub fn validate<D: NumericDomain>(
        &self,
        value: Option<D::Value>,
        unparsable: bool,
        origin: ValidationOrigin,
    ) -> ValidationResult {
        let result = self.run::<D>(value, unparsable, origin);
        log::debug!(
            target: "numfield.validate",
            "value={value:?} unparsable={unparsable} origin={origin:?} -> {:?}",
            result.kind()
        );
        result
    }

    fn run<D: NumericDomain>(
        &self,
        value: Option<D::Value>,
        unparsable: bool,
        origin: ValidationOrigin,
    ) -> ValidationResult {
        if unparsable {
            return ValidationResult::error(MessageKind::BadInput, self.i18n);
        }

        if origin == ValidationOrigin::Field && self.constraints.required() && value.is_none() {
            return ValidationResult::error(MessageKind::Required, self.i18n);
        }

        let Some(value) = value else {
            return ValidationResult::Ok;
        };
        let number = D::to_f64(value);

        if let Some(max) = self.constraints.effective_max()
            && number > max
        {
            return ValidationResult::error(MessageKind::Max, self.i18n);
        }

        if let Some(min) = self.constraints.effective_min()
            && number < min
        {
            return ValidationResult::error(MessageKind::Min, self.i18n);
        }

        if !is_valid_by_step::<D>(value, self.constraints) {
            return ValidationResult::error(MessageKind::Step, self.i18n);
        }

        ValidationResult::Ok
    }
}

/// `(value - basis) % step == 0`, computed on decimal literals.
///
/// Binary floating point cannot represent most decimal steps exactly
/// (`0.3 % 0.1 != 0` in `f64`), so both operands go through their shortest
/// decimal spelling first.
pub fn is_valid_by_step<D: NumericDomain>(value: D::Value, constraints: &ConstraintSet) -> bool {
    if !constraints.step_set_by_user() || constraints.step() == 0.0 {
        return true;
    }

    let (Some(value), Some(basis), Some(step)) = (
        decimal(&D::decimal_literal(value)),
        decimal(&format!("{}", constraints.step_basis())),
        decimal(&format!("{}", constraints.step())),
    ) else {
        log::warn!(
            target: "numfield.validate",
            "step check skipped: value {value:?} or step {} has no decimal form",
            constraints.step()
        );
        return true;
    };

    ((value - basis) % step).is_zero()
}

fn decimal(literal: &str) -> Option<BigDecimal> {
    BigDecimal::from_str(literal).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coercion::{FloatDomain, IntegerDomain};

    fn i18n() -> NumberFieldI18n {
        NumberFieldI18n::new()
            .with_bad_input_error_message("bad")
            .with_required_error_message("required")
            .with_max_error_message("max")
            .with_min_error_message("min")
            .with_step_error_message("step")
    }

    fn check(c: &ConstraintSet, value: Option<f64>, unparsable: bool) -> ValidationResult {
        let i18n = i18n();
        ConstraintValidator::new(c, Some(&i18n)).validate::<FloatDomain>(
            value,
            unparsable,
            ValidationOrigin::Field,
        )
    }

    fn constraints() -> ConstraintSet {
        ConstraintSet::for_domain::<FloatDomain>()
    }

    #[test]
    fn unconstrained_values_pass() {
        let c = constraints();
        assert_eq!(check(&c, None, false), ValidationResult::Ok);
        assert_eq!(check(&c, Some(-1e300), false), ValidationResult::Ok);
        // Implicit step of 1 is never enforced.
        assert_eq!(check(&c, Some(0.5), false), ValidationResult::Ok);
    }

    #[test]
    fn bad_input_overrides_every_other_constraint() {
        let mut c = constraints();
        c.set_required(true);
        c.set_max(1.0).unwrap();
        c.set_step(3.0).unwrap();

        let result = check(&c, None, true);
        assert_eq!(result.kind(), Some(MessageKind::BadInput));
        assert_eq!(result.message(), "bad");
    }

    #[test]
    fn required_is_skipped_for_binding_consumers() {
        let mut c = constraints();
        c.set_required(true);
        let i18n = i18n();
        let validator = ConstraintValidator::new(&c, Some(&i18n));

        let own = validator.validate::<FloatDomain>(None, false, ValidationOrigin::Field);
        assert_eq!(own.kind(), Some(MessageKind::Required));

        let bound = validator.validate::<FloatDomain>(None, false, ValidationOrigin::Binding);
        assert_eq!(bound, ValidationResult::Ok);
    }

    #[test]
    fn max_is_checked_before_min() {
        let mut c = constraints();
        // Inverted range: every value violates something, max wins.
        c.set_min(10.0).unwrap();
        c.set_max(0.0).unwrap();
        assert_eq!(check(&c, Some(5.0), false).kind(), Some(MessageKind::Max));
        assert_eq!(check(&c, Some(-5.0), false).kind(), Some(MessageKind::Min));
    }

    #[test]
    fn bounds_are_inclusive() {
        let mut c = constraints();
        c.set_min(1.0).unwrap();
        c.set_max(2.0).unwrap();
        assert!(check(&c, Some(1.0), false).is_ok());
        assert!(check(&c, Some(2.0), false).is_ok());
        assert_eq!(check(&c, Some(2.0000001), false).message(), "max");
    }

    #[test]
    fn step_uses_min_as_basis() {
        let mut c = constraints();
        c.set_min(2.0).unwrap();
        c.set_step(2.0).unwrap();
        assert!(check(&c, Some(6.0), false).is_ok());
        assert_eq!(check(&c, Some(5.0), false).kind(), Some(MessageKind::Step));
    }

    #[test]
    fn step_basis_ignores_implicit_min() {
        let mut c = constraints();
        c.set_step(0.5).unwrap();
        assert!(check(&c, Some(-1.5), false).is_ok());
        assert!(check(&c, Some(3.0), false).is_ok());
        assert_eq!(check(&c, Some(0.25), false).kind(), Some(MessageKind::Step));
    }

    #[test]
    fn decimal_steps_have_no_float_false_negatives() {
        let mut c = constraints();
        c.set_step(0.1).unwrap();
        for k in 0..200 {
            let literal = format!("{}.{}", k / 10, k % 10);
            let value = FloatDomain::parse(&literal).unwrap();
            assert!(check(&c, Some(value), false).is_ok(), "{literal}");
        }
        assert!(check(&c, Some(0.3), false).is_ok());
        assert!(check(&c, Some(0.15), false).is_error());
    }

    #[test]
    fn decimal_basis_and_step() {
        let mut c = constraints();
        c.set_min(0.2).unwrap();
        c.set_step(0.3).unwrap();
        assert!(check(&c, Some(0.2), false).is_ok());
        assert!(check(&c, Some(1.1), false).is_ok());
        assert!(check(&c, Some(1.0), false).is_error());
    }

    #[test]
    fn integer_domain_step() {
        let mut c = ConstraintSet::for_domain::<IntegerDomain>();
        c.set_min(-3.0).unwrap();
        c.set_step(5.0).unwrap();
        assert!(is_valid_by_step::<IntegerDomain>(7, &c));
        assert!(is_valid_by_step::<IntegerDomain>(-3, &c));
        assert!(!is_valid_by_step::<IntegerDomain>(0, &c));
    }

    #[test]
    fn missing_i18n_degrades_to_empty_messages() {
        let mut c = constraints();
        c.set_required(true);
        let validator = ConstraintValidator::new(&c, None);
        let result = validator.validate::<FloatDomain>(None, false, ValidationOrigin::Field);
        assert_eq!(
            result,
            ValidationResult::Error {
                kind: MessageKind::Required,
                message: String::new()
            }
        );
    }

    #[test]
    fn validation_is_deterministic() {
        let mut c = constraints();
        c.set_step(0.7).unwrap();
        let first = check(&c, Some(2.1), false);
        for _ in 0..10 {
            assert_eq!(check(&c, Some(2.1), false), first);
        }
        assert!(first.is_ok());
    }
}
