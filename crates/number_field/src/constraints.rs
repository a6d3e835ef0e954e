//! Active validation constraints of a field.

use crate::coercion::NumericDomain;
use crate::error::{ConfigError, Result};

/// Required/min/max/step constraints plus whether min and step were
/// configured explicitly.
///
/// `min` and `max` start at the domain bounds, which are not meaningful
/// limits. Step starts at 1 and is ignored until set, matching the remote
/// widget, which never enforces an implicit step either.
#[derive(Clone, Debug, PartialEq)]
pub struct ConstraintSet {
    required: bool,
    min: f64,
    max: f64,
    step: f64,
    min_set_by_user: bool,
    step_set_by_user: bool,
    domain_min: f64,
    domain_max: f64,
}

impl ConstraintSet {
    pub fn for_domain<D: NumericDomain>() -> Self {
        Self {
            required: false,
            min: D::ABSOLUTE_MIN,
            max: D::ABSOLUTE_MAX,
            step: 1.0,
            min_set_by_user: false,
            step_set_by_user: false,
            domain_min: D::ABSOLUTE_MIN,
            domain_max: D::ABSOLUTE_MAX,
        }
    }

    pub fn required(&self) -> bool {
        self.required
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn min_set_by_user(&self) -> bool {
        self.min_set_by_user
    }

    pub fn step_set_by_user(&self) -> bool {
        self.step_set_by_user
    }

    /// The upper bound, or `None` while it is still the domain bound.
    pub fn effective_max(&self) -> Option<f64> {
        (self.max != self.domain_max).then_some(self.max)
    }

    /// The lower bound, or `None` while it is still the domain bound.
    pub fn effective_min(&self) -> Option<f64> {
        (self.min != self.domain_min).then_some(self.min)
    }

    /// Origin of the step progression.
    pub fn step_basis(&self) -> f64 {
        if self.min_set_by_user && self.min.is_finite() {
            self.min
        } else {
            0.0
        }
    }

    pub fn set_required(&mut self, required: bool) {
        self.required = required;
    }

    pub fn set_min(&mut self, min: f64) -> Result<()> {
        if min.is_nan() {
            return Err(ConfigError::NotANumber { name: "min" });
        }
        self.min = min;
        self.min_set_by_user = true;
        Ok(())
    }

    pub fn set_max(&mut self, max: f64) -> Result<()> {
        if max.is_nan() {
            return Err(ConfigError::NotANumber { name: "max" });
        }
        self.max = max;
        Ok(())
    }

    pub fn set_step(&mut self, step: f64) -> Result<()> {
        if step.is_nan() || step.is_infinite() || step <= 0.0 {
            return Err(ConfigError::InvalidStep { step });
        }
        self.step = step;
        self.step_set_by_user = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coercion::{FloatDomain, IntegerDomain};

    #[test]
    fn defaults_follow_the_domain() {
        let float = ConstraintSet::for_domain::<FloatDomain>();
        assert_eq!(float.min(), f64::NEG_INFINITY);
        assert_eq!(float.max(), f64::INFINITY);
        assert_eq!(float.step(), 1.0);
        assert_eq!(float.effective_min(), None);
        assert_eq!(float.effective_max(), None);
        assert!(!float.step_set_by_user());

        let int = ConstraintSet::for_domain::<IntegerDomain>();
        assert_eq!(int.max(), 2147483647.0);
        assert_eq!(int.effective_max(), None);
    }

    #[test]
    fn step_basis_uses_min_only_when_set_and_finite() {
        let mut c = ConstraintSet::for_domain::<FloatDomain>();
        assert_eq!(c.step_basis(), 0.0);

        c.set_min(2.0).unwrap();
        assert_eq!(c.step_basis(), 2.0);

        c.set_min(f64::NEG_INFINITY).unwrap();
        assert!(c.min_set_by_user());
        assert_eq!(c.step_basis(), 0.0);
    }

    #[test]
    fn rejected_step_leaves_state_untouched() {
        let mut c = ConstraintSet::for_domain::<FloatDomain>();
        c.set_step(0.5).unwrap();
        let before = c.clone();

        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(c.set_step(bad), Err(ConfigError::InvalidStep { .. })));
        }
        assert_eq!(c, before);
    }

    #[test]
    fn nan_bounds_are_rejected() {
        let mut c = ConstraintSet::for_domain::<FloatDomain>();
        assert!(matches!(
            c.set_min(f64::NAN),
            Err(ConfigError::NotANumber { name: "min" })
        ));
        assert!(matches!(
            c.set_max(f64::NAN),
            Err(ConfigError::NotANumber { name: "max" })
        ));
        assert!(!c.min_set_by_user());
        assert_eq!(c.effective_max(), None);
    }

    #[test]
    fn explicit_bounds_become_effective() {
        let mut c = ConstraintSet::for_domain::<IntegerDomain>();
        c.set_max(10.0).unwrap();
        c.set_min(-10.0).unwrap();
        assert_eq!(c.effective_max(), Some(10.0));
        assert_eq!(c.effective_min(), Some(-10.0));
    }
}
