use std::collections::BTreeSet;

use crate::{Error, Monomial, Posynomial, Signomial, VarKey, VarMap};

/// `less <= greater` with both sides posynomials.
///
/// Any signomial inequality can be brought into this form by moving the
/// negative terms of each side to the other side. The greater side is what
/// makes the constraint non-convex. It is replaced by a monomial lower bound
/// at each iterate.
#[derive(Debug, Clone, PartialEq)]
pub struct SignomialInequality {
    less: Posynomial,
    greater: Posynomial,
}

impl SignomialInequality {
    /// Creates `lhs <= rhs`.
    ///
    /// Like terms across the two sides cancel.
    #[must_use]
    pub fn new(lhs: Signomial, rhs: Signomial) -> Self {
        Self::from_difference(lhs - rhs)
    }

    fn from_difference(difference: Signomial) -> Self {
        Self {
            less: difference.positive().clone(),
            greater: difference.negative().clone(),
        }
    }

    /// The side kept unchanged in each approximation.
    #[must_use]
    pub fn less(&self) -> &Posynomial {
        &self.less
    }

    /// The side replaced by its monomial lower bound.
    #[must_use]
    pub fn greater(&self) -> &Posynomial {
        &self.greater
    }

    #[must_use]
    pub fn varkeys(&self) -> BTreeSet<VarKey> {
        let mut keys = self.less.varkeys();
        keys.extend(self.greater.varkeys());
        keys
    }

    /// Applies substitutions, which may cancel terms across the sides.
    #[must_use]
    pub fn substitute(&self, substitutions: &VarMap) -> Self {
        Self::from_difference(Signomial::new(
            self.less.substitute(substitutions),
            self.greater.substitute(substitutions),
        ))
    }

    /// The less side, unchanged by approximation.
    #[must_use]
    pub fn as_approx_lt(&self) -> &Posynomial {
        &self.less
    }

    /// Monomial lower bound of the greater side, tight at `x0`.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable of the greater side has no usable value
    /// in `x0`, or if the bound degenerates.
    pub fn as_approx_gt(&self, x0: &VarMap) -> Result<Monomial, Error> {
        self.greater.monomial_lower_bound(x0)
    }

    /// The GP posynomial `less / bound`, meant as `<= 1`.
    ///
    /// It is a conservative restriction of the constraint everywhere and
    /// exact at `x0`.
    ///
    /// # Errors
    ///
    /// See [`as_approx_gt`](Self::as_approx_gt).
    pub fn as_gp_posynomial(&self, x0: &VarMap) -> Result<Posynomial, Error> {
        let bound = self.as_approx_gt(x0)?;
        Ok(&self.less / &bound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use proptest::prelude::*;

    use crate::Exponents;

    #[test]
    fn moves_negative_terms_across() {
        let x = VarKey::new("x");
        let y = VarKey::new("y");
        // 1/x - y/x <= 1 becomes 1/x <= 1 + y/x.
        let inv_x = Monomial::var(&x).pow(-1.0);
        let lhs = Signomial::from(inv_x.clone()) - Signomial::from(&inv_x * &Monomial::var(&y));
        let c = SignomialInequality::new(lhs, Monomial::one().into());

        assert_eq!(c.less(), &Posynomial::from(inv_x.clone()));
        assert_eq!(c.greater().len(), 2);
        assert_eq!(c.as_approx_lt(), &Posynomial::from(inv_x));
    }

    #[test]
    fn approximation_is_exact_at_point() {
        let x = VarKey::new("x");
        let y = VarKey::new("y");
        let inv_x = Monomial::var(&x).pow(-1.0);
        let c = SignomialInequality::new(
            inv_x.clone().into(),
            Signomial::from(Monomial::one()) + Signomial::from(&inv_x * &Monomial::var(&y)),
        );
        let x0 = VarMap::from([(x.clone(), 2.0), (y.clone(), 0.5)]);

        let gp = c.as_gp_posynomial(&x0).unwrap();
        // (1/x) / (1 + y/x) at x0 is 0.5 / 1.25.
        assert_relative_eq!(gp.eval(&x0).unwrap(), 0.4, max_relative = 1e-12);

        // Conservative elsewhere: approximated value never below the true ratio.
        let at = VarMap::from([(x, 0.7), (y, 3.0)]);
        let exact = 1.0 / 0.7 / (1.0 + 3.0 / 0.7);
        assert!(gp.eval(&at).unwrap() >= exact * (1.0 - 1e-12));
    }

    #[test]
    fn missing_greater_side_value_is_reported() {
        let x = VarKey::new("x");
        let y = VarKey::new("y");
        let c = SignomialInequality::new(
            Monomial::var(&x).into(),
            Posynomial::new([Monomial::var(&y), Monomial::one()]).into(),
        );

        let err = c.as_approx_gt(&VarMap::from([(x, 1.0)]));
        assert_eq!(err, Err(Error::MissingValue { key: y }));
    }

    proptest! {
        #[test]
        fn greater_side_bound_is_tight_and_sound(
            coeffs in prop::array::uniform2(0.01f64..50.0),
            exps in prop::array::uniform2(-2.0f64..2.0),
            x0 in 0.05f64..20.0,
            at in 0.05f64..20.0,
        ) {
            let x = VarKey::new("x");
            let greater = Posynomial::new([
                Monomial::new(coeffs[0], Exponents::from([(x.clone(), exps[0])])).unwrap(),
                Monomial::new(coeffs[1], Exponents::from([(x.clone(), exps[1])])).unwrap(),
            ]);
            let c = SignomialInequality::new(Monomial::var(&x).into(), greater.into());
            let point0 = VarMap::from([(x.clone(), x0)]);
            let point = VarMap::from([(x, at)]);

            let bound = c.as_approx_gt(&point0).unwrap();
            let exact0 = c.greater().eval(&point0).unwrap();

            prop_assert!((bound.eval(&point0).unwrap() - exact0).abs() <= 1e-9 * exact0);
            let exact = c.greater().eval(&point).unwrap();
            prop_assert!(bound.eval(&point).unwrap() <= exact * (1.0 + 1e-9));
        }
    }
}
