use std::{
    collections::BTreeSet,
    fmt,
    ops::{Add, Neg, Sub},
};

use crate::Error;

use super::{Exponents, Monomial, Posynomial, VarKey, VarMap};

/// A posynomial minus a posynomial.
///
/// Terms with identical exponents on both sides cancel on construction, so a
/// term never appears in both parts.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Signomial {
    positive: Posynomial,
    negative: Posynomial,
}

impl Signomial {
    /// Creates `positive - negative`, cancelling like terms across the sides.
    #[must_use]
    pub fn new(positive: Posynomial, negative: Posynomial) -> Self {
        let mut pos: Vec<Monomial> = positive.terms().to_vec();
        let mut neg: Vec<Monomial> = Vec::new();

        for term in negative.terms() {
            match pos.iter().position(|p| p.exps() == term.exps()) {
                Some(i) => {
                    let net = pos[i].coeff() - term.coeff();
                    let exps = term.exps().clone();
                    if net > 0.0 {
                        pos[i] = Monomial::raw(net, exps);
                    } else {
                        pos.remove(i);
                        if net < 0.0 {
                            neg.push(Monomial::raw(-net, exps));
                        }
                    }
                }
                None => neg.push(term.clone()),
            }
        }

        Self {
            positive: Posynomial::new(pos),
            negative: Posynomial::new(neg),
        }
    }

    /// Creates a signomial from signed coefficients and exponents.
    ///
    /// Zero coefficients are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if a coefficient or exponent is not finite.
    pub fn from_terms(
        terms: impl IntoIterator<Item = (f64, Exponents)>,
    ) -> Result<Self, Error> {
        let mut positive = Vec::new();
        let mut negative = Vec::new();
        for (coeff, exps) in terms {
            if coeff > 0.0 {
                positive.push(Monomial::new(coeff, exps)?);
            } else if coeff < 0.0 {
                negative.push(Monomial::new(-coeff, exps)?);
            } else if coeff.is_nan() {
                return Err(Error::NonPositiveCoefficient { coeff });
            }
        }
        Ok(Self::new(
            Posynomial::new(positive),
            Posynomial::new(negative),
        ))
    }

    #[must_use]
    pub fn positive(&self) -> &Posynomial {
        &self.positive
    }

    #[must_use]
    pub fn negative(&self) -> &Posynomial {
        &self.negative
    }

    /// True if no negative terms remain.
    #[must_use]
    pub fn is_posynomial(&self) -> bool {
        self.negative.is_empty()
    }

    /// Converts to a posynomial if there are no negative terms.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NonPositiveCoefficient`] with the first negative
    /// coefficient otherwise.
    pub fn to_posynomial(&self) -> Result<Posynomial, Error> {
        match self.negative.terms().first() {
            Some(term) => Err(Error::NonPositiveCoefficient {
                coeff: -term.coeff(),
            }),
            None => Ok(self.positive.clone()),
        }
    }

    #[must_use]
    pub fn varkeys(&self) -> BTreeSet<VarKey> {
        let mut keys = self.positive.varkeys();
        keys.extend(self.negative.varkeys());
        keys
    }

    /// Value at `point`.
    ///
    /// # Errors
    ///
    /// Returns an error if any term cannot be evaluated.
    pub fn eval(&self, point: &VarMap) -> Result<f64, Error> {
        Ok(self.positive.eval(point)? - self.negative.eval(point)?)
    }

    /// Replaces substituted variables, which may cancel terms across sides.
    #[must_use]
    pub fn substitute(&self, substitutions: &VarMap) -> Self {
        Self::new(
            self.positive.substitute(substitutions),
            self.negative.substitute(substitutions),
        )
    }
}

impl From<Posynomial> for Signomial {
    fn from(positive: Posynomial) -> Self {
        Self {
            positive,
            negative: Posynomial::default(),
        }
    }
}

impl From<Monomial> for Signomial {
    fn from(monomial: Monomial) -> Self {
        Posynomial::from(monomial).into()
    }
}

impl Add for Signomial {
    type Output = Signomial;

    fn add(self, rhs: Signomial) -> Signomial {
        Signomial::new(
            self.positive + rhs.positive,
            self.negative + rhs.negative,
        )
    }
}

impl Sub for Signomial {
    type Output = Signomial;

    fn sub(self, rhs: Signomial) -> Signomial {
        self + -rhs
    }
}

impl Neg for Signomial {
    type Output = Signomial;

    fn neg(self) -> Signomial {
        Signomial {
            positive: self.negative,
            negative: self.positive,
        }
    }
}

impl fmt::Display for Signomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.positive.is_empty(), self.negative.is_empty()) {
            (_, true) => write!(f, "{}", self.positive),
            (true, false) => write!(f, "-({})", self.negative),
            (false, false) => write!(f, "{} - ({})", self.positive, self.negative),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    fn x() -> VarKey {
        VarKey::new("x")
    }

    #[test]
    fn like_terms_cancel_across_sides() {
        let x = x();
        let s = Signomial::from_terms([
            (3.0, Exponents::from([(x.clone(), 1.0)])),
            (1.0, Exponents::new()),
            (-1.0, Exponents::from([(x.clone(), 1.0)])),
            (-2.0, Exponents::new()),
        ])
        .unwrap();

        assert_eq!(s.positive().len(), 1);
        assert_relative_eq!(s.positive().terms()[0].coeff(), 2.0);
        assert_eq!(s.negative().len(), 1);
        assert!(s.negative().is_constant());
        assert_relative_eq!(s.negative().terms()[0].coeff(), 1.0);
    }

    #[test]
    fn exact_cancellation_removes_the_term() {
        let x = x();
        let s = Posynomial::from(&x) - Posynomial::from(&x);
        assert!(s.positive().is_empty());
        assert!(s.is_posynomial());
    }

    #[test]
    fn substitution_can_make_a_posynomial() {
        let x = x();
        let y = VarKey::new("y");
        // x + 3 - y, with y = 1 leaves x + 2.
        let s = Posynomial::new([Monomial::var(&x), Monomial::constant(3.0).unwrap()])
            - Posynomial::from(&y);

        let subbed = s.substitute(&VarMap::from([(y, 1.0)]));
        let posy = subbed.to_posynomial().unwrap();
        assert_relative_eq!(
            posy.eval(&VarMap::from([(x, 1.0)])).unwrap(),
            3.0,
            max_relative = 1e-12
        );
    }

    #[test]
    fn negative_terms_block_posynomial_conversion() {
        let x = x();
        let s = Signomial::from(Monomial::one()) - Signomial::from(Monomial::var(&x));
        assert_eq!(
            s.to_posynomial(),
            Err(Error::NonPositiveCoefficient { coeff: -1.0 })
        );
    }

    #[test]
    fn evaluates_difference() {
        let x = x();
        let s = Posynomial::new([Monomial::var(&x).pow(2.0)]) - Posynomial::from(&x);
        assert_relative_eq!(
            s.eval(&VarMap::from([(x, 3.0)])).unwrap(),
            6.0,
            max_relative = 1e-12
        );
        assert_eq!(s.to_string(), "x^2 - (x)");
    }
}
