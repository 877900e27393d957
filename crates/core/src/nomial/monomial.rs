use std::{
    collections::BTreeMap,
    fmt,
    ops::{Div, Mul},
};

use crate::Error;

use super::{VarKey, VarMap};

/// Exponent of each variable in a monomial.
pub type Exponents = BTreeMap<VarKey, f64>;

/// A single product-of-powers term `c · Π xᵢ^aᵢ` with `c > 0`.
#[derive(Debug, Clone, PartialEq)]
pub struct Monomial {
    coeff: f64,
    exps: Exponents,
}

impl Monomial {
    /// Creates a monomial from a coefficient and exponents.
    ///
    /// Zero exponents are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NonPositiveCoefficient`] if `coeff` is not positive and
    /// finite, or [`Error::NonFiniteExponent`] if any exponent is not finite.
    pub fn new(coeff: f64, exps: Exponents) -> Result<Self, Error> {
        if !coeff.is_finite() || coeff <= 0.0 {
            return Err(Error::NonPositiveCoefficient { coeff });
        }
        if let Some((key, &exp)) = exps.iter().find(|(_, exp)| !exp.is_finite()) {
            return Err(Error::NonFiniteExponent {
                key: key.clone(),
                exp,
            });
        }
        Ok(Self::raw(coeff, exps))
    }

    /// Creates a constant monomial.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NonPositiveCoefficient`] if `coeff` is not positive and finite.
    pub fn constant(coeff: f64) -> Result<Self, Error> {
        Self::new(coeff, Exponents::new())
    }

    /// The monomial `1`.
    #[must_use]
    pub fn one() -> Self {
        Self::raw(1.0, Exponents::new())
    }

    /// The monomial `key¹`.
    #[must_use]
    pub fn var(key: &VarKey) -> Self {
        Self::raw(1.0, Exponents::from([(key.clone(), 1.0)]))
    }

    /// Builds a monomial whose invariants the caller already guarantees.
    pub(crate) fn raw(coeff: f64, mut exps: Exponents) -> Self {
        exps.retain(|_, exp| *exp != 0.0);
        Self { coeff, exps }
    }

    #[must_use]
    pub fn coeff(&self) -> f64 {
        self.coeff
    }

    #[must_use]
    pub fn exps(&self) -> &Exponents {
        &self.exps
    }

    /// Exponent of `key`, or zero if it does not appear.
    #[must_use]
    pub fn exp(&self, key: &VarKey) -> f64 {
        self.exps.get(key).copied().unwrap_or(0.0)
    }

    #[must_use]
    pub fn is_constant(&self) -> bool {
        self.exps.is_empty()
    }

    pub fn varkeys(&self) -> impl Iterator<Item = &VarKey> {
        self.exps.keys()
    }

    /// Returns a copy with the coefficient multiplied by `factor`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NonPositiveCoefficient`] if the scaled coefficient is
    /// not positive and finite.
    pub fn scaled(&self, factor: f64) -> Result<Self, Error> {
        Self::new(self.coeff * factor, self.exps.clone())
    }

    /// Raises the monomial to a real power.
    #[must_use]
    pub fn pow(&self, power: f64) -> Self {
        let exps = self
            .exps
            .iter()
            .map(|(key, exp)| (key.clone(), exp * power))
            .collect();
        Self::raw(self.coeff.powf(power), exps)
    }

    /// Natural log of the monomial's value at `point`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingValue`] if a variable has no value in `point`, or
    /// [`Error::InvalidValue`] if a value is not positive and finite.
    pub fn ln_eval(&self, point: &VarMap) -> Result<f64, Error> {
        self.exps
            .iter()
            .try_fold(self.coeff.ln(), |acc, (key, exp)| {
                Ok(acc + exp * ln_value(key, point)?)
            })
    }

    /// Value of the monomial at `point`.
    ///
    /// # Errors
    ///
    /// See [`ln_eval`](Self::ln_eval).
    pub fn eval(&self, point: &VarMap) -> Result<f64, Error> {
        self.ln_eval(point).map(f64::exp)
    }

    /// Replaces every substituted variable by its fixed value.
    #[must_use]
    pub fn substitute(&self, substitutions: &VarMap) -> Self {
        let mut coeff = self.coeff;
        let mut exps = Exponents::new();
        for (key, &exp) in &self.exps {
            match substitutions.get(key) {
                Some(value) => coeff *= value.powf(exp),
                None => {
                    exps.insert(key.clone(), exp);
                }
            }
        }
        Self::raw(coeff, exps)
    }
}

/// Log of a positive point value.
fn ln_value(key: &VarKey, point: &VarMap) -> Result<f64, Error> {
    let value = *point
        .get(key)
        .ok_or_else(|| Error::MissingValue { key: key.clone() })?;
    if !value.is_finite() || value <= 0.0 {
        return Err(Error::InvalidValue {
            key: key.clone(),
            value,
        });
    }
    Ok(value.ln())
}

impl Mul<&Monomial> for &Monomial {
    type Output = Monomial;

    fn mul(self, rhs: &Monomial) -> Monomial {
        let mut exps = self.exps.clone();
        for (key, exp) in &rhs.exps {
            *exps.entry(key.clone()).or_insert(0.0) += exp;
        }
        Monomial::raw(self.coeff * rhs.coeff, exps)
    }
}

impl Div<&Monomial> for &Monomial {
    type Output = Monomial;

    fn div(self, rhs: &Monomial) -> Monomial {
        self * &rhs.pow(-1.0)
    }
}

impl Mul for Monomial {
    type Output = Monomial;

    fn mul(self, rhs: Monomial) -> Monomial {
        &self * &rhs
    }
}

impl Div for Monomial {
    type Output = Monomial;

    fn div(self, rhs: Monomial) -> Monomial {
        &self / &rhs
    }
}

impl From<&VarKey> for Monomial {
    fn from(key: &VarKey) -> Self {
        Self::var(key)
    }
}

impl fmt::Display for Monomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show_coeff = !is_one(self.coeff) || self.exps.is_empty();
        if show_coeff {
            write!(f, "{}", self.coeff)?;
        }
        for (i, (key, exp)) in self.exps.iter().enumerate() {
            if show_coeff || i > 0 {
                f.write_str("·")?;
            }
            write!(f, "{key}")?;
            if !is_one(*exp) {
                write!(f, "^{exp}")?;
            }
        }
        Ok(())
    }
}

#[allow(clippy::float_cmp)]
fn is_one(value: f64) -> bool {
    value == 1.0
}
