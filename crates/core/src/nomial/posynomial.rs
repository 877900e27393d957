use std::{
    collections::BTreeSet,
    fmt,
    ops::{Add, Div, Mul, Sub},
};

use crate::Error;

use super::{Exponents, Monomial, Signomial, VarKey, VarMap};

/// A sum of monomials with positive coefficients.
///
/// Like terms (identical exponents) are merged on construction, keeping the
/// position of their first occurrence. The empty posynomial is the empty sum.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Posynomial {
    terms: Vec<Monomial>,
}

impl Posynomial {
    /// Creates a posynomial, merging like terms.
    pub fn new(terms: impl IntoIterator<Item = Monomial>) -> Self {
        let mut merged: Vec<Monomial> = Vec::new();
        for term in terms {
            match merged.iter_mut().find(|m| m.exps() == term.exps()) {
                Some(existing) => {
                    *existing = Monomial::raw(existing.coeff() + term.coeff(), term.exps().clone());
                }
                None => merged.push(term),
            }
        }
        Self { terms: merged }
    }

    #[must_use]
    pub fn terms(&self) -> &[Monomial] {
        &self.terms
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Returns the single term if this posynomial is a monomial.
    #[must_use]
    pub fn as_monomial(&self) -> Option<&Monomial> {
        match self.terms.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }

    /// True if no term depends on a variable.
    #[must_use]
    pub fn is_constant(&self) -> bool {
        self.terms.iter().all(Monomial::is_constant)
    }

    #[must_use]
    pub fn varkeys(&self) -> BTreeSet<VarKey> {
        self.terms
            .iter()
            .flat_map(Monomial::varkeys)
            .cloned()
            .collect()
    }

    /// Value at `point`.
    ///
    /// # Errors
    ///
    /// Returns an error if any term cannot be evaluated; see [`Monomial::eval`].
    pub fn eval(&self, point: &VarMap) -> Result<f64, Error> {
        self.terms.iter().map(|term| term.eval(point)).sum()
    }

    /// Replaces substituted variables by their fixed values and re-merges terms.
    #[must_use]
    pub fn substitute(&self, substitutions: &VarMap) -> Self {
        Self::new(self.terms.iter().map(|term| term.substitute(substitutions)))
    }

    /// Weight of each term in the monomial lower bound about `x0`.
    ///
    /// `wᵢ = tᵢ(x0) / Σⱼ tⱼ(x0)`, computed in log space. A term whose share
    /// underflows gets weight zero. The nonzero weights sum to one.
    ///
    /// # Errors
    ///
    /// Returns an error if a term cannot be evaluated at `x0`, or
    /// [`Error::DegenerateApproximation`] if the posynomial is empty.
    pub fn approximation_weights(&self, x0: &VarMap) -> Result<Vec<f64>, Error> {
        let logs = self
            .terms
            .iter()
            .map(|term| term.ln_eval(x0))
            .collect::<Result<Vec<_>, _>>()?;

        let max = logs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if !max.is_finite() {
            return Err(Error::DegenerateApproximation);
        }

        let shares: Vec<f64> = logs.iter().map(|ln| (ln - max).exp()).collect();
        let total: f64 = shares.iter().sum();
        Ok(shares.into_iter().map(|share| share / total).collect())
    }

    /// Monomial lower bound that is tight at `x0`.
    ///
    /// Returns `Π (tᵢ / wᵢ)^wᵢ` over the terms with nonzero weight. By the
    /// weighted AM-GM inequality, this never exceeds the posynomial, and it
    /// equals the posynomial at `x0`.
    ///
    /// # Errors
    ///
    /// Returns an error if a term cannot be evaluated at `x0`, or
    /// [`Error::DegenerateApproximation`] if no finite bound exists.
    pub fn monomial_lower_bound(&self, x0: &VarMap) -> Result<Monomial, Error> {
        let weights = self.approximation_weights(x0)?;

        let mut ln_coeff = 0.0;
        let mut exps = Exponents::new();
        for (term, &weight) in self.terms.iter().zip(&weights) {
            if weight == 0.0 {
                continue;
            }
            ln_coeff += weight * (term.coeff().ln() - weight.ln());
            for (key, exp) in term.exps() {
                *exps.entry(key.clone()).or_insert(0.0) += weight * exp;
            }
        }

        let coeff = ln_coeff.exp();
        if !coeff.is_finite() || coeff <= 0.0 {
            return Err(Error::DegenerateApproximation);
        }
        Ok(Monomial::raw(coeff, exps))
    }
}

impl From<Monomial> for Posynomial {
    fn from(monomial: Monomial) -> Self {
        Self {
            terms: vec![monomial],
        }
    }
}

impl From<&VarKey> for Posynomial {
    fn from(key: &VarKey) -> Self {
        Monomial::var(key).into()
    }
}

impl FromIterator<Monomial> for Posynomial {
    fn from_iter<T: IntoIterator<Item = Monomial>>(iter: T) -> Self {
        Self::new(iter)
    }
}

impl Add<&Posynomial> for &Posynomial {
    type Output = Posynomial;

    fn add(self, rhs: &Posynomial) -> Posynomial {
        Posynomial::new(self.terms.iter().chain(&rhs.terms).cloned())
    }
}

impl Add for Posynomial {
    type Output = Posynomial;

    fn add(self, rhs: Posynomial) -> Posynomial {
        Posynomial::new(self.terms.into_iter().chain(rhs.terms))
    }
}

impl Add<Monomial> for Posynomial {
    type Output = Posynomial;

    fn add(self, rhs: Monomial) -> Posynomial {
        self + Posynomial::from(rhs)
    }
}

impl Mul<&Monomial> for &Posynomial {
    type Output = Posynomial;

    fn mul(self, rhs: &Monomial) -> Posynomial {
        Posynomial::new(self.terms.iter().map(|term| term * rhs))
    }
}

impl Div<&Monomial> for &Posynomial {
    type Output = Posynomial;

    fn div(self, rhs: &Monomial) -> Posynomial {
        self * &rhs.pow(-1.0)
    }
}

impl Mul<&Posynomial> for &Posynomial {
    type Output = Posynomial;

    fn mul(self, rhs: &Posynomial) -> Posynomial {
        Posynomial::new(
            self.terms
                .iter()
                .flat_map(|a| rhs.terms.iter().map(move |b| a * b)),
        )
    }
}

impl Sub for Posynomial {
    type Output = Signomial;

    fn sub(self, rhs: Posynomial) -> Signomial {
        Signomial::new(self, rhs)
    }
}

impl fmt::Display for Posynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.terms.is_empty() {
            return f.write_str("0");
        }
        for (i, term) in self.terms.iter().enumerate() {
            if i > 0 {
                f.write_str(" + ")?;
            }
            write!(f, "{term}")?;
        }
        Ok(())
    }
}
