use std::collections::BTreeSet;

use crate::{Monomial, VarKey, VarMap};

/// `lhs = rhs` between two monomials.
#[derive(Debug, Clone, PartialEq)]
pub struct MonomialEquality {
    lhs: Monomial,
    rhs: Monomial,
}

impl MonomialEquality {
    #[must_use]
    pub fn new(lhs: Monomial, rhs: Monomial) -> Self {
        Self { lhs, rhs }
    }

    #[must_use]
    pub fn lhs(&self) -> &Monomial {
        &self.lhs
    }

    #[must_use]
    pub fn rhs(&self) -> &Monomial {
        &self.rhs
    }

    #[must_use]
    pub fn varkeys(&self) -> BTreeSet<VarKey> {
        self.lhs.varkeys().chain(self.rhs.varkeys()).cloned().collect()
    }

    /// The equivalent `monomial = 1`, with substitutions applied.
    #[must_use]
    pub fn as_gp_monomial(&self, substitutions: &VarMap) -> Monomial {
        (&self.lhs / &self.rhs).substitute(substitutions)
    }
}
