use std::collections::BTreeSet;

use crate::{Monomial, Posynomial, VarKey, VarMap};

/// `lhs <= rhs` with a posynomial left side and a monomial right side.
#[derive(Debug, Clone, PartialEq)]
pub struct PosynomialInequality {
    lhs: Posynomial,
    rhs: Monomial,
}

impl PosynomialInequality {
    #[must_use]
    pub fn new(lhs: Posynomial, rhs: Monomial) -> Self {
        Self { lhs, rhs }
    }

    #[must_use]
    pub fn lhs(&self) -> &Posynomial {
        &self.lhs
    }

    #[must_use]
    pub fn rhs(&self) -> &Monomial {
        &self.rhs
    }

    #[must_use]
    pub fn varkeys(&self) -> BTreeSet<VarKey> {
        let mut keys = self.lhs.varkeys();
        keys.extend(self.rhs.varkeys().cloned());
        keys
    }

    /// The equivalent `posynomial <= 1`, with substitutions applied.
    #[must_use]
    pub fn as_gp_posynomial(&self, substitutions: &VarMap) -> Posynomial {
        (&self.lhs / &self.rhs).substitute(substitutions)
    }
}
