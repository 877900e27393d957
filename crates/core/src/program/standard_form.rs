use std::{collections::BTreeSet, sync::Arc};

use crate::{Monomial, Posynomial, VarKey};

/// Exponents of one monomial, as `(variable index, exponent)` pairs.
pub type SparseExponents = Vec<(usize, f64)>;

/// The flat, solver-facing layout of a geometric program.
///
/// Every monomial of every posynomial is one row. Row `r` has coefficient
/// `cs[r]`, exponents `exps[r]`, and belongs to posynomial `p_idxs[r]`.
/// Posynomial `i` owns `k[i]` consecutive rows. Posynomial 0 is the cost and
/// the rest are `<= 1` constraints. Monomial equalities (`= 1`) are kept in
/// their own rows.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StandardForm {
    vars: Vec<VarKey>,
    cs: Vec<f64>,
    exps: Vec<SparseExponents>,
    p_idxs: Vec<usize>,
    k: Vec<usize>,
    eq_cs: Vec<f64>,
    eq_exps: Vec<SparseExponents>,
}

impl StandardForm {
    pub(crate) fn generate(posynomials: &[Arc<Posynomial>], equalities: &[Monomial]) -> Self {
        let vars: Vec<VarKey> = posynomials
            .iter()
            .flat_map(|p| p.varkeys())
            .chain(equalities.iter().flat_map(|m| m.varkeys().cloned()))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut form = Self {
            vars,
            ..Self::default()
        };

        for (i, posynomial) in posynomials.iter().enumerate() {
            form.k.push(posynomial.len());
            for term in posynomial.terms() {
                form.cs.push(term.coeff());
                form.exps.push(form.sparse(term));
                form.p_idxs.push(i);
            }
        }
        for monomial in equalities {
            form.eq_cs.push(monomial.coeff());
            form.eq_exps.push(form.sparse(monomial));
        }

        form
    }

    fn sparse(&self, monomial: &Monomial) -> SparseExponents {
        monomial
            .exps()
            .iter()
            .filter_map(|(key, &exp)| self.var_index(key).map(|j| (j, exp)))
            .collect()
    }

    /// Free variables, sorted. Indices in the exponent rows refer to this list.
    #[must_use]
    pub fn vars(&self) -> &[VarKey] {
        &self.vars
    }

    /// Index of `key` in [`vars`](Self::vars).
    #[must_use]
    pub fn var_index(&self, key: &VarKey) -> Option<usize> {
        self.vars.binary_search(key).ok()
    }

    #[must_use]
    pub fn cs(&self) -> &[f64] {
        &self.cs
    }

    #[must_use]
    pub fn exps(&self) -> &[SparseExponents] {
        &self.exps
    }

    #[must_use]
    pub fn p_idxs(&self) -> &[usize] {
        &self.p_idxs
    }

    #[must_use]
    pub fn k(&self) -> &[usize] {
        &self.k
    }

    /// Coefficients of the monomial equality rows.
    #[must_use]
    pub fn eq_cs(&self) -> &[f64] {
        &self.eq_cs
    }

    #[must_use]
    pub fn eq_exps(&self) -> &[SparseExponents] {
        &self.eq_exps
    }

    /// Row range of posynomial `i`.
    #[must_use]
    pub fn rows(&self, i: usize) -> std::ops::Range<usize> {
        let start: usize = self.k[..i].iter().sum();
        start..start + self.k[i]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lays_out_rows_by_posynomial() {
        let x = VarKey::new("x");
        let y = VarKey::new("y");
        let cost = Posynomial::new([Monomial::var(&x), Monomial::var(&y)]);
        let constraint = Posynomial::from(Monomial::var(&x).pow(-1.0).scaled(2.0).unwrap());
        let equality = &Monomial::var(&x) * &Monomial::var(&y);

        let form = StandardForm::generate(
            &[Arc::new(cost), Arc::new(constraint)],
            std::slice::from_ref(&equality),
        );

        assert_eq!(form.vars(), [x, y]);
        assert_eq!(form.cs(), [1.0, 1.0, 2.0]);
        assert_eq!(form.p_idxs(), [0, 0, 1]);
        assert_eq!(form.k(), [2, 1]);
        assert_eq!(form.exps()[2], vec![(0, -1.0)]);
        assert_eq!(form.rows(1), 2..3);
        assert_eq!(form.eq_exps()[0], vec![(0, 1.0), (1, 1.0)]);
    }
}
