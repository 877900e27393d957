use std::{collections::BTreeSet, sync::Arc};

use locus_core::{
    Constraint, Convexity, GeometricProgram, LocalConstraint, Monomial, Posynomial,
    SignomialInequality, VarKey, VarMap,
};

use super::Error;

/// Value given to signomial variables that the approximation point lacks.
const DEFAULT_VALUE: f64 = 1.0;

/// Builds the GP approximation of a problem about a point.
///
/// Constraints are classified once, at construction. Every GP built here has
/// the slot layout `[cost, convex…, deferred…, local…, extra…]`, where
/// deferred slots hold the approximations of signomial inequalities and
/// extra slots hold constraints passed to [`build`](Self::build).
#[derive(Debug, Clone)]
pub struct Assembler {
    cost: Arc<Posynomial>,
    convex: Vec<Arc<Posynomial>>,
    equalities: Arc<[Monomial]>,
    deferred: Vec<SignomialInequality>,
    local: Vec<Arc<dyn LocalConstraint>>,
    substitutions: Arc<VarMap>,
    keys: BTreeSet<VarKey>,
    approximated_keys: BTreeSet<VarKey>,
}

impl Assembler {
    /// Classifies `constraints` with `substitutions` applied.
    ///
    /// # Errors
    ///
    /// Returns an error if a substitution is not positive and finite, or a
    /// constraint is malformed.
    pub fn new(
        cost: &Posynomial,
        constraints: &[Constraint],
        substitutions: VarMap,
    ) -> Result<Self, Error> {
        locus_core::check_values(&substitutions)?;

        let mut keys = cost.varkeys();
        let mut convex = Vec::new();
        let mut equalities = Vec::new();
        let mut deferred = Vec::new();
        let mut local = Vec::new();
        let mut approximated_keys = BTreeSet::new();

        for constraint in constraints {
            keys.extend(constraint.varkeys());
            match constraint.classify(&substitutions)? {
                Convexity::AlreadyConvex {
                    posynomials,
                    equalities: eqs,
                } => {
                    convex.extend(posynomials.into_iter().map(Arc::new));
                    equalities.extend(eqs);
                }
                Convexity::Signomial(c) => {
                    approximated_keys.extend(c.varkeys());
                    deferred.push(c);
                }
                Convexity::OpaqueExternal(c) => {
                    approximated_keys.extend(c.varkeys());
                    local.push(c);
                }
            }
        }

        Ok(Self {
            cost: Arc::new(cost.substitute(&substitutions)),
            convex,
            equalities: equalities.into(),
            deferred,
            local,
            substitutions: Arc::new(substitutions),
            keys,
            approximated_keys,
        })
    }

    /// Whether every constraint is already convex, so one GP solve is exact.
    #[must_use]
    pub fn is_exact(&self) -> bool {
        self.deferred.is_empty() && self.local.is_empty()
    }

    /// Whether the GP layout is fixed, so [`relinearize`](Self::relinearize)
    /// applies.
    #[must_use]
    pub fn has_fixed_layout(&self) -> bool {
        self.local.is_empty()
    }

    /// Every variable in the cost or a constraint.
    #[must_use]
    pub fn varkeys(&self) -> &BTreeSet<VarKey> {
        &self.keys
    }

    /// Fills an approximation point.
    ///
    /// Each variable takes the first value found in `overrides`, the
    /// substitutions, and its `sp_init` hint. Variables of signomial and
    /// local constraints that are still missing default to 1.
    #[must_use]
    pub fn fill_x0(&self, overrides: &VarMap) -> VarMap {
        let mut x0 = overrides.clone();
        for key in &self.keys {
            if x0.contains_key(key) {
                continue;
            }
            if let Some(&value) = self.substitutions.get(key) {
                x0.insert(key.clone(), value);
            } else if let Some(value) = key.sp_init() {
                x0.insert(key.clone(), value);
            }
        }
        for key in &self.approximated_keys {
            x0.entry(key.clone()).or_insert(DEFAULT_VALUE);
        }
        x0
    }

    /// Builds the GP approximation about `x0` from scratch.
    ///
    /// The `extra` constraints are classified and approximated like the
    /// problem's own and occupy the last slots.
    ///
    /// # Errors
    ///
    /// Returns an error if an approximation cannot be formed at `x0`, or an
    /// extra constraint is malformed.
    pub fn build(&self, mut x0: VarMap, extra: &[Constraint]) -> Result<GeometricProgram, Error> {
        let mut posynomials = Vec::with_capacity(1 + self.convex.len() + self.deferred.len());
        posynomials.push(Arc::clone(&self.cost));
        posynomials.extend(self.convex.iter().map(Arc::clone));
        for c in &self.deferred {
            posynomials.push(Arc::new(c.as_gp_posynomial(&x0)?));
        }
        for c in &self.local {
            for p in c.as_gp_posynomials(&x0)? {
                push_nonempty(&mut posynomials, p.substitute(&self.substitutions));
            }
        }

        let mut equalities = Arc::clone(&self.equalities);
        let mut extra_equalities = Vec::new();
        for constraint in extra {
            match constraint.classify(&self.substitutions)? {
                Convexity::AlreadyConvex {
                    posynomials: p,
                    equalities: e,
                } => {
                    for p in p {
                        push_nonempty(&mut posynomials, p);
                    }
                    extra_equalities.extend(e);
                }
                Convexity::Signomial(c) => {
                    for key in c.varkeys() {
                        x0.entry(key).or_insert(DEFAULT_VALUE);
                    }
                    posynomials.push(Arc::new(c.as_gp_posynomial(&x0)?));
                }
                Convexity::OpaqueExternal(c) => {
                    for key in c.varkeys() {
                        x0.entry(key).or_insert(DEFAULT_VALUE);
                    }
                    for p in c.as_gp_posynomials(&x0)? {
                        push_nonempty(&mut posynomials, p.substitute(&self.substitutions));
                    }
                }
            }
        }
        if !extra_equalities.is_empty() {
            equalities = self
                .equalities
                .iter()
                .cloned()
                .chain(extra_equalities)
                .collect();
        }

        Ok(GeometricProgram::from_parts(
            posynomials,
            equalities,
            Arc::clone(&self.substitutions),
            x0,
        )?)
    }

    /// Re-approximates `gp` about a new point.
    ///
    /// `x0` is merged into the point `gp` was built about, and only the
    /// deferred slots are recomputed. All other slots are shared with `gp`.
    /// The result matches [`build`](Self::build) at the merged point.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SkeletonMismatch`] if `gp` was not built by this
    /// assembler without extra constraints, or if the problem has local
    /// constraints. Returns an error if an approximation cannot be formed.
    pub fn relinearize(
        &self,
        gp: &GeometricProgram,
        x0: &VarMap,
    ) -> Result<GeometricProgram, Error> {
        let first = 1 + self.convex.len();
        let matches = self.has_fixed_layout()
            && gp.slots().len() == first + self.deferred.len()
            && Arc::ptr_eq(&gp.slots()[0], &self.cost)
            && Arc::ptr_eq(gp.shared_equalities(), &self.equalities);
        if !matches {
            return Err(Error::SkeletonMismatch);
        }

        let mut point = gp.x0().clone();
        point.extend(x0.iter().map(|(key, value)| (key.clone(), *value)));

        let replacements = self
            .deferred
            .iter()
            .enumerate()
            .map(|(i, c)| -> Result<_, Error> { Ok((first + i, c.as_gp_posynomial(&point)?)) })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(gp.splice(replacements, point)?)
    }
}

fn push_nonempty(posynomials: &mut Vec<Arc<Posynomial>>, posynomial: Posynomial) {
    if !posynomial.is_empty() {
        posynomials.push(Arc::new(posynomial));
    }
}
