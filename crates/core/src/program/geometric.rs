use std::sync::Arc;

use crate::{Constraint, Convexity, Error, Monomial, Posynomial, VarMap, check_values};

use super::StandardForm;

/// A geometric program: minimize a posynomial cost subject to posynomial
/// `<= 1` constraints and monomial `= 1` equalities.
///
/// Posynomials live in slots. Slot 0 is the cost and every later slot is a
/// constraint. Slots are reference counted, so programs derived with
/// [`splice`](Self::splice) share every slot they do not replace.
///
/// A program also carries the substitutions it was built with and a copy of
/// the point it was approximated about. That point is empty for programs
/// that needed no approximation.
#[derive(Debug, Clone)]
pub struct GeometricProgram {
    posynomials: Vec<Arc<Posynomial>>,
    equalities: Arc<[Monomial]>,
    substitutions: Arc<VarMap>,
    x0: VarMap,
    form: StandardForm,
}

impl GeometricProgram {
    /// Builds an exact geometric program.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotGeometric`] if a constraint is a signomial
    /// inequality that does not reduce to a posynomial one, or a local
    /// constraint. Also returns an error if a substitution is not positive
    /// and finite, a constraint is malformed, or the cost is empty.
    pub fn new(
        cost: &Posynomial,
        constraints: &[Constraint],
        substitutions: VarMap,
    ) -> Result<Self, Error> {
        check_values(&substitutions)?;

        let mut posynomials = vec![Arc::new(cost.substitute(&substitutions))];
        let mut equalities = Vec::new();
        for constraint in constraints {
            match constraint.classify(&substitutions)? {
                Convexity::AlreadyConvex {
                    posynomials: p,
                    equalities: e,
                } => {
                    posynomials.extend(p.into_iter().map(Arc::new));
                    equalities.extend(e);
                }
                Convexity::Signomial(_) | Convexity::OpaqueExternal(_) => {
                    return Err(Error::NotGeometric {
                        constraint: constraint.to_string(),
                    });
                }
            }
        }

        Self::from_parts(
            posynomials,
            equalities.into(),
            Arc::new(substitutions),
            VarMap::new(),
        )
    }

    /// Assembles a program from prepared slots.
    ///
    /// Slot 0 of `posynomials` is the cost. Substitutions must already be
    /// applied to every slot and equality.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyCost`] if there is no cost slot or the cost has
    /// no terms.
    pub fn from_parts(
        posynomials: Vec<Arc<Posynomial>>,
        equalities: Arc<[Monomial]>,
        substitutions: Arc<VarMap>,
        x0: VarMap,
    ) -> Result<Self, Error> {
        if posynomials.first().is_none_or(|cost| cost.is_empty()) {
            return Err(Error::EmptyCost);
        }
        let form = StandardForm::generate(&posynomials, &equalities);
        Ok(Self {
            posynomials,
            equalities,
            substitutions,
            x0,
            form,
        })
    }

    /// Returns a program with the given slots replaced and a new point.
    ///
    /// Every other slot, the equalities, and the substitutions are shared
    /// with `self`. The standard form is regenerated.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SlotOutOfRange`] for a replacement past the last
    /// slot, or [`Error::EmptyCost`] if slot 0 is replaced by an empty cost.
    pub fn splice(
        &self,
        replacements: impl IntoIterator<Item = (usize, Posynomial)>,
        x0: VarMap,
    ) -> Result<Self, Error> {
        let mut posynomials = self.posynomials.clone();
        let slots = posynomials.len();
        for (slot, posynomial) in replacements {
            let target = posynomials
                .get_mut(slot)
                .ok_or(Error::SlotOutOfRange { slot, slots })?;
            *target = Arc::new(posynomial);
        }
        Self::from_parts(
            posynomials,
            Arc::clone(&self.equalities),
            Arc::clone(&self.substitutions),
            x0,
        )
    }

    #[must_use]
    pub fn cost(&self) -> &Posynomial {
        &self.posynomials[0]
    }

    /// Constraint posynomials, each meant as `<= 1`.
    #[must_use]
    pub fn constraints(&self) -> &[Arc<Posynomial>] {
        &self.posynomials[1..]
    }

    /// All slots, cost first.
    #[must_use]
    pub fn slots(&self) -> &[Arc<Posynomial>] {
        &self.posynomials
    }

    /// Monomials constrained to equal one.
    #[must_use]
    pub fn equalities(&self) -> &[Monomial] {
        &self.equalities
    }

    /// The shared equality list, for building related programs.
    #[must_use]
    pub fn shared_equalities(&self) -> &Arc<[Monomial]> {
        &self.equalities
    }

    #[must_use]
    pub fn substitutions(&self) -> &VarMap {
        &self.substitutions
    }

    /// The shared substitutions, for building related programs.
    #[must_use]
    pub fn shared_substitutions(&self) -> &Arc<VarMap> {
        &self.substitutions
    }

    /// The point this program was approximated about.
    #[must_use]
    pub fn x0(&self) -> &VarMap {
        &self.x0
    }

    #[must_use]
    pub fn standard_form(&self) -> &StandardForm {
        &self.form
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::{Signomial, VarKey};

    fn keys() -> (VarKey, VarKey) {
        (VarKey::new("x"), VarKey::new("y"))
    }

    fn exact(x: &VarKey, y: &VarKey) -> GeometricProgram {
        let cost = Posynomial::new([Monomial::var(x), Monomial::var(y)]);
        let constraints = [
            Constraint::posynomial(Monomial::var(x).pow(-1.0), Monomial::one()),
            Constraint::posynomial(Monomial::var(y).pow(-1.0), Monomial::one()),
            Constraint::equal(&Monomial::var(x) * &Monomial::var(y), Monomial::constant(4.0).unwrap()),
        ];
        GeometricProgram::new(&cost, &constraints, VarMap::new()).unwrap()
    }

    #[test]
    fn collects_slots_and_equalities() {
        let (x, y) = keys();
        let gp = exact(&x, &y);

        assert_eq!(gp.slots().len(), 3);
        assert_eq!(gp.constraints().len(), 2);
        assert_eq!(gp.equalities().len(), 1);
        assert!(gp.x0().is_empty());
        assert_eq!(gp.standard_form().vars(), [x, y]);
    }

    #[test]
    fn applies_substitutions() {
        let (x, y) = keys();
        let cost = Posynomial::new([Monomial::var(&x), Monomial::var(&y)]);
        let gp = GeometricProgram::new(&cost, &[], VarMap::from([(y.clone(), 3.0)])).unwrap();

        assert_eq!(gp.standard_form().vars(), [x.clone()]);
        assert_relative_eq!(gp.cost().eval(&VarMap::from([(x, 1.0)])).unwrap(), 4.0);
        assert_relative_eq!(gp.substitutions()[&y], 3.0);
    }

    #[test]
    fn rejects_signomial_constraints() {
        let (x, y) = keys();
        let constraint = Constraint::signomial(
            Signomial::from(Monomial::var(&x)),
            Posynomial::new([Monomial::var(&y), Monomial::one()]),
        );
        let result = GeometricProgram::new(&Posynomial::from(&x), &[constraint], VarMap::new());
        assert!(matches!(result, Err(Error::NotGeometric { .. })));
    }

    #[test]
    fn rejects_invalid_substitutions_and_empty_cost() {
        let (x, _) = keys();
        let invalid = GeometricProgram::new(&Posynomial::from(&x), &[], VarMap::from([(x.clone(), -1.0)]));
        assert!(matches!(invalid, Err(Error::InvalidValue { .. })));

        let empty = GeometricProgram::new(&Posynomial::default(), &[], VarMap::new());
        assert!(matches!(empty, Err(Error::EmptyCost)));
    }

    #[test]
    fn splice_shares_untouched_slots() {
        let (x, y) = keys();
        let gp = exact(&x, &y);
        let replacement = Posynomial::from(Monomial::var(&y).pow(-1.0).scaled(2.0).unwrap());
        let x0 = VarMap::from([(x.clone(), 1.0)]);

        let spliced = gp.splice([(2, replacement.clone())], x0.clone()).unwrap();

        assert!(Arc::ptr_eq(&gp.slots()[0], &spliced.slots()[0]));
        assert!(Arc::ptr_eq(&gp.slots()[1], &spliced.slots()[1]));
        assert!(!Arc::ptr_eq(&gp.slots()[2], &spliced.slots()[2]));
        assert!(Arc::ptr_eq(gp.shared_equalities(), spliced.shared_equalities()));
        assert_eq!(*spliced.slots()[2], replacement);
        assert_eq!(spliced.x0(), &x0);
        assert_eq!(spliced.standard_form().cs()[3], 2.0);

        let out_of_range = gp.splice([(3, replacement)], VarMap::new());
        assert_eq!(out_of_range.err(), Some(Error::SlotOutOfRange { slot: 3, slots: 3 }));
    }
}
