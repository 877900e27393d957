//! Constraints and their one-time classification by convexity.
//!
//! A [`Constraint`] is one of four kinds. Posynomial inequalities and monomial
//! equalities are already GP-compatible. Signomial inequalities need a local
//! monomial approximation at each iterate. Local constraints are opaque: they
//! only know how to produce GP posynomials about a point.
//!
//! [`Constraint::classify`] resolves each constraint into a [`Convexity`]
//! once, at problem setup, after substitutions are applied.

mod equality;
mod inequality;
mod local;
mod signomial;

pub use equality::MonomialEquality;
pub use inequality::PosynomialInequality;
pub use local::LocalConstraint;
pub use signomial::SignomialInequality;

use std::{collections::BTreeSet, fmt, sync::Arc};

use crate::{Error, Monomial, Posynomial, Signomial, VarKey, VarMap};

/// A constraint on the decision variables.
#[derive(Debug, Clone)]
pub enum Constraint {
    /// `posynomial <= monomial`.
    Posynomial(PosynomialInequality),

    /// `monomial = monomial`.
    MonomialEquality(MonomialEquality),

    /// `signomial <= signomial`.
    Signomial(SignomialInequality),

    /// A constraint that only exposes local GP posynomials.
    Local(Arc<dyn LocalConstraint>),
}

/// How a constraint enters each GP approximation.
#[derive(Debug, Clone)]
pub enum Convexity {
    /// GP-compatible as is: each posynomial is `<= 1` and each monomial `= 1`.
    ///
    /// Both lists are empty for a constraint that substitution made trivial.
    AlreadyConvex {
        posynomials: Vec<Posynomial>,
        equalities: Vec<Monomial>,
    },

    /// Needs a monomial approximation of its greater side at each iterate.
    Signomial(SignomialInequality),

    /// Produces its own GP posynomials at each iterate.
    OpaqueExternal(Arc<dyn LocalConstraint>),
}

impl Constraint {
    /// Creates `lhs <= rhs` for a posynomial `lhs` and monomial `rhs`.
    pub fn posynomial(lhs: impl Into<Posynomial>, rhs: impl Into<Monomial>) -> Self {
        Self::Posynomial(PosynomialInequality::new(lhs.into(), rhs.into()))
    }

    /// Creates `lhs = rhs` for monomials.
    pub fn equal(lhs: impl Into<Monomial>, rhs: impl Into<Monomial>) -> Self {
        Self::MonomialEquality(MonomialEquality::new(lhs.into(), rhs.into()))
    }

    /// Creates `lhs <= rhs` for signomials.
    pub fn signomial(lhs: impl Into<Signomial>, rhs: impl Into<Signomial>) -> Self {
        Self::Signomial(SignomialInequality::new(lhs.into(), rhs.into()))
    }

    /// Wraps an opaque local constraint.
    pub fn local(constraint: impl LocalConstraint + 'static) -> Self {
        Self::Local(Arc::new(constraint))
    }

    /// Variables the constraint depends on.
    #[must_use]
    pub fn varkeys(&self) -> BTreeSet<VarKey> {
        match self {
            Self::Posynomial(c) => c.varkeys(),
            Self::MonomialEquality(c) => c.varkeys(),
            Self::Signomial(c) => c.varkeys(),
            Self::Local(c) => c.varkeys(),
        }
    }

    /// Applies substitutions and decides how the constraint enters a GP.
    ///
    /// A signomial inequality whose greater side becomes a single monomial is
    /// already convex. One whose less side becomes empty is trivially met.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyGreaterSide`] for a signomial inequality that
    /// requires a nonempty posynomial to be at most zero.
    pub fn classify(&self, substitutions: &VarMap) -> Result<Convexity, Error> {
        match self {
            Self::Posynomial(c) => Ok(Convexity::convex(
                c.as_gp_posynomial(substitutions),
                None,
            )),
            Self::MonomialEquality(c) => Ok(Convexity::convex(
                Posynomial::default(),
                Some(c.as_gp_monomial(substitutions)),
            )),
            Self::Signomial(c) => {
                let c = c.substitute(substitutions);
                if c.less().is_empty() {
                    return Ok(Convexity::convex(Posynomial::default(), None));
                }
                if c.greater().is_empty() {
                    return Err(Error::EmptyGreaterSide {
                        less: c.less().to_string(),
                    });
                }
                match c.greater().as_monomial() {
                    Some(greater) => Ok(Convexity::convex(c.less() / greater, None)),
                    None => Ok(Convexity::Signomial(c)),
                }
            }
            Self::Local(c) => Ok(Convexity::OpaqueExternal(Arc::clone(c))),
        }
    }
}

impl Convexity {
    fn convex(posynomial: Posynomial, equality: Option<Monomial>) -> Self {
        let posynomials = if posynomial.is_empty() {
            Vec::new()
        } else {
            vec![posynomial]
        };
        Self::AlreadyConvex {
            posynomials,
            equalities: equality.into_iter().collect(),
        }
    }
}

impl From<PosynomialInequality> for Constraint {
    fn from(c: PosynomialInequality) -> Self {
        Self::Posynomial(c)
    }
}

impl From<MonomialEquality> for Constraint {
    fn from(c: MonomialEquality) -> Self {
        Self::MonomialEquality(c)
    }
}

impl From<SignomialInequality> for Constraint {
    fn from(c: SignomialInequality) -> Self {
        Self::Signomial(c)
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Posynomial(c) => write!(f, "{} <= {}", c.lhs(), c.rhs()),
            Self::MonomialEquality(c) => write!(f, "{} = {}", c.lhs(), c.rhs()),
            Self::Signomial(c) => write!(f, "{} <= {}", c.less(), c.greater()),
            Self::Local(c) => write!(f, "{c:?}"),
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

    fn y() -> VarKey {
        VarKey::new("y")
    }

    fn c(value: f64) -> Monomial {
        Monomial::constant(value).unwrap()
    }

    #[test]
    fn posynomial_inequality_divides_by_rhs() {
        let (x, y) = (x(), y());
        let constraint =
            Constraint::posynomial(Posynomial::from(&x), Monomial::var(&y).scaled(2.0).unwrap());

        let Convexity::AlreadyConvex { posynomials, equalities } =
            constraint.classify(&VarMap::new()).unwrap()
        else {
            panic!("expected convex");
        };
        assert!(equalities.is_empty());
        let point = VarMap::from([(x, 4.0), (y, 1.0)]);
        assert_relative_eq!(posynomials[0].eval(&point).unwrap(), 2.0);
    }

    #[test]
    fn equality_becomes_unit_monomial() {
        let (x, y) = (x(), y());
        let constraint = Constraint::equal(&Monomial::var(&x) * &Monomial::var(&y), c(4.0));

        let Convexity::AlreadyConvex { posynomials, equalities } =
            constraint.classify(&VarMap::new()).unwrap()
        else {
            panic!("expected convex");
        };
        assert!(posynomials.is_empty());
        assert_relative_eq!(equalities[0].coeff(), 0.25);
    }

    #[test]
    fn signomial_with_monomial_greater_side_is_convex() {
        let (x, y) = (x(), y());
        // x <= y + 1, which becomes x <= 2 once y = 1.
        let constraint = Constraint::signomial(
            Posynomial::from(&x),
            Posynomial::new([Monomial::var(&y), Monomial::one()]),
        );

        let Convexity::Signomial(_) = constraint.classify(&VarMap::new()).unwrap() else {
            panic!("two-term greater side needs approximation");
        };

        let subs = VarMap::from([(y, 1.0)]);
        let Convexity::AlreadyConvex { posynomials, .. } = constraint.classify(&subs).unwrap()
        else {
            panic!("substitution leaves a monomial greater side");
        };
        assert_relative_eq!(posynomials[0].eval(&VarMap::from([(x, 2.0)])).unwrap(), 1.0);
    }

    #[test]
    fn signomial_with_empty_less_side_is_trivial() {
        let x = x();
        // 1 - x <= 1 holds everywhere.
        let constraint = Constraint::signomial(
            Signomial::from(Monomial::one()) - Signomial::from(Monomial::var(&x)),
            Monomial::one(),
        );

        let Convexity::AlreadyConvex { posynomials, equalities } =
            constraint.classify(&VarMap::new()).unwrap()
        else {
            panic!("expected trivially convex");
        };
        assert!(posynomials.is_empty());
        assert!(equalities.is_empty());
    }

    #[test]
    fn signomial_with_empty_greater_side_is_malformed() {
        let x = x();
        let constraint = Constraint::signomial(Posynomial::from(&x), Signomial::default());
        assert!(matches!(
            constraint.classify(&VarMap::new()),
            Err(Error::EmptyGreaterSide { .. })
        ));
    }

    #[test]
    fn displays_both_sides() {
        let (x, y) = (x(), y());
        let constraint = Constraint::signomial(
            Posynomial::from(&x),
            Posynomial::new([Monomial::var(&y), Monomial::one()]),
        );
        assert_eq!(constraint.to_string(), "x <= y + 1");
    }
}
