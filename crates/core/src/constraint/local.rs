use std::{collections::BTreeSet, fmt::Debug};

use crate::{Error, Posynomial, VarKey, VarMap};

/// A constraint that can only be expressed locally, about a point.
///
/// Implementations return GP posynomials, each meant as `posynomial <= 1`,
/// that approximate the constraint near `x0`. The point holds a value for
/// every variable the problem knows about, including substituted ones.
/// Substitutions are applied to the returned posynomials afterwards.
pub trait LocalConstraint: Debug + Send + Sync {
    /// Variables the constraint depends on.
    fn varkeys(&self) -> BTreeSet<VarKey>;

    /// GP posynomials approximating the constraint about `x0`.
    ///
    /// # Errors
    ///
    /// Returns an error if the approximation cannot be formed at `x0`.
    fn as_gp_posynomials(&self, x0: &VarMap) -> Result<Vec<Posynomial>, Error>;
}
