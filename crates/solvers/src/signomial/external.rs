use locus_core::{Constraint, VarKey, VarMap};

/// Produces a constraint on an externally computed variable.
///
/// Called once per iteration with the approximation point. The returned
/// constraint is classified and approximated like any other and joins that
/// iteration's GP only. Typical implementations fit a monomial to a black-box
/// model at `x0` and bound the external variable by it.
///
/// Closures `Fn(&VarKey, &VarMap) -> Result<Constraint, _>` implement this.
pub trait ExternalFunction {
    /// Returns the constraint on `key` about `x0`.
    ///
    /// # Errors
    ///
    /// Returns an error if the model behind the function fails at `x0`.
    fn constraint(
        &self,
        key: &VarKey,
        x0: &VarMap,
    ) -> Result<Constraint, Box<dyn std::error::Error + Send + Sync>>;
}

impl<F> ExternalFunction for F
where
    F: Fn(&VarKey, &VarMap) -> Result<Constraint, Box<dyn std::error::Error + Send + Sync>>,
{
    fn constraint(
        &self,
        key: &VarKey,
        x0: &VarMap,
    ) -> Result<Constraint, Box<dyn std::error::Error + Send + Sync>> {
        self(key, x0)
    }
}
