/// Errors that can occur during a barrier solve.
///
/// Infeasible, unbounded, and numerically difficult programs are not errors.
/// They are reported through [`SolveOutcome::Infeasible`].
///
/// [`SolveOutcome::Infeasible`]: locus_core::SolveOutcome::Infeasible
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("coefficient {coeff} is not positive and finite")]
    InvalidCoefficient { coeff: f64 },
}
