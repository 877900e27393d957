use locus_core::{Failure, GeometricProgram, VarKey};

/// Errors that can occur while building or solving a signomial program.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(
        "signomial programs need a posynomial objective; to minimize a signomial s, \
         minimize a new variable z subject to z >= s"
    )]
    NonPosynomialObjective,

    #[error("variable `{key}` is marked external but has no external function")]
    MissingExternalFunction { key: VarKey },

    #[error(
        "problem unsolved after {gp_solves} GP solves; the last result is in the \
         history, and a higher iteration limit may let it converge"
    )]
    IterationLimit { gp_solves: usize },

    /// The relaxation of `approximation` could not be solved either.
    #[error("feasibility restoration failed: {failure}")]
    RestorationFailed {
        failure: Failure,
        approximation: Box<GeometricProgram>,
    },

    #[error("program does not have this problem's slot layout")]
    SkeletonMismatch,

    #[error(transparent)]
    Core(#[from] locus_core::Error),

    #[error("GP solver error: {0}")]
    Solver(Box<dyn std::error::Error + Send + Sync>),

    #[error("external function for `{key}` failed: {source}")]
    ExternalFunction {
        key: VarKey,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}
