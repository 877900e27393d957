use locus_core::{Failure, GeometricProgram, GpSolution};

/// One step of a signomial solve: the GP approximation and how it was solved.
#[derive(Debug, Clone)]
pub struct Iteration {
    pub gp: GeometricProgram,
    pub outcome: IterationOutcome,
}

#[derive(Debug, Clone)]
pub enum IterationOutcome {
    /// The approximation solved directly.
    Solved(GpSolution),

    /// The approximation failed and its relaxation was solved instead.
    Restored {
        /// Why the approximation failed.
        failure: Failure,

        /// The relaxed program that was solved.
        relaxed: GeometricProgram,

        /// Solution of `relaxed`, with the slack removed from its primal.
        solution: GpSolution,

        /// Optimal slack value.
        slack: f64,
    },
}

impl Iteration {
    /// The accepted result, whose primal seeds the next iteration.
    #[must_use]
    pub fn result(&self) -> &GpSolution {
        match &self.outcome {
            IterationOutcome::Solved(solution) | IterationOutcome::Restored { solution, .. } => {
                solution
            }
        }
    }

    /// The cost, if it is comparable with other iterations.
    ///
    /// A restored cost carries the slack penalty and is never comparable.
    #[must_use]
    pub fn comparable_cost(&self) -> Option<f64> {
        match &self.outcome {
            IterationOutcome::Solved(solution) => Some(solution.cost),
            IterationOutcome::Restored { .. } => None,
        }
    }

    #[must_use]
    pub fn is_restored(&self) -> bool {
        matches!(self.outcome, IterationOutcome::Restored { .. })
    }

    /// GP solves this iteration took.
    #[must_use]
    pub fn gp_solves(&self) -> usize {
        match self.outcome {
            IterationOutcome::Solved(_) => 1,
            IterationOutcome::Restored { .. } => 2,
        }
    }
}
