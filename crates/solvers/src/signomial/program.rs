use std::{collections::BTreeMap, time::Instant};

use locus_core::{
    Constraint, GeometricProgram, GpSolver, Observer, Signomial, SolveOutcome, VarKey, VarMap,
    check_values,
};
use tracing::{debug, info, warn};

use super::{
    Action, Assembler, Config, Error, Event, ExternalFunction, Iteration, IterationOutcome,
    Solution, Status,
    restorer::{Relaxation, relax},
};

/// A signomial program: minimize a posynomial cost subject to signomial
/// constraints, solved locally by a sequence of GP approximations.
///
/// The program keeps every iteration of its last solve for inspection, even
/// when that solve failed.
pub struct SignomialProgram {
    assembler: Assembler,
    externals: BTreeMap<VarKey, Box<dyn ExternalFunction>>,
    skeleton: Option<GeometricProgram>,
    history: Vec<Iteration>,
    solution: Option<Solution>,
}

/// Collects the parts of a [`SignomialProgram`].
pub struct Builder {
    cost: Signomial,
    constraints: Vec<Constraint>,
    substitutions: VarMap,
    externals: BTreeMap<VarKey, Box<dyn ExternalFunction>>,
}

impl Builder {
    #[must_use]
    pub fn constraint(mut self, constraint: impl Into<Constraint>) -> Self {
        self.constraints.push(constraint.into());
        self
    }

    #[must_use]
    pub fn constraints(mut self, constraints: impl IntoIterator<Item = Constraint>) -> Self {
        self.constraints.extend(constraints);
        self
    }

    /// Fixes `key` to `value` in every approximation.
    #[must_use]
    pub fn substitute(mut self, key: VarKey, value: f64) -> Self {
        self.substitutions.insert(key, value);
        self
    }

    /// Registers the function that constrains the external variable `key`.
    #[must_use]
    pub fn external_function(
        mut self,
        key: VarKey,
        function: impl ExternalFunction + 'static,
    ) -> Self {
        self.externals.insert(key, Box::new(function));
        self
    }

    /// Classifies the constraints and, when the GP layout is fixed, builds
    /// the first approximation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NonPosynomialObjective`] if the cost has a negative
    /// term, and [`Error::MissingExternalFunction`] if a variable marked
    /// external has no registered function. Malformed constraints and
    /// invalid substitutions are reported as [`Error::Core`].
    pub fn build(self) -> Result<SignomialProgram, Error> {
        let cost = self
            .cost
            .to_posynomial()
            .map_err(|_| Error::NonPosynomialObjective)?;
        let assembler = Assembler::new(&cost, &self.constraints, self.substitutions)?;

        if let Some(key) = assembler
            .varkeys()
            .iter()
            .find(|key| key.is_external() && !self.externals.contains_key(*key))
        {
            return Err(Error::MissingExternalFunction { key: key.clone() });
        }

        let skeleton = if self.externals.is_empty() && assembler.has_fixed_layout() {
            Some(assembler.build(assembler.fill_x0(&VarMap::new()), &[])?)
        } else {
            None
        };

        Ok(SignomialProgram {
            assembler,
            externals: self.externals,
            skeleton,
            history: Vec::new(),
            solution: None,
        })
    }
}

impl SignomialProgram {
    /// Starts building a program that minimizes `cost`.
    pub fn builder(cost: impl Into<Signomial>) -> Builder {
        Builder {
            cost: cost.into(),
            constraints: Vec::new(),
            substitutions: VarMap::new(),
            externals: BTreeMap::new(),
        }
    }

    /// Creates a program without substitutions or external functions.
    ///
    /// # Errors
    ///
    /// See [`Builder::build`].
    pub fn new(
        cost: impl Into<Signomial>,
        constraints: impl IntoIterator<Item = Constraint>,
    ) -> Result<Self, Error> {
        Self::builder(cost).constraints(constraints).build()
    }

    /// Whether a single GP solve is exact for this program.
    #[must_use]
    pub fn is_exact(&self) -> bool {
        self.assembler.is_exact() && self.externals.is_empty()
    }

    #[must_use]
    pub fn assembler(&self) -> &Assembler {
        &self.assembler
    }

    /// Iterations of the last solve, in order.
    #[must_use]
    pub fn history(&self) -> &[Iteration] {
        &self.history
    }

    /// Solution of the last successful solve.
    #[must_use]
    pub fn result(&self) -> Option<&Solution> {
        self.solution.as_ref()
    }

    /// Locally solves the program.
    ///
    /// Each iteration approximates the program as a GP about the previous
    /// primal, or about `x0` and the variables' hints at first. A GP that
    /// turns out infeasible is relaxed and the relaxation solved instead.
    /// Iteration stops once the relative cost improvement between two solved
    /// iterations is at most `reltol`.
    ///
    /// The observer receives an [`Event`] after each iteration and can return
    /// [`Action::StopEarly`] to finish with that iteration's result.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IterationLimit`] once the GP solves exceed the
    /// configured limit, and [`Error::RestorationFailed`] with the failed
    /// approximation if its relaxation fails too. Solver, approximation, and external function errors are
    /// propagated. The iterations so far stay available through
    /// [`history`](Self::history).
    pub fn localsolve<S, Obs>(
        &mut self,
        solver: &S,
        x0: Option<&VarMap>,
        config: &Config,
        mut observer: Obs,
    ) -> Result<&Solution, Error>
    where
        S: GpSolver,
        Obs: for<'a> Observer<Event<'a>, Action>,
    {
        let start = Instant::now();
        let verbosity = config.verbosity();
        self.history.clear();
        self.solution = None;

        let overrides = x0.cloned().unwrap_or_default();
        check_values(&overrides)?;
        if verbosity > 0 {
            info!(
                variables = self.assembler.varkeys().len(),
                exact = self.is_exact(),
                "beginning signomial solve"
            );
        }

        let mutate = config.mutate_gp() && self.skeleton.is_some();
        let mut next = if !mutate {
            None
        } else if x0.is_some() {
            Some(
                self.assembler
                    .build(self.assembler.fill_x0(&overrides), &[])?,
            )
        } else {
            self.skeleton.clone()
        };

        let mut point = overrides;
        let mut gp_solves = 0;
        let mut prev_cost: Option<f64> = None;

        let solution = loop {
            if gp_solves > config.iteration_limit() {
                if verbosity > 0 {
                    warn!(gp_solves, "signomial solve hit the iteration limit");
                }
                return Err(Error::IterationLimit { gp_solves });
            }

            let gp = match next.take() {
                Some(gp) => gp,
                None => self.approximate(&point, mutate)?,
            };
            let outcome = match solver.solve(&gp).map_err(|e| Error::Solver(Box::new(e)))? {
                SolveOutcome::Solved(solution) => IterationOutcome::Solved(solution),
                SolveOutcome::Infeasible(failure) => {
                    if verbosity > 0 {
                        warn!(%failure, "GP approximation failed, restoring feasibility");
                    }
                    restore(solver, &gp, failure)?
                }
            };
            let iteration = Iteration { gp, outcome };
            let iters = self.history.len() + 1;

            gp_solves += iteration.gp_solves();
            let cost = iteration.comparable_cost();
            let rel_improvement = match (prev_cost, cost) {
                (Some(prev), Some(cost)) => Some((prev - cost).abs() / (prev + cost)),
                _ => None,
            };
            prev_cost = cost;
            point.clone_from(&iteration.result().primal);

            if verbosity > 1 {
                debug!(
                    iteration = iters,
                    gp_solves,
                    cost,
                    rel_improvement,
                    restored = iteration.is_restored(),
                    "signomial iteration"
                );
            }

            let event = Event {
                iteration: iters,
                gp_solves,
                cost,
                rel_improvement,
                result: iteration.result(),
                restored: iteration.is_restored(),
            };
            let status = if let Some(Action::StopEarly) = observer.observe(&event) {
                Some(Status::StoppedByObserver)
            } else if self.is_exact() {
                cost.map(|_| Status::Converged)
            } else {
                rel_improvement
                    .is_some_and(|r| r <= config.reltol())
                    .then_some(Status::Converged)
            };

            let finished = status.map(|status| Solution {
                status,
                result: iteration.result().clone(),
                cost,
                rel_improvement,
                soltime: start.elapsed(),
                gp_solves,
                iters,
            });
            self.history.push(iteration);
            if let Some(solution) = finished {
                break solution;
            }
        };

        if verbosity > 0 {
            info!(
                gp_solves,
                iters = solution.iters,
                soltime = ?solution.soltime,
                status = ?solution.status,
                "signomial solve finished"
            );
        }

        Ok(&*self.solution.insert(solution))
    }

    /// Locally solves the program without observer support.
    ///
    /// This is a convenience wrapper around [`localsolve`](Self::localsolve)
    /// that uses a no-op observer.
    ///
    /// # Errors
    ///
    /// See [`localsolve`](Self::localsolve).
    pub fn localsolve_unobserved<S: GpSolver>(
        &mut self,
        solver: &S,
        x0: Option<&VarMap>,
        config: &Config,
    ) -> Result<&Solution, Error> {
        self.localsolve(solver, x0, config, ())
    }

    /// The GP approximation about the previous primal `point`.
    fn approximate(&self, point: &VarMap, mutate: bool) -> Result<GeometricProgram, Error> {
        match self.history.last() {
            Some(last) if mutate => self.assembler.relinearize(&last.gp, point),
            _ => {
                let x0 = self.assembler.fill_x0(point);
                let extra = self
                    .externals
                    .iter()
                    .map(|(key, function)| {
                        function
                            .constraint(key, &x0)
                            .map_err(|source| Error::ExternalFunction {
                                key: key.clone(),
                                source,
                            })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                self.assembler.build(x0, &extra)
            }
        }
    }
}

/// Solves the relaxation of a failed approximation.
fn restore<S: GpSolver>(
    solver: &S,
    gp: &GeometricProgram,
    failure: locus_core::Failure,
) -> Result<IterationOutcome, Error> {
    let Relaxation { gp: relaxed, slack } = relax(gp)?;
    match solver
        .solve(&relaxed)
        .map_err(|e| Error::Solver(Box::new(e)))?
    {
        SolveOutcome::Solved(mut solution) => {
            // The slack appears in every relaxed constraint, so it is never
            // eliminated from the primal.
            let slack = solution.primal.remove(&slack).unwrap_or(1.0);
            Ok(IterationOutcome::Restored {
                failure,
                relaxed,
                solution,
                slack,
            })
        }
        SolveOutcome::Infeasible(failure) => Err(Error::RestorationFailed {
            failure,
            approximation: Box::new(gp.clone()),
        }),
    }
}
