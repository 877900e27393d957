use locus_core::Failure;
use nalgebra::{DMatrix, DVector};

/// Newton iterations stop once half the squared decrement is below this,
/// or below the rounding in the objective value if that is larger.
const DECREMENT_TOL: f64 = 1e-10;

/// Below this squared decrement, a full step is taken whenever it stays in
/// the domain. Objective values carry too much rounding there for the
/// sufficient-decrease test to resolve progress.
const FULL_STEP_DECREMENT: f64 = 1e-6;

/// Sufficient-decrease fraction for the backtracking line search.
const ALPHA: f64 = 0.01;

/// Step shrink factor for the backtracking line search.
const BETA: f64 = 0.5;

const MIN_STEP: f64 = 1e-14;

/// Largest move in any coordinate per Newton step.
const MAX_MOVE: f64 = 20.0;

/// Relative size of the first diagonal shift for a singular Hessian.
const REGULARIZATION: f64 = 1e-10;

const MAX_REGULARIZATIONS: usize = 5;

/// Value, gradient, and Hessian of a centering objective.
pub(super) struct Derivatives {
    pub value: f64,
    pub gradient: DVector<f64>,
    pub hessian: DMatrix<f64>,
}

/// Why centering stopped before converging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Halt {
    /// A strictly feasible point was reached.
    Feasible,

    /// The iterate left the region where the program is considered bounded.
    Unbounded,
}

/// A smooth convex objective minimized by damped Newton steps.
pub(super) trait Centering {
    /// Objective value, or `None` outside the barrier domain.
    fn value(&self, x: &DVector<f64>) -> Option<f64>;

    /// Objective derivatives, or `None` outside the barrier domain.
    fn derivatives(&self, x: &DVector<f64>) -> Option<Derivatives>;

    /// Checked after every accepted step.
    fn halt(&self, x: &DVector<f64>) -> Option<Halt>;
}

/// The result of one centering.
pub(super) struct Centered {
    pub x: DVector<f64>,
    pub steps: usize,
    pub halt: Option<Halt>,
}

/// Minimizes `objective` from the strictly feasible point `x`.
pub(super) fn center<C: Centering>(
    objective: &C,
    mut x: DVector<f64>,
    max_steps: usize,
) -> Result<Centered, Failure> {
    let mut decrement = f64::INFINITY;
    for steps in 0..max_steps {
        let Some(local) = objective.derivatives(&x) else {
            return Err(numerical("iterate left the barrier domain"));
        };

        let dx = newton_step(&local.hessian, &local.gradient)?;
        decrement = -local.gradient.dot(&dx);
        if !decrement.is_finite() {
            return Err(numerical("Newton decrement is not finite"));
        }
        if decrement / 2.0 <= DECREMENT_TOL.max(f64::EPSILON * local.value.abs()) {
            return Ok(Centered {
                x,
                steps,
                halt: None,
            });
        }

        let dx = limit_move(dx);
        let slope = local.gradient.dot(&dx);
        let step = line_search(objective, &x, &dx, local.value, slope, decrement)?;
        x.axpy(step, &dx, 1.0);

        if let Some(halt) = objective.halt(&x) {
            return Ok(Centered {
                x,
                steps: steps + 1,
                halt: Some(halt),
            });
        }
    }

    // Full steps near the center only wander within rounding noise.
    if decrement < FULL_STEP_DECREMENT {
        return Ok(Centered {
            x,
            steps: max_steps,
            halt: None,
        });
    }

    Err(Failure::Numerical {
        reason: format!("centering did not converge in {max_steps} Newton steps"),
    })
}

/// Solves `H dx = -g`, shifting the diagonal if `H` is not positive definite.
fn newton_step(hessian: &DMatrix<f64>, gradient: &DVector<f64>) -> Result<DVector<f64>, Failure> {
    let n = hessian.nrows();
    if n == 0 {
        return Ok(DVector::zeros(0));
    }

    #[allow(clippy::cast_precision_loss)]
    let base = REGULARIZATION * (1.0 + hessian.trace().abs() / n as f64);

    let mut shift = 0.0;
    for _ in 0..=MAX_REGULARIZATIONS {
        let mut shifted = hessian.clone();
        for i in 0..n {
            shifted[(i, i)] += shift;
        }
        if let Some(cholesky) = shifted.cholesky() {
            return Ok(-cholesky.solve(gradient));
        }
        shift = if shift > 0.0 { shift * 1e3 } else { base };
    }

    Err(numerical("Hessian is not positive definite"))
}

fn limit_move(dx: DVector<f64>) -> DVector<f64> {
    let largest = dx.amax();
    if largest > MAX_MOVE {
        dx * (MAX_MOVE / largest)
    } else {
        dx
    }
}

fn line_search<C: Centering>(
    objective: &C,
    x: &DVector<f64>,
    dx: &DVector<f64>,
    value: f64,
    slope: f64,
    decrement: f64,
) -> Result<f64, Failure> {
    let mut step = 1.0;
    while step >= MIN_STEP {
        let trial = x + dx * step;
        if let Some(trial_value) = objective.value(&trial) {
            if decrement < FULL_STEP_DECREMENT || trial_value <= value + ALPHA * step * slope {
                return Ok(step);
            }
        }
        step *= BETA;
    }
    Err(numerical("line search found no decrease"))
}

fn numerical(reason: &str) -> Failure {
    Failure::Numerical {
        reason: reason.to_owned(),
    }
}
