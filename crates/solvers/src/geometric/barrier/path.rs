use locus_core::{Failure, GeometricProgram, GpSolution, Observer, SolveOutcome};
use nalgebra::DVector;
use tracing::trace;

use super::{
    Action, Config, Error, Event, Phase,
    centering::{PhaseOne, PhaseTwo},
    newton::{Halt, center},
    reduce::Reduced,
};

/// Barrier parameter growth per outer iteration.
const MU: f64 = 20.0;

/// Initial barrier parameter of each phase.
const T0: f64 = 1.0;

pub(super) const SOLVER_NAME: &str = "barrier";

/// A point on the optimality central path.
struct Central {
    z: DVector<f64>,
    t: f64,
    newton_steps: usize,
}

/// Follows the central path of `gp` to its optimum.
pub(super) fn follow<Obs>(
    gp: &GeometricProgram,
    config: &Config,
    mut observer: Obs,
) -> Result<SolveOutcome, Error>
where
    Obs: Observer<Event, Action>,
{
    let form = gp.standard_form();
    let reduced = match Reduced::new(form)? {
        Ok(reduced) => reduced,
        Err(failure) => return Ok(SolveOutcome::Infeasible(failure)),
    };

    let warm: DVector<f64> = DVector::from_iterator(
        form.vars().len(),
        form.vars().iter().map(|key| {
            gp.x0()
                .get(key)
                .filter(|v| v.is_finite() && **v > 0.0)
                .map_or(0.0, |v| v.ln())
        }),
    );
    let z0 = reduced.project(&warm);

    let central = phase_one(&reduced, z0, config, &mut observer)
        .and_then(|z| phase_two(&reduced, z, config, &mut observer));
    let central = match central {
        Ok(central) => central,
        Err(failure) => return Ok(SolveOutcome::Infeasible(failure)),
    };

    let y = reduced.lift(&central.z);
    let primal = form
        .vars()
        .iter()
        .cloned()
        .zip(y.iter().map(|yi| yi.exp()))
        .collect();

    let mut sensitivities = vec![0.0; reduced.slots];
    for c in &reduced.constraints {
        sensitivities[c.slot] = 1.0 / (central.t * -c.g.value(&central.z));
    }

    Ok(SolveOutcome::Solved(GpSolution {
        primal,
        cost: reduced.cost.value(&central.z).exp(),
        sensitivities,
        solver: SOLVER_NAME.to_owned(),
        iterations: central.newton_steps,
    }))
}

/// Finds a strictly feasible reduced point, starting from `z0`.
fn phase_one<Obs>(
    reduced: &Reduced,
    z0: DVector<f64>,
    config: &Config,
    observer: &mut Obs,
) -> Result<DVector<f64>, Failure>
where
    Obs: Observer<Event, Action>,
{
    let worst = reduced.worst_constraint(&z0);
    if worst < 0.0 {
        return Ok(z0);
    }

    let r = reduced.dim();
    #[allow(clippy::cast_precision_loss)]
    let m = reduced.constraints.len() as f64;
    let mut v = DVector::from_fn(r + 1, |i, _| if i < r { z0[i] } else { worst + 1.0 });
    let mut t = T0;

    for outer in 1..=config.max_iters() {
        let centered = center(&PhaseOne { reduced, t }, v, config.max_newton_steps())?;
        v = centered.x;
        let s = v[r];
        let gap = m / t;

        trace!(outer, t, s, gap, "feasibility centering");
        let event = Event {
            phase: Phase::Feasibility,
            outer,
            t,
            objective: s,
            gap,
            newton_steps: centered.steps,
        };
        if let Some(Action::StopEarly) = observer.observe(&event) {
            return Err(Failure::Interrupted);
        }

        if centered.halt == Some(Halt::Feasible) || s < 0.0 {
            return Ok(v.rows(0, r).into_owned());
        }
        if centered.halt == Some(Halt::Unbounded) || s - gap > 0.0 || gap <= config.gap_tol() {
            return Err(Failure::Infeasible {
                phase_one_objective: s,
            });
        }
        t *= MU;
    }

    Err(Failure::Numerical {
        reason: format!(
            "no feasible point found in {} barrier iterations",
            config.max_iters()
        ),
    })
}

/// Minimizes the cost from the strictly feasible point `z`.
fn phase_two<Obs>(
    reduced: &Reduced,
    mut z: DVector<f64>,
    config: &Config,
    observer: &mut Obs,
) -> Result<Central, Failure>
where
    Obs: Observer<Event, Action>,
{
    #[allow(clippy::cast_precision_loss)]
    let m = reduced.constraints.len() as f64;
    let mut t = T0;
    let mut newton_steps = 0;

    for outer in 1..=config.max_iters() {
        let centered = center(&PhaseTwo { reduced, t }, z, config.max_newton_steps())?;
        z = centered.x;
        newton_steps += centered.steps;
        if centered.halt == Some(Halt::Unbounded) {
            return Err(Failure::Unbounded);
        }

        let gap = m / t;
        let cost = reduced.cost.value(&z).exp();
        trace!(outer, t, cost, gap, "optimality centering");
        let event = Event {
            phase: Phase::Optimality,
            outer,
            t,
            objective: cost,
            gap,
            newton_steps: centered.steps,
        };
        let stop = matches!(observer.observe(&event), Some(Action::StopEarly));

        if stop || gap <= config.gap_tol() {
            return Ok(Central { z, t, newton_steps });
        }
        t *= MU;
    }

    Err(Failure::Numerical {
        reason: format!(
            "duality gap still above {} after {} barrier iterations",
            config.gap_tol(),
            config.max_iters()
        ),
    })
}
