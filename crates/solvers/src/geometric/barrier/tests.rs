use approx::assert_relative_eq;

use locus_core::{
    Constraint, Failure, GeometricProgram, GpSolution, GpSolver, Monomial, Posynomial,
    SolveOutcome, VarKey, VarMap,
};

use super::{Action, Barrier, Config, ConfigError, Event, Phase, solve, solve_unobserved};

fn keys() -> (VarKey, VarKey) {
    (VarKey::new("x"), VarKey::new("y"))
}

fn c(value: f64) -> Monomial {
    Monomial::constant(value).unwrap()
}

/// `2/x <= 1`.
fn two_over_x_at_most_one(x: &VarKey) -> Constraint {
    Constraint::posynomial(Monomial::var(x).pow(-1.0).scaled(2.0).unwrap(), Monomial::one())
}

fn solved(outcome: SolveOutcome) -> GpSolution {
    match outcome {
        SolveOutcome::Solved(solution) => solution,
        SolveOutcome::Infeasible(failure) => panic!("expected a solution, got {failure}"),
    }
}

fn failure(outcome: SolveOutcome) -> Failure {
    match outcome {
        SolveOutcome::Solved(solution) => panic!("expected a failure, got cost {}", solution.cost),
        SolveOutcome::Infeasible(failure) => failure,
    }
}

#[test]
fn minimizes_unconstrained_posynomial() {
    // x + 1/x has its minimum 2 at x = 1.
    let (x, _) = keys();
    let cost = Posynomial::new([Monomial::var(&x), Monomial::var(&x).pow(-1.0)]);
    let gp = GeometricProgram::new(&cost, &[], VarMap::new()).unwrap();

    let solution = solved(solve_unobserved(&gp, &Config::default()).unwrap());

    assert_relative_eq!(solution.cost, 2.0, epsilon = 1e-8);
    assert_relative_eq!(solution.primal[&x], 1.0, epsilon = 1e-4);
    assert_eq!(solution.solver, "barrier");
    assert!(solution.sensitivities.is_empty());
}

#[test]
fn pushes_against_upper_bounds() {
    // min 1/(x·y) with x <= 2 and y <= 3.
    let (x, y) = keys();
    let cost = (&Monomial::var(&x) * &Monomial::var(&y)).pow(-1.0);
    let constraints = [
        Constraint::posynomial(Monomial::var(&x), c(2.0)),
        Constraint::posynomial(Monomial::var(&y), c(3.0)),
    ];
    let gp = GeometricProgram::new(&Posynomial::from(cost), &constraints, VarMap::new()).unwrap();

    let solution = solved(Barrier::default().solve(&gp).unwrap());

    assert_relative_eq!(solution.cost, 1.0 / 6.0, max_relative = 1e-7);
    assert_relative_eq!(solution.primal[&x], 2.0, max_relative = 1e-7);
    assert_relative_eq!(solution.primal[&y], 3.0, max_relative = 1e-7);
    assert_relative_eq!(solution.sensitivities[0], 1.0, epsilon = 1e-6);
    assert_relative_eq!(solution.sensitivities[1], 1.0, epsilon = 1e-6);
}

#[test]
fn sensitivity_of_active_constraint() {
    // min x with 2/x <= 1: x = 2 and the constraint's dual is 1.
    let (x, _) = keys();
    let constraint = two_over_x_at_most_one(&x);
    let gp = GeometricProgram::new(&Posynomial::from(&x), &[constraint], VarMap::new()).unwrap();

    let solution = solved(solve_unobserved(&gp, &Config::default()).unwrap());

    assert_relative_eq!(solution.cost, 2.0, max_relative = 1e-7);
    assert_relative_eq!(solution.sensitivities[0], 1.0, epsilon = 1e-6);
}

#[test]
fn honors_monomial_equalities() {
    // min x + y with x·y = 4.
    let (x, y) = keys();
    let cost = Posynomial::new([Monomial::var(&x), Monomial::var(&y)]);
    let constraints = [Constraint::equal(&Monomial::var(&x) * &Monomial::var(&y), c(4.0))];
    let gp = GeometricProgram::new(&cost, &constraints, VarMap::new()).unwrap();

    let solution = solved(solve_unobserved(&gp, &Config::default()).unwrap());

    assert_relative_eq!(solution.cost, 4.0, max_relative = 1e-8);
    assert_relative_eq!(solution.primal[&x], 2.0, max_relative = 1e-4);
    assert_relative_eq!(solution.primal[&y], 2.0, max_relative = 1e-4);
}

#[test]
fn detects_infeasibility() {
    // x <= 1 and x >= 2.
    let (x, _) = keys();
    let constraints = [
        Constraint::posynomial(Monomial::var(&x), Monomial::one()),
        Constraint::posynomial(c(2.0), Monomial::var(&x)),
    ];
    let gp = GeometricProgram::new(&Posynomial::from(&x), &constraints, VarMap::new()).unwrap();

    let failure = failure(solve_unobserved(&gp, &Config::default()).unwrap());

    let Failure::Infeasible {
        phase_one_objective,
    } = failure
    else {
        panic!("expected infeasible, got {failure}");
    };
    assert!(phase_one_objective > 0.0);
}

#[test]
fn detects_unboundedness() {
    // min x with x <= 1 drives x toward zero.
    let (x, _) = keys();
    let constraints = [Constraint::posynomial(Monomial::var(&x), Monomial::one())];
    let gp = GeometricProgram::new(&Posynomial::from(&x), &constraints, VarMap::new()).unwrap();

    let failure = failure(solve_unobserved(&gp, &Config::default()).unwrap());
    assert_eq!(failure, Failure::Unbounded);
}

#[test]
fn warm_start_reaches_same_optimum() {
    let (x, y) = keys();
    let cost = (&Monomial::var(&x) * &Monomial::var(&y)).pow(-1.0);
    let constraints = [
        Constraint::posynomial(Monomial::var(&x), c(2.0)),
        Constraint::posynomial(Monomial::var(&y), c(3.0)),
    ];
    let cold = GeometricProgram::new(&Posynomial::from(cost), &constraints, VarMap::new()).unwrap();
    let warm = cold
        .splice([], VarMap::from([(x.clone(), 1.9), (y.clone(), 2.9)]))
        .unwrap();

    let cold = solved(solve_unobserved(&cold, &Config::default()).unwrap());
    let warm = solved(solve_unobserved(&warm, &Config::default()).unwrap());

    assert_relative_eq!(cold.cost, warm.cost, max_relative = 1e-7);
}

#[test]
fn observer_sees_both_phases() {
    // Starting at x = 1 violates 2/x <= 1, so a feasibility phase runs first.
    let (x, _) = keys();
    let constraint = two_over_x_at_most_one(&x);
    let gp = GeometricProgram::new(&Posynomial::from(&x), &[constraint], VarMap::new()).unwrap();

    let mut phases = Vec::new();
    let observer = |event: &Event| -> Option<Action> {
        phases.push(event.phase);
        None
    };
    solved(solve(&gp, &Config::default(), observer).unwrap());

    assert_eq!(phases.first(), Some(&Phase::Feasibility));
    assert_eq!(phases.last(), Some(&Phase::Optimality));
}

#[test]
fn stop_early_returns_current_point() {
    let (x, _) = keys();
    let cost = Posynomial::new([Monomial::var(&x), Monomial::var(&x).pow(-1.0)]);
    let constraint = Constraint::posynomial(Monomial::var(&x), c(10.0));
    let gp = GeometricProgram::new(&cost, &[constraint], VarMap::new()).unwrap();

    let mut events = 0;
    let observer = |event: &Event| {
        events += 1;
        (event.phase == Phase::Optimality).then_some(Action::StopEarly)
    };
    let solution = solved(solve(&gp, &Config::default(), observer).unwrap());

    assert_eq!(events, 1);
    // The first centering with t = 1 is not yet optimal.
    assert!(solution.cost > 2.0);
}

#[test]
fn stop_early_during_feasibility_interrupts() {
    let (x, _) = keys();
    let constraint = two_over_x_at_most_one(&x);
    let gp = GeometricProgram::new(&Posynomial::from(&x), &[constraint], VarMap::new()).unwrap();

    let observer = |_: &Event| Some(Action::StopEarly);
    let failure = failure(solve(&gp, &Config::default(), observer).unwrap());
    assert_eq!(failure, Failure::Interrupted);
}

#[test]
fn fully_substituted_program_is_evaluated() {
    let (x, _) = keys();
    let constraints = [Constraint::posynomial(Monomial::var(&x), c(2.0))];
    let gp = GeometricProgram::new(
        &Posynomial::from(&x),
        &constraints,
        VarMap::from([(x, 1.5)]),
    )
    .unwrap();

    let solution = solved(solve_unobserved(&gp, &Config::default()).unwrap());
    assert_relative_eq!(solution.cost, 1.5, epsilon = 1e-12);
    assert!(solution.primal.is_empty());
    assert_eq!(solution.sensitivities, [0.0]);
}

#[test]
fn config_validation() {
    assert_eq!(Config::new(10, 10, 0.0), Err(ConfigError::GapTol));
    assert_eq!(Config::new(10, 10, f64::NAN), Err(ConfigError::GapTol));
    assert_eq!(Config::new(10, 0, 1e-6), Err(ConfigError::NewtonSteps));
    assert!(Config::new(10, 10, 1e-6).is_ok());
}
