use std::sync::Arc;

use locus_core::{GeometricProgram, Monomial, Posynomial, VarKey};

use super::Error;

/// Power of the slack in the relaxed cost.
const SLACK_PENALTY: f64 = 100.0;

/// A relaxed program and the slack variable it introduced.
#[derive(Debug, Clone)]
pub struct Relaxation {
    pub gp: GeometricProgram,
    pub slack: VarKey,
}

/// Relaxes every constraint of `gp` by a shared slack `s >= 1`.
///
/// The relaxed program minimizes `s^100 · cost` subject to `posy / s <= 1`
/// for each constraint posynomial. Each equality `m = 1` becomes the pair
/// `m / s <= 1` and `m⁻¹ / s <= 1`. Any point is feasible for a large enough
/// slack, and the penalty drives the slack back toward 1.
///
/// # Errors
///
/// Returns an error if the relaxed program cannot be assembled.
pub fn relax(gp: &GeometricProgram) -> Result<Relaxation, Error> {
    let slack = VarKey::anonymous("slack");
    let s = Monomial::var(&slack);
    let inv = s.pow(-1.0);

    let mut posynomials = Vec::with_capacity(2 + gp.constraints().len() + 2 * gp.equalities().len());
    posynomials.push(Arc::new(gp.cost() * &s.pow(SLACK_PENALTY)));
    posynomials.push(Arc::new(Posynomial::from(inv.clone())));
    for p in gp.constraints() {
        posynomials.push(Arc::new(&**p * &inv));
    }
    for m in gp.equalities() {
        posynomials.push(Arc::new(Posynomial::from(m * &inv)));
        posynomials.push(Arc::new(Posynomial::from(&m.pow(-1.0) * &inv)));
    }

    let gp = GeometricProgram::from_parts(
        posynomials,
        Vec::new().into(),
        Arc::clone(gp.shared_substitutions()),
        gp.x0().clone(),
    )?;
    Ok(Relaxation { gp, slack })
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use locus_core::{Constraint, SolveOutcome, VarMap};

    use crate::geometric::barrier;

    #[test]
    fn relaxes_every_constraint() {
        let x = VarKey::new("x");
        let y = VarKey::new("y");
        let constraints = [
            Constraint::posynomial(Monomial::var(&x), Monomial::one()),
            Constraint::equal(&Monomial::var(&x) * &Monomial::var(&y), Monomial::one()),
        ];
        let gp = GeometricProgram::new(&Posynomial::from(&x), &constraints, VarMap::new()).unwrap();

        let relaxation = relax(&gp).unwrap();

        // 1/s, x/s, and two for the equality.
        assert_eq!(relaxation.gp.constraints().len(), 4);
        assert!(relaxation.gp.equalities().is_empty());
        assert_eq!(relaxation.gp.cost().terms()[0].exp(&relaxation.slack), 100.0);
        assert!(relaxation.slack.is_anonymous());
    }

    #[test]
    fn restores_contradictory_bounds() {
        // x <= 1 and x >= 2 relax to s >= max(x, 2/x), minimized at x = s = √2.
        let x = VarKey::new("x");
        let constraints = [
            Constraint::posynomial(Monomial::var(&x), Monomial::one()),
            Constraint::posynomial(Monomial::constant(2.0).unwrap(), Monomial::var(&x)),
        ];
        let gp = GeometricProgram::new(&Posynomial::from(&x), &constraints, VarMap::new()).unwrap();
        let Relaxation { gp, slack } = relax(&gp).unwrap();

        let SolveOutcome::Solved(solution) =
            barrier::solve_unobserved(&gp, &barrier::Config::default()).unwrap()
        else {
            panic!("relaxed program should be feasible");
        };

        assert_relative_eq!(solution.primal[&x], 2f64.sqrt(), max_relative = 1e-4);
        assert_relative_eq!(solution.primal[&slack], 2f64.sqrt(), max_relative = 1e-4);
        assert_relative_eq!(solution.cost, 2f64.sqrt().powi(101), max_relative = 1e-6);
    }
}
