use locus_core::{Failure, SparseExponents, StandardForm};
use nalgebra::{DMatrix, DVector, SymmetricEigen};

use super::{Error, log_sum_exp::LogSumExp};

/// Singular values below this are treated as zero when solving equalities.
const PINV_EPS: f64 = 1e-12;

/// Relative eigenvalue size below which a direction is in the null space.
const NULL_TOL: f64 = 1e-10;

/// Residual above which the equalities are inconsistent.
const EQUALITY_TOL: f64 = 1e-8;

/// A constant constraint is violated if its log value exceeds this.
const CONSTANT_TOL: f64 = 1e-9;

/// A program restricted to the affine set of its monomial equalities.
///
/// Log-space variables are `y = y_p + N z`, where `y_p` satisfies every
/// equality and the columns of `N` span their null space. The solver works in
/// the reduced variables `z`.
#[derive(Debug)]
pub(super) struct Reduced {
    y_p: DVector<f64>,
    basis: DMatrix<f64>,
    pub cost: LogSumExp,
    pub constraints: Vec<Active>,
    pub slots: usize,
}

/// A constraint that takes part in the barrier.
#[derive(Debug)]
pub(super) struct Active {
    /// Index among the program's constraint slots.
    pub slot: usize,
    pub g: LogSumExp,
}

impl Reduced {
    /// Eliminates the equalities of `form` and sorts its constraints.
    ///
    /// Empty constraints and constraints that do not depend on `z` are
    /// checked once and left out of the barrier. The inner `Err` holds the
    /// failure when the program is already known to be infeasible.
    pub fn new(form: &StandardForm) -> Result<Result<Self, Failure>, Error> {
        if let Some(&coeff) = form
            .cs()
            .iter()
            .chain(form.eq_cs())
            .find(|c| !c.is_finite() || **c <= 0.0)
        {
            return Err(Error::InvalidCoefficient { coeff });
        }

        let n = form.vars().len();
        let (y_p, basis) = match affine_set(form, n) {
            Ok(set) => set,
            Err(failure) => return Ok(Err(failure)),
        };

        let log_posynomial = |i: usize| {
            let rows = form.rows(i);
            let mut a = DMatrix::<f64>::zeros(rows.len(), n);
            let mut b = DVector::<f64>::zeros(rows.len());
            for (local, row) in rows.enumerate() {
                fill_row(&mut a, local, &form.exps()[row]);
                b[local] = form.cs()[row].ln();
            }
            let b = b + &a * &y_p;
            LogSumExp::new(a * &basis, b)
        };

        let cost = log_posynomial(0);
        let slots = form.k().len() - 1;
        let mut constraints = Vec::new();
        for slot in 0..slots {
            if form.k()[slot + 1] == 0 {
                continue;
            }
            let g = log_posynomial(slot + 1);
            if g.is_constant() {
                let value = g.value(&DVector::zeros(basis.ncols()));
                if value > CONSTANT_TOL {
                    return Ok(Err(Failure::Infeasible {
                        phase_one_objective: value,
                    }));
                }
                continue;
            }
            constraints.push(Active { slot, g });
        }

        Ok(Ok(Self {
            y_p,
            basis,
            cost,
            constraints,
            slots,
        }))
    }

    /// Dimension of the reduced space.
    pub fn dim(&self) -> usize {
        self.basis.ncols()
    }

    /// Maps log-space variables to the nearest reduced point.
    pub fn project(&self, y: &DVector<f64>) -> DVector<f64> {
        self.basis.tr_mul(&(y - &self.y_p))
    }

    /// Maps reduced variables back to log space.
    pub fn lift(&self, z: &DVector<f64>) -> DVector<f64> {
        &self.y_p + &self.basis * z
    }

    /// Largest constraint value at `z`, or `-inf` without constraints.
    pub fn worst_constraint(&self, z: &DVector<f64>) -> f64 {
        self.constraints
            .iter()
            .map(|c| c.g.value(z))
            .fold(f64::NEG_INFINITY, f64::max)
    }
}

fn fill_row(matrix: &mut DMatrix<f64>, row: usize, exps: &SparseExponents) {
    for &(j, exp) in exps {
        matrix[(row, j)] = exp;
    }
}

fn max_abs(v: &DVector<f64>) -> f64 {
    v.iter().fold(0.0, |max, x| max.max(x.abs()))
}

/// Particular solution and null-space basis of the equality system.
fn affine_set(form: &StandardForm, n: usize) -> Result<(DVector<f64>, DMatrix<f64>), Failure> {
    let m = form.eq_cs().len();
    if m == 0 {
        return Ok((DVector::zeros(n), DMatrix::identity(n, n)));
    }

    let mut e = DMatrix::<f64>::zeros(m, n);
    let rhs = DVector::from_iterator(m, form.eq_cs().iter().map(|c| -c.ln()));
    for (i, exps) in form.eq_exps().iter().enumerate() {
        fill_row(&mut e, i, exps);
    }

    if n == 0 {
        let residual = max_abs(&rhs);
        if residual > EQUALITY_TOL {
            return Err(Failure::Infeasible {
                phase_one_objective: residual,
            });
        }
        return Ok((DVector::zeros(0), DMatrix::zeros(0, 0)));
    }

    let pinv = e
        .clone()
        .pseudo_inverse(PINV_EPS)
        .map_err(|reason| Failure::Numerical {
            reason: reason.to_owned(),
        })?;
    let y_p = pinv * &rhs;

    let residual = max_abs(&(&e * &y_p - &rhs));
    if residual > EQUALITY_TOL * (1.0 + max_abs(&rhs)) {
        return Err(Failure::Infeasible {
            phase_one_objective: residual,
        });
    }

    let eigen = SymmetricEigen::new(e.tr_mul(&e));
    let scale = max_abs(&eigen.eigenvalues).max(1.0);
    let columns: Vec<DVector<f64>> = eigen
        .eigenvalues
        .iter()
        .zip(eigen.eigenvectors.column_iter())
        .filter(|(lambda, _)| lambda.abs() <= NULL_TOL * scale)
        .map(|(_, v)| v.into_owned())
        .collect();

    let basis = if columns.is_empty() {
        DMatrix::zeros(n, 0)
    } else {
        DMatrix::from_columns(&columns)
    };
    Ok((y_p, basis))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use approx::assert_relative_eq;
    use locus_core::{Monomial, Posynomial, VarKey};

    fn form(posynomials: Vec<Posynomial>, equalities: &[Monomial]) -> StandardForm {
        let slots: Vec<_> = posynomials.into_iter().map(Arc::new).collect();
        locus_core::GeometricProgram::from_parts(
            slots,
            equalities.into(),
            Arc::default(),
            locus_core::VarMap::new(),
        )
        .unwrap()
        .standard_form()
        .clone()
    }

    #[test]
    fn eliminates_monomial_equality() {
        let x = VarKey::new("x");
        let y = VarKey::new("y");
        let cost = Posynomial::new([Monomial::var(&x), Monomial::var(&y)]);
        // x·y / 4 = 1
        let equality = (&Monomial::var(&x) * &Monomial::var(&y)).scaled(0.25).unwrap();

        let reduced = Reduced::new(&form(vec![cost], &[equality])).unwrap().unwrap();
        assert_eq!(reduced.dim(), 1);

        // Every reduced point satisfies ln x + ln y = ln 4.
        for zi in [-1.0, 0.0, 2.5] {
            let y_log = reduced.lift(&DVector::from_vec(vec![zi]));
            assert_relative_eq!(y_log[0] + y_log[1], 4.0_f64.ln(), epsilon = 1e-12);
        }
    }

    #[test]
    fn inconsistent_equalities_are_infeasible() {
        let x = VarKey::new("x");
        let cost = Posynomial::from(&x);
        let equalities = [
            Monomial::var(&x).scaled(0.5).unwrap(),
            Monomial::var(&x).scaled(0.25).unwrap(),
        ];

        let result = Reduced::new(&form(vec![cost], &equalities)).unwrap();
        assert!(matches!(result, Err(Failure::Infeasible { .. })));
    }

    #[test]
    fn constant_constraints_are_checked_and_dropped() {
        let x = VarKey::new("x");
        let cost = Posynomial::from(&x);
        let satisfied = Posynomial::from(Monomial::constant(0.5).unwrap());
        let free = Posynomial::from(Monomial::var(&x).pow(-1.0));

        let reduced = Reduced::new(&form(vec![cost.clone(), satisfied, free], &[]))
            .unwrap()
            .unwrap();
        assert_eq!(reduced.slots, 2);
        assert_eq!(reduced.constraints.len(), 1);
        assert_eq!(reduced.constraints[0].slot, 1);

        let violated = Posynomial::from(Monomial::constant(2.0).unwrap());
        let result = Reduced::new(&form(vec![cost, violated], &[])).unwrap();
        assert!(matches!(result, Err(Failure::Infeasible { .. })));
    }
}
