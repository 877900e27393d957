use nalgebra::{DMatrix, DVector};

use super::{
    log_sum_exp::Local,
    newton::{Centering, Derivatives, Halt},
    reduce::Reduced,
};

/// Log-space magnitude beyond which a program is reported unbounded.
const BOUND: f64 = 500.0;

/// Feasibility barrier over `(z, s)`: `t·s - Σ ln(s - gᵢ(z))`.
///
/// Halts as soon as `s < 0`, where every constraint holds strictly.
pub(super) struct PhaseOne<'a> {
    pub reduced: &'a Reduced,
    pub t: f64,
}

/// Optimality barrier over `z`: `t·g₀(z) - Σ ln(-gᵢ(z))`.
pub(super) struct PhaseTwo<'a> {
    pub reduced: &'a Reduced,
    pub t: f64,
}

impl PhaseOne<'_> {
    fn split(&self, v: &DVector<f64>) -> (DVector<f64>, f64) {
        let r = self.reduced.dim();
        (v.rows(0, r).into_owned(), v[r])
    }
}

impl Centering for PhaseOne<'_> {
    fn value(&self, v: &DVector<f64>) -> Option<f64> {
        let (z, s) = self.split(v);
        let mut value = self.t * s;
        for c in &self.reduced.constraints {
            let slack = s - c.g.value(&z);
            if slack.is_nan() || slack <= 0.0 {
                return None;
            }
            value -= slack.ln();
        }
        value.is_finite().then_some(value)
    }

    fn derivatives(&self, v: &DVector<f64>) -> Option<Derivatives> {
        let (z, s) = self.split(v);
        let r = z.len();

        let mut value = self.t * s;
        let mut grad_z = DVector::<f64>::zeros(r);
        let mut grad_s = self.t;
        let mut h_zz = DMatrix::<f64>::zeros(r, r);
        let mut h_zs = DVector::<f64>::zeros(r);
        let mut h_ss = 0.0;

        for c in &self.reduced.constraints {
            let Local {
                value: g,
                gradient,
                hessian,
            } = c.g.local(&z);
            let slack = s - g;
            if slack.is_nan() || slack <= 0.0 {
                return None;
            }
            value -= slack.ln();
            grad_z += &gradient / slack;
            grad_s -= 1.0 / slack;
            h_zz += hessian / slack + &gradient * gradient.transpose() / (slack * slack);
            h_zs -= &gradient / (slack * slack);
            h_ss += 1.0 / (slack * slack);
        }

        let mut gradient = DVector::<f64>::zeros(r + 1);
        gradient.rows_mut(0, r).copy_from(&grad_z);
        gradient[r] = grad_s;

        let mut hessian = DMatrix::<f64>::zeros(r + 1, r + 1);
        hessian.view_mut((0, 0), (r, r)).copy_from(&h_zz);
        hessian.view_mut((0, r), (r, 1)).copy_from(&h_zs);
        hessian.view_mut((r, 0), (1, r)).copy_from(&h_zs.transpose());
        hessian[(r, r)] = h_ss;

        value.is_finite().then_some(Derivatives {
            value,
            gradient,
            hessian,
        })
    }

    fn halt(&self, v: &DVector<f64>) -> Option<Halt> {
        let (z, s) = self.split(v);
        if s < 0.0 {
            Some(Halt::Feasible)
        } else if self.reduced.lift(&z).amax() > BOUND {
            Some(Halt::Unbounded)
        } else {
            None
        }
    }
}

impl Centering for PhaseTwo<'_> {
    fn value(&self, z: &DVector<f64>) -> Option<f64> {
        let mut value = self.t * self.reduced.cost.value(z);
        for c in &self.reduced.constraints {
            let g = c.g.value(z);
            if g.is_nan() || g >= 0.0 {
                return None;
            }
            value -= (-g).ln();
        }
        value.is_finite().then_some(value)
    }

    fn derivatives(&self, z: &DVector<f64>) -> Option<Derivatives> {
        let cost = self.reduced.cost.local(z);
        let mut value = self.t * cost.value;
        let mut gradient = cost.gradient * self.t;
        let mut hessian = cost.hessian * self.t;

        for c in &self.reduced.constraints {
            let Local {
                value: g,
                gradient: dg,
                hessian: d2g,
            } = c.g.local(z);
            if g.is_nan() || g >= 0.0 {
                return None;
            }
            let slack = -g;
            value -= slack.ln();
            gradient += &dg / slack;
            hessian += d2g / slack + &dg * dg.transpose() / (slack * slack);
        }

        value.is_finite().then_some(Derivatives {
            value,
            gradient,
            hessian,
        })
    }

    fn halt(&self, z: &DVector<f64>) -> Option<Halt> {
        (self.reduced.lift(z).amax() > BOUND).then_some(Halt::Unbounded)
    }
}
