use nalgebra::{DMatrix, DVector};

/// Exponent entries below this magnitude count as zero.
const ZERO_EXPONENT: f64 = 1e-12;

/// `g(z) = ln Σₖ exp(aₖ·z + bₖ)`, the log of one posynomial.
#[derive(Debug, Clone)]
pub(super) struct LogSumExp {
    a: DMatrix<f64>,
    b: DVector<f64>,
}

/// Value, gradient, and Hessian of a [`LogSumExp`] at a point.
pub(super) struct Local {
    pub value: f64,
    pub gradient: DVector<f64>,
    pub hessian: DMatrix<f64>,
}

impl LogSumExp {
    /// Creates the function from its term exponents (one row per term) and
    /// log coefficients.
    pub fn new(a: DMatrix<f64>, b: DVector<f64>) -> Self {
        debug_assert_eq!(a.nrows(), b.len());
        Self { a, b }
    }

    /// True if no term depends on `z`.
    pub fn is_constant(&self) -> bool {
        self.a.iter().all(|entry| entry.abs() <= ZERO_EXPONENT)
    }

    pub fn value(&self, z: &DVector<f64>) -> f64 {
        let u = &self.a * z + &self.b;
        let max = u.max();
        max + u.iter().map(|ui| (ui - max).exp()).sum::<f64>().ln()
    }

    pub fn local(&self, z: &DVector<f64>) -> Local {
        let u = &self.a * z + &self.b;
        let max = u.max();
        let shares = u.map(|ui| (ui - max).exp());
        let total = shares.sum();
        let p = shares / total;

        let gradient = self.a.tr_mul(&p);

        let mut weighted = self.a.clone();
        for (mut row, &pk) in weighted.row_iter_mut().zip(p.iter()) {
            row *= pk;
        }
        let hessian = self.a.tr_mul(&weighted) - &gradient * gradient.transpose();

        Local {
            value: max + total.ln(),
            gradient,
            hessian,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn matches_direct_evaluation() {
        // ln(2·e^{z} + e^{-z}) at z = 0.3
        let g = LogSumExp::new(
            DMatrix::from_row_slice(2, 1, &[1.0, -1.0]),
            DVector::from_vec(vec![2.0_f64.ln(), 0.0]),
        );
        let z = DVector::from_vec(vec![0.3]);
        let sum = 2.0 * 0.3_f64.exp() + (-0.3_f64).exp();

        let local = g.local(&z);
        assert_relative_eq!(g.value(&z), sum.ln(), epsilon = 1e-14);
        assert_relative_eq!(local.value, sum.ln(), epsilon = 1e-14);

        let p0 = 2.0 * 0.3_f64.exp() / sum;
        let p1 = 1.0 - p0;
        assert_relative_eq!(local.gradient[0], p0 - p1, epsilon = 1e-14);
        assert_relative_eq!(local.hessian[(0, 0)], 1.0 - (p0 - p1).powi(2), epsilon = 1e-14);
    }

    #[test]
    fn stays_finite_for_large_exponents() {
        let g = LogSumExp::new(
            DMatrix::from_row_slice(2, 1, &[1.0, 2.0]),
            DVector::from_vec(vec![0.0, 0.0]),
        );
        let z = DVector::from_vec(vec![800.0]);
        assert_relative_eq!(g.value(&z), 1600.0, epsilon = 1e-9);
        assert!(g.local(&z).hessian[(0, 0)].is_finite());
    }

    #[test]
    fn detects_constants() {
        let g = LogSumExp::new(DMatrix::zeros(1, 2), DVector::from_vec(vec![0.5]));
        assert!(g.is_constant());
    }
}
