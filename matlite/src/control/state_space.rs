use crate::control::{polynomial, TransferFunction};
use crate::error::MatliteError;
use crate::MatliteResult;
use nalgebra::{DMatrix, DVector};

/// Controllable canonical realization `x' = A x + B u`, `y = C x + D u`
#[derive(Debug, Clone)]
pub struct StateSpace {
    pub a: DMatrix<f64>,
    pub b: DVector<f64>,
    pub c: DVector<f64>,
    pub d: f64,
}

impl StateSpace {
    pub fn from_transfer_function(system: &TransferFunction) -> MatliteResult<Self> {
        if !system.is_proper() {
            return Err(MatliteError::control(
                "time responses require a proper transfer function (numerator degree must not exceed denominator degree)",
            ));
        }

        let den = system.den();
        let lead = den[0];
        let n = system.order();
        let a_coeffs: Vec<f64> = den.iter().map(|c| c / lead).collect();
        let b_coeffs: Vec<f64> = polynomial::pad(system.num(), n + 1)
            .iter()
            .map(|c| c / lead)
            .collect();

        let a = DMatrix::from_fn(n, n, |row, col| {
            if row == 0 {
                -a_coeffs[col + 1]
            } else if row == col + 1 {
                1.0
            } else {
                0.0
            }
        });
        let b = DVector::from_fn(n, |row, _| if row == 0 { 1.0 } else { 0.0 });
        let d = b_coeffs[0];
        let c = DVector::from_fn(n, |j, _| b_coeffs[j + 1] - a_coeffs[j + 1] * d);

        Ok(Self { a, b, c, d })
    }

    pub fn states(&self) -> usize {
        self.b.len()
    }

    /// Zero-order-hold discretization with step `dt`, through the exponential of the augmented
    /// matrix `[[A dt, B dt], [0, 0]]`
    pub fn discretize(&self, dt: f64) -> (DMatrix<f64>, DVector<f64>) {
        let n = self.states();
        let mut augmented = DMatrix::<f64>::zeros(n + 1, n + 1);
        augmented
            .view_mut((0, 0), (n, n))
            .copy_from(&(&self.a * dt));
        augmented
            .view_mut((0, n), (n, 1))
            .copy_from(&(&self.b * dt));

        let exponential = augmented.exp();
        let ad = exponential.view((0, 0), (n, n)).into_owned();
        let bd = exponential.view((0, n), (n, 1)).column(0).into_owned();
        (ad, bd)
    }
}
