use crate::control::polynomial;
use crate::error::{ErrorKind, MatliteError};
use crate::MatliteResult;
use nalgebra::Complex;
use std::fmt;

/// Continuous-time SISO transfer function `num(s) / den(s)`
///
/// Coefficients are stored highest degree first with leading zeros removed. They are not
/// normalized, so `tf([2], [2, 2])` keeps its coefficients as written.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferFunction {
    num: Vec<f64>,
    den: Vec<f64>,
}

impl TransferFunction {
    pub fn new(num: &[f64], den: &[f64]) -> MatliteResult<Self> {
        if num.is_empty() || den.is_empty() {
            return Err(MatliteError::value_error(
                "numerator and denominator must not be empty",
            ));
        }
        if num.iter().chain(den).any(|c| !c.is_finite()) {
            return Err(MatliteError::value_error(
                "transfer function coefficients must be finite",
            ));
        }
        if polynomial::is_zero(den) {
            return Err(MatliteError::runtime(
                ErrorKind::ZeroDivisionError,
                "transfer function denominator is zero",
            ));
        }
        Ok(Self {
            num: polynomial::trim(num),
            den: polynomial::trim(den),
        })
    }

    /// Static gain `k / 1`
    pub fn gain(k: f64) -> MatliteResult<Self> {
        Self::new(&[k], &[1.0])
    }

    /// The Laplace variable `s`
    pub fn laplace_variable() -> Self {
        Self {
            num: vec![1.0, 0.0],
            den: vec![1.0],
        }
    }

    pub fn num(&self) -> &[f64] {
        &self.num
    }

    pub fn den(&self) -> &[f64] {
        &self.den
    }

    /// Number of states in a minimal realization of a proper system
    pub fn order(&self) -> usize {
        self.den.len() - 1
    }

    pub fn is_proper(&self) -> bool {
        polynomial::degree(&self.num) <= polynomial::degree(&self.den)
    }

    pub fn poles(&self) -> MatliteResult<Vec<Complex<f64>>> {
        polynomial::roots(&self.den)
    }

    pub fn zeros(&self) -> MatliteResult<Vec<Complex<f64>>> {
        polynomial::roots(&self.num)
    }

    pub fn evaluate(&self, s: Complex<f64>) -> Complex<f64> {
        polynomial::eval_complex(&self.num, s) / polynomial::eval_complex(&self.den, s)
    }

    /// Frequency response `G(jω)`
    pub fn frequency(&self, omega: f64) -> Complex<f64> {
        self.evaluate(Complex::new(0.0, omega))
    }

    /// Value at `s = 0`: infinite for a pole at the origin, NaN when `0/0`
    pub fn dc_gain(&self) -> f64 {
        let num = polynomial::eval(&self.num, 0.0);
        let den = polynomial::eval(&self.den, 0.0);
        if den == 0.0 {
            if num == 0.0 {
                f64::NAN
            } else {
                f64::INFINITY.copysign(num)
            }
        } else {
            num / den
        }
    }

    pub fn series(&self, other: &Self) -> MatliteResult<Self> {
        Self::new(
            &polynomial::multiply(&self.num, &other.num),
            &polynomial::multiply(&self.den, &other.den),
        )
    }

    pub fn parallel(&self, other: &Self) -> MatliteResult<Self> {
        Self::new(
            &polynomial::add(
                &polynomial::multiply(&self.num, &other.den),
                &polynomial::multiply(&other.num, &self.den),
            ),
            &polynomial::multiply(&self.den, &other.den),
        )
    }

    pub fn negate(&self) -> Self {
        Self {
            num: polynomial::trim(&polynomial::scale(&self.num, -1.0)),
            den: self.den.clone(),
        }
    }

    pub fn difference(&self, other: &Self) -> MatliteResult<Self> {
        self.parallel(&other.negate())
    }

    pub fn scale(&self, factor: f64) -> MatliteResult<Self> {
        Self::new(&polynomial::scale(&self.num, factor), &self.den)
    }

    pub fn inverse(&self) -> MatliteResult<Self> {
        if polynomial::is_zero(&self.num) {
            return Err(MatliteError::runtime(
                ErrorKind::ZeroDivisionError,
                "cannot invert a transfer function with zero numerator",
            ));
        }
        Self::new(&self.den, &self.num)
    }

    pub fn divide(&self, other: &Self) -> MatliteResult<Self> {
        self.series(&other.inverse()?)
    }

    pub fn power(&self, exponent: i32) -> MatliteResult<Self> {
        let base = if exponent < 0 {
            self.inverse()?
        } else {
            self.clone()
        };
        let mut result = Self::gain(1.0)?;
        for _ in 0..exponent.unsigned_abs() {
            result = result.series(&base)?;
        }
        Ok(result)
    }

    /// Closed loop of `self` in the forward path and `sensor` in the return path.
    /// `sign = -1` is negative feedback.
    pub fn feedback(&self, sensor: &Self, sign: f64) -> MatliteResult<Self> {
        let num = polynomial::multiply(&self.num, &sensor.den);
        let den = polynomial::sub(
            &polynomial::multiply(&self.den, &sensor.den),
            &polynomial::scale(&polynomial::multiply(&self.num, &sensor.num), sign),
        );
        if polynomial::is_zero(&den) {
            return Err(MatliteError::control(
                "closed loop is algebraically singular (1 - sign*G*H == 0)",
            ));
        }
        Self::new(&num, &den)
    }
}

/// Two-line fraction form:
///
/// ```text
///
///     s + 1
/// -------------
/// s^2 + 2 s + 3
/// ```
impl fmt::Display for TransferFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let num = polynomial::format(&self.num, "s");
        let den = polynomial::format(&self.den, "s");
        let width = num.chars().count().max(den.chars().count());
        let center = |text: &str| {
            format!(
                "{}{}",
                " ".repeat((width - text.chars().count()) / 2),
                text
            )
        };
        write!(
            f,
            "\n{}\n{}\n{}\n",
            center(&num),
            "-".repeat(width),
            center(&den)
        )
    }
}
