//! Polynomials as coefficient slices, highest degree first

use crate::error::MatliteError;
use crate::MatliteResult;
use nalgebra::linalg::Schur;
use nalgebra::{Complex, DMatrix};

/// Imaginary parts below this (relative to the root magnitude) are treated as rounding noise
const IMAGINARY_TOLERANCE: f64 = 1e-9;
const SCHUR_MAX_ITERATIONS: usize = 10_000;

/// Drop leading zero coefficients. The zero polynomial is `[0.0]`.
pub fn trim(coeffs: &[f64]) -> Vec<f64> {
    match coeffs.iter().position(|c| *c != 0.0) {
        Some(first) => coeffs[first..].to_vec(),
        None => vec![0.0],
    }
}

pub fn degree(coeffs: &[f64]) -> usize {
    trim(coeffs).len() - 1
}

pub fn is_zero(coeffs: &[f64]) -> bool {
    coeffs.iter().all(|c| *c == 0.0)
}

/// Left-pad `coeffs` with zeros up to `len`
pub fn pad(coeffs: &[f64], len: usize) -> Vec<f64> {
    let mut padded = vec![0.0; len.saturating_sub(coeffs.len())];
    padded.extend_from_slice(coeffs);
    padded
}

pub fn add(a: &[f64], b: &[f64]) -> Vec<f64> {
    let len = a.len().max(b.len());
    let (a, b) = (pad(a, len), pad(b, len));
    trim(&a.iter().zip(&b).map(|(x, y)| x + y).collect::<Vec<_>>())
}

pub fn sub(a: &[f64], b: &[f64]) -> Vec<f64> {
    add(a, &scale(b, -1.0))
}

pub fn scale(coeffs: &[f64], factor: f64) -> Vec<f64> {
    coeffs.iter().map(|c| c * factor).collect()
}

/// Polynomial product, which is the full discrete convolution of the coefficients
pub fn multiply(a: &[f64], b: &[f64]) -> Vec<f64> {
    if a.is_empty() || b.is_empty() {
        return vec![];
    }
    let mut product = vec![0.0; a.len() + b.len() - 1];
    for (i, x) in a.iter().enumerate() {
        for (j, y) in b.iter().enumerate() {
            product[i + j] += x * y;
        }
    }
    product
}

/// Horner evaluation at a real point
pub fn eval(coeffs: &[f64], x: f64) -> f64 {
    coeffs.iter().fold(0.0, |acc, c| acc * x + c)
}

/// Horner evaluation at a complex point
pub fn eval_complex(coeffs: &[f64], s: Complex<f64>) -> Complex<f64> {
    coeffs
        .iter()
        .fold(Complex::new(0.0, 0.0), |acc, c| acc * s + Complex::new(*c, 0.0))
}

/// Roots through the eigenvalues of the companion matrix
///
/// Trailing zero coefficients contribute roots at the origin. The result is sorted by descending
/// real part, then descending imaginary part.
pub fn roots(coeffs: &[f64]) -> MatliteResult<Vec<Complex<f64>>> {
    if coeffs.iter().any(|c| !c.is_finite()) {
        return Err(MatliteError::value_error(
            "polynomial coefficients must be finite",
        ));
    }

    let coeffs = trim(coeffs);
    if is_zero(&coeffs) {
        return Ok(vec![]);
    }

    let trailing = coeffs.iter().rev().take_while(|c| **c == 0.0).count();
    let reduced = &coeffs[..coeffs.len() - trailing];
    let mut found = vec![Complex::new(0.0, 0.0); trailing];

    let n = reduced.len() - 1;
    if n > 0 {
        let lead = reduced[0];
        let companion = DMatrix::from_fn(n, n, |row, col| {
            if row == 0 {
                -reduced[col + 1] / lead
            } else if row == col + 1 {
                1.0
            } else {
                0.0
            }
        });
        let schur = Schur::try_new(companion, f64::EPSILON, SCHUR_MAX_ITERATIONS).ok_or_else(
            || MatliteError::control("root finding did not converge"),
        )?;
        found.extend(schur.complex_eigenvalues().iter().map(|z| clean(*z)));
    }

    sort_roots(&mut found);
    Ok(found)
}

/// Monic polynomial with the given roots; conjugate pairs give real coefficients
pub fn from_roots(roots: &[Complex<f64>]) -> Vec<f64> {
    let mut coeffs = vec![Complex::new(1.0, 0.0)];
    for root in roots {
        let mut next = vec![Complex::new(0.0, 0.0); coeffs.len() + 1];
        for (i, c) in coeffs.iter().enumerate() {
            next[i] += c;
            next[i + 1] -= c * root;
        }
        coeffs = next;
    }
    coeffs.iter().map(|c| c.re).collect()
}

pub fn sort_roots(roots: &mut [Complex<f64>]) {
    roots.sort_by(|a, b| {
        b.re.partial_cmp(&a.re)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(b.im.partial_cmp(&a.im).unwrap_or(std::cmp::Ordering::Equal))
    });
}

fn clean(z: Complex<f64>) -> Complex<f64> {
    if z.im.abs() <= IMAGINARY_TOLERANCE * z.norm().max(1.0) {
        Complex::new(z.re, 0.0)
    } else {
        z
    }
}

/// Roots as plain reals when none has an imaginary part
pub fn real_parts(roots: &[Complex<f64>]) -> Option<Vec<f64>> {
    roots
        .iter()
        .map(|z| (z.im == 0.0).then_some(z.re))
        .collect()
}

/// Render in the `s^2 + 2 s + 1` form
pub fn format(coeffs: &[f64], var: &str) -> String {
    let coeffs = trim(coeffs);
    let order = coeffs.len() - 1;
    let mut text = String::new();

    for (index, coeff) in coeffs.iter().enumerate() {
        if *coeff == 0.0 {
            continue;
        }
        let power = order - index;
        let magnitude = coeff.abs();
        let number = format_significant(magnitude, 4);

        let term = match power {
            0 => number,
            _ => {
                let variable = if power == 1 {
                    var.to_string()
                } else {
                    format!("{}^{}", var, power)
                };
                if magnitude == 1.0 {
                    variable
                } else {
                    format!("{} {}", number, variable)
                }
            }
        };

        if text.is_empty() {
            if *coeff < 0.0 {
                text.push('-');
            }
            text.push_str(&term);
        } else {
            text.push_str(if *coeff < 0.0 { " - " } else { " + " });
            text.push_str(&term);
        }
    }

    if text.is_empty() {
        "0".to_string()
    } else {
        text
    }
}

/// Shortest representation with at most `digits` significant digits, in the manner of `%g`
pub fn format_significant(value: f64, digits: usize) -> String {
    if !value.is_finite() {
        return if value.is_nan() {
            "nan".to_string()
        } else if value > 0.0 {
            "inf".to_string()
        } else {
            "-inf".to_string()
        };
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let exponent = value.abs().log10().floor() as i32;
    if exponent < -4 || exponent >= digits as i32 {
        let formatted = format!("{:.*e}", digits.saturating_sub(1), value);
        let (mantissa, exp) = formatted.split_once('e').unwrap_or((&formatted, "0"));
        let exp: i32 = exp.parse().unwrap_or(0);
        let sign = if exp < 0 { '-' } else { '+' };
        return format!("{}e{}{:02}", strip_zeros(mantissa), sign, exp.abs());
    }

    let decimals = (digits as i32 - 1 - exponent).max(0) as usize;
    strip_zeros(&format!("{:.*}", decimals, value)).to_string()
}

fn strip_zeros(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}
