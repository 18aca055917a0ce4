//! Frequency-domain analysis: Bode data, stability margins and Nyquist curves

use crate::control::TransferFunction;
use crate::MatliteResult;
use nalgebra::Complex;
use std::f64::consts::PI;

pub const FREQUENCY_POINTS: usize = 1000;

/// `points` values spaced evenly on a log scale from `10^start` to `10^stop`
pub fn logspace(start: f64, stop: f64, points: usize) -> Vec<f64> {
    match points {
        0 => vec![],
        1 => vec![10f64.powf(start)],
        _ => (0..points)
            .map(|i| {
                let exponent = start + (stop - start) * i as f64 / (points - 1) as f64;
                10f64.powf(exponent)
            })
            .collect(),
    }
}

/// Log-spaced grid covering a decade below the slowest and above the fastest pole or zero
pub fn frequency_grid(system: &TransferFunction) -> MatliteResult<Vec<f64>> {
    let features: Vec<f64> = system
        .poles()?
        .into_iter()
        .chain(system.zeros()?)
        .map(|p| p.norm())
        .filter(|w| *w > 0.0 && w.is_finite())
        .collect();

    let (low, high) = if features.is_empty() {
        (-1.0, 1.0)
    } else {
        let slowest = features.iter().copied().fold(f64::INFINITY, f64::min);
        let fastest = features.iter().copied().fold(0.0, f64::max);
        (slowest.log10().floor() - 1.0, fastest.log10().ceil() + 1.0)
    };
    Ok(logspace(low, high, FREQUENCY_POINTS))
}

#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyResponse {
    pub omega: Vec<f64>,
    pub magnitude: Vec<f64>,
    /// Unwrapped phase in degrees
    pub phase: Vec<f64>,
}

impl FrequencyResponse {
    pub fn magnitude_db(&self) -> Vec<f64> {
        self.magnitude.iter().map(|m| 20.0 * m.log10()).collect()
    }
}

pub fn frequency_response(system: &TransferFunction, omega: &[f64]) -> FrequencyResponse {
    let values: Vec<Complex<f64>> = omega.iter().map(|w| system.frequency(*w)).collect();
    let magnitude = values.iter().map(|g| g.norm()).collect();
    let wrapped: Vec<f64> = values.iter().map(|g| g.arg()).collect();
    let phase = unwrap(&wrapped).into_iter().map(f64::to_degrees).collect();

    FrequencyResponse {
        omega: omega.to_vec(),
        magnitude,
        phase,
    }
}

/// Remove jumps larger than π between consecutive phase samples
pub fn unwrap(phase: &[f64]) -> Vec<f64> {
    let mut unwrapped = Vec::with_capacity(phase.len());
    let mut offset = 0.0;
    let mut previous: Option<f64> = None;

    for value in phase {
        if let Some(previous) = previous {
            let delta = value - previous;
            if delta.is_finite() {
                if delta > PI {
                    offset -= 2.0 * PI * ((delta + PI) / (2.0 * PI)).floor();
                } else if delta < -PI {
                    offset += 2.0 * PI * ((-delta + PI) / (2.0 * PI)).floor();
                }
            }
        }
        previous = Some(*value);
        unwrapped.push(value + offset);
    }
    unwrapped
}

/// Gain and phase margins with their crossover frequencies. Infinite margins have no crossover
/// and a NaN frequency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StabilityMargins {
    /// Gain margin as a ratio
    pub gain_margin: f64,
    /// Phase margin in degrees
    pub phase_margin: f64,
    /// Frequency where the phase crosses -180°
    pub phase_crossover: f64,
    /// Frequency where the magnitude crosses 1
    pub gain_crossover: f64,
}

impl StabilityMargins {
    pub fn gain_margin_db(&self) -> f64 {
        20.0 * self.gain_margin.log10()
    }

    /// `Gm = .. dB (at .. rad/s), Pm = .. deg (at .. rad/s)`
    pub fn title(&self) -> String {
        format!(
            "Gm = {:.2} dB (at {:.2} rad/s), Pm = {:.2} deg (at {:.2} rad/s)",
            self.gain_margin_db(),
            self.phase_crossover,
            self.phase_margin,
            self.gain_crossover
        )
    }
}

/// Margins from sampled data, interpolating crossings linearly in log frequency.
/// The smallest margin wins when a curve crosses several times.
pub fn stability_margins(response: &FrequencyResponse) -> StabilityMargins {
    let mut margins = StabilityMargins {
        gain_margin: f64::INFINITY,
        phase_margin: f64::INFINITY,
        phase_crossover: f64::NAN,
        gain_crossover: f64::NAN,
    };

    let log_omega: Vec<f64> = response.omega.iter().map(|w| w.log10()).collect();
    let magnitude_db = response.magnitude_db();

    for i in 1..response.omega.len() {
        let (p0, p1) = (response.phase[i - 1], response.phase[i]);
        if p0.is_finite() && p1.is_finite() {
            // Every odd multiple of -180° between the two samples is a phase crossover
            let lower = p0.min(p1);
            let upper = p0.max(p1);
            let mut k = ((lower + 180.0) / 360.0).ceil();
            while -180.0 + 360.0 * k <= upper {
                let target = -180.0 + 360.0 * k;
                if p1 != p0 {
                    let fraction = (target - p0) / (p1 - p0);
                    let w = interpolate(log_omega[i - 1], log_omega[i], fraction);
                    let db = interpolate(magnitude_db[i - 1], magnitude_db[i], fraction);
                    let gain_margin = 10f64.powf(-db / 20.0);
                    if gain_margin < margins.gain_margin {
                        margins.gain_margin = gain_margin;
                        margins.phase_crossover = 10f64.powf(w);
                    }
                }
                k += 1.0;
            }
        }

        let (m0, m1) = (magnitude_db[i - 1], magnitude_db[i]);
        if m0.is_finite() && m1.is_finite() && m0 != m1 && (m0 >= 0.0) != (m1 >= 0.0) {
            let fraction = (0.0 - m0) / (m1 - m0);
            let w = interpolate(log_omega[i - 1], log_omega[i], fraction);
            let phase = interpolate(p0, p1, fraction);
            let phase_margin = wrap_degrees(phase) + 180.0;
            if phase_margin < margins.phase_margin {
                margins.phase_margin = phase_margin;
                margins.gain_crossover = 10f64.powf(w);
            }
        }
    }

    margins
}

fn interpolate(a: f64, b: f64, fraction: f64) -> f64 {
    a + (b - a) * fraction
}

/// Map an angle in degrees to (-360, 0]
fn wrap_degrees(phase: f64) -> f64 {
    let wrapped = phase.rem_euclid(360.0);
    if wrapped == 0.0 {
        0.0
    } else {
        wrapped - 360.0
    }
}

/// `G(jω)` over the grid plus its mirror image for negative frequencies. Points that are not
/// finite (poles on the imaginary axis) are dropped.
pub fn nyquist_curve(
    system: &TransferFunction,
    omega: &[f64],
) -> (Vec<(f64, f64)>, Vec<(f64, f64)>) {
    let positive: Vec<(f64, f64)> = omega
        .iter()
        .map(|w| system.frequency(*w))
        .filter(|g| g.re.is_finite() && g.im.is_finite())
        .map(|g| (g.re, g.im))
        .collect();
    let mirrored = positive.iter().map(|(re, im)| (*re, -im)).collect();
    (positive, mirrored)
}
