//! Time-domain simulation: step and impulse responses, step-response metrics

use crate::control::{StateSpace, TransferFunction};
use crate::runtime::timeout::TimeoutTracker;
use crate::MatliteResult;
use nalgebra::{Complex, DVector};
use std::f64::consts::PI;

const DEFAULT_HORIZON: f64 = 10.0;
const MIN_SAMPLES: usize = 500;
const SAMPLES_PER_PERIOD: f64 = 25.0;
/// Samples simulated between deadline checks
const CHECK_INTERVAL: usize = 1024;

const RISE_LOW: f64 = 0.1;
const RISE_HIGH: f64 = 0.9;
const SETTLING_BAND: f64 = 0.02;

#[derive(Debug, Clone, PartialEq)]
pub struct TimeResponse {
    pub time: Vec<f64>,
    pub output: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Input {
    Step,
    Impulse,
}

pub fn step_response(
    system: &TransferFunction,
    max_samples: usize,
    timeout: &TimeoutTracker,
) -> MatliteResult<TimeResponse> {
    simulate(system, Input::Step, max_samples, timeout)
}

/// Impulse response. A direct feedthrough term would contribute a Dirac pulse at `t = 0`,
/// which is not representable in sampled output and is left out.
pub fn impulse_response(
    system: &TransferFunction,
    max_samples: usize,
    timeout: &TimeoutTracker,
) -> MatliteResult<TimeResponse> {
    simulate(system, Input::Impulse, max_samples, timeout)
}

/// Simulation horizon: long enough for the slowest stable mode to settle, short enough that
/// unstable modes stay readable
pub fn default_horizon(poles: &[Complex<f64>]) -> f64 {
    const EPSILON: f64 = 1e-9;

    let horizon = poles
        .iter()
        .filter_map(|p| {
            if p.re < -EPSILON {
                Some(7.0 / p.re.abs())
            } else if p.re > EPSILON {
                Some(5.0 / p.re)
            } else if p.im.abs() > EPSILON {
                Some(20.0 * PI / p.im.abs())
            } else {
                None
            }
        })
        .fold(0.0_f64, f64::max);

    if horizon > 0.0 && horizon.is_finite() {
        horizon
    } else {
        DEFAULT_HORIZON
    }
}

fn sample_count(poles: &[Complex<f64>], horizon: f64, max_samples: usize) -> usize {
    let fastest = poles.iter().map(|p| p.norm()).fold(0.0_f64, f64::max);
    let wanted = (horizon * fastest * SAMPLES_PER_PERIOD / (2.0 * PI)).ceil();
    let upper = max_samples.max(2);
    if wanted.is_finite() {
        (wanted as usize).clamp(MIN_SAMPLES.min(upper), upper)
    } else {
        upper
    }
}

fn simulate(
    system: &TransferFunction,
    input: Input,
    max_samples: usize,
    timeout: &TimeoutTracker,
) -> MatliteResult<TimeResponse> {
    let realization = StateSpace::from_transfer_function(system)?;
    let poles = system.poles()?;
    let horizon = default_horizon(&poles);
    let samples = sample_count(&poles, horizon, max_samples);
    let dt = horizon / (samples - 1) as f64;

    let time: Vec<f64> = (0..samples).map(|k| k as f64 * dt).collect();
    let mut output = Vec::with_capacity(samples);

    if realization.states() == 0 {
        let level = match input {
            Input::Step => realization.d,
            Input::Impulse => 0.0,
        };
        output.resize(samples, level);
        return Ok(TimeResponse { time, output });
    }

    let (ad, bd) = realization.discretize(dt);
    let (mut state, forcing, feedthrough) = match input {
        Input::Step => (
            DVector::zeros(realization.states()),
            bd,
            realization.d,
        ),
        Input::Impulse => (
            realization.b.clone(),
            DVector::zeros(realization.states()),
            0.0,
        ),
    };

    for k in 0..samples {
        if k % CHECK_INTERVAL == 0 {
            timeout.check_timeout()?;
        }
        output.push(realization.c.dot(&state) + feedthrough);
        state = &ad * &state + &forcing;
    }

    Ok(TimeResponse { time, output })
}

/// Step-response characteristics, in display order
#[derive(Debug, Clone, PartialEq)]
pub struct StepInfo {
    pub rise_time: f64,
    pub settling_time: f64,
    pub settling_min: f64,
    pub settling_max: f64,
    pub overshoot: f64,
    pub undershoot: f64,
    pub peak: f64,
    pub peak_time: f64,
    pub steady_state_value: f64,
}

impl StepInfo {
    fn undefined(steady_state_value: f64) -> Self {
        Self {
            rise_time: f64::NAN,
            settling_time: f64::NAN,
            settling_min: f64::NAN,
            settling_max: f64::NAN,
            overshoot: f64::NAN,
            undershoot: f64::NAN,
            peak: f64::NAN,
            peak_time: f64::NAN,
            steady_state_value,
        }
    }

    pub fn fields(&self) -> Vec<(String, f64)> {
        [
            ("RiseTime", self.rise_time),
            ("SettlingTime", self.settling_time),
            ("SettlingMin", self.settling_min),
            ("SettlingMax", self.settling_max),
            ("Overshoot", self.overshoot),
            ("Undershoot", self.undershoot),
            ("Peak", self.peak),
            ("PeakTime", self.peak_time),
            ("SteadyStateValue", self.steady_state_value),
        ]
        .into_iter()
        // Adding zero turns -0.0 into 0.0
        .map(|(name, value)| (name.to_string(), value + 0.0))
        .collect()
    }
}

pub fn step_info(
    system: &TransferFunction,
    max_samples: usize,
    timeout: &TimeoutTracker,
) -> MatliteResult<StepInfo> {
    let final_value = system.dc_gain();
    if !final_value.is_finite() {
        return Ok(StepInfo::undefined(final_value));
    }
    let response = step_response(system, max_samples, timeout)?;
    Ok(characteristics(&response, final_value))
}

/// Metrics of a sampled step response that settles at `final_value`
pub fn characteristics(response: &TimeResponse, final_value: f64) -> StepInfo {
    let TimeResponse { time, output } = response;
    if output.is_empty() {
        return StepInfo::undefined(final_value);
    }

    let (peak_index, peak) = output
        .iter()
        .map(|y| y.abs())
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |best, (i, y)| {
            if y > best.1 {
                (i, y)
            } else {
                best
            }
        });

    if final_value == 0.0 {
        return StepInfo {
            rise_time: f64::NAN,
            settling_time: f64::NAN,
            settling_min: minimum(output),
            settling_max: maximum(output),
            overshoot: 0.0,
            undershoot: 0.0,
            peak,
            peak_time: time[peak_index],
            steady_state_value: final_value,
        };
    }

    // Work with a response that rises towards a positive final value
    let sign = final_value.signum();
    let normalized: Vec<f64> = output.iter().map(|y| y * sign).collect();
    let target = final_value.abs();

    let low = normalized.iter().position(|y| *y >= RISE_LOW * target);
    let high = normalized.iter().position(|y| *y >= RISE_HIGH * target);
    let rise_time = match (low, high) {
        (Some(low), Some(high)) => time[high] - time[low],
        _ => f64::NAN,
    };

    let band = SETTLING_BAND * target;
    let settling_time = match normalized.iter().rposition(|y| (y - target).abs() > band) {
        Some(last) if last + 1 < time.len() => time[last + 1],
        Some(_) => f64::NAN,
        None => time[0],
    };

    let settled = &output[high.unwrap_or(0)..];
    let overshoot = (maximum(&normalized) - target) / target * 100.0;
    let undershoot = -minimum(&normalized) / target * 100.0;

    StepInfo {
        rise_time,
        settling_time,
        settling_min: minimum(settled),
        settling_max: maximum(settled),
        overshoot: overshoot.max(0.0),
        undershoot: undershoot.max(0.0),
        peak,
        peak_time: time[peak_index],
        steady_state_value: final_value,
    }
}

fn minimum(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::INFINITY, f64::min)
}

fn maximum(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}
