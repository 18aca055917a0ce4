use crate::control::frequency::logspace;
use crate::control::{polynomial, TransferFunction};
use crate::runtime::timeout::TimeoutTracker;
use crate::MatliteResult;
use nalgebra::Complex;

const GAIN_POINTS: usize = 400;
const MIN_GAIN_EXPONENT: f64 = -3.0;
const MAX_GAIN_EXPONENT: f64 = 5.0;

/// Closed-loop pole trajectories of `1 + k G(s) = 0` over a gain sweep
#[derive(Debug, Clone, PartialEq)]
pub struct RootLocus {
    pub gains: Vec<f64>,
    /// One trajectory per open-loop pole, sampled at `gains`
    pub branches: Vec<Vec<Complex<f64>>>,
}

/// Gain `0` followed by a log sweep from `1e-3` to `1e5`
pub fn default_gains() -> Vec<f64> {
    let mut gains = vec![0.0];
    gains.extend(logspace(MIN_GAIN_EXPONENT, MAX_GAIN_EXPONENT, GAIN_POINTS));
    gains
}

pub fn root_locus(system: &TransferFunction, timeout: &TimeoutTracker) -> MatliteResult<RootLocus> {
    let den = system.den();
    let len = den.len().max(system.num().len());
    let den = polynomial::pad(den, len);
    let num = polynomial::pad(system.num(), len);
    let branch_count = system.order();
    let scale = den.iter().chain(&num).fold(0.0_f64, |m, c| m.max(c.abs()));

    let mut gains = Vec::new();
    let mut branches: Vec<Vec<Complex<f64>>> = vec![Vec::new(); branch_count];

    for gain in default_gains() {
        timeout.check_timeout()?;

        let characteristic: Vec<f64> = den.iter().zip(&num).map(|(d, n)| d + gain * n).collect();
        // Skip gains where the characteristic polynomial loses its leading term
        let lead_index = len - branch_count - 1;
        if characteristic[..=lead_index]
            .iter()
            .all(|c| c.abs() <= 1e-12 * scale.max(1.0))
        {
            continue;
        }

        let roots = polynomial::roots(&characteristic)?;
        if roots.len() != branch_count {
            continue;
        }

        if gains.is_empty() {
            for (branch, root) in branches.iter_mut().zip(roots) {
                branch.push(root);
            }
        } else {
            let matched = match_nearest(&branches, roots);
            for (branch, root) in branches.iter_mut().zip(matched) {
                branch.push(root);
            }
        }
        gains.push(gain);
    }

    Ok(RootLocus { gains, branches })
}

/// Assign each branch the closest unused root to its last point
fn match_nearest(branches: &[Vec<Complex<f64>>], roots: Vec<Complex<f64>>) -> Vec<Complex<f64>> {
    let mut available: Vec<Option<Complex<f64>>> = roots.into_iter().map(Some).collect();
    let mut matched = Vec::with_capacity(branches.len());

    for branch in branches {
        let last = branch.last().copied().unwrap_or_default();
        let best = available
            .iter()
            .enumerate()
            .filter_map(|(i, root)| root.map(|r| (i, (r - last).norm())))
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(i, _)| i);

        match best.and_then(|i| available[i].take()) {
            Some(root) => matched.push(root),
            None => matched.push(last),
        }
    }
    matched
}
