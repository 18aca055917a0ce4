//! Standard control-analysis charts drawn into a figure

use crate::control::{FrequencyResponse, RootLocus, StabilityMargins};
use crate::plot::figure::{Figure, Marker, Rgb, Scale, COLOR_CYCLE, RED};
use nalgebra::Complex;

fn points(roots: &[Complex<f64>]) -> Vec<(f64, f64)> {
    roots.iter().map(|z| (z.re, z.im)).collect()
}

/// Poles as crosses and zeros as circles in the complex plane
pub fn pole_zero_map(figure: &mut Figure, poles: &[Complex<f64>], zeros: &[Complex<f64>]) {
    let axes = figure.current_axes();
    let color = axes.next_color();

    let (mut low, mut high) = (-1.0_f64, 1.0_f64);
    for z in poles.iter().chain(zeros) {
        low = low.min(z.re);
        high = high.max(z.re);
    }
    axes.add_reference(vec![(low, 0.0), (high, 0.0)]);
    axes.add_markers(points(poles), Marker::Cross, color);
    axes.add_markers(points(zeros), Marker::Circle, color);
    axes.xlabel = Some("Real".to_string());
    axes.ylabel = Some("Imaginary".to_string());
}

/// Magnitude over phase on two stacked log-frequency axes, optionally with margin markers and
/// the margin summary as title
pub fn bode(figure: &mut Figure, response: &FrequencyResponse, margins: Option<&StabilityMargins>) {
    figure.use_stacked_axes(2);
    let magnitude_db = response.magnitude_db();
    let omega = &response.omega;
    let (first, last) = match (omega.first(), omega.last()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => return,
    };

    if let Some(axes) = figure.axes_mut(0) {
        axes.x_scale = Scale::Log;
        axes.grid = true;
        let color = axes.next_color();
        axes.add_line(
            omega.iter().copied().zip(magnitude_db.iter().copied()).collect(),
            Some(color),
            None,
        );
        axes.ylabel = Some("Magnitude (dB)".to_string());

        if let Some(margins) = margins {
            axes.add_reference(vec![(first, 0.0), (last, 0.0)]);
            if margins.phase_crossover.is_finite() {
                let gm_db = margins.gain_margin_db();
                axes.add_line(
                    vec![(margins.phase_crossover, 0.0), (margins.phase_crossover, -gm_db)],
                    Some(Rgb(0, 0, 0)),
                    None,
                );
            }
            axes.title = Some(margins.title());
        }
    }

    if let Some(axes) = figure.axes_mut(1) {
        axes.x_scale = Scale::Log;
        axes.grid = true;
        let color = axes.next_color();
        axes.add_line(
            omega.iter().copied().zip(response.phase.iter().copied()).collect(),
            Some(color),
            None,
        );
        axes.xlabel = Some("Frequency (rad/s)".to_string());
        axes.ylabel = Some("Phase (deg)".to_string());

        if let Some(margins) = margins {
            axes.add_reference(vec![(first, -180.0), (last, -180.0)]);
            if margins.gain_crossover.is_finite() {
                let base = -180.0;
                axes.add_line(
                    vec![
                        (margins.gain_crossover, base),
                        (margins.gain_crossover, base + margins.phase_margin),
                    ],
                    Some(Rgb(0, 0, 0)),
                    None,
                );
            }
        }
    }
}

/// One line per branch, open-loop poles as crosses and zeros as circles
pub fn root_locus(figure: &mut Figure, locus: &RootLocus, zeros: &[Complex<f64>]) {
    let axes = figure.current_axes();
    for (index, branch) in locus.branches.iter().enumerate() {
        let color = COLOR_CYCLE[index % COLOR_CYCLE.len()];
        axes.add_line(points(branch), Some(color), None);
    }
    let starts: Vec<Complex<f64>> = locus.branches.iter().filter_map(|b| b.first().copied()).collect();
    axes.add_markers(points(&starts), Marker::Cross, Rgb(0, 0, 0));
    axes.add_markers(points(zeros), Marker::Circle, Rgb(0, 0, 0));
    axes.grid = true;
    axes.xlabel = Some("Real".to_string());
    axes.ylabel = Some("Imaginary".to_string());
}

/// Positive-frequency curve, its mirror image and the critical point `-1`
pub fn nyquist(figure: &mut Figure, positive: Vec<(f64, f64)>, mirrored: Vec<(f64, f64)>) {
    let axes = figure.current_axes();
    let color = axes.next_color();
    axes.add_line(positive, Some(color), None);
    axes.add_line(mirrored, Some(color), None);
    axes.add_markers(vec![(-1.0, 0.0)], Marker::Cross, RED);
    axes.grid = true;
    axes.title = Some("Nyquist Plot".to_string());
    axes.xlabel = Some("Real".to_string());
    axes.ylabel = Some("Imaginary".to_string());
}
