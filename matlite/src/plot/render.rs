//! Rasterize figures to PNG

use crate::control::polynomial::format_significant;
use crate::error::MatliteError;
use crate::plot::figure::{Axes, Figure, Marker, Scale, SeriesStyle};
use crate::plot::{fonts, RenderOptions};
use crate::MatliteResult;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbImage};
use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use std::ops::Range;
use tracing::warn;

/// Render a figure to PNG bytes: white background, cropped to the drawn content plus padding
pub fn render_png(figure: &Figure, options: &RenderOptions) -> MatliteResult<Vec<u8>> {
    let with_text = fonts::ensure_font(options.font_path.as_deref());

    let pixels = match draw_figure(figure, options, with_text) {
        Ok(pixels) => pixels,
        Err(error) if with_text => {
            warn!(figure = figure.id(), %error, "Text rendering failed, retrying without text");
            draw_figure(figure, options, false)?
        }
        Err(error) => return Err(error),
    };

    let image = RgbImage::from_raw(options.width, options.height, pixels)
        .ok_or_else(|| MatliteError::Render("pixel buffer has the wrong size".to_string()))?;
    let image = crop_to_content(&image, options.crop_padding);
    encode_png(&image)
}

fn draw_figure(figure: &Figure, options: &RenderOptions, with_text: bool) -> MatliteResult<Vec<u8>> {
    let mut buffer = vec![0u8; options.width as usize * options.height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (options.width, options.height))
            .into_drawing_area();
        root.fill(&WHITE).map_err(render_error)?;

        let areas = root.split_evenly((figure.axes().len().max(1), 1));
        for (area, axes) in areas.iter().zip(figure.axes()) {
            draw_axes(area, axes, with_text).map_err(render_error)?;
        }
        root.present().map_err(render_error)?;
    }
    Ok(buffer)
}

fn render_error<E: std::error::Error + Send + Sync>(error: DrawingAreaErrorKind<E>) -> MatliteError {
    MatliteError::Render(error.to_string())
}

fn draw_axes<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    axes: &Axes,
    with_text: bool,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let log_x = axes.x_scale == Scale::Log;
    let x_formatter = |v: &f64| {
        if log_x {
            tick_label(10f64.powf(*v))
        } else {
            tick_label(*v)
        }
    };
    let y_formatter = |v: &f64| tick_label(*v);
    let (x_range, y_range) = bounds(axes);

    let mut builder = ChartBuilder::on(area);
    builder.margin(12);
    if with_text {
        builder.x_label_area_size(40).y_label_area_size(60);
        if let Some(title) = &axes.title {
            builder.caption(title, ("sans-serif", 18));
        }
    }
    let mut chart = builder.build_cartesian_2d(x_range, y_range)?;

    {
        let mut mesh = chart.configure_mesh();
        if !axes.grid {
            mesh.disable_mesh();
        }
        if with_text {
            mesh.x_labels(7)
                .y_labels(7)
                .x_label_formatter(&x_formatter)
                .y_label_formatter(&y_formatter)
                .label_style(("sans-serif", 13));
            if let Some(label) = &axes.xlabel {
                mesh.x_desc(label.as_str());
            }
            if let Some(label) = &axes.ylabel {
                mesh.y_desc(label.as_str());
            }
        } else {
            mesh.x_labels(0).y_labels(0);
        }
        mesh.draw()?;
    }

    let mut labeled = false;
    for (index, series) in axes.series.iter().enumerate() {
        let color = RGBColor(series.color.0, series.color.1, series.color.2);
        let points: Vec<(f64, f64)> = series
            .points
            .iter()
            .filter_map(|(x, y)| project(*x, *y, log_x))
            .collect();

        match series.style {
            SeriesStyle::Line => {
                let drawn = chart.draw_series(LineSeries::new(points, color.stroke_width(2)))?;
                if let Some(label) = axes.legend_label(index) {
                    labeled = true;
                    drawn.label(label).legend(move |(x, y)| {
                        PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
                    });
                }
            }
            SeriesStyle::Markers(Marker::Cross) => {
                chart.draw_series(
                    points
                        .iter()
                        .map(|p| Cross::new(*p, 5, color.stroke_width(2))),
                )?;
            }
            SeriesStyle::Markers(Marker::Circle) => {
                chart.draw_series(
                    points
                        .iter()
                        .map(|p| Circle::new(*p, 5, color.stroke_width(2))),
                )?;
            }
            SeriesStyle::Reference => {
                chart.draw_series(LineSeries::new(points, color.mix(0.7).stroke_width(1)))?;
            }
        }
    }

    if with_text && labeled {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.85))
            .border_style(BLACK)
            .label_font(("sans-serif", 13))
            .draw()?;
    }

    Ok(())
}

/// Chart coordinates of a data point; log axes plot `log10(x)`
fn project(x: f64, y: f64, log_x: bool) -> Option<(f64, f64)> {
    if !x.is_finite() || !y.is_finite() {
        return None;
    }
    if log_x {
        (x > 0.0).then(|| (x.log10(), y))
    } else {
        Some((x, y))
    }
}

fn bounds(axes: &Axes) -> (Range<f64>, Range<f64>) {
    let log_x = axes.x_scale == Scale::Log;
    let mut x = (f64::INFINITY, f64::NEG_INFINITY);
    let mut y = (f64::INFINITY, f64::NEG_INFINITY);

    for (px, py) in axes
        .series
        .iter()
        .flat_map(|s| s.points.iter())
        .filter_map(|(px, py)| project(*px, *py, log_x))
    {
        x = (x.0.min(px), x.1.max(px));
        y = (y.0.min(py), y.1.max(py));
    }
    (padded(x.0, x.1), padded(y.0, y.1))
}

fn padded(low: f64, high: f64) -> Range<f64> {
    if !low.is_finite() || !high.is_finite() {
        return 0.0..1.0;
    }
    let span = high - low;
    if span <= 1e-12 * low.abs().max(high.abs()).max(1.0) {
        let delta = if low.abs() > 0.0 { low.abs() * 0.1 } else { 1.0 };
        return (low - delta)..(high + delta);
    }
    let pad = span * 0.05;
    (low - pad)..(high + pad)
}

fn tick_label(value: f64) -> String {
    if value.abs() < 1e-12 {
        "0".to_string()
    } else {
        format_significant(value, 4)
    }
}

/// Crop to the bounding box of non-white pixels, keeping `padding` pixels around it
fn crop_to_content(image: &RgbImage, padding: u32) -> RgbImage {
    let mut found: Option<(u32, u32, u32, u32)> = None;
    for (x, y, pixel) in image.enumerate_pixels() {
        if pixel.0 != [255, 255, 255] {
            found = Some(match found {
                None => (x, y, x, y),
                Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
            });
        }
    }

    let Some((x0, y0, x1, y1)) = found else {
        return image.clone();
    };
    let left = x0.saturating_sub(padding);
    let top = y0.saturating_sub(padding);
    let right = (x1 + padding + 1).min(image.width());
    let bottom = (y1 + padding + 1).min(image.height());
    image::imageops::crop_imm(image, left, top, right - left, bottom - top).to_image()
}

fn encode_png(image: &RgbImage) -> MatliteResult<Vec<u8>> {
    let mut png = Vec::new();
    PngEncoder::new(&mut png)
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            ExtendedColorType::Rgb8,
        )
        .map_err(|e| MatliteError::Render(format!("PNG encoding failed: {}", e)))?;
    Ok(with_pixel_density(png))
}

/// 100 dpi expressed in pixels per metre
const PIXELS_PER_METRE: u32 = 3937;

/// Signature plus the IHDR chunk (length, type, 13 data bytes, CRC)
const IHDR_END: usize = 8 + 4 + 4 + 13 + 4;

/// Insert a pHYs chunk after IHDR so viewers size the image at 100 dpi
fn with_pixel_density(png: Vec<u8>) -> Vec<u8> {
    if png.len() < IHDR_END {
        return png;
    }
    let mut body = b"pHYs".to_vec();
    body.extend_from_slice(&PIXELS_PER_METRE.to_be_bytes());
    body.extend_from_slice(&PIXELS_PER_METRE.to_be_bytes());
    body.push(1); // unit: metre

    let mut out = Vec::with_capacity(png.len() + body.len() + 8);
    out.extend_from_slice(&png[..IHDR_END]);
    out.extend_from_slice(&9u32.to_be_bytes());
    out.extend_from_slice(&body);
    out.extend_from_slice(&crc32(&body).to_be_bytes());
    out.extend_from_slice(&png[IHDR_END..]);
    out
}

/// CRC-32 as used by PNG chunks (reflected, polynomial 0xEDB88320)
fn crc32(bytes: &[u8]) -> u32 {
    let mut crc = !0u32;
    for &byte in bytes {
        crc ^= u32::from(byte);
        for _ in 0..8 {
            crc = if crc & 1 == 1 {
                (crc >> 1) ^ 0xEDB8_8320
            } else {
                crc >> 1
            };
        }
    }
    !crc
}
