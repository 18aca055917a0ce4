use crate::control::{frequency_grid, frequency_response, stability_margins, TransferFunction};
use crate::error::MatliteError;
use crate::plot::charts;
use crate::plot::figure::{COLOR_CYCLE, RED};
use crate::plot::{
    parse_color, render_png, Axes, Figure, FigureRegistry, Marker, RenderOptions, Rgb, Scale,
    SeriesStyle,
};
use nalgebra::Complex;

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

#[test]
fn test_select_creates_and_reuses_figures() {
    let mut registry = FigureRegistry::new(8);
    registry.select(3).unwrap();
    registry.select(1).unwrap();
    registry.select(3).unwrap();
    assert_eq!(registry.ids(), vec![1, 3]);
    assert_eq!(registry.current_figure().unwrap().id(), 3);
}

#[test]
fn test_current_figure_opens_next_free_id() {
    let mut registry = FigureRegistry::new(8);
    assert_eq!(registry.current_figure().unwrap().id(), 1);

    let mut registry = FigureRegistry::new(8);
    registry.select(4).unwrap();
    registry.close_all();
    assert!(registry.is_empty());
    assert_eq!(registry.current_figure().unwrap().id(), 1);
}

#[test]
fn test_figure_limit() {
    let mut registry = FigureRegistry::new(2);
    registry.select(1).unwrap();
    registry.select(2).unwrap();
    match registry.select(3) {
        Err(MatliteError::ResourceLimitExceeded { limit_name, .. }) => {
            assert_eq!(limit_name, "max_figures")
        }
        other => panic!("expected limit error, got {:?}", other.map(|f| f.id())),
    }
    assert!(registry.select(1).is_ok());
    assert_eq!(registry.len(), 2);
}

#[test]
fn test_parse_color() {
    assert_eq!(parse_color("red"), Some(RED));
    assert_eq!(parse_color("R"), Some(RED));
    assert_eq!(parse_color("#00ff80"), Some(Rgb(0, 255, 128)));
    assert_eq!(parse_color("C1"), Some(COLOR_CYCLE[1]));
    assert_eq!(parse_color("C10"), None);
    assert_eq!(parse_color("#12345"), None);
    assert_eq!(parse_color("nope"), None);
}

#[test]
fn test_lines_cycle_colors() {
    let mut axes = Axes::new();
    axes.add_line(vec![(0.0, 0.0)], None, None);
    axes.add_line(vec![(0.0, 1.0)], Some(RED), None);
    axes.add_line(vec![(0.0, 2.0)], None, None);
    assert_eq!(axes.series[0].color, COLOR_CYCLE[0]);
    assert_eq!(axes.series[1].color, RED);
    assert_eq!(axes.series[2].color, COLOR_CYCLE[1]);
}

#[test]
fn test_legend_entries_override_labels() {
    let mut axes = Axes::new();
    axes.add_reference(vec![(0.0, 0.0), (1.0, 0.0)]);
    axes.add_line(vec![(0.0, 1.0)], None, Some("Step Response".to_string()));
    axes.add_line(vec![(0.0, 2.0)], None, Some("Other".to_string()));

    assert_eq!(axes.legend_label(1), None);

    axes.legend = Some(vec![]);
    assert_eq!(axes.legend_label(1), Some("Step Response"));

    axes.legend = Some(vec!["plant".to_string()]);
    assert_eq!(axes.legend_label(0), None);
    assert_eq!(axes.legend_label(1), Some("plant"));
    assert_eq!(axes.legend_label(2), None);
}

#[test]
fn test_pole_zero_map_markers() {
    let mut figure = Figure::new(1);
    let poles = vec![Complex::new(-1.0, 1.0), Complex::new(-1.0, -1.0)];
    let zeros = vec![Complex::new(-3.0, 0.0)];
    charts::pole_zero_map(&mut figure, &poles, &zeros);

    let axes = &figure.axes()[0];
    assert_eq!(axes.xlabel.as_deref(), Some("Real"));
    assert_eq!(axes.ylabel.as_deref(), Some("Imaginary"));
    let styles: Vec<SeriesStyle> = axes.series.iter().map(|s| s.style).collect();
    assert_eq!(
        styles,
        vec![
            SeriesStyle::Reference,
            SeriesStyle::Markers(Marker::Cross),
            SeriesStyle::Markers(Marker::Circle)
        ]
    );
    assert_eq!(axes.series[0].points, vec![(-3.0, 0.0), (1.0, 0.0)]);
}

#[test]
fn test_bode_uses_two_log_axes() {
    let g = TransferFunction::new(&[1.0], &[1.0, 3.0, 2.0, 0.0]).unwrap();
    let response = frequency_response(&g, &frequency_grid(&g).unwrap());
    let margins = stability_margins(&response);

    let mut figure = Figure::new(1);
    figure.current_axes().title = Some("replaced".to_string());
    charts::bode(&mut figure, &response, Some(&margins));

    let axes = figure.axes();
    assert_eq!(axes.len(), 2);
    assert!(axes.iter().all(|a| a.x_scale == Scale::Log));
    assert_eq!(axes[0].ylabel.as_deref(), Some("Magnitude (dB)"));
    assert_eq!(axes[1].ylabel.as_deref(), Some("Phase (deg)"));
    assert_eq!(axes[1].xlabel.as_deref(), Some("Frequency (rad/s)"));
    assert_eq!(axes[0].title, Some(margins.title()));
}

#[test]
fn test_nyquist_chart() {
    let mut figure = Figure::new(2);
    charts::nyquist(&mut figure, vec![(1.0, 0.0), (0.5, -0.5)], vec![(1.0, 0.0), (0.5, 0.5)]);
    let axes = &figure.axes()[0];
    assert_eq!(axes.title.as_deref(), Some("Nyquist Plot"));
    assert_eq!(axes.series.len(), 3);
    assert_eq!(axes.series[2].points, vec![(-1.0, 0.0)]);
    assert_eq!(axes.series[2].color, RED);
}

#[test]
fn test_render_png() {
    let mut figure = Figure::new(1);
    let axes = figure.current_axes();
    axes.add_line(
        (0..50).map(|i| (i as f64, (i as f64 / 5.0).sin())).collect(),
        None,
        Some("sine".to_string()),
    );
    axes.title = Some("Sine".to_string());
    axes.grid = true;

    let options = RenderOptions::default();
    let png = render_png(&figure, &options).unwrap();
    assert_eq!(&png[..8], &PNG_SIGNATURE);

    let decoded = image::load_from_memory(&png).unwrap();
    assert!(decoded.width() <= options.width);
    assert!(decoded.height() <= options.height);
}

#[test]
fn test_render_png_records_100_dpi() {
    let png = render_png(&Figure::new(1), &RenderOptions::default()).unwrap();
    assert_eq!(&png[12..16], b"IHDR");
    // pHYs follows IHDR: length 9, 3937 px/m on both axes, unit metre, CRC
    assert_eq!(&png[33..37], &9u32.to_be_bytes());
    assert_eq!(&png[37..41], b"pHYs");
    assert_eq!(&png[41..45], &3937u32.to_be_bytes());
    assert_eq!(&png[45..49], &3937u32.to_be_bytes());
    assert_eq!(png[49], 1);
    assert_eq!(&png[50..54], &0xa83f_a769u32.to_be_bytes());
    assert!(image::load_from_memory(&png).is_ok());
}

#[test]
fn test_render_empty_figure() {
    let png = render_png(&Figure::new(1), &RenderOptions::default()).unwrap();
    assert_eq!(&png[..8], &PNG_SIGNATURE);
}

#[test]
fn test_render_log_axes() {
    let g = TransferFunction::new(&[1.0], &[1.0, 1.0]).unwrap();
    let response = frequency_response(&g, &frequency_grid(&g).unwrap());
    let mut figure = Figure::new(1);
    charts::bode(&mut figure, &response, None);
    let png = render_png(&figure, &RenderOptions::default()).unwrap();
    assert_eq!(&png[..8], &PNG_SIGNATURE);
}
