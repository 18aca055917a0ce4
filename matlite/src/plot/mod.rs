//! Figures, the per-run figure registry and PNG rendering

pub mod charts;
pub mod figure;
pub mod fonts;
pub mod registry;
pub mod render;

pub use figure::{parse_color, Axes, Figure, Marker, Rgb, Scale, Series, SeriesStyle};
pub use registry::FigureRegistry;
pub use render::render_png;

use std::path::PathBuf;

/// How figures are rasterized
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Canvas width in pixels (6.4 in at 100 dpi)
    pub width: u32,
    /// Canvas height in pixels (4.8 in at 100 dpi)
    pub height: u32,
    /// White border kept around the drawn content after cropping
    pub crop_padding: u32,
    /// Font tried before `MATLITE_FONT` and the system fonts
    pub font_path: Option<PathBuf>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            crop_padding: 10,
            font_path: None,
        }
    }
}
