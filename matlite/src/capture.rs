use crate::plot::{render_png, FigureRegistry, RenderOptions};
use crate::result::Artifact;
use crate::MatliteResult;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use tracing::debug;

/// Render every open figure in ascending id order, then close them all
///
/// Figures are closed even when rendering fails, so nothing outlives the run.
pub fn capture_figures(
    figures: &mut FigureRegistry,
    options: &RenderOptions,
) -> MatliteResult<Vec<Artifact>> {
    let artifacts = figures
        .figures()
        .map(|figure| {
            let png = render_png(figure, options)?;
            debug!(figure = figure.id(), bytes = png.len(), "Rendered figure");
            Ok(Artifact {
                id: format!("plot_{}", figure.id()),
                image: STANDARD.encode(png),
            })
        })
        .collect::<MatliteResult<Vec<_>>>();
    figures.close_all();
    artifacts
}
