use plotters::style::{register_font, FontStyle};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, warn};

/// Environment variable naming a TrueType font used for figure text
pub const FONT_ENV: &str = "MATLITE_FONT";

const SYSTEM_FONTS: [&str; 8] = [
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

static FONT_READY: OnceLock<bool> = OnceLock::new();

/// Register a `sans-serif` font once per process. Returns whether figure text can be drawn.
///
/// Only the first call decides; later calls report the same answer whatever path they pass.
pub fn ensure_font(preferred: Option<&Path>) -> bool {
    *FONT_READY.get_or_init(|| {
        let candidates = preferred
            .map(Path::to_path_buf)
            .into_iter()
            .chain(std::env::var_os(FONT_ENV).map(PathBuf::from))
            .chain(SYSTEM_FONTS.iter().map(PathBuf::from));

        for path in candidates {
            let Ok(bytes) = std::fs::read(&path) else {
                continue;
            };
            let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
            match register_font("sans-serif", FontStyle::Normal, bytes) {
                Ok(()) => {
                    debug!(font = %path.display(), "Registered figure font");
                    return true;
                }
                Err(_) => warn!(font = %path.display(), "Font file could not be loaded"),
            }
        }

        warn!("No usable font found, figures will be rendered without text");
        false
    })
}
