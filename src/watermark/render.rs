use ab_glyph::{FontVec, PxScale};
use image::{DynamicImage, Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};
use std::path::Path;
use tracing::debug;

use super::WatermarkError;
use super::types::Position;

/// Compiled-in fallback face, used when neither the explicit font nor any
/// of the system locations can be loaded.
const EMBEDDED_FONT: &[u8] = include_bytes!("fonts/DejaVuSans.ttf");

/// Common system font locations tried in order after an explicit font path.
const FONT_SEARCH_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Load the watermark font: explicit file first, then the fixed list of
/// common system fonts, then the embedded face. Load failures at each step
/// fall through to the next.
pub fn load_font(explicit: Option<&Path>) -> Result<FontVec, WatermarkError> {
    if let Some(path) = explicit
        && path.exists()
    {
        match load_font_file(path) {
            Ok(font) => return Ok(font),
            Err(e) => debug!("Could not load font {}: {}", path.display(), e),
        }
    }

    for candidate in FONT_SEARCH_PATHS {
        let path = Path::new(candidate);
        if path.exists()
            && let Ok(font) = load_font_file(path)
        {
            return Ok(font);
        }
    }

    FontVec::try_from_vec(EMBEDDED_FONT.to_vec()).map_err(|_| WatermarkError::FontUnavailable)
}

fn load_font_file(path: &Path) -> Result<FontVec, WatermarkError> {
    let font_data = std::fs::read(path)?;
    FontVec::try_from_vec(font_data).map_err(|_| WatermarkError::FontUnavailable)
}

/// Composite `text` onto a copy of `image`.
///
/// The text is drawn onto a transparent overlay the size of the source and
/// alpha-composited over an RGBA copy, so partially transparent colors
/// blend with the photo underneath. The input image is never modified; the
/// output keeps the source dimensions, and sources without an alpha channel
/// come back without one.
#[allow(clippy::too_many_arguments)]
pub fn render_watermark(
    image: &DynamicImage,
    text: &str,
    font: &FontVec,
    font_size: u32,
    color: [u8; 3],
    position: Position,
    margin: u32,
    opacity: u8,
) -> DynamicImage {
    let mut base = image.to_rgba8();
    let mut overlay = RgbaImage::new(base.width(), base.height());

    let scale = PxScale::from(font_size as f32);
    let (text_width, text_height) = text_size(scale, font, text);
    let (x, y) = placement(
        position,
        (base.width(), base.height()),
        (text_width, text_height),
        margin,
    );

    draw_text_mut(
        &mut overlay,
        Rgba([color[0], color[1], color[2], opacity]),
        x,
        y,
        scale,
        font,
        text,
    );

    image::imageops::overlay(&mut base, &overlay, 0, 0);

    if image.color().has_alpha() {
        DynamicImage::ImageRgba8(base)
    } else {
        // Preserve the non-alpha mode of the source
        DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(base).to_rgb8())
    }
}

/// Resolve an anchor to the text's top-left pixel coordinates. Centered
/// axes ignore the margin.
pub(crate) fn placement(
    position: Position,
    (width, height): (u32, u32),
    (text_width, text_height): (u32, u32),
    margin: u32,
) -> (i32, i32) {
    let (w, h) = (width as i32, height as i32);
    let (tw, th) = (text_width as i32, text_height as i32);
    let margin = margin as i32;

    match position {
        Position::TopLeft => (margin, margin),
        Position::TopCenter => ((w - tw) / 2, margin),
        Position::TopRight => (w - tw - margin, margin),
        Position::CenterLeft => (margin, (h - th) / 2),
        Position::Center => ((w - tw) / 2, (h - th) / 2),
        Position::CenterRight => (w - tw - margin, (h - th) / 2),
        Position::BottomLeft => (margin, h - th - margin),
        Position::BottomCenter => ((w - tw) / 2, h - th - margin),
        Position::BottomRight => (w - tw - margin, h - th - margin),
    }
}
