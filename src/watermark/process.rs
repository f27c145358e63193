use image::{DynamicImage, ImageEncoder, codecs::jpeg::JpegEncoder};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

use super::error::WatermarkError;
use super::types::{Position, ProcessOptions, ProcessResult};
use super::{color, metadata, render};

enum Outcome {
    Written(PathBuf),
    WouldWrite(PathBuf),
    SkippedNoDate,
}

/// Process a single file: resolve its date, render the watermark, and save
/// the result next to the source directory. Every failure is absorbed into
/// a `ProcessResult` so one bad file never aborts a batch.
pub fn process_file(path: &Path, options: &ProcessOptions) -> ProcessResult {
    match try_process(path, options) {
        Ok(Outcome::Written(out_path)) => {
            info!("Saved watermarked image to {}", out_path.display());
            ProcessResult::Success(out_path)
        }
        Ok(Outcome::WouldWrite(out_path)) => {
            info!("[dry-run] would write {}", out_path.display());
            ProcessResult::Success(out_path)
        }
        Ok(Outcome::SkippedNoDate) => {
            info!("Skipping {}: no date available", path.display());
            ProcessResult::Skipped
        }
        Err(e) => {
            error!("Failed to process {}: {}", path.display(), e);
            ProcessResult::Failed(e.to_string())
        }
    }
}

fn try_process(path: &Path, options: &ProcessOptions) -> Result<Outcome, WatermarkError> {
    // The mtime fallback is attempted before the skip decision, so a file
    // without EXIF dates is only skipped when the fallback is off too.
    let text = match metadata::resolve_date(path, options.use_mtime_fallback) {
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None if options.skip_if_no_date => return Ok(Outcome::SkippedNoDate),
        None => {
            debug!("No date for {}, using placeholder text", path.display());
            "unknown".to_string()
        }
    };

    let color = color::parse_color(&options.color).unwrap_or_else(|e| {
        warn!("{}, using white", e);
        [255, 255, 255]
    });
    let position = Position::from_name(&options.position).unwrap_or(Position::Center);

    let img = image::open(path)?;
    let font = render::load_font(options.font_path.as_deref())?;
    let watermarked = render::render_watermark(
        &img,
        &text,
        &font,
        options.font_size,
        color,
        position,
        options.margin,
        options.opacity,
    );

    let out_path = output_path(path)?;

    if options.dry_run {
        // No write, and the output directory is not created either
        return Ok(Outcome::WouldWrite(out_path));
    }

    if let Some(out_dir) = out_path.parent() {
        std::fs::create_dir_all(out_dir)?;
    }
    save_image(&watermarked, path, &out_path, options.jpeg_quality)?;

    Ok(Outcome::Written(out_path))
}

/// Compute the output path for a source file: a `<dir>_watermark` sibling
/// of the source directory holding `<stem>_wm.<ext>`, extension case
/// preserved.
pub(crate) fn output_path(path: &Path) -> Result<PathBuf, WatermarkError> {
    let absolute = std::path::absolute(path)?;
    let src_dir = absolute.parent().ok_or(WatermarkError::InvalidPath)?;
    let dir_name = src_dir.file_name().ok_or(WatermarkError::InvalidPath)?;
    let out_dir = src_dir
        .parent()
        .unwrap_or(src_dir)
        .join(format!("{}_watermark", dir_name.to_string_lossy()));

    let stem = absolute.file_stem().ok_or(WatermarkError::InvalidPath)?;
    let out_name = match absolute.extension() {
        Some(ext) => format!("{}_wm.{}", stem.to_string_lossy(), ext.to_string_lossy()),
        None => format!("{}_wm", stem.to_string_lossy()),
    };

    Ok(out_dir.join(out_name))
}

fn save_image(
    image: &DynamicImage,
    source: &Path,
    out_path: &Path,
    jpeg_quality: u8,
) -> Result<(), WatermarkError> {
    let is_jpeg = source
        .extension()
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            ext == "jpg" || ext == "jpeg"
        })
        .unwrap_or(false);

    if is_jpeg {
        save_jpeg(image, out_path, jpeg_quality)
    } else {
        image.save(out_path).map_err(Into::into)
    }
}

/// Save as JPEG with the configured quality. JPEG has no alpha channel, so
/// the image is flattened to RGB first.
fn save_jpeg(image: &DynamicImage, path: &Path, quality: u8) -> Result<(), WatermarkError> {
    let rgb_image = image.to_rgb8();
    let output = std::fs::File::create(path)?;

    let encoder = JpegEncoder::new_with_quality(output, quality);
    encoder.write_image(
        &rgb_image,
        rgb_image.width(),
        rgb_image.height(),
        image::ExtendedColorType::Rgb8,
    )?;

    Ok(())
}
