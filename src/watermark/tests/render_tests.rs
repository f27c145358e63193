use image::{DynamicImage, ImageBuffer, Rgb, Rgba};
use std::path::Path;

use crate::watermark::render::{load_font, placement, render_watermark};
use crate::watermark::types::Position;

#[test]
fn test_load_font_never_fails() {
    // No explicit font: the chain ends at the embedded face
    assert!(load_font(None).is_ok());

    // A bogus explicit path silently falls through
    assert!(load_font(Some(Path::new("/no/such/font.ttf"))).is_ok());
}

#[test]
fn test_render_preserves_dimensions() {
    let source = DynamicImage::ImageRgb8(ImageBuffer::from_pixel(200, 100, Rgb([10u8, 10, 10])));
    let font = load_font(None).unwrap();

    let out = render_watermark(
        &source,
        "2025-09-21",
        &font,
        20,
        [255, 255, 255],
        Position::Center,
        5,
        255,
    );

    assert_eq!(out.width(), 200);
    assert_eq!(out.height(), 100);
}

#[test]
fn test_render_does_not_modify_input() {
    let buffer = ImageBuffer::from_pixel(64, 64, Rgb([10u8, 20, 30]));
    let source = DynamicImage::ImageRgb8(buffer.clone());
    let font = load_font(None).unwrap();

    let _ = render_watermark(
        &source,
        "unknown",
        &font,
        24,
        [255, 255, 255],
        Position::Center,
        0,
        255,
    );

    assert_eq!(source.to_rgb8(), buffer);
}

#[test]
fn test_render_preserves_non_alpha_mode() {
    let source = DynamicImage::ImageRgb8(ImageBuffer::from_pixel(64, 64, Rgb([0u8, 0, 0])));
    let font = load_font(None).unwrap();

    let out = render_watermark(
        &source,
        "unknown",
        &font,
        16,
        [255, 255, 255],
        Position::BottomRight,
        4,
        255,
    );
    assert!(!out.color().has_alpha());

    let source = DynamicImage::ImageRgba8(ImageBuffer::from_pixel(64, 64, Rgba([0u8, 0, 0, 255])));
    let out = render_watermark(
        &source,
        "unknown",
        &font,
        16,
        [255, 255, 255],
        Position::BottomRight,
        4,
        255,
    );
    assert!(out.color().has_alpha());
}

#[test]
fn test_opaque_watermark_changes_pixels() {
    let source = DynamicImage::ImageRgb8(ImageBuffer::from_pixel(200, 100, Rgb([0u8, 0, 0])));
    let font = load_font(None).unwrap();

    let out = render_watermark(
        &source,
        "2024-01-02",
        &font,
        24,
        [255, 255, 255],
        Position::Center,
        0,
        255,
    );

    let changed = out
        .to_rgb8()
        .pixels()
        .any(|p| *p != Rgb([0u8, 0, 0]));
    assert!(changed, "an opaque watermark should leave visible pixels");
}

#[test]
fn test_zero_opacity_leaves_image_unchanged() {
    let buffer = ImageBuffer::from_pixel(120, 80, Rgb([40u8, 80, 120]));
    let source = DynamicImage::ImageRgb8(buffer.clone());
    let font = load_font(None).unwrap();

    let out = render_watermark(
        &source,
        "2024-01-02",
        &font,
        24,
        [255, 255, 255],
        Position::Center,
        0,
        0,
    );

    assert_eq!(out.to_rgb8(), buffer);
}

#[test]
fn test_center_placement_ignores_margin() {
    let with_small_margin = placement(Position::Center, (200, 100), (60, 20), 5);
    let with_large_margin = placement(Position::Center, (200, 100), (60, 20), 50);

    assert_eq!(with_small_margin, ((200 - 60) / 2, (100 - 20) / 2));
    assert_eq!(with_small_margin, with_large_margin);
}

#[test]
fn test_edge_placements_respect_margin() {
    let size = (200, 100);
    let text = (60, 20);

    assert_eq!(placement(Position::TopLeft, size, text, 5), (5, 5));
    assert_eq!(placement(Position::TopRight, size, text, 5), (135, 5));
    assert_eq!(placement(Position::BottomLeft, size, text, 5), (5, 75));
    assert_eq!(placement(Position::BottomRight, size, text, 5), (135, 75));
    assert_eq!(placement(Position::BottomCenter, size, text, 5), (70, 75));
    assert_eq!(placement(Position::TopCenter, size, text, 5), (70, 5));
    assert_eq!(placement(Position::CenterLeft, size, text, 5), (5, 40));
    assert_eq!(placement(Position::CenterRight, size, text, 5), (135, 40));
}
