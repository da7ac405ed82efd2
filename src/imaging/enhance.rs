//! OCR preprocessing.

use image::{DynamicImage, GrayImage, Luma};

/// Fixed contrast multiplier applied before OCR.
pub const CONTRAST_FACTOR: f32 = 2.5;

/// Convert to grayscale and stretch contrast around the mean luminance.
///
/// Each pixel becomes `mean + CONTRAST_FACTOR * (p - mean)`, clamped to the
/// valid range. The transform depends only on the input pixels.
pub fn prepare_for_ocr(image: &DynamicImage) -> GrayImage {
    let gray = to_luma(image);
    boost_contrast(&gray, CONTRAST_FACTOR)
}

// ITU-R 601-2 luma, same weights as PIL's `convert("L")`.
fn to_luma(image: &DynamicImage) -> GrayImage {
    let rgb = image.to_rgb8();
    let (width, height) = rgb.dimensions();
    GrayImage::from_fn(width, height, |x, y| {
        let [r, g, b] = rgb.get_pixel(x, y).0;
        let luma = (r as u32 * 299 + g as u32 * 587 + b as u32 * 114 + 500) / 1000;
        Luma([luma.min(255) as u8])
    })
}

fn mean_luma(gray: &GrayImage) -> f32 {
    let count = gray.width() as u64 * gray.height() as u64;
    if count == 0 {
        return 0.0;
    }
    let sum: u64 = gray.pixels().map(|p| p.0[0] as u64).sum();
    (sum as f64 / count as f64).round() as f32
}

fn boost_contrast(gray: &GrayImage, factor: f32) -> GrayImage {
    let mean = mean_luma(gray);
    let mut out = gray.clone();
    for pixel in out.pixels_mut() {
        let value = mean + factor * (pixel.0[0] as f32 - mean);
        pixel.0[0] = value.round().clamp(0.0, 255.0) as u8;
    }
    out
}
