//! Image preparation for the scan pipeline.
//!
//! - `normalize`: decode, apply EXIF orientation, bound the width
//! - `enhance`: grayscale + fixed contrast boost ahead of OCR

mod enhance;
mod normalize;

pub use enhance::{prepare_for_ocr, CONTRAST_FACTOR};
pub use normalize::{normalize_bytes, NormalizedImage, MAX_WIDTH};

use thiserror::Error;

/// Errors from image preparation. Any of these aborts the current scan.
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Unreadable image: {0}")]
    Unreadable(String),

    #[error("Failed to write image: {0}")]
    Write(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
