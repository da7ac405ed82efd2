//! Orientation correction and size bounding.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageDecoder, ImageFormat, ImageReader};
use tracing::debug;

use super::ImageError;

/// Images wider than this are scaled down to fit a `MAX_WIDTH` square.
pub const MAX_WIDTH: u32 = 1000;

/// A decoded image whose pixels reflect the intended viewing orientation.
#[derive(Debug, Clone)]
pub struct NormalizedImage {
    image: DynamicImage,
    scaled: bool,
}

impl NormalizedImage {
    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Whether the image was scaled down during normalization.
    pub fn was_scaled(&self) -> bool {
        self.scaled
    }

    /// Write the image as PNG into `dir` for binary backends.
    pub fn write_png(&self, dir: &Path, stem: &str) -> Result<PathBuf, ImageError> {
        let path = dir.join(format!("{}.png", stem));
        self.image
            .save_with_format(&path, ImageFormat::Png)
            .map_err(|e| ImageError::Write(format!("{}: {}", path.display(), e)))?;
        Ok(path)
    }
}

/// Decode and normalize an encoded image held in memory.
pub fn normalize_bytes(bytes: &[u8]) -> Result<NormalizedImage, ImageError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| ImageError::Unreadable(e.to_string()))?;

    if reader.format().is_none() {
        return Err(ImageError::Unreadable("unrecognized image format".to_string()));
    }

    let mut decoder = reader
        .into_decoder()
        .map_err(|e| ImageError::Unreadable(e.to_string()))?;
    let orientation = decoder
        .orientation()
        .map_err(|e| ImageError::Unreadable(e.to_string()))?;
    let mut image =
        DynamicImage::from_decoder(decoder).map_err(|e| ImageError::Unreadable(e.to_string()))?;
    image.apply_orientation(orientation);

    Ok(bound_width(image))
}

fn bound_width(image: DynamicImage) -> NormalizedImage {
    if image.width() <= MAX_WIDTH {
        return NormalizedImage {
            image,
            scaled: false,
        };
    }

    let scaled = image.thumbnail(MAX_WIDTH, MAX_WIDTH);
    debug!(
        "Scaled image from {}x{} to {}x{}",
        image.width(),
        image.height(),
        scaled.width(),
        scaled.height()
    );
    NormalizedImage {
        image: scaled,
        scaled: true,
    }
}
