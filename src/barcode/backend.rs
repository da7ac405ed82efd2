//! Barcode backend abstraction.

use std::path::Path;

use serde::Serialize;
use thiserror::Error;

/// Errors from barcode backends.
///
/// "No symbols found" is not an error; backends return an empty list.
#[derive(Debug, Error)]
pub enum BarcodeError {
    #[error("Backend not available: {0}")]
    BackendNotAvailable(String),

    #[error("Decoding failed: {0}")]
    DecodeFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Barcode symbology as reported by the decoder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Symbology {
    Ean13,
    Ean8,
    UpcA,
    UpcE,
    Isbn10,
    Isbn13,
    Code128,
    Code39,
    Code93,
    Interleaved2of5,
    DataBar,
    QrCode,
    Other(String),
}

impl Symbology {
    /// Parse a symbology name as printed by zbar.
    pub fn from_zbar_name(name: &str) -> Self {
        match name.to_ascii_uppercase().as_str() {
            "EAN-13" | "EAN13" => Self::Ean13,
            "EAN-8" | "EAN8" => Self::Ean8,
            "UPC-A" | "UPCA" => Self::UpcA,
            "UPC-E" | "UPCE" => Self::UpcE,
            "ISBN-10" | "ISBN10" => Self::Isbn10,
            "ISBN-13" | "ISBN13" => Self::Isbn13,
            "CODE-128" | "CODE128" => Self::Code128,
            "CODE-39" | "CODE39" => Self::Code39,
            "CODE-93" | "CODE93" => Self::Code93,
            "I2/5" | "I25" => Self::Interleaved2of5,
            "DATABAR" | "DATABAR-EXP" => Self::DataBar,
            "QR-CODE" | "QRCODE" => Self::QrCode,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Ean13 => "EAN-13",
            Self::Ean8 => "EAN-8",
            Self::UpcA => "UPC-A",
            Self::UpcE => "UPC-E",
            Self::Isbn10 => "ISBN-10",
            Self::Isbn13 => "ISBN-13",
            Self::Code128 => "CODE-128",
            Self::Code39 => "CODE-39",
            Self::Code93 => "CODE-93",
            Self::Interleaved2of5 => "I2/5",
            Self::DataBar => "DataBar",
            Self::QrCode => "QR-Code",
            Self::Other(name) => name,
        }
    }
}

impl std::fmt::Display for Symbology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One decoded barcode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedSymbol {
    pub symbology: Symbology,
    pub payload: String,
}

/// Trait for barcode decoders.
pub trait BarcodeBackend: Send + Sync {
    /// Short identifier for logs.
    fn name(&self) -> &str;

    /// Check if this backend can run (binary installed, etc.).
    fn is_available(&self) -> bool;

    /// Describe what's needed to make this backend available.
    fn availability_hint(&self) -> String;

    /// Decode every symbol in an image file, in the order the decoder reports them.
    fn decode(&self, image_path: &Path) -> Result<Vec<DecodedSymbol>, BarcodeError>;
}
