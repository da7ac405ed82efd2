//! Catalog persistence.
//!
//! A catalog is an append-only table of five columns:
//! `[title, brand, image directive, scan code, model code]`. Writers never
//! deduplicate; [`CatalogWriter::existing_scan_codes`] exists so callers can
//! warn about repeats.

mod csv_file;
mod sheets;

pub use csv_file::CsvCatalog;
pub use sheets::SheetsCatalog;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::models::CollectibleRecord;

/// Column headers, in row order.
pub const CATALOG_HEADERS: [&str; 5] = ["Name", "Brand/Series", "Image", "UPC", "Model Code"];

/// Zero-based column holding the scan code.
pub const SCAN_CODE_COLUMN: usize = 3;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{service} returned status {status}: {message}")]
    Status {
        service: String,
        status: u16,
        message: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Spreadsheet formula that renders `url` as an inline image.
/// Empty URLs produce an empty cell.
pub fn image_directive(url: &str) -> String {
    let url = url.trim();
    if url.is_empty() {
        String::new()
    } else {
        format!("=IMAGE(\"{}\")", url.replace('"', "\"\""))
    }
}

/// One catalog row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogRow {
    pub title: String,
    pub brand: String,
    pub image: String,
    pub scan_code: String,
    pub model_code: String,
}

impl CatalogRow {
    pub fn from_record(record: &CollectibleRecord) -> Self {
        Self {
            title: record.title.trim().to_string(),
            brand: record.brand.trim().to_string(),
            image: image_directive(&record.image_url),
            scan_code: record.scan_code.clone(),
            model_code: record.model_code.clone(),
        }
    }

    /// Cells in column order.
    pub fn cells(&self) -> [&str; 5] {
        [
            &self.title,
            &self.brand,
            &self.image,
            &self.scan_code,
            &self.model_code,
        ]
    }
}

/// Trait for catalog backends.
#[async_trait]
pub trait CatalogWriter: Send + Sync {
    /// Short identifier for messages.
    fn name(&self) -> &str;

    /// Append a row after the existing data.
    async fn append(&self, row: &CatalogRow) -> Result<(), CatalogError>;

    /// Scan codes already present, in table order.
    async fn existing_scan_codes(&self) -> Result<Vec<String>, CatalogError>;
}
