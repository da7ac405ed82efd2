//! CSV file catalog.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use super::{CatalogError, CatalogRow, CatalogWriter, CATALOG_HEADERS, SCAN_CODE_COLUMN};

/// Catalog stored as a local CSV file. A header row is written when the
/// file is created.
pub struct CsvCatalog {
    path: PathBuf,
}

impl CsvCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append_sync(&self, row: &CatalogRow) -> Result<(), CatalogError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let needs_header = std::fs::metadata(&self.path)
            .map(|m| m.len() == 0)
            .unwrap_or(true);

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        if needs_header {
            writer.write_record(CATALOG_HEADERS)?;
        }
        writer.write_record(row.cells())?;
        writer.flush()?;

        debug!("Appended '{}' to {}", row.title, self.path.display());
        Ok(())
    }

    fn scan_codes_sync(&self) -> Result<Vec<String>, CatalogError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&self.path)?;

        let mut codes = Vec::new();
        for record in reader.records() {
            let record = record?;
            if let Some(code) = record.get(SCAN_CODE_COLUMN) {
                if !code.is_empty() {
                    codes.push(code.to_string());
                }
            }
        }
        Ok(codes)
    }
}

#[async_trait]
impl CatalogWriter for CsvCatalog {
    fn name(&self) -> &str {
        "csv"
    }

    async fn append(&self, row: &CatalogRow) -> Result<(), CatalogError> {
        self.append_sync(row)
    }

    async fn existing_scan_codes(&self) -> Result<Vec<String>, CatalogError> {
        self.scan_codes_sync()
    }
}
