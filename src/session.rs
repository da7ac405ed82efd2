//! The single mutable candidate record and its lifecycle.

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::catalog::{CatalogRow, CatalogWriter};
use crate::imaging::ImageError;
use crate::models::{CollectibleRecord, RecordField};
use crate::pipeline::{ScanPipeline, ScanReport};

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("Item name is required before saving")]
    MissingTitle,

    #[error("Catalog write failed: {0}")]
    Catalog(String),
}

/// Result of a successful persist.
#[derive(Debug, Clone, Serialize)]
pub struct PersistOutcome {
    pub catalog: String,
    pub row: CatalogRow,
    /// The scan code was already present in the catalog. Advisory only.
    pub duplicate: bool,
}

/// Owns the candidate record for one user session.
#[derive(Debug, Default)]
pub struct Session {
    record: CollectibleRecord,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_brand(brand: &str) -> Self {
        Self {
            record: CollectibleRecord::with_default_brand(brand),
        }
    }

    pub fn record(&self) -> &CollectibleRecord {
        &self.record
    }

    /// Run the pipeline against this session's record.
    pub async fn scan(
        &mut self,
        pipeline: &ScanPipeline,
        bytes: &[u8],
    ) -> Result<ScanReport, ImageError> {
        pipeline.scan(bytes, &mut self.record).await
    }

    /// Direct user edit; overwrites whatever the pipeline found.
    pub fn edit(&mut self, field: RecordField, value: impl Into<String>) {
        self.record.set(field, value);
    }

    pub fn reset(&mut self) {
        self.record.reset();
    }

    /// Append the record to `catalog`, then reset it.
    ///
    /// A record without a title never reaches the writer. On writer failure
    /// the record is kept so the user can retry.
    pub async fn persist(
        &mut self,
        catalog: &dyn CatalogWriter,
    ) -> Result<PersistOutcome, PersistError> {
        if !self.record.is_persistable() {
            return Err(PersistError::MissingTitle);
        }

        let row = CatalogRow::from_record(&self.record);
        let duplicate = self.is_duplicate(catalog, &row.scan_code).await;

        catalog
            .append(&row)
            .await
            .map_err(|e| PersistError::Catalog(e.to_string()))?;

        info!("Saved '{}' to {} catalog", row.title, catalog.name());
        self.record.reset();

        Ok(PersistOutcome {
            catalog: catalog.name().to_string(),
            row,
            duplicate,
        })
    }

    async fn is_duplicate(&self, catalog: &dyn CatalogWriter, scan_code: &str) -> bool {
        if scan_code.is_empty() {
            return false;
        }
        match catalog.existing_scan_codes().await {
            Ok(codes) if codes.iter().any(|c| c == scan_code) => {
                warn!("Scan code {} is already in the catalog", scan_code);
                true
            }
            Ok(_) => false,
            Err(e) => {
                warn!("Could not check for duplicates: {}", e);
                false
            }
        }
    }
}
