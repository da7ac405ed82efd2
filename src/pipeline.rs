//! Scan pipeline.
//!
//! Normalize → barcode → OCR → model code → identity resolution. Stages run
//! sequentially; only an unreadable image aborts a scan. Barcode and OCR
//! failures degrade to "no signal".

use std::path::Path;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::barcode::{BarcodeBackend, DecodedSymbol};
use crate::identity::{IdentityResolver, Resolution};
use crate::imaging::{self, ImageError};
use crate::models::{CollectibleRecord, RecordField};
use crate::ocr::{find_model_code, OcrBackend};

/// What a single scan observed.
#[derive(Debug, Default, Serialize)]
pub struct ScanReport {
    pub width: u32,
    pub height: u32,
    pub scaled: bool,
    /// Every symbol the decoder reported; only the first is used.
    pub symbols: Vec<DecodedSymbol>,
    pub scan_code: Option<String>,
    pub ocr_text: String,
    pub model_code: Option<String>,
    /// `None` when lookups were skipped.
    pub resolution: Option<Resolution>,
}

pub struct ScanPipeline {
    barcode: Box<dyn BarcodeBackend>,
    ocr: Box<dyn OcrBackend>,
    resolver: IdentityResolver,
    lookups: bool,
}

impl ScanPipeline {
    pub fn new(
        barcode: Box<dyn BarcodeBackend>,
        ocr: Box<dyn OcrBackend>,
        resolver: IdentityResolver,
    ) -> Self {
        Self {
            barcode,
            ocr,
            resolver,
            lookups: true,
        }
    }

    /// Skip identity resolution; only local signals are extracted.
    pub fn without_lookups(mut self) -> Self {
        self.lookups = false;
        self
    }

    /// Run every stage on `bytes`, updating `record` in place.
    ///
    /// Returns `ImageError` only when the image cannot be decoded or the
    /// working files cannot be written; the record is untouched in that case.
    pub async fn scan(
        &self,
        bytes: &[u8],
        record: &mut CollectibleRecord,
    ) -> Result<ScanReport, ImageError> {
        let normalized = imaging::normalize_bytes(bytes)?;
        let workdir = tempfile::tempdir()?;
        let color_path = normalized.write_png(workdir.path(), "normalized")?;

        let gray = imaging::prepare_for_ocr(normalized.image());
        let gray_path = workdir.path().join("ocr.png");
        gray.save(&gray_path)
            .map_err(|e| ImageError::Write(e.to_string()))?;

        let mut report = ScanReport {
            width: normalized.width(),
            height: normalized.height(),
            scaled: normalized.was_scaled(),
            ..ScanReport::default()
        };

        self.read_barcode(&color_path, &mut report);
        self.read_text(&gray_path, &mut report);

        if let Some(code) = &report.scan_code {
            record.set(RecordField::ScanCode, code.clone());
        }
        if let Some(code) = &report.model_code {
            record.set(RecordField::ModelCode, code.clone());
        }

        if self.lookups {
            report.resolution = Some(self.resolver.resolve(record).await);
        }

        Ok(report)
    }

    fn read_barcode(&self, path: &Path, report: &mut ScanReport) {
        match self.barcode.decode(path) {
            Ok(symbols) => {
                if let Some(first) = symbols.first() {
                    info!("Decoded {} barcode: {}", first.symbology, first.payload);
                    report.scan_code = Some(first.payload.clone());
                } else {
                    debug!("No barcode found");
                }
                report.symbols = symbols;
            }
            Err(e) => warn!("{} unavailable, continuing without barcode: {}", self.barcode.name(), e),
        }
    }

    fn read_text(&self, path: &Path, report: &mut ScanReport) {
        match self.ocr.ocr_image(path) {
            Ok(result) => {
                debug!(
                    "{} read {} chars in {}ms",
                    result.backend,
                    result.text.len(),
                    result.processing_time_ms
                );
                report.model_code = find_model_code(&result.text).map(str::to_string);
                match &report.model_code {
                    Some(code) => info!("Found model code {}", code),
                    None => debug!("No model code in OCR text"),
                }
                report.ocr_text = result.text;
            }
            Err(e) => warn!(
                "{} unavailable, continuing without text: {}",
                self.ocr.backend_type(),
                e
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::barcode::{BarcodeError, Symbology};
    use crate::ocr::{OcrBackendType, OcrError, OcrResult};
    use image::{ImageFormat, RgbImage};
    use std::io::Cursor;

    struct NoBarcode;

    impl BarcodeBackend for NoBarcode {
        fn name(&self) -> &str {
            "none"
        }
        fn is_available(&self) -> bool {
            false
        }
        fn availability_hint(&self) -> String {
            String::new()
        }
        fn decode(&self, _: &Path) -> Result<Vec<DecodedSymbol>, BarcodeError> {
            Err(BarcodeError::BackendNotAvailable("missing".into()))
        }
    }

    struct TwoCodes;

    impl BarcodeBackend for TwoCodes {
        fn name(&self) -> &str {
            "two"
        }
        fn is_available(&self) -> bool {
            true
        }
        fn availability_hint(&self) -> String {
            String::new()
        }
        fn decode(&self, path: &Path) -> Result<Vec<DecodedSymbol>, BarcodeError> {
            assert!(path.exists());
            Ok(vec![
                DecodedSymbol {
                    symbology: Symbology::from_zbar_name("UPC-A"),
                    payload: "012345678905".into(),
                },
                DecodedSymbol {
                    symbology: Symbology::from_zbar_name("QR-Code"),
                    payload: "http://example.com".into(),
                },
            ])
        }
    }

    struct Text(&'static str);

    impl OcrBackend for Text {
        fn backend_type(&self) -> OcrBackendType {
            OcrBackendType::External
        }
        fn is_available(&self) -> bool {
            true
        }
        fn availability_hint(&self) -> String {
            String::new()
        }
        fn ocr_image(&self, path: &Path) -> Result<OcrResult, OcrError> {
            assert!(path.exists());
            Ok(OcrResult {
                text: self.0.to_string(),
                backend: OcrBackendType::External,
                processing_time_ms: 0,
            })
        }
    }

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, image::Rgb([200, 10, 10]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[tokio::test]
    async fn first_symbol_and_model_code_land_in_record() {
        let pipeline = ScanPipeline::new(
            Box::new(TwoCodes),
            Box::new(Text("HW MAINLINE\nJBB49-N7C5 0915\n")),
            IdentityResolver::new(),
        );
        let mut record = CollectibleRecord::new();
        let report = pipeline.scan(&png(1200, 600), &mut record).await.unwrap();

        assert_eq!(record.scan_code, "012345678905");
        assert_eq!(record.model_code, "JBB49-N7C5");
        assert_eq!(report.symbols.len(), 2);
        assert!(report.scaled);
        assert_eq!(report.width, 1000);
        assert!(report.resolution.unwrap().attempts.is_empty());
    }

    #[tokio::test]
    async fn backend_failures_degrade_to_no_signal() {
        let pipeline =
            ScanPipeline::new(Box::new(NoBarcode), Box::new(Text("")), IdentityResolver::new())
                .without_lookups();
        let mut record = CollectibleRecord::new();
        let report = pipeline.scan(&png(40, 30), &mut record).await.unwrap();

        assert!(record.is_blank());
        assert!(report.scan_code.is_none());
        assert!(report.model_code.is_none());
        assert!(report.resolution.is_none());
    }

    #[tokio::test]
    async fn unreadable_image_leaves_record_untouched() {
        let pipeline =
            ScanPipeline::new(Box::new(TwoCodes), Box::new(Text("")), IdentityResolver::new());
        let mut record = CollectibleRecord::new();
        record.set(RecordField::Title, "Kept");

        let err = pipeline.scan(b"not an image", &mut record).await.unwrap_err();
        assert!(matches!(err, ImageError::Unreadable(_)));
        assert_eq!(record.title, "Kept");
        assert!(record.scan_code.is_empty());
    }
}
