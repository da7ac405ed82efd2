//! End-to-end scans with stand-in backends and sources.

use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use image::{ImageFormat, Rgb, RgbImage};

use collectscan::barcode::{BarcodeBackend, BarcodeError, DecodedSymbol, Symbology};
use collectscan::catalog::{CatalogWriter, CsvCatalog};
use collectscan::identity::{
    AttemptOutcome, IdentityResolver, IdentitySource, SourceInput, SourceKind,
};
use collectscan::identity::sources::DeferredLinkSource;
use collectscan::identity::QueryEncoding;
use collectscan::models::{IdentitySourceResult, RecordField};
use collectscan::ocr::{OcrBackend, OcrBackendType, OcrError, OcrResult};
use collectscan::pipeline::ScanPipeline;
use collectscan::session::{PersistError, Session};

struct StubBarcode(Option<&'static str>);

impl BarcodeBackend for StubBarcode {
    fn name(&self) -> &str {
        "stub-barcode"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn availability_hint(&self) -> String {
        String::new()
    }

    fn decode(&self, _image_path: &Path) -> Result<Vec<DecodedSymbol>, BarcodeError> {
        Ok(self
            .0
            .map(|payload| DecodedSymbol {
                symbology: Symbology::from_zbar_name("UPC-A"),
                payload: payload.to_string(),
            })
            .into_iter()
            .collect())
    }
}

struct StubOcr(&'static str);

impl OcrBackend for StubOcr {
    fn backend_type(&self) -> OcrBackendType {
        OcrBackendType::External
    }

    fn is_available(&self) -> bool {
        true
    }

    fn availability_hint(&self) -> String {
        String::new()
    }

    fn ocr_image(&self, _image_path: &Path) -> Result<OcrResult, OcrError> {
        Ok(OcrResult {
            text: self.0.to_string(),
            backend: OcrBackendType::External,
            processing_time_ms: 1,
        })
    }
}

/// Answers one key with a fixed result.
struct TableSource {
    name: &'static str,
    input: SourceInput,
    key: &'static str,
    result: IdentitySourceResult,
}

#[async_trait]
impl IdentitySource for TableSource {
    fn name(&self) -> &str {
        self.name
    }

    fn input(&self) -> SourceInput {
        self.input
    }

    async fn resolve(&self, key: &str) -> IdentitySourceResult {
        if key == self.key {
            self.result.clone()
        } else {
            IdentitySourceResult::not_found()
        }
    }
}

fn packaging_photo() -> Vec<u8> {
    let img = RgbImage::from_fn(320, 240, |x, _| {
        if x % 8 < 4 {
            Rgb([20, 20, 20])
        } else {
            Rgb([240, 240, 240])
        }
    });
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png).unwrap();
    out.into_inner()
}

fn catalog_source(title: &str) -> Arc<TableSource> {
    Arc::new(TableSource {
        name: "catalog",
        input: SourceInput::ScanCode,
        key: "012345678905",
        result: IdentitySourceResult::found(title)
            .with_brand("Hot Wheels")
            .with_image_url("http://x/img.png"),
    })
}

fn search_source(title: &str) -> Arc<TableSource> {
    Arc::new(TableSource {
        name: "search",
        input: SourceInput::ModelPrefix,
        key: "JBB49",
        result: IdentitySourceResult::found(title)
            .with_image_url("http://wiki/supra.png")
            .with_reference_url("http://wiki/Toyota_Supra"),
    })
}

#[tokio::test]
async fn barcode_scan_is_identified_and_saved() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = CsvCatalog::new(dir.path().join("collection.csv"));

    let resolver = IdentityResolver::new().with_source(catalog_source("Speed Demon"));
    let pipeline = ScanPipeline::new(
        Box::new(StubBarcode(Some("012345678905"))),
        Box::new(StubOcr("COLLECT ALL\nAGES 3+\n")),
        resolver,
    );

    let mut session = Session::new();
    let report = session.scan(&pipeline, &packaging_photo()).await.unwrap();

    let record = session.record();
    assert_eq!(record.title, "Speed Demon");
    assert_eq!(record.brand, "Hot Wheels");
    assert_eq!(record.image_url, "http://x/img.png");
    assert_eq!(record.scan_code, "012345678905");
    assert_eq!(record.model_code, "");
    assert_eq!(
        report.resolution.unwrap().outcome_for("catalog"),
        Some(AttemptOutcome::Found)
    );

    let outcome = session.persist(&catalog).await.unwrap();
    assert!(!outcome.duplicate);
    assert!(session.record().is_blank());

    let mut reader = csv::Reader::from_path(catalog.path()).unwrap();
    let rows: Vec<Vec<String>> = reader
        .records()
        .map(|r| r.unwrap().iter().map(str::to_string).collect())
        .collect();
    assert_eq!(
        rows,
        vec![vec![
            "Speed Demon".to_string(),
            "Hot Wheels".to_string(),
            "=IMAGE(\"http://x/img.png\")".to_string(),
            "012345678905".to_string(),
            String::new(),
        ]]
    );
    assert_eq!(
        catalog.existing_scan_codes().await.unwrap(),
        vec!["012345678905".to_string()]
    );
}

#[tokio::test]
async fn blank_image_assigns_nothing() {
    let resolver = IdentityResolver::new()
        .with_source(catalog_source("Speed Demon"))
        .with_source(search_source("Toyota Supra"));
    let pipeline = ScanPipeline::new(Box::new(StubBarcode(None)), Box::new(StubOcr("")), resolver);

    let mut session = Session::new();
    let report = session.scan(&pipeline, &packaging_photo()).await.unwrap();

    assert!(session.record().is_blank());
    let resolution = report.resolution.unwrap();
    assert!(resolution.assigned.is_empty());
    assert!(!resolution.queried_any());
}

#[tokio::test]
async fn scan_code_source_takes_precedence() {
    let resolver = IdentityResolver::new()
        .with_source(catalog_source("Mazda RX-7"))
        .with_source(search_source("Toyota Supra"));
    let pipeline = ScanPipeline::new(
        Box::new(StubBarcode(Some("012345678905"))),
        Box::new(StubOcr("MATTEL\nJBB49-N7C5\n")),
        resolver,
    );

    let mut session = Session::new();
    let report = session.scan(&pipeline, &packaging_photo()).await.unwrap();

    assert_eq!(session.record().title, "Mazda RX-7");
    assert_eq!(session.record().image_url, "http://x/img.png");
    assert_eq!(session.record().model_code, "JBB49-N7C5");
    assert_eq!(
        report.resolution.unwrap().outcome_for("search"),
        Some(AttemptOutcome::TitleKnown)
    );
}

#[tokio::test]
async fn model_code_search_fills_title_and_keeps_catalog_image() {
    let untitled = Arc::new(TableSource {
        name: "catalog",
        input: SourceInput::ScanCode,
        key: "012345678905",
        result: IdentitySourceResult {
            found: true,
            brand: "Hot Wheels".to_string(),
            image_url: "http://x/img.png".to_string(),
            ..IdentitySourceResult::not_found()
        },
    });
    let resolver = IdentityResolver::new()
        .with_source(untitled)
        .with_source(search_source("Toyota Supra"));
    let pipeline = ScanPipeline::new(
        Box::new(StubBarcode(Some("012345678905"))),
        Box::new(StubOcr("JBB49-N7C5")),
        resolver,
    );

    let mut session = Session::new();
    let report = session.scan(&pipeline, &packaging_photo()).await.unwrap();

    assert_eq!(session.record().title, "Toyota Supra");
    assert_eq!(session.record().image_url, "http://x/img.png");
    let resolution = report.resolution.unwrap();
    assert_eq!(
        resolution.reference_url.as_deref(),
        Some("http://wiki/Toyota_Supra")
    );
    assert_eq!(
        resolution.assigned,
        vec![RecordField::Brand, RecordField::ImageUrl, RecordField::Title]
    );
}

#[tokio::test]
async fn unmatched_model_code_yields_manual_link() {
    let link: Arc<dyn IdentitySource> = Arc::new(DeferredLinkSource::new(
        "https://lookup.test/q/",
        QueryEncoding::Base64,
    ));
    assert_eq!(link.kind(), SourceKind::ManualLink);

    let resolver = IdentityResolver::new()
        .with_source(search_source("Toyota Supra"))
        .with_source(link);
    let pipeline = ScanPipeline::new(
        Box::new(StubBarcode(None)),
        Box::new(StubOcr("GHC12-ZZ99")),
        resolver,
    );

    let mut session = Session::new();
    let report = session.scan(&pipeline, &packaging_photo()).await.unwrap();

    assert!(session.record().title.is_empty());
    let resolution = report.resolution.unwrap();
    assert_eq!(
        resolution.manual_lookup_url.as_deref(),
        Some("https://lookup.test/q/R0hDMTI")
    );
}

#[tokio::test]
async fn untitled_record_is_never_written() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = CsvCatalog::new(dir.path().join("collection.csv"));

    let pipeline = ScanPipeline::new(
        Box::new(StubBarcode(Some("012345678905"))),
        Box::new(StubOcr("")),
        IdentityResolver::new(),
    );
    let mut session = Session::new();
    session.scan(&pipeline, &packaging_photo()).await.unwrap();

    let err = session.persist(&catalog).await.unwrap_err();
    assert!(matches!(err, PersistError::MissingTitle));
    assert!(!catalog.path().exists());
    assert_eq!(session.record().scan_code, "012345678905");

    session.edit(RecordField::Title, "Speed Demon");
    session.persist(&catalog).await.unwrap();
    assert!(catalog.path().exists());
}
