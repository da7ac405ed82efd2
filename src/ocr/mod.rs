//! Text extraction from packaging photos.
//!
//! OCR runs on a contrast-boosted grayscale copy of the normalized image and
//! the recognized text is searched for a model code (see [`model_code`]).
//!
//! ## OCR Backends
//!
//! - **Tesseract**: Traditional OCR via the `tesseract` binary (default)
//!
//! Backends implement [`OcrBackend`] so a different engine can be slotted in
//! without touching the pipeline.

mod backend;
pub mod model_code;
mod tesseract;

pub use backend::{OcrBackend, OcrBackendType, OcrConfig, OcrError, OcrResult};
pub use model_code::{find_model_code, model_code_prefix};
pub use tesseract::TesseractBackend;
