//! Tesseract OCR backend.
//!
//! Shells out to the `tesseract` binary and reads text from stdout.

use std::ffi::OsString;
use std::path::Path;
use std::process::Command;
use std::time::Instant;

use tracing::debug;

use super::backend::{OcrBackend, OcrBackendType, OcrConfig, OcrError, OcrResult};

pub struct TesseractBackend {
    config: OcrConfig,
    binary: Option<String>,
}

impl TesseractBackend {
    pub fn new() -> Self {
        Self::with_config(OcrConfig::default())
    }

    pub fn with_config(config: OcrConfig) -> Self {
        Self {
            config,
            binary: None,
        }
    }

    /// Use a specific tesseract binary instead of the one on PATH.
    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = Some(binary.into());
        self
    }

    fn binary(&self) -> &str {
        self.binary.as_deref().unwrap_or("tesseract")
    }

    fn args(&self, image_path: &Path) -> Vec<OsString> {
        vec![
            image_path.as_os_str().to_owned(),
            "stdout".into(),
            "-l".into(),
            self.config.language.as_str().into(),
            "--psm".into(),
            self.config.page_seg_mode.to_string().into(),
        ]
    }

    fn run_tesseract(&self, image_path: &Path) -> Result<String, OcrError> {
        let output = Command::new(self.binary())
            .args(self.args(image_path))
            .output();

        match output {
            Ok(output) if output.status.success() => {
                Ok(String::from_utf8_lossy(&output.stdout).into_owned())
            }
            Ok(output) => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                Err(OcrError::OcrFailed(format!(
                    "tesseract failed: {}",
                    stderr.trim()
                )))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(
                OcrError::BackendNotAvailable(format!("{} not found", self.binary())),
            ),
            Err(e) => Err(OcrError::Io(e)),
        }
    }
}

impl Default for TesseractBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl OcrBackend for TesseractBackend {
    fn backend_type(&self) -> OcrBackendType {
        OcrBackendType::Tesseract
    }

    fn is_available(&self) -> bool {
        which::which(self.binary()).is_ok()
    }

    fn availability_hint(&self) -> String {
        if self.is_available() {
            format!("language {}", self.config.language)
        } else {
            "install with: apt install tesseract-ocr".to_string()
        }
    }

    fn ocr_image(&self, image_path: &Path) -> Result<OcrResult, OcrError> {
        let start = Instant::now();
        let text = self.run_tesseract(image_path)?;
        let elapsed = start.elapsed().as_millis() as u64;
        debug!("tesseract finished {} in {}ms", image_path.display(), elapsed);

        Ok(OcrResult {
            text,
            backend: OcrBackendType::Tesseract,
            processing_time_ms: elapsed,
        })
    }
}
