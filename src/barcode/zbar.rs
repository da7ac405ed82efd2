//! zbar barcode backend.
//!
//! Runs `zbarimg` and parses its `TYPE:payload` output lines.

use std::path::Path;
use std::process::Command;

use tracing::debug;

use super::backend::{BarcodeBackend, BarcodeError, DecodedSymbol, Symbology};

/// zbarimg exits with this status when the image holds no symbols.
const EXIT_NO_SYMBOLS: i32 = 4;

/// Barcode backend using the `zbarimg` command-line tool.
#[derive(Debug, Clone, Default)]
pub struct ZbarBackend {
    binary: Option<String>,
}

impl ZbarBackend {
    pub fn new() -> Self {
        Self { binary: None }
    }

    /// Use a specific zbarimg binary instead of the one on PATH.
    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: Some(binary.into()),
        }
    }

    fn binary(&self) -> &str {
        self.binary.as_deref().unwrap_or("zbarimg")
    }
}

/// zbar config flags that report UPC-A/UPC-E under their own names
/// instead of folding them into EAN-13.
const UPC_FLAGS: [&str; 2] = ["-Supca.enable", "-Supce.enable"];

/// A 13-digit EAN with a leading zero is a UPC-A code.
fn as_upc_a(symbology: Symbology, payload: &str) -> (Symbology, String) {
    let is_padded_upc = symbology == Symbology::Ean13
        && payload.len() == 13
        && payload.starts_with('0')
        && payload.bytes().all(|b| b.is_ascii_digit());
    if is_padded_upc {
        (Symbology::UpcA, payload[1..].to_string())
    } else {
        (symbology, payload.to_string())
    }
}

/// Parse zbarimg output into symbols, skipping lines without a `TYPE:` prefix.
pub(crate) fn parse_zbar_output(stdout: &str) -> Vec<DecodedSymbol> {
    stdout
        .lines()
        .filter_map(|line| {
            let line = line.trim_end_matches(['\r', '\n']);
            let (kind, payload) = line.split_once(':')?;
            if kind.is_empty() || payload.is_empty() {
                return None;
            }
            let (symbology, payload) = as_upc_a(Symbology::from_zbar_name(kind), payload);
            Some(DecodedSymbol { symbology, payload })
        })
        .collect()
}

impl BarcodeBackend for ZbarBackend {
    fn name(&self) -> &str {
        "zbar"
    }

    fn is_available(&self) -> bool {
        which::which(self.binary()).is_ok()
    }

    fn availability_hint(&self) -> String {
        if self.is_available() {
            "zbarimg is available".to_string()
        } else {
            "zbarimg not installed. Install with: apt install zbar-tools".to_string()
        }
    }

    fn decode(&self, image_path: &Path) -> Result<Vec<DecodedSymbol>, BarcodeError> {
        let output = Command::new(self.binary())
            .arg("--quiet")
            .args(UPC_FLAGS)
            .arg(image_path)
            .output();

        let output = match output {
            Ok(output) => output,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(BarcodeError::BackendNotAvailable(
                    "zbarimg not found (install zbar-tools)".to_string(),
                ));
            }
            Err(e) => return Err(BarcodeError::Io(e)),
        };

        if output.status.code() == Some(EXIT_NO_SYMBOLS) {
            debug!("zbarimg found no symbols in {}", image_path.display());
            return Ok(Vec::new());
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(BarcodeError::DecodeFailed(format!(
                "zbarimg failed: {}",
                stderr.trim()
            )));
        }

        let symbols = parse_zbar_output(&String::from_utf8_lossy(&output.stdout));
        debug!("zbarimg decoded {} symbol(s)", symbols.len());
        Ok(symbols)
    }
}
