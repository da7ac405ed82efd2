//! Barcode decoding.
//!
//! Decoding runs through a [`BarcodeBackend`]. The default backend shells out
//! to `zbarimg` (from the zbar tools), the same decoder family the scanner has
//! always relied on.

mod backend;
mod zbar;

pub use backend::{BarcodeBackend, BarcodeError, DecodedSymbol, Symbology};
pub use zbar::ZbarBackend;
