//! collectscan - identify collectibles from packaging photos.
//!
//! A photo is normalized, searched for a barcode and a printed model code,
//! and the resulting codes are run through a chain of identity sources. The
//! merged record can be edited and appended to a CSV file or Google Sheet.

pub mod barcode;
pub mod catalog;
pub mod config;
pub mod http_client;
pub mod identity;
pub mod imaging;
pub mod models;
pub mod ocr;
pub mod pipeline;
pub mod session;
