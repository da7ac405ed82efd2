//! Data models for collectscan.

mod identity;
mod record;

pub use identity::IdentitySourceResult;
pub use record::{CollectibleRecord, RecordField, DEFAULT_BRAND};
