//! Identity resolution.
//!
//! An [`IdentityResolver`] walks an ordered chain of [`IdentitySource`]s,
//! merging each result into the session record until a title is known.
//! Sources never fail outward: every network, status, or parse problem is
//! logged and reported as "not found" so the chain can move on.

pub mod encoding;
pub mod merge;
mod resolver;
pub mod sources;

pub use encoding::QueryEncoding;
pub use merge::MergePass;
pub use resolver::{AttemptOutcome, IdentityResolver, Resolution, SourceAttempt};

use async_trait::async_trait;
use tracing::warn;

use crate::models::IdentitySourceResult;

/// Error type used inside identity sources.
///
/// These never cross [`IdentitySource::resolve`]; see [`degrade`].
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{service} returned status {status}")]
    Status { service: String, status: u16 },

    #[error("Rate limited by source: {0}")]
    RateLimited(String),

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Which record value a source is keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceInput {
    /// The decoded barcode payload.
    ScanCode,
    /// The model code text before the hyphen.
    ModelPrefix,
}

/// How a source's result is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Fetches and returns identity data.
    Automated,
    /// Produces a link for the user to follow by hand; never fetches.
    ManualLink,
}

/// Trait for pluggable identity sources.
#[async_trait]
pub trait IdentitySource: Send + Sync {
    /// Unique identifier for this source (e.g., "upcitemdb").
    fn name(&self) -> &str;

    /// The record value this source needs.
    fn input(&self) -> SourceInput;

    fn kind(&self) -> SourceKind {
        SourceKind::Automated
    }

    /// Look up `key`. Failures come back as a not-found result.
    async fn resolve(&self, key: &str) -> IdentitySourceResult;
}

/// Collapse a fallible lookup into a result, logging the failure.
pub fn degrade(
    source: &str,
    key: &str,
    outcome: Result<IdentitySourceResult, SourceError>,
) -> IdentitySourceResult {
    match outcome {
        Ok(result) => result,
        Err(e) => {
            warn!("{} lookup for '{}' failed: {}", source, key, e);
            IdentitySourceResult::not_found()
        }
    }
}
