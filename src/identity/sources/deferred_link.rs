//! Manual lookup link generator.
//!
//! When nothing automated produced a name, the user still gets a link to
//! the alternate provider's search page for the model code. The URL is built
//! exactly as [`EncodedLookupSource`](super::EncodedLookupSource) builds it,
//! but never fetched.

use async_trait::async_trait;

use crate::identity::encoding::{lookup_url, QueryEncoding};
use crate::identity::{IdentitySource, SourceInput, SourceKind};
use crate::models::IdentitySourceResult;

pub struct DeferredLinkSource {
    base_url: String,
    encoding: QueryEncoding,
}

impl DeferredLinkSource {
    pub fn new(base_url: &str, encoding: QueryEncoding) -> Self {
        Self {
            base_url: base_url.to_string(),
            encoding,
        }
    }

    pub fn link_for(&self, term: &str) -> String {
        lookup_url(&self.base_url, self.encoding, term)
    }
}

#[async_trait]
impl IdentitySource for DeferredLinkSource {
    fn name(&self) -> &str {
        "manual-link"
    }

    fn input(&self) -> SourceInput {
        SourceInput::ModelPrefix
    }

    fn kind(&self) -> SourceKind {
        SourceKind::ManualLink
    }

    async fn resolve(&self, key: &str) -> IdentitySourceResult {
        IdentitySourceResult::not_found().with_reference_url(self.link_for(key))
    }
}
