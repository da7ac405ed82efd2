//! Identity source implementations and the default chain.

mod deferred_link;
mod encoded_lookup;
mod upc_catalog;
mod wiki_search;

pub use deferred_link::DeferredLinkSource;
pub use encoded_lookup::{EncodedLookupSource, DEFAULT_LOOKUP_BASE_URL, DEFAULT_RESULT_SELECTOR};
pub use upc_catalog::{UpcCatalogSource, UPCITEMDB_BASE_URL};
pub use wiki_search::{article_url, WikiSearchSource, FANDOM_BASE_URL};

use std::sync::Arc;
use std::time::Duration;

use super::{IdentityResolver, SourceError};
use crate::config::SourceSettings;
use crate::http_client::HttpClient;

fn client_for(
    service: &str,
    timeout: Duration,
    user_agent: &str,
) -> Result<HttpClient, SourceError> {
    HttpClient::builder(service, timeout)
        .user_agent(user_agent)
        .build()
        .map_err(SourceError::Config)
}

/// Build the standard chain: UPC catalog, wiki search, scraped lookup, manual link.
pub fn default_resolver(
    settings: &SourceSettings,
    timeout: Duration,
    user_agent: &str,
) -> Result<IdentityResolver, SourceError> {
    let resolver = IdentityResolver::new()
        .with_source(Arc::new(UpcCatalogSource::new(
            client_for("upcitemdb", timeout, user_agent)?,
            &settings.upc_base_url,
        )))
        .with_source(Arc::new(WikiSearchSource::new(
            client_for("wiki-search", timeout, user_agent)?,
            &settings.wiki_base_url,
        )))
        .with_source(Arc::new(EncodedLookupSource::new(
            client_for("encoded-lookup", timeout, user_agent)?,
            &settings.lookup_base_url,
            settings.lookup_encoding,
            &settings.lookup_selector,
        )))
        .with_source(Arc::new(DeferredLinkSource::new(
            &settings.lookup_base_url,
            settings.lookup_encoding,
        )));

    Ok(resolver)
}
