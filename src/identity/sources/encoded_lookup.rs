//! Alternate-provider lookup by scraping a search results page.
//!
//! The search term is encoded into the request URL (see
//! [`QueryEncoding`]), the page is fetched, and the first result link's text
//! becomes the candidate title.

use async_trait::async_trait;
use scraper::{Html, Selector};
use tracing::debug;

use crate::http_client::HttpClient;
use crate::identity::encoding::{lookup_url, QueryEncoding};
use crate::identity::{degrade, IdentitySource, SourceError, SourceInput};
use crate::models::IdentitySourceResult;

/// Default alternate provider: the wiki's full-text search page.
pub const DEFAULT_LOOKUP_BASE_URL: &str =
    "https://hotwheels.fandom.com/wiki/Special:Search?fulltext=1&query=";

/// Result links on Fandom search pages.
pub const DEFAULT_RESULT_SELECTOR: &str = "a.unified-search__result__title";

/// First result element matching `selector` with non-empty text.
///
/// Returns the trimmed display text and the link target resolved against
/// `page_url` when the element has an `href`.
fn parse_first_result(
    html: &str,
    selector: &str,
    page_url: &str,
) -> Result<Option<(String, Option<String>)>, SourceError> {
    let selector = Selector::parse(selector)
        .map_err(|e| SourceError::Config(format!("Invalid result selector: {:?}", e)))?;
    let document = Html::parse_document(html);
    let base = url::Url::parse(page_url).ok();

    for element in document.select(&selector) {
        let text = element
            .text()
            .collect::<String>()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        if text.is_empty() {
            continue;
        }

        let href = element.value().attr("href").and_then(|href| match &base {
            Some(base) => base.join(href).ok().map(|u| u.to_string()),
            None => Some(href.to_string()),
        });
        return Ok(Some((text, href)));
    }

    Ok(None)
}

/// Identity source that scrapes an alternate provider's results page.
pub struct EncodedLookupSource {
    client: HttpClient,
    base_url: String,
    encoding: QueryEncoding,
    selector: String,
}

impl EncodedLookupSource {
    pub fn new(client: HttpClient, base_url: &str, encoding: QueryEncoding, selector: &str) -> Self {
        Self {
            client,
            base_url: base_url.to_string(),
            encoding,
            selector: selector.to_string(),
        }
    }

    async fn lookup(&self, term: &str) -> Result<IdentitySourceResult, SourceError> {
        let url = lookup_url(&self.base_url, self.encoding, term);
        let response = self.client.get(&url, &[]).await?;

        if !response.is_success() {
            return Err(SourceError::Status {
                service: self.name().to_string(),
                status: response.status.as_u16(),
            });
        }

        let page_url = response.url().to_string();
        let html = response.text().await?;

        match parse_first_result(&html, &self.selector, &page_url)? {
            Some((title, href)) => {
                debug!("{} first result: {}", self.name(), title);
                let mut result = IdentitySourceResult::found(title);
                if let Some(href) = href {
                    result = result.with_reference_url(href);
                }
                Ok(result)
            }
            None => Ok(IdentitySourceResult::not_found()),
        }
    }
}

#[async_trait]
impl IdentitySource for EncodedLookupSource {
    fn name(&self) -> &str {
        "encoded-lookup"
    }

    fn input(&self) -> SourceInput {
        SourceInput::ModelPrefix
    }

    async fn resolve(&self, key: &str) -> IdentitySourceResult {
        degrade(self.name(), key, self.lookup(key).await)
    }
}
