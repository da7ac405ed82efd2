//! Code-search identity source (MediaWiki search API).
//!
//! Searches a collector wiki for the model code prefix and takes the best
//! hit's page title as the item name. The page link is derived from the
//! title the way MediaWiki builds article paths.

use async_trait::async_trait;
use serde::Deserialize;

use crate::http_client::HttpClient;
use crate::identity::{degrade, IdentitySource, SourceError, SourceInput};
use crate::models::IdentitySourceResult;

/// Hot Wheels Fandom wiki base URL.
pub const FANDOM_BASE_URL: &str = "https://hotwheels.fandom.com";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    query: Option<SearchQuery>,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    search: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    #[serde(default)]
    title: String,
}

/// Article URL for a page title: spaces become underscores under `/wiki/`.
pub fn article_url(base_url: &str, title: &str) -> String {
    format!(
        "{}/wiki/{}",
        base_url.trim_end_matches('/'),
        title.trim().replace(' ', "_")
    )
}

/// Parse a search response body into a result.
fn parse_search(body: &str, base_url: &str) -> Result<IdentitySourceResult, SourceError> {
    let response: SearchResponse =
        serde_json::from_str(body).map_err(|e| SourceError::Parse(e.to_string()))?;
    let query = response
        .query
        .ok_or_else(|| SourceError::Parse("response has no 'query' object".to_string()))?;

    match query.search.into_iter().next() {
        Some(hit) if !hit.title.trim().is_empty() => {
            let url = article_url(base_url, &hit.title);
            Ok(IdentitySourceResult::found(hit.title.trim()).with_reference_url(url))
        }
        _ => Ok(IdentitySourceResult::not_found()),
    }
}

/// Identity source backed by a MediaWiki `list=search` query.
pub struct WikiSearchSource {
    client: HttpClient,
    base_url: String,
}

impl WikiSearchSource {
    pub fn new(client: HttpClient, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn search(&self, term: &str) -> Result<IdentitySourceResult, SourceError> {
        let url = format!("{}/api.php", self.base_url);
        let response = self
            .client
            .get(
                &url,
                &[
                    ("action", "query"),
                    ("list", "search"),
                    ("srsearch", term),
                    ("srlimit", "1"),
                    ("format", "json"),
                ],
            )
            .await?;

        if !response.is_success() {
            return Err(SourceError::Status {
                service: self.name().to_string(),
                status: response.status.as_u16(),
            });
        }

        let body = response.text().await?;
        parse_search(&body, &self.base_url)
    }
}

#[async_trait]
impl IdentitySource for WikiSearchSource {
    fn name(&self) -> &str {
        "wiki-search"
    }

    fn input(&self) -> SourceInput {
        SourceInput::ModelPrefix
    }

    async fn resolve(&self, key: &str) -> IdentitySourceResult {
        degrade(self.name(), key, self.search(key).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http_client::test_server;

    #[test]
    fn builds_article_url() {
        assert_eq!(
            article_url("https://hotwheels.fandom.com/", "Mazda RX-7"),
            "https://hotwheels.fandom.com/wiki/Mazda_RX-7"
        );
    }

    #[test]
    fn parses_top_hit() {
        let body = r#"{"batchcomplete":"","query":{"searchinfo":{"totalhits":3},
            "search":[{"ns":0,"title":"Toyota Supra","pageid":1}]}}"#;
        let result = parse_search(body, FANDOM_BASE_URL).unwrap();
        assert!(result.found);
        assert_eq!(result.title, "Toyota Supra");
        assert_eq!(
            result.reference_url,
            "https://hotwheels.fandom.com/wiki/Toyota_Supra"
        );
    }

    #[test]
    fn no_hits_is_not_found() {
        let body = r#"{"query":{"searchinfo":{"totalhits":0},"search":[]}}"#;
        assert!(!parse_search(body, FANDOM_BASE_URL).unwrap().found);
    }

    #[test]
    fn missing_query_is_parse_error() {
        let body = r#"{"error":{"code":"nosrsearch"}}"#;
        assert!(matches!(
            parse_search(body, FANDOM_BASE_URL),
            Err(SourceError::Parse(_))
        ));
    }

    #[test]
    fn blank_title_is_not_found() {
        let body = r#"{"query":{"search":[{"title":"  "}]}}"#;
        assert!(!parse_search(body, FANDOM_BASE_URL).unwrap().found);
    }

    #[tokio::test]
    async fn resolves_from_server() {
        let base = test_server::serve(
            200,
            "application/json",
            r#"{"query":{"search":[{"title":"Toyota Supra"}]}}"#,
        )
        .await;
        let source = WikiSearchSource::new(test_server::client(), &base);
        let result = source.resolve("JBB49").await;
        assert_eq!(result.title, "Toyota Supra");
        assert_eq!(result.reference_url, format!("{}/wiki/Toyota_Supra", base));
    }

    #[tokio::test]
    async fn error_statuses_degrade_to_not_found() {
        for status in [404, 429, 500] {
            let base = test_server::serve(status, "text/plain", "oops").await;
            let source = WikiSearchSource::new(test_server::client(), &base);
            assert_eq!(
                source.resolve("JBB49").await,
                IdentitySourceResult::not_found(),
                "status {}",
                status
            );
        }
    }

    #[tokio::test]
    async fn malformed_body_degrades_to_not_found() {
        let base = test_server::serve(200, "application/json", r#"{"query": ["#).await;
        let source = WikiSearchSource::new(test_server::client(), &base);
        assert!(matches!(
            source.search("JBB49").await,
            Err(SourceError::Parse(_))
        ));
        assert_eq!(source.resolve("JBB49").await, IdentitySourceResult::not_found());
    }

    #[tokio::test]
    async fn unreachable_host_degrades_to_not_found() {
        let base = test_server::closed_port().await;
        let source = WikiSearchSource::new(test_server::client(), &base);
        assert_eq!(source.resolve("JBB49").await, IdentitySourceResult::not_found());
    }
}
