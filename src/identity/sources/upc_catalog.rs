//! Numeric-code catalog source (UPCitemdb).
//!
//! Looks up a scanned UPC/EAN against the UPCitemdb trial API. A hit here is
//! the most trustworthy signal the chain has, so it runs first.

use async_trait::async_trait;
use serde::Deserialize;

use crate::http_client::HttpClient;
use crate::identity::{degrade, IdentitySource, SourceError, SourceInput};
use crate::models::IdentitySourceResult;

/// UPCitemdb API base URL.
pub const UPCITEMDB_BASE_URL: &str = "https://api.upcitemdb.com";

const LOOKUP_PATH: &str = "/prod/trial/lookup";

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    items: Vec<LookupItem>,
}

#[derive(Debug, Deserialize)]
struct LookupItem {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    brand: Option<String>,
    #[serde(default)]
    images: Vec<String>,
}

/// Parse a lookup response body.
fn parse_lookup(body: &str) -> Result<IdentitySourceResult, SourceError> {
    let response: LookupResponse =
        serde_json::from_str(body).map_err(|e| SourceError::Parse(e.to_string()))?;

    let Some(item) = response.items.into_iter().next() else {
        return Ok(IdentitySourceResult::not_found());
    };

    let image_url = item.images.into_iter().next().unwrap_or_default();
    Ok(IdentitySourceResult::found(item.title.unwrap_or_default().trim())
        .with_brand(item.brand.unwrap_or_default().trim())
        .with_image_url(image_url.trim()))
}

/// Identity source backed by the UPCitemdb lookup endpoint.
pub struct UpcCatalogSource {
    client: HttpClient,
    base_url: String,
}

impl UpcCatalogSource {
    pub fn new(client: HttpClient, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn lookup(&self, code: &str) -> Result<IdentitySourceResult, SourceError> {
        let url = format!("{}{}", self.base_url, LOOKUP_PATH);
        let response = self.client.get(&url, &[("upc", code)]).await?;

        if response.is_rate_limited() {
            return Err(SourceError::RateLimited(self.name().to_string()));
        }
        // Unknown codes come back as 400/404 with an error body.
        if !response.is_success() {
            return Err(SourceError::Status {
                service: self.name().to_string(),
                status: response.status.as_u16(),
            });
        }

        let body = response.text().await?;
        parse_lookup(&body)
    }
}

#[async_trait]
impl IdentitySource for UpcCatalogSource {
    fn name(&self) -> &str {
        "upcitemdb"
    }

    fn input(&self) -> SourceInput {
        SourceInput::ScanCode
    }

    async fn resolve(&self, key: &str) -> IdentitySourceResult {
        degrade(self.name(), key, self.lookup(key.trim()).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http_client::test_server;

    #[test]
    fn parses_first_item() {
        let body = r#"{
            "code": "OK",
            "total": 2,
            "items": [
                {"title": "Speed Demon", "brand": "Hot Wheels", "images": ["http://x/img.png", "http://x/2.png"]},
                {"title": "Second", "brand": "Other", "images": []}
            ]
        }"#;
        let result = parse_lookup(body).unwrap();
        assert!(result.found);
        assert_eq!(result.title, "Speed Demon");
        assert_eq!(result.brand, "Hot Wheels");
        assert_eq!(result.image_url, "http://x/img.png");
    }

    #[test]
    fn empty_items_is_not_found() {
        let result = parse_lookup(r#"{"code":"OK","total":0,"items":[]}"#).unwrap();
        assert!(!result.found);
    }

    #[test]
    fn missing_items_is_not_found() {
        let result = parse_lookup(r#"{"code":"INVALID_UPC","message":"Not a valid UPC code."}"#)
            .unwrap();
        assert!(!result.found);
    }

    #[test]
    fn missing_images_gives_empty_url() {
        let result = parse_lookup(r#"{"items":[{"title":"Twin Mill"}]}"#).unwrap();
        assert!(result.found);
        assert_eq!(result.image_url, "");
        assert_eq!(result.brand, "");
    }

    #[test]
    fn malformed_body_is_parse_error() {
        assert!(matches!(
            parse_lookup("<html>nope</html>"),
            Err(SourceError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn resolves_from_server() {
        let base = test_server::serve(
            200,
            "application/json",
            r#"{"items":[{"title":"Speed Demon","brand":"Hot Wheels","images":["http://x/img.png"]}]}"#,
        )
        .await;
        let source = UpcCatalogSource::new(test_server::client(), &base);
        let result = source.resolve("012345678905").await;
        assert_eq!(
            result,
            IdentitySourceResult::found("Speed Demon")
                .with_brand("Hot Wheels")
                .with_image_url("http://x/img.png")
        );
    }

    #[tokio::test]
    async fn error_statuses_degrade_to_not_found() {
        for status in [400, 404, 429, 500, 503] {
            let base =
                test_server::serve(status, "application/json", r#"{"code":"ERR"}"#).await;
            let source = UpcCatalogSource::new(test_server::client(), &base);
            assert_eq!(
                source.resolve("012345678905").await,
                IdentitySourceResult::not_found(),
                "status {}",
                status
            );
        }
    }

    #[tokio::test]
    async fn rate_limit_and_status_errors_are_typed() {
        let base = test_server::serve(429, "application/json", "{}").await;
        let source = UpcCatalogSource::new(test_server::client(), &base);
        assert!(matches!(
            source.lookup("012345678905").await,
            Err(SourceError::RateLimited(_))
        ));

        let base = test_server::serve(404, "application/json", "{}").await;
        let source = UpcCatalogSource::new(test_server::client(), &base);
        assert!(matches!(
            source.lookup("012345678905").await,
            Err(SourceError::Status { status: 404, .. })
        ));
    }

    #[tokio::test]
    async fn malformed_body_degrades_to_not_found() {
        let base = test_server::serve(200, "text/html", "<html>maintenance</html>").await;
        let source = UpcCatalogSource::new(test_server::client(), &base);
        assert_eq!(
            source.resolve("012345678905").await,
            IdentitySourceResult::not_found()
        );
    }

    #[tokio::test]
    async fn unreachable_host_degrades_to_not_found() {
        let base = test_server::closed_port().await;
        let source = UpcCatalogSource::new(test_server::client(), &base);
        assert_eq!(
            source.resolve("012345678905").await,
            IdentitySourceResult::not_found()
        );
    }
}
