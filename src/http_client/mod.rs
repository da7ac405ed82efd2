//! Shared HTTP client for identity sources and catalog backends.
//!
//! Wraps a reqwest client with a service name (for logs), a timeout, and a
//! user agent. Every outbound request in the crate goes through here.

mod response;
#[cfg(test)]
pub(crate) mod test_server;

pub use response::HttpResponse;

use std::time::{Duration, Instant};

use reqwest::Client;
use tracing::debug;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default user agent.
pub const USER_AGENT: &str = concat!("collectscan/", env!("CARGO_PKG_VERSION"));

/// HTTP client tagged with the service it talks to.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    service: String,
}

/// Builder for constructing `HttpClient`.
pub struct HttpClientBuilder {
    service: String,
    timeout: Duration,
    user_agent: Option<String>,
}

impl HttpClientBuilder {
    /// Set the user agent string. Without this, uses [`USER_AGENT`].
    pub fn user_agent(mut self, ua: &str) -> Self {
        self.user_agent = Some(ua.to_string());
        self
    }

    /// Build the `HttpClient`.
    ///
    /// # Errors
    /// Returns an error if the TLS backend cannot be initialized.
    pub fn build(self) -> Result<HttpClient, String> {
        let user_agent = self.user_agent.as_deref().unwrap_or(USER_AGENT);
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(self.timeout)
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(|e| format!("Failed to create HTTP client: {}", e))?;

        Ok(HttpClient {
            client,
            service: self.service,
        })
    }
}

impl HttpClient {
    /// Create a builder for configuring an `HttpClient`.
    pub fn builder(service: &str, timeout: Duration) -> HttpClientBuilder {
        HttpClientBuilder {
            service: service.to_string(),
            timeout,
            user_agent: None,
        }
    }

    /// GET a URL with query parameters.
    pub async fn get(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<HttpResponse, reqwest::Error> {
        let start = Instant::now();
        let response = self.client.get(url).query(query).send().await?;
        debug!(
            "[{}] GET {} -> {} in {}ms",
            self.service,
            response.url(),
            response.status(),
            start.elapsed().as_millis()
        );
        Ok(HttpResponse::from_reqwest(response))
    }

    /// GET a URL with a bearer token.
    pub async fn get_authorized(
        &self,
        url: &str,
        query: &[(&str, &str)],
        token: &str,
    ) -> Result<HttpResponse, reqwest::Error> {
        let response = self
            .client
            .get(url)
            .query(query)
            .bearer_auth(token)
            .send()
            .await?;
        debug!("[{}] GET {} -> {}", self.service, url, response.status());
        Ok(HttpResponse::from_reqwest(response))
    }

    /// POST a JSON body with a bearer token.
    pub async fn post_json_authorized<B: serde::Serialize + ?Sized>(
        &self,
        url: &str,
        query: &[(&str, &str)],
        token: &str,
        body: &B,
    ) -> Result<HttpResponse, reqwest::Error> {
        let start = Instant::now();
        let response = self
            .client
            .post(url)
            .query(query)
            .bearer_auth(token)
            .json(body)
            .send()
            .await?;
        debug!(
            "[{}] POST {} -> {} in {}ms",
            self.service,
            url,
            response.status(),
            start.elapsed().as_millis()
        );
        Ok(HttpResponse::from_reqwest(response))
    }
}
