//! HTTP response wrapper.

use reqwest::{Response, StatusCode};

/// HTTP response with the status read up front and the body still pending.
pub struct HttpResponse {
    pub status: StatusCode,
    body: Response,
}

impl HttpResponse {
    pub(crate) fn from_reqwest(response: Response) -> Self {
        Self {
            status: response.status(),
            body: response,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// 429 or 503.
    pub fn is_rate_limited(&self) -> bool {
        let code = self.status.as_u16();
        code == 429 || code == 503
    }

    /// Final URL after redirects.
    pub fn url(&self) -> &reqwest::Url {
        self.body.url()
    }

    pub async fn text(self) -> Result<String, reqwest::Error> {
        self.body.text().await
    }
}
