//! Thin HTTP client wrapper.

use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use crate::error::{RemoteError, Result};

/// HTTP client for fetching text documents.
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Create a new HTTP client. The browser owns timeouts on wasm32.
    #[cfg_attr(target_arch = "wasm32", allow(unused_variables))]
    pub fn new(request_timeout: Duration) -> Result<Self> {
        #[cfg(not(target_arch = "wasm32"))]
        let client = Client::builder().timeout(request_timeout).build()?;
        #[cfg(target_arch = "wasm32")]
        let client = Client::builder().build()?;

        Ok(Self { client })
    }

    /// GET `url` and return the body as text. Non-2xx statuses are errors.
    pub async fn get_text(&self, url: &str) -> Result<String> {
        debug!("GET {}", url);
        let resp = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(RemoteError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(resp.text().await?)
    }
}
