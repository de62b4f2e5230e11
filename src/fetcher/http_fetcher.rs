use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderValue, HOST};
use reqwest::{redirect, Client, Version};

use crate::app::{Result, TickerError};
use crate::domain::FeedUrl;
use crate::fetcher::Fetcher;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Plain HTTP/1.0, no redirects. The timeout bounds the whole request.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .redirect(redirect::Policy::none())
            .http1_only()
            .user_agent(concat!("ticker/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &FeedUrl) -> Result<Vec<u8>> {
        let host = HeaderValue::from_str(&url.host)
            .map_err(|e| TickerError::InvalidUrl(format!("{}: {}", url.host, e)))?;

        let response = self
            .client
            .get(url.request_url())
            .version(Version::HTTP_10)
            .header(HOST, host)
            .send()
            .await
            .map_err(classify)?;

        response.error_for_status_ref()?;

        let body = response.bytes().await?.to_vec();
        tracing::debug!("Fetched {} bytes from {}", body.len(), url);

        Ok(body)
    }
}

fn classify(e: reqwest::Error) -> TickerError {
    if e.is_connect() {
        TickerError::Connect(e.to_string())
    } else {
        TickerError::Http(e)
    }
}
