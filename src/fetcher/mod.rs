pub mod http_fetcher;

use async_trait::async_trait;

use crate::app::Result;
use crate::domain::FeedUrl;

/// One GET of the feed page.
///
/// Implementations return the full response body, `TickerError::Connect`
/// when the host cannot be reached, and `TickerError::Http` for failures
/// after the connection is up.
#[async_trait]
pub trait Fetcher {
    async fn fetch(&self, url: &FeedUrl) -> Result<Vec<u8>>;
}

pub use http_fetcher::HttpFetcher;
