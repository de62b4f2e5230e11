use std::sync::Arc;

use tracing::info;

use crate::app::error::{Result, TickerError};
use crate::config::Config;
use crate::domain::FeedUrl;
use crate::fetcher::{Fetcher, HttpFetcher};
use crate::notifier::{CommandNotifier, DisabledNotifier, Notifier};

/// Border rows plus one line of text.
pub const MIN_COMPOSE_HEIGHT: u16 = 3;

/// Everything both stages need, built once at startup.
pub struct AppContext {
    pub config: Arc<Config>,
    pub url: FeedUrl,
    pub fetcher: Arc<dyn Fetcher + Send + Sync>,
    pub notifier: Arc<dyn Notifier + Send + Sync>,
}

impl AppContext {
    pub fn new(config: Config, url: &str) -> Result<Self> {
        if config.display.compose_height < MIN_COMPOSE_HEIGHT {
            return Err(TickerError::Config(format!(
                "display.compose_height must be at least {}",
                MIN_COMPOSE_HEIGHT
            )));
        }

        let url = FeedUrl::parse(url, config.fetch.port)?;
        let fetcher: Arc<dyn Fetcher + Send + Sync> =
            Arc::new(HttpFetcher::with_timeout(config.fetch.timeout())?);
        let notifier = Self::notifier_for(&config);

        Ok(Self {
            config: Arc::new(config),
            url,
            fetcher,
            notifier,
        })
    }

    fn notifier_for(config: &Config) -> Arc<dyn Notifier + Send + Sync> {
        match config.notifier.program() {
            Some(program) => {
                info!("Submitted messages go to {}", program.display());
                Arc::new(CommandNotifier::new(program))
            }
            None => Arc::new(DisabledNotifier),
        }
    }
}
