//! Producer stage: polls the news page and streams headlines into the channel.
//!
//! ```text
//! Polling → Fetching ─ok→ ExtractAndEmit → Sleeping(interval) → Polling
//!              └─err→ BackoffWait (notice emitted) ─────────────→ Polling
//! ```
//!
//! The loop ends (`Stopped`) when its shutdown listener fires or the
//! consumer drops the read end of the channel.

use std::sync::Arc;
use std::time::Duration;

use tokio::io::AsyncWrite;
use tracing::{debug, error, info, warn};

use crate::app::{Result, ShutdownListener, TickerError};
use crate::channel::{encode, encode_notice, Frame, FrameWriter};
use crate::config::{format_interval, FetchConfig};
use crate::domain::FeedUrl;
use crate::extractor::Extractor;
use crate::fetcher::Fetcher;

/// What one trip through `Fetching` produced.
#[derive(Debug)]
pub enum PollOutcome {
    /// New content; frames ready for the channel.
    Emitted(Vec<Frame>),
    /// Body length matches the previous poll.
    Unchanged,
    /// Content changed but no headlines were found.
    NoItems,
    Failed(TickerError),
}

pub struct Producer {
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    url: FeedUrl,
    extractor: Extractor,
    interval: Duration,
    backoff: Duration,
    last_len: Option<usize>,
}

impl Producer {
    pub fn new(fetcher: Arc<dyn Fetcher + Send + Sync>, url: FeedUrl, config: &FetchConfig) -> Self {
        Self {
            fetcher,
            url,
            extractor: Extractor::new(config.max_items)
                .with_entity_decoding(config.decode_entities),
            interval: config.interval(),
            backoff: config.backoff(),
            last_len: None,
        }
    }

    pub fn with_timing(mut self, interval: Duration, backoff: Duration) -> Self {
        self.interval = interval;
        self.backoff = backoff;
        self
    }

    /// Fetch once and decide what, if anything, to emit.
    ///
    /// Change detection compares only the body length with the previous
    /// successful fetch. Same-length edits are missed and that is accepted.
    pub async fn poll_once(&mut self) -> PollOutcome {
        let body = match self.fetcher.fetch(&self.url).await {
            Ok(body) => body,
            Err(e) => return PollOutcome::Failed(e),
        };

        let len = body.len();
        if self.last_len == Some(len) {
            return PollOutcome::Unchanged;
        }
        self.last_len = Some(len);

        let items = self.extractor.extract(&body);
        if items.is_empty() {
            return PollOutcome::NoItems;
        }

        debug!("Extracted {} headlines from {} bytes", items.len(), len);
        PollOutcome::Emitted(encode(items))
    }

    /// Text sent to the consumer when a fetch fails.
    pub fn failure_notice(&self) -> String {
        format!(
            "connection to news server lost ...\nretrying in {}\n",
            format_interval(self.backoff.as_secs())
        )
    }

    /// Run until shutdown or until the consumer goes away.
    pub async fn run<W>(
        mut self,
        mut writer: FrameWriter<W>,
        mut shutdown: ShutdownListener,
    ) -> Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        info!(
            "Producer started for {} (interval: {}, backoff: {})",
            self.url,
            format_interval(self.interval.as_secs()),
            format_interval(self.backoff.as_secs())
        );

        while !shutdown.is_triggered() {
            let outcome = tokio::select! {
                outcome = self.poll_once() => outcome,
                _ = shutdown.triggered() => break,
            };

            let (frames, pause) = match outcome {
                PollOutcome::Emitted(frames) => {
                    info!("Emitting {} frames", frames.len());
                    (frames, self.interval)
                }
                PollOutcome::Unchanged => {
                    debug!("Page unchanged, nothing to emit");
                    (Vec::new(), self.interval)
                }
                PollOutcome::NoItems => {
                    debug!("No headlines found on page");
                    (Vec::new(), self.interval)
                }
                PollOutcome::Failed(e) => {
                    if e.is_network() {
                        warn!("Fetch of {} failed: {}", self.url, e);
                    } else {
                        error!("Fetch of {} failed unexpectedly: {}", self.url, e);
                    }
                    (encode_notice(&self.failure_notice()), self.backoff)
                }
            };

            let written = tokio::select! {
                written = writer.write_frames(&frames) => written,
                _ = shutdown.triggered() => break,
            };
            match written {
                Ok(()) => {}
                Err(TickerError::ChannelClosed) => {
                    info!("Consumer closed the channel");
                    break;
                }
                Err(e) => return Err(e),
            }

            tokio::select! {
                _ = tokio::time::sleep(pause) => {}
                _ = shutdown.triggered() => break,
            }
        }

        info!("Producer stopped");
        Ok(())
    }
}
