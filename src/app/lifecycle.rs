//! Startup and teardown of the two stages.
//!
//! The producer runs as a spawned task and the consumer on the caller's
//! task. Termination signals only reach the consumer; once the consumer
//! returns, for whatever reason, it stops the producer through its
//! [`ProducerHandle`].

use std::future::Future;
use std::io;
use std::time::Duration;

use tokio::io::AsyncWrite;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::app::context::AppContext;
use crate::app::error::Result;
use crate::app::shutdown::{shutdown_channel, ShutdownSignal};
use crate::channel::{open_pipe, FrameWriter};
use crate::producer::Producer;
use crate::tui;

/// How long the producer gets to finish after being told to stop.
pub const STOP_GRACE: Duration = Duration::from_secs(2);

/// Owns the producer task and the only way to stop it.
pub struct ProducerHandle {
    signal: ShutdownSignal,
    task: JoinHandle<Result<()>>,
}

impl ProducerHandle {
    pub fn spawn<W>(producer: Producer, writer: FrameWriter<W>) -> Self
    where
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (signal, listener) = shutdown_channel();
        let task = tokio::spawn(producer.run(writer, listener));
        Self { signal, task }
    }

    /// Ask the producer to stop and wait up to `grace` for it. A producer
    /// stuck past the grace period is aborted.
    pub async fn stop(mut self, grace: Duration) -> Result<()> {
        self.signal.trigger();
        match tokio::time::timeout(grace, &mut self.task).await {
            Ok(joined) => joined?,
            Err(_) => {
                warn!("Producer did not stop within {:?}, aborting", grace);
                self.task.abort();
                Ok(())
            }
        }
    }
}

/// Run both stages until the consumer exits.
pub async fn run(ctx: AppContext) -> Result<()> {
    let (writer, reader) = open_pipe();

    let producer = Producer::new(ctx.fetcher.clone(), ctx.url.clone(), &ctx.config.fetch);
    let producer = ProducerHandle::spawn(producer, writer);

    let (consumer_signal, consumer_listener) = shutdown_channel();
    spawn_signal_listener(consumer_signal);

    info!("Ticker started for {}", ctx.url);
    let result = tui::run(&ctx, reader, consumer_listener).await;
    if let Err(e) = &result {
        error!("Consumer failed: {}", e);
    }

    if let Err(e) = producer.stop(STOP_GRACE).await {
        warn!("Producer ended with error: {}", e);
    }
    info!("Ticker stopped");
    result
}

fn spawn_signal_listener(shutdown: ShutdownSignal) {
    tokio::spawn(forward_termination(termination(), shutdown));
}

/// Resolves on SIGTERM, SIGQUIT or SIGINT (Ctrl-C elsewhere). Fails if the
/// handlers cannot be installed.
async fn termination() -> io::Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm = signal(SignalKind::terminate())?;
        let mut sigquit = signal(SignalKind::quit())?;
        let mut sigint = signal(SignalKind::interrupt())?;

        tokio::select! {
            _ = sigterm.recv() => {},
            _ = sigquit.recv() => {},
            _ = sigint.recv() => {},
        }
        Ok(())
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await
    }
}

/// Trigger `shutdown` once `signal` fires. If the handlers are missing this
/// never returns and `shutdown` stays alive.
async fn forward_termination<F>(signal: F, shutdown: ShutdownSignal)
where
    F: Future<Output = io::Result<()>>,
{
    match signal.await {
        Ok(()) => {
            info!("Termination signal received");
            shutdown.trigger();
        }
        Err(e) => {
            warn!("Failed to install signal handlers: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use crate::config::FetchConfig;
    use crate::domain::FeedUrl;
    use crate::producer::tests::{Reply, ScriptedFetcher};

    fn producer() -> Producer {
        let url = FeedUrl::parse("news.example.com/rss", 80).unwrap();
        Producer::new(
            Arc::new(ScriptedFetcher::new(vec![Reply::Body(
                "<title>a</title><title>b</title><title>Story</title>",
            )])),
            url,
            &FetchConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_stop_ends_sleeping_producer() {
        let (writer, mut reader) = open_pipe();
        let handle = ProducerHandle::spawn(producer(), writer);

        let frame = reader.next_frame().await.unwrap().unwrap();
        assert_eq!(frame.payload(), b"Story\n");

        handle.stop(Duration::from_secs(1)).await.unwrap();
        assert!(reader.next_frame().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_stop_after_consumer_left() {
        let (writer, reader) = open_pipe();
        drop(reader);
        let handle = ProducerHandle::spawn(producer(), writer);
        tokio::time::sleep(Duration::from_millis(50)).await;

        handle.stop(Duration::from_secs(1)).await.unwrap();
    }

    #[tokio::test]
    async fn test_signal_triggers_consumer_shutdown() {
        let (signal, mut listener) = shutdown_channel();
        tokio::spawn(forward_termination(async { Ok(()) }, signal));

        tokio::time::timeout(Duration::from_secs(1), listener.triggered())
            .await
            .unwrap();
        assert!(listener.is_triggered());
    }

    #[tokio::test]
    async fn test_missing_handlers_keep_consumer_running() {
        let (signal, mut listener) = shutdown_channel();
        tokio::spawn(forward_termination(
            async { Err(io::Error::other("no signal support")) },
            signal,
        ));

        let waited = tokio::time::timeout(Duration::from_millis(100), listener.triggered()).await;
        assert!(waited.is_err(), "listener must not resolve without a signal");
        assert!(!listener.is_triggered());
    }
}
