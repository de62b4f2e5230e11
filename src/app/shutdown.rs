//! Per-task shutdown flags.
//!
//! Each task owns its own listener; there is no flag shared by both
//! stages. A task is stopped by triggering the [`ShutdownSignal`] paired
//! with its listener.

use std::sync::Arc;

use tokio::sync::watch;

/// Requests shutdown of the task holding the paired listener.
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    tx: Arc<watch::Sender<bool>>,
}

/// Observed by a task's main loop.
#[derive(Debug, Clone)]
pub struct ShutdownListener {
    rx: watch::Receiver<bool>,
}

pub fn shutdown_channel() -> (ShutdownSignal, ShutdownListener) {
    let (tx, rx) = watch::channel(false);
    (ShutdownSignal { tx: Arc::new(tx) }, ShutdownListener { rx })
}

impl ShutdownSignal {
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }
}

impl ShutdownListener {
    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once shutdown is requested, or once every signal is dropped.
    pub async fn triggered(&mut self) {
        let _ = self.rx.wait_for(|stop| *stop).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    #[tokio::test]
    async fn test_trigger_wakes_listener() {
        let (signal, mut listener) = shutdown_channel();
        assert!(!listener.is_triggered());

        let waiter = tokio::spawn(async move {
            listener.triggered().await;
            listener.is_triggered()
        });
        signal.trigger();

        let seen = tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("listener should wake")
            .unwrap();
        assert!(seen);
        assert!(signal.is_triggered());
    }

    #[tokio::test]
    async fn test_dropped_signal_releases_listener() {
        let (signal, mut listener) = shutdown_channel();
        drop(signal);
        tokio::time::timeout(Duration::from_secs(1), listener.triggered())
            .await
            .expect("listener should not hang");
    }

    #[tokio::test]
    async fn test_listeners_are_independent() {
        let (producer_signal, producer) = shutdown_channel();
        let (_consumer_signal, consumer) = shutdown_channel();
        producer_signal.trigger();
        assert!(producer.is_triggered());
        assert!(!consumer.is_triggered());
    }
}
