//! Hands submitted compose messages to an external program.

use std::path::PathBuf;
use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::app::{Result, TickerError};

/// Receiver of messages typed into the compose region.
pub trait Notifier {
    /// Deliver `message` without waiting for the receiver to finish.
    fn notify(&self, message: &str) -> Result<()>;
}

/// Runs a configured executable with the message as its only argument.
///
/// The child gets no stdin and no inherited terminal output, runs in its
/// own process group, and is reaped by a background task.
#[derive(Debug, Clone)]
pub struct CommandNotifier {
    program: PathBuf,
}

impl CommandNotifier {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Notifier for CommandNotifier {
    fn notify(&self, message: &str) -> Result<()> {
        let mut command = Command::new(&self.program);
        command
            .arg(message)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(false);
        #[cfg(unix)]
        command.process_group(0);

        let mut child = command
            .spawn()
            .map_err(|e| TickerError::Launch(format!("{}: {}", self.program.display(), e)))?;

        let pid = child.id();
        info!("Launched notifier {} (pid {:?})", self.program.display(), pid);

        tokio::spawn(async move {
            match child.wait().await {
                Ok(status) => debug!("Notifier pid {:?} exited with {}", pid, status),
                Err(e) => warn!("Failed to reap notifier pid {:?}: {}", pid, e),
            }
        });

        Ok(())
    }
}

/// Used when no notifier program is configured; messages are only logged.
#[derive(Debug, Clone, Default)]
pub struct DisabledNotifier;

impl Notifier for DisabledNotifier {
    fn notify(&self, message: &str) -> Result<()> {
        info!("No notifier configured, dropping message ({} chars)", message.chars().count());
        Ok(())
    }
}
