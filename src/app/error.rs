use thiserror::Error;

#[derive(Error, Debug)]
pub enum TickerError {
    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Channel closed")]
    ChannelClosed,

    #[error("Failed to launch notifier: {0}")]
    Launch(String),

    #[error("Task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl TickerError {
    /// Failures the producer recovers from with backoff-and-retry.
    pub fn is_network(&self) -> bool {
        matches!(self, TickerError::Connect(_) | TickerError::Http(_))
    }
}

impl From<url::ParseError> for TickerError {
    fn from(e: url::ParseError) -> Self {
        TickerError::InvalidUrl(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TickerError>;
