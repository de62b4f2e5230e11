pub mod context;
pub mod error;
pub mod lifecycle;
pub mod shutdown;

pub use context::AppContext;
pub use error::{Result, TickerError};
pub use shutdown::{shutdown_channel, ShutdownListener, ShutdownSignal};
