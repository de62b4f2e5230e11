use std::fs::{self, File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use ticker::app::{lifecycle, AppContext};
use ticker::cli::Cli;
use ticker::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    cli.apply_overrides(&mut config);

    init_tracing(&config);

    let ctx = AppContext::new(config, &cli.url)?;
    lifecycle::run(ctx).await?;

    println!("ticker client exited normally");
    Ok(())
}

/// The terminal belongs to the TUI, so logs go to a file. With no usable
/// log location they are discarded.
fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    let log_file = config
        .log_file
        .clone()
        .or_else(Config::default_log_path)
        .and_then(|path| open_log(&path).ok());

    match log_file {
        Some(file) => registry
            .with(
                fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .init(),
        None => registry.with(fmt::layer().with_writer(std::io::sink)).init(),
    }
}

fn open_log(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}
