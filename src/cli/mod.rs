use std::path::PathBuf;

use clap::Parser;

use crate::config::{parse_interval, Config};

#[derive(Parser, Debug)]
#[command(name = "ticker")]
#[command(version, about = "A scrolling news ticker for the terminal", long_about = None)]
pub struct Cli {
    /// Page to poll: "host/path" or "http://host[:port]/path"
    pub url: String,

    /// Time between polls (e.g., "30m", "1h", "90s")
    #[arg(short, long, value_parser = parse_interval)]
    pub interval: Option<u64>,

    /// Program run with each submitted message as its only argument
    #[arg(short, long)]
    pub notifier: Option<PathBuf>,

    /// Config file (default: ~/.config/ticker/config.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log file (default: <cache dir>/ticker/ticker.log)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Let command-line flags win over the config file.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(secs) = self.interval {
            config.fetch.interval_secs = secs;
        }
        if let Some(program) = &self.notifier {
            config.notifier.program = Some(program.clone());
        }
        if let Some(path) = &self.log_file {
            config.log_file = Some(path.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use clap::error::ErrorKind;

    #[test]
    fn test_missing_url_is_usage_error() {
        let err = Cli::try_parse_from(["ticker"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_url_only() {
        let cli = Cli::try_parse_from(["ticker", "news.example.com/rss"]).unwrap();
        assert_eq!(cli.url, "news.example.com/rss");
        assert!(cli.interval.is_none());
        assert!(cli.notifier.is_none());
    }

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::try_parse_from([
            "ticker",
            "--interval",
            "5m",
            "--notifier",
            "/usr/bin/logger",
            "--log-file",
            "/tmp/ticker.log",
            "localhost/feed",
        ])
        .unwrap();

        let mut config = Config::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config.fetch.interval_secs, 300);
        assert_eq!(
            config.notifier.program(),
            Some(std::path::Path::new("/usr/bin/logger"))
        );
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/ticker.log")));
    }

    #[test]
    fn test_bad_interval_is_rejected() {
        let err = Cli::try_parse_from(["ticker", "-i", "soon", "localhost/"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);

        let err = Cli::try_parse_from(["ticker", "-i", "0", "localhost/"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
        let err =
            Cli::try_parse_from(["ticker", "-i", "300000000000000d", "localhost/"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
    }
}
