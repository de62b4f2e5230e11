//! Configuration management for ticker.
//!
//! Configuration is read from `~/.config/ticker/config.toml` at startup.
//! If the file doesn't exist, a default configuration with comments is created.
//! Command-line flags override values from the file.

pub mod colors;
pub mod interval;
pub mod keybindings;

pub use colors::ColorConfig;
pub use interval::{format_interval, parse_interval};
pub use keybindings::KeybindingConfig;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::domain::feed::DEFAULT_PORT;
use crate::extractor::MAX_ITEMS;

/// Main configuration struct.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log file; defaults to `<cache dir>/ticker/ticker.log`.
    pub log_file: Option<PathBuf>,
    pub fetch: FetchConfig,
    pub display: DisplayConfig,
    pub notifier: NotifierConfig,
    pub colors: ColorConfig,
    pub keybindings: KeybindingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_file: None,
            fetch: FetchConfig::default(),
            display: DisplayConfig::default(),
            notifier: NotifierConfig::default(),
            colors: ColorConfig::default(),
            keybindings: KeybindingConfig::default(),
        }
    }
}

/// Polling cadence and request settings for the producer.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Sleep between polls, in seconds.
    #[serde(rename = "interval", deserialize_with = "interval::deserialize_interval")]
    pub interval_secs: u64,
    /// Wait after a failed fetch, in seconds.
    #[serde(rename = "backoff", deserialize_with = "interval::deserialize_interval")]
    pub backoff_secs: u64,
    pub timeout_secs: u64,
    pub max_items: usize,
    pub port: u16,
    pub decode_entities: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            interval_secs: 1800,
            backoff_secs: 60,
            timeout_secs: 30,
            max_items: MAX_ITEMS,
            port: DEFAULT_PORT,
            decode_entities: false,
        }
    }
}

impl FetchConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.max(1))
    }

    pub fn backoff(&self) -> Duration {
        Duration::from_secs(self.backoff_secs.max(1))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Rows taken by the compose region, borders included.
    pub compose_height: u16,
    /// Caption centered on the marquee's top border.
    pub title: String,
    /// Capture mouse events.
    pub mouse: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            compose_height: 6,
            title: " ticker ".to_string(),
            mouse: true,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NotifierConfig {
    /// Executable run with each submitted message as its only argument.
    pub program: Option<PathBuf>,
}

impl NotifierConfig {
    pub fn program(&self) -> Option<&Path> {
        self.program
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
    }
}

impl Config {
    /// Load configuration from the default path, creating it with
    /// commented defaults on first run.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::default_config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Load from an explicit path. The file must exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("ticker").join("config.toml"))
    }

    /// Default log location, if the platform has a cache directory.
    pub fn default_log_path() -> Option<PathBuf> {
        dirs::cache_dir().map(|d| d.join("ticker").join("ticker.log"))
    }

    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        fs::write(path, Self::default_config_content()).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })
    }

    fn default_config_content() -> &'static str {
        r##"# ticker configuration
#
# Intervals accept "30m", "1h", "1d", "60s" or a number of seconds.
# Colors accept names (Black, Red, ..., White, Reset) or "#RRGGBB" / "#RGB".
# Keys accept characters ("a"), names (Enter, Backspace, Left, Right, Esc,
# F1-F12) and modifiers ("Ctrl+c", "Alt+x").

# Log file (default: <cache dir>/ticker/ticker.log)
# log_file = "/tmp/ticker.log"

[fetch]
# Time between polls of the news page
interval = "30m"

# Wait before retrying after a failed fetch
backoff = "60s"

# Give up on a request after this many seconds
timeout_secs = 30

# Most headlines taken from one page
max_items = 100

# Port used when the URL names none
port = 80

# Decode HTML entities such as &amp; in headlines
decode_entities = false

[display]
# Height of the compose region, borders included
compose_height = 6

# Caption on the marquee border
title = " ticker "

# Capture mouse clicks
mouse = true

[notifier]
# Program run with each submitted message as its only argument
# program = "/usr/local/bin/notify-send"

[colors]
border = "Reset"
title = "Reset"
text = "Reset"
highlight = "Reset"
input = "Reset"
status = "Reset"

[keybindings]
quit = ["F1", "Ctrl+c"]
submit = ["Enter"]
backspace = ["Backspace", "Ctrl+h"]
move_left = ["Left"]
move_right = ["Right"]
"##
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    use ratatui::style::Color;

    #[test]
    fn test_default_config_deserializes() {
        let config: Config = toml::from_str(Config::default_config_content())
            .expect("Default config should be valid TOML");

        assert_eq!(config.fetch.interval_secs, 1800);
        assert_eq!(config.fetch.backoff_secs, 60);
        assert_eq!(config.fetch.max_items, 100);
        assert_eq!(config.display.compose_height, 6);
        assert_eq!(config.keybindings.quit, vec!["F1", "Ctrl+c"]);
        assert!(config.notifier.program().is_none());
    }

    #[test]
    fn test_partial_config() {
        let content = r##"
[fetch]
interval = 300
backoff = "2m"

[colors]
highlight = "#FF0000"

[notifier]
program = "/usr/bin/logger"
"##;
        let config: Config = toml::from_str(content).expect("Partial config should work");

        assert_eq!(config.fetch.interval(), Duration::from_secs(300));
        assert_eq!(config.fetch.backoff(), Duration::from_secs(120));
        assert_eq!(config.fetch.timeout_secs, 30);
        assert_eq!(config.colors.highlight, Color::Rgb(255, 0, 0));
        assert_eq!(config.colors.border, Color::Reset);
        assert_eq!(
            config.notifier.program(),
            Some(Path::new("/usr/bin/logger"))
        );
    }

    #[test]
    fn test_empty_config() {
        let config: Config = toml::from_str("").expect("Empty config should work");
        assert_eq!(config.fetch.port, 80);
        assert_eq!(config.display.title, " ticker ");
        assert!(config.display.mouse);
    }

    #[test]
    fn test_invalid_interval_is_rejected() {
        let result: Result<Config, _> = toml::from_str("[fetch]\ninterval = \"whenever\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_interval_is_rejected_or_clamped() {
        let result: Result<Config, _> = toml::from_str("[fetch]\ninterval = 0\n");
        assert!(result.is_err());
        let result: Result<Config, _> = toml::from_str("[fetch]\nbackoff = \"0s\"\n");
        assert!(result.is_err());

        let fetch = FetchConfig {
            interval_secs: 0,
            backoff_secs: 0,
            ..FetchConfig::default()
        };
        assert_eq!(fetch.interval(), Duration::from_secs(1));
        assert_eq!(fetch.backoff(), Duration::from_secs(1));
    }

    #[test]
    fn test_empty_notifier_program_is_disabled() {
        let config: Config = toml::from_str("[notifier]\nprogram = \"\"\n").unwrap();
        assert!(config.notifier.program().is_none());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[fetch]\nmax_items = 5\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.fetch.max_items, 5);

        let missing = dir.path().join("missing.toml");
        assert!(matches!(
            Config::load_from(&missing),
            Err(ConfigError::Io { .. })
        ));

        fs::write(&path, "[fetch\n").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}
