//! # Ticker
//!
//! A two-stage terminal news ticker.
//!
//! ## Architecture
//!
//! A producer task polls a news page and streams headlines through a
//! one-directional channel; the consumer scrolls them in a marquee while
//! taking keyboard and mouse input for a compose box:
//!
//! ```text
//! Fetcher → Extractor → Frame encoder ══ channel ══> Multiplexer → Marquee
//!                                                        └──────→ Compose → Notifier
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! # Poll a feed every 30 minutes (the default)
//! ticker news.example.com/rss.xml
//!
//! # Poll every 5 minutes and pipe submitted messages to a script
//! ticker --interval 5m --notifier ~/bin/post-message http://localhost:8080/feed
//! ```
//!
//! ## Modules
//!
//! - [`app`]: Context, errors, shutdown signals and the lifecycle coordinator
//! - [`channel`]: Fixed-size frames and the pipe that carries them
//! - [`cli`]: Command-line interface definitions
//! - [`config`]: TOML configuration
//! - [`domain`]: Feed URL and headline types
//! - [`extractor`]: Headline extraction from page markup
//! - [`fetcher`]: HTTP fetching
//! - [`notifier`]: Hand-off of composed messages
//! - [`producer`]: The polling loop
//! - [`tui`]: Terminal user interface

/// Application context, error handling and lifecycle.
///
/// The [`AppContext`](app::AppContext) struct wires together config,
/// fetcher and notifier; [`lifecycle::run`](app::lifecycle::run) starts
/// both stages.
pub mod app;

/// Frame codec and in-process pipe between the two stages.
pub mod channel;

/// Command-line interface using clap.
pub mod cli;

/// Configuration management.
///
/// Loads from `~/.config/ticker/config.toml`, supporting:
/// - Poll interval, backoff and request timeout
/// - Custom colors (named or hex)
/// - Custom keybindings
/// - The notifier program
pub mod config;

/// Core domain models.
///
/// - [`FeedUrl`](domain::FeedUrl): host, path and port of the polled page
/// - [`FeedItem`](domain::FeedItem): one cleaned headline
pub mod domain;

/// Pulls headlines out of `<title>` elements.
pub mod extractor;

/// HTTP fetching.
///
/// - [`Fetcher`](fetcher::Fetcher): Async trait for page fetching
/// - [`HttpFetcher`](fetcher::HttpFetcher): reqwest-based implementation
pub mod fetcher;

/// External program launched for each submitted message.
pub mod notifier;

pub mod producer;

/// Terminal user interface.
///
/// Two stacked regions built with ratatui:
/// - Marquee (scrolling headlines, alternating bold)
/// - Compose box (fixed height, mouse and quit-key status on its border)
///
/// F1 or Ctrl-C quits.
pub mod tui;
