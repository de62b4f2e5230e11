use std::fmt;

use url::Url;

use crate::app::{Result, TickerError};

pub const DEFAULT_PORT: u16 = 80;

/// Location of the polled page, split the way the request is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedUrl {
    pub host: String,
    pub path: String,
    pub port: u16,
}

impl FeedUrl {
    /// Parse `host/path` or `http://host[:port]/path`.
    ///
    /// `default_port` applies when the input names no port.
    pub fn parse(input: &str, default_port: u16) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() {
            return Err(TickerError::InvalidUrl("empty url".into()));
        }

        let url = if input.contains("://") {
            Url::parse(input)?
        } else {
            Url::parse(&format!("http://{}", input))?
        };

        if url.scheme() != "http" {
            return Err(TickerError::InvalidUrl(format!(
                "unsupported scheme '{}' (only plain http is supported)",
                url.scheme()
            )));
        }

        let host = url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| TickerError::InvalidUrl(format!("missing host in {}", input)))?
            .to_string();

        let mut path = url.path().to_string();
        if path.is_empty() {
            path.push('/');
        }
        if let Some(query) = url.query() {
            path.push('?');
            path.push_str(query);
        }

        Ok(Self {
            host,
            path,
            port: url.port().unwrap_or(default_port),
        })
    }

    pub fn request_url(&self) -> String {
        format!("http://{}:{}{}", self.host, self.port, self.path)
    }
}

impl fmt::Display for FeedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.port == DEFAULT_PORT {
            write!(f, "{}{}", self.host, self.path)
        } else {
            write!(f, "{}:{}{}", self.host, self.port, self.path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_schemeless() {
        let url = FeedUrl::parse("feeds.example.com/news/rss.xml", DEFAULT_PORT).unwrap();
        assert_eq!(url.host, "feeds.example.com");
        assert_eq!(url.path, "/news/rss.xml");
        assert_eq!(url.port, 80);
        assert_eq!(url.request_url(), "http://feeds.example.com:80/news/rss.xml");
    }

    #[test]
    fn test_parse_with_scheme_and_port() {
        let url = FeedUrl::parse("http://localhost:8080/feed?lang=en", DEFAULT_PORT).unwrap();
        assert_eq!(url.host, "localhost");
        assert_eq!(url.port, 8080);
        assert_eq!(url.path, "/feed?lang=en");
        assert_eq!(url.to_string(), "localhost:8080/feed?lang=en");
    }

    #[test]
    fn test_parse_host_only() {
        let url = FeedUrl::parse("example.com", 8000).unwrap();
        assert_eq!(url.path, "/");
        assert_eq!(url.port, 8000);
    }

    #[test]
    fn test_rejects_https_and_empty() {
        assert!(FeedUrl::parse("https://example.com/rss", DEFAULT_PORT).is_err());
        assert!(FeedUrl::parse("   ", DEFAULT_PORT).is_err());
    }
}
