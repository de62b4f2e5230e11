use std::fmt;

/// One cleaned headline taken from the polled page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedItem {
    text: String,
}

impl FeedItem {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.text.into_bytes()
    }
}

impl fmt::Display for FeedItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
