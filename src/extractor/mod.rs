use html_escape::decode_html_entities;

use crate::domain::FeedItem;

/// Upper bound on headlines taken from one page.
pub const MAX_ITEMS: usize = 100;

/// Leading `<title>` elements that name the site and channel, not stories.
const SKIPPED_TITLES: usize = 2;

const TITLE_OPEN: &[u8] = b"<title>";
const TITLE_CLOSE: &[u8] = b"</title>";
const CDATA_OPEN: &[u8] = b"<![CDATA[";
const CDATA_CLOSE: &[u8] = b"]]>";

/// Pulls headline text out of a feed page by scanning for `<title>` markers.
///
/// This is a marker scan, not a markup parser: a page without usable
/// markers yields no items rather than an error.
#[derive(Debug, Clone)]
pub struct Extractor {
    max_items: usize,
    decode_entities: bool,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(MAX_ITEMS)
    }
}

impl Extractor {
    pub fn new(max_items: usize) -> Self {
        Self {
            max_items,
            decode_entities: false,
        }
    }

    pub fn with_entity_decoding(mut self, decode: bool) -> Self {
        self.decode_entities = decode;
        self
    }

    /// Returns items in page order, at most `max_items` of them.
    pub fn extract(&self, markup: &[u8]) -> Vec<FeedItem> {
        let mut cursor = 0;

        for _ in 0..SKIPPED_TITLES {
            let Some(open) = find(markup, TITLE_OPEN, cursor) else {
                continue;
            };
            let start = open + TITLE_OPEN.len();
            match find(markup, TITLE_CLOSE, start) {
                Some(close) => cursor = close,
                None => return Vec::new(),
            }
        }

        let mut items = Vec::new();
        while items.len() < self.max_items {
            let Some(open) = find(markup, TITLE_OPEN, cursor) else {
                break;
            };
            let mut start = open + TITLE_OPEN.len();

            let end = if markup[start..].starts_with(CDATA_OPEN) {
                start += CDATA_OPEN.len();
                find(markup, CDATA_CLOSE, start)
            } else {
                find(markup, TITLE_CLOSE, start)
            };
            let Some(end) = end else {
                tracing::debug!("Unterminated <title> at byte {}", open);
                break;
            };

            items.push(self.clean(&markup[start..end]));
            cursor = end;
        }

        items
    }

    fn clean(&self, span: &[u8]) -> FeedItem {
        let text = String::from_utf8_lossy(span);
        let text = if self.decode_entities {
            decode_html_entities(text.trim()).into_owned()
        } else {
            text.into_owned()
        };

        // Newlines and NULs are frame delimiters on the channel.
        let text: String = text
            .trim()
            .chars()
            .filter(|&c| c != '\0')
            .map(|c| if matches!(c, '\n' | '\r' | '\t') { ' ' } else { c })
            .collect();
        FeedItem::new(text)
    }
}

fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if from > haystack.len() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|pos| pos + from)
}
