use std::fmt;

use crate::domain::FeedItem;

/// Size of one frame on the channel, in bytes.
pub const BLOCKSIZE: usize = 1024;

/// A fixed-capacity block of channel bytes, zero-padded after its content.
#[derive(Clone, PartialEq, Eq)]
pub struct Frame {
    bytes: [u8; BLOCKSIZE],
}

impl Frame {
    pub fn empty() -> Self {
        Self {
            bytes: [0; BLOCKSIZE],
        }
    }

    /// Copy `data` into a new frame, truncating at `BLOCKSIZE`.
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut frame = Self::empty();
        let len = data.len().min(BLOCKSIZE);
        frame.bytes[..len].copy_from_slice(&data[..len]);
        frame
    }

    pub fn as_bytes(&self) -> &[u8; BLOCKSIZE] {
        &self.bytes
    }

    /// Content bytes, up to but excluding the first zero byte.
    pub fn payload(&self) -> &[u8] {
        let end = self
            .bytes
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(BLOCKSIZE);
        &self.bytes[..end]
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("payload", &String::from_utf8_lossy(self.payload()))
            .finish()
    }
}

/// Packs bytes into frames.
///
/// A frame is flushed once it holds `BLOCKSIZE - 1` bytes, so the last
/// byte of every frame is zero and in-frame parsing always terminates.
#[derive(Debug)]
pub struct FrameEncoder {
    current: Frame,
    len: usize,
    frames: Vec<Frame>,
}

impl Default for FrameEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameEncoder {
    pub fn new() -> Self {
        Self {
            current: Frame::empty(),
            len: 0,
            frames: Vec::new(),
        }
    }

    pub fn push_bytes(&mut self, data: &[u8]) {
        for &byte in data {
            self.current.bytes[self.len] = byte;
            self.len += 1;
            if self.len >= BLOCKSIZE - 1 {
                self.flush();
            }
        }
    }

    /// Append one `<text>\n` record.
    pub fn push_record(&mut self, text: &[u8]) {
        self.push_bytes(text);
        self.push_bytes(b"\n");
    }

    fn flush(&mut self) {
        let frame = std::mem::replace(&mut self.current, Frame::empty());
        self.frames.push(frame);
        self.len = 0;
    }

    pub fn finish(mut self) -> Vec<Frame> {
        if self.len > 0 {
            self.flush();
        }
        self.frames
    }
}

/// Encode items for the channel, last item first.
///
/// Pages list the newest story first; reversing makes the newest story the
/// last one to scroll in.
pub fn encode(items: Vec<FeedItem>) -> Vec<Frame> {
    let mut encoder = FrameEncoder::new();
    for item in items.into_iter().rev() {
        encoder.push_record(&item.into_bytes());
    }
    encoder.finish()
}

/// Encode a free-form notice. The text carries its own line breaks.
pub fn encode_notice(text: &str) -> Vec<Frame> {
    let mut encoder = FrameEncoder::new();
    encoder.push_bytes(text.as_bytes());
    encoder.finish()
}

/// Concatenate frame payloads, dropping padding.
pub fn decode<'a>(frames: impl IntoIterator<Item = &'a Frame>) -> Vec<u8> {
    frames
        .into_iter()
        .flat_map(|frame| frame.payload().iter().copied())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(texts: &[&str]) -> Vec<FeedItem> {
        texts.iter().map(|t| FeedItem::new(*t)).collect()
    }

    #[test]
    fn test_encode_reverses_and_delimits() {
        let frames = encode(items(&["newest", "middle", "oldest"]));
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].payload(), b"oldest\nmiddle\nnewest\n");
        assert!(frames[0].as_bytes()[21..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_encode_empty_batch_emits_nothing() {
        assert!(encode(Vec::new()).is_empty());
    }

    #[test]
    fn test_records_span_frames() {
        let long = "x".repeat(700);
        let batch = items(&[&long, &long, "tail"]);
        let frames = encode(batch);

        assert_eq!(frames.len(), 2);
        for frame in &frames {
            assert_eq!(frame.as_bytes()[BLOCKSIZE - 1], 0);
        }
        assert_eq!(frames[0].payload().len(), BLOCKSIZE - 1);

        let expected = format!("tail\n{}\n{}\n", long, long);
        assert_eq!(decode(&frames), expected.as_bytes());
    }

    #[test]
    fn test_decode_reconstructs_records() {
        let batch = items(&["Storm (AP)", "", "Rates steady", "Über café"]);
        let frames = encode(batch);
        assert_eq!(decode(&frames), "Über café\nRates steady\n\nStorm (AP)\n".as_bytes());
    }

    #[test]
    fn test_exact_boundary_does_not_emit_empty_frame() {
        let text = "y".repeat(BLOCKSIZE - 2);
        let frames = encode(items(&[&text]));
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].payload().len(), BLOCKSIZE - 1);
    }

    #[test]
    fn test_notice_frame() {
        let frames = encode_notice("connection lost\nretrying\n");
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].payload(), b"connection lost\nretrying\n");
    }

    #[test]
    fn test_from_bytes_truncates() {
        let frame = Frame::from_bytes(&[b'a'; BLOCKSIZE + 10]);
        assert_eq!(frame.payload().len(), BLOCKSIZE);
    }
}
