//! Byte channel between the producer and the consumer.
//!
//! Feed text travels as fixed-size [`Frame`]s. Inside a frame each record is
//! `<text>\n`; the first zero byte ends the frame's content.
//!
//! ```text
//! [FeedItem] → encode → [Frame] → FrameWriter ⇢ pipe ⇢ FrameReader → Marquee
//! ```

pub mod frame;
pub mod pipe;

pub use frame::{decode, encode, encode_notice, Frame, FrameEncoder, BLOCKSIZE};
pub use pipe::{FrameReader, FrameWriter};

use tokio::io::{DuplexStream, ReadHalf, WriteHalf};

/// Frames the in-process pipe can hold before the writer blocks.
pub const PIPE_FRAMES: usize = 16;

/// Create the one-directional pipe: the write end for the producer, the
/// read end for the consumer.
pub fn open_pipe() -> (
    FrameWriter<WriteHalf<DuplexStream>>,
    FrameReader<ReadHalf<DuplexStream>>,
) {
    let (producer_side, consumer_side) = tokio::io::duplex(BLOCKSIZE * PIPE_FRAMES);
    // Each side keeps only the half it uses; the unused halves are dropped.
    let (_, write_half) = tokio::io::split(producer_side);
    let (read_half, _) = tokio::io::split(consumer_side);
    (FrameWriter::new(write_half), FrameReader::new(read_half))
}
