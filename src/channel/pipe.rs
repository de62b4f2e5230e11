use std::io::ErrorKind;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::app::{Result, TickerError};
use crate::channel::frame::{Frame, BLOCKSIZE};

/// Write end of the channel. Frames are always written whole.
pub struct FrameWriter<W> {
    inner: W,
}

impl<W: AsyncWrite + Unpin> FrameWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Blocks while the channel is full.
    pub async fn write_frame(&mut self, frame: &Frame) -> Result<()> {
        self.inner
            .write_all(frame.as_bytes())
            .await
            .map_err(map_write_error)?;
        self.inner.flush().await.map_err(map_write_error)?;
        Ok(())
    }

    pub async fn write_frames(&mut self, frames: &[Frame]) -> Result<()> {
        for frame in frames {
            self.write_frame(frame).await?;
        }
        Ok(())
    }
}

fn map_write_error(e: std::io::Error) -> TickerError {
    match e.kind() {
        ErrorKind::BrokenPipe | ErrorKind::ConnectionReset => TickerError::ChannelClosed,
        _ => TickerError::Io(e),
    }
}

/// Read end of the channel.
///
/// Partial reads are accumulated inside the reader, so dropping a pending
/// [`next_frame`](Self::next_frame) future loses no bytes. This makes it
/// safe to use as a `tokio::select!` branch.
pub struct FrameReader<R> {
    inner: R,
    buf: Box<[u8; BLOCKSIZE]>,
    filled: usize,
}

impl<R: AsyncRead + Unpin> FrameReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buf: Box::new([0; BLOCKSIZE]),
            filled: 0,
        }
    }

    /// Next whole frame, or `None` once the write end is closed.
    ///
    /// A short tail left by a writer that closed mid-frame is returned
    /// zero-padded.
    pub async fn next_frame(&mut self) -> Result<Option<Frame>> {
        while self.filled < BLOCKSIZE {
            let n = self.inner.read(&mut self.buf[self.filled..]).await?;
            if n == 0 {
                if self.filled == 0 {
                    return Ok(None);
                }
                tracing::warn!("Channel closed mid-frame after {} bytes", self.filled);
                break;
            }
            self.filled += n;
        }

        let frame = Frame::from_bytes(&self.buf[..self.filled]);
        self.filled = 0;
        Ok(Some(frame))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::frame::{decode, encode};
    use crate::channel::open_pipe;
    use crate::domain::FeedItem;

    #[tokio::test]
    async fn test_reader_assembles_partial_reads() {
        let frame = Frame::from_bytes(b"first\nsecond\n");
        let bytes = frame.as_bytes();
        let mock = tokio_test::io::Builder::new()
            .read(&bytes[..100])
            .read(&bytes[100..700])
            .read(&bytes[700..])
            .build();

        let mut reader = FrameReader::new(mock);
        let received = reader.next_frame().await.unwrap().unwrap();
        assert_eq!(received, frame);
        assert!(reader.next_frame().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_reader_pads_truncated_tail() {
        let mock = tokio_test::io::Builder::new().read(b"short\n").build();
        let mut reader = FrameReader::new(mock);
        let frame = reader.next_frame().await.unwrap().unwrap();
        assert_eq!(frame.payload(), b"short\n");
        assert!(reader.next_frame().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_writer_sends_whole_frames() {
        let frame = Frame::from_bytes(b"headline\n");
        let mock = tokio_test::io::Builder::new()
            .write(frame.as_bytes())
            .build();
        let mut writer = FrameWriter::new(mock);
        writer.write_frame(&frame).await.unwrap();
    }

    #[tokio::test]
    async fn test_pipe_round_trip() {
        let (mut writer, mut reader) = open_pipe();
        let items: Vec<FeedItem> = (0..200)
            .map(|i| FeedItem::new(format!("Headline number {}", i)))
            .collect();
        let frames = encode(items.clone());
        let sent = frames.len();

        let producer = tokio::spawn(async move {
            writer.write_frames(&frames).await.unwrap();
        });

        let mut received = Vec::new();
        while let Some(frame) = reader.next_frame().await.unwrap() {
            received.push(frame);
            if received.len() == sent {
                break;
            }
        }
        producer.await.unwrap();

        let expected: String = items
            .iter()
            .rev()
            .map(|item| format!("{}\n", item))
            .collect();
        assert_eq!(decode(&received), expected.as_bytes());
    }

    #[tokio::test]
    async fn test_write_after_reader_dropped_reports_closed() {
        let (mut writer, reader) = open_pipe();
        drop(reader);
        let err = writer.write_frame(&Frame::empty()).await.unwrap_err();
        assert!(matches!(err, TickerError::ChannelClosed));
    }

    #[tokio::test]
    async fn test_reader_sees_eof_when_writer_dropped() {
        let (writer, mut reader) = open_pipe();
        drop(writer);
        assert!(reader.next_frame().await.unwrap().is_none());
    }
}
