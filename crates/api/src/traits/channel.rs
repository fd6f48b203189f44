//! The byte channel consumed by the stream adapters
//!
//! A channel is the raw sink/source a stream adapter pumps transformed bytes
//! through. The adapters own their channel exclusively and only require the
//! direction they actually use; the unused direction may reject calls.
//!
//! `finish` is the chained-finalization hook: a plain channel flushes, while
//! a nested stream adapter overrides it to finalize itself and then finish
//! its own channel, so multi-layer chains finalize end-to-end from a single
//! outer call. The inner finalizer is fixed statically by the concrete
//! channel type at construction; there is no runtime type inspection.

use crate::error::Result;

/// A synchronous byte sink/source
pub trait Channel {
    /// Reads up to `buf.len()` bytes. Returns the number of bytes read;
    /// 0 means permanent end of data.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Writes all of `buf`
    fn write_all(&mut self, buf: &[u8]) -> Result<()>;

    /// Flushes buffered bytes toward the underlying sink
    fn flush(&mut self) -> Result<()>;

    /// Releases the channel. Default: flush.
    fn close(&mut self) -> Result<()> {
        self.flush()
    }

    /// Completes this channel's own framing. Default: flush. Nested stream
    /// adapters override this to finalize themselves first.
    fn finish(&mut self) -> Result<()> {
        self.flush()
    }
}

impl<C: Channel + ?Sized> Channel for &mut C {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        (**self).read(buf)
    }

    fn write_all(&mut self, buf: &[u8]) -> Result<()> {
        (**self).write_all(buf)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }

    fn close(&mut self) -> Result<()> {
        // A borrowed channel is not ours to close; flushing is as far as a
        // reference may go.
        (**self).flush()
    }

    fn finish(&mut self) -> Result<()> {
        (**self).finish()
    }
}

/// A suspendable byte sink/source with the same contract as [`Channel`]
#[allow(async_fn_in_trait)]
pub trait AsyncChannel {
    /// Reads up to `buf.len()` bytes; 0 means permanent end of data
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Writes all of `buf`
    async fn write_all(&mut self, buf: &[u8]) -> Result<()>;

    /// Flushes buffered bytes toward the underlying sink
    async fn flush(&mut self) -> Result<()>;

    /// Releases the channel
    async fn close(&mut self) -> Result<()>;

    /// Completes this channel's own framing; see [`Channel::finish`]
    async fn finish(&mut self) -> Result<()>;
}

impl<C: AsyncChannel + ?Sized> AsyncChannel for &mut C {
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        (**self).read(buf).await
    }

    async fn write_all(&mut self, buf: &[u8]) -> Result<()> {
        (**self).write_all(buf).await
    }

    async fn flush(&mut self) -> Result<()> {
        (**self).flush().await
    }

    async fn close(&mut self) -> Result<()> {
        (**self).flush().await
    }

    async fn finish(&mut self) -> Result<()> {
        (**self).finish().await
    }
}
