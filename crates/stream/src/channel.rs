//! Channel implementations: in-memory buffers and std I/O wrappers

use blockpipe_api::error::{Error, Result};
use blockpipe_api::traits::Channel;

#[cfg(feature = "async")]
use blockpipe_api::traits::AsyncChannel;

/// Growable in-memory byte channel with an independent read cursor.
///
/// Writes append to the buffer; reads consume from the front without
/// removing bytes, so the full written image stays inspectable. The duplex
/// shape makes it the natural channel for tests and round-trip checks.
#[derive(Debug, Default)]
pub struct MemoryChannel {
    buf: Vec<u8>,
    pos: usize,
    closed: bool,
}

impl MemoryChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// A channel pre-loaded with bytes to read
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            buf: bytes.into(),
            pos: 0,
            closed: false,
        }
    }

    /// Everything written so far (including bytes already read back)
    pub fn bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// True once `close` has been called; lets tests observe whether an
    /// adapter honored its channel-ownership flag
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl Channel for MemoryChannel {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let n = buf.len().min(self.buf.len() - self.pos);
        buf[..n].copy_from_slice(&self.buf[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }

    fn write_all(&mut self, buf: &[u8]) -> Result<()> {
        self.buf.extend_from_slice(buf);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.closed = true;
        Ok(())
    }
}

// Memory I/O never suspends, so the async contract is the sync one.
#[cfg(feature = "async")]
impl AsyncChannel for MemoryChannel {
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        Channel::read(self, buf)
    }

    async fn write_all(&mut self, buf: &[u8]) -> Result<()> {
        Channel::write_all(self, buf)
    }

    async fn flush(&mut self) -> Result<()> {
        Channel::flush(self)
    }

    async fn close(&mut self) -> Result<()> {
        Channel::close(self)
    }

    async fn finish(&mut self) -> Result<()> {
        Channel::flush(self)
    }
}

/// Read side of a [`std::io::Read`] value; write calls are rejected
#[derive(Debug)]
pub struct ReaderChannel<R> {
    inner: R,
}

impl<R: std::io::Read> ReaderChannel<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: std::io::Read> Channel for ReaderChannel<R> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        Ok(self.inner.read(buf)?)
    }

    fn write_all(&mut self, _buf: &[u8]) -> Result<()> {
        Err(Error::Unsupported {
            operation: "writing to a reader channel",
        })
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Write side of a [`std::io::Write`] value; read calls are rejected
#[derive(Debug)]
pub struct WriterChannel<W> {
    inner: W,
}

impl<W: std::io::Write> WriterChannel<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: std::io::Write> Channel for WriterChannel<W> {
    fn read(&mut self, _buf: &mut [u8]) -> Result<usize> {
        Err(Error::Unsupported {
            operation: "reading from a writer channel",
        })
    }

    fn write_all(&mut self, buf: &[u8]) -> Result<()> {
        Ok(self.inner.write_all(buf)?)
    }

    fn flush(&mut self) -> Result<()> {
        Ok(self.inner.flush()?)
    }
}
