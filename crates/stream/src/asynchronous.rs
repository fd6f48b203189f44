//! Asynchronous block-transform stream adapter
//!
//! Mirrors the synchronous [`BlockStream`](crate::BlockStream) over an
//! [`AsyncChannel`]. All state sits behind a single-permit async lock, so
//! the adapter takes `&self` and concurrent calls queue instead of
//! interleaving mid-operation.

use blockpipe_api::error::{validate, Error, Result};
use blockpipe_api::traits::{AsyncChannel, BlockTransform};
use blockpipe_api::types::{ChannelOwnership, Direction};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;

use crate::engine::{Engine, ReadState};

struct Shared<C, T: BlockTransform> {
    channel: C,
    engine: Engine<T>,
    closed: bool,
}

/// Asynchronous counterpart of [`BlockStream`](crate::BlockStream).
///
/// Methods take `&self`: the internal lock admits one operation at a time
/// and queues the rest, so shared use from several tasks cannot corrupt the
/// pump state. The behavior per operation matches the synchronous adapter
/// exactly; the two differ only in where they await the channel.
///
/// Dropping the adapter erases the staging buffers but cannot run async
/// channel teardown; call [`close`](AsyncBlockStream::close) for an orderly
/// shutdown.
pub struct AsyncBlockStream<C: AsyncChannel, T: BlockTransform> {
    shared: Mutex<Shared<C, T>>,
    direction: Direction,
    ownership: ChannelOwnership,
}

impl<C: AsyncChannel, T: BlockTransform> AsyncBlockStream<C, T> {
    /// Creates an adapter that owns `channel`: teardown closes it
    pub fn new(channel: C, transform: T, direction: Direction) -> Result<Self> {
        Self::with_ownership(channel, transform, direction, ChannelOwnership::Owned)
    }

    /// Creates an adapter with an explicit channel-ownership policy
    pub fn with_ownership(
        channel: C,
        transform: T,
        direction: Direction,
        ownership: ChannelOwnership,
    ) -> Result<Self> {
        Ok(Self {
            shared: Mutex::new(Shared {
                channel,
                engine: Engine::new(transform, direction)?,
                closed: false,
            }),
            direction,
            ownership,
        })
    }

    /// The adapter's fixed direction
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// True once the final block has been transformed
    pub async fn has_flushed_final_block(&self) -> bool {
        self.shared.lock().await.engine.is_finalized()
    }

    /// Reads transformed bytes into `dest`. Delivers `dest.len()` bytes
    /// unless the channel ends first; returns 0 only at permanent
    /// end-of-stream. Read-direction streams only.
    pub async fn read(&self, dest: &mut [u8]) -> Result<usize> {
        let mut shared = self.shared.lock().await;
        shared.ensure_open("read")?;
        validate::direction(self.direction, Direction::Read, "read")?;
        let Shared { channel, engine, .. } = &mut *shared;

        let mut written = 0;
        let mut state = ReadState::DrainOutput;
        loop {
            state = match state {
                ReadState::DrainOutput => {
                    written += engine.drain_output(&mut dest[written..]);
                    if written == dest.len() || engine.is_finalized() {
                        ReadState::Done
                    } else if engine.wants_fast_path(dest.len() - written) {
                        ReadState::FastPath
                    } else {
                        ReadState::SlowPath
                    }
                }
                ReadState::FastPath => {
                    let mut batch = engine.begin_fast_batch(dest.len() - written);
                    let mut end_of_input = false;
                    while !batch.is_full() {
                        let n = channel.read(batch.spare()).await?;
                        if n == 0 {
                            end_of_input = true;
                            break;
                        }
                        batch.advance(n);
                    }
                    written += engine.apply_fast_batch(batch, &mut dest[written..])?;
                    if end_of_input {
                        ReadState::Finalize
                    } else {
                        ReadState::DrainOutput
                    }
                }
                ReadState::SlowPath => {
                    let mut end_of_input = false;
                    while !engine.input_is_full() {
                        let n = channel.read(engine.input_spare()).await?;
                        if n == 0 {
                            end_of_input = true;
                            break;
                        }
                        engine.input_advance(n);
                    }
                    if end_of_input {
                        ReadState::Finalize
                    } else {
                        engine.transform_staged_block()?;
                        ReadState::DrainOutput
                    }
                }
                ReadState::Finalize => {
                    crate::pump_trace!("read pump reached end-of-input, finalizing");
                    engine.finalize_into_output()?;
                    ReadState::DrainOutput
                }
                ReadState::Done => return Ok(written),
            };
        }
    }

    /// Accepts all of `src`, transforming and forwarding whole blocks and
    /// retaining the sub-block remainder. Never finalizes automatically.
    /// Write-direction streams only.
    pub async fn write(&self, src: &[u8]) -> Result<()> {
        let mut shared = self.shared.lock().await;
        shared.ensure_open("write")?;
        validate::direction(self.direction, Direction::Write, "write")?;
        validate::supported(
            !shared.engine.is_finalized(),
            "writing to a finalized stream",
        )?;
        if src.is_empty() {
            return Ok(());
        }
        let Shared { channel, engine, .. } = &mut *shared;
        let mut src = src;

        if !engine.input_is_empty() {
            let taken = engine.stage_input(src);
            src = &src[taken..];
            if !engine.input_is_full() {
                debug_assert!(src.is_empty());
                return Ok(());
            }
        }

        flush_pending(channel, engine).await?;

        if engine.input_is_full() {
            engine.transform_staged_block()?;
            flush_pending(channel, engine).await?;
        }

        let in_block = engine.input_block_size();
        while src.len() >= in_block {
            let run = if engine.supports_multi_block() {
                (src.len() / in_block) * in_block
            } else {
                in_block
            };
            engine.transform_into_output(&src[..run])?;
            flush_pending(channel, engine).await?;
            src = &src[run..];
        }

        if !src.is_empty() {
            engine.stage_input(src);
        }
        Ok(())
    }

    /// Transforms the final, possibly partial, block exactly once. See the
    /// synchronous adapter for the per-direction behavior.
    pub async fn flush_final_block(&self) -> Result<()> {
        let mut shared = self.shared.lock().await;
        shared.ensure_open("flush_final_block")?;
        validate::supported(
            !shared.engine.is_finalized(),
            "finalizing a stream twice",
        )?;
        let Shared { channel, engine, .. } = &mut *shared;
        match self.direction {
            Direction::Write => {
                flush_pending(channel, engine).await?;
                engine.finalize_into_output()?;
                flush_pending(channel, engine).await?;
                channel.finish().await
            }
            Direction::Read => engine.finalize_into_output(),
        }
    }

    /// Pushes pending transformed bytes toward the channel; staged whole
    /// input blocks stay staged. Read-direction streams treat this as a
    /// no-op.
    pub async fn flush(&self) -> Result<()> {
        let mut shared = self.shared.lock().await;
        shared.ensure_open("flush")?;
        match self.direction {
            Direction::Write => {
                let Shared { channel, engine, .. } = &mut *shared;
                flush_pending(channel, engine).await?;
                channel.flush().await
            }
            Direction::Read => Ok(()),
        }
    }

    /// Tears the stream down: finalizes if needed, erases the staging
    /// buffers and closes an owned channel. Idempotent.
    pub async fn close(&self) -> Result<()> {
        let mut shared = self.shared.lock().await;
        if shared.closed {
            return Ok(());
        }
        let Shared { channel, engine, .. } = &mut *shared;
        let finalize_result = if engine.is_finalized() {
            match self.direction {
                Direction::Write => match flush_pending(channel, engine).await {
                    Ok(()) => channel.flush().await,
                    Err(err) => Err(err),
                },
                Direction::Read => Ok(()),
            }
        } else {
            match self.direction {
                Direction::Write => {
                    let staged = async {
                        flush_pending(channel, engine).await?;
                        engine.finalize_into_output()?;
                        flush_pending(channel, engine).await?;
                        channel.finish().await
                    };
                    staged.await
                }
                Direction::Read => engine.finalize_into_output(),
            }
        };
        shared.closed = true;
        shared.engine.erase();
        let release_result = if self.ownership.closes_channel() {
            shared.channel.close().await
        } else {
            Ok(())
        };
        finalize_result.and(release_result)
    }
}

async fn flush_pending<C: AsyncChannel, T: BlockTransform>(
    channel: &mut C,
    engine: &mut Engine<T>,
) -> Result<()> {
    if !engine.output_is_empty() {
        channel.write_all(engine.pending_output()).await?;
        engine.clear_pending_output();
    }
    Ok(())
}

impl<C, T: BlockTransform> Shared<C, T> {
    fn ensure_open(&self, operation: &'static str) -> Result<()> {
        if self.closed {
            return Err(Error::configuration(operation, "stream is closed"));
        }
        Ok(())
    }
}

impl<C: AsyncChannel, T: BlockTransform> Drop for AsyncBlockStream<C, T> {
    fn drop(&mut self) {
        // No lock needed with exclusive access; async channel teardown
        // cannot run here, only buffer erasure.
        let shared = self.shared.get_mut();
        if !shared.closed {
            shared.engine.erase();
        }
    }
}

// Write-direction adapters are async channels themselves, so they nest and
// `finish` propagates finalization down the chain.
impl<C: AsyncChannel, T: BlockTransform> AsyncChannel for AsyncBlockStream<C, T> {
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        AsyncBlockStream::read(self, buf).await
    }

    async fn write_all(&mut self, buf: &[u8]) -> Result<()> {
        AsyncBlockStream::write(self, buf).await
    }

    async fn flush(&mut self) -> Result<()> {
        AsyncBlockStream::flush(self).await
    }

    async fn close(&mut self) -> Result<()> {
        AsyncBlockStream::close(self).await
    }

    async fn finish(&mut self) -> Result<()> {
        if self.direction == Direction::Write && !self.has_flushed_final_block().await {
            self.flush_final_block().await
        } else {
            AsyncBlockStream::flush(self).await
        }
    }
}

/// Adapts any tokio `AsyncRead + AsyncWrite` stream to [`AsyncChannel`]
pub struct TokioChannel<S> {
    inner: S,
}

impl<S: AsyncRead + AsyncWrite + Unpin> TokioChannel<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: AsyncRead + AsyncWrite + Unpin> AsyncChannel for TokioChannel<S> {
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        Ok(AsyncReadExt::read(&mut self.inner, buf).await?)
    }

    async fn write_all(&mut self, buf: &[u8]) -> Result<()> {
        Ok(AsyncWriteExt::write_all(&mut self.inner, buf).await?)
    }

    async fn flush(&mut self) -> Result<()> {
        Ok(AsyncWriteExt::flush(&mut self.inner).await?)
    }

    async fn close(&mut self) -> Result<()> {
        Ok(AsyncWriteExt::shutdown(&mut self.inner).await?)
    }

    async fn finish(&mut self) -> Result<()> {
        Ok(AsyncWriteExt::flush(&mut self.inner).await?)
    }
}
