//! Synchronous block-transform stream adapter

use blockpipe_api::error::{validate, Error, Result};
use blockpipe_api::traits::{BlockTransform, Channel};
use blockpipe_api::types::{ChannelOwnership, Direction};

use crate::engine::{Engine, ReadState};

/// A stream adapter that applies a [`BlockTransform`] to bytes flowing
/// through a [`Channel`], presenting the result as an ordinary readable or
/// writable byte stream.
///
/// The direction is fixed at construction: a `Read` stream pulls and
/// transforms channel bytes on demand, a `Write` stream transforms and
/// forwards caller bytes. Finalization ([`flush_final_block`]) happens at
/// most once; [`close`] finalizes if the caller has not, erases the staging
/// buffers and releases the channel according to the ownership flag. A
/// write-direction stream is itself a [`Channel`], so adapters nest and one
/// outer finalize drives the whole chain.
///
/// Seeking and length queries are deliberately absent.
///
/// [`flush_final_block`]: BlockStream::flush_final_block
/// [`close`]: BlockStream::close
pub struct BlockStream<C: Channel, T: BlockTransform> {
    channel: C,
    engine: Engine<T>,
    ownership: ChannelOwnership,
    closed: bool,
}

impl<C: Channel, T: BlockTransform> BlockStream<C, T> {
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
            channel,
            engine: Engine::new(transform, direction)?,
            ownership,
            closed: false,
        })
    }

    /// The adapter's fixed direction
    pub fn direction(&self) -> Direction {
        self.engine.direction()
    }

    /// True once the final block has been transformed
    pub fn has_flushed_final_block(&self) -> bool {
        self.engine.is_finalized()
    }

    fn ensure_open(&self, operation: &'static str) -> Result<()> {
        if self.closed {
            return Err(Error::configuration(operation, "stream is closed"));
        }
        Ok(())
    }

    /// Reads transformed bytes into `dest`. Delivers `dest.len()` bytes
    /// unless the channel ends first; returns 0 only at permanent
    /// end-of-stream. Read-direction streams only.
    pub fn read(&mut self, dest: &mut [u8]) -> Result<usize> {
        self.ensure_open("read")?;
        validate::direction(self.engine.direction(), Direction::Read, "read")?;

        let engine = &mut self.engine;
        let channel = &mut self.channel;
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
                        let n = channel.read(batch.spare())?;
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
                        let n = channel.read(engine.input_spare())?;
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
    pub fn write(&mut self, src: &[u8]) -> Result<()> {
        self.ensure_open("write")?;
        validate::direction(self.engine.direction(), Direction::Write, "write")?;
        validate::supported(
            !self.engine.is_finalized(),
            "writing to a finalized stream",
        )?;
        if src.is_empty() {
            return Ok(());
        }

        let engine = &mut self.engine;
        let channel = &mut self.channel;
        let mut src = src;

        // Top up a partial block left by an earlier call; if it still is
        // not full the transform is deferred to a later call.
        if !engine.input_is_empty() {
            let taken = engine.stage_input(src);
            src = &src[taken..];
            if !engine.input_is_full() {
                debug_assert!(src.is_empty());
                return Ok(());
            }
        }

        // Output staged by a call that failed at the channel goes first.
        Self::flush_pending(channel, engine)?;

        if engine.input_is_full() {
            engine.transform_staged_block()?;
            Self::flush_pending(channel, engine)?;
        }

        let in_block = engine.input_block_size();
        while src.len() >= in_block {
            let run = if engine.supports_multi_block() {
                (src.len() / in_block) * in_block
            } else {
                in_block
            };
            engine.transform_into_output(&src[..run])?;
            Self::flush_pending(channel, engine)?;
            src = &src[run..];
        }

        if !src.is_empty() {
            engine.stage_input(src);
        }
        Ok(())
    }

    fn flush_pending(channel: &mut C, engine: &mut Engine<T>) -> Result<()> {
        if !engine.output_is_empty() {
            channel.write_all(engine.pending_output())?;
            engine.clear_pending_output();
        }
        Ok(())
    }

    /// Transforms the final, possibly partial, block exactly once.
    ///
    /// Write direction: flushes pending output, writes the trailer and
    /// finishes the channel — for a nested adapter that recursively
    /// finalizes the inner layer. Read direction: stages the trailer of the
    /// residual staged bytes so it can be read back; the channel is left
    /// untouched. A second call is an [`Error::Unsupported`].
    pub fn flush_final_block(&mut self) -> Result<()> {
        self.ensure_open("flush_final_block")?;
        validate::supported(
            !self.engine.is_finalized(),
            "finalizing a stream twice",
        )?;

        match self.engine.direction() {
            Direction::Write => {
                Self::flush_pending(&mut self.channel, &mut self.engine)?;
                self.engine.finalize_into_output()?;
                Self::flush_pending(&mut self.channel, &mut self.engine)?;
                self.channel.finish()
            }
            Direction::Read => self.engine.finalize_into_output(),
        }
    }

    /// Pushes pending transformed bytes toward the channel. Whole staged
    /// input blocks stay staged: only finalization may process a partial
    /// block. Read-direction streams treat this as a no-op.
    pub fn flush(&mut self) -> Result<()> {
        self.ensure_open("flush")?;
        match self.engine.direction() {
            Direction::Write => {
                Self::flush_pending(&mut self.channel, &mut self.engine)?;
                self.channel.flush()
            }
            Direction::Read => Ok(()),
        }
    }

    /// Tears the stream down: finalizes if the caller has not, erases the
    /// staging buffers and, for an [`ChannelOwnership::Owned`] channel,
    /// closes it. Erasure and channel release happen even when finalization
    /// fails. Idempotent.
    pub fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        let finalize_result = if self.engine.is_finalized() {
            self.flush()
        } else {
            self.flush_final_block()
        };
        self.closed = true;
        self.engine.erase();
        let release_result = if self.ownership.closes_channel() {
            self.channel.close()
        } else {
            Ok(())
        };
        finalize_result.and(release_result)
    }
}

impl<C: Channel, T: BlockTransform> Drop for BlockStream<C, T> {
    fn drop(&mut self) {
        // Best effort; the Zeroizing staging backings erase themselves
        // regardless of what the channel does.
        let _ = self.close();
    }
}

// Write-direction streams are channels themselves, so adapters nest and
// `finish` propagates finalization down the chain.
impl<C: Channel, T: BlockTransform> Channel for BlockStream<C, T> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        BlockStream::read(self, buf)
    }

    fn write_all(&mut self, buf: &[u8]) -> Result<()> {
        BlockStream::write(self, buf)
    }

    fn flush(&mut self) -> Result<()> {
        BlockStream::flush(self)
    }

    fn close(&mut self) -> Result<()> {
        BlockStream::close(self)
    }

    fn finish(&mut self) -> Result<()> {
        if self.engine.direction() == Direction::Write && !self.engine.is_finalized() {
            self.flush_final_block()
        } else {
            BlockStream::flush(self)
        }
    }
}

impl<C: Channel, T: BlockTransform> std::io::Read for BlockStream<C, T> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        BlockStream::read(self, buf).map_err(Into::into)
    }
}

impl<C: Channel, T: BlockTransform> std::io::Write for BlockStream<C, T> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        BlockStream::write(self, buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        BlockStream::flush(self).map_err(Into::into)
    }
}
