//! Direction-agnostic pump core shared by the sync and async adapters
//!
//! The engine owns the transform, both staging buffers and the finalized
//! flag, and performs every non-I/O step of the pump protocol: staging
//! bookkeeping, transform invocation, the multi-block fast path and the
//! one-shot finalizer. Channel I/O stays in the adapters so the synchronous
//! and asynchronous drivers differ only at their await points, which keeps
//! their observable behavior identical.
//!
//! Conservation invariant: every byte produced by any transform call is
//! either written to the caller's destination or staged in the output
//! buffer, never dropped.

use blockpipe_api::error::{validate, Result};
use blockpipe_api::traits::BlockTransform;
use blockpipe_api::types::Direction;
use zeroize::Zeroizing;

use crate::buffer::Staging;

/// Control states of the read pump. The drivers run this as an explicit
/// state machine: drain staged output, choose the fast or slow path, and
/// finalize once the channel reports end-of-input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ReadState {
    DrainOutput,
    FastPath,
    SlowPath,
    Finalize,
    Done,
}

/// Scratch for one multi-block fast-path round: previously staged input
/// bytes plus freshly read channel bytes, sized to a whole number of input
/// blocks. The backing is `Zeroizing`, so the scratch is erased on drop.
pub(crate) struct FastBatch {
    buf: Zeroizing<Vec<u8>>,
    filled: usize,
}

impl FastBatch {
    pub fn is_full(&self) -> bool {
        self.filled == self.buf.len()
    }

    /// The unfilled region, as a target for channel reads
    pub fn spare(&mut self) -> &mut [u8] {
        let filled = self.filled;
        &mut self.buf[filled..]
    }

    pub fn advance(&mut self, n: usize) {
        self.filled += n;
        debug_assert!(self.filled <= self.buf.len());
    }
}

pub(crate) struct Engine<T: BlockTransform> {
    transform: T,
    direction: Direction,
    input: Staging,
    output: Staging,
    finalized: bool,
}

impl<T: BlockTransform> Engine<T> {
    pub fn new(transform: T, direction: Direction) -> Result<Self> {
        validate::parameter(
            transform.input_block_size() > 0,
            "transform input block size",
            "must be non-zero",
        )?;
        validate::parameter(
            transform.output_block_size() > 0,
            "transform output block size",
            "must be non-zero",
        )?;
        let input = Staging::with_capacity(transform.input_block_size());
        let output = Staging::with_capacity(transform.output_block_size());
        Ok(Self {
            transform,
            direction,
            input,
            output,
            finalized: false,
        })
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    pub fn input_block_size(&self) -> usize {
        self.transform.input_block_size()
    }

    pub fn supports_multi_block(&self) -> bool {
        self.transform.supports_multi_block()
    }

    // --- output staging ---

    pub fn drain_output(&mut self, dest: &mut [u8]) -> usize {
        self.output.drain_into(dest)
    }

    pub fn output_is_empty(&self) -> bool {
        self.output.is_empty()
    }

    /// Transformed bytes waiting to be flushed to the channel
    pub fn pending_output(&self) -> &[u8] {
        self.output.filled()
    }

    pub fn clear_pending_output(&mut self) {
        self.output.clear();
    }

    // --- input staging ---

    pub fn input_is_empty(&self) -> bool {
        self.input.is_empty()
    }

    pub fn input_is_full(&self) -> bool {
        self.input.is_full()
    }

    /// The unfilled input-block region, as a target for channel reads
    pub fn input_spare(&mut self) -> &mut [u8] {
        self.input.spare()
    }

    pub fn input_advance(&mut self, n: usize) {
        self.input.advance(n);
    }

    /// Copies caller bytes into input staging; returns bytes consumed
    pub fn stage_input(&mut self, src: &[u8]) -> usize {
        self.input.fill_from(src)
    }

    // --- transform steps ---

    /// Transforms the full input-staging block into the empty output staging
    pub fn transform_staged_block(&mut self) -> Result<()> {
        debug_assert!(self.input.is_full());
        debug_assert!(self.output.is_empty());
        let produced = {
            let out = self.output.room(self.transform.output_block_size());
            self.transform.transform(self.input.filled(), out)?
        };
        self.output.set_len(produced);
        self.input.clear();
        crate::pump_trace!("transformed staged block, produced {} bytes", produced);
        Ok(())
    }

    /// Transforms an external block-aligned run into the empty output
    /// staging; the staging grows transiently for multi-block runs
    pub fn transform_into_output(&mut self, src: &[u8]) -> Result<()> {
        debug_assert!(!src.is_empty());
        debug_assert_eq!(src.len() % self.transform.input_block_size(), 0);
        debug_assert!(self.output.is_empty());
        let blocks = src.len() / self.transform.input_block_size();
        let produced = {
            let out = self.output.room(blocks * self.transform.output_block_size());
            self.transform.transform(src, out)?
        };
        self.output.set_len(produced);
        crate::pump_trace!(
            "transformed {} caller blocks, produced {} bytes",
            blocks,
            produced
        );
        Ok(())
    }

    // --- read-pump fast path ---

    /// True if the multi-block fast path applies to a request of
    /// `remaining` destination bytes
    pub fn wants_fast_path(&self, remaining: usize) -> bool {
        !self.finalized
            && self.transform.supports_multi_block()
            && remaining > self.transform.output_block_size()
    }

    /// Builds the fast-path input batch for a request of `remaining`
    /// destination bytes, seeded with any already staged input bytes
    pub fn begin_fast_batch(&mut self, remaining: usize) -> FastBatch {
        debug_assert!(self.wants_fast_path(remaining));
        let blocks = remaining / self.transform.output_block_size();
        let mut buf = Zeroizing::new(vec![0u8; blocks * self.transform.input_block_size()]);
        let staged = self.input.filled();
        buf[..staged.len()].copy_from_slice(staged);
        let filled = staged.len();
        self.input.clear();
        crate::pump_trace!(
            "fast path: {} blocks wanted, {} bytes re-used from staging",
            blocks,
            filled
        );
        FastBatch { buf, filled }
    }

    /// Transforms the whole blocks of `batch` directly into `dest` and
    /// re-stages the sub-block remainder. Returns bytes produced. `dest`
    /// always has room for one output block per whole input block, so no
    /// transformed byte can be dropped.
    pub fn apply_fast_batch(&mut self, batch: FastBatch, dest: &mut [u8]) -> Result<usize> {
        let in_block = self.transform.input_block_size();
        let out_block = self.transform.output_block_size();
        let whole = batch.filled / in_block;
        let leftover = batch.filled % in_block;

        let produced = if whole > 0 {
            let end = whole * in_block;
            let n = self
                .transform
                .transform(&batch.buf[..end], &mut dest[..whole * out_block])?;
            debug_assert!(n <= whole * out_block);
            n
        } else {
            0
        };

        if leftover > 0 {
            let staged = self.input.fill_from(&batch.buf[batch.filled - leftover..batch.filled]);
            debug_assert_eq!(staged, leftover);
        }
        crate::pump_trace!(
            "fast path: {} whole blocks -> {} bytes, {} bytes re-staged",
            whole,
            produced,
            leftover
        );
        Ok(produced)
        // batch drops here; its Zeroizing backing erases the scratch
    }

    // --- finalizer ---

    /// One-shot final transform: consumes the residual input staging and
    /// appends the trailer to the output staging. The input staging is
    /// erased on every exit path, and the finalized flag is set before the
    /// transform runs so finalization happens at most once even on failure.
    pub fn finalize_into_output(&mut self) -> Result<()> {
        debug_assert!(!self.finalized);
        self.finalized = true;
        let result = self.transform.transform_final(self.input.filled());
        self.input.clear();
        match result {
            Ok(mut trailer) => {
                crate::pump_trace!("finalized, trailer of {} bytes", trailer.len());
                self.output.append_owned(&mut trailer);
                Ok(())
            }
            Err(err) => {
                self.output.clear();
                Err(err)
            }
        }
    }

    /// Zeroes both staging buffers
    pub fn erase(&mut self) {
        self.input.clear();
        self.output.clear();
    }

    #[cfg(test)]
    pub fn staging_is_zeroed(&self) -> bool {
        self.input.is_zeroed() && self.output.is_zeroed()
    }
}
