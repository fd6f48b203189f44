//! Identity transform: block-copy with an as-is trailer
//!
//! Useful as the null cipher in tests and as the simplest possible
//! [`BlockTransform`] to read. Input and output block sizes are equal, the
//! final partial block passes through unchanged, and multi-block support can
//! be switched off to force the adapters onto their one-block-at-a-time path.

use blockpipe_api::error::{validate, Result};
use blockpipe_api::traits::BlockTransform;

/// Block-copy transform with a configurable block size
#[derive(Debug, Clone)]
pub struct Identity {
    block_size: usize,
    multi_block: bool,
}

impl Identity {
    /// Creates an identity transform with the given block size
    pub fn new(block_size: usize) -> Result<Self> {
        validate::parameter(block_size > 0, "identity block size", "must be non-zero")?;
        Ok(Self {
            block_size,
            multi_block: true,
        })
    }

    /// Creates an identity transform that refuses multi-block calls, forcing
    /// the adapters onto the one-block-at-a-time path
    pub fn single_block(block_size: usize) -> Result<Self> {
        let mut t = Self::new(block_size)?;
        t.multi_block = false;
        Ok(t)
    }
}

impl BlockTransform for Identity {
    fn input_block_size(&self) -> usize {
        self.block_size
    }

    fn output_block_size(&self) -> usize {
        self.block_size
    }

    fn supports_multi_block(&self) -> bool {
        self.multi_block
    }

    fn transform(&mut self, input: &[u8], output: &mut [u8]) -> Result<usize> {
        debug_assert_eq!(input.len() % self.block_size, 0);
        output[..input.len()].copy_from_slice(input);
        Ok(input.len())
    }

    fn transform_final(&mut self, input: &[u8]) -> Result<Vec<u8>> {
        Ok(input.to_vec())
    }
}
