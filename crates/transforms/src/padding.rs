//! PKCS#7-style block padding
//!
//! The encode side pads the final partial block to a whole block, emitting a
//! full extra block when the residue is empty so the padding length is always
//! recoverable. The decode side validates and strips the padding; validation
//! walks the entire block and folds the verdict through `subtle::Choice` so
//! it does not short-circuit on the first mismatch.

use blockpipe_api::error::{Error, Result};
use subtle::{Choice, ConstantTimeEq};

/// Pads `residual` (strictly shorter than `block_size`) to one whole block
pub fn pad_block(residual: &[u8], block_size: usize) -> Vec<u8> {
    debug_assert!(residual.len() < block_size);
    let pad = (block_size - residual.len()) as u8;
    let mut block = Vec::with_capacity(block_size);
    block.extend_from_slice(residual);
    block.resize(block_size, pad);
    block
}

/// Returns the unpadded length of `block`, or `Error::Integrity` if the
/// padding is malformed
pub fn unpadded_len(block: &[u8]) -> Result<usize> {
    let n = block.len();
    debug_assert!(n > 0);
    let pad_byte = block[n - 1];
    let pad = pad_byte as usize;

    let in_range = Choice::from((pad >= 1 && pad <= n) as u8);
    // With an out-of-range pad the start index is meaningless; clamping keeps
    // the scan total independent of the pad value.
    let start = n.saturating_sub(pad.min(n));

    let mut tail_matches = Choice::from(1u8);
    for (i, byte) in block.iter().enumerate() {
        let in_pad = Choice::from((i >= start) as u8);
        tail_matches &= !in_pad | byte.ct_eq(&pad_byte);
    }

    if bool::from(in_range & tail_matches) {
        Ok(n - pad)
    } else {
        Err(Error::Integrity {
            context: "block padding",
        })
    }
}
