//! Toy XOR block cipher with PKCS#7 trailer handling
//!
//! A repeating-key XOR over whole blocks whose block size equals the key
//! length. The encode side pads the final partial block; the decode side
//! holds back one block per call so the last block is still available for
//! padding removal at finalization — the same discipline a real block-cipher
//! decryptor needs, which makes this the workhorse of the adapter tests.
//!
//! This is not a cipher in any meaningful sense. It provides zero
//! confidentiality and exists only to exercise the stream plumbing.

use blockpipe_api::error::{validate, Error, Result};
use blockpipe_api::traits::BlockTransform;
use blockpipe_api::types::Direction;
use zeroize::Zeroizing;

use crate::padding;

/// Generates a random key of the given length
pub fn generate_key(len: usize) -> Zeroizing<Vec<u8>> {
    use rand::RngCore;
    let mut key = Zeroizing::new(vec![0u8; len]);
    rand::thread_rng().fill_bytes(&mut key);
    key
}

/// Repeating-key XOR over whole blocks with PKCS#7 trailer handling
pub struct XorBlockCipher {
    key: Zeroizing<Vec<u8>>,
    direction: Direction,
    // Decode side: the most recent ciphertext block, decoded, held back so
    // transform_final can strip its padding
    pending: Option<Zeroizing<Vec<u8>>>,
}

impl XorBlockCipher {
    /// Creates the encode-direction (padding) half
    pub fn encoder(key: &[u8]) -> Result<Self> {
        Self::with_direction(key, Direction::Write)
    }

    /// Creates the decode-direction (unpadding) half
    pub fn decoder(key: &[u8]) -> Result<Self> {
        Self::with_direction(key, Direction::Read)
    }

    fn with_direction(key: &[u8], direction: Direction) -> Result<Self> {
        validate::parameter(!key.is_empty(), "xor key", "must be non-empty")?;
        validate::parameter(key.len() <= 255, "xor key", "block size must fit PKCS#7")?;
        Ok(Self {
            key: Zeroizing::new(key.to_vec()),
            direction,
            pending: None,
        })
    }

    fn block_size(&self) -> usize {
        self.key.len()
    }

    fn xor_block(&self, block: &[u8], out: &mut [u8]) {
        for (i, (&b, o)) in block.iter().zip(out.iter_mut()).enumerate() {
            *o = b ^ self.key[i];
        }
    }
}

impl BlockTransform for XorBlockCipher {
    fn input_block_size(&self) -> usize {
        self.block_size()
    }

    fn output_block_size(&self) -> usize {
        self.block_size()
    }

    fn supports_multi_block(&self) -> bool {
        true
    }

    fn transform(&mut self, input: &[u8], output: &mut [u8]) -> Result<usize> {
        let block = self.block_size();
        if input.is_empty() || input.len() % block != 0 {
            return Err(Error::Length {
                context: "xor transform input",
                expected: input.len().next_multiple_of(block).max(block),
                actual: input.len(),
            });
        }

        match self.direction {
            Direction::Write => {
                for (chunk, out) in input.chunks(block).zip(output.chunks_mut(block)) {
                    self.xor_block(chunk, out);
                }
                Ok(input.len())
            }
            Direction::Read => {
                let mut produced = 0;
                for chunk in input.chunks(block) {
                    let mut decoded = Zeroizing::new(vec![0u8; block]);
                    self.xor_block(chunk, &mut decoded);
                    if let Some(prev) = self.pending.replace(decoded) {
                        output[produced..produced + block].copy_from_slice(&prev);
                        produced += block;
                    }
                }
                Ok(produced)
            }
        }
    }

    fn transform_final(&mut self, input: &[u8]) -> Result<Vec<u8>> {
        let block = self.block_size();
        match self.direction {
            Direction::Write => {
                debug_assert!(input.len() < block);
                let mut padded = padding::pad_block(input, block);
                let src = Zeroizing::new(padded.clone());
                self.xor_block(&src, &mut padded);
                Ok(padded)
            }
            Direction::Read => {
                if !input.is_empty() {
                    return Err(Error::Integrity {
                        context: "ciphertext not block aligned",
                    });
                }
                let last = self.pending.take().ok_or(Error::Integrity {
                    context: "missing final block",
                })?;
                let keep = padding::unpadded_len(&last)?;
                Ok(last[..keep].to_vec())
            }
        }
    }
}
