//! The block transform capability consumed by the stream adapters

use crate::error::Result;

/// A block-oriented transform: a deterministic mapping from fixed-size input
/// blocks to fixed-size output blocks, plus a final variant that handles the
/// last, possibly partial, block and emits a direction-appropriate trailer.
///
/// The stream adapters take care of all buffering and alignment: [`transform`]
/// is only ever invoked on a whole number of input blocks, never on a
/// zero-length region, and [`transform_final`] is invoked exactly once with
/// whatever partial block remains (possibly nothing).
///
/// Transforms take `&mut self` because most carry chaining state (an IV, a
/// held-back block on the decode side, a running MAC).
///
/// [`transform`]: BlockTransform::transform
/// [`transform_final`]: BlockTransform::transform_final
pub trait BlockTransform {
    /// Size in bytes of one input block; must be non-zero
    fn input_block_size(&self) -> usize;

    /// Size in bytes of one output block; must be non-zero
    fn output_block_size(&self) -> usize;

    /// True if [`transform`](BlockTransform::transform) accepts more than one
    /// block per call, enabling the adapters' multi-block fast path
    fn supports_multi_block(&self) -> bool {
        false
    }

    /// Transforms `input`, a whole number of input blocks, into `output`.
    ///
    /// `output` has room for one output block per input block. Returns the
    /// number of bytes produced, which may be less than the capacity of
    /// `output` — a transform that holds back data (e.g. a decryptor
    /// retaining the final block for padding removal) may legally produce
    /// zero bytes for a given call.
    fn transform(&mut self, input: &[u8], output: &mut [u8]) -> Result<usize>;

    /// Transforms the final, possibly partial and possibly empty, block.
    ///
    /// Returns the trailer bytes for this direction: padding on the encode
    /// side, the unpadded remainder on the decode side. May be empty. After
    /// this call the transform will not be used again by the adapter.
    fn transform_final(&mut self, input: &[u8]) -> Result<Vec<u8>>;
}

// Allow passing transforms by mutable reference or box
impl<T: BlockTransform + ?Sized> BlockTransform for &mut T {
    fn input_block_size(&self) -> usize {
        (**self).input_block_size()
    }

    fn output_block_size(&self) -> usize {
        (**self).output_block_size()
    }

    fn supports_multi_block(&self) -> bool {
        (**self).supports_multi_block()
    }

    fn transform(&mut self, input: &[u8], output: &mut [u8]) -> Result<usize> {
        (**self).transform(input, output)
    }

    fn transform_final(&mut self, input: &[u8]) -> Result<Vec<u8>> {
        (**self).transform_final(input)
    }
}

impl<T: BlockTransform + ?Sized> BlockTransform for Box<T> {
    fn input_block_size(&self) -> usize {
        (**self).input_block_size()
    }

    fn output_block_size(&self) -> usize {
        (**self).output_block_size()
    }

    fn supports_multi_block(&self) -> bool {
        (**self).supports_multi_block()
    }

    fn transform(&mut self, input: &[u8], output: &mut [u8]) -> Result<usize> {
        (**self).transform(input, output)
    }

    fn transform_final(&mut self, input: &[u8]) -> Result<Vec<u8>> {
        (**self).transform_final(input)
    }
}
