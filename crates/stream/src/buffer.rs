//! Staging buffers for bytes that crossed one side of the transform
//!
//! A `Staging` buffer is a fixed-capacity byte holder with a fill cursor.
//! The backing store is `Zeroizing`, so staged bytes are erased when the
//! buffer is dropped, and every operation that releases bytes overwrites
//! them with zero first. The nominal capacity is one transform block; the
//! backing may grow transiently when a multi-block run or a finalization
//! trailer is staged, and `clear` drops that growth again.

use zeroize::{Zeroize, Zeroizing};

pub(crate) struct Staging {
    buf: Zeroizing<Vec<u8>>,
    /// Nominal capacity: one transform block
    base: usize,
    /// Fill cursor in `[0, buf.len()]`
    len: usize,
}

impl Staging {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Zeroizing::new(vec![0u8; capacity]),
            base: capacity,
            len: 0,
        }
    }

    #[cfg(test)]
    pub fn capacity(&self) -> usize {
        self.base
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == self.base
    }

    /// The staged bytes
    pub fn filled(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// Copies in as much of `src` as fits the nominal capacity; returns the
    /// number of bytes consumed
    pub fn fill_from(&mut self, src: &[u8]) -> usize {
        let n = src.len().min(self.base - self.len);
        self.buf[self.len..self.len + n].copy_from_slice(&src[..n]);
        self.len += n;
        n
    }

    /// The unfilled region up to the nominal capacity, as a target for
    /// channel reads; pair with [`advance`](Staging::advance)
    pub fn spare(&mut self) -> &mut [u8] {
        let len = self.len;
        &mut self.buf[len..self.base]
    }

    pub fn advance(&mut self, n: usize) {
        self.len += n;
        debug_assert!(self.len <= self.base);
    }

    /// Room for `n` transformed bytes, growing the backing transiently when a
    /// multi-block run exceeds the nominal capacity. Requires the buffer to
    /// be empty; pair with [`set_len`](Staging::set_len).
    pub fn room(&mut self, n: usize) -> &mut [u8] {
        debug_assert!(self.is_empty());
        if self.buf.len() < n {
            self.buf.resize(n, 0);
        }
        &mut self.buf[..n]
    }

    pub fn set_len(&mut self, n: usize) {
        debug_assert!(n <= self.buf.len());
        self.len = n;
    }

    /// Copies the staged prefix into `dest`, left-compacts the surplus and
    /// zeroes the vacated tail. Returns the number of bytes copied out.
    pub fn drain_into(&mut self, dest: &mut [u8]) -> usize {
        let n = self.len.min(dest.len());
        if n == 0 {
            return 0;
        }
        dest[..n].copy_from_slice(&self.buf[..n]);
        self.buf.copy_within(n..self.len, 0);
        let remaining = self.len - n;
        self.buf[remaining..self.len].zeroize();
        self.len = remaining;
        n
    }

    /// Appends owned bytes (a finalization trailer), growing the backing
    /// transiently if needed. The source is erased: `Vec::zeroize` zeroes
    /// its full capacity and empties it.
    pub fn append_owned(&mut self, bytes: &mut Vec<u8>) {
        let n = bytes.len();
        if self.buf.len() < self.len + n {
            self.buf.resize(self.len + n, 0);
        }
        self.buf[self.len..self.len + n].copy_from_slice(bytes);
        self.len += n;
        bytes.zeroize();
    }

    /// Zeroes the entire backing, drops transient growth and resets the
    /// fill cursor. The backing keeps its nominal length so the buffer can
    /// be refilled; zeroizing through the slice leaves the `Vec` length
    /// intact, where `Vec::zeroize` would empty it.
    pub fn clear(&mut self) {
        self.buf.as_mut_slice().zeroize();
        self.buf.truncate(self.base);
        self.len = 0;
    }

    /// True if every backing byte is zero; erasure assertions in tests
    #[cfg(test)]
    pub fn is_zeroed(&self) -> bool {
        self.buf.iter().all(|&b| b == 0)
    }
}
