//! Common types shared across the blockpipe crates

use core::fmt;

/// Fixed data-flow direction of a stream adapter.
///
/// A `Read` adapter pulls bytes from its channel, transforms them and hands
/// them to the caller; a `Write` adapter accepts caller bytes, transforms
/// them and pushes them into its channel. The direction is fixed at
/// construction and calls of the opposite direction are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Channel -> transform -> caller (decrypt/decode side)
    Read,
    /// Caller -> transform -> channel (encrypt/encode side)
    Write,
}

impl Direction {
    /// Returns the opposite direction
    pub fn opposite(self) -> Self {
        match self {
            Direction::Read => Direction::Write,
            Direction::Write => Direction::Read,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Read => f.write_str("read"),
            Direction::Write => f.write_str("write"),
        }
    }
}

/// Whether a stream adapter owns its channel.
///
/// An `Owned` channel is closed when the adapter is closed or dropped; a
/// `Borrowed` channel is left open so the caller can keep using it, e.g. to
/// read back what a write-direction adapter produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelOwnership {
    /// Teardown also closes the channel
    Owned,
    /// Teardown leaves the channel open
    Borrowed,
}

impl ChannelOwnership {
    /// True if teardown should close the channel
    pub fn closes_channel(self) -> bool {
        matches!(self, ChannelOwnership::Owned)
    }
}
