//! Stream adapters that pump bytes through a block-oriented transform
//!
//! This crate provides the blockpipe adapters proper: [`BlockStream`] for
//! synchronous channels and, behind the `async` feature,
//! [`AsyncBlockStream`] for suspendable channels. Both present a transform
//! applied to a byte channel as an ordinary readable or writable stream,
//! honoring strict block alignment, exactly-once finalization with chained
//! trailer propagation, a multi-block fast path, and zeroized staging
//! buffers.

#![forbid(unsafe_code)]

// Pump tracing; compiles to nothing without the `log` feature.
macro_rules! pump_trace {
    ($($arg:tt)*) => {
        #[cfg(feature = "log")]
        log::trace!($($arg)*);
    };
}
pub(crate) use pump_trace;

mod buffer;
mod channel;
mod engine;
mod sync;

#[cfg(feature = "async")]
mod asynchronous;

pub use channel::{MemoryChannel, ReaderChannel, WriterChannel};
pub use sync::BlockStream;

#[cfg(feature = "async")]
pub use asynchronous::{AsyncBlockStream, TokioChannel};

// Re-export the API surface adapters are built against
pub use blockpipe_api::error::{Error, Result};
pub use blockpipe_api::traits::{BlockTransform, Channel};
pub use blockpipe_api::types::{ChannelOwnership, Direction};

#[cfg(feature = "async")]
pub use blockpipe_api::traits::AsyncChannel;
