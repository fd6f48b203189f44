//! # blockpipe
//!
//! A streaming adapter that incrementally applies a block-oriented transform
//! (a cipher or similar codec) to bytes flowing through a channel, exposing
//! the result as an ordinary readable or writable byte stream.
//!
//! ## Usage
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! blockpipe = "0.1"
//! ```
//!
//! ## Features
//!
//! - `transforms` (default): Reference transform implementations
//! - `async`: Asynchronous adapter built on tokio
//! - `log`: Pump tracing through the `log` facade
//! - `full`: All features enabled
//!
//! ## Crate Structure
//!
//! This is a facade crate that re-exports functionality from several sub-crates:
//!
//! - [`blockpipe-api`]: Traits (`BlockTransform`, `Channel`) and the error system
//! - [`blockpipe-stream`]: The synchronous and asynchronous stream adapters
//! - [`blockpipe-transforms`]: Reference transforms (identity, XOR block cipher)

#![forbid(unsafe_code)]

// Core re-exports (always available)
pub use blockpipe_api as api;
pub use blockpipe_stream as stream;

// Feature-gated re-exports
#[cfg(feature = "transforms")]
pub use blockpipe_transforms as transforms;

// Erasure primitive used throughout, re-exported for downstream transforms
pub use zeroize;

/// Common imports for blockpipe users
pub mod prelude {
    pub use blockpipe_api::error::{Error, Result};
    pub use blockpipe_api::traits::{BlockTransform, Channel};
    pub use blockpipe_api::types::{ChannelOwnership, Direction};
    pub use blockpipe_stream::{BlockStream, MemoryChannel};

    #[cfg(feature = "async")]
    pub use blockpipe_api::traits::AsyncChannel;
    #[cfg(feature = "async")]
    pub use blockpipe_stream::{AsyncBlockStream, TokioChannel};

    #[cfg(feature = "transforms")]
    pub use blockpipe_transforms::{Identity, XorBlockCipher};
}
