//! Public API traits and types for the blockpipe ecosystem
//!
//! This crate provides the public API surface for blockpipe, including the
//! trait definitions consumed and exposed by the stream adapters, the unified
//! error system, and common types used throughout the workspace.

#![forbid(unsafe_code)]

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at the crate level for convenience
pub use error::{validate, Error, Result};
pub use types::{ChannelOwnership, Direction};

// Re-export all traits from the traits module
pub use traits::{AsyncChannel, BlockTransform, Channel};
