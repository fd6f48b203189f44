//! Reference block transforms for the blockpipe stream adapters
//!
//! These implementations exist so the adapters are usable and testable
//! without an external cipher crate: an identity transform, PKCS#7 padding
//! helpers, and a toy XOR block cipher composed with that padding. None of
//! them is a production cipher; the XOR cipher in particular provides no
//! confidentiality and is meant for tests, examples and plumbing checks.

#![forbid(unsafe_code)]

pub mod identity;
pub mod padding;
pub mod xor;

// Re-export main types for convenience
pub use identity::Identity;
pub use xor::{generate_key, XorBlockCipher};

// Re-export the API error system used by all transforms
pub use blockpipe_api::error::{Error, Result};
