//! Core traits consumed and exposed by the stream adapters

mod channel;
mod transform;

pub use channel::{AsyncChannel, Channel};
pub use transform::BlockTransform;
