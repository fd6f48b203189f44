//! Error handling for blockpipe stream operations
//!
//! A single error type covers the whole workspace: configuration mistakes
//! (wrong direction, bad bounds), unsupported operations (seek, double
//! finalize), transform failures, trailer integrity failures on the decode
//! side, and channel I/O errors. Transform and channel failures are
//! propagated unchanged; no layer retries them.

use core::fmt;

pub mod validate;


/// Primary error type for stream adapter operations
#[derive(Debug)]
pub enum Error {
    /// Invalid configuration or call shape, e.g. a write call on a
    /// read-direction adapter or a zero block size
    Configuration {
        /// Operation or parameter that was misused
        context: &'static str,
        /// Reason the call was rejected
        message: String,
    },

    /// Length validation error
    Length {
        /// Context where the length error occurred
        context: &'static str,
        /// Expected length in bytes
        expected: usize,
        /// Actual length in bytes
        actual: usize,
    },

    /// Operation not supported by this stream, e.g. seeking, length
    /// queries, or finalizing twice
    Unsupported {
        /// Name of the rejected operation
        operation: &'static str,
    },

    /// Failure reported by the transform, propagated unchanged
    Transform {
        /// Operation during which the transform failed
        context: &'static str,
        /// Detail supplied by the transform
        message: String,
    },

    /// Trailer validation failure on the decode side. Distinguishable from
    /// `Channel` so callers can treat it as a data-integrity signal rather
    /// than a transient I/O fault.
    Integrity {
        /// What failed to validate
        context: &'static str,
    },

    /// Channel I/O failure, propagated unchanged
    Channel(std::io::Error),
}

/// Result type for stream adapter operations
pub type Result<T> = core::result::Result<T, Error>;

impl Error {
    /// Shorthand to create a `Configuration` error
    pub fn configuration(context: &'static str, message: impl Into<String>) -> Self {
        Error::Configuration {
            context,
            message: message.into(),
        }
    }

    /// Shorthand to create a `Transform` error
    pub fn transform(context: &'static str, message: impl Into<String>) -> Self {
        Error::Transform {
            context,
            message: message.into(),
        }
    }

    /// True if this error is a decode-side integrity failure
    pub fn is_integrity(&self) -> bool {
        matches!(self, Error::Integrity { .. })
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration { context, message } => {
                write!(f, "invalid configuration: {}: {}", context, message)
            }
            Self::Length {
                context,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "{}: invalid length (expected {}, got {})",
                    context, expected, actual
                )
            }
            Self::Unsupported { operation } => {
                write!(f, "{} is not supported", operation)
            }
            Self::Transform { context, message } => {
                write!(f, "transform failed: {}: {}", context, message)
            }
            Self::Integrity { context } => {
                write!(f, "integrity check failed: {}", context)
            }
            Self::Channel(err) => {
                write!(f, "channel error: {}", err)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Channel(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Channel(err)
    }
}

// Conversion for the std::io::Read/Write impls on the sync adapter
impl From<Error> for std::io::Error {
    fn from(err: Error) -> Self {
        use std::io::ErrorKind;
        match err {
            Error::Channel(io) => io,
            Error::Unsupported { .. } => std::io::Error::new(ErrorKind::Unsupported, err),
            Error::Configuration { .. } | Error::Length { .. } => {
                std::io::Error::new(ErrorKind::InvalidInput, err)
            }
            Error::Transform { .. } | Error::Integrity { .. } => {
                std::io::Error::new(ErrorKind::InvalidData, err)
            }
        }
    }
}
