//! Validation utilities for stream adapter state and call shapes

use super::{Error, Result};
use crate::types::Direction;

/// Validate a parameter condition
#[inline(always)]
pub fn parameter(condition: bool, context: &'static str, reason: &'static str) -> Result<()> {
    if !condition {
        return Err(Error::configuration(context, reason));
    }
    Ok(())
}

/// Validate a length
#[inline(always)]
pub fn length(context: &'static str, actual: usize, expected: usize) -> Result<()> {
    if actual != expected {
        return Err(Error::Length {
            context,
            expected,
            actual,
        });
    }
    Ok(())
}

/// Validate a minimum length
#[inline(always)]
pub fn min_length(context: &'static str, actual: usize, min: usize) -> Result<()> {
    if actual < min {
        return Err(Error::Length {
            context,
            expected: min,
            actual,
        });
    }
    Ok(())
}

/// Validate that a call matches the adapter's fixed direction
#[inline(always)]
pub fn direction(actual: Direction, required: Direction, operation: &'static str) -> Result<()> {
    if actual != required {
        return Err(Error::configuration(
            operation,
            format!("not permitted on a {}-direction stream", actual),
        ));
    }
    Ok(())
}

/// Reject an operation the stream cannot perform
#[inline(always)]
pub fn supported(condition: bool, operation: &'static str) -> Result<()> {
    if !condition {
        return Err(Error::Unsupported { operation });
    }
    Ok(())
}
