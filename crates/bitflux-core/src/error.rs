//! Error types for bitflux buffer and engine operations.
//!
//! Only two failure modes exist under normal use:
//!
//! - [`CoreError::SizeMismatch`] - an external pixel slice does not match
//!   the buffer length; the buffer is left in its prior valid state.
//! - [`CoreError::AllocationFailed`] - raised only from buffer
//!   (re)initialization; the prior buffer, if any, remains valid until a
//!   replacement allocation succeeds.
//!
//! Malformed transform configurations are precluded at the type level by
//! the closed enums in [`crate::config`].

use thiserror::Error;

/// Result type alias using [`CoreError`] as the error type.
pub type CoreResult<T> = std::result::Result<T, CoreError>;

/// Errors that can occur during bitflux buffer operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// External slice length does not match the buffer length.
    ///
    /// Returned by bulk copy-in/copy-out operations. No partial copy is
    /// performed; the buffer keeps its previous contents.
    #[error("size mismatch: expected {expected} bytes, got {got}")]
    SizeMismatch {
        /// Byte length the buffer requires.
        expected: usize,
        /// Byte length the caller provided.
        got: usize,
    },

    /// Memory allocation failed during buffer (re)initialization.
    #[error("failed to allocate {requested} bytes: {reason}")]
    AllocationFailed {
        /// Bytes requested.
        requested: usize,
        /// Failure reason.
        reason: String,
    },
}

impl CoreError {
    /// Creates a [`CoreError::SizeMismatch`] error.
    #[inline]
    pub fn size_mismatch(expected: usize, got: usize) -> Self {
        Self::SizeMismatch { expected, got }
    }

    /// Creates a [`CoreError::AllocationFailed`] error.
    #[inline]
    pub fn allocation_failed(requested: usize, reason: impl Into<String>) -> Self {
        Self::AllocationFailed {
            requested,
            reason: reason.into(),
        }
    }

    /// Returns `true` if this is a size mismatch error.
    #[inline]
    pub fn is_size_mismatch(&self) -> bool {
        matches!(self, Self::SizeMismatch { .. })
    }

    /// Returns `true` if this is an allocation error.
    #[inline]
    pub fn is_allocation_error(&self) -> bool {
        matches!(self, Self::AllocationFailed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_mismatch() {
        let err = CoreError::size_mismatch(64, 48);
        let msg = err.to_string();
        assert!(msg.contains("64"));
        assert!(msg.contains("48"));
        assert!(err.is_size_mismatch());
        assert!(!err.is_allocation_error());
    }

    #[test]
    fn test_allocation_failed() {
        let err = CoreError::allocation_failed(usize::MAX, "capacity overflow");
        assert!(err.to_string().contains("capacity overflow"));
        assert!(err.is_allocation_error());
    }
}
