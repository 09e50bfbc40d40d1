//! Error types for zmesh-wire.

use thiserror::Error;

/// Errors that can occur while building or decoding frames.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WireError {
    /// Frame or payload ended before a required field.
    #[error("Truncated frame: needed {needed} bytes, got {got}")]
    Truncated {
        /// Minimum length required.
        needed: usize,
        /// Length actually available.
        got: usize,
    },

    /// The payload-length byte disagrees with the frame size.
    #[error("Length mismatch: length byte declares {declared} bytes, frame carries {actual}")]
    LengthMismatch {
        /// Value of the payload-length byte.
        declared: usize,
        /// Payload bytes actually present (command class through last param).
        actual: usize,
    },

    /// An inbound application payload was empty.
    #[error("Empty application payload")]
    EmptyPayload,

    /// Too many parameters for the one-byte length field.
    #[error("Parameter overflow: {count} bytes exceeds the {max}-byte frame limit")]
    ParamOverflow {
        /// Parameter bytes supplied.
        count: usize,
        /// Maximum allowed.
        max: usize,
    },
}

impl WireError {
    /// Create a truncation error.
    pub fn truncated(needed: usize, got: usize) -> Self {
        WireError::Truncated { needed, got }
    }
}
