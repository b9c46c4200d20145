// In: src/error.rs

//! This module defines the single, unified error type for the entire floatzip library.
//! It uses the `thiserror` crate to provide ergonomic, context-aware error handling.

use thiserror::Error;

use crate::types::ElementType;

#[derive(Error, Debug)]
pub enum FloatzipError {
    // =========================================================================
    // === Configuration Errors (rejected before any byte is emitted)
    // =========================================================================
    #[error("Unsupported element type for this operation: {0}")]
    UnsupportedType(ElementType),

    #[error("Invalid codec configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Buffer length mismatch: expected at least {expected} bytes, got {actual}")]
    BufferMismatch { expected: usize, actual: usize },

    #[error("Element type mismatch: stream holds {found}, caller expected {expected}")]
    TypeMismatch {
        expected: ElementType,
        found: ElementType,
    },

    // =========================================================================
    // === Capacity, Header and Payload Errors
    // =========================================================================
    /// The output buffer cannot hold the result. `required` is a lower bound.
    #[error("Output buffer too small: at least {required} bytes required, {available} available")]
    Capacity { required: usize, available: usize },

    #[error("Compressed header is malformed: {0}")]
    Header(String),

    #[error("Compressed payload could not be decoded: {0}")]
    Decode(String),

    // =========================================================================
    // === External Error Wrappers (Using #[from] for automatic conversion)
    // =========================================================================
    /// A bit cursor failure that was not mapped to a more specific variant.
    #[error("Bit stream error: {0}")]
    BitIo(#[from] BitIoError),

    /// An error from the Serde JSON library, typically while loading a config.
    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// An error originating from the underlying I/O subsystem (e.g. the log file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An error from a safe byte-casting operation failing.
    #[error("Byte slice casting error: {0}")]
    PodCast(String), // Manual `From` impl is needed as bytemuck::PodCastError doesn't impl Error

    /// An error for Python FFI (Foreign Function Interface) operations.
    #[error("FFI operation failed: {0}")]
    FfiError(String),
}

/// Errors raised by the bit sink and bit source cursors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BitIoError {
    #[error("sink overflow: requested {requested} bits, only {available} available")]
    Overflow { requested: usize, available: usize },

    #[error("unexpected end of bit stream: requested {requested} bits, only {available} available")]
    UnexpectedEof { requested: usize, available: usize },

    #[error("invalid bit count: {0}")]
    InvalidBitCount(usize),
}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, FloatzipError>;

// =============================================================================
// === Manual `From` Implementations ===
// =============================================================================

impl From<bytemuck::PodCastError> for FloatzipError {
    fn from(err: bytemuck::PodCastError) -> Self {
        FloatzipError::PodCast(err.to_string())
    }
}

#[cfg(feature = "python")]
impl From<pyo3::PyErr> for FloatzipError {
    fn from(err: pyo3::PyErr) -> Self {
        FloatzipError::FfiError(err.to_string())
    }
}

#[cfg(feature = "python")]
impl From<FloatzipError> for pyo3::PyErr {
    fn from(err: FloatzipError) -> pyo3::PyErr {
        pyo3::exceptions::PyValueError::new_err(err.to_string())
    }
}
