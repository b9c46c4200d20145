//! This module collects the pure, stateless coding kernels the engine drives.
//!
//! Kernels know nothing about headers, fields or sessions. They read and write
//! raw element words through the bit cursors defined in `bitstream`.

//==================================================================================
// 1. Module Declarations
//==================================================================================

/// Bit-addressable sink and source over caller buffers.
pub mod bitstream;

/// Reversible mode: XOR delta with leading/trailing zero windows.
pub mod xor_delta;

/// Accuracy mode: tolerance grid quantization in blocks.
pub mod quantize;

/// Signed/unsigned folding for quantized deltas.
pub mod zigzag;

pub use bitstream::{BitSink, BitSource};
