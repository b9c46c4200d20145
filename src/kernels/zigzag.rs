//! Zig-zag mapping between signed and unsigned 64-bit integers.
//!
//! The quantizing coder stores differences between neighbouring quantized
//! values. Zig-zag folds small negative differences onto small unsigned
//! numbers so a block needs only as many bits as its largest magnitude.

/// Encodes a single signed integer using the Zig-zag algorithm.
#[inline]
pub fn encode_val(n: i64) -> u64 {
    // The right shift must be arithmetic.
    ((n << 1) ^ (n >> 63)) as u64
}

/// Decodes a single unsigned integer back to its signed representation.
#[inline]
pub fn decode_val(n: u64) -> i64 {
    ((n >> 1) as i64) ^ -((n & 1) as i64)
}

/// Number of significant bits needed to hold `n` (0 for 0).
#[inline]
pub fn bit_width(n: u64) -> u32 {
    64 - n.leading_zeros()
}
