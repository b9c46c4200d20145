//! This module contains the block coder used by accuracy (lossy) mode.
//!
//! Values are mapped onto an integer grid with step `quantum = 2^min_exp`,
//! where `min_exp = floor(log2(tolerance))`. Rounding to the grid moves a value
//! by at most `quantum / 2`. Blocks of up to `BLOCK_LEN` values are written as:
//!
//! ```text
//! 0 | width (7 bits) | zigzag(k[i] - k[i-1]) in `width` bits, per value
//! 1 | raw word in `word_bits` bits, per value
//! ```
//!
//! The encoder checks every reconstructed value, after rounding back into the
//! element type, against the tolerance before committing to the quantized
//! form. A block holding a value that fails the check (non-finite or too large
//! for the grid) is stored raw, as is any block whose quantized form would be
//! larger than the raw one.

use crate::error::{FloatzipError, Result};
use crate::kernels::bitstream::{BitSink, BitSource};
use crate::kernels::zigzag;

/// Number of values sharing one width field.
pub const BLOCK_LEN: usize = 64;

/// Bits used for the per-block width field.
const WIDTH_BITS: usize = 7;

/// Quantized magnitudes stay below 2^52 so `k as f64` is exact.
const MAX_QUANTIZED: f64 = (1u64 << 52) as f64;

/// Smallest and largest `floor(log2(x))` of a positive finite f64.
pub const MIN_EXPONENT: i32 = -1074;
pub const MAX_EXPONENT: i32 = 1023;

/// Computes `floor(log2(tolerance))` exactly from the bit pattern.
///
/// `tolerance` must be finite and strictly positive.
pub fn min_exp_for_tolerance(tolerance: f64) -> i32 {
    let bits = tolerance.to_bits();
    let biased = ((bits >> 52) & 0x7FF) as i32;
    if biased == 0 {
        // Subnormal: value = mantissa * 2^-1074.
        let mantissa = bits & ((1u64 << 52) - 1);
        MIN_EXPONENT + (63 - mantissa.leading_zeros() as i32)
    } else {
        biased - 1023
    }
}

/// Builds `2^exp` exactly, including the subnormal range.
pub fn power_of_two(exp: i32) -> f64 {
    if exp >= -1022 {
        f64::from_bits(((exp + 1023) as u64) << 52)
    } else {
        f64::from_bits(1u64 << (exp - MIN_EXPONENT))
    }
}

/// Reinterprets a raw word as the value it carries.
#[inline]
pub fn word_to_f64(word: u64, word_bits: u32) -> f64 {
    if word_bits == 32 {
        f32::from_bits(word as u32) as f64
    } else {
        f64::from_bits(word)
    }
}

/// Rounds `value` into the element type and returns its raw word.
#[inline]
pub fn f64_to_word(value: f64, word_bits: u32) -> u64 {
    if word_bits == 32 {
        (value as f32).to_bits() as u64
    } else {
        value.to_bits()
    }
}

/// The quantization grid for one stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quantizer {
    quantum: f64,
    word_bits: u32,
}

impl Quantizer {
    pub fn new(min_exp: i32, word_bits: u32) -> Self {
        Self {
            quantum: power_of_two(min_exp),
            word_bits,
        }
    }

    /// Raw word the decoder produces for grid index `k`.
    #[inline]
    pub fn reconstruct(&self, k: i64) -> u64 {
        f64_to_word(k as f64 * self.quantum, self.word_bits)
    }

    /// Grid index for `word`, if its reconstruction lies within `tolerance`.
    pub fn quantize(&self, word: u64, tolerance: f64) -> Option<i64> {
        let value = word_to_f64(word, self.word_bits);
        let scaled = (value / self.quantum).round();
        // Also rejects NaN and infinities.
        if !(scaled.abs() < MAX_QUANTIZED) {
            return None;
        }
        let k = scaled as i64;
        let restored = word_to_f64(self.reconstruct(k), self.word_bits);
        if (value - restored).abs() <= tolerance {
            Some(k)
        } else {
            None
        }
    }
}

/// Worst-case encoded size of `count` values, in bits: every block raw.
/// `None` if the size overflows `usize`.
pub fn max_bits(count: usize, word_bits: u32) -> Option<usize> {
    count
        .checked_mul(word_bits as usize)?
        .checked_add(count.div_ceil(BLOCK_LEN))
}

/// Encodes one block of at most `BLOCK_LEN` words.
///
/// `prev` carries the last quantized index across blocks; raw blocks leave it
/// untouched.
pub fn encode_block(
    words: &[u64],
    quantizer: &Quantizer,
    tolerance: f64,
    prev: &mut i64,
    sink: &mut BitSink<'_>,
) -> Result<()> {
    debug_assert!(words.len() <= BLOCK_LEN);
    let word_bits = quantizer.word_bits;

    let mut deltas = [0u64; BLOCK_LEN];
    let mut last = *prev;
    let mut merged = 0u64;
    let mut quantized = true;
    for (slot, &word) in deltas.iter_mut().zip(words) {
        match quantizer.quantize(word, tolerance) {
            Some(k) => {
                *slot = zigzag::encode_val(k - last);
                merged |= *slot;
                last = k;
            }
            None => {
                quantized = false;
                break;
            }
        }
    }

    let width = zigzag::bit_width(merged) as usize;
    let n = words.len();
    if quantized && WIDTH_BITS + n * width <= n * word_bits as usize {
        sink.write_bit(false)?;
        sink.write_bits(width as u64, WIDTH_BITS)?;
        for &delta in &deltas[..n] {
            sink.write_bits(delta, width)?;
        }
        *prev = last;
    } else {
        sink.write_bit(true)?;
        for &word in words {
            sink.write_bits(word, word_bits as usize)?;
        }
    }
    Ok(())
}

/// Decodes one block of `n` words, handing each one to `emit` with its
/// offset inside the block.
pub fn decode_block<F>(
    source: &mut BitSource<'_>,
    n: usize,
    quantizer: &Quantizer,
    prev: &mut i64,
    mut emit: F,
) -> Result<()>
where
    F: FnMut(usize, u64),
{
    let word_bits = quantizer.word_bits;
    if source.read_bit()? {
        for i in 0..n {
            emit(i, source.read_bits(word_bits as usize)?);
        }
        return Ok(());
    }

    let width = source.read_bits(WIDTH_BITS)? as usize;
    if width > 64 {
        return Err(FloatzipError::Decode(format!(
            "block width {} exceeds 64 bits",
            width
        )));
    }
    let mut last = *prev;
    for i in 0..n {
        let delta = zigzag::decode_val(source.read_bits(width)?);
        last = last.wrapping_add(delta);
        emit(i, quantizer.reconstruct(last));
    }
    *prev = last;
    Ok(())
}
