//! This module contains the bit-level XOR delta coder used by reversible mode.
//!
//! Each raw word (the IEEE-754 bit pattern of an element, zero-extended to
//! 64 bits) is XORed with its predecessor. Slowly changing data leaves most
//! bits of the XOR clear, so only the window between the leading and trailing
//! zeros is stored:
//!
//! ```text
//! xor == 0  ->  0
//! xor != 0  ->  1 | leading_zeros | (window_len - 1) | window bits
//! ```
//!
//! The two counts take `log2(word_bits)` bits each (5 for f32, 6 for f64).
//! The coding is exact, so NaN payloads, signed zeros and infinities survive.

use crate::error::{FloatzipError, Result};
use crate::kernels::bitstream::{BitSink, BitSource};

/// Bits used for each of the two window counts.
#[inline]
fn count_bits(word_bits: u32) -> usize {
    word_bits.trailing_zeros() as usize
}

/// Worst-case encoded size of one word, in bits.
pub fn max_bits_per_word(word_bits: u32) -> usize {
    1 + 2 * count_bits(word_bits) + word_bits as usize
}

/// Encodes `words` into the sink. Every word must fit in `word_bits` bits.
pub fn encode<I>(words: I, word_bits: u32, sink: &mut BitSink<'_>) -> Result<()>
where
    I: IntoIterator<Item = u64>,
{
    let count_len = count_bits(word_bits);
    let unused_high = 64 - word_bits;
    let mut prev = 0u64;

    for word in words {
        let xor = word ^ prev;
        prev = word;
        if xor == 0 {
            sink.write_bit(false)?;
            continue;
        }

        let lz = xor.leading_zeros() - unused_high;
        let tz = xor.trailing_zeros();
        let window = word_bits - lz - tz;

        sink.write_bit(true)?;
        sink.write_bits(lz as u64, count_len)?;
        sink.write_bits((window - 1) as u64, count_len)?;
        sink.write_bits(xor >> tz, window as usize)?;
    }
    Ok(())
}

/// Decodes `count` words from the source, handing each one to `emit` in order.
pub fn decode<F>(
    source: &mut BitSource<'_>,
    count: usize,
    word_bits: u32,
    mut emit: F,
) -> Result<()>
where
    F: FnMut(usize, u64),
{
    let count_len = count_bits(word_bits);
    let mut prev = 0u64;

    for i in 0..count {
        if source.read_bit()? {
            let lz = source.read_bits(count_len)? as u32;
            let window = source.read_bits(count_len)? as u32 + 1;
            if lz + window > word_bits {
                return Err(FloatzipError::Decode(format!(
                    "XOR window of {} bits after {} leading zeros exceeds {}-bit word at element {}",
                    window, lz, word_bits, i
                )));
            }
            let tz = word_bits - lz - window;
            prev ^= source.read_bits(window as usize)? << tz;
        }
        emit(i, prev);
    }
    Ok(())
}
