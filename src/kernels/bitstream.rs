//! Bit-addressable cursors over caller-owned byte buffers.
//!
//! `BitSink` writes into a `&mut [u8]` and `BitSource` reads from a `&[u8]`.
//! Both view the buffer as an `Msb0` bit slice and move whole fields with
//! `store_be`/`load_be`, so the stream is MSB-first. The sink never grows or
//! reallocates the buffer it is bound to; writing past its end is reported as
//! `BitIoError::Overflow` and leaves the cursor where it was.
//!
//! # Padding
//! `BitSink::finish` clears the unused bits of the final byte. A source reading
//! the same stream consumes the same number of whole bytes.

use bitvec::prelude::*;

use crate::error::BitIoError;

/// Writes bits MSB-first into a fixed-capacity byte buffer.
#[derive(Debug)]
pub struct BitSink<'a> {
    bits: &'a mut BitSlice<u8, Msb0>,
    /// Number of bits written so far.
    bit_pos: usize,
}

impl<'a> BitSink<'a> {
    /// Binds a sink to the start of `buf`.
    pub fn open(buf: &'a mut [u8]) -> Self {
        Self {
            bits: buf.view_bits_mut::<Msb0>(),
            bit_pos: 0,
        }
    }

    /// Write the lowest `count` bits of `value`, most significant first.
    ///
    /// # Errors
    /// - `BitIoError::InvalidBitCount` if count > 64
    /// - `BitIoError::Overflow` if the buffer cannot hold `count` more bits
    pub fn write_bits(&mut self, value: u64, count: usize) -> Result<(), BitIoError> {
        if count > 64 {
            return Err(BitIoError::InvalidBitCount(count));
        }
        if count == 0 {
            return Ok(());
        }
        let available = self.bits_remaining();
        if count > available {
            return Err(BitIoError::Overflow {
                requested: count,
                available,
            });
        }

        let value = if count == 64 {
            value
        } else {
            value & ((1u64 << count) - 1)
        };
        self.bits[self.bit_pos..self.bit_pos + count].store_be::<u64>(value);
        self.bit_pos += count;
        Ok(())
    }

    pub fn write_bit(&mut self, bit: bool) -> Result<(), BitIoError> {
        self.write_bits(bit as u64, 1)
    }

    /// Total number of bits written.
    pub fn bit_len(&self) -> usize {
        self.bit_pos
    }

    pub fn bits_remaining(&self) -> usize {
        self.bits.len() - self.bit_pos
    }

    /// Capacity of the bound buffer in bytes.
    pub fn capacity(&self) -> usize {
        self.bits.len() / 8
    }

    /// Closes the sink and returns the number of bytes used, including the
    /// zero-padded final byte.
    pub fn finish(self) -> usize {
        let used = self.bit_pos.div_ceil(8);
        // The caller's buffer may hold stale bits past the last field.
        self.bits[self.bit_pos..used * 8].fill(false);
        used
    }
}

/// Reads bits MSB-first from a byte buffer.
///
/// Padding bits at the end of the buffer are indistinguishable from data;
/// the caller must know how many values it expects.
#[derive(Debug, Clone)]
pub struct BitSource<'a> {
    bits: &'a BitSlice<u8, Msb0>,
    /// Current bit position (0 = MSB of first byte)
    bit_pos: usize,
}

impl<'a> BitSource<'a> {
    /// Binds a source to the start of `data`.
    pub fn open(data: &'a [u8]) -> Self {
        Self {
            bits: data.view_bits::<Msb0>(),
            bit_pos: 0,
        }
    }

    /// Read up to 64 bits, most significant first.
    ///
    /// # Errors
    /// - `BitIoError::InvalidBitCount` if count > 64
    /// - `BitIoError::UnexpectedEof` if not enough bits remain
    pub fn read_bits(&mut self, count: usize) -> Result<u64, BitIoError> {
        if count > 64 {
            return Err(BitIoError::InvalidBitCount(count));
        }
        if count == 0 {
            return Ok(0);
        }
        let available = self.bits_remaining();
        if count > available {
            return Err(BitIoError::UnexpectedEof {
                requested: count,
                available,
            });
        }

        let value = self.bits[self.bit_pos..self.bit_pos + count].load_be::<u64>();
        self.bit_pos += count;
        Ok(value)
    }

    pub fn read_bit(&mut self) -> Result<bool, BitIoError> {
        Ok(self.read_bits(1)? == 1)
    }

    pub fn bits_remaining(&self) -> usize {
        self.bits.len() - self.bit_pos
    }

    pub fn bit_position(&self) -> usize {
        self.bit_pos
    }

    /// Closes the source and returns the number of whole bytes consumed.
    pub fn finish(self) -> usize {
        self.bit_pos.div_ceil(8)
    }
}
