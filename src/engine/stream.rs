//! The codec stream: per-call configuration plus the forward and inverse
//! transforms that run against a bound bit cursor.

use crate::config::CodecMode;
use crate::engine::field::Field;
use crate::engine::header;
use crate::error::{BitIoError, FloatzipError, Result};
use crate::kernels::bitstream::{BitSink, BitSource};
use crate::kernels::quantize::{self, Quantizer, BLOCK_LEN};
use crate::kernels::xor_delta;
use crate::types::ElementType;

/// The mode a stream is configured with.
///
/// A stream opened for decompression starts `Unset` and takes its mode from
/// the header it reads. Such a stream only knows the quantization exponent,
/// not the tolerance it was derived from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StreamMode {
    Unset,
    Reversible,
    Accuracy {
        min_exp: i32,
        tolerance: Option<f64>,
    },
}

/// Per-call codec configuration. Dropping it closes the stream.
#[derive(Debug)]
pub struct CodecStream {
    mode: StreamMode,
}

impl CodecStream {
    /// Opens a stream with no mode selected.
    pub fn open() -> Self {
        Self {
            mode: StreamMode::Unset,
        }
    }

    pub fn mode(&self) -> StreamMode {
        self.mode
    }

    pub fn set_reversible(&mut self) {
        self.mode = StreamMode::Reversible;
    }

    /// Selects accuracy mode and returns the quantization step it implies.
    pub fn set_accuracy(&mut self, tolerance: f64) -> Result<f64> {
        CodecMode::Accuracy { tolerance }.validate()?;
        let min_exp = quantize::min_exp_for_tolerance(tolerance);
        self.mode = StreamMode::Accuracy {
            min_exp,
            tolerance: Some(tolerance),
        };
        Ok(quantize::power_of_two(min_exp))
    }

    /// Applies a caller-facing `CodecMode`.
    pub fn apply(&mut self, mode: CodecMode) -> Result<()> {
        match mode {
            CodecMode::Reversible => self.set_reversible(),
            CodecMode::Accuracy { tolerance } => {
                self.set_accuracy(tolerance)?;
            }
        }
        Ok(())
    }

    /// Conservative upper bound, in bytes, on the stream this configuration
    /// produces for `field` (header included).
    pub fn maximum_size<B>(&self, field: &Field<B>) -> Result<usize> {
        maximum_size(field.element_type(), field.element_count(), self.mode)
    }

    pub fn write_header<B>(&self, field: &Field<B>, sink: &mut BitSink<'_>) -> Result<()> {
        if !field.is_1d() {
            return Err(FloatzipError::InvalidConfiguration(
                "only one-dimensional, unstrided fields can be framed".into(),
            ));
        }
        let result = header::write(field.element_type(), field.element_count(), self.mode, sink);
        result.map_err(|e| capacity_error(e, sink))
    }

    /// Reads the header, updating the field's type and count and this
    /// stream's mode in place.
    pub fn read_header<B>(&mut self, field: &mut Field<B>, source: &mut BitSource<'_>) -> Result<()> {
        let (element_type, count, mode) = header::read(source)?;
        field.set_element_type(element_type);
        field.set_element_count(count);
        self.mode = mode;
        Ok(())
    }

    /// Runs the forward transform, appending the payload to `sink`.
    /// Returns the bytes produced so far, header included.
    pub fn compress<B: AsRef<[u8]>>(&self, field: &Field<B>, sink: &mut BitSink<'_>) -> Result<usize> {
        let word_bits = float_word_bits(field.element_type())?;
        let result = match self.mode {
            StreamMode::Reversible => xor_delta::encode(field.words(), word_bits, sink),
            StreamMode::Accuracy { min_exp, tolerance } => {
                let tolerance = tolerance.ok_or_else(|| {
                    FloatzipError::InvalidConfiguration(
                        "accuracy mode has no tolerance to compress against".into(),
                    )
                })?;
                encode_blocks(field, Quantizer::new(min_exp, word_bits), tolerance, sink)
            }
            StreamMode::Unset => Err(unset_mode()),
        };
        result.map_err(|e| capacity_error(e, sink))?;
        Ok(sink.bit_len().div_ceil(8))
    }

    /// Runs the inverse transform into `field`. Returns the bytes consumed,
    /// header included.
    pub fn decompress<B>(&self, field: &mut Field<B>, source: &mut BitSource<'_>) -> Result<usize>
    where
        B: AsRef<[u8]> + AsMut<[u8]>,
    {
        let element_type = field.element_type();
        let word_bits = float_word_bits(element_type).map_err(|_| {
            FloatzipError::Header(format!(
                "element type {} is not supported by the decoder",
                element_type
            ))
        })?;
        let count = field.element_count();

        if !payload_can_hold(self.mode, count, source.bits_remaining()) {
            return Err(FloatzipError::Decode(format!(
                "{} payload bits cannot hold {} elements",
                source.bits_remaining(),
                count
            )));
        }
        if field.capacity() < field.byte_len() {
            return Err(FloatzipError::Capacity {
                required: field.byte_len(),
                available: field.capacity(),
            });
        }

        let result = match self.mode {
            StreamMode::Reversible => {
                xor_delta::decode(source, count, word_bits, |i, word| field.put_word(i, word))
            }
            StreamMode::Accuracy { min_exp, .. } => {
                decode_blocks(field, Quantizer::new(min_exp, word_bits), count, source)
            }
            StreamMode::Unset => Err(unset_mode()),
        };
        result.map_err(|e| match e {
            FloatzipError::BitIo(BitIoError::UnexpectedEof { .. }) => {
                FloatzipError::Decode(format!("payload truncated: {}", e))
            }
            other => other,
        })?;
        Ok(source.bit_position().div_ceil(8))
    }
}

impl Drop for CodecStream {
    fn drop(&mut self) {
        log::trace!("codec stream closed (mode: {:?})", self.mode);
    }
}

/// Conservative upper bound, in bytes, for `count` elements in `mode`.
pub fn maximum_size(element_type: ElementType, count: usize, mode: StreamMode) -> Result<usize> {
    let word_bits = float_word_bits(element_type)?;
    let payload_bits = match mode {
        StreamMode::Reversible => count
            .checked_mul(xor_delta::max_bits_per_word(word_bits))
            .ok_or_else(size_overflow)?,
        StreamMode::Accuracy { .. } => {
            quantize::max_bits(count, word_bits).ok_or_else(size_overflow)?
        }
        StreamMode::Unset => return Err(unset_mode()),
    };
    Ok((header::header_bits(mode) + payload_bits).div_ceil(8))
}

/// `false` when `payload_bits` is too few for any valid encoding of `count`
/// elements. Guards against headers that claim more elements than the
/// stream could possibly carry.
pub fn payload_can_hold(mode: StreamMode, count: usize, payload_bits: usize) -> bool {
    match mode {
        // At least one bit per element.
        StreamMode::Reversible => count <= payload_bits,
        // At least a flag and a width per block.
        StreamMode::Accuracy { .. } => count.div_ceil(BLOCK_LEN).saturating_mul(8) <= payload_bits,
        StreamMode::Unset => false,
    }
}

fn float_word_bits(element_type: ElementType) -> Result<u32> {
    if element_type.is_float() {
        Ok(element_type.bit_width())
    } else {
        Err(FloatzipError::UnsupportedType(element_type))
    }
}

fn encode_blocks<B: AsRef<[u8]>>(
    field: &Field<B>,
    quantizer: Quantizer,
    tolerance: f64,
    sink: &mut BitSink<'_>,
) -> Result<()> {
    let mut words = field.words();
    let mut block = [0u64; BLOCK_LEN];
    let mut prev = 0i64;
    loop {
        let mut n = 0;
        for slot in block.iter_mut() {
            match words.next() {
                Some(word) => {
                    *slot = word;
                    n += 1;
                }
                None => break,
            }
        }
        if n == 0 {
            return Ok(());
        }
        quantize::encode_block(&block[..n], &quantizer, tolerance, &mut prev, sink)?;
    }
}

fn decode_blocks<B: AsMut<[u8]>>(
    field: &mut Field<B>,
    quantizer: Quantizer,
    count: usize,
    source: &mut BitSource<'_>,
) -> Result<()> {
    let mut prev = 0i64;
    let mut start = 0;
    while start < count {
        let n = (count - start).min(BLOCK_LEN);
        quantize::decode_block(source, n, &quantizer, &mut prev, |i, word| {
            field.put_word(start + i, word)
        })?;
        start += n;
    }
    Ok(())
}

/// Turns a sink overflow into a capacity error with a lower bound on the
/// bytes the stream needs.
fn capacity_error(err: FloatzipError, sink: &BitSink<'_>) -> FloatzipError {
    match err {
        FloatzipError::BitIo(BitIoError::Overflow { requested, .. }) => FloatzipError::Capacity {
            required: (sink.bit_len() + requested).div_ceil(8),
            available: sink.capacity(),
        },
        other => other,
    }
}

fn unset_mode() -> FloatzipError {
    FloatzipError::InvalidConfiguration("no codec mode selected".into())
}

fn size_overflow() -> FloatzipError {
    FloatzipError::InvalidConfiguration("element count overflows the maximum stream size".into())
}
