// In: src/bridge/stateless_api.rs

//! The stateless call surface. Every function here is one complete
//! compression or decompression over caller-visible buffers.

use crate::bridge::driver;
use crate::bridge::format::{DecodedArray, Decompressed, FramedMode, HeaderInfo};
use crate::bridge::session::CompressSession;
use crate::config::{CodecMode, FloatzipConfig};
use crate::engine::{header, stream, CodecStream, StreamMode};
use crate::error::{FloatzipError, Result};
use crate::kernels::bitstream::BitSource;
use crate::types::{ElementType, FloatElement};

//==================================================================================
// I. Compression
//==================================================================================

/// Compresses a typed slice into `output`, returning the bytes written.
pub fn compress<T: FloatElement>(values: &[T], output: &mut [u8], mode: CodecMode) -> Result<usize> {
    compress_raw(
        T::ELEMENT_TYPE,
        bytemuck::cast_slice(values),
        values.len(),
        output,
        mode,
    )
}

/// Compresses `count` elements of `element_type` held as raw native-endian
/// bytes. This is the entry point for callers that only have a byte buffer
/// and a type tag.
pub fn compress_raw(
    element_type: ElementType,
    source: &[u8],
    count: usize,
    output: &mut [u8],
    mode: CodecMode,
) -> Result<usize> {
    CompressSession::new(element_type, source, count)?
        .with_mode(mode)?
        .write(output)
}

/// Compresses into a freshly allocated, exactly sized vector.
pub fn compress_to_vec<T: FloatElement>(values: &[T], mode: CodecMode) -> Result<Vec<u8>> {
    let session =
        CompressSession::new(T::ELEMENT_TYPE, bytemuck::cast_slice(values), values.len())?
            .with_mode(mode)?;
    let mut output = vec![0u8; session.max_compressed_size()?];
    let written = session.write(&mut output)?;
    output.truncate(written);
    Ok(output)
}

/// Compresses with the mode taken from a `FloatzipConfig`.
pub fn compress_with_config<T: FloatElement>(
    values: &[T],
    output: &mut [u8],
    config: &FloatzipConfig,
) -> Result<usize> {
    compress(values, output, config.mode)
}

/// A conservative upper bound on the compressed size of `count` elements.
/// An output buffer of this length never fails with `Capacity`.
pub fn max_compressed_size(element_type: ElementType, count: usize, mode: CodecMode) -> Result<usize> {
    let mut stream = CodecStream::open();
    stream.apply(mode)?;
    stream::maximum_size(element_type, count, stream.mode())
}

//==================================================================================
// II. Decompression
//==================================================================================

/// Decompresses into a raw byte buffer. Type and count come from the stream.
pub fn decompress(input: &[u8], output: &mut [u8]) -> Result<Decompressed> {
    driver::decompress(input, output)
}

/// Decompresses into a typed slice.
///
/// # Errors
/// `TypeMismatch` if the stream holds another element type. `output` is not
/// touched in that case.
pub fn decompress_into<T: FloatElement>(input: &[u8], output: &mut [T]) -> Result<Decompressed> {
    let info = peek_header(input)?;
    if info.element_type != T::ELEMENT_TYPE {
        return Err(FloatzipError::TypeMismatch {
            expected: T::ELEMENT_TYPE,
            found: info.element_type,
        });
    }
    driver::decompress(input, bytemuck::cast_slice_mut(output))
}

/// Decompresses into a newly allocated array sized from the header.
pub fn decompress_to_vec(input: &[u8]) -> Result<(DecodedArray, Decompressed)> {
    let info = peek_header(input)?;

    // Refuse to allocate for a count the payload could never carry.
    let mode = match info.mode {
        FramedMode::Reversible => StreamMode::Reversible,
        FramedMode::Accuracy { min_exp } => StreamMode::Accuracy {
            min_exp,
            tolerance: None,
        },
    };
    let payload_bits = input.len().saturating_sub(info.header_size).saturating_mul(8);
    if !stream::payload_can_hold(mode, info.element_count, payload_bits) {
        return Err(FloatzipError::Decode(format!(
            "{} payload bits cannot hold {} elements",
            payload_bits, info.element_count
        )));
    }

    match info.element_type {
        ElementType::Float32 => {
            let mut values = vec![0f32; info.element_count];
            let result = decompress_into(input, &mut values)?;
            Ok((DecodedArray::Float32(values), result))
        }
        ElementType::Float64 => {
            let mut values = vec![0f64; info.element_count];
            let result = decompress_into(input, &mut values)?;
            Ok((DecodedArray::Float64(values), result))
        }
        other => Err(FloatzipError::Header(format!(
            "element type {} is not supported by the decoder",
            other
        ))),
    }
}

//==================================================================================
// III. Inspection
//==================================================================================

/// Parses only the header of a stream.
pub fn peek_header(input: &[u8]) -> Result<HeaderInfo> {
    let mut source = BitSource::open(input);
    let (element_type, element_count, mode) = header::read(&mut source)?;
    Ok(HeaderInfo {
        element_type,
        element_count,
        mode: FramedMode::from_stream_mode(mode)?,
        header_size: source.bit_position().div_ceil(8),
    })
}
