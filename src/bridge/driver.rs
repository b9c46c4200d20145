// In: src/bridge/driver.rs

//! The framed codec driver. Binds a field and a configured stream to a bit
//! cursor, frames the payload with the header and runs the transform. One
//! driver call is one complete stream; nothing is kept between calls.

use crate::bridge::format::Decompressed;
use crate::engine::{CodecStream, Field, StreamMode};
use crate::error::{FloatzipError, Result};
use crate::kernels::bitstream::{BitSink, BitSource};

/// Writes the header and payload for `field` into `output`.
///
/// Returns the bytes written. On failure `output` may hold a partial stream.
pub fn compress(field: &Field<&[u8]>, stream: &CodecStream, output: &mut [u8]) -> Result<usize> {
    let available = output.len();
    let mut sink = BitSink::open(output);

    stream.write_header(field, &mut sink)?;
    let written = stream.compress(field, &mut sink)?;
    let padded = sink.finish();
    debug_assert_eq!(written, padded);

    log::debug!(
        "compressed {} x {} into {} of {} bytes ({:?})",
        field.element_count(),
        field.element_type(),
        written,
        available,
        stream.mode()
    );
    log_metric!(
        "event" = "compress",
        "element_type" = field.element_type(),
        "element_count" = field.element_count(),
        "mode" = mode_name(stream.mode()),
        "bytes_in" = field.byte_len(),
        "bytes_out" = written,
    );
    Ok(written)
}

/// Parses the header at the start of `input` and decodes the payload into
/// `output`.
///
/// The element type, count and mode all come from the header. Capacity is
/// checked before any element is written. When the payload fails to decode,
/// the element region of `output` is zeroed before the error is returned.
pub fn decompress(input: &[u8], output: &mut [u8]) -> Result<Decompressed> {
    let mut stream = CodecStream::open();
    let mut field = Field::for_output(output);
    let mut source = BitSource::open(input);

    stream.read_header(&mut field, &mut source)?;
    log::debug!(
        "stream header: {} x {} ({:?})",
        field.element_count(),
        field.element_type(),
        stream.mode()
    );

    let bytes_read = match stream.decompress(&mut field, &mut source) {
        Ok(bytes_read) => bytes_read,
        Err(err) => {
            if matches!(err, FloatzipError::Decode(_) | FloatzipError::BitIo(_)) {
                field.clear();
            }
            log::debug!("decompression failed: {}", err);
            return Err(err);
        }
    };

    log_metric!(
        "event" = "decompress",
        "element_type" = field.element_type(),
        "element_count" = field.element_count(),
        "mode" = mode_name(stream.mode()),
        "bytes_in" = bytes_read,
        "bytes_out" = field.byte_len(),
    );
    Ok(Decompressed {
        bytes_read,
        element_type: field.element_type(),
        element_count: field.element_count(),
    })
}

fn mode_name(mode: StreamMode) -> &'static str {
    match mode {
        StreamMode::Unset => "unset",
        StreamMode::Reversible => "reversible",
        StreamMode::Accuracy { .. } => "accuracy",
    }
}
