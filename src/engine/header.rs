//! The self-describing header written at the start of every stream.
//!
//! ```text
//! magic "FZP" (24) | version (8) | element type (8) | element count (48)
//! | mode (8) [| min exponent, i16 (16) when mode = accuracy]
//! ```

use crate::engine::stream::StreamMode;
use crate::error::{BitIoError, FloatzipError, Result};
use crate::kernels::bitstream::{BitSink, BitSource};
use crate::kernels::quantize::{MAX_EXPONENT, MIN_EXPONENT};
use crate::types::ElementType;

/// The magic number identifying a floatzip stream.
pub const MAGIC: &[u8; 3] = b"FZP";
/// The current version of the stream format.
pub const FORMAT_VERSION: u8 = 1;
/// Largest element count the 48-bit count field can carry.
pub const MAX_ELEMENT_COUNT: usize = (1 << COUNT_BITS) - 1;

const COUNT_BITS: usize = 48;
const MODE_REVERSIBLE: u8 = 0;
const MODE_ACCURACY: u8 = 1;

/// Header length in bits for a given mode.
pub fn header_bits(mode: StreamMode) -> usize {
    let fixed = 24 + 8 + 8 + COUNT_BITS + 8;
    match mode {
        StreamMode::Accuracy { .. } => fixed + 16,
        _ => fixed,
    }
}

/// Writes the header. Capacity failures surface as `FloatzipError::BitIo`.
pub fn write(
    element_type: ElementType,
    count: usize,
    mode: StreamMode,
    sink: &mut BitSink<'_>,
) -> Result<()> {
    if element_type == ElementType::Unspecified {
        return Err(FloatzipError::UnsupportedType(element_type));
    }
    if count == 0 || count > MAX_ELEMENT_COUNT {
        return Err(FloatzipError::InvalidConfiguration(format!(
            "element count must be between 1 and {}, got {}",
            MAX_ELEMENT_COUNT, count
        )));
    }

    for &byte in MAGIC {
        sink.write_bits(byte as u64, 8)?;
    }
    sink.write_bits(FORMAT_VERSION as u64, 8)?;
    sink.write_bits(element_type.code() as u64, 8)?;
    sink.write_bits(count as u64, COUNT_BITS)?;
    match mode {
        StreamMode::Reversible => sink.write_bits(MODE_REVERSIBLE as u64, 8)?,
        StreamMode::Accuracy { min_exp, .. } => {
            sink.write_bits(MODE_ACCURACY as u64, 8)?;
            sink.write_bits(min_exp as i16 as u16 as u64, 16)?;
        }
        StreamMode::Unset => {
            return Err(FloatzipError::InvalidConfiguration(
                "no codec mode selected before writing the header".into(),
            ))
        }
    }
    Ok(())
}

/// Reads and validates a header, returning what it describes.
pub fn read(source: &mut BitSource<'_>) -> Result<(ElementType, usize, StreamMode)> {
    let map_err =
        |e: BitIoError| FloatzipError::Header(format!("stream too short for a header: {}", e));

    let mut magic = [0u8; 3];
    for byte in magic.iter_mut() {
        *byte = source.read_bits(8).map_err(map_err)? as u8;
    }
    if magic != *MAGIC {
        return Err(FloatzipError::Header("Invalid stream magic number".into()));
    }

    let version = source.read_bits(8).map_err(map_err)? as u8;
    if version != FORMAT_VERSION {
        return Err(FloatzipError::Header(format!(
            "Unsupported format version: expected {}, got {}",
            FORMAT_VERSION, version
        )));
    }

    let element_type = ElementType::from_code(source.read_bits(8).map_err(map_err)? as u8)?;
    if element_type == ElementType::Unspecified {
        return Err(FloatzipError::Header("element type is unspecified".into()));
    }

    let count = source.read_bits(COUNT_BITS).map_err(map_err)? as usize;
    if count == 0 {
        return Err(FloatzipError::Header("element count is zero".into()));
    }

    let mode = match source.read_bits(8).map_err(map_err)? as u8 {
        MODE_REVERSIBLE => StreamMode::Reversible,
        MODE_ACCURACY => {
            let min_exp = source.read_bits(16).map_err(map_err)? as u16 as i16 as i32;
            if !(MIN_EXPONENT..=MAX_EXPONENT).contains(&min_exp) {
                return Err(FloatzipError::Header(format!(
                    "quantization exponent {} is out of range",
                    min_exp
                )));
            }
            StreamMode::Accuracy {
                min_exp,
                tolerance: None,
            }
        }
        other => {
            return Err(FloatzipError::Header(format!(
                "Unknown codec mode code {}",
                other
            )))
        }
    };

    Ok((element_type, count, mode))
}
