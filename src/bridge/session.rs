// In: src/bridge/session.rs

//! The session builder: everything a compression needs decided before the
//! first byte is emitted.

use crate::bridge::driver;
use crate::config::CodecMode;
use crate::engine::header::MAX_ELEMENT_COUNT;
use crate::engine::{CodecStream, Field};
use crate::error::{FloatzipError, Result};
use crate::types::ElementType;

/// A configured, not yet executed compression of one source array.
///
/// Building the session validates the element type, count and source length.
/// `with_mode` validates the tolerance. `write` consumes the session, so a
/// stream is configured and used exactly once.
#[derive(Debug)]
pub struct CompressSession<'a> {
    field: Field<&'a [u8]>,
    stream: CodecStream,
}

impl<'a> CompressSession<'a> {
    /// Describes `count` elements of `element_type` stored in `source`.
    ///
    /// # Errors
    /// * `UnsupportedType` for anything but `Float32` and `Float64`.
    /// * `InvalidConfiguration` for a zero or unframeable count.
    /// * `BufferMismatch` if `source` is shorter than `count` elements.
    pub fn new(element_type: ElementType, source: &'a [u8], count: usize) -> Result<Self> {
        if !element_type.is_float() {
            return Err(FloatzipError::UnsupportedType(element_type));
        }
        if count == 0 || count > MAX_ELEMENT_COUNT {
            return Err(FloatzipError::InvalidConfiguration(format!(
                "element count must be between 1 and {}, got {}",
                MAX_ELEMENT_COUNT, count
            )));
        }
        let field = Field::for_source(element_type, source, count)?;
        Ok(Self {
            field,
            stream: CodecStream::open(),
        })
    }

    pub fn with_mode(mut self, mode: CodecMode) -> Result<Self> {
        self.stream.apply(mode)?;
        Ok(self)
    }

    pub fn element_type(&self) -> ElementType {
        self.field.element_type()
    }

    pub fn element_count(&self) -> usize {
        self.field.element_count()
    }

    /// An output length that is always large enough for `write`.
    pub fn max_compressed_size(&self) -> Result<usize> {
        self.stream.maximum_size(&self.field)
    }

    /// Compresses into `output` and returns the bytes written.
    pub fn write(self, output: &mut [u8]) -> Result<usize> {
        driver::compress(&self.field, &self.stream, output)
    }
}
