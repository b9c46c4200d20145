//! The field descriptor: a typed, one-dimensional view over a caller buffer.

use crate::error::{FloatzipError, Result};
use crate::types::ElementType;

/// Describes an array to compress, or the destination of a decompression.
///
/// The descriptor carries the engine's full shape model (four extents and
/// four strides) but only `nx` is ever used. Every constructor leaves the
/// other extents and all strides at zero.
#[derive(Debug)]
pub struct Field<B> {
    element_type: ElementType,
    nx: usize,
    ny: usize,
    nz: usize,
    nw: usize,
    sx: isize,
    sy: isize,
    sz: isize,
    sw: isize,
    data: B,
}

impl<'a> Field<&'a [u8]> {
    /// Wraps `count` elements of `element_type` stored in `data`.
    pub fn for_source(element_type: ElementType, data: &'a [u8], count: usize) -> Result<Self> {
        let expected = count.checked_mul(element_type.width()).ok_or_else(|| {
            FloatzipError::InvalidConfiguration(format!(
                "element count {} overflows the addressable size",
                count
            ))
        })?;
        if data.len() < expected {
            return Err(FloatzipError::BufferMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self::with_shape(element_type, count, data))
    }
}

impl<'a> Field<&'a mut [u8]> {
    /// An untyped, empty destination field. Reading a header fills in the
    /// element type and count.
    pub fn for_output(data: &'a mut [u8]) -> Self {
        Self::with_shape(ElementType::Unspecified, 0, data)
    }
}

impl<B> Field<B> {
    fn with_shape(element_type: ElementType, nx: usize, data: B) -> Self {
        Self {
            element_type,
            nx,
            ny: 0,
            nz: 0,
            nw: 0,
            sx: 0,
            sy: 0,
            sz: 0,
            sw: 0,
            data,
        }
    }

    pub fn element_type(&self) -> ElementType {
        self.element_type
    }

    pub fn element_count(&self) -> usize {
        self.nx
    }

    /// Bytes occupied by the described elements.
    pub fn byte_len(&self) -> usize {
        self.nx.saturating_mul(self.element_type.width())
    }

    /// `true` when no extent beyond `nx` and no stride is set.
    pub fn is_1d(&self) -> bool {
        self.ny == 0
            && self.nz == 0
            && self.nw == 0
            && self.sx == 0
            && self.sy == 0
            && self.sz == 0
            && self.sw == 0
    }

    pub(crate) fn set_element_type(&mut self, element_type: ElementType) {
        self.element_type = element_type;
    }

    pub(crate) fn set_element_count(&mut self, count: usize) {
        self.nx = count;
    }
}

impl<B: AsRef<[u8]>> Field<B> {
    /// Size of the bound buffer in bytes.
    pub fn capacity(&self) -> usize {
        self.data.as_ref().len()
    }

    /// The raw word of every element, zero-extended to 64 bits.
    pub fn words(&self) -> impl Iterator<Item = u64> + '_ {
        let width = self.element_type.width().max(1);
        let len = self.byte_len().min(self.capacity());
        self.data.as_ref()[..len].chunks_exact(width).map(read_word)
    }
}

impl<B: AsMut<[u8]>> Field<B> {
    /// Stores the raw word of element `index`.
    pub fn put_word(&mut self, index: usize, word: u64) {
        let width = self.element_type.width();
        let slot = &mut self.data.as_mut()[index * width..(index + 1) * width];
        match width {
            4 => slot.copy_from_slice(&(word as u32).to_ne_bytes()),
            8 => slot.copy_from_slice(&word.to_ne_bytes()),
            _ => {}
        }
    }

    /// Zeroes the element region so a failed decode leaves no partial values.
    pub fn clear(&mut self) {
        let len = self.byte_len();
        let data = self.data.as_mut();
        let len = len.min(data.len());
        data[..len].fill(0);
    }
}

fn read_word(chunk: &[u8]) -> u64 {
    match *chunk {
        [a, b, c, d] => u32::from_ne_bytes([a, b, c, d]) as u64,
        [a, b, c, d, e, f, g, h] => u64::from_ne_bytes([a, b, c, d, e, f, g, h]),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::typed_slice_to_bytes;

    #[test]
    fn test_source_field_is_one_dimensional() {
        let bytes = typed_slice_to_bytes(&[1.0f64, 2.0, 3.0]);
        let field = Field::for_source(ElementType::Float64, &bytes, 3).unwrap();
        assert!(field.is_1d());
        assert_eq!(field.element_count(), 3);
        assert_eq!(field.byte_len(), 24);
    }

    #[test]
    fn test_output_field_starts_unspecified() {
        let mut buf = [0u8; 16];
        let field = Field::for_output(&mut buf);
        assert!(field.is_1d());
        assert_eq!(field.element_type(), ElementType::Unspecified);
        assert_eq!(field.element_count(), 0);
        assert_eq!(field.capacity(), 16);
    }

    #[test]
    fn test_short_source_is_buffer_mismatch() {
        let bytes = [0u8; 7];
        let result = Field::for_source(ElementType::Float32, &bytes, 2);
        assert!(matches!(
            result,
            Err(FloatzipError::BufferMismatch { expected: 8, actual: 7 })
        ));
    }

    #[test]
    fn test_words_match_bit_patterns() {
        let values = [1.5f32, -0.0, f32::INFINITY];
        let bytes = typed_slice_to_bytes(&values);
        let field = Field::for_source(ElementType::Float32, &bytes, 3).unwrap();
        let words: Vec<u64> = field.words().collect();
        let expected: Vec<u64> = values.iter().map(|v| v.to_bits() as u64).collect();
        assert_eq!(words, expected);
    }

    #[test]
    fn test_put_word_and_clear() {
        let mut buf = [0xAAu8; 20];
        let mut field = Field::for_output(&mut buf);
        field.set_element_type(ElementType::Float64);
        field.set_element_count(2);
        field.put_word(1, 2.5f64.to_bits());
        assert_eq!(field.words().nth(1), Some(2.5f64.to_bits()));

        field.clear();
        assert!(field.words().all(|w| w == 0));
        // Bytes past the element region are untouched.
        assert_eq!(buf[16..], [0xAA; 4]);
    }
}
