//! Helpers shared by the unit tests.

/// Copies a typed slice into an owned byte vector in native byte order.
pub fn typed_slice_to_bytes<T: bytemuck::Pod>(data: &[T]) -> Vec<u8> {
    bytemuck::cast_slice(data).to_vec()
}
