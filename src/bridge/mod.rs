// In: src/bridge/mod.rs

// ====================================================================================
// ARCHITECTURAL OVERVIEW: The Bridge Layer
// ====================================================================================
//
// The `bridge` is the sole public-facing API of the floatzip library. It frames
// typed float arrays into self-describing streams and back, and fully
// encapsulates the `engine` that does the bit-level work.
//
// Data Flow (Compression):
//
//   1. [Stateless API (compress / compress_raw)]  -> Receives `&[T]` or raw bytes + type
//         |
//         `-> builds a session ->
//
//   2. [Session Builder (CompressSession)]        -> Field over the source, fresh
//         |                                          CodecStream, mode applied
//         `-> write(output) ->
//
//   3. [Driver (driver::compress)]                -> BitSink over `output`, header,
//                                                    forward transform -> bytes written
//
// Data Flow (Decompression):
//
//   1. [Stateless API (decompress / decompress_into / decompress_to_vec)]
//         |
//         `-> optional `peek_header` to size or type-check the target ->
//
//   2. [Driver (driver::decompress)]              -> Unspecified Field over `output`,
//                                                    BitSource over input, header read,
//                                                    capacity check, inverse transform
//         |
//         `-> Returns `Decompressed { bytes_read, element_type, element_count }`
//
// ====================================================================================
pub(crate) mod driver;
pub mod format;
pub mod session;
pub mod stateless_api;

// --- Low-Level Stateless API (for FFI and testing) ---
pub use stateless_api::{
    compress, compress_raw, compress_to_vec, compress_with_config, decompress, decompress_into,
    decompress_to_vec, max_compressed_size, peek_header,
};

// --- Format Structs ---
pub use format::{DecodedArray, Decompressed, FramedMode, HeaderInfo};
pub use session::CompressSession;

#[cfg(test)]
mod tests;
