//! The codec engine: field descriptors, stream configuration, the header
//! codec and the transform dispatch that drives the kernels.
//!
//! Everything in here works against caller-provided buffers. Nothing in the
//! engine allocates an output region or knows about typed slices.

//==================================================================================
// 1. Module Declarations
//==================================================================================

/// Typed, one-dimensional views over caller buffers.
pub mod field;

/// The self-describing stream header.
pub mod header;

/// Mode selection, size bounds and the forward/inverse transforms.
pub mod stream;

pub use field::Field;
pub use stream::{CodecStream, StreamMode};
