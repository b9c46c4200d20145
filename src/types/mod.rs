//! This module defines the core, strongly-typed data representations used
//! throughout the floatzip session layer.
//!
//! It includes the canonical `ElementType` tag carried in every compressed
//! header, and the `FloatElement` trait that ties a Rust float type to its tag.

pub mod element_type;

// Re-export the main type(s) for easier access.
pub use element_type::{ElementType, FloatElement};
