//! Foreign function interfaces. Only the Python bindings exist, behind the
//! `python` feature.

#[cfg(feature = "python")]
pub mod python;
