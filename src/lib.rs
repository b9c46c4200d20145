//! This file is the root of the `floatzip` Rust crate.
//!
//! Its responsibilities are strictly limited to:
//! 1.  Declaring all the top-level modules of our library (`bridge`, `engine`,
//!     `kernels`, etc.) so the Rust compiler knows they exist.
//! 2.  Re-exporting the public call surface.
//! 3.  Defining the `#[pymodule]` which acts as the main entry point when the
//!     compiled library is imported into Python (feature `python`).

//==================================================================================
// 0. Constants
//==================================================================================
/// The crate version, automatically set from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
//==================================================================================
// 1. Module Declarations
//==================================================================================
#[macro_use]
pub mod observability; // Make macros available throughout the crate

pub mod bridge;
pub mod config;
pub mod engine;
pub mod error;
pub mod kernels;
pub mod types;

mod ffi;
#[cfg(test)]
mod test_utils;

pub use bridge::{
    compress, compress_raw, compress_to_vec, compress_with_config, decompress, decompress_into,
    decompress_to_vec, max_compressed_size, peek_header, CompressSession, DecodedArray,
    Decompressed, FramedMode, HeaderInfo,
};
pub use config::{CodecMode, FloatzipConfig};
pub use error::{FloatzipError, Result};
pub use types::{ElementType, FloatElement};

//==================================================================================
// 2. Python Module Definition
//==================================================================================
#[cfg(feature = "python")]
use pyo3::prelude::*;

/// The `floatzip` Python module, containing all exposed Rust functions.
#[cfg(feature = "python")]
#[pymodule]
fn floatzip(m: &Bound<'_, PyModule>) -> PyResult<()> {
    use ffi::python;

    m.add_function(wrap_pyfunction!(python::compress_f32_py, m)?)?;
    m.add_function(wrap_pyfunction!(python::compress_f64_py, m)?)?;
    m.add_function(wrap_pyfunction!(python::compress_with_config_py, m)?)?;
    m.add_function(wrap_pyfunction!(python::decompress_py, m)?)?;
    m.add_function(wrap_pyfunction!(python::peek_header_py, m)?)?;

    // --- Expose the custom error type ---
    m.add(
        "FloatzipError",
        m.py().get_type_bound::<pyo3::exceptions::PyValueError>(),
    )?;

    // --- Expose version string as a module attribute ---
    m.add("__version__", VERSION)?;

    m.add_function(wrap_pyfunction!(python::enable_verbose_logging_py, m)?)?;

    Ok(())
}
