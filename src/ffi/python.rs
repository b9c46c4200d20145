// In: src/ffi/python.rs

use log::LevelFilter;
use pyo3::prelude::*;
use pyo3::types::{PyBytes, PyDict};
use std::path::Path;

use crate::bridge::{self, DecodedArray, FramedMode};
use crate::config::{CodecMode, FloatzipConfig};
use crate::observability;

//==================================================================================
// I. Compression
//==================================================================================

/// Compresses a sequence of floats as single precision. Passing `tolerance`
/// selects accuracy mode; leaving it out keeps every bit.
#[pyfunction]
#[pyo3(name = "compress_f32", signature = (values, tolerance = None))]
pub fn compress_f32_py<'py>(
    py: Python<'py>,
    values: Vec<f32>,
    tolerance: Option<f64>,
) -> PyResult<Bound<'py, PyBytes>> {
    let mode = CodecMode::from_tolerance(tolerance);
    let compressed = py.allow_threads(move || bridge::compress_to_vec(&values, mode))?;
    Ok(PyBytes::new_bound(py, &compressed))
}

/// Compresses a sequence of floats as double precision.
#[pyfunction]
#[pyo3(name = "compress_f64", signature = (values, tolerance = None))]
pub fn compress_f64_py<'py>(
    py: Python<'py>,
    values: Vec<f64>,
    tolerance: Option<f64>,
) -> PyResult<Bound<'py, PyBytes>> {
    let mode = CodecMode::from_tolerance(tolerance);
    let compressed = py.allow_threads(move || bridge::compress_to_vec(&values, mode))?;
    Ok(PyBytes::new_bound(py, &compressed))
}

/// Compresses with a JSON config such as
/// `{"mode": {"kind": "accuracy", "tolerance": 1e-4}}`.
/// `dtype` is `"float32"` or `"float64"`.
#[pyfunction]
#[pyo3(name = "compress_with_config", signature = (values, config_json, dtype = "float64"))]
pub fn compress_with_config_py<'py>(
    py: Python<'py>,
    values: Vec<f64>,
    config_json: &str,
    dtype: &str,
) -> PyResult<Bound<'py, PyBytes>> {
    let config = FloatzipConfig::from_json(config_json)?;
    let compressed = match dtype {
        "float32" => {
            let narrowed: Vec<f32> = values.iter().map(|&v| v as f32).collect();
            py.allow_threads(move || bridge::compress_to_vec(&narrowed, config.mode))?
        }
        "float64" => py.allow_threads(move || bridge::compress_to_vec(&values, config.mode))?,
        other => {
            return Err(pyo3::exceptions::PyValueError::new_err(format!(
                "Unsupported dtype '{}', expected 'float32' or 'float64'",
                other
            )))
        }
    };
    Ok(PyBytes::new_bound(py, &compressed))
}

//==================================================================================
// II. Decompression & Inspection
//==================================================================================

/// Decompresses a stream. Returns `(type_name, values, bytes_read)`.
#[pyfunction]
#[pyo3(name = "decompress")]
pub fn decompress_py(py: Python, data: &[u8]) -> PyResult<(String, PyObject, usize)> {
    let (values, result) = py.allow_threads(move || bridge::decompress_to_vec(data))?;
    let values = match values {
        DecodedArray::Float32(values) => values.into_py(py),
        DecodedArray::Float64(values) => values.into_py(py),
    };
    Ok((result.element_type.to_string(), values, result.bytes_read))
}

/// Parses only the header of a stream into a dict.
#[pyfunction]
#[pyo3(name = "peek_header")]
pub fn peek_header_py<'py>(py: Python<'py>, data: &[u8]) -> PyResult<Bound<'py, PyDict>> {
    let info = bridge::peek_header(data)?;

    let result_dict = PyDict::new_bound(py);
    result_dict.set_item("element_type", info.element_type.to_string())?;
    result_dict.set_item("element_count", info.element_count)?;
    result_dict.set_item("header_size", info.header_size)?;
    result_dict.set_item("required_output_len", info.required_output_len())?;
    match info.mode {
        FramedMode::Reversible => {
            result_dict.set_item("mode", "reversible")?;
        }
        FramedMode::Accuracy { min_exp } => {
            result_dict.set_item("mode", "accuracy")?;
            result_dict.set_item("min_exp", min_exp)?;
            result_dict.set_item("quantum", info.mode.quantum())?;
        }
    }
    Ok(result_dict)
}

//==================================================================================
// III. Logging
//==================================================================================

/// Routes the library's log output to stderr, or appends it to `log_file`.
#[pyfunction]
#[pyo3(name = "enable_verbose_logging", signature = (log_file = None, level = "info"))]
pub fn enable_verbose_logging_py(log_file: Option<String>, level: &str) -> PyResult<()> {
    let level: LevelFilter = level.parse().map_err(|_| {
        pyo3::exceptions::PyValueError::new_err(format!("Unknown log level '{}'", level))
    })?;
    observability::enable_verbose_logging(level, log_file.as_deref().map(Path::new))?;
    Ok(())
}
