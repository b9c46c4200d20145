// In: src/bridge/format.rs

//! Defines the public-facing values that describe a floatzip stream: the
//! parsed header, the result of a decompression, and owned decoded arrays.
//! The bit layout itself lives in `engine::header`.

use serde::{Deserialize, Serialize};

use crate::engine::StreamMode;
use crate::error::{FloatzipError, Result};
use crate::kernels::quantize;
use crate::types::ElementType;

//==================================================================================
// I. Header Inspection
//==================================================================================

/// The codec mode recorded in a stream header.
///
/// Only the quantization exponent is framed, so the tolerance a stream was
/// written with cannot be recovered exactly. `quantum()` gives the grid step.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FramedMode {
    Reversible,
    Accuracy { min_exp: i32 },
}

impl FramedMode {
    /// The quantization step, or `None` for reversible streams.
    pub fn quantum(&self) -> Option<f64> {
        match *self {
            Self::Reversible => None,
            Self::Accuracy { min_exp } => Some(quantize::power_of_two(min_exp)),
        }
    }

    pub(crate) fn from_stream_mode(mode: StreamMode) -> Result<Self> {
        match mode {
            StreamMode::Reversible => Ok(Self::Reversible),
            StreamMode::Accuracy { min_exp, .. } => Ok(Self::Accuracy { min_exp }),
            StreamMode::Unset => Err(FloatzipError::Header("header carries no codec mode".into())),
        }
    }
}

/// A struct that holds the metadata extracted from a stream's header.
/// This is the return type of `peek_header`, which inspects a stream without
/// touching its payload.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct HeaderInfo {
    pub element_type: ElementType,
    pub element_count: usize,
    pub mode: FramedMode,
    /// Size of the header in bytes. The payload starts right after it.
    pub header_size: usize,
}

impl HeaderInfo {
    /// Bytes a decompression target must hold for this stream.
    pub fn required_output_len(&self) -> usize {
        self.element_count.saturating_mul(self.element_type.width())
    }
}

//==================================================================================
// II. Decompression Results
//==================================================================================

/// What a successful decompression recovered from the stream.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decompressed {
    /// Bytes consumed from the input, header included.
    pub bytes_read: usize,
    pub element_type: ElementType,
    pub element_count: usize,
}

/// An owned, typed array produced by `decompress_to_vec`.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedArray {
    Float32(Vec<f32>),
    Float64(Vec<f64>),
}

impl DecodedArray {
    pub fn element_type(&self) -> ElementType {
        match self {
            Self::Float32(_) => ElementType::Float32,
            Self::Float64(_) => ElementType::Float64,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Float32(values) => values.len(),
            Self::Float64(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every value widened to f64.
    pub fn to_f64_vec(&self) -> Vec<f64> {
        match self {
            Self::Float32(values) => values.iter().map(|&v| v as f64).collect(),
            Self::Float64(values) => values.clone(),
        }
    }
}
