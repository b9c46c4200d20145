//! This module defines the canonical, type-safe representation of the element
//! types a compressed stream can describe.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::FloatzipError;

/// The element type recorded in a compressed header.
///
/// `Unspecified` is the placeholder a decode field starts with before its header
/// has been read. The integer tags exist in the wire format but are not a
/// working path on the exposed surface.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ElementType {
    Unspecified,
    Int32,
    Int64,
    Float32,
    Float64,
}

impl ElementType {
    /// Size of one element in bytes. `Unspecified` has no width.
    pub fn width(&self) -> usize {
        match self {
            Self::Unspecified => 0,
            Self::Int32 | Self::Float32 => 4,
            Self::Int64 | Self::Float64 => 8,
        }
    }

    /// Width in bits of the raw word that carries one element.
    pub fn bit_width(&self) -> u32 {
        (self.width() * 8) as u32
    }

    /// The stable one-byte code written into the header.
    pub fn code(&self) -> u8 {
        match self {
            Self::Unspecified => 0,
            Self::Int32 => 1,
            Self::Int64 => 2,
            Self::Float32 => 3,
            Self::Float64 => 4,
        }
    }

    /// Parses a header code back into an `ElementType`.
    pub fn from_code(code: u8) -> Result<Self, FloatzipError> {
        match code {
            0 => Ok(Self::Unspecified),
            1 => Ok(Self::Int32),
            2 => Ok(Self::Int64),
            3 => Ok(Self::Float32),
            4 => Ok(Self::Float64),
            other => Err(FloatzipError::Header(format!(
                "Unknown element type code {}",
                other
            ))),
        }
    }

    /// Returns `true` if the data type is a floating-point number.
    pub fn is_float(&self) -> bool {
        matches!(self, Self::Float32 | Self::Float64)
    }
}

/// Provides the canonical string representation for an `ElementType`.
impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// A Rust float type that can be compressed through the typed API.
pub trait FloatElement: bytemuck::Pod {
    const ELEMENT_TYPE: ElementType;
}

impl FloatElement for f32 {
    const ELEMENT_TYPE: ElementType = ElementType::Float32;
}

impl FloatElement for f64 {
    const ELEMENT_TYPE: ElementType = ElementType::Float64;
}
