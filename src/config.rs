// In: src/config.rs

//! The single source of truth for floatzip compression configuration.
//!
//! `CodecMode` is the explicit two-variant choice between bit-exact and
//! tolerance-bounded compression. `FloatzipConfig` wraps it so the choice can
//! be loaded from JSON at an application boundary (e.g. a Python dict).

use serde::{Deserialize, Serialize};

use crate::error::{FloatzipError, Result};

//==================================================================================
// I. Codec Mode
//==================================================================================

/// Selects how the engine treats values.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CodecMode {
    /// **Default:** bit-exact, lossless compression.
    #[default]
    Reversible,

    /// Lossy compression where every element stays within `tolerance`
    /// (absolute error) of its source value. Larger tolerances compress harder.
    Accuracy { tolerance: f64 },
}

impl CodecMode {
    /// Maps an optional tolerance onto a mode. `None` always means reversible.
    pub fn from_tolerance(tolerance: Option<f64>) -> Self {
        match tolerance {
            Some(tolerance) => Self::Accuracy { tolerance },
            None => Self::Reversible,
        }
    }

    /// Rejects tolerances that cannot bound an error: NaN, infinities, and
    /// anything not strictly positive.
    pub fn validate(&self) -> Result<()> {
        match *self {
            Self::Reversible => Ok(()),
            Self::Accuracy { tolerance } if tolerance.is_finite() && tolerance > 0.0 => Ok(()),
            Self::Accuracy { tolerance } => Err(FloatzipError::InvalidConfiguration(format!(
                "tolerance must be finite and greater than zero, got {}",
                tolerance
            ))),
        }
    }

    pub fn is_reversible(&self) -> bool {
        matches!(self, Self::Reversible)
    }
}

//==================================================================================
// II. The Unified FloatzipConfig
//==================================================================================

/// Configuration for a compression call, created once at the application
/// boundary and passed down by reference.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct FloatzipConfig {
    /// The accuracy mode for every compression call made with this config.
    #[serde(default)]
    pub mode: CodecMode,
}

impl FloatzipConfig {
    /// Parses and validates a JSON config such as
    /// `{"mode": {"kind": "accuracy", "tolerance": 0.001}}`.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: FloatzipConfig = serde_json::from_str(json)?;
        config.mode.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_tolerance_selects_reversible() {
        assert_eq!(CodecMode::from_tolerance(None), CodecMode::Reversible);
        assert_eq!(
            CodecMode::from_tolerance(Some(1e-3)),
            CodecMode::Accuracy { tolerance: 1e-3 }
        );
    }

    #[test]
    fn test_validate_rejects_bad_tolerances() {
        for bad in [0.0, -1e-3, f64::NAN, f64::INFINITY] {
            let mode = CodecMode::Accuracy { tolerance: bad };
            assert!(matches!(
                mode.validate(),
                Err(FloatzipError::InvalidConfiguration(_))
            ));
        }
        assert!(CodecMode::Accuracy { tolerance: 1e-6 }.validate().is_ok());
        assert!(CodecMode::Reversible.validate().is_ok());
    }

    #[test]
    fn test_config_from_json() {
        let config =
            FloatzipConfig::from_json(r#"{"mode": {"kind": "accuracy", "tolerance": 0.0001}}"#)
                .unwrap();
        assert_eq!(config.mode, CodecMode::Accuracy { tolerance: 0.0001 });

        let config = FloatzipConfig::from_json(r#"{"mode": {"kind": "reversible"}}"#).unwrap();
        assert!(config.mode.is_reversible());
    }

    #[test]
    fn test_config_defaults_to_reversible() {
        let config = FloatzipConfig::from_json("{}").unwrap();
        assert_eq!(config, FloatzipConfig::default());
        assert!(config.mode.is_reversible());
    }

    #[test]
    fn test_config_json_rejects_invalid_tolerance() {
        let result = FloatzipConfig::from_json(r#"{"mode": {"kind": "accuracy", "tolerance": -2.0}}"#);
        assert!(matches!(result, Err(FloatzipError::InvalidConfiguration(_))));

        let result = FloatzipConfig::from_json(r#"{"mode": {"kind": "lossy"}}"#);
        assert!(matches!(result, Err(FloatzipError::SerdeJson(_))));
    }

    #[test]
    fn test_config_json_roundtrip() {
        let config = FloatzipConfig {
            mode: CodecMode::Accuracy { tolerance: 0.5 },
        };
        let json = config.to_json().unwrap();
        assert!(json.contains("accuracy"));
        assert_eq!(FloatzipConfig::from_json(&json).unwrap(), config);
    }
}
