//! Prediction configuration - active method, UCL flag and confidence level

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::error::{PredictionError, Result};
use crate::yaml::{parse_yaml, parse_yaml_file};

/// Default one-sided confidence level for UCL corrections
pub const DEFAULT_CONFIDENCE_LEVEL: f64 = 0.90;

/// Prediction method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    /// Model only
    MethodI,
    /// Model corrected with laboratory test data
    MethodII,
    /// Model corrected with field data
    MethodIII,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::MethodI => write!(f, "Method I"),
            Method::MethodII => write!(f, "Method II"),
            Method::MethodIII => write!(f, "Method III"),
        }
    }
}

impl FromStr for Method {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace([' ', '-'], "_");
        let bare = normalized.strip_prefix("method_").unwrap_or(&normalized);
        match bare {
            "i" | "1" => Ok(Method::MethodI),
            "ii" | "2" => Ok(Method::MethodII),
            "iii" | "3" => Ok(Method::MethodIII),
            _ => Err(format!(
                "Invalid method: {}. Use method_i, method_ii, or method_iii",
                s
            )),
        }
    }
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictionConfig {
    /// Active method; calculations fail until one is set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<Method>,

    /// Apply the upper-confidence-limit correction
    pub applied_ucl: bool,

    /// One-sided confidence level in (0, 1)
    pub confidence_level: f64,
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl PredictionConfig {
    /// No method, UCL off, confidence 0.90
    pub fn with_defaults() -> Self {
        Self {
            method: None,
            applied_ucl: false,
            confidence_level: DEFAULT_CONFIDENCE_LEVEL,
        }
    }

    /// Builder-style method selection
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Builder-style UCL activation
    pub fn with_ucl(mut self, confidence_level: f64) -> Self {
        self.applied_ucl = true;
        self.confidence_level = confidence_level;
        self
    }

    /// Parse and validate a YAML configuration
    pub fn from_yaml_str(content: &str, filename: &str) -> Result<Self> {
        let config: Self = parse_yaml(content, filename)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let config: Self = parse_yaml_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the confidence level lies in the open interval (0, 1)
    pub fn validate(&self) -> Result<()> {
        validate_confidence_level(self.confidence_level)
    }
}

pub(crate) fn validate_confidence_level(level: f64) -> Result<()> {
    if level > 0.0 && level < 1.0 {
        Ok(())
    } else {
        Err(PredictionError::InvalidConfig(format!(
            "confidence_level must lie in (0, 1), got {}",
            level
        )))
    }
}
