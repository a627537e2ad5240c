//! Failure-rate models - the evaluation contract a leaf category supplies
//!
//! The catalog of per-component formulas lives outside this crate. A leaf
//! category only has to implement [`FailureRateModel`]; [`ParametricModel`] is a
//! data-driven implementation that can be written in YAML.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::parameters::Specification;

/// The four model quantities for one device (plus an optional second stress curve)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelOutputs {
    /// Base failure rate λ
    pub base_rate: f64,
    /// Base standard deviation σ
    pub base_std: f64,
    /// Temperature curve constant (activation energy, eV)
    pub temp_curve: f64,
    /// Electrical stress curve constant
    pub elec_curve: f64,
    /// Second, independent electrical stress curve
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elec_curve2: Option<f64>,
}

/// Errors a model can report while evaluating
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("formula '{0}' is not defined")]
    MissingFormula(&'static str),

    #[error("parameter '{0}' is not set")]
    MissingParameter(String),
}

/// Evaluation contract of a leaf category
pub trait FailureRateModel: fmt::Debug + Send + Sync {
    /// Evaluate base rate, base std and both curve constants for a specification
    fn evaluate(&self, spec: &Specification) -> Result<ModelOutputs, ModelError>;
}

/// A bracket of a stepped lookup
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// Inclusive upper bound of the bracket
    pub up_to: f64,
    pub value: f64,
}

/// One model quantity expressed as data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Formula {
    /// A fixed value
    Constant(f64),

    /// First bracket whose `up_to` covers `spec[key]`, else `above`
    Stepped {
        key: String,
        steps: Vec<Step>,
        above: f64,
    },

    /// `coefficient · spec[key]^exponent`
    Power {
        key: String,
        coefficient: f64,
        exponent: f64,
    },
}

impl Formula {
    /// Evaluate against a specification
    pub fn evaluate(&self, spec: &Specification) -> Result<f64, ModelError> {
        match self {
            Formula::Constant(value) => Ok(*value),
            Formula::Stepped { key, steps, above } => {
                let x = spec.require(key)?;
                Ok(steps
                    .iter()
                    .find(|step| x <= step.up_to)
                    .map(|step| step.value)
                    .unwrap_or(*above))
            }
            Formula::Power {
                key,
                coefficient,
                exponent,
            } => {
                let x = spec.require(key)?;
                Ok(coefficient * x.powf(*exponent))
            }
        }
    }
}

impl From<f64> for Formula {
    fn from(value: f64) -> Self {
        Formula::Constant(value)
    }
}

/// Data-driven model; any formula may be absent and is reported at evaluation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParametricModel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_rate: Option<Formula>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_std: Option<Formula>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp_curve: Option<Formula>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elec_curve: Option<Formula>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elec_curve2: Option<Formula>,
}

impl ParametricModel {
    /// Model with constant values for all four formulas
    pub fn constant(base_rate: f64, base_std: f64, temp_curve: f64, elec_curve: f64) -> Self {
        Self {
            base_rate: Some(base_rate.into()),
            base_std: Some(base_std.into()),
            temp_curve: Some(temp_curve.into()),
            elec_curve: Some(elec_curve.into()),
            elec_curve2: None,
        }
    }

    pub fn with_elec_curve2(mut self, formula: impl Into<Formula>) -> Self {
        self.elec_curve2 = Some(formula.into());
        self
    }
}

fn required(
    formula: &Option<Formula>,
    name: &'static str,
    spec: &Specification,
) -> Result<f64, ModelError> {
    formula
        .as_ref()
        .ok_or(ModelError::MissingFormula(name))?
        .evaluate(spec)
}

impl FailureRateModel for ParametricModel {
    fn evaluate(&self, spec: &Specification) -> Result<ModelOutputs, ModelError> {
        Ok(ModelOutputs {
            base_rate: required(&self.base_rate, "base_rate", spec)?,
            base_std: required(&self.base_std, "base_std", spec)?,
            temp_curve: required(&self.temp_curve, "temp_curve", spec)?,
            elec_curve: required(&self.elec_curve, "elec_curve", spec)?,
            elec_curve2: self
                .elec_curve2
                .as_ref()
                .map(|f| f.evaluate(spec))
                .transpose()?,
        })
    }
}
