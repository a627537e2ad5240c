//! Device calculator - model outputs combined with stress, quality and quantity
//!
//! `λ = base_rate · tFactor · eFactor · quality_factor · quantity`, with σ derived
//! the same way from `base_std`. The operating stress ratio `e_op` is derived per
//! main category from the specification's stress inputs; when those inputs are
//! absent a documented constant is used instead.

use tracing::{debug, warn};

use crate::catalog::{
    CategoryId, LeafCategory, MainCategory, ModelError, Specification, DEFAULT_E_REF,
    DEFAULT_T_REF,
};
use crate::core::error::{PredictionError, Result};
use crate::core::stress::{calc_elec_stress_factor, calc_temperature_factor};

/// Operating stress ratio assumed when a category's stress inputs are absent
pub const STRESS_FALLBACK: f64 = 0.5;

/// Everything the calculator derived for one device
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviceEstimate {
    pub failure_rate: f64,
    pub std: f64,
    pub base_rate: f64,
    pub base_std: f64,
    pub temperature_factor: f64,
    pub e_op: f64,
    pub elec_factor: f64,
}

/// Where an operating stress ratio came from
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StressSource {
    /// Computed from the named applied/rated pair
    Ratio(&'static str),
    /// Inputs absent; documented constant used
    Fallback,
    /// Category is not derated electrically; `e_ref` used
    Reference,
}

fn ratio(spec: &Specification, applied: &str, rated: &str) -> Option<f64> {
    let rated = spec.get(rated).filter(|r| *r > 0.0)?;
    Some(spec.get(applied)? / rated)
}

/// Derive the operating stress ratio for a main category
pub fn operating_stress(main: MainCategory, spec: &Specification) -> (f64, StressSource) {
    let e_ref = spec.get("e_ref").unwrap_or(DEFAULT_E_REF);

    let derived = match main {
        MainCategory::Capacitor => spec
            .get("v_rated")
            .filter(|r| *r > 0.0)
            .and_then(|rated| {
                let v_dc = spec.get("v_dc")?;
                let v_ac = spec.get("v_ac").unwrap_or(0.0);
                Some(((v_dc + v_ac) / rated, "voltage"))
            }),
        MainCategory::Resistor => ratio(spec, "p_applied", "p_rated").map(|r| (r, "power")),
        MainCategory::Diode => ratio(spec, "i_applied", "i_rated")
            .map(|r| (r, "current"))
            .or_else(|| ratio(spec, "v_applied", "v_rated").map(|r| (r, "voltage"))),
        MainCategory::Transistor => ratio(spec, "p_dissipated", "p_rated")
            .map(|r| (r, "power"))
            .or_else(|| ratio(spec, "v_applied", "v_rated").map(|r| (r, "voltage"))),
        MainCategory::IntegratedCircuit => {
            ratio(spec, "v_applied", "v_rated").map(|r| (r, "voltage"))
        }
        MainCategory::Other => return (e_ref, StressSource::Reference),
    };

    match derived {
        Some((value, axis)) => (value, StressSource::Ratio(axis)),
        None if main == MainCategory::IntegratedCircuit => (e_ref, StressSource::Fallback),
        None => (STRESS_FALLBACK, StressSource::Fallback),
    }
}

fn model_error(category: &CategoryId, err: ModelError) -> PredictionError {
    match err {
        ModelError::MissingFormula(formula) => PredictionError::MissingFormula {
            category: category.clone(),
            formula,
        },
        ModelError::MissingParameter(parameter) => PredictionError::MissingParameter {
            category: category.clone(),
            parameter,
        },
    }
}

/// Evaluate one device's model-only failure rate and standard deviation
pub fn calc_device_estimate(
    category: &CategoryId,
    leaf: &LeafCategory,
    spec: &Specification,
) -> Result<DeviceEstimate> {
    let outputs = leaf
        .model
        .evaluate(spec)
        .map_err(|e| model_error(category, e))?;

    let t_ref = spec.get("t_ref").unwrap_or(DEFAULT_T_REF);
    let t_op = spec.get("t_op").unwrap_or(t_ref);
    let e_ref = spec.get("e_ref").unwrap_or(DEFAULT_E_REF);
    let quality_factor = spec.get("quality_factor").unwrap_or(1.0);
    let quantity = spec.get("quantity").unwrap_or(1.0);

    let (e_op, source) = operating_stress(leaf.main, spec);
    if source == StressSource::Fallback {
        warn!(
            category = %category,
            main = %leaf.main,
            e_op,
            "stress inputs absent, using fallback operating stress"
        );
    }

    let temperature_factor = calc_temperature_factor(t_ref, t_op, outputs.temp_curve);
    let elec_factor =
        calc_elec_stress_factor(e_ref, e_op, outputs.elec_curve, outputs.elec_curve2);
    let multiplier = temperature_factor * elec_factor * quality_factor * quantity;

    let estimate = DeviceEstimate {
        failure_rate: outputs.base_rate * multiplier,
        std: outputs.base_std * multiplier,
        base_rate: outputs.base_rate,
        base_std: outputs.base_std,
        temperature_factor,
        e_op,
        elec_factor,
    };

    debug!(
        category = %category,
        failure_rate = estimate.failure_rate,
        std = estimate.std,
        t_factor = temperature_factor,
        e_factor = elec_factor,
        "device estimate"
    );

    Ok(estimate)
}
