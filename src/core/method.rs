//! Method dispatcher - model-only, lab-corrected and field-corrected estimates
//!
//! Every method starts from the device calculator's model estimate. Method II
//! folds in laboratory test data and Method III folds in field data when the
//! device carries the matching record. The UCL correction runs last when enabled.

use tracing::debug;

use crate::catalog::{LeafCategory, DEFAULT_T_REF};
use crate::core::calculator::calc_device_estimate;
use crate::core::config::{Method, PredictionConfig};
use crate::core::error::{PredictionError, Result};
use crate::core::stress::calc_temperature_factor;
use crate::core::ucl::apply_ucl;
use crate::entities::{
    Device, FieldIntegrationRecord, LabIntegrationRecord, PredictionResult, Target,
};

/// Effective test hours separating the short and long lab branches
pub const LAB_TIME_BREAKPOINT: f64 = 10_000.0;
/// Hours added to long lab tests
pub const LAB_LONG_TEST_OFFSET: f64 = 30_000.0;
/// Divisor of effective hours for burned-in populations
pub const LAB_BURN_IN_DIVISOR: f64 = 4_000.0;
/// Scale of the lab denominator term
pub const LAB_COEFFICIENT: f64 = 4e-5;
/// Scale of field operating hours
pub const FIELD_HOURS_SCALE: f64 = 1e10;

/// Lab formula branch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabBranch {
    /// No burn-in, effective time at or below the breakpoint
    ShortTest,
    /// No burn-in, effective time above the breakpoint
    LongTest,
    BurnIn,
}

impl LabBranch {
    fn describe(&self) -> &'static str {
        match self {
            LabBranch::ShortTest => "no burn-in, effective time <= 10000 h",
            LabBranch::LongTest => "no burn-in, effective time > 10000 h",
            LabBranch::BurnIn => "burn-in",
        }
    }
}

/// A corrected estimate and its audit note
#[derive(Debug, Clone, PartialEq)]
pub struct Integration {
    pub failure_rate: f64,
    pub std: f64,
    pub note: String,
}

/// Fold laboratory test data into a model estimate
///
/// Test time is accelerated to operating conditions with the record's temperature
/// curve, then `λ' = λ·(2 + failures)/a` where `a` depends on the branch.
pub fn integrate_lab(
    failure_rate: f64,
    std: f64,
    record: &LabIntegrationRecord,
    t_ref: f64,
    t_op: f64,
) -> Result<Integration> {
    if record.devices_on_test == 0 {
        return Err(PredictionError::domain(
            "lab integration",
            "devices_on_test must be at least 1",
        ));
    }
    if !(record.actual_time_on_test >= 0.0) {
        return Err(PredictionError::domain(
            "lab integration",
            format!(
                "actual_time_on_test must be non-negative, got {}",
                record.actual_time_on_test
            ),
        ));
    }
    if let Some(burn_in) = record.burn_in_time.filter(|b| !(*b >= 0.0)) {
        return Err(PredictionError::domain(
            "lab integration",
            format!("burn_in_time must be non-negative, got {}", burn_in),
        ));
    }
    check_factor("lab integration", "lab_quality_factor", record.lab_quality_factor)?;
    if !record.lab_temperature_factor.is_finite() {
        return Err(PredictionError::domain(
            "lab integration",
            format!(
                "lab_temperature_factor must be finite, got {}",
                record.lab_temperature_factor
            ),
        ));
    }

    let effective_time = record.actual_time_on_test
        * calc_temperature_factor(t_ref, t_op, record.lab_temperature_factor);
    let n = f64::from(record.devices_on_test);

    let (branch, time_term) = match record.burn_in_time {
        // A zero-hour burn-in is no burn-in
        Some(burn_in) if burn_in > 0.0 => {
            (LabBranch::BurnIn, effective_time / LAB_BURN_IN_DIVISOR)
        }
        _ if effective_time <= LAB_TIME_BREAKPOINT => {
            (LabBranch::ShortTest, effective_time.powf(0.25))
        }
        _ => (LabBranch::LongTest, effective_time + LAB_LONG_TEST_OFFSET),
    };

    let a = 2.0 + LAB_COEFFICIENT * n * time_term * failure_rate * record.lab_quality_factor;
    let weight = (2.0 + f64::from(record.failures)) / a;
    let corrected = Integration {
        failure_rate: failure_rate * weight,
        std: std * weight,
        note: String::new(),
    };

    debug!(?branch, effective_time, a, "lab integration");
    Ok(Integration {
        note: format!(
            "Method II ({}): effective time {:.1} h, a = {:.6}, failure rate {:.6} -> {:.6}, std {:.6} -> {:.6}",
            branch.describe(),
            effective_time,
            a,
            failure_rate,
            corrected.failure_rate,
            std,
            corrected.std
        ),
        ..corrected
    })
}

/// Fold field operating data into a model estimate
///
/// `b = 2/λ + adjustment·hours·environment/1e10`, `λ' = (2 + failures)/b`,
/// `σ' = √(2 + failures)/b`.
pub fn integrate_field(
    failure_rate: f64,
    std: f64,
    record: &FieldIntegrationRecord,
) -> Result<Integration> {
    if !(failure_rate > 0.0) {
        return Err(PredictionError::domain(
            "field integration",
            format!("model failure rate must be positive, got {}", failure_rate),
        ));
    }
    if !(record.total_operating_hours >= 0.0) {
        return Err(PredictionError::domain(
            "field integration",
            format!(
                "total_operating_hours must be non-negative, got {}",
                record.total_operating_hours
            ),
        ));
    }
    check_factor("field integration", "environment_factor", record.environment_factor)?;
    check_factor("field integration", "adjustment_factor", record.adjustment_factor)?;

    let b = 2.0 / failure_rate
        + record.adjustment_factor * record.total_operating_hours * record.environment_factor
            / FIELD_HOURS_SCALE;
    let events = 2.0 + f64::from(record.failures);
    let corrected_rate = events / b;
    let corrected_std = events.sqrt() / b;

    debug!(b, failures = record.failures, "field integration");
    Ok(Integration {
        failure_rate: corrected_rate,
        std: corrected_std,
        note: format!(
            "Method III: {} failures in {:.1} h, b = {:.6}, failure rate {:.6} -> {:.6}, std {:.6} -> {:.6}",
            record.failures,
            record.total_operating_hours,
            b,
            failure_rate,
            corrected_rate,
            std,
            corrected_std
        ),
    })
}

/// Multipliers must be finite and non-negative to keep failure rates non-negative
pub(crate) fn check_factor(operation: &'static str, name: &str, value: f64) -> Result<()> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(PredictionError::domain(
            operation,
            format!("{} must be a non-negative finite number, got {}", name, value),
        ))
    }
}

/// Calculate one device with the configured method
pub fn evaluate_device(
    config: &PredictionConfig,
    leaf: &LeafCategory,
    device: &Device,
) -> Result<PredictionResult> {
    let method = config.method.ok_or(PredictionError::MethodNotSet)?;
    let spec = device.specification();
    let estimate = calc_device_estimate(device.category(), leaf, spec)?;

    let mut failure_rate = estimate.failure_rate;
    let mut std = estimate.std;
    let mut notes = vec![format!(
        "{}: model failure rate {:.6}, std {:.6} (temperature factor {:.4}, electrical factor {:.4} at stress {:.3})",
        method,
        failure_rate,
        std,
        estimate.temperature_factor,
        estimate.elec_factor,
        estimate.e_op
    )];

    match method {
        Method::MethodI => {}
        Method::MethodII => match &device.lab {
            Some(record) => {
                let t_ref = spec.get("t_ref").unwrap_or(DEFAULT_T_REF);
                let t_op = spec.get("t_op").unwrap_or(t_ref);
                let lab = integrate_lab(failure_rate, std, record, t_ref, t_op)?;
                failure_rate = lab.failure_rate;
                std = lab.std;
                notes.push(lab.note);
            }
            None => notes.push("Method II: no lab data, model estimate kept".to_string()),
        },
        Method::MethodIII => match &device.field {
            Some(record) => {
                let field = integrate_field(failure_rate, std, record)?;
                failure_rate = field.failure_rate;
                std = field.std;
                notes.push(field.note);
            }
            None => notes.push("Method III: no field data, model estimate kept".to_string()),
        },
    }

    if config.applied_ucl {
        let ucl = apply_ucl(failure_rate, std, config.confidence_level)?;
        failure_rate = ucl.failure_rate;
        notes.push(ucl.note);
    }

    debug!(device = %device.id, %method, failure_rate, std, "calculated device");
    Ok(PredictionResult::new(
        Target::Device(device.id),
        failure_rate,
        std,
        notes,
    ))
}
