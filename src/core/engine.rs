//! Prediction engine - per-device calculation and bottom-up aggregation
//!
//! Devices are calculated independently; units, systems and the overall
//! result are plain reductions over their children in insertion order.
//!
//! At the unit level an environment factor scales the summed failure rate,
//! and the summed standard deviation becomes `√(Σσ)·factor`. At the overall
//! level an enabled UCL applies a flat `λ·(1 + confidence_level/100)` uplift,
//! separate from the per-device quantile correction.

use std::sync::Arc;

use tracing::debug;

use crate::catalog::CategoryRegistry;
use crate::core::config::{validate_confidence_level, Method, PredictionConfig};
use crate::core::context::PredictionContext;
use crate::core::error::{PredictionError, Result};
use crate::core::identity::EntityId;
use crate::core::method::{check_factor, evaluate_device};
use crate::entities::{PredictionResult, Target};

/// Caller-owned prediction engine
#[derive(Debug)]
pub struct PredictionEngine {
    context: PredictionContext,
    config: PredictionConfig,
}

impl PredictionEngine {
    /// Engine with default configuration (no method set)
    pub fn new(registry: Arc<CategoryRegistry>) -> Self {
        Self {
            context: PredictionContext::new(registry),
            config: PredictionConfig::with_defaults(),
        }
    }

    /// Engine with a validated configuration
    pub fn with_config(registry: Arc<CategoryRegistry>, config: PredictionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            context: PredictionContext::new(registry),
            config,
        })
    }

    pub fn context(&self) -> &PredictionContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut PredictionContext {
        &mut self.context
    }

    pub fn config(&self) -> &PredictionConfig {
        &self.config
    }

    pub fn set_method(&mut self, method: Method) {
        self.config.method = Some(method);
    }

    pub fn set_applied_ucl(&mut self, applied: bool) {
        self.config.applied_ucl = applied;
    }

    /// Set the one-sided confidence level; must lie in (0, 1)
    pub fn set_confidence_level(&mut self, level: f64) -> Result<()> {
        validate_confidence_level(level)?;
        self.config.confidence_level = level;
        Ok(())
    }

    /// Calculate one device with the configured method
    pub fn calc_device(&self, device_id: EntityId) -> Result<PredictionResult> {
        let device = self
            .context
            .device(device_id)
            .ok_or(PredictionError::UnknownEntity {
                kind: "device",
                id: device_id,
            })?;
        let leaf = self.context.registry().leaf(device.category())?;
        evaluate_device(&self.config, leaf, device)
    }

    /// Sum of device results, scaled by the unit's environment factor
    pub fn calc_unit(&self, unit_id: EntityId) -> Result<PredictionResult> {
        if self.config.method.is_none() {
            return Err(PredictionError::MethodNotSet);
        }
        let unit = self
            .context
            .unit(unit_id)
            .ok_or(PredictionError::UnknownEntity {
                kind: "unit",
                id: unit_id,
            })?;

        let mut failure_rate = 0.0;
        let mut std = 0.0;
        let mut notes = Vec::with_capacity(unit.devices().len() + 1);
        for device_id in unit.devices() {
            let result = self.calc_device(*device_id)?;
            failure_rate += result.failure_rate();
            std += result.std();
            notes.push(child_note(&result));
        }

        if let Some(factor) = unit.environment_factor {
            check_factor("unit environment", "environment_factor", factor)?;
            let raw_std = std;
            failure_rate *= factor;
            std = std.sqrt() * factor;
            notes.push(format!(
                "environment factor {:.4}: failure rate {:.6}, std sqrt({:.6}) x factor = {:.6}",
                factor, failure_rate, raw_std, std
            ));
        }

        debug!(unit = %unit_id, failure_rate, std, "calculated unit");
        Ok(PredictionResult::new(
            Target::Unit(unit_id),
            failure_rate,
            std,
            notes,
        ))
    }

    /// Linear sum of unit results
    pub fn calc_system(&self, system_id: EntityId) -> Result<PredictionResult> {
        if self.config.method.is_none() {
            return Err(PredictionError::MethodNotSet);
        }
        let system = self
            .context
            .system(system_id)
            .ok_or(PredictionError::UnknownEntity {
                kind: "system",
                id: system_id,
            })?;

        let mut failure_rate = 0.0;
        let mut std = 0.0;
        let mut notes = Vec::with_capacity(system.units().len());
        for unit_id in system.units() {
            let result = self.calc_unit(*unit_id)?;
            failure_rate += result.failure_rate();
            std += result.std();
            notes.push(child_note(&result));
        }

        debug!(system = %system_id, failure_rate, std, "calculated system");
        Ok(PredictionResult::new(
            Target::System(system_id),
            failure_rate,
            std,
            notes,
        ))
    }

    /// Linear sum over every system, with the aggregate UCL uplift when enabled
    pub fn calc(&self) -> Result<PredictionResult> {
        if self.config.method.is_none() {
            return Err(PredictionError::MethodNotSet);
        }

        let mut failure_rate = 0.0;
        let mut std = 0.0;
        let mut notes = Vec::new();
        for system in self.context.systems() {
            let result = self.calc_system(system.id)?;
            failure_rate += result.failure_rate();
            std += result.std();
            notes.push(child_note(&result));
        }

        if self.config.applied_ucl {
            let uplift = 1.0 + self.config.confidence_level / 100.0;
            let before = failure_rate;
            failure_rate *= uplift;
            notes.push(format!(
                "aggregate UCL uplift x{:.4}: failure rate {:.6} -> {:.6}",
                uplift, before, failure_rate
            ));
        }

        debug!(failure_rate, std, "calculated overall");
        Ok(PredictionResult::new(Target::Overall, failure_rate, std, notes))
    }
}

fn child_note(result: &PredictionResult) -> String {
    format!(
        "{}: failure rate {:.6}, std {:.6}",
        result.target(),
        result.failure_rate(),
        result.std()
    )
}
