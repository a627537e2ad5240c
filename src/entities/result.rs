//! Prediction results
//!
//! A [`PredictionResult`] is an immutable value returned by every calculation.
//! Failure rates are in FIT (failures per 10^9 device hours).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::identity::EntityId;

/// Hours per FIT denominator
pub const FIT_HOURS: f64 = 1e9;

/// What a result was calculated for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Target {
    Device(EntityId),
    Unit(EntityId),
    System(EntityId),
    /// The whole context
    Overall,
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Device(id) | Target::Unit(id) | Target::System(id) => write!(f, "{}", id),
            Target::Overall => write!(f, "overall"),
        }
    }
}

/// Failure rate, standard deviation and audit notes for one target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    target: Target,
    failure_rate: f64,
    std: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    notes: Vec<String>,
}

impl PredictionResult {
    pub(crate) fn new(target: Target, failure_rate: f64, std: f64, notes: Vec<String>) -> Self {
        Self {
            target,
            failure_rate,
            std,
            notes,
        }
    }

    pub fn target(&self) -> Target {
        self.target
    }

    /// Failure rate λ (FIT)
    pub fn failure_rate(&self) -> f64 {
        self.failure_rate
    }

    /// Standard deviation σ of the failure-rate estimate (FIT)
    pub fn std(&self) -> f64 {
        self.std
    }

    /// Audit notes in the order they were produced
    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    /// Mean time between failures in hours, `None` for a zero failure rate
    pub fn mtbf_hours(&self) -> Option<f64> {
        if self.failure_rate > 0.0 {
            Some(FIT_HOURS / self.failure_rate)
        } else {
            None
        }
    }

    /// Probability of surviving `hours` under a constant failure rate
    pub fn reliability(&self, hours: f64) -> f64 {
        (-self.failure_rate * hours / FIT_HOURS).exp()
    }
}
