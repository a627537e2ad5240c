//! Core module - identity, configuration, calculation and aggregation

pub mod calculator;
pub mod config;
pub mod context;
pub mod engine;
pub mod entity;
pub mod error;
pub mod identity;
pub mod method;
pub mod stress;
pub mod ucl;

pub use calculator::{calc_device_estimate, operating_stress, DeviceEstimate, StressSource};
pub use config::{Method, PredictionConfig, DEFAULT_CONFIDENCE_LEVEL};
pub use context::PredictionContext;
pub use engine::PredictionEngine;
pub use entity::Entity;
pub use error::{ErrorKind, PredictionError, Result};
pub use identity::{EntityId, EntityPrefix, IdParseError};
pub use method::{evaluate_device, integrate_field, integrate_lab, Integration, LabBranch};
pub use stress::{calc_elec_stress_factor, calc_temperature_factor, BOLTZMANN_EV_PER_K};
pub use ucl::{apply_ucl, UclCorrection, UclFit};
