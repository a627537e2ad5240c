//! Shared test helpers for integration tests
//!
//! This module provides common utilities used across all test files.

#![allow(dead_code)]

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use relpred::catalog::{CategoryRegistry, MainCategory, ParametricModel, Specification};
use relpred::core::{EntityId, Method, PredictionEngine};

/// Regression scenario: λ for the ceramic capacitor at 70 °C and 38 % voltage stress
pub const SCENARIO_FAILURE_RATE: f64 = 0.0718919370985213;
/// Regression scenario: σ for the same device
pub const SCENARIO_STD: f64 = 0.00718919370985213;

/// Deterministic RNG for property sweeps
pub fn rng() -> StdRng {
    StdRng::seed_from_u64(0x5EED_2026)
}

/// The embedded sample catalog
pub fn sample_registry() -> Arc<CategoryRegistry> {
    Arc::new(CategoryRegistry::sample().unwrap())
}

/// A registry with a single constant-rate part (2 FIT, σ 0.5)
pub fn fixed_registry() -> Arc<CategoryRegistry> {
    let mut registry = CategoryRegistry::new();
    registry
        .register_leaf(
            "other.fixed",
            "Fixed-rate part",
            MainCategory::Other,
            &[],
            ParametricModel::constant(2.0, 0.5, 0.3, 0.0),
        )
        .unwrap();
    Arc::new(registry)
}

/// Specification of the regression scenario device
pub fn scenario_spec() -> Specification {
    Specification::new()
        .with("t_ref", 40.0)
        .with("t_op", 70.0)
        .with("v_dc", 3.3)
        .with("v_ac", 0.5)
        .with("v_rated", 10.0)
        .with("quality_factor", 1.0)
        .with("quantity", 1.0)
}

/// Engine over the sample catalog with one system, one unit and the scenario device
pub fn scenario_engine(method: Method) -> (PredictionEngine, Hierarchy) {
    let mut engine = PredictionEngine::new(sample_registry());
    engine.set_method(method);
    let ctx = engine.context_mut();
    let system = ctx.create_system();
    let unit = ctx.create_unit(system).unwrap();
    let device = ctx
        .create_device_with("capacitor.ceramic", unit, scenario_spec())
        .unwrap();
    (
        engine,
        Hierarchy {
            system,
            unit,
            devices: vec![device],
        },
    )
}

/// Ids of a one-system, one-unit hierarchy
#[derive(Debug, Clone)]
pub struct Hierarchy {
    pub system: EntityId,
    pub unit: EntityId,
    pub devices: Vec<EntityId>,
}

/// Assert two floats agree to a relative tolerance
pub fn assert_close(actual: f64, expected: f64, rel: f64) {
    let scale = expected.abs().max(f64::MIN_POSITIVE);
    assert!(
        ((actual - expected) / scale).abs() <= rel,
        "expected {} got {} (rel tol {})",
        expected,
        actual,
        rel
    );
}
