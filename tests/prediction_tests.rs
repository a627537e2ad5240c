//! Prediction tests - device scenarios, methods, UCL and aggregation

mod common;

use common::{
    assert_close, fixed_registry, rng, sample_registry, scenario_engine, scenario_spec,
    SCENARIO_FAILURE_RATE, SCENARIO_STD,
};
use rand::Rng;
use relpred::catalog::Specification;
use relpred::core::{
    calc_elec_stress_factor, calc_temperature_factor, ErrorKind, Method, PredictionConfig,
    PredictionEngine, PredictionError,
};
use relpred::entities::{FieldIntegrationRecord, LabIntegrationRecord, Target};

// ============================================================================
// Stress Factors
// ============================================================================

#[test]
fn test_stress_factor_identities() {
    let mut rng = rng();
    for _ in 0..200 {
        let t: f64 = rng.random_range(-50.0..150.0);
        let e: f64 = rng.random_range(0.0..1.0);
        let curve: f64 = rng.random_range(0.0..5.0);
        assert_eq!(calc_temperature_factor(t, t, curve), 1.0);
        assert_eq!(calc_elec_stress_factor(e, e, curve, None), 1.0);
    }
}

// ============================================================================
// Device Scenarios
// ============================================================================

#[test]
fn test_scenario_regression_values() {
    let (engine, ids) = scenario_engine(Method::MethodI);
    let result = engine.calc_device(ids.devices[0]).unwrap();

    assert_eq!(result.target(), Target::Device(ids.devices[0]));
    assert_close(result.failure_rate(), SCENARIO_FAILURE_RATE, 1e-12);
    assert_close(result.std(), SCENARIO_STD, 1e-12);
    insta::assert_snapshot!(result.notes()[0], @"Method I: model failure rate 0.071892, std 0.007189 (temperature factor 1.1759, electrical factor 0.6114 at stress 0.380)");
}

#[test]
fn test_scenario_is_reproducible() {
    let (a, ids_a) = scenario_engine(Method::MethodI);
    let (b, ids_b) = scenario_engine(Method::MethodI);
    let ra = a.calc_device(ids_a.devices[0]).unwrap();
    let rb = b.calc_device(ids_b.devices[0]).unwrap();
    assert_eq!(ra.failure_rate(), rb.failure_rate());
    assert_eq!(ra.std(), rb.std());
}

#[test]
fn test_no_method_is_configuration_error() {
    let mut engine = PredictionEngine::new(sample_registry());
    let ctx = engine.context_mut();
    let system = ctx.create_system();
    let unit = ctx.create_unit(system).unwrap();
    let device = ctx
        .create_device_with("capacitor.ceramic", unit, scenario_spec())
        .unwrap();

    let err = engine.calc_device(device).unwrap_err();
    assert!(matches!(err, PredictionError::MethodNotSet));
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[test]
fn test_sample_catalog_devices_calculate() {
    let mut engine = PredictionEngine::new(sample_registry());
    engine.set_method(Method::MethodI);
    let ctx = engine.context_mut();
    let system = ctx.create_system();
    let unit = ctx.create_unit(system).unwrap();

    let devices = [
        ("capacitor.tantalum", Specification::new().with("capacitance_uf", 47.0)),
        (
            "resistor.film",
            Specification::new().with("p_applied", 0.1).with("p_rated", 0.25),
        ),
        (
            "diode.signal",
            Specification::new().with("i_applied", 0.05).with("i_rated", 0.2),
        ),
        (
            "transistor.mosfet",
            Specification::new()
                .with("p_dissipated", 1.0)
                .with("p_rated", 2.0)
                .with("t_op", 85.0),
        ),
        ("integrated_circuit.digital", Specification::new().with("pins", 64.0)),
        ("other.connector", Specification::new()),
    ];
    for (category, spec) in devices {
        ctx.create_device_with(category, unit, spec).unwrap();
    }

    let ids = engine.context().unit(unit).unwrap().devices().to_vec();
    assert_eq!(ids.len(), 6);
    for id in &ids {
        let result = engine.calc_device(*id).unwrap();
        assert!(result.failure_rate() > 0.0, "{} gave {}", id, result.failure_rate());
        assert!(result.std() > 0.0);
    }

    let total = engine.calc_unit(unit).unwrap();
    let sum: f64 = ids
        .iter()
        .map(|d| engine.calc_device(*d).unwrap().failure_rate())
        .sum();
    assert_close(total.failure_rate(), sum, 1e-12);
}

#[test]
fn test_invalid_specification_rejected() {
    let mut engine = PredictionEngine::new(sample_registry());
    let ctx = engine.context_mut();
    let system = ctx.create_system();
    let unit = ctx.create_unit(system).unwrap();

    // Tantalum requires a capacitance
    let err = ctx.create_device("capacitor.tantalum", unit).unwrap_err();
    assert!(matches!(err, PredictionError::InvalidSpecification { .. }));

    // Resistor stress inputs are not capacitor inputs
    let err = ctx
        .create_device_with(
            "capacitor.ceramic",
            unit,
            Specification::new().with("p_rated", 1.0),
        )
        .unwrap_err();
    assert!(err.to_string().contains("capacitor.ceramic"), "{}", err);
}

// ============================================================================
// Methods II and III
// ============================================================================

#[test]
fn test_method_ii_lab_data() {
    let (mut engine, ids) = scenario_engine(Method::MethodII);
    let device = ids.devices[0];
    engine.context_mut().device_mut(device).unwrap().lab =
        Some(LabIntegrationRecord::new(1, 200, 3000.0, 0.7));

    let result = engine.calc_device(device).unwrap();
    let effective = 3000.0 * calc_temperature_factor(40.0, 70.0, 0.7);
    assert!(effective > 10_000.0);
    let a = 2.0 + 4e-5 * 200.0 * (effective + 30_000.0) * SCENARIO_FAILURE_RATE;
    assert_close(result.failure_rate(), SCENARIO_FAILURE_RATE * 3.0 / a, 1e-12);
    assert_close(result.std(), SCENARIO_STD * 3.0 / a, 1e-12);
    assert!(result.notes()[1].starts_with("Method II (no burn-in, effective time > 10000 h)"));
}

#[test]
fn test_method_iii_field_data() {
    let (mut engine, ids) = scenario_engine(Method::MethodIII);
    let device = ids.devices[0];
    engine.context_mut().device_mut(device).unwrap().field =
        Some(FieldIntegrationRecord::new(1e9, 3));

    let result = engine.calc_device(device).unwrap();
    let b = 2.0 / SCENARIO_FAILURE_RATE + 1e9 / 1e10;
    assert_close(result.failure_rate(), 5.0 / b, 1e-12);
    assert_close(result.std(), 5.0f64.sqrt() / b, 1e-12);
    insta::assert_snapshot!(result.notes()[1], @"Method III: 3 failures in 1000000000.0 h, b = 27.919531, failure rate 0.071892 -> 0.179086, std 0.007189 -> 0.080090");
}

#[test]
fn test_method_switch_between_calculations() {
    let (mut engine, ids) = scenario_engine(Method::MethodI);
    let device = ids.devices[0];
    engine.context_mut().device_mut(device).unwrap().field =
        Some(FieldIntegrationRecord::new(5e8, 0));

    let model = engine.calc_device(device).unwrap().failure_rate();
    engine.set_method(Method::MethodIII);
    let field = engine.calc_device(device).unwrap().failure_rate();
    assert_close(model, SCENARIO_FAILURE_RATE, 1e-12);
    assert!(field < model, "zero field failures should lower the rate");
}

// ============================================================================
// UCL
// ============================================================================

#[test]
fn test_ucl_monotone_in_confidence() {
    let (mut engine, ids) = scenario_engine(Method::MethodI);
    let device = ids.devices[0];
    let plain = engine.calc_device(device).unwrap().failure_rate();

    engine.set_applied_ucl(true);
    engine.set_confidence_level(0.95).unwrap();
    let at_95 = engine.calc_device(device).unwrap();
    engine.set_confidence_level(0.99).unwrap();
    let at_99 = engine.calc_device(device).unwrap();

    assert!(at_99.failure_rate() >= at_95.failure_rate());
    assert!(at_95.failure_rate() >= plain);
    assert_eq!(at_95.std(), SCENARIO_STD);
}

#[test]
fn test_ucl_monotone_for_wide_uncertainty() {
    let mut engine = PredictionEngine::new(fixed_registry());
    engine.set_method(Method::MethodI);
    let ctx = engine.context_mut();
    let system = ctx.create_system();
    let unit = ctx.create_unit(system).unwrap();
    let device = ctx.create_device("other.fixed", unit).unwrap();
    let plain = engine.calc_device(device).unwrap().failure_rate();

    engine.set_applied_ucl(true);
    let mut previous = plain;
    for level in [0.5, 0.8, 0.9, 0.95, 0.99, 0.999] {
        engine.set_confidence_level(level).unwrap();
        let rate = engine.calc_device(device).unwrap().failure_rate();
        assert!(rate >= previous, "{} < {} at {}", rate, previous, level);
        previous = rate;
    }
}

// ============================================================================
// Aggregation
// ============================================================================

#[test]
fn test_environment_factor_one_is_plain_sum() {
    let mut engine = PredictionEngine::new(sample_registry());
    engine.set_method(Method::MethodI);
    let ctx = engine.context_mut();
    let system = ctx.create_system();
    let unit = ctx.create_unit(system).unwrap();
    for t_op in [25.0, 55.0, 85.0] {
        ctx.create_device_with(
            "capacitor.ceramic",
            unit,
            scenario_spec().with("t_op", t_op),
        )
        .unwrap();
    }
    ctx.unit_mut(unit).unwrap().environment_factor = Some(1.0);

    let device_sum: f64 = engine
        .context()
        .unit(unit)
        .unwrap()
        .devices()
        .iter()
        .map(|d| engine.calc_device(*d).unwrap().failure_rate())
        .sum();
    let result = engine.calc_unit(unit).unwrap();
    assert_eq!(result.failure_rate(), device_sum);
}

#[test]
fn test_overall_without_ucl_is_sum_of_systems() {
    let mut engine = PredictionEngine::new(fixed_registry());
    engine.set_method(Method::MethodI);
    let ctx = engine.context_mut();
    let mut systems = Vec::new();
    for units in 1..=3 {
        let system = ctx.create_system();
        for _ in 0..units {
            let unit = ctx.create_unit(system).unwrap();
            ctx.create_device("other.fixed", unit).unwrap();
            ctx.create_device("other.fixed", unit).unwrap();
        }
        systems.push(system);
    }

    let sum: f64 = systems
        .iter()
        .map(|s| engine.calc_system(*s).unwrap().failure_rate())
        .sum();
    let overall = engine.calc().unwrap();
    assert_eq!(overall.failure_rate(), sum);
    assert_eq!(overall.failure_rate(), 24.0);
    assert_eq!(overall.notes().len(), 3);
}

#[test]
fn test_overall_ucl_uplift_is_separate() {
    let (mut engine, ids) = scenario_engine(Method::MethodI);
    engine.set_applied_ucl(true);
    engine.set_confidence_level(0.95).unwrap();

    let system = engine.calc_system(ids.system).unwrap();
    let overall = engine.calc().unwrap();
    assert_close(overall.failure_rate(), system.failure_rate() * 1.0095, 1e-12);
    assert!(overall.notes().last().unwrap().starts_with("aggregate UCL uplift"));
}

#[test]
fn test_engine_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("relpred.yaml");
    std::fs::write(
        &path,
        "method: method_i\napplied_ucl: false\nconfidence_level: 0.9\n",
    )
    .unwrap();

    let config = PredictionConfig::load(&path).unwrap();
    let mut engine = PredictionEngine::with_config(sample_registry(), config).unwrap();
    let ctx = engine.context_mut();
    let system = ctx.create_system();
    let unit = ctx.create_unit(system).unwrap();
    ctx.create_device_with("capacitor.ceramic", unit, scenario_spec())
        .unwrap();

    let overall = engine.calc().unwrap();
    assert_close(overall.failure_rate(), SCENARIO_FAILURE_RATE, 1e-12);
    let mtbf = overall.mtbf_hours().unwrap();
    assert_close(mtbf, 1e9 / SCENARIO_FAILURE_RATE, 1e-12);
}

#[test]
fn test_missing_config_file_is_input_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = PredictionConfig::load(&dir.path().join("absent.yaml")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Input);
}
