//! Catalog tests - sample catalog, YAML loading and custom models

mod common;

use std::sync::Arc;

use common::{assert_close, sample_registry};
use relpred::catalog::{
    CategoryId, CategoryRegistry, FailureRateModel, MainCategory, ModelError, ModelOutputs,
    Specification,
};
use relpred::core::{ErrorKind, Method, PredictionEngine, PredictionError};

// ============================================================================
// Sample Catalog
// ============================================================================

#[test]
fn test_sample_catalog_structure() {
    let registry = sample_registry();

    let roots: Vec<&str> = registry.roots().iter().map(|c| c.id.as_str()).collect();
    assert_eq!(
        roots,
        vec![
            "capacitor",
            "resistor",
            "diode",
            "transistor",
            "integrated_circuit",
            "other"
        ]
    );

    let children = registry.children(&CategoryId::from("capacitor")).unwrap();
    let names: Vec<&str> = children.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(names, vec!["capacitor.ceramic", "capacitor.tantalum"]);

    let leaf = registry.leaf(&CategoryId::from("transistor.mosfet")).unwrap();
    assert_eq!(leaf.main, MainCategory::Transistor);
    let outputs = leaf.model.evaluate(&Specification::new()).unwrap();
    assert_eq!(outputs.elec_curve2, Some(0.9));
}

#[test]
fn test_sample_catalog_composite_cannot_be_calculated() {
    let registry = sample_registry();
    let err = registry.leaf(&CategoryId::from("diode")).unwrap_err();
    assert!(matches!(err, PredictionError::NotALeaf(_)));
}

// ============================================================================
// Loading From Disk
// ============================================================================

#[test]
fn test_load_catalog_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.yaml");
    std::fs::write(
        &path,
        r#"
categories:
  - id: relay
    name: Relays
    children: [relay.signal]
  - id: relay.signal
    name: Signal relay
    main_category: other
    parameters:
      - name: cycles_per_hour
        min: 0
        default: 1
    model:
      base_rate:
        key: cycles_per_hour
        coefficient: 3.0
        exponent: 1.0
      base_std: 0.3
      temp_curve: 0.2
      elec_curve: 0.0
"#,
    )
    .unwrap();

    let registry = Arc::new(CategoryRegistry::load(&path).unwrap());
    let mut engine = PredictionEngine::new(registry);
    engine.set_method(Method::MethodI);
    let ctx = engine.context_mut();
    let system = ctx.create_system();
    let unit = ctx.create_unit(system).unwrap();
    let device = ctx
        .create_device_with(
            "relay.signal",
            unit,
            Specification::new().with("cycles_per_hour", 4.0),
        )
        .unwrap();

    let result = engine.calc_device(device).unwrap();
    assert_close(result.failure_rate(), 12.0, 1e-12);
}

#[test]
fn test_load_catalog_syntax_error_has_location() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.yaml");
    std::fs::write(&path, "categories:\n  - id: a\n    name: [unclosed\n").unwrap();

    let err = CategoryRegistry::load(&path).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Input);
    assert!(err.to_string().contains("broken.yaml"), "{}", err);
}

// ============================================================================
// Custom Models
// ============================================================================

/// A hand-written model that reads the base rate from the specification
#[derive(Debug)]
struct LookupModel;

impl FailureRateModel for LookupModel {
    fn evaluate(&self, spec: &Specification) -> Result<ModelOutputs, ModelError> {
        let rate = spec.require("rated_fit")?;
        Ok(ModelOutputs {
            base_rate: rate,
            base_std: rate / 10.0,
            temp_curve: 0.0,
            elec_curve: 0.0,
            elec_curve2: None,
        })
    }
}

#[test]
fn test_custom_model_missing_parameter() {
    let mut registry = CategoryRegistry::new();
    registry
        .register_leaf(
            "other.lookup",
            "Datasheet rate",
            MainCategory::Other,
            &[relpred::catalog::ParameterDef::optional("rated_fit").with_min(0.0)],
            LookupModel,
        )
        .unwrap();

    let mut engine = PredictionEngine::new(Arc::new(registry));
    engine.set_method(Method::MethodI);
    let ctx = engine.context_mut();
    let system = ctx.create_system();
    let unit = ctx.create_unit(system).unwrap();
    let with_rate = ctx
        .create_device_with(
            "other.lookup",
            unit,
            Specification::new().with("rated_fit", 7.5),
        )
        .unwrap();
    let without_rate = ctx.create_device("other.lookup", unit).unwrap();

    assert_close(
        engine.calc_device(with_rate).unwrap().failure_rate(),
        7.5,
        1e-12,
    );
    let err = engine.calc_device(without_rate).unwrap_err();
    assert!(
        matches!(err, PredictionError::MissingParameter { ref parameter, .. } if parameter == "rated_fit")
    );
    assert_eq!(err.kind(), ErrorKind::Configuration);

    // The unit fails as a whole rather than returning a partial sum
    assert!(engine.calc_unit(unit).is_err());
}
