//! Device specifications and per-category parameter schemas
//!
//! A [`Specification`] is the named-parameter map a device carries. Each leaf
//! category publishes a [`ParameterSchema`]: the standard operating parameters,
//! the stress inputs of its main category, and its own keys. Schemas compile to
//! JSON Schema and are checked with `jsonschema`, so unknown keys, missing required
//! keys and out-of-range values are rejected instead of silently defaulted.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::catalog::category::MainCategory;
use crate::catalog::model::ModelError;

/// Reference temperature (°C) when a device does not set one
pub const DEFAULT_T_REF: f64 = 40.0;
/// Reference electrical stress ratio when a device does not set one
pub const DEFAULT_E_REF: f64 = 0.5;

/// Named numeric parameters describing one device
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Specification {
    values: BTreeMap<String, f64>,
}

impl Specification {
    /// Create an empty specification
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: f64) -> Self {
        self.values.insert(key.into(), value);
        self
    }

    /// Look up a parameter
    pub fn get(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }

    /// Look up a parameter that must be present
    pub fn require(&self, key: &str) -> Result<f64, ModelError> {
        self.get(key)
            .ok_or_else(|| ModelError::MissingParameter(key.to_string()))
    }

    /// Set a parameter, returning the previous value
    pub fn set(&mut self, key: impl Into<String>, value: f64) -> Option<f64> {
        self.values.insert(key.into(), value)
    }

    /// Remove a parameter
    pub fn remove(&mut self, key: &str) -> Option<f64> {
        self.values.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate parameters in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// JSON view used for schema validation (non-finite values become null)
    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .values
            .iter()
            .map(|(k, v)| {
                let value = serde_json::Number::from_f64(*v)
                    .map(Value::Number)
                    .unwrap_or(Value::Null);
                (k.clone(), value)
            })
            .collect();
        Value::Object(map)
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for Specification {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Declaration of one specification parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDef {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Lower bound (inclusive unless `exclusive_min`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub exclusive_min: bool,

    /// Upper bound (inclusive)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,

    /// Value filled in at device construction when the key is absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<f64>,

    /// Must be present after defaults are applied
    #[serde(default)]
    pub required: bool,
}

impl ParameterDef {
    /// An optional parameter with no bounds
    pub fn optional(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            min: None,
            exclusive_min: false,
            max: None,
            default: None,
            required: false,
        }
    }

    /// A required parameter with no bounds
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            required: true,
            ..Self::optional(name)
        }
    }

    pub fn with_min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn with_exclusive_min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self.exclusive_min = true;
        self
    }

    pub fn with_max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn with_default(mut self, default: f64) -> Self {
        self.default = Some(default);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    fn to_json_schema(&self) -> Value {
        let mut property = Map::new();
        property.insert("type".to_string(), json!("number"));
        if let Some(min) = self.min {
            let keyword = if self.exclusive_min {
                "exclusiveMinimum"
            } else {
                "minimum"
            };
            property.insert(keyword.to_string(), json!(min));
        }
        if let Some(max) = self.max {
            property.insert("maximum".to_string(), json!(max));
        }
        if let Some(description) = &self.description {
            property.insert("description".to_string(), json!(description));
        }
        Value::Object(property)
    }
}

/// Parameters every leaf category accepts
pub fn standard_parameters() -> Vec<ParameterDef> {
    vec![
        ParameterDef::required("t_ref")
            .with_exclusive_min(-273.15)
            .with_default(DEFAULT_T_REF)
            .with_description("Reference temperature (°C)"),
        ParameterDef::required("t_op")
            .with_exclusive_min(-273.15)
            .with_default(DEFAULT_T_REF)
            .with_description("Operating temperature (°C)"),
        ParameterDef::required("e_ref")
            .with_min(0.0)
            .with_default(DEFAULT_E_REF)
            .with_description("Reference electrical stress ratio"),
        ParameterDef::required("quality_factor")
            .with_exclusive_min(0.0)
            .with_default(1.0)
            .with_description("Quality multiplier"),
        ParameterDef::required("quantity")
            .with_min(0.0)
            .with_default(1.0)
            .with_description("Number of identical parts"),
    ]
}

/// Validation schema for one leaf category
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterSchema {
    pub parameters: Vec<ParameterDef>,
}

impl ParameterSchema {
    /// Standard parameters, then main-category stress inputs, then the leaf's own
    /// parameters. Later declarations replace earlier ones with the same name.
    pub fn for_leaf(main: MainCategory, own: &[ParameterDef]) -> Self {
        let mut parameters: Vec<ParameterDef> = Vec::new();
        let stress = main
            .stress_parameters()
            .iter()
            .map(|name| ParameterDef::optional(*name).with_min(0.0));

        for def in standard_parameters()
            .into_iter()
            .chain(stress)
            .chain(own.iter().cloned())
        {
            match parameters.iter_mut().find(|p| p.name == def.name) {
                Some(existing) => *existing = def,
                None => parameters.push(def),
            }
        }

        Self { parameters }
    }

    /// Look up a declared parameter
    pub fn get(&self, name: &str) -> Option<&ParameterDef> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Fill in declared defaults for absent keys
    pub fn apply_defaults(&self, spec: &mut Specification) {
        for def in &self.parameters {
            if let Some(default) = def.default {
                if !spec.contains(&def.name) {
                    spec.set(def.name.clone(), default);
                }
            }
        }
    }

    /// JSON Schema document for this parameter set
    pub fn to_json_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .parameters
            .iter()
            .map(|p| (p.name.clone(), p.to_json_schema()))
            .collect();
        let required: Vec<&str> = self
            .parameters
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name.as_str())
            .collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
            "additionalProperties": false,
        })
    }

    /// Validate a specification, returning every violation found
    pub fn validate(&self, spec: &Specification) -> Result<(), Vec<String>> {
        let schema = self.to_json_schema();
        let validator = jsonschema::validator_for(&schema)
            .map_err(|e| vec![format!("invalid parameter schema: {}", e)])?;

        let instance = spec.to_json();
        let violations: Vec<String> = validator
            .iter_errors(&instance)
            .map(|e| e.to_string())
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}
