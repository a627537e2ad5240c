//! Device entity - one part instance with its specification and integration data

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::{CategoryId, Specification};
use crate::core::entity::Entity;
use crate::core::identity::{EntityId, EntityPrefix};

/// Laboratory test data used by Method II
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabIntegrationRecord {
    /// Failures observed during the test
    pub failures: u32,

    /// Devices on test (N)
    pub devices_on_test: u32,

    /// Test duration in hours
    pub actual_time_on_test: f64,

    /// Temperature curve constant (eV) used to accelerate test time
    pub lab_temperature_factor: f64,

    /// Quality multiplier of the tested population
    #[serde(default = "default_factor")]
    pub lab_quality_factor: f64,

    /// Burn-in duration in hours, if the devices were burned in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub burn_in_time: Option<f64>,
}

impl LabIntegrationRecord {
    /// A record without burn-in and with a unit quality factor
    pub fn new(
        failures: u32,
        devices_on_test: u32,
        actual_time_on_test: f64,
        lab_temperature_factor: f64,
    ) -> Self {
        Self {
            failures,
            devices_on_test,
            actual_time_on_test,
            lab_temperature_factor,
            lab_quality_factor: 1.0,
            burn_in_time: None,
        }
    }

    pub fn with_quality_factor(mut self, factor: f64) -> Self {
        self.lab_quality_factor = factor;
        self
    }

    pub fn with_burn_in(mut self, hours: f64) -> Self {
        self.burn_in_time = Some(hours);
        self
    }
}

/// Field operating data used by Method III
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldIntegrationRecord {
    /// Accumulated operating hours across the field population
    pub total_operating_hours: f64,

    /// Failures observed in the field
    pub failures: u32,

    /// Environment multiplier of the field population
    #[serde(default = "default_factor")]
    pub environment_factor: f64,

    /// Adjustment multiplier applied to the operating hours
    #[serde(default = "default_factor")]
    pub adjustment_factor: f64,
}

impl FieldIntegrationRecord {
    /// A record with unit environment and adjustment factors
    pub fn new(total_operating_hours: f64, failures: u32) -> Self {
        Self {
            total_operating_hours,
            failures,
            environment_factor: 1.0,
            adjustment_factor: 1.0,
        }
    }

    pub fn with_environment_factor(mut self, factor: f64) -> Self {
        self.environment_factor = factor;
        self
    }

    pub fn with_adjustment_factor(mut self, factor: f64) -> Self {
        self.adjustment_factor = factor;
        self
    }
}

fn default_factor() -> f64 {
    1.0
}

/// A Device entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    /// Unique identifier
    pub id: EntityId,

    /// Leaf category; fixed once created so the specification stays valid for it
    category: CategoryId,

    /// Display alias
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,

    /// Validated against the category schema; changed through the context
    specification: Specification,

    /// Owning unit, set when the device is added to a context
    #[serde(default, skip_serializing_if = "Option::is_none")]
    unit: Option<EntityId>,

    /// Laboratory test data (Method II)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lab: Option<LabIntegrationRecord>,

    /// Field data (Method III)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<FieldIntegrationRecord>,

    /// Creation timestamp
    pub created: DateTime<Utc>,
}

impl Entity for Device {
    const PREFIX: EntityPrefix = EntityPrefix::Dev;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn label(&self) -> &str {
        self.alias.as_deref().unwrap_or(self.category.as_str())
    }

    fn created(&self) -> DateTime<Utc> {
        self.created
    }
}

impl Device {
    /// Create a device with an empty specification
    pub fn new(category: impl Into<CategoryId>) -> Self {
        Self {
            id: EntityId::new(Self::PREFIX),
            category: category.into(),
            alias: None,
            specification: Specification::new(),
            unit: None,
            lab: None,
            field: None,
            created: Utc::now(),
        }
    }

    /// Builder-style specification; checked when the device joins a context
    pub fn with_specification(mut self, specification: Specification) -> Self {
        self.specification = specification;
        self
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_lab(mut self, record: LabIntegrationRecord) -> Self {
        self.lab = Some(record);
        self
    }

    pub fn with_field(mut self, record: FieldIntegrationRecord) -> Self {
        self.field = Some(record);
        self
    }

    /// Leaf category this device is calculated with
    pub fn category(&self) -> &CategoryId {
        &self.category
    }

    /// Current specification
    pub fn specification(&self) -> &Specification {
        &self.specification
    }

    /// Owning unit
    pub fn unit(&self) -> Option<EntityId> {
        self.unit
    }

    pub(crate) fn set_specification(&mut self, specification: Specification) {
        self.specification = specification;
    }

    pub(crate) fn set_unit(&mut self, unit: EntityId) {
        self.unit = Some(unit);
    }
}
