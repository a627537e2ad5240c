//! Unit entity - an ordered group of devices sharing one environment

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::entity::Entity;
use crate::core::identity::{EntityId, EntityPrefix};

/// A Unit entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Unit {
    /// Unique identifier
    pub id: EntityId,

    /// Display name (defaults to the id)
    pub name: String,

    /// Owning system
    system: EntityId,

    /// Devices in calculation order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    devices: Vec<EntityId>,

    /// Environment multiplier applied to the unit sum
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment_factor: Option<f64>,

    /// Creation timestamp
    pub created: DateTime<Utc>,
}

impl Entity for Unit {
    const PREFIX: EntityPrefix = EntityPrefix::Unit;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn label(&self) -> &str {
        &self.name
    }

    fn created(&self) -> DateTime<Utc> {
        self.created
    }
}

impl Unit {
    pub(crate) fn new(system: EntityId) -> Self {
        let id = EntityId::new(Self::PREFIX);
        Self {
            id,
            name: id.to_string(),
            system,
            devices: Vec::new(),
            environment_factor: None,
            created: Utc::now(),
        }
    }

    /// Owning system
    pub fn system(&self) -> EntityId {
        self.system
    }

    /// Device ids in insertion order
    pub fn devices(&self) -> &[EntityId] {
        &self.devices
    }

    pub(crate) fn push_device(&mut self, device: EntityId) {
        self.devices.push(device);
    }

    pub(crate) fn remove_device(&mut self, device: &EntityId) {
        self.devices.retain(|d| d != device);
    }
}
