//! System entity - an ordered group of units

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::entity::Entity;
use crate::core::identity::{EntityId, EntityPrefix};

/// A System entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct System {
    /// Unique identifier
    pub id: EntityId,

    /// Display name (defaults to the id)
    pub name: String,

    /// Units in calculation order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    units: Vec<EntityId>,

    /// Creation timestamp
    pub created: DateTime<Utc>,
}

impl Entity for System {
    const PREFIX: EntityPrefix = EntityPrefix::Sys;

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

impl System {
    pub(crate) fn new() -> Self {
        let id = EntityId::new(Self::PREFIX);
        Self {
            id,
            name: id.to_string(),
            units: Vec::new(),
            created: Utc::now(),
        }
    }

    /// Unit ids in insertion order
    pub fn units(&self) -> &[EntityId] {
        &self.units
    }

    pub(crate) fn push_unit(&mut self, unit: EntityId) {
        self.units.push(unit);
    }

    pub(crate) fn remove_unit(&mut self, unit: &EntityId) {
        self.units.retain(|u| u != unit);
    }
}
