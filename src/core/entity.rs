//! Entity trait - shared interface of devices, units and systems

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};

use crate::core::identity::{EntityId, EntityPrefix};

/// A node of the device/unit/system hierarchy
pub trait Entity: Serialize + DeserializeOwned {
    /// Prefix of every id of this entity type
    const PREFIX: EntityPrefix;

    fn id(&self) -> &EntityId;

    /// Human-readable label for notes and reports
    fn label(&self) -> &str;

    fn created(&self) -> DateTime<Utc>;

    /// Whether `id` can address an entity of this type
    fn accepts(id: &EntityId) -> bool {
        id.prefix() == Self::PREFIX
    }
}
