//! Prediction context - arena of devices, units and systems
//!
//! Entities live in id-keyed maps and are addressed by [`EntityId`] handles.
//! Parents keep ordered child lists so aggregation follows insertion order.
//! Device specifications are checked against their category schema whenever
//! they enter the context or change.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::catalog::{CategoryId, CategoryRegistry, Specification};
use crate::core::error::{PredictionError, Result};
use crate::core::identity::EntityId;
use crate::entities::{Device, System, Unit};

/// Owner of every device, unit and system in a prediction
#[derive(Debug)]
pub struct PredictionContext {
    registry: Arc<CategoryRegistry>,
    devices: HashMap<EntityId, Device>,
    units: HashMap<EntityId, Unit>,
    systems: HashMap<EntityId, System>,
    system_order: Vec<EntityId>,
}

impl PredictionContext {
    /// Create an empty context over a category registry
    pub fn new(registry: Arc<CategoryRegistry>) -> Self {
        Self {
            registry,
            devices: HashMap::new(),
            units: HashMap::new(),
            systems: HashMap::new(),
            system_order: Vec::new(),
        }
    }

    pub fn registry(&self) -> &CategoryRegistry {
        &self.registry
    }

    /// Create an empty system
    pub fn create_system(&mut self) -> EntityId {
        let system = System::new();
        let id = system.id;
        self.system_order.push(id);
        self.systems.insert(id, system);
        debug!(%id, "created system");
        id
    }

    /// Create an empty unit inside a system
    pub fn create_unit(&mut self, system_id: EntityId) -> Result<EntityId> {
        let system = self
            .systems
            .get_mut(&system_id)
            .ok_or(PredictionError::UnknownEntity {
                kind: "system",
                id: system_id,
            })?;
        let unit = Unit::new(system_id);
        let id = unit.id;
        system.push_unit(id);
        self.units.insert(id, unit);
        debug!(%id, system = %system_id, "created unit");
        Ok(id)
    }

    /// Create a device with the category's default specification
    pub fn create_device(
        &mut self,
        category: impl Into<CategoryId>,
        unit_id: EntityId,
    ) -> Result<EntityId> {
        self.add_device(unit_id, Device::new(category))
    }

    /// Create a device with an explicit specification (defaults fill the rest)
    pub fn create_device_with(
        &mut self,
        category: impl Into<CategoryId>,
        unit_id: EntityId,
        specification: Specification,
    ) -> Result<EntityId> {
        self.add_device(unit_id, Device::new(category).with_specification(specification))
    }

    /// Insert a caller-built device into a unit
    pub fn add_device(&mut self, unit_id: EntityId, mut device: Device) -> Result<EntityId> {
        if !self.units.contains_key(&unit_id) {
            return Err(PredictionError::UnknownEntity {
                kind: "unit",
                id: unit_id,
            });
        }
        if self.devices.contains_key(&device.id) {
            return Err(PredictionError::DuplicateId(device.id.to_string()));
        }

        let specification =
            self.checked_specification(device.category(), device.specification().clone())?;
        device.set_specification(specification);
        device.set_unit(unit_id);

        let id = device.id;
        if let Some(unit) = self.units.get_mut(&unit_id) {
            unit.push_device(id);
        }
        debug!(%id, unit = %unit_id, category = %device.category(), "added device");
        self.devices.insert(id, device);
        Ok(id)
    }

    /// Merge parameters into a device specification
    ///
    /// The merged specification is validated before anything changes; on error
    /// the device keeps its previous specification.
    pub fn set_parameters(&mut self, device_id: EntityId, parameters: Specification) -> Result<()> {
        let device = self.device(device_id).ok_or(PredictionError::UnknownEntity {
            kind: "device",
            id: device_id,
        })?;

        let mut merged = device.specification().clone();
        for (key, value) in parameters.iter() {
            merged.set(key, value);
        }
        let merged = self.checked_specification(device.category(), merged)?;

        if let Some(device) = self.devices.get_mut(&device_id) {
            device.set_specification(merged);
        }
        Ok(())
    }

    fn checked_specification(
        &self,
        category: &CategoryId,
        mut specification: Specification,
    ) -> Result<Specification> {
        let leaf = self.registry.leaf(category)?;
        leaf.schema.apply_defaults(&mut specification);
        leaf.schema
            .validate(&specification)
            .map_err(|violations| PredictionError::InvalidSpecification {
                category: category.clone(),
                violations,
            })?;
        Ok(specification)
    }

    /// Remove a device from its unit
    pub fn remove_device(&mut self, device_id: EntityId) -> Result<Device> {
        let device = self
            .devices
            .remove(&device_id)
            .ok_or(PredictionError::UnknownEntity {
                kind: "device",
                id: device_id,
            })?;
        if let Some(unit) = device.unit().and_then(|u| self.units.get_mut(&u)) {
            unit.remove_device(&device_id);
        }
        Ok(device)
    }

    /// Remove a unit and all of its devices
    pub fn remove_unit(&mut self, unit_id: EntityId) -> Result<Unit> {
        let unit = self
            .units
            .remove(&unit_id)
            .ok_or(PredictionError::UnknownEntity {
                kind: "unit",
                id: unit_id,
            })?;
        for device in unit.devices() {
            self.devices.remove(device);
        }
        if let Some(system) = self.systems.get_mut(&unit.system()) {
            system.remove_unit(&unit_id);
        }
        Ok(unit)
    }

    /// Remove a system with all of its units and devices
    pub fn remove_system(&mut self, system_id: EntityId) -> Result<System> {
        let system = self
            .systems
            .remove(&system_id)
            .ok_or(PredictionError::UnknownEntity {
                kind: "system",
                id: system_id,
            })?;
        for unit_id in system.units() {
            if let Some(unit) = self.units.remove(unit_id) {
                for device in unit.devices() {
                    self.devices.remove(device);
                }
            }
        }
        self.system_order.retain(|s| *s != system_id);
        Ok(system)
    }

    pub fn device(&self, id: EntityId) -> Option<&Device> {
        self.devices.get(&id)
    }

    pub fn device_mut(&mut self, id: EntityId) -> Option<&mut Device> {
        self.devices.get_mut(&id)
    }

    pub fn unit(&self, id: EntityId) -> Option<&Unit> {
        self.units.get(&id)
    }

    pub fn unit_mut(&mut self, id: EntityId) -> Option<&mut Unit> {
        self.units.get_mut(&id)
    }

    pub fn system(&self, id: EntityId) -> Option<&System> {
        self.systems.get(&id)
    }

    pub fn system_mut(&mut self, id: EntityId) -> Option<&mut System> {
        self.systems.get_mut(&id)
    }

    /// Systems in creation order
    pub fn systems(&self) -> impl Iterator<Item = &System> {
        self.system_order
            .iter()
            .filter_map(|id| self.systems.get(id))
    }

    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    pub fn unit_count(&self) -> usize {
        self.units.len()
    }

    pub fn system_count(&self) -> usize {
        self.systems.len()
    }
}
