//! Entity type definitions

pub mod device;
pub mod result;
pub mod system;
pub mod unit;

pub use device::{Device, FieldIntegrationRecord, LabIntegrationRecord};
pub use result::{PredictionResult, Target};
pub use system::System;
pub use unit::Unit;
