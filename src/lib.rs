//! relpred: electronic component reliability prediction
//!
//! Computes failure rates (FIT) and their uncertainty for devices from a
//! category catalog, corrects them with laboratory or field data, and
//! aggregates bottom-up across a device, unit and system hierarchy.
//!
//! ```no_run
//! use std::sync::Arc;
//! use relpred::catalog::{CategoryRegistry, Specification};
//! use relpred::core::{Method, PredictionEngine};
//!
//! # fn main() -> relpred::core::Result<()> {
//! let mut engine = PredictionEngine::new(Arc::new(CategoryRegistry::sample()?));
//! engine.set_method(Method::MethodI);
//!
//! let ctx = engine.context_mut();
//! let system = ctx.create_system();
//! let unit = ctx.create_unit(system)?;
//! ctx.create_device_with(
//!     "capacitor.ceramic",
//!     unit,
//!     Specification::new().with("t_op", 70.0).with("v_dc", 3.3).with("v_rated", 10.0),
//! )?;
//!
//! let overall = engine.calc()?;
//! println!("{:.4} FIT", overall.failure_rate());
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod core;
pub mod entities;
pub mod stats;
pub mod yaml;
