//! Category catalog - the lookup table of component categories and their models

pub mod category;
pub mod model;
pub mod parameters;
pub mod registry;

pub use category::{Category, CategoryId, CategoryKind, LeafCategory, MainCategory};
pub use model::{FailureRateModel, Formula, ModelError, ModelOutputs, ParametricModel, Step};
pub use parameters::{
    standard_parameters, ParameterDef, ParameterSchema, Specification, DEFAULT_E_REF,
    DEFAULT_T_REF,
};
pub use registry::CategoryRegistry;
