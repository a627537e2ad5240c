//! Prediction errors
//!
//! Every failure surfaces immediately; a calculation either completes or returns
//! one of these. [`PredictionError::kind`] groups variants into the domain,
//! convergence, configuration and reference families.

use miette::Diagnostic;
use thiserror::Error;

use crate::catalog::CategoryId;
use crate::core::identity::EntityId;
use crate::stats::DistributionError;
use crate::yaml::YamlError;

/// Error family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Math evaluated outside its valid domain
    Domain,
    /// Iterative routine exceeded its cap
    Convergence,
    /// Engine, catalog or specification misconfigured
    Configuration,
    /// Referenced entity does not exist
    Reference,
    /// Input could not be read or parsed
    Input,
}

/// Errors that can occur while building or evaluating a prediction
#[derive(Debug, Error, Diagnostic)]
pub enum PredictionError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Distribution(#[from] DistributionError),

    #[error("{operation}: {message}")]
    #[diagnostic(code(relpred::domain))]
    Domain {
        operation: &'static str,
        message: String,
    },

    #[error("No prediction method configured")]
    #[diagnostic(
        code(relpred::config::method_not_set),
        help("call set_method(Method::MethodI | MethodII | MethodIII) before calculating")
    )]
    MethodNotSet,

    #[error("Category {category} does not define formula '{formula}'")]
    #[diagnostic(code(relpred::config::missing_formula))]
    MissingFormula {
        category: CategoryId,
        formula: &'static str,
    },

    #[error("Category {category} needs parameter '{parameter}'")]
    #[diagnostic(code(relpred::config::missing_parameter))]
    MissingParameter {
        category: CategoryId,
        parameter: String,
    },

    #[error("Category {category} has unrecognized main category '{value}'")]
    #[diagnostic(code(relpred::config::main_category))]
    UnknownMainCategory { category: CategoryId, value: String },

    #[error("Unknown category: {0}")]
    #[diagnostic(code(relpred::config::unknown_category))]
    UnknownCategory(CategoryId),

    #[error("Category {0} is a composite and cannot be calculated")]
    #[diagnostic(
        code(relpred::config::not_a_leaf),
        help("devices must reference a leaf category")
    )]
    NotALeaf(CategoryId),

    #[error("Duplicate id: {0}")]
    #[diagnostic(code(relpred::config::duplicate_id))]
    DuplicateId(String),

    #[error("Invalid specification for category {category}: {}", .violations.join("; "))]
    #[diagnostic(code(relpred::config::specification))]
    InvalidSpecification {
        category: CategoryId,
        violations: Vec<String>,
    },

    #[error("Invalid configuration: {0}")]
    #[diagnostic(code(relpred::config::invalid))]
    InvalidConfig(String),

    #[error("Invalid catalog: {0}")]
    #[diagnostic(code(relpred::catalog::invalid))]
    InvalidCatalog(String),

    #[error("{kind} not found: {id}")]
    #[diagnostic(code(relpred::reference))]
    UnknownEntity { kind: &'static str, id: EntityId },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Yaml(#[from] YamlError),
}

impl PredictionError {
    /// The error family this variant belongs to
    pub fn kind(&self) -> ErrorKind {
        match self {
            PredictionError::Distribution(DistributionError::Domain { .. })
            | PredictionError::Domain { .. } => ErrorKind::Domain,
            PredictionError::Distribution(DistributionError::Convergence { .. }) => {
                ErrorKind::Convergence
            }
            PredictionError::MethodNotSet
            | PredictionError::MissingFormula { .. }
            | PredictionError::MissingParameter { .. }
            | PredictionError::UnknownMainCategory { .. }
            | PredictionError::UnknownCategory(_)
            | PredictionError::NotALeaf(_)
            | PredictionError::DuplicateId(_)
            | PredictionError::InvalidSpecification { .. }
            | PredictionError::InvalidConfig(_)
            | PredictionError::InvalidCatalog(_) => ErrorKind::Configuration,
            PredictionError::UnknownEntity { .. } => ErrorKind::Reference,
            PredictionError::Yaml(_) => ErrorKind::Input,
        }
    }

    pub(crate) fn domain(operation: &'static str, message: impl Into<String>) -> Self {
        PredictionError::Domain {
            operation,
            message: message.into(),
        }
    }
}

/// Result alias for prediction operations
pub type Result<T> = std::result::Result<T, PredictionError>;
