//! Errors raised by the distribution library

use miette::Diagnostic;
use thiserror::Error;

/// Errors that can occur while evaluating a distribution function
#[derive(Debug, Clone, PartialEq, Error, Diagnostic)]
pub enum DistributionError {
    /// Function evaluated outside its valid domain
    #[error("{function}: {message}")]
    #[diagnostic(code(relpred::stats::domain))]
    Domain {
        function: &'static str,
        message: String,
    },

    /// Iterative routine exceeded its iteration cap
    #[error("{routine} did not converge within {iterations} iterations")]
    #[diagnostic(
        code(relpred::stats::convergence),
        help("the inputs are likely far in a distribution tail")
    )]
    Convergence {
        routine: &'static str,
        iterations: usize,
    },
}

impl DistributionError {
    pub(crate) fn domain(function: &'static str, message: impl Into<String>) -> Self {
        DistributionError::Domain {
            function,
            message: message.into(),
        }
    }

    pub(crate) fn convergence(routine: &'static str, iterations: usize) -> Self {
        DistributionError::Convergence {
            routine,
            iterations,
        }
    }

    /// True for domain violations
    pub fn is_domain(&self) -> bool {
        matches!(self, DistributionError::Domain { .. })
    }

    /// True when an iteration cap was hit
    pub fn is_convergence(&self) -> bool {
        matches!(self, DistributionError::Convergence { .. })
    }
}

/// Result alias for distribution functions
pub type Result<T> = std::result::Result<T, DistributionError>;
