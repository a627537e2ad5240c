//! Distribution library - gamma and normal distributions
//!
//! Special functions and distribution routines used for failure-rate uncertainty:
//! - Gamma function, log-gamma and the regularized lower incomplete gamma P(a, x)
//! - Gamma and chi-squared PDF/CDF/inverse CDF
//! - Error function, standard and general normal PDF/CDF/inverse CDF
//! - Normal-theory confidence intervals
//!
//! Every iterative routine carries a hard iteration cap and reports
//! [`DistributionError::Convergence`] instead of looping.

pub mod error;
pub mod gamma;
pub mod normal;

pub use error::{DistributionError, Result};
pub use gamma::{
    chi_squared_cdf, chi_squared_inverse_cdf, gamma, gamma_cdf, gamma_inverse_cdf, gamma_pdf,
    ln_gamma, regularized_gamma_p,
};
pub use normal::{
    confidence_interval, erf, erfc, normal_cdf, normal_inverse_cdf, normal_pdf, normal_quantile,
    standard_normal_cdf, standard_normal_inverse_cdf, standard_normal_pdf,
};
