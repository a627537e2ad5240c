//! Upper-confidence-limit correction
//!
//! Moment-matches `(λ, σ)` to a distribution and replaces λ with the one-sided
//! upper quantile at the configured confidence level. The gamma fit has
//! `kappa = (λ/σ)²` and `theta = σ²/λ`; once `kappa` reaches
//! [`NORMAL_SHAPE_THRESHOLD`] the gamma is close enough to normal that the
//! normal quantile is used instead. σ is never changed.

use tracing::debug;

use crate::core::error::Result;
use crate::stats::{gamma_inverse_cdf, normal_inverse_cdf};

/// Gamma shape at or above which the normal approximation is used
pub const NORMAL_SHAPE_THRESHOLD: f64 = 100.0;

/// Distribution chosen by the moment fit
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UclFit {
    Normal,
    Gamma { shape: f64, scale: f64 },
}

/// Corrected failure rate and its audit note
#[derive(Debug, Clone, PartialEq)]
pub struct UclCorrection {
    pub failure_rate: f64,
    pub fit: Option<UclFit>,
    pub note: String,
}

/// Moment-matched fit for a positive failure rate
pub fn fit(failure_rate: f64, std: f64) -> UclFit {
    let kappa = (failure_rate / std).powi(2);
    if kappa >= NORMAL_SHAPE_THRESHOLD {
        UclFit::Normal
    } else {
        UclFit::Gamma {
            shape: kappa,
            scale: std * std / failure_rate,
        }
    }
}

/// Replace λ with its upper confidence limit
pub fn apply_ucl(failure_rate: f64, std: f64, confidence_level: f64) -> Result<UclCorrection> {
    let percent = confidence_level * 100.0;

    if failure_rate <= 0.0 {
        return Ok(UclCorrection {
            failure_rate,
            fit: None,
            note: format!(
                "UCL {:.1}%: skipped, failure rate is zero so there is nothing to fit",
                percent
            ),
        });
    }

    let fit = fit(failure_rate, std);
    let corrected = match fit {
        UclFit::Normal => normal_inverse_cdf(confidence_level, failure_rate, std)?,
        UclFit::Gamma { shape, scale } => gamma_inverse_cdf(confidence_level, shape, scale)?,
    };

    let note = match fit {
        UclFit::Normal => format!(
            "UCL {:.1}% (normal fit): failure rate {:.6} -> {:.6}",
            percent, failure_rate, corrected
        ),
        UclFit::Gamma { shape, scale } => format!(
            "UCL {:.1}% (gamma fit, shape {:.4}, scale {:.6}): failure rate {:.6} -> {:.6}",
            percent, shape, scale, failure_rate, corrected
        ),
    };
    debug!(?fit, failure_rate, corrected, "applied UCL");

    Ok(UclCorrection {
        failure_rate: corrected,
        fit: Some(fit),
        note,
    })
}
