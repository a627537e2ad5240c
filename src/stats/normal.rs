//! Normal distribution - error function, CDF, PDF and quantiles

use std::f64::consts::{PI, SQRT_2};

use super::error::{DistributionError, Result};

// Abramowitz & Stegun 7.1.26 (max absolute error 1.5e-7)
const ERF_P: f64 = 0.3275911;
const ERF_A1: f64 = 0.254829592;
const ERF_A2: f64 = -0.284496736;
const ERF_A3: f64 = 1.421413741;
const ERF_A4: f64 = -1.453152027;
const ERF_A5: f64 = 1.061405429;

// Rational approximation of the standard normal quantile, central region
const CENTRAL_NUM: [f64; 6] = [
    -3.969683028665376e+01,
    2.209460984245205e+02,
    -2.759285104469687e+02,
    1.383577518672690e+02,
    -3.066479806614716e+01,
    2.506628277459239e+00,
];
const CENTRAL_DEN: [f64; 5] = [
    -5.447609879822406e+01,
    1.615858368580409e+02,
    -1.556989798598866e+02,
    6.680131188771972e+01,
    -1.328068155288572e+01,
];

// Tail regions
const TAIL_NUM: [f64; 6] = [
    -7.784894002430293e-03,
    -3.223964580411365e-01,
    -2.400758277161838e+00,
    -2.549732539343734e+00,
    4.374664141464968e+00,
    2.938163982698783e+00,
];
const TAIL_DEN: [f64; 4] = [
    7.784695709041462e-03,
    3.224671290700398e-01,
    2.445134137142996e+00,
    3.754408661907416e+00,
];

/// Break-point between the lower tail and central regions (≈ -2σ)
const P_LOW: f64 = 0.02425;
const P_HIGH: f64 = 1.0 - P_LOW;

/// Error function erf(x)
///
/// Abramowitz-Stegun rational approximation, odd-symmetric in x.
pub fn erf(x: f64) -> f64 {
    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();

    let t = 1.0 / (1.0 + ERF_P * x);
    let poly = ((((ERF_A5 * t + ERF_A4) * t + ERF_A3) * t + ERF_A2) * t + ERF_A1) * t;
    let y = 1.0 - poly * (-x * x).exp();

    sign * y
}

/// Complementary error function erfc(x) = 1 - erf(x)
pub fn erfc(x: f64) -> f64 {
    1.0 - erf(x)
}

/// Standard normal cumulative distribution Φ(x) = ½(1 + erf(x/√2))
pub fn standard_normal_cdf(x: f64) -> f64 {
    0.5 * (1.0 + erf(x / SQRT_2))
}

/// Standard normal density φ(x)
pub fn standard_normal_pdf(x: f64) -> f64 {
    (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
}

/// Standard normal quantile Φ⁻¹(p)
///
/// Three-region rational approximation (lower tail below 0.02425, central,
/// upper tail above 0.97575) followed by exactly one Halley step against
/// [`erfc`] to sharpen the estimate.
///
/// # Errors
/// [`DistributionError::Domain`] unless `0 < p < 1`.
pub fn standard_normal_inverse_cdf(p: f64) -> Result<f64> {
    if !(p > 0.0 && p < 1.0) {
        return Err(DistributionError::domain(
            "standard_normal_inverse_cdf",
            format!("probability must lie in (0, 1), got {}", p),
        ));
    }

    let x = rational_quantile(p);

    // Halley refinement
    let e = 0.5 * erfc(-x / SQRT_2) - p;
    let u = e * (2.0 * PI).sqrt() * (x * x / 2.0).exp();
    let refined = x - u / (1.0 + x * u / 2.0);

    Ok(if refined.is_finite() { refined } else { x })
}

fn rational_quantile(p: f64) -> f64 {
    let [a0, a1, a2, a3, a4, a5] = CENTRAL_NUM;
    let [b0, b1, b2, b3, b4] = CENTRAL_DEN;
    let [c0, c1, c2, c3, c4, c5] = TAIL_NUM;
    let [d0, d1, d2, d3] = TAIL_DEN;

    if p < P_LOW {
        let q = (-2.0 * p.ln()).sqrt();
        (((((c0 * q + c1) * q + c2) * q + c3) * q + c4) * q + c5)
            / ((((d0 * q + d1) * q + d2) * q + d3) * q + 1.0)
    } else if p <= P_HIGH {
        let q = p - 0.5;
        let r = q * q;
        (((((a0 * r + a1) * r + a2) * r + a3) * r + a4) * r + a5) * q
            / (((((b0 * r + b1) * r + b2) * r + b3) * r + b4) * r + 1.0)
    } else {
        let q = (-2.0 * (1.0 - p).ln()).sqrt();
        -(((((c0 * q + c1) * q + c2) * q + c3) * q + c4) * q + c5)
            / ((((d0 * q + d1) * q + d2) * q + d3) * q + 1.0)
    }
}

/// Normal CDF with the given mean and standard deviation
pub fn normal_cdf(x: f64, mean: f64, std: f64) -> Result<f64> {
    check_std("normal_cdf", std)?;
    Ok(standard_normal_cdf((x - mean) / std))
}

/// Normal density with the given mean and standard deviation
pub fn normal_pdf(x: f64, mean: f64, std: f64) -> Result<f64> {
    check_std("normal_pdf", std)?;
    Ok(standard_normal_pdf((x - mean) / std) / std)
}

/// Normal quantile: `mean + std·Φ⁻¹(p)`
///
/// A zero standard deviation is accepted and yields `mean` (degenerate distribution).
pub fn normal_inverse_cdf(p: f64, mean: f64, std: f64) -> Result<f64> {
    if !(std >= 0.0) || !std.is_finite() {
        return Err(DistributionError::domain(
            "normal_inverse_cdf",
            format!("standard deviation must be non-negative, got {}", std),
        ));
    }
    let z = standard_normal_inverse_cdf(p)?;
    Ok(mean + std * z)
}

/// Alias of [`normal_inverse_cdf`]
pub fn normal_quantile(p: f64, mean: f64, std: f64) -> Result<f64> {
    normal_inverse_cdf(p, mean, std)
}

/// Two-sided normal-theory confidence interval around `mean`
///
/// `z = Φ⁻¹(1 - (1 - confidence_level)/2)`; the standard error is `std/√n` when a
/// sample size is given, else `std`. Returns `(lower, upper)`.
pub fn confidence_interval(
    mean: f64,
    std: f64,
    confidence_level: f64,
    sample_size: Option<u32>,
) -> Result<(f64, f64)> {
    let z = standard_normal_inverse_cdf(1.0 - (1.0 - confidence_level) / 2.0)?;
    let se = match sample_size {
        Some(0) => {
            return Err(DistributionError::domain(
                "confidence_interval",
                "sample size must be at least 1",
            ))
        }
        Some(n) => std / f64::from(n).sqrt(),
        None => std,
    };
    Ok((mean - z * se, mean + z * se))
}

fn check_std(function: &'static str, std: f64) -> Result<()> {
    if std > 0.0 && std.is_finite() {
        Ok(())
    } else {
        Err(DistributionError::domain(
            function,
            format!("standard deviation must be positive, got {}", std),
        ))
    }
}
