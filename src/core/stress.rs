//! Stress factors - Arrhenius temperature and exponential electrical derating

/// Boltzmann constant in eV/K
pub const BOLTZMANN_EV_PER_K: f64 = 8.617e-5;

const CELSIUS_TO_KELVIN: f64 = 273.15;

/// Arrhenius temperature acceleration factor
///
/// `exp((Ea / k) · (1/T_ref − 1/T_op))` with temperatures in °C and the curve
/// constant `Ea` in eV. Equal temperatures give exactly 1.
pub fn calc_temperature_factor(t_ref: f64, t_op: f64, curve: f64) -> f64 {
    if t_ref == t_op {
        return 1.0;
    }
    let t_ref_k = t_ref + CELSIUS_TO_KELVIN;
    let t_op_k = t_op + CELSIUS_TO_KELVIN;
    ((curve / BOLTZMANN_EV_PER_K) * (1.0 / t_ref_k - 1.0 / t_op_k)).exp()
}

/// Exponential electrical stress factor
///
/// `exp(curve · (e_op − e_ref))`. A second curve constant characterizes an
/// independent stress axis and multiplies in its own factor.
pub fn calc_elec_stress_factor(e_ref: f64, e_op: f64, curve: f64, curve2: Option<f64>) -> f64 {
    let delta = e_op - e_ref;
    let primary = (curve * delta).exp();
    match curve2 {
        Some(curve2) => primary * (curve2 * delta).exp(),
        None => primary,
    }
}
