//! Moist air properties.

/// Gas constant for dry air (J/kg/K).
pub const GAS_CONSTANT_DRY_AIR: f64 = 287.04;

/// Ratio of the molecular weight of water vapour to dry air.
pub const EPSILON: f64 = 0.622;

/// Heat capacity of dry air at constant pressure (J/kg/K).
pub const CP_DRY_AIR: f64 = 1003.5;

/// Heat capacity of water vapour at constant pressure (J/kg/K).
pub const CP_WATER_VAPOR: f64 = 1865.0;

/// Density of moist air (kg/m³).
///
/// `p` and `ea` are in hPa, `t_air` in kelvin.
#[must_use]
pub fn air_density(p: f64, ea: f64, t_air: f64) -> f64 {
    (p * 100.0) / (GAS_CONSTANT_DRY_AIR * t_air) * (1.0 - (1.0 - EPSILON) * ea / p)
}

/// Heat capacity of moist air at constant pressure (J/kg/K).
///
/// Weighted by the specific humidity derived from `ea` and `p` (both hPa).
#[must_use]
pub fn heat_capacity(p: f64, ea: f64) -> f64 {
    let q = EPSILON * ea / (p + (EPSILON - 1.0) * ea);
    (1.0 - q) * CP_DRY_AIR + q * CP_WATER_VAPOR
}

/// Latent heat of vaporisation (J/kg) at air temperature `t_air` (K).
#[must_use]
pub fn latent_heat_of_vaporization(t_air: f64) -> f64 {
    1e6 * (2.501 - 2.361e-3 * (t_air - 273.15))
}

/// Slope of the saturation vapour pressure curve (hPa/K) at `t_air` (K).
#[must_use]
pub fn vapor_pressure_slope(t_air: f64) -> f64 {
    let t = t_air - 273.15;
    let e_sat = 0.6108 * (17.27 * t / (t + 237.3)).exp();
    // kPa/K to hPa/K
    10.0 * 4098.0 * e_sat / (t + 237.3).powi(2)
}

/// Psychrometric constant (hPa/K).
///
/// `p` in hPa, `c_p` in J/kg/K and `lambda` in J/kg.
#[must_use]
pub fn psychrometric_constant(p: f64, c_p: f64, lambda: f64) -> f64 {
    c_p * p / (EPSILON * lambda)
}

/// Fraction of available energy that a saturated surface converts to latent heat,
/// `s / (s + γ)`.
#[must_use]
pub fn equilibrium_evaporation_fraction(t_air: f64, p: f64, c_p: f64) -> f64 {
    let s = vapor_pressure_slope(t_air);
    let gamma = psychrometric_constant(p, c_p, latent_heat_of_vaporization(t_air));
    s / (s + gamma)
}
