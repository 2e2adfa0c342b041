//! Longwave exchange and the directional mixing of soil and canopy emission.

use super::STEFAN_BOLTZMANN;

/// Longwave extinction coefficient of the canopy (Kustas and Norman, 1999).
const LONGWAVE_EXTINCTION: f64 = 0.95;

/// Blackbody emittance σT⁴ (W/m²) of a surface at `t` (K).
#[must_use]
pub fn emittance(t: f64) -> f64 {
    STEFAN_BOLTZMANN * t.powi(4)
}

/// Net longwave radiation (W/m²) of a bare surface.
#[must_use]
pub fn bare_soil_net_longwave(l_dn: f64, t_surface: f64, emis: f64) -> f64 {
    emis * (l_dn - emittance(t_surface))
}

/// Net longwave radiation split between canopy and soil.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LongwavePartition {
    /// Net longwave absorbed by the canopy (W/m²).
    pub canopy: f64,
    /// Net longwave absorbed by the soil (W/m²).
    pub soil: f64,
}

/// Two-source net longwave (Kustas and Norman, 1999).
///
/// The canopy transmits a fraction `exp(-0.95·LAI)` of the sky and soil
/// emission. `lai` is the pixel-averaged leaf area index.
#[must_use]
pub fn two_source_net_longwave(
    l_dn: f64,
    t_c: f64,
    t_s: f64,
    lai: f64,
    emis_c: f64,
    emis_s: f64,
) -> LongwavePartition {
    let l_c = emis_c * emittance(t_c);
    let l_s = emis_s * emittance(t_s);
    let tau = (-LONGWAVE_EXTINCTION * lai).exp();
    LongwavePartition {
        canopy: (1.0 - tau) * (l_dn + l_s - 2.0 * l_c),
        soil: tau * l_dn + (1.0 - tau) * l_c - l_s,
    }
}

/// Beam extinction coefficient for an ellipsoidal leaf angle distribution
/// (Campbell and Norman, 1998).
///
/// `theta` is the zenith angle (degrees) and `x_lad` the ratio of horizontal
/// to vertical leaf projection (1 for spherical).
#[must_use]
pub fn campbell_beam_extinction(theta: f64, x_lad: f64) -> f64 {
    let tan = theta.to_radians().tan();
    (x_lad * x_lad + tan * tan).sqrt() / (x_lad + 1.774 * (x_lad + 1.182).powf(-0.733))
}

/// Clumping index at view zenith `theta` (degrees), from the nadir index
/// `omega0` and the canopy width-to-height ratio `w_c` (Kustas and Norman, 1999).
#[must_use]
pub fn view_clumping(omega0: f64, theta: f64, w_c: f64) -> f64 {
    let height_to_width = 1.0 / w_c;
    let p = 3.80 - 0.46 * height_to_width;
    omega0 / (omega0 + (1.0 - omega0) * (-2.2 * theta.to_radians().powf(p)).exp())
}

/// Fraction of the sensor's view filled by vegetation.
///
/// `lai_local` is the leaf area index within the vegetated fraction.
#[must_use]
pub fn view_vegetation_fraction(
    lai_local: f64,
    theta: f64,
    w_c: f64,
    omega0: f64,
    x_lad: f64,
) -> f64 {
    let clumping = view_clumping(omega0, theta, w_c);
    1.0 - (-campbell_beam_extinction(theta, x_lad) * clumping * lai_local).exp()
}

/// Soil temperature (K) that, mixed with canopy temperature `t_c` in the
/// proportion `f_theta`, reproduces the radiometric temperature `t_r`.
///
/// Returns `None` when no physical soil temperature exists: the canopy fills
/// the view or the remaining soil radiance would be negative.
#[must_use]
pub fn soil_temperature_from_composite(t_r: f64, t_c: f64, f_theta: f64) -> Option<f64> {
    if f_theta.is_nan() || f_theta >= 1.0 {
        return None;
    }
    let radiance = (t_r.powi(4) - f_theta * t_c.powi(4)) / (1.0 - f_theta);
    (radiance > 0.0).then(|| radiance.powf(0.25))
}
