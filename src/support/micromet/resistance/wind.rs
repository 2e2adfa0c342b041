use std::f64::consts::PI;

use super::super::{ProfileError, VON_KARMAN, stability::psi_m};

/// Wind speed (m/s) at the top of the canopy.
///
/// Extrapolates the stability-corrected log profile defined by `u_star`
/// down to the canopy height `h_c`.
///
/// # Errors
///
/// Returns [`ProfileError::NonPhysicalWind`] if the profile yields a
/// negative or non-finite speed.
pub fn wind_at_canopy_top(
    u_star: f64,
    h_c: f64,
    d_0: f64,
    z_0m: f64,
    l: f64,
) -> Result<f64, ProfileError> {
    let z = h_c - d_0;
    let value = u_star / VON_KARMAN * ((z / z_0m).ln() - psi_m(z / l));
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ProfileError::NonPhysicalWind { value })
    }
}

/// Goudriaan (1977) in-canopy wind attenuation coefficient.
///
/// `lai_local` is the leaf area index within the vegetated fraction
/// (`LAI / f_c`). A canopy without leaves does not attenuate.
#[must_use]
pub fn goudriaan_attenuation(h_c: f64, lai_local: f64, leaf_width: f64) -> f64 {
    if lai_local <= 0.0 {
        return 0.0;
    }
    let leaf_half_width = leaf_width * 0.5;
    let mixing_length = 0.28 * (4.0 * leaf_half_width * h_c / (PI * lai_local)).sqrt();
    (0.2 * lai_local * h_c / mixing_length).sqrt()
}

/// Wind speed (m/s) at height `z` inside a canopy of height `h_c`.
#[must_use]
pub fn wind_in_canopy(u_c: f64, attenuation: f64, h_c: f64, z: f64) -> f64 {
    u_c * (-attenuation * (1.0 - z / h_c)).exp()
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn canopy_top_wind_is_positive_in_neutral_air() {
        let u_c = wind_at_canopy_top(0.3, 1.0, 0.65, 0.125, f64::INFINITY).unwrap();
        assert_relative_eq!(u_c, 0.3 / VON_KARMAN * 2.8f64.ln(), epsilon = 1e-12);
    }

    #[test]
    fn wind_decays_toward_the_ground() {
        let a = goudriaan_attenuation(1.0, 3.0, 0.1);
        assert!(a > 0.0);
        let top = wind_in_canopy(2.0, a, 1.0, 1.0);
        let mid = wind_in_canopy(2.0, a, 1.0, 0.5);
        let ground = wind_in_canopy(2.0, a, 1.0, 0.01);
        assert_relative_eq!(top, 2.0);
        assert!(top > mid && mid > ground && ground > 0.0);
    }

    #[test]
    fn leafless_canopy_does_not_attenuate() {
        assert_relative_eq!(goudriaan_attenuation(1.0, 0.0, 0.1), 0.0);
    }
}
