//! Monin-Obukhov similarity.
//!
//! Integrated stability corrections for momentum and heat, the friction
//! velocity from a stability-corrected log wind profile, and the Obukhov
//! length from the surface buoyancy flux.
//!
//! Neutral stratification is represented by an infinite Obukhov length, for
//! which every correction evaluates to zero.

mod richardson;

pub use richardson::{bulk_richardson, obukhov_length_from_richardson};

use super::{GRAVITY, ProfileError, VON_KARMAN, air::latent_heat_of_vaporization};

/// Integrated stability correction for momentum, `Ψ_M(ζ)` with `ζ = z / L`.
///
/// Stable conditions follow Beljaars and Holtslag (1991) style saturation,
/// unstable conditions follow Brutsaert (1992).
#[must_use]
pub fn psi_m(zeta: f64) -> f64 {
    if zeta >= 0.0 {
        const A: f64 = 6.1;
        const B: f64 = 2.5;
        -A * (zeta + (1.0 + zeta.powf(B)).powf(1.0 / B)).ln()
    } else {
        psi_m_unstable(-zeta)
    }
}

/// Integrated stability correction for heat, `Ψ_H(ζ)` with `ζ = z / L`.
#[must_use]
pub fn psi_h(zeta: f64) -> f64 {
    if zeta >= 0.0 {
        const C: f64 = 5.3;
        const D: f64 = 1.1;
        -C * (zeta + (1.0 + zeta.powf(D)).powf(1.0 / D)).ln()
    } else {
        const C: f64 = 0.33;
        const D: f64 = 0.057;
        const N: f64 = 0.78;
        let y = -zeta;
        ((1.0 - D) / N) * ((C + y.powf(N)) / C).ln()
    }
}

fn psi_m_unstable(y: f64) -> f64 {
    const A: f64 = 0.33;
    const B: f64 = 0.41;
    let a_third = A.cbrt();
    let psi_0 = -A.ln() + 3f64.sqrt() * B * a_third * std::f64::consts::PI / 6.0;
    // The correction is held constant beyond y = b⁻³.
    let y = y.min(B.powi(-3));
    let x = (y / A).cbrt();
    (A + y).ln() - 3.0 * B * y.cbrt()
        + B * a_third / 2.0 * ((1.0 + x).powi(2) / (1.0 - x + x * x)).ln()
        + 3f64.sqrt() * B * a_third * ((2.0 * x - 1.0) / 3f64.sqrt()).atan()
        + psi_0
}

/// Stability-corrected log-profile term for momentum between `z_0m` and `z_u`.
///
/// Returns `ln((z_u - d_0) / z_0m) - Ψ_M((z_u - d_0) / L) + Ψ_M(z_0m / L)`.
///
/// # Errors
///
/// Returns [`ProfileError::DegenerateProfile`] if the term is non-positive or
/// not finite.
pub fn momentum_profile(z_u: f64, d_0: f64, z_0m: f64, l: f64) -> Result<f64, ProfileError> {
    let z = z_u - d_0;
    let value = (z / z_0m).ln() - psi_m(z / l) + psi_m(z_0m / l);
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ProfileError::DegenerateProfile { value })
    }
}

/// Stability-corrected log-profile term for heat between `z_0h` and `z_t`.
///
/// # Errors
///
/// Returns [`ProfileError::DegenerateProfile`] if the term is non-positive or
/// not finite.
pub fn heat_profile(z_t: f64, d_0: f64, z_0h: f64, l: f64) -> Result<f64, ProfileError> {
    let z = z_t - d_0;
    let value = (z / z_0h).ln() - psi_h(z / l) + psi_h(z_0h / l);
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ProfileError::DegenerateProfile { value })
    }
}

/// Friction velocity (m/s) from the log wind profile inverted at height `z_u`.
///
/// The caller applies any lower floor.
///
/// # Errors
///
/// Returns a [`ProfileError`] if the wind speed is not finite or negative, or
/// if the momentum profile is degenerate.
pub fn friction_velocity(
    u: f64,
    z_u: f64,
    d_0: f64,
    z_0m: f64,
    l: f64,
) -> Result<f64, ProfileError> {
    if !u.is_finite() || u < 0.0 {
        return Err(ProfileError::NonPhysicalWind { value: u });
    }
    Ok(u * VON_KARMAN / momentum_profile(z_u, d_0, z_0m, l)?)
}

/// Obukhov length (m) from the friction velocity and surface fluxes.
///
/// Uses the virtual sensible heat flux `H + 0.61·T_A·c_p·LE/λ`. A vanishing
/// buoyancy flux yields `+∞` (neutral). Finite results are pushed away from
/// zero so that `|L| ≥ min_magnitude`.
#[must_use]
pub fn monin_obukhov_length(
    u_star: f64,
    t_air: f64,
    rho: f64,
    c_p: f64,
    h: f64,
    le: f64,
    min_magnitude: f64,
) -> f64 {
    let evaporation = le / latent_heat_of_vaporization(t_air);
    let h_virtual = h + 0.61 * t_air * c_p * evaporation;
    if h_virtual == 0.0 {
        return f64::INFINITY;
    }
    let l = -u_star.powi(3) / (VON_KARMAN * GRAVITY / t_air * (h_virtual / (rho * c_p)));
    if l.abs() < min_magnitude {
        min_magnitude.copysign(l)
    } else {
        l
    }
}

/// Relative change between two successive Obukhov lengths.
///
/// Two infinite lengths of the same sign (both neutral) have no change.
#[must_use]
pub fn relative_change(l_new: f64, l_old: f64) -> f64 {
    if l_new.is_infinite() && l_old.is_infinite() && l_new.signum() == l_old.signum() {
        return 0.0;
    }
    let diff = (l_new - l_old).abs() / l_old.abs();
    if diff.is_nan() { f64::INFINITY } else { diff }
}
