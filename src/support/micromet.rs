//! Surface-layer micrometeorology.
//!
//! Scalar kernels shared by the energy balance models: air properties,
//! Monin-Obukhov similarity, the soil/canopy/atmosphere resistance network and
//! the longwave radiation exchange between soil and canopy.
//!
//! Every kernel operates on one element (pixel or record) with plain `f64`
//! values in the units documented on each function. The models apply them
//! across whole arrays.
//!
//! # Units
//!
//! - temperatures in kelvin
//! - vapour pressure and air pressure in hPa (mb)
//! - wind speed in m/s, lengths in m
//! - radiation and heat fluxes in W/m²
//! - angles in degrees

pub mod air;
pub mod radiation;
pub mod resistance;
pub mod stability;

use thiserror::Error;

/// Von Kármán constant.
pub const VON_KARMAN: f64 = 0.41;

/// Acceleration due to gravity (m/s²).
pub const GRAVITY: f64 = 9.8;

/// Stefan-Boltzmann constant (W/m²/K⁴).
pub const STEFAN_BOLTZMANN: f64 = 5.670_373e-8;

/// Errors raised when a surface-layer profile cannot be evaluated.
///
/// These are per-element conditions. The energy balance models turn them into
/// quality flags rather than aborting a whole call.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ProfileError {
    /// The logarithmic profile term is non-positive.
    ///
    /// Happens when the measurement height does not clear the displacement
    /// height plus the roughness length.
    #[error("degenerate log profile: ln((z - d_0) / z_0) - corrections = {value}")]
    DegenerateProfile { value: f64 },

    /// A computed resistance is zero, negative or not finite.
    #[error("non-physical {name} resistance: {value} s/m")]
    NonPhysicalResistance { name: &'static str, value: f64 },

    /// Wind speed is zero, negative or not finite.
    #[error("non-physical wind speed: {value} m/s")]
    NonPhysicalWind { value: f64 },
}

/// Checks that a resistance is strictly positive and finite.
pub(crate) fn checked_resistance(name: &'static str, value: f64) -> Result<f64, ProfileError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ProfileError::NonPhysicalResistance { name, value })
    }
}
