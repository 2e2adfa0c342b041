//! The soil/canopy/atmosphere resistance network.
//!
//! Three resistances (s/m) link the surfaces to the reference height:
//!
//! - `R_A`, aerodynamic resistance from the canopy-air space to the
//!   measurement height, corrected for stability;
//! - `R_x`, boundary-layer resistance of the leaves to the canopy-air space;
//! - `R_S`, resistance from the soil surface to the canopy-air space.
//!
//! `R_x` and `R_S` depend on the selected [`ResistanceForm`]. Every
//! resistance is checked to be strictly positive and finite.

mod wind;

pub use wind::{goudriaan_attenuation, wind_at_canopy_top, wind_in_canopy};

use super::{ProfileError, VON_KARMAN, checked_resistance, stability};

/// Lower bound on the soil-surface conductance (m/s).
///
/// Keeps `R_S` finite when both the near-soil wind and the soil-canopy
/// temperature difference vanish.
const MIN_SOIL_CONDUCTANCE: f64 = 1e-4;

/// Aerodynamic resistance `R_A` (s/m) between the canopy-air space and the
/// measurement height.
///
/// `z_u` and `z_t` are the wind and temperature measurement heights, `z_0h`
/// the roughness length for heat and `l` the Obukhov length.
///
/// # Errors
///
/// Returns a [`ProfileError`] if either log profile is degenerate or the
/// resulting resistance is not strictly positive and finite.
pub fn aerodynamic_resistance(
    u: f64,
    z_u: f64,
    z_t: f64,
    d_0: f64,
    z_0m: f64,
    z_0h: f64,
    l: f64,
) -> Result<f64, ProfileError> {
    let momentum = stability::momentum_profile(z_u, d_0, z_0m, l)?;
    let heat = stability::heat_profile(z_t, d_0, z_0h, l)?;
    checked_resistance(
        "aerodynamic",
        momentum * heat / (VON_KARMAN * VON_KARMAN * u),
    )
}

/// Flow state of a canopy needed by the boundary-layer and soil resistances.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanopyFlow {
    /// Friction velocity above the canopy (m/s).
    pub u_friction: f64,
    /// Wind speed at the canopy top (m/s).
    pub u_canopy: f64,
    /// Goudriaan attenuation coefficient.
    pub attenuation: f64,
    /// Canopy height (m).
    pub h_c: f64,
    /// Zero-plane displacement height (m).
    pub d_0: f64,
    /// Roughness length for momentum (m).
    pub z_0m: f64,
    /// Soil roughness length (m).
    pub z0_soil: f64,
    /// Effective leaf area index.
    pub lai: f64,
    /// Characteristic leaf width (m).
    pub leaf_width: f64,
}

impl CanopyFlow {
    /// Builds the canopy flow from the friction velocity and canopy geometry.
    ///
    /// `lai_local` (leaf area within the vegetated fraction) drives the
    /// attenuation, `lai` the leaf boundary-layer conductance.
    ///
    /// # Errors
    ///
    /// Returns a [`ProfileError`] if the wind at the canopy top is not physical.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        u_friction: f64,
        l: f64,
        h_c: f64,
        d_0: f64,
        z_0m: f64,
        z0_soil: f64,
        lai: f64,
        lai_local: f64,
        leaf_width: f64,
    ) -> Result<Self, ProfileError> {
        Ok(Self {
            u_friction,
            u_canopy: wind_at_canopy_top(u_friction, h_c, d_0, z_0m, l)?,
            attenuation: goudriaan_attenuation(h_c, lai_local, leaf_width),
            h_c,
            d_0,
            z_0m,
            z0_soil,
            lai,
            leaf_width,
        })
    }

    /// Wind speed (m/s) at height `z` within the canopy.
    #[must_use]
    pub fn wind_at(&self, z: f64) -> f64 {
        wind_in_canopy(self.u_canopy, self.attenuation, self.h_c, z.min(self.h_c))
    }

    /// Wind at the height of the effective momentum sink, `d_0 + z_0m`.
    fn wind_at_momentum_sink(&self) -> f64 {
        self.wind_at(self.d_0 + self.z_0m)
    }
}

/// Parameterisation of the boundary-layer and soil resistances.
///
/// Each variant carries exactly the coefficients its formulas use.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResistanceForm {
    /// Kustas and Norman (1999).
    KustasNorman1999 {
        /// Free-convection soil conductance coefficient (m/s/K^⅓).
        c: f64,
        /// Forced-convection soil conductance coefficient.
        b: f64,
        /// Leaf boundary-layer coefficient (s^½/m).
        c_dash: f64,
    },
    /// Choudhury and Monteith (1988).
    ChoudhuryMonteith1988 {
        /// Leaf boundary-layer shape coefficient.
        alpha_prime: f64,
        /// Eddy diffusivity attenuation coefficient.
        alpha_k: f64,
        /// Leaf drag coefficient (m/s^½).
        leaf_drag: f64,
    },
    /// McNaughton and Van den Hurk (1995).
    McNaughtonVanDenHurk1995 {
        /// Leaf boundary-layer coefficient (s^½/m).
        c_dash: f64,
        /// Soil resistance scale, `R_S = coefficient / u*`.
        soil_coefficient: f64,
    },
}

impl Default for ResistanceForm {
    fn default() -> Self {
        Self::kustas_norman()
    }
}

impl ResistanceForm {
    /// Kustas and Norman (1999) with its published coefficients.
    #[must_use]
    pub fn kustas_norman() -> Self {
        Self::KustasNorman1999 {
            c: 0.0025,
            b: 0.012,
            c_dash: 90.0,
        }
    }

    /// Choudhury and Monteith (1988) with its published coefficients.
    #[must_use]
    pub fn choudhury_monteith() -> Self {
        Self::ChoudhuryMonteith1988 {
            alpha_prime: 3.0,
            alpha_k: 2.0,
            leaf_drag: 0.01,
        }
    }

    /// McNaughton and Van den Hurk (1995) with its published coefficients.
    #[must_use]
    pub fn mcnaughton_van_den_hurk() -> Self {
        Self::McNaughtonVanDenHurk1995 {
            c_dash: 130.0,
            soil_coefficient: 10.0,
        }
    }

    /// Names of the coefficients paired with their values.
    pub(crate) fn coefficients(&self) -> Vec<(&'static str, f64)> {
        match *self {
            Self::KustasNorman1999 { c, b, c_dash } => {
                vec![("c", c), ("b", b), ("c_dash", c_dash)]
            }
            Self::ChoudhuryMonteith1988 {
                alpha_prime,
                alpha_k,
                leaf_drag,
            } => vec![
                ("alpha_prime", alpha_prime),
                ("alpha_k", alpha_k),
                ("leaf_drag", leaf_drag),
            ],
            Self::McNaughtonVanDenHurk1995 {
                c_dash,
                soil_coefficient,
            } => vec![("c_dash", c_dash), ("soil_coefficient", soil_coefficient)],
        }
    }

    /// Boundary-layer resistance `R_x` (s/m) of the canopy leaves.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::NonPhysicalResistance`] if the result is not
    /// strictly positive and finite, for example with no leaves or no wind.
    pub fn boundary_layer_resistance(&self, flow: &CanopyFlow) -> Result<f64, ProfileError> {
        let value = match *self {
            Self::KustasNorman1999 { c_dash, .. } => {
                c_dash / flow.lai * (flow.leaf_width / flow.wind_at_momentum_sink()).sqrt()
            }
            Self::ChoudhuryMonteith1988 {
                alpha_prime,
                leaf_drag,
                ..
            } => {
                alpha_prime / (2.0 * leaf_drag * flow.lai)
                    * (flow.leaf_width / flow.u_canopy).sqrt()
                    / (1.0 - (-alpha_prime / 2.0).exp())
            }
            Self::McNaughtonVanDenHurk1995 { c_dash, .. } => {
                c_dash / flow.lai * (flow.leaf_width / flow.wind_at_momentum_sink()).sqrt()
            }
        };
        checked_resistance("boundary-layer", value)
    }

    /// Soil-surface resistance `R_S` (s/m).
    ///
    /// `delta_t` is the soil minus canopy temperature difference (K). Only the
    /// Kustas-Norman form uses it, and only its positive part.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::NonPhysicalResistance`] if the result is not
    /// strictly positive and finite.
    pub fn soil_resistance(&self, flow: &CanopyFlow, delta_t: f64) -> Result<f64, ProfileError> {
        let value = match *self {
            Self::KustasNorman1999 { c, b, .. } => {
                let u_soil = flow.wind_at(flow.z0_soil);
                let conductance = c * delta_t.max(0.0).cbrt() + b * u_soil;
                1.0 / conductance.max(MIN_SOIL_CONDUCTANCE)
            }
            Self::ChoudhuryMonteith1988 { alpha_k, .. } => {
                let diffusivity = VON_KARMAN * flow.u_friction * (flow.h_c - flow.d_0);
                let sink = flow.d_0 + flow.z_0m;
                flow.h_c * alpha_k.exp() / (alpha_k * diffusivity)
                    * ((-alpha_k * flow.z0_soil / flow.h_c).exp()
                        - (-alpha_k * sink / flow.h_c).exp())
            }
            Self::McNaughtonVanDenHurk1995 {
                soil_coefficient, ..
            } => soil_coefficient / flow.u_friction,
        };
        checked_resistance("soil", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    fn flow() -> CanopyFlow {
        CanopyFlow::new(0.3, f64::INFINITY, 1.0, 0.65, 0.125, 0.01, 3.0, 3.0, 0.1).unwrap()
    }

    #[test]
    fn neutral_aerodynamic_resistance() {
        let r_a = aerodynamic_resistance(2.0, 2.0, 2.0, 0.05, 0.01, 0.01, f64::INFINITY).unwrap();
        let log = 195f64.ln();
        assert_relative_eq!(r_a, log * log / (VON_KARMAN * VON_KARMAN * 2.0), epsilon = 1e-12);
    }

    #[test]
    fn unstable_air_lowers_aerodynamic_resistance() {
        let neutral =
            aerodynamic_resistance(2.0, 2.0, 2.0, 0.05, 0.01, 0.01, f64::INFINITY).unwrap();
        let unstable = aerodynamic_resistance(2.0, 2.0, 2.0, 0.05, 0.01, 0.01, -5.0).unwrap();
        let stable = aerodynamic_resistance(2.0, 2.0, 2.0, 0.05, 0.01, 0.01, 5.0).unwrap();
        assert!(unstable < neutral && neutral < stable);
    }

    #[test]
    fn calm_air_has_no_finite_aerodynamic_resistance() {
        let result = aerodynamic_resistance(0.0, 2.0, 2.0, 0.05, 0.01, 0.01, f64::INFINITY);
        assert!(matches!(
            result,
            Err(ProfileError::NonPhysicalResistance { .. })
        ));
    }

    #[test]
    fn every_form_yields_positive_resistances() {
        let flow = flow();
        for form in [
            ResistanceForm::kustas_norman(),
            ResistanceForm::choudhury_monteith(),
            ResistanceForm::mcnaughton_van_den_hurk(),
        ] {
            let r_x = form.boundary_layer_resistance(&flow).unwrap();
            let r_s = form.soil_resistance(&flow, 5.0).unwrap();
            assert!(r_x > 0.0 && r_x.is_finite(), "{form:?} r_x = {r_x}");
            assert!(r_s > 0.0 && r_s.is_finite(), "{form:?} r_s = {r_s}");
        }
    }

    #[test]
    fn soil_resistance_stays_finite_without_gradient_or_wind() {
        let mut flow = flow();
        flow.u_canopy = 0.0;
        let r_s = ResistanceForm::kustas_norman()
            .soil_resistance(&flow, -3.0)
            .unwrap();
        assert_relative_eq!(r_s, 1.0 / MIN_SOIL_CONDUCTANCE);
    }

    #[test]
    fn free_convection_lowers_soil_resistance() {
        let flow = flow();
        let form = ResistanceForm::kustas_norman();
        let calm = form.soil_resistance(&flow, 0.0).unwrap();
        let convective = form.soil_resistance(&flow, 8.0).unwrap();
        assert!(convective < calm);
    }

    #[test]
    fn leafless_canopy_has_no_boundary_layer() {
        let mut flow = flow();
        flow.lai = 0.0;
        let result = ResistanceForm::kustas_norman().boundary_layer_resistance(&flow);
        assert!(result.is_err());
    }
}
