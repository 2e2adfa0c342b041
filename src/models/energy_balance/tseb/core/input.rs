//! Per-element input arrays.
//!
//! Every array holds one value per element (pixel or record) and all arrays
//! of one [`Input`] share the same length.

mod temperatures;

pub use temperatures::Temperatures;

use std::ops::Range;

use super::{InputError, SoilHeatFlux};

/// Complete input of one solver call.
#[derive(Debug, Clone, PartialEq)]
pub struct Input {
    /// Observed temperatures; the variant selects the model.
    pub temperatures: Temperatures,
    /// Meteorological forcing at the (late) observation time.
    pub meteorology: Meteorology,
    /// Net shortwave radiation partitioned by the radiation collaborator.
    pub shortwave: Shortwave,
    /// Vegetation structure and physiology.
    pub canopy: Canopy,
    /// Surface roughness, emissivity and measurement geometry.
    pub surface: Surface,
    /// Ground heat flux estimator and its driving data.
    pub soil_heat_flux: SoilHeatFlux,
}

/// Meteorological forcing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Meteorology {
    /// Air temperature (K).
    pub t_air: Vec<f64>,
    /// Wind speed (m/s).
    pub u: Vec<f64>,
    /// Vapour pressure (hPa).
    pub ea: Vec<f64>,
    /// Air pressure (hPa).
    pub p: Vec<f64>,
    /// Downwelling longwave irradiance (W/m²).
    pub l_dn: Vec<f64>,
}

/// Net shortwave radiation (W/m²) absorbed by each source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Shortwave {
    pub canopy: Vec<f64>,
    pub soil: Vec<f64>,
}

/// Vegetation properties.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Canopy {
    /// Pixel-averaged leaf area index.
    pub lai: Vec<f64>,
    /// Canopy height (m).
    pub h_c: Vec<f64>,
    /// Fractional vegetation cover.
    pub f_c: Vec<f64>,
    /// Canopy width-to-height ratio.
    pub w_c: Vec<f64>,
    /// Fraction of green, transpiring vegetation.
    pub f_g: Vec<f64>,
    /// Leaf angle distribution parameter (1 for spherical).
    pub x_lad: Vec<f64>,
    /// Nadir clumping index.
    pub omega0: Vec<f64>,
    /// Characteristic leaf width (m).
    pub leaf_width: Vec<f64>,
    /// Leaf emissivity.
    pub emis_c: Vec<f64>,
    /// Initial Priestley-Taylor coefficient.
    pub alpha_pt: Vec<f64>,
}

/// Surface and measurement geometry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Surface {
    /// Soil emissivity.
    pub emis_s: Vec<f64>,
    /// Soil roughness length (m).
    pub z0_soil: Vec<f64>,
    /// Roughness length for momentum (m).
    pub z_0m: Vec<f64>,
    /// Zero-plane displacement height (m).
    pub d_0: Vec<f64>,
    /// Wind measurement height (m).
    pub z_u: Vec<f64>,
    /// Air temperature measurement height (m).
    pub z_t: Vec<f64>,
}

impl Input {
    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.meteorology.t_air.len()
    }

    /// Returns `true` if the input holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Checks that every array has the same length.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::LengthMismatch`] for the first array whose length
    /// differs from `meteorology.t_air`.
    pub fn validate(&self) -> Result<usize, InputError> {
        let expected = self.len();
        let (driver, driver_len) = self.soil_heat_flux.driver();
        let lengths = self
            .temperatures
            .lengths()
            .into_iter()
            .chain(self.meteorology.lengths())
            .chain(self.shortwave.lengths())
            .chain(self.canopy.lengths())
            .chain(self.surface.lengths())
            .chain([(driver, driver_len)]);

        for (field, found) in lengths {
            if found != expected {
                return Err(InputError::LengthMismatch {
                    field,
                    expected,
                    found,
                });
            }
        }
        self.soil_heat_flux.validate()?;
        Ok(expected)
    }

    /// Copies the elements in `range` into a new input.
    ///
    /// # Panics
    ///
    /// Panics if `range` is out of bounds for any array.
    #[must_use]
    pub fn slice(&self, range: Range<usize>) -> Self {
        Self {
            temperatures: self.temperatures.slice(range.clone()),
            meteorology: Meteorology {
                t_air: self.meteorology.t_air[range.clone()].to_vec(),
                u: self.meteorology.u[range.clone()].to_vec(),
                ea: self.meteorology.ea[range.clone()].to_vec(),
                p: self.meteorology.p[range.clone()].to_vec(),
                l_dn: self.meteorology.l_dn[range.clone()].to_vec(),
            },
            shortwave: Shortwave {
                canopy: self.shortwave.canopy[range.clone()].to_vec(),
                soil: self.shortwave.soil[range.clone()].to_vec(),
            },
            canopy: Canopy {
                lai: self.canopy.lai[range.clone()].to_vec(),
                h_c: self.canopy.h_c[range.clone()].to_vec(),
                f_c: self.canopy.f_c[range.clone()].to_vec(),
                w_c: self.canopy.w_c[range.clone()].to_vec(),
                f_g: self.canopy.f_g[range.clone()].to_vec(),
                x_lad: self.canopy.x_lad[range.clone()].to_vec(),
                omega0: self.canopy.omega0[range.clone()].to_vec(),
                leaf_width: self.canopy.leaf_width[range.clone()].to_vec(),
                emis_c: self.canopy.emis_c[range.clone()].to_vec(),
                alpha_pt: self.canopy.alpha_pt[range.clone()].to_vec(),
            },
            surface: Surface {
                emis_s: self.surface.emis_s[range.clone()].to_vec(),
                z0_soil: self.surface.z0_soil[range.clone()].to_vec(),
                z_0m: self.surface.z_0m[range.clone()].to_vec(),
                d_0: self.surface.d_0[range.clone()].to_vec(),
                z_u: self.surface.z_u[range.clone()].to_vec(),
                z_t: self.surface.z_t[range.clone()].to_vec(),
            },
            soil_heat_flux: self.soil_heat_flux.slice(range),
        }
    }
}

impl Meteorology {
    fn lengths(&self) -> [(&'static str, usize); 5] {
        [
            ("t_air", self.t_air.len()),
            ("u", self.u.len()),
            ("ea", self.ea.len()),
            ("p", self.p.len()),
            ("l_dn", self.l_dn.len()),
        ]
    }
}

impl Shortwave {
    fn lengths(&self) -> [(&'static str, usize); 2] {
        [
            ("sn_canopy", self.canopy.len()),
            ("sn_soil", self.soil.len()),
        ]
    }
}

impl Canopy {
    fn lengths(&self) -> [(&'static str, usize); 10] {
        [
            ("lai", self.lai.len()),
            ("h_c", self.h_c.len()),
            ("f_c", self.f_c.len()),
            ("w_c", self.w_c.len()),
            ("f_g", self.f_g.len()),
            ("x_lad", self.x_lad.len()),
            ("omega0", self.omega0.len()),
            ("leaf_width", self.leaf_width.len()),
            ("emis_c", self.emis_c.len()),
            ("alpha_pt", self.alpha_pt.len()),
        ]
    }

    /// Leaf area index within the vegetated fraction of element `i`.
    pub(super) fn local_lai(&self, i: usize) -> f64 {
        self.lai[i] / self.f_c[i]
    }
}

impl Surface {
    fn lengths(&self) -> [(&'static str, usize); 6] {
        [
            ("emis_s", self.emis_s.len()),
            ("z0_soil", self.z0_soil.len()),
            ("z_0m", self.z_0m.len()),
            ("d_0", self.d_0.len()),
            ("z_u", self.z_u.len()),
            ("z_t", self.z_t.len()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::models::energy_balance::tseb::core::{
        TimePhase,
        test_support::{bare_soil, repeat, vegetated},
    };

    #[test]
    fn fixtures_are_consistent() {
        assert_eq!(bare_soil().validate(), Ok(1));
        assert_eq!(vegetated().validate(), Ok(1));
    }

    #[test]
    fn short_array_is_reported() {
        let mut input = vegetated();
        input.canopy.leaf_width.clear();
        assert_eq!(
            input.validate(),
            Err(InputError::LengthMismatch {
                field: "leaf_width",
                expected: 1,
                found: 0,
            })
        );
    }

    #[test]
    fn missing_time_is_a_length_mismatch() {
        let mut input = vegetated();
        input.soil_heat_flux = SoilHeatFlux::TimePhase {
            time: Vec::new(),
            shape: TimePhase::default(),
        };
        assert!(matches!(
            input.validate(),
            Err(InputError::LengthMismatch { field: "time", .. })
        ));
    }

    #[test]
    fn slicing_keeps_selected_elements() {
        let input = repeat(&vegetated(), 4);
        let tail = input.slice(2..4);
        assert_eq!(tail.len(), 2);
        assert_eq!(tail.validate(), Ok(2));
    }
}
