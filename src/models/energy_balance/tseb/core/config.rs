use uom::si::{
    f64::{HeatFluxDensity, Length, Ratio, Velocity},
    heat_flux_density::watt_per_square_meter,
    length::meter,
    ratio::ratio,
    velocity::meter_per_second,
};

use crate::support::constraint::{ConstraintError, NonNegative, StrictlyPositive, UnitInterval};

use super::InputError;

/// Iteration controls, floors and routing thresholds shared by every variant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    /// Maximum number of outer stability passes per element.
    pub max_iterations: usize,

    /// Relative change of the Obukhov length below which an element converges.
    pub stability_tolerance: Ratio,

    /// Absolute change of total sensible heat below which an element converges.
    pub flux_tolerance: HeatFluxDensity,

    /// Lower bound on the friction velocity.
    pub min_friction_velocity: Velocity,

    /// Smallest magnitude allowed for the Obukhov length.
    pub min_obukhov_length: Length,

    /// Reduction of the Priestley-Taylor coefficient per back-off step.
    pub alpha_step: f64,

    /// Lowest Priestley-Taylor coefficient the back-off may reach.
    pub alpha_floor: f64,

    /// Fractional cover at or below which an element is treated as bare soil.
    pub bare_soil_cover: Ratio,

    /// Leaf area index at or below which an element is treated as bare soil.
    pub bare_soil_lai: f64,

    /// `kB⁻¹` parameter relating the heat and momentum roughness lengths,
    /// `z_0h = z_0m · exp(-kB⁻¹)`.
    pub heat_roughness_kb: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: 50,
            stability_tolerance: Ratio::new::<ratio>(1e-3),
            flux_tolerance: HeatFluxDensity::new::<watt_per_square_meter>(1e-3),
            min_friction_velocity: Velocity::new::<meter_per_second>(0.01),
            min_obukhov_length: Length::new::<meter>(1e-3),
            alpha_step: 0.1,
            alpha_floor: 0.0,
            bare_soil_cover: Ratio::new::<ratio>(0.01),
            bare_soil_lai: 0.0,
            heat_roughness_kb: 0.0,
        }
    }
}

impl SolverConfig {
    /// Checks every field against its physical constraint.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::InvalidParameter`] naming the first offending field.
    pub fn validate(&self) -> Result<(), InputError> {
        let invalid = |name: &'static str| {
            move |source: ConstraintError| InputError::InvalidParameter { name, source }
        };

        StrictlyPositive::new(self.max_iterations).map_err(invalid("max_iterations"))?;
        StrictlyPositive::new(self.stability_tolerance)
            .map_err(invalid("stability_tolerance"))?;
        NonNegative::new(self.flux_tolerance).map_err(invalid("flux_tolerance"))?;
        StrictlyPositive::new(self.min_friction_velocity)
            .map_err(invalid("min_friction_velocity"))?;
        StrictlyPositive::new(self.min_obukhov_length).map_err(invalid("min_obukhov_length"))?;
        StrictlyPositive::new(self.alpha_step).map_err(invalid("alpha_step"))?;
        NonNegative::new(self.alpha_floor).map_err(invalid("alpha_floor"))?;
        UnitInterval::new(self.bare_soil_cover).map_err(invalid("bare_soil_cover"))?;
        NonNegative::new(self.bare_soil_lai).map_err(invalid("bare_soil_lai"))?;
        NonNegative::new(self.heat_roughness_kb).map_err(invalid("heat_roughness_kb"))?;
        Ok(())
    }

    /// Roughness length for heat (m) given the roughness length for momentum.
    pub(super) fn heat_roughness(&self, z_0m: f64) -> f64 {
        z_0m * (-self.heat_roughness_kb).exp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert!(SolverConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_iterations_are_rejected() {
        let config = SolverConfig {
            max_iterations: 0,
            ..SolverConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(InputError::InvalidParameter {
                name: "max_iterations",
                source: ConstraintError::Zero,
            })
        ));
    }

    #[test]
    fn cover_threshold_must_be_a_fraction() {
        let config = SolverConfig {
            bare_soil_cover: Ratio::new::<ratio>(1.5),
            ..SolverConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(InputError::InvalidParameter {
                name: "bare_soil_cover",
                ..
            })
        ));
    }

    #[test]
    fn default_heat_roughness_equals_momentum_roughness() {
        let config = SolverConfig::default();
        assert_eq!(config.heat_roughness(0.1), 0.1);
    }
}
