//! Element routing and the shared solver context.
//!
//! Every element is solved independently, but all elements of a call share
//! one model variant. Bare soil is always solved by the single-source model.
//! The two-source variants hand back elements whose component temperatures
//! cannot be inverted, and those are re-solved as a single source.

mod backoff;
mod iteration;
mod network;
mod oseb;
mod two_source;
mod two_temperature;

use log::{debug, trace, warn};
use uom::si::{
    heat_flux_density::watt_per_square_meter, length::meter, ratio::ratio,
    velocity::meter_per_second,
};

use crate::support::{
    constraint::StrictlyPositive,
    micromet::{
        ProfileError,
        air::{air_density, heat_capacity},
        radiation::view_vegetation_fraction,
        resistance::{CanopyFlow, ResistanceForm, aerodynamic_resistance},
        stability::{bulk_richardson, friction_velocity},
    },
};

use super::{Flag, Input, InputError, Mask, Output, SolverConfig, Temperatures};

use iteration::Failure;
use oseb::Forcing;
use two_source::Seeding;

/// Displacement height of bare soil as a multiple of its roughness length.
const BARE_SOIL_DISPLACEMENT: f64 = 5.0;

/// Solves every element of `input`.
///
/// # Errors
///
/// Returns an [`InputError`] if the arrays differ in length or a parameter is
/// out of range. Per-element problems are reported through [`Flag`].
pub(in super::super) fn solve(
    input: &Input,
    resistance: &ResistanceForm,
    config: &SolverConfig,
) -> Result<Output, InputError> {
    let len = input.validate()?;
    config.validate()?;
    for (name, value) in resistance.coefficients() {
        StrictlyPositive::new(value)
            .map_err(|source| InputError::InvalidParameter { name, source })?;
    }

    let single_source = Mask::from_fn(len, |i| match input.temperatures {
        Temperatures::SingleSource { .. } => true,
        _ => is_bare_soil(input, config, i),
    });
    let two_source = Mask::from_fn(len, |_| true).and_not(&single_source);
    let ctx = Context::new(input, resistance, config, &single_source);
    let mut out = Output::unset(len);

    debug!(
        "solving {len} elements: {} single-source, {} two-source",
        single_source.count(),
        two_source.count()
    );

    if let Temperatures::DualTimeDifference {
        t_radiometric_0,
        t_radiometric_1,
        t_air_0,
        ..
    } = &input.temperatures
    {
        for i in 0..len {
            out.richardson[i] = bulk_richardson(
                input.meteorology.u[i],
                input.surface.z_u[i],
                ctx.d_0[i],
                t_radiometric_0[i],
                t_radiometric_1[i],
                t_air_0[i],
                input.meteorology.t_air[i],
            );
        }
    }

    let bare = single_source.indices();
    let forcing = Forcing::new(&ctx, &bare, |i| input.surface.emis_s[i]);
    let mut failed = oseb::solve(&ctx, &bare, &forcing, &mut out);

    let vegetated = two_source.indices();
    let failures = match &input.temperatures {
        Temperatures::SingleSource { .. } => Vec::new(),
        Temperatures::PriestleyTaylor { .. } => {
            two_source::solve(&ctx, Seeding::PriestleyTaylor, &vegetated, &mut out)
        }
        Temperatures::DualTimeDifference {
            t_radiometric_0,
            t_air_0,
            ..
        } => {
            let seeding = Seeding::DualTimeDifference {
                t_radiometric_0,
                t_air_0,
            };
            two_source::solve(&ctx, seeding, &vegetated, &mut out)
        }
        Temperatures::Components { t_canopy, t_soil } => {
            two_temperature::solve(&ctx, t_canopy, t_soil, &vegetated, &mut out)
        }
    };

    let mut fallback = Vec::new();
    for (i, failure) in failures {
        match failure {
            Failure::Inversion => fallback.push(i),
            Failure::Profile(_) => failed.push((i, failure)),
        }
    }

    if !fallback.is_empty() {
        warn!(
            "{} elements have no physical component temperatures; solving them as a single source",
            fallback.len()
        );
        let forcing = Forcing::new(&ctx, &fallback, |i| {
            let f_theta = ctx.view_fraction(i);
            f_theta * input.canopy.emis_c[i] + (1.0 - f_theta) * input.surface.emis_s[i]
        });
        failed.extend(oseb::solve(&ctx, &fallback, &forcing, &mut out));
        for &i in &fallback {
            out.flag[i] = Flag::SingleSourceFallback;
        }
    }

    for (i, failure) in failed {
        trace!("element {i} failed: {failure:?}");
        out.invalidate(i);
    }
    let mut non_finite = 0;
    for i in 0..len {
        if out.flag[i] != Flag::NumericalFailure && !out.is_finite(i) {
            out.invalidate(i);
            non_finite += 1;
        }
    }
    if non_finite > 0 {
        warn!("{non_finite} elements produced non-finite fluxes");
    }

    let clipped = out.flag.iter().filter(|flag| flag.is_clipped()).count();
    let converged = out.converged.iter().filter(|&&converged| converged).count();
    debug!("solved {len} elements: {converged} converged, {clipped} with latent heat clipped");

    Ok(out)
}

/// Returns `true` if element `i` has too little vegetation for two sources.
fn is_bare_soil(input: &Input, config: &SolverConfig, i: usize) -> bool {
    let lai = input.canopy.lai[i];
    lai.is_nan()
        || lai <= config.bare_soil_lai
        || input.canopy.f_c[i] <= config.bare_soil_cover.get::<ratio>()
}

/// Per-call state shared by every solver pass.
struct Context<'a> {
    input: &'a Input,
    resistance: &'a ResistanceForm,
    config: &'a SolverConfig,
    limits: Limits,
    /// Air density (kg/m³).
    rho: Vec<f64>,
    /// Heat capacity of air (J/kg/K).
    c_p: Vec<f64>,
    /// Roughness length for momentum, replaced by the soil value on bare soil.
    z_0m: Vec<f64>,
    /// Displacement height, derived from the soil roughness on bare soil.
    d_0: Vec<f64>,
}

/// Tolerances and floors of [`SolverConfig`] in base units.
#[derive(Debug, Clone, Copy)]
struct Limits {
    stability_tolerance: f64,
    flux_tolerance: f64,
    min_friction_velocity: f64,
    min_obukhov_length: f64,
}

impl<'a> Context<'a> {
    fn new(
        input: &'a Input,
        resistance: &'a ResistanceForm,
        config: &'a SolverConfig,
        single_source: &Mask,
    ) -> Self {
        let met = &input.meteorology;
        let surface = &input.surface;
        let len = input.len();
        let two_source_model = !matches!(input.temperatures, Temperatures::SingleSource { .. });

        let bare_soil = |i: usize| two_source_model && single_source.contains(i);
        let z_0m = (0..len)
            .map(|i| {
                if bare_soil(i) {
                    surface.z0_soil[i]
                } else {
                    surface.z_0m[i]
                }
            })
            .collect();
        let d_0 = (0..len)
            .map(|i| {
                if bare_soil(i) {
                    BARE_SOIL_DISPLACEMENT * surface.z0_soil[i]
                } else {
                    surface.d_0[i]
                }
            })
            .collect();

        Self {
            input,
            resistance,
            config,
            limits: Limits {
                stability_tolerance: config.stability_tolerance.get::<ratio>(),
                flux_tolerance: config.flux_tolerance.get::<watt_per_square_meter>(),
                min_friction_velocity: config.min_friction_velocity.get::<meter_per_second>(),
                min_obukhov_length: config.min_obukhov_length.get::<meter>(),
            },
            rho: (0..len)
                .map(|i| air_density(met.p[i], met.ea[i], met.t_air[i]))
                .collect(),
            c_p: (0..len).map(|i| heat_capacity(met.p[i], met.ea[i])).collect(),
            z_0m,
            d_0,
        }
    }

    /// Volumetric heat capacity of air `ρ·c_p` (J/m³/K).
    fn rho_cp(&self, i: usize) -> f64 {
        self.rho[i] * self.c_p[i]
    }

    fn z_0h(&self, i: usize) -> f64 {
        self.config.heat_roughness(self.z_0m[i])
    }

    /// Friction velocity of element `i` under Obukhov length `l`, floored.
    fn friction_velocity(&self, i: usize, l: f64) -> Result<f64, ProfileError> {
        let u_star = friction_velocity(
            self.input.meteorology.u[i],
            self.input.surface.z_u[i],
            self.d_0[i],
            self.z_0m[i],
            l,
        )?;
        Ok(u_star.max(self.limits.min_friction_velocity))
    }

    fn aerodynamic_resistance(&self, i: usize, l: f64) -> Result<f64, ProfileError> {
        aerodynamic_resistance(
            self.input.meteorology.u[i],
            self.input.surface.z_u[i],
            self.input.surface.z_t[i],
            self.d_0[i],
            self.z_0m[i],
            self.z_0h(i),
            l,
        )
    }

    fn canopy_flow(&self, i: usize, u_star: f64, l: f64) -> Result<CanopyFlow, ProfileError> {
        let canopy = &self.input.canopy;
        CanopyFlow::new(
            u_star,
            l,
            canopy.h_c[i],
            self.d_0[i],
            self.z_0m[i],
            self.input.surface.z0_soil[i],
            canopy.lai[i],
            canopy.local_lai(i),
            canopy.leaf_width[i],
        )
    }

    /// Fraction of the sensor's view filled by vegetation.
    fn view_fraction(&self, i: usize) -> f64 {
        let canopy = &self.input.canopy;
        view_vegetation_fraction(
            canopy.local_lai(i),
            self.input.temperatures.view_zenith(i),
            canopy.w_c[i],
            canopy.omega0[i],
            canopy.x_lad[i],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::{
        models::energy_balance::tseb::core::{
            Shortwave, SoilHeatFlux, Surface, TimePhase,
            test_support::{bare_soil, repeat, resistance, vegetated},
        },
        support::micromet::air::{air_density, heat_capacity},
    };

    fn run(input: &Input) -> Output {
        solve(input, &resistance(), &SolverConfig::default()).unwrap()
    }

    fn dual_time() -> Input {
        Input {
            temperatures: Temperatures::DualTimeDifference {
                t_radiometric_0: vec![295.0],
                t_radiometric_1: vec![301.0],
                t_air_0: vec![296.0],
                vza: vec![0.0],
            },
            ..vegetated()
        }
    }

    fn components() -> Input {
        Input {
            temperatures: Temperatures::Components {
                t_canopy: vec![301.0],
                t_soil: vec![306.0],
            },
            ..vegetated()
        }
    }

    fn assert_closes(out: &Output) {
        for i in (0..out.len()).filter(|&i| out.flag[i] != Flag::NumericalFailure) {
            assert_relative_eq!(out.closure_residual(i), 0.0, epsilon = 1e-6);
            assert!(out.le_canopy[i] >= 0.0 && out.le_soil[i] >= 0.0);
        }
    }

    #[test]
    fn dense_canopy_transpires_most() {
        let out = run(&vegetated());

        assert!(out.converged[0]);
        assert!(matches!(out.flag[0], Flag::AllFluxes | Flag::AlphaReduced));
        assert!(out.le_canopy[0] > out.le_soil[0]);
        assert!(out.latent_partition(0) > 0.5);
        assert!(out.alpha_pt[0] <= 1.26);
        assert!(out.t_canopy_air[0].is_finite());
        assert!(out.r_x[0] > 0.0 && out.r_s[0] > 0.0);
        assert!(out.richardson[0].is_nan());
        assert_closes(&out);
    }

    #[test]
    fn dual_time_difference_reports_richardson() {
        let out = run(&dual_time());

        assert!(out.richardson[0] < 0.0, "surface warmed faster than the air");
        assert_ne!(out.flag[0], Flag::NumericalFailure);
        assert!(out.h_canopy[0].is_finite());
        assert_closes(&out);
    }

    #[test]
    fn observed_components_drive_both_sources() {
        let out = run(&components());

        assert_eq!(out.t_canopy[0], 301.0);
        assert_eq!(out.t_soil[0], 306.0);
        assert!(out.h_soil[0] > 0.0);
        assert!(out.alpha_pt[0].is_nan());
        assert!(out.converged[0]);
        assert_closes(&out);
    }

    #[test]
    fn net_radiation_grows_with_shortwave() {
        let mut input = components();
        let low = run(&input).net_radiation(0);
        input.shortwave.soil = vec![160.0];
        let high = run(&input).net_radiation(0);
        assert_relative_eq!(high - low, 80.0, epsilon = 1e-9);
    }

    #[test]
    fn bare_soil_matches_single_source() {
        let mut input = vegetated();
        input.canopy.lai = vec![0.0];
        input.canopy.f_c = vec![0.0];
        let routed = run(&input);

        let single = Input {
            temperatures: Temperatures::SingleSource {
                t_surface: vec![301.0],
            },
            shortwave: Shortwave {
                canopy: vec![0.0],
                soil: vec![400.0],
            },
            surface: Surface {
                z_0m: vec![0.01],
                d_0: vec![0.05],
                ..input.surface.clone()
            },
            ..input.clone()
        };
        let direct = run(&single);

        assert_eq!(routed.h_canopy[0], 0.0);
        assert_eq!(routed.le_canopy[0], 0.0);
        assert_relative_eq!(routed.h_soil[0], direct.h_soil[0], max_relative = 1e-12);
        assert_relative_eq!(routed.le_soil[0], direct.le_soil[0], max_relative = 1e-12);
        assert_relative_eq!(routed.r_a[0], direct.r_a[0], max_relative = 1e-12);
    }

    #[test]
    fn missing_leaf_area_is_bare_soil() {
        let mut input = vegetated();
        input.canopy.lai = vec![f64::NAN];
        let out = run(&input);
        assert_eq!(out.sn_canopy[0], 0.0);
        assert_ne!(out.flag[0], Flag::NumericalFailure);
        assert_closes(&out);
    }

    #[test]
    fn elements_are_independent() {
        let single = run(&vegetated());

        let mut input = repeat(&vegetated(), 3);
        if let Temperatures::PriestleyTaylor { t_radiometric, .. } = &mut input.temperatures {
            t_radiometric[1] = 310.0;
        }
        input.meteorology.u[1] = 6.0;
        let batch = run(&input);

        for i in [0, 2] {
            assert_eq!(batch.h_canopy[i], single.h_canopy[0]);
            assert_eq!(batch.le_soil[i], single.le_soil[0]);
            assert_eq!(batch.obukhov_length[i], single.obukhov_length[0]);
            assert_eq!(batch.iterations[i], single.iterations[0]);
        }
        assert_ne!(batch.h_soil[1], single.h_soil[0]);
    }

    #[test]
    fn repeated_calls_agree() {
        let input = dual_time();
        let first = run(&input);
        let second = run(&input);
        assert_eq!(first.h_soil, second.h_soil);
        assert_eq!(first.le_canopy, second.le_canopy);
        assert_eq!(first.flag, second.flag);
    }

    #[test]
    fn iteration_ceiling_is_reported() {
        let config = SolverConfig {
            max_iterations: 1,
            ..SolverConfig::default()
        };
        let out = solve(&vegetated(), &resistance(), &config).unwrap();
        assert_eq!(out.iterations[0], 1);
        assert!(!out.converged[0]);
        assert!(out.h_canopy[0].is_finite());
        assert_eq!(out.obukhov_length[0], f64::INFINITY, "length the pass ran with");
    }

    #[test]
    fn senescent_canopy_stops_soil_evaporation() {
        let mut input = vegetated();
        input.canopy.f_g = vec![0.0];
        let out = run(&input);

        assert_eq!(out.flag[0], Flag::LatentClipped);
        assert_eq!(out.le_canopy[0], 0.0);
        assert_eq!(out.le_soil[0], 0.0);
        assert_relative_eq!(out.h_canopy[0], out.rn_canopy(0), max_relative = 1e-12);
        assert_closes(&out);
    }

    #[test]
    fn constant_ground_heat_flux_is_kept() {
        let mut input = vegetated();
        input.shortwave.soil = vec![200.0];
        input.soil_heat_flux = SoilHeatFlux::Constant(vec![40.0]);
        let out = run(&input);

        assert!(matches!(out.flag[0], Flag::AllFluxes | Flag::AlphaReduced));
        assert_eq!(out.g[0], 40.0);
        assert_closes(&out);
    }

    #[test]
    fn time_phase_ground_heat_flux_follows_the_sun() {
        let mut input = vegetated();
        input.soil_heat_flux = SoilHeatFlux::TimePhase {
            time: vec![-3.0],
            shape: TimePhase::default(),
        };
        let peak = run(&input);
        assert_ne!(peak.flag[0], Flag::NumericalFailure);
        assert_relative_eq!(peak.g[0], 0.35 * peak.rn_soil(0), max_relative = 1e-9);
        assert_closes(&peak);

        input.soil_heat_flux = SoilHeatFlux::TimePhase {
            time: vec![3.0],
            shape: TimePhase::default(),
        };
        let quarter = run(&input);
        assert_relative_eq!(quarter.g[0], 0.0, epsilon = 1e-9);
        assert_closes(&quarter);
    }

    #[test]
    fn dual_time_bare_soil_uses_temperature_rise() {
        let mut input = dual_time();
        input.canopy.lai = vec![0.0];
        input.canopy.f_c = vec![0.0];
        let out = run(&input);

        assert_eq!(out.flag[0], Flag::AllFluxes);
        assert_eq!(out.h_canopy[0], 0.0);
        assert_eq!(out.sn_soil[0], 400.0);
        assert!(out.richardson[0].is_finite());

        // Surface rose 6 K while the air rose 4 K.
        let met = &input.meteorology;
        let rho_cp =
            air_density(met.p[0], met.ea[0], met.t_air[0]) * heat_capacity(met.p[0], met.ea[0]);
        assert_relative_eq!(out.h_soil[0] * out.r_a[0], 2.0 * rho_cp, max_relative = 1e-9);
        assert_closes(&out);
    }

    #[test]
    fn opaque_canopy_falls_back_to_single_source() {
        let mut input = vegetated();
        input.canopy.lai = vec![80.0];
        let out = run(&input);

        assert_eq!(out.flag[0], Flag::SingleSourceFallback);
        assert_eq!(out.le_canopy[0], 0.0);
        assert!(out.t_canopy[0].is_nan());
        assert_relative_eq!(out.closure_residual(0), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn hot_and_cold_scenes_never_condense() {
        let temperatures = [294.0, 298.0, 302.0, 308.0, 315.0];
        let mut input = repeat(&vegetated(), temperatures.len());
        input.temperatures = Temperatures::PriestleyTaylor {
            t_radiometric: temperatures.to_vec(),
            vza: vec![0.0; temperatures.len()],
        };
        let out = run(&input);
        assert_ne!(out.flag[0], Flag::NumericalFailure);
        assert_closes(&out);
    }

    #[test]
    fn bad_wind_fails_only_its_element() {
        let mut input = repeat(&bare_soil(), 2);
        input.meteorology.u[1] = f64::NAN;
        let out = run(&input);

        assert_ne!(out.flag[0], Flag::NumericalFailure);
        assert_eq!(out.flag[1], Flag::NumericalFailure);
        assert!(out.h_soil[1].is_nan() && out.le_soil[1].is_nan());
        assert!(!out.converged[1]);
    }

    #[test]
    fn invalid_input_fails_the_call() {
        let mut input = vegetated();
        input.meteorology.u.push(1.0);
        assert!(matches!(
            solve(&input, &resistance(), &SolverConfig::default()),
            Err(InputError::LengthMismatch { field: "u", .. })
        ));

        let form = ResistanceForm::KustasNorman1999 {
            c: 0.0,
            b: 0.012,
            c_dash: 90.0,
        };
        assert!(matches!(
            solve(&vegetated(), &form, &SolverConfig::default()),
            Err(InputError::InvalidParameter { .. })
        ));
    }
}
