//! One-source energy balance.

use crate::support::micromet::radiation::bare_soil_net_longwave;

use super::{
    super::{Flag, Output, Temperatures},
    Context,
    iteration::{Failure, iterate},
};

/// Surface temperature, temperature gradient, net shortwave and emissivity of
/// the elements a single-source solve covers.
pub(super) struct Forcing {
    t_surface: Vec<f64>,
    gradient: Vec<f64>,
    sn: Vec<f64>,
    emis: Vec<f64>,
}

impl Forcing {
    /// Forcing for `elements`, with the surface emissivity given by `emis`.
    ///
    /// The whole shortwave budget goes to the single source. The dual-time
    /// model drives sensible heat by the rise of surface temperature above
    /// the rise of air temperature, every other model by the difference
    /// between surface and air temperature.
    pub(super) fn new(ctx: &Context<'_>, elements: &[usize], emis: impl Fn(usize) -> f64) -> Self {
        let input = ctx.input;
        let len = input.len();
        let mut forcing = Self {
            t_surface: vec![f64::NAN; len],
            gradient: vec![f64::NAN; len],
            sn: vec![f64::NAN; len],
            emis: vec![f64::NAN; len],
        };
        for &i in elements {
            let t_surface = input.temperatures.single_source(i);
            let t_air = input.meteorology.t_air[i];
            forcing.t_surface[i] = t_surface;
            forcing.gradient[i] = match &input.temperatures {
                Temperatures::DualTimeDifference {
                    t_radiometric_0,
                    t_air_0,
                    ..
                } => (t_surface - t_radiometric_0[i]) - (t_air - t_air_0[i]),
                _ => t_surface - t_air,
            };
            forcing.sn[i] = input.shortwave.canopy[i] + input.shortwave.soil[i];
            forcing.emis[i] = emis(i);
        }
        forcing
    }
}

/// Solves `elements` as a single source and writes every result into the
/// soil slots of `out`.
///
/// Returns the elements whose resistances could not be evaluated.
pub(super) fn solve(
    ctx: &Context<'_>,
    elements: &[usize],
    forcing: &Forcing,
    out: &mut Output,
) -> Vec<(usize, Failure)> {
    let met = &ctx.input.meteorology;
    for &i in elements {
        let ln = bare_soil_net_longwave(met.l_dn[i], forcing.t_surface[i], forcing.emis[i]);
        out.flag[i] = Flag::AllFluxes;
        out.t_soil[i] = forcing.t_surface[i];
        out.t_canopy[i] = f64::NAN;
        out.t_canopy_air[i] = f64::NAN;
        out.sn_canopy[i] = 0.0;
        out.ln_canopy[i] = 0.0;
        out.h_canopy[i] = 0.0;
        out.le_canopy[i] = 0.0;
        out.sn_soil[i] = forcing.sn[i];
        out.ln_soil[i] = ln;
        out.g[i] = ctx.input.soil_heat_flux.evaluate(i, forcing.sn[i] + ln);
        out.r_x[i] = f64::NAN;
        out.r_s[i] = f64::NAN;
        out.alpha_pt[i] = f64::NAN;
    }

    let failures = iterate(
        ctx,
        elements,
        |_| f64::INFINITY,
        out,
        |i, out| {
            let r_a = ctx.aerodynamic_resistance(i, out.obukhov_length[i])?;
            let h = ctx.rho_cp(i) * forcing.gradient[i] / r_a;
            out.r_a[i] = r_a;
            out.h_soil[i] = h;
            out.le_soil[i] = out.rn_soil(i) - out.g[i] - h;
            Ok(())
        },
    );

    for &i in elements {
        if out.le_soil[i] < 0.0 {
            out.le_soil[i] = 0.0;
            out.h_soil[i] = out.rn_soil(i) - out.g[i];
            out.flag[i] = Flag::LatentClipped;
        }
    }

    failures
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use crate::models::energy_balance::tseb::core::{
        Flag, SolverConfig, Temperatures, solve,
        test_support::{bare_soil, resistance},
    };

    #[test]
    fn warm_surface_loses_sensible_heat() {
        let out = solve(&bare_soil(), &resistance(), &SolverConfig::default()).unwrap();

        assert_eq!(out.flag[0], Flag::AllFluxes);
        assert!(out.converged[0]);
        assert!(out.h_soil[0] > 0.0);
        assert!(out.le_soil[0] >= 0.0);
        assert_eq!(out.h_canopy[0], 0.0);
        assert_eq!(out.le_canopy[0], 0.0);
        assert!(out.obukhov_length[0] < 0.0, "unstable surface layer");
        assert_relative_eq!(out.closure_residual(0), 0.0, epsilon = 1e-9);
        assert!(out.t_canopy[0].is_nan() && out.r_x[0].is_nan());
    }

    #[test]
    fn cold_surface_is_stable() {
        let mut input = bare_soil();
        input.temperatures = Temperatures::SingleSource {
            t_surface: vec![296.0],
        };
        let out = solve(&input, &resistance(), &SolverConfig::default()).unwrap();

        assert!(out.h_soil[0] < 0.0);
        assert!(out.le_soil[0] > 0.0);
        assert_relative_eq!(out.closure_residual(0), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn latent_heat_is_clipped_without_energy() {
        let mut input = bare_soil();
        input.shortwave.soil = vec![0.0];
        input.shortwave.canopy = vec![0.0];
        let out = solve(&input, &resistance(), &SolverConfig::default()).unwrap();

        assert_eq!(out.flag[0], Flag::LatentClipped);
        assert_eq!(out.le_soil[0], 0.0);
        assert_relative_eq!(out.closure_residual(0), 0.0, epsilon = 1e-9);
    }
}
