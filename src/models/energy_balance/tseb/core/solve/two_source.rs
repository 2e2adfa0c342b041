//! Two-source models that partition a radiometric temperature between soil
//! and canopy, seeded by Priestley-Taylor canopy transpiration.

use log::trace;

use crate::support::micromet::{
    radiation::{soil_temperature_from_composite, two_source_net_longwave},
    stability::obukhov_length_from_richardson,
};

use super::{
    super::{Flag, Output},
    Context,
    backoff::{Backoff, Step},
    iteration::{Failure, iterate},
    network::{Network, priestley_taylor_canopy_heat},
};

/// Convergence tolerance of the Richardson inversion.
const RICHARDSON_TOLERANCE: f64 = 1e-6;

/// Iteration budget of the Richardson inversion.
const RICHARDSON_MAX_ITERS: usize = 100;

/// How soil sensible heat follows from canopy sensible heat.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) enum Seeding<'a> {
    /// Invert the radiometric temperature through the series network.
    PriestleyTaylor,
    /// Drive total sensible heat by the rise of radiometric temperature above
    /// the rise of air temperature since the early observation.
    DualTimeDifference {
        t_radiometric_0: &'a [f64],
        t_air_0: &'a [f64],
    },
}

/// Solves the vegetated `elements` with the Priestley-Taylor seeded model.
///
/// Returns the elements that failed, including those with no physical
/// component temperatures.
pub(super) fn solve(
    ctx: &Context<'_>,
    seeding: Seeding<'_>,
    elements: &[usize],
    out: &mut Output,
) -> Vec<(usize, Failure)> {
    let input = ctx.input;
    let len = input.len();
    let mut f_theta = vec![f64::NAN; len];
    let mut seed = vec![f64::INFINITY; len];
    let mut started = Vec::with_capacity(elements.len());
    let mut failures = Vec::new();

    for &i in elements {
        let t_r = input.temperatures.single_source(i);
        let t_c = t_r.min(input.meteorology.t_air[i]);
        f_theta[i] = ctx.view_fraction(i);
        out.sn_canopy[i] = input.shortwave.canopy[i];
        out.sn_soil[i] = input.shortwave.soil[i];

        let Some(t_s) = soil_temperature_from_composite(t_r, t_c, f_theta[i]) else {
            failures.push((i, Failure::Inversion));
            continue;
        };
        out.t_canopy[i] = t_c;
        out.t_soil[i] = t_s;

        if matches!(seeding, Seeding::DualTimeDifference { .. }) {
            seed[i] = obukhov_length_from_richardson(
                out.richardson[i],
                input.surface.z_u[i],
                ctx.d_0[i],
                ctx.z_0m[i],
                ctx.z_0h(i),
                RICHARDSON_TOLERANCE,
                RICHARDSON_MAX_ITERS,
            )
            .map_or(f64::INFINITY, |l| {
                if l.is_finite() && l.abs() < ctx.limits.min_obukhov_length {
                    ctx.limits.min_obukhov_length.copysign(l)
                } else {
                    l
                }
            });
        }
        started.push(i);
    }

    failures.extend(iterate(
        ctx,
        &started,
        |i| seed[i],
        out,
        |i, out| pass(ctx, seeding, f_theta[i], i, out),
    ));
    failures
}

/// One stability pass of element `i`, including the Priestley-Taylor back-off.
fn pass(
    ctx: &Context<'_>,
    seeding: Seeding<'_>,
    f_theta: f64,
    i: usize,
    out: &mut Output,
) -> Result<(), Failure> {
    let input = ctx.input;
    let met = &input.meteorology;
    let canopy = &input.canopy;
    let t_a = met.t_air[i];
    let t_r = input.temperatures.single_source(i);
    let rho_cp = ctx.rho_cp(i);

    let l = out.obukhov_length[i];
    let flow = ctx.canopy_flow(i, out.u_friction[i], l)?;
    let mut network = Network {
        r_a: ctx.aerodynamic_resistance(i, l)?,
        r_x: ctx.resistance.boundary_layer_resistance(&flow)?,
        r_s: f64::NAN,
    };

    let mut backoff = Backoff::new(
        canopy.alpha_pt[i],
        canopy.f_g[i],
        ctx.config.alpha_step,
        ctx.config.alpha_floor,
    );
    loop {
        let (t_c, t_s) = (out.t_canopy[i], out.t_soil[i]);
        network.r_s = ctx.resistance.soil_resistance(&flow, t_s - t_c)?;

        let longwave = two_source_net_longwave(
            met.l_dn[i],
            t_c,
            t_s,
            canopy.lai[i],
            canopy.emis_c[i],
            input.surface.emis_s[i],
        );
        let rn_c = out.sn_canopy[i] + longwave.canopy;
        let rn_s = out.sn_soil[i] + longwave.soil;
        let mut h_c = priestley_taylor_canopy_heat(
            rn_c,
            canopy.f_g[i],
            backoff.alpha(),
            t_a,
            met.p[i],
            ctx.c_p[i],
        );

        let (t_c, t_s, mut h_s) = match seeding {
            Seeding::PriestleyTaylor => {
                let t_c = network.canopy_temperature(t_r, t_a, f_theta, h_c, rho_cp);
                let t_s = soil_temperature_from_composite(t_r, t_c, f_theta)
                    .ok_or(Failure::Inversion)?;
                network.r_s = ctx.resistance.soil_resistance(&flow, t_s - t_c)?;
                let t_ac = network.canopy_air_temperature(t_a, t_s, t_c);
                (t_c, t_s, rho_cp * (t_s - t_ac) / network.r_s)
            }
            Seeding::DualTimeDifference {
                t_radiometric_0,
                t_air_0,
            } => {
                let h = network.time_difference_sensible_heat(
                    t_r - t_radiometric_0[i],
                    t_a - t_air_0[i],
                    f_theta,
                    h_c,
                    rho_cp,
                );
                let t_c = network.canopy_temperature(t_r, t_a, f_theta, h_c, rho_cp);
                let t_s = soil_temperature_from_composite(t_r, t_c, f_theta)
                    .ok_or(Failure::Inversion)?;
                (t_c, t_s, h - h_c)
            }
        };

        out.t_canopy[i] = t_c;
        out.t_soil[i] = t_s;
        out.t_canopy_air[i] = network.canopy_air_temperature(t_a, t_s, t_c);
        out.ln_canopy[i] = longwave.canopy;
        out.ln_soil[i] = longwave.soil;

        let mut g = input.soil_heat_flux.evaluate(i, rn_s);
        let mut le_s = rn_s - g - h_s;
        let mut le_c = rn_c - h_c;

        let step = backoff.judge(le_s);
        trace!("element {i}: back-off {:?} -> {step:?}", backoff.state());
        let mut flag = match step {
            Step::Retry => continue,
            Step::Accept(flag) => flag,
            Step::NoTranspiration => {
                h_s = h_s.min(rn_s - g);
                g = g.max(rn_s - h_s);
                le_s = 0.0;
                Flag::LatentClipped
            }
            Step::Clip => {
                le_s = 0.0;
                h_s = rn_s - g;
                Flag::SoilLatentClipped
            }
        };

        if le_c < 0.0 {
            h_c = rn_c;
            le_c = 0.0;
            flag = match flag {
                Flag::SoilLatentClipped | Flag::LatentClipped => Flag::LatentClipped,
                _ => Flag::CanopyLatentClipped,
            };
        }

        out.flag[i] = flag;
        out.h_canopy[i] = h_c;
        out.h_soil[i] = h_s;
        out.le_canopy[i] = le_c;
        out.le_soil[i] = le_s;
        out.g[i] = g;
        out.r_a[i] = network.r_a;
        out.r_x[i] = network.r_x;
        out.r_s[i] = network.r_s;
        out.alpha_pt[i] = backoff.alpha();
        return Ok(());
    }
}
