//! Two-source model on separately observed canopy and soil temperatures.

use crate::support::micromet::radiation::two_source_net_longwave;

use super::{
    super::{Flag, Output},
    Context,
    iteration::{Failure, iterate},
    network::Network,
};

/// Solves the vegetated `elements` given their canopy and soil temperatures.
///
/// Net radiation and ground heat flux do not depend on stability, so they are
/// computed once. Returns the elements whose resistances failed.
pub(super) fn solve(
    ctx: &Context<'_>,
    t_canopy: &[f64],
    t_soil: &[f64],
    elements: &[usize],
    out: &mut Output,
) -> Vec<(usize, Failure)> {
    let input = ctx.input;
    for &i in elements {
        let longwave = two_source_net_longwave(
            input.meteorology.l_dn[i],
            t_canopy[i],
            t_soil[i],
            input.canopy.lai[i],
            input.canopy.emis_c[i],
            input.surface.emis_s[i],
        );
        out.t_canopy[i] = t_canopy[i];
        out.t_soil[i] = t_soil[i];
        out.sn_canopy[i] = input.shortwave.canopy[i];
        out.sn_soil[i] = input.shortwave.soil[i];
        out.ln_canopy[i] = longwave.canopy;
        out.ln_soil[i] = longwave.soil;
        out.g[i] = input.soil_heat_flux.evaluate(i, out.rn_soil(i));
    }

    iterate(ctx, elements, |_| f64::INFINITY, out, |i, out| {
        let (t_c, t_s) = (t_canopy[i], t_soil[i]);
        let t_a = input.meteorology.t_air[i];
        let rho_cp = ctx.rho_cp(i);

        let l = out.obukhov_length[i];
        let flow = ctx.canopy_flow(i, out.u_friction[i], l)?;
        let network = Network {
            r_a: ctx.aerodynamic_resistance(i, l)?,
            r_x: ctx.resistance.boundary_layer_resistance(&flow)?,
            r_s: ctx.resistance.soil_resistance(&flow, t_s - t_c)?,
        };
        let t_ac = network.canopy_air_temperature(t_a, t_s, t_c);

        let rn_c = out.rn_canopy(i);
        let rn_s = out.rn_soil(i);
        let g = out.g[i];
        let mut h_c = rho_cp * (t_c - t_ac) / network.r_x;
        let mut h_s = rho_cp * (t_s - t_ac) / network.r_s;
        let mut le_c = rn_c - h_c;
        let mut le_s = rn_s - g - h_s;

        let canopy_clipped = le_c < 0.0;
        if canopy_clipped {
            h_c = rn_c;
            le_c = 0.0;
        }
        let soil_clipped = le_s < 0.0;
        if soil_clipped {
            h_s = rn_s - g;
            le_s = 0.0;
        }

        out.flag[i] = Flag::from_clipping(soil_clipped, canopy_clipped);
        out.t_canopy_air[i] = t_ac;
        out.h_canopy[i] = h_c;
        out.h_soil[i] = h_s;
        out.le_canopy[i] = le_c;
        out.le_soil[i] = le_s;
        out.r_a[i] = network.r_a;
        out.r_x[i] = network.r_x;
        out.r_s[i] = network.r_s;
        Ok(())
    })
}
