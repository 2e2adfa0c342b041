use log::{debug, warn};

use crate::support::micromet::{ProfileError, stability::monin_obukhov_length};

use super::super::{Mask, Output, convergence::History};
use super::Context;

/// Why a solver pass gave up on an element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) enum Failure {
    /// A resistance or stability profile could not be evaluated.
    Profile(ProfileError),
    /// No soil temperature matches the composite radiometric temperature.
    Inversion,
}

impl From<ProfileError> for Failure {
    fn from(error: ProfileError) -> Self {
        Self::Profile(error)
    }
}

/// Runs the outer stability iteration over `elements`.
///
/// Every element starts from the Obukhov length `seed(i)`. Each pass calls
/// `pass` with the current friction velocity and Obukhov length in `out`, then
/// derives new ones from the fluxes it wrote. An element leaves the iteration
/// once its Obukhov length settles or its sensible heat stops changing, or
/// when `pass` fails.
///
/// The friction velocity and Obukhov length left in `out` are the ones the
/// last pass of each element ran with, so they match its fluxes and `r_a`.
///
/// Returns the elements that failed.
pub(super) fn iterate<S, P>(
    ctx: &Context<'_>,
    elements: &[usize],
    seed: S,
    out: &mut Output,
    mut pass: P,
) -> Vec<(usize, Failure)>
where
    S: Fn(usize) -> f64,
    P: FnMut(usize, &mut Output) -> Result<(), Failure>,
{
    let met = &ctx.input.meteorology;
    let mut history = History::new(out.len());
    let mut previous_h = vec![f64::NAN; out.len()];
    let mut active = Mask::none(out.len());
    let mut used = vec![(f64::NAN, f64::NAN); out.len()];
    let mut failures = Vec::new();

    for &i in elements {
        let l = seed(i);
        out.obukhov_length[i] = l;
        out.converged[i] = false;
        match ctx.friction_velocity(i, l) {
            Ok(u_star) => {
                out.u_friction[i] = u_star;
                history.push(i, l);
                active.insert(i);
            }
            Err(error) => failures.push((i, error.into())),
        }
    }

    for iteration in 1..=ctx.config.max_iterations {
        if active.is_empty() {
            break;
        }
        let mut largest_change = 0.0_f64;

        for i in active.indices() {
            out.iterations[i] = iteration;
            used[i] = (out.obukhov_length[i], out.u_friction[i]);
            if let Err(failure) = pass(i, &mut *out) {
                failures.push((i, failure));
                active.remove(i);
                continue;
            }

            let h = out.sensible(i);
            let l = monin_obukhov_length(
                out.u_friction[i],
                met.t_air[i],
                ctx.rho[i],
                ctx.c_p[i],
                h,
                out.latent(i),
                ctx.limits.min_obukhov_length,
            );
            out.obukhov_length[i] = l;
            history.push(i, l);
            match ctx.friction_velocity(i, l) {
                Ok(u_star) => out.u_friction[i] = u_star,
                Err(error) => {
                    failures.push((i, error.into()));
                    active.remove(i);
                    continue;
                }
            }

            let change = history.last_change(i);
            if change.is_finite() {
                largest_change = largest_change.max(change);
            }
            let flux_settled = (h - previous_h[i]).abs() < ctx.limits.flux_tolerance;
            previous_h[i] = h;
            if flux_settled || history.has_converged(i, ctx.limits.stability_tolerance) {
                out.converged[i] = true;
                active.remove(i);
            }
        }

        debug!(
            "stability pass {iteration}: {} elements still iterating, largest change in L {largest_change:.3e}",
            active.count()
        );
    }

    if !active.is_empty() {
        warn!(
            "{} elements did not converge within {} stability passes",
            active.count(),
            ctx.config.max_iterations
        );
    }

    for &i in elements {
        let (l, u_star) = used[i];
        if !l.is_nan() {
            out.obukhov_length[i] = l;
            out.u_friction[i] = u_star;
        }
    }

    failures
}
