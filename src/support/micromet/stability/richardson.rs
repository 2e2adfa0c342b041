//! Bulk Richardson number and its inversion to an Obukhov length.
//!
//! The inversion is posed as a one-dimensional equation in the stability
//! parameter `ζ = (z_u - d_0) / L` and solved by bisection.

use std::convert::Infallible;

use log::trace;
use twine_core::{EquationProblem, Model};
use twine_solvers::equation::bisection;

use super::{GRAVITY, ProfileError, heat_profile, momentum_profile};

/// Search interval for the stability parameter.
const ZETA_BRACKET: [f64; 2] = [-10.0, 10.0];

/// Bulk Richardson number from the morning rise of surface and air temperature.
///
/// `t_r0`/`t_r1` are radiometric temperatures and `t_a0`/`t_a1` air
/// temperatures (K) at the early and late observation times. `u` is the wind
/// speed (m/s) at the late time, measured at `z_u` above a surface with
/// displacement height `d_0`.
///
/// A surface that warms faster than the air gives a negative (unstable) number.
#[must_use]
pub fn bulk_richardson(
    u: f64,
    z_u: f64,
    d_0: f64,
    t_r0: f64,
    t_r1: f64,
    t_a0: f64,
    t_a1: f64,
) -> f64 {
    let delta = (t_r1 - t_r0) - (t_a1 - t_a0);
    -(GRAVITY * (z_u - d_0) / t_a1) * delta / (u * u)
}

/// Obukhov length (m) consistent with a bulk Richardson number.
///
/// Returns `None` if no stability parameter in `[-10, 10]` reproduces `ri`
/// within `tolerance`, or if the profile is degenerate. Callers fall back to
/// neutral conditions.
#[must_use]
pub fn obukhov_length_from_richardson(
    ri: f64,
    z_u: f64,
    d_0: f64,
    z_0m: f64,
    z_0h: f64,
    tolerance: f64,
    max_iters: usize,
) -> Option<f64> {
    if !ri.is_finite() {
        return None;
    }
    if ri == 0.0 {
        return Some(f64::INFINITY);
    }

    let model = RichardsonModel {
        z: z_u - d_0,
        z_0m,
        z_0h,
    };
    let problem = RichardsonProblem { target: ri };
    let config = bisection::Config {
        max_iters,
        x_abs_tol: 1e-12,
        x_rel_tol: 0.0,
        residual_tol: tolerance,
    };

    let solution = bisection::solve(
        &model,
        &problem,
        ZETA_BRACKET,
        &config,
        |event: &bisection::Event<'_, _, _>| {
            // Degenerate profiles occur deep in the stable range.
            if event.result().is_err() {
                return Some(bisection::Action::assume_positive());
            }
            None
        },
    )
    .ok()?;

    if solution.status != bisection::Status::Converged {
        trace!(
            "richardson inversion stalled: ri={ri}, residual={}, iters={}",
            solution.residual, solution.iters
        );
        return None;
    }

    let zeta = solution.snapshot.output.zeta;
    Some(if zeta == 0.0 { f64::INFINITY } else { model.z / zeta })
}

/// Evaluates the bulk Richardson number implied by a stability parameter.
struct RichardsonModel {
    z: f64,
    z_0m: f64,
    z_0h: f64,
}

#[derive(Debug, Clone, Copy)]
struct RichardsonState {
    zeta: f64,
    richardson: f64,
}

impl Model for RichardsonModel {
    type Input = f64;
    type Output = RichardsonState;
    type Error = ProfileError;

    fn call(&self, zeta: &f64) -> Result<RichardsonState, ProfileError> {
        let zeta = *zeta;
        let l = if zeta == 0.0 {
            f64::INFINITY
        } else {
            self.z / zeta
        };
        let momentum = momentum_profile(self.z, 0.0, self.z_0m, l)?;
        let heat = heat_profile(self.z, 0.0, self.z_0h, l)?;
        Ok(RichardsonState {
            zeta,
            richardson: zeta * heat / (momentum * momentum),
        })
    }
}

/// Residual `Ri(ζ) - Ri_target`.
struct RichardsonProblem {
    target: f64,
}

impl EquationProblem<1> for RichardsonProblem {
    type Input = f64;
    type Output = RichardsonState;
    type Error = Infallible;

    fn input(&self, x: &[f64; 1]) -> Result<f64, Infallible> {
        Ok(x[0])
    }

    fn residuals(&self, _input: &f64, output: &RichardsonState) -> Result<[f64; 1], Infallible> {
        Ok([output.richardson - self.target])
    }
}
