//! Two-source energy balance over arrays of independent elements.
//!
//! An element is one pixel or one record. Its fluxes depend only on its own
//! inputs, so a call over `n` elements gives the same per-element results as
//! `n` single-element calls.
//!
//! The variant of [`Temperatures`] picks the model:
//!
//! - single-source (OSEB) on a surface temperature,
//! - Priestley-Taylor seeded TSEB on a radiometric temperature,
//! - dual-time-difference TSEB on morning and midday observations,
//! - TSEB on separately observed canopy and soil temperatures.
//!
//! Bare-soil elements of the two-source variants are solved as a single
//! source. Per-element problems never fail a call; they are reported through
//! [`Flag`] and [`Output::converged`].

mod config;
mod convergence;
mod error;
mod flag;
mod input;
mod mask;
mod output;
mod soil_heat_flux;
mod solve;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::SolverConfig;
pub use error::InputError;
pub use flag::Flag;
pub use input::{Canopy, Input, Meteorology, Shortwave, Surface, Temperatures};
pub use output::Output;
pub use soil_heat_flux::{SoilHeatFlux, TimePhase};

pub(super) use solve::solve;

use mask::Mask;
