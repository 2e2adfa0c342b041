//! Land-surface energy balance models.
//!
//! This module contains models that partition available energy at a
//! vegetated or bare land surface into turbulent and conductive fluxes.

pub mod tseb;
