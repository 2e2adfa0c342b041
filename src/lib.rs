//! # TSEB Models
//!
//! Surface energy balance models for [Twine](https://github.com/isentropic-dev/twine).
//!
//! The models estimate net radiation, soil heat flux, sensible heat flux and
//! latent heat flux (evapotranspiration) from remotely sensed land-surface
//! temperature and ancillary meteorological and vegetation inputs.
//!
//! ## Crate layout
//!
//! - [`models`]: Domain-specific [`twine_core::Model`] implementations.
//! - [`support`]: Supporting utilities used by models.
//!
//! ## Utility code lifecycle
//!
//! Modules in [`support`] are part of the public API because they're useful,
//! but their APIs are not stable. Breaking changes may occur as needed.
//!
//! Utility code starts in a model's internal `core` module and moves to
//! [`support`] once it is useful outside that model. The surface-layer
//! micrometeorology in [`support::micromet`] is shared by every energy
//! balance variant and by any future single-source model (SEBS, METRIC).

pub mod models;
pub mod support;
