//! Supporting utilities shared by models.
//!
//! - [`constraint`]: Type-level numeric constraints.
//! - [`micromet`]: Surface-layer micrometeorology (air properties, stability,
//!   resistances, radiation).

pub mod constraint;
pub mod micromet;
