//! Two-source energy balance (TSEB) models.
//!
//! This module provides a [`twine_core::Model`] implementation that partitions
//! available energy between soil and canopy for arrays of pixels or records.
//! The computational core is in the internal [`core`] module.
//!
//! # Example
//!
//! ```
//! use tseb_models::models::energy_balance::tseb::{
//!     Canopy, Input, Meteorology, Shortwave, SoilHeatFlux, Surface, Temperatures, Tseb,
//! };
//! use twine_core::Model;
//!
//! let input = Input {
//!     temperatures: Temperatures::PriestleyTaylor {
//!         t_radiometric: vec![301.0],
//!         vza: vec![0.0],
//!     },
//!     meteorology: Meteorology {
//!         t_air: vec![300.0],
//!         u: vec![2.0],
//!         ea: vec![15.0],
//!         p: vec![1013.0],
//!         l_dn: vec![350.0],
//!     },
//!     shortwave: Shortwave {
//!         canopy: vec![320.0],
//!         soil: vec![80.0],
//!     },
//!     canopy: Canopy {
//!         lai: vec![3.0],
//!         h_c: vec![1.0],
//!         f_c: vec![1.0],
//!         w_c: vec![1.0],
//!         f_g: vec![1.0],
//!         x_lad: vec![1.0],
//!         omega0: vec![1.0],
//!         leaf_width: vec![0.1],
//!         emis_c: vec![0.98],
//!         alpha_pt: vec![1.26],
//!     },
//!     surface: Surface {
//!         emis_s: vec![0.95],
//!         z0_soil: vec![0.01],
//!         z_0m: vec![0.125],
//!         d_0: vec![0.65],
//!         z_u: vec![5.0],
//!         z_t: vec![5.0],
//!     },
//!     soil_heat_flux: SoilHeatFlux::Ratio(vec![0.35]),
//! };
//!
//! let output = Tseb::default().call(&input)?;
//! assert!(output.le_canopy[0] > output.le_soil[0]);
//! # Ok::<(), tseb_models::models::energy_balance::tseb::InputError>(())
//! ```

pub(crate) mod core;

pub use self::core::{
    Canopy, Flag, Input, InputError, Meteorology, Output, Shortwave, SoilHeatFlux, SolverConfig,
    Surface, Temperatures, TimePhase,
};
pub use crate::support::micromet::resistance::ResistanceForm;

use twine_core::Model;

/// Two-source energy balance model.
///
/// The resistance parameterisation and solver settings are fixed per model
/// instance. Each call solves every element of its [`Input`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Tseb {
    pub resistance: ResistanceForm,
    pub config: SolverConfig,
}

impl Tseb {
    /// Creates a model with the given resistance form and default settings.
    #[must_use]
    pub fn new(resistance: ResistanceForm) -> Self {
        Self {
            resistance,
            config: SolverConfig::default(),
        }
    }

    /// Replaces the solver settings.
    #[must_use]
    pub fn with_config(self, config: SolverConfig) -> Self {
        Self { config, ..self }
    }

    /// Solves `input` in tiles of `tile_len` elements on the rayon thread pool.
    ///
    /// Elements are independent, so the result equals [`Model::call`].
    ///
    /// # Errors
    ///
    /// Returns an [`InputError`] if the input is inconsistent or a parameter is
    /// out of range.
    #[cfg(feature = "rayon")]
    pub fn call_tiled(&self, input: &Input, tile_len: usize) -> Result<Output, InputError> {
        use rayon::prelude::*;

        let len = input.validate()?;
        let tile_len = tile_len.max(1);
        let tiles: Vec<_> = (0..len)
            .step_by(tile_len)
            .map(|start| start..(start + tile_len).min(len))
            .collect();

        let parts = tiles
            .par_iter()
            .map(|range| self.call(&input.slice(range.clone())))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Output::concat(parts))
    }
}

impl Model for Tseb {
    type Input = Input;
    type Output = Output;
    type Error = InputError;

    fn call(&self, input: &Input) -> Result<Output, InputError> {
        self::core::solve(input, &self.resistance, &self.config)
    }
}
