use std::{f64::consts::TAU, ops::Range};

use uom::si::{
    f64::{Ratio, Time},
    ratio::ratio,
    time::hour,
};

use crate::support::constraint::{ConstraintError, StrictlyPositive, UnitInterval};

use super::InputError;

/// Ground heat flux estimator.
///
/// Each variant carries the per-element data its formula is driven by.
#[derive(Debug, Clone, PartialEq)]
pub enum SoilHeatFlux {
    /// Prescribed ground heat flux (W/m²) per element.
    Constant(Vec<f64>),

    /// Fraction of the net radiation reaching the soil, per element.
    Ratio(Vec<f64>),

    /// Fraction of soil net radiation that follows the diurnal cycle
    /// (Santanello and Friedl, 2003):
    /// `G = A · Rn_S · cos(2π (t + shift) / period)`.
    TimePhase {
        /// Time relative to solar noon (decimal hours) per element.
        time: Vec<f64>,
        /// Shape of the diurnal cycle.
        shape: TimePhase,
    },
}

/// Coefficients of the diurnal soil heat flux cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimePhase {
    /// Peak ratio of ground heat flux to soil net radiation.
    pub amplitude: Ratio,
    /// Phase shift of the peak relative to solar noon.
    pub phase_shift: Time,
    /// Period of the cycle.
    pub period: Time,
}

impl Default for TimePhase {
    fn default() -> Self {
        Self {
            amplitude: Ratio::new::<ratio>(0.35),
            phase_shift: Time::new::<hour>(3.0),
            period: Time::new::<hour>(24.0),
        }
    }
}

impl TimePhase {
    /// Ratio `G / Rn_S` at `time` hours from solar noon.
    #[must_use]
    pub fn ratio_at(&self, time: f64) -> f64 {
        let shift = self.phase_shift.get::<hour>();
        let period = self.period.get::<hour>();
        self.amplitude.get::<ratio>() * (TAU * (time + shift) / period).cos()
    }
}

impl SoilHeatFlux {
    /// Ground heat flux (W/m²) of element `i` given its soil net radiation.
    #[must_use]
    pub fn evaluate(&self, i: usize, rn_soil: f64) -> f64 {
        match self {
            Self::Constant(g) => g[i],
            Self::Ratio(fractions) => fractions[i] * rn_soil,
            Self::TimePhase { time, shape } => shape.ratio_at(time[i]) * rn_soil,
        }
    }

    /// Name and length of the driving array.
    pub(super) fn driver(&self) -> (&'static str, usize) {
        match self {
            Self::Constant(g) => ("soil_heat_flux", g.len()),
            Self::Ratio(fractions) => ("soil_heat_flux_ratio", fractions.len()),
            Self::TimePhase { time, .. } => ("time", time.len()),
        }
    }

    pub(super) fn validate(&self) -> Result<(), InputError> {
        let Self::TimePhase { shape, .. } = self else {
            return Ok(());
        };
        let invalid = |name: &'static str| {
            move |source: ConstraintError| InputError::InvalidParameter { name, source }
        };
        UnitInterval::new(shape.amplitude).map_err(invalid("amplitude"))?;
        StrictlyPositive::new(shape.period).map_err(invalid("period"))?;
        Ok(())
    }

    pub(super) fn slice(&self, range: Range<usize>) -> Self {
        match self {
            Self::Constant(g) => Self::Constant(g[range].to_vec()),
            Self::Ratio(fractions) => Self::Ratio(fractions[range].to_vec()),
            Self::TimePhase { time, shape } => Self::TimePhase {
                time: time[range].to_vec(),
                shape: *shape,
            },
        }
    }
}
