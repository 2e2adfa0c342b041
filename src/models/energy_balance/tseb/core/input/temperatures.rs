use std::ops::Range;

/// Observed temperatures, one variant per model.
///
/// The variant decides which solver runs, and carries only the arrays that
/// solver needs.
#[derive(Debug, Clone, PartialEq)]
pub enum Temperatures {
    /// Single-source (OSEB) model on a surface temperature (K).
    SingleSource { t_surface: Vec<f64> },

    /// Two-source model seeded by Priestley-Taylor canopy transpiration.
    PriestleyTaylor {
        /// Directional radiometric temperature (K).
        t_radiometric: Vec<f64>,
        /// View zenith angle (degrees).
        vza: Vec<f64>,
    },

    /// Two-source model driven by the rise of radiometric and air temperature
    /// between an early (`_0`) and a late observation.
    ///
    /// The late air temperature is `Meteorology::t_air`.
    DualTimeDifference {
        /// Radiometric temperature (K) at the early time.
        t_radiometric_0: Vec<f64>,
        /// Radiometric temperature (K) at the late time.
        t_radiometric_1: Vec<f64>,
        /// Air temperature (K) at the early time.
        t_air_0: Vec<f64>,
        /// View zenith angle (degrees) at the late time.
        vza: Vec<f64>,
    },

    /// Two-source model on observed canopy and soil temperatures (K).
    Components {
        t_canopy: Vec<f64>,
        t_soil: Vec<f64>,
    },
}

impl Temperatures {
    /// Temperature (K) a single-source solve of element `i` uses.
    ///
    /// This is the (late) radiometric temperature, or the soil temperature
    /// when components are observed.
    pub(in super::super) fn single_source(&self, i: usize) -> f64 {
        match self {
            Self::SingleSource { t_surface } => t_surface[i],
            Self::PriestleyTaylor { t_radiometric, .. } => t_radiometric[i],
            Self::DualTimeDifference {
                t_radiometric_1, ..
            } => t_radiometric_1[i],
            Self::Components { t_soil, .. } => t_soil[i],
        }
    }

    /// View zenith angle of element `i`, nadir when not observed.
    pub(in super::super) fn view_zenith(&self, i: usize) -> f64 {
        match self {
            Self::PriestleyTaylor { vza, .. } | Self::DualTimeDifference { vza, .. } => vza[i],
            Self::SingleSource { .. } | Self::Components { .. } => 0.0,
        }
    }

    pub(super) fn lengths(&self) -> Vec<(&'static str, usize)> {
        match self {
            Self::SingleSource { t_surface } => vec![("t_surface", t_surface.len())],
            Self::PriestleyTaylor { t_radiometric, vza } => vec![
                ("t_radiometric", t_radiometric.len()),
                ("vza", vza.len()),
            ],
            Self::DualTimeDifference {
                t_radiometric_0,
                t_radiometric_1,
                t_air_0,
                vza,
            } => vec![
                ("t_radiometric_0", t_radiometric_0.len()),
                ("t_radiometric_1", t_radiometric_1.len()),
                ("t_air_0", t_air_0.len()),
                ("vza", vza.len()),
            ],
            Self::Components { t_canopy, t_soil } => vec![
                ("t_canopy", t_canopy.len()),
                ("t_soil", t_soil.len()),
            ],
        }
    }

    pub(super) fn slice(&self, range: Range<usize>) -> Self {
        let take = |values: &[f64]| values[range.clone()].to_vec();
        match self {
            Self::SingleSource { t_surface } => Self::SingleSource {
                t_surface: take(t_surface),
            },
            Self::PriestleyTaylor { t_radiometric, vza } => Self::PriestleyTaylor {
                t_radiometric: take(t_radiometric),
                vza: take(vza),
            },
            Self::DualTimeDifference {
                t_radiometric_0,
                t_radiometric_1,
                t_air_0,
                vza,
            } => Self::DualTimeDifference {
                t_radiometric_0: take(t_radiometric_0),
                t_radiometric_1: take(t_radiometric_1),
                t_air_0: take(t_air_0),
                vza: take(vza),
            },
            Self::Components { t_canopy, t_soil } => Self::Components {
                t_canopy: take(t_canopy),
                t_soil: take(t_soil),
            },
        }
    }
}
