/// Per-element quality flag.
///
/// Convergence is reported separately in [`Output::converged`](super::Output),
/// so any flag can be paired with an exhausted iteration budget.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Flag {
    /// Every flux was computed without repair.
    #[default]
    AllFluxes = 0,
    /// Soil latent heat was clipped to zero.
    SoilLatentClipped = 1,
    /// Canopy latent heat was clipped to zero.
    CanopyLatentClipped = 2,
    /// All latent heat was clipped to zero.
    LatentClipped = 3,
    /// The Priestley-Taylor coefficient was reduced to keep soil latent heat
    /// non-negative.
    AlphaReduced = 4,
    /// No physical component temperatures exist, so the element was solved as
    /// a single source on its composite temperature.
    SingleSourceFallback = 5,
    /// The element produced non-finite values and all its outputs are NaN.
    NumericalFailure = 255,
}

impl Flag {
    /// Numeric code of the flag.
    #[must_use]
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Returns `true` if any latent heat flux was clipped to zero.
    #[must_use]
    pub fn is_clipped(self) -> bool {
        matches!(
            self,
            Self::SoilLatentClipped | Self::CanopyLatentClipped | Self::LatentClipped
        )
    }

    /// Combines soil and canopy clipping into one flag.
    pub(super) fn from_clipping(soil: bool, canopy: bool) -> Self {
        match (soil, canopy) {
            (false, false) => Self::AllFluxes,
            (true, false) => Self::SoilLatentClipped,
            (false, true) => Self::CanopyLatentClipped,
            (true, true) => Self::LatentClipped,
        }
    }
}

impl From<Flag> for u8 {
    fn from(flag: Flag) -> Self {
        flag.code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes() {
        assert_eq!(Flag::AllFluxes.code(), 0);
        assert_eq!(u8::from(Flag::AlphaReduced), 4);
        assert_eq!(Flag::NumericalFailure.code(), 255);
    }

    #[test]
    fn clipping_combinations() {
        assert_eq!(Flag::from_clipping(false, false), Flag::AllFluxes);
        assert_eq!(Flag::from_clipping(true, true), Flag::LatentClipped);
        assert!(Flag::from_clipping(true, false).is_clipped());
        assert!(!Flag::SingleSourceFallback.is_clipped());
    }
}
