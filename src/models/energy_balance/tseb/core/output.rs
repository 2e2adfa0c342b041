use super::Flag;

/// Per-element results of one solver call.
///
/// Quantities a model does not produce for an element (the canopy of bare
/// soil, the Richardson number outside the dual-time-difference model) are
/// NaN. Fluxes are in W/m², temperatures in K and resistances in s/m.
#[derive(Debug, Clone, PartialEq)]
pub struct Output {
    /// Quality flag.
    pub flag: Vec<Flag>,
    /// Whether the stability iteration converged.
    pub converged: Vec<bool>,
    /// Number of outer stability passes performed.
    pub iterations: Vec<usize>,

    /// Canopy temperature.
    pub t_canopy: Vec<f64>,
    /// Soil (or single-source surface) temperature.
    pub t_soil: Vec<f64>,
    /// Temperature of the canopy-air space.
    pub t_canopy_air: Vec<f64>,

    /// Net shortwave radiation of the canopy.
    pub sn_canopy: Vec<f64>,
    /// Net shortwave radiation of the soil.
    pub sn_soil: Vec<f64>,
    /// Net longwave radiation of the canopy.
    pub ln_canopy: Vec<f64>,
    /// Net longwave radiation of the soil.
    pub ln_soil: Vec<f64>,

    /// Canopy sensible heat flux.
    pub h_canopy: Vec<f64>,
    /// Soil sensible heat flux.
    pub h_soil: Vec<f64>,
    /// Canopy latent heat flux.
    pub le_canopy: Vec<f64>,
    /// Soil latent heat flux.
    pub le_soil: Vec<f64>,
    /// Ground heat flux.
    pub g: Vec<f64>,

    /// Friction velocity (m/s) of the last stability pass.
    pub u_friction: Vec<f64>,
    /// Obukhov length (m) of the last stability pass; `+∞` is neutral.
    pub obukhov_length: Vec<f64>,
    /// Aerodynamic resistance.
    pub r_a: Vec<f64>,
    /// Leaf boundary-layer resistance.
    pub r_x: Vec<f64>,
    /// Soil-surface resistance.
    pub r_s: Vec<f64>,

    /// Final Priestley-Taylor coefficient.
    pub alpha_pt: Vec<f64>,
    /// Bulk Richardson number.
    pub richardson: Vec<f64>,
}

impl Output {
    /// Output of `len` elements with every quantity unset.
    pub(super) fn unset(len: usize) -> Self {
        let nan = vec![f64::NAN; len];
        Self {
            flag: vec![Flag::AllFluxes; len],
            converged: vec![false; len],
            iterations: vec![0; len],
            t_canopy: nan.clone(),
            t_soil: nan.clone(),
            t_canopy_air: nan.clone(),
            sn_canopy: nan.clone(),
            sn_soil: nan.clone(),
            ln_canopy: nan.clone(),
            ln_soil: nan.clone(),
            h_canopy: nan.clone(),
            h_soil: nan.clone(),
            le_canopy: nan.clone(),
            le_soil: nan.clone(),
            g: nan.clone(),
            u_friction: nan.clone(),
            obukhov_length: nan.clone(),
            r_a: nan.clone(),
            r_x: nan.clone(),
            r_s: nan.clone(),
            alpha_pt: nan.clone(),
            richardson: nan,
        }
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.flag.len()
    }

    /// Returns `true` if the output holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flag.is_empty()
    }

    /// Net radiation of the canopy, `Sn_C + Ln_C`.
    #[must_use]
    pub fn rn_canopy(&self, i: usize) -> f64 {
        self.sn_canopy[i] + self.ln_canopy[i]
    }

    /// Net radiation of the soil, `Sn_S + Ln_S`.
    #[must_use]
    pub fn rn_soil(&self, i: usize) -> f64 {
        self.sn_soil[i] + self.ln_soil[i]
    }

    /// Net radiation of the whole surface.
    #[must_use]
    pub fn net_radiation(&self, i: usize) -> f64 {
        self.rn_canopy(i) + self.rn_soil(i)
    }

    /// Total sensible heat flux.
    #[must_use]
    pub fn sensible(&self, i: usize) -> f64 {
        self.h_canopy[i] + self.h_soil[i]
    }

    /// Total latent heat flux.
    #[must_use]
    pub fn latent(&self, i: usize) -> f64 {
        self.le_canopy[i] + self.le_soil[i]
    }

    /// Share of latent heat from the canopy, `LE_C / LE`.
    ///
    /// NaN when there is no latent heat.
    #[must_use]
    pub fn latent_partition(&self, i: usize) -> f64 {
        self.le_canopy[i] / self.latent(i)
    }

    /// Energy balance residual `Rn - G - H - LE`.
    #[must_use]
    pub fn closure_residual(&self, i: usize) -> f64 {
        self.net_radiation(i) - self.g[i] - self.sensible(i) - self.latent(i)
    }

    /// Joins outputs solved on consecutive slices of one input.
    #[must_use]
    pub fn concat(parts: Vec<Self>) -> Self {
        let mut parts = parts.into_iter();
        let Some(mut joined) = parts.next() else {
            return Self::unset(0);
        };
        for mut part in parts {
            joined.flag.append(&mut part.flag);
            joined.converged.append(&mut part.converged);
            joined.iterations.append(&mut part.iterations);
            for (into, from) in joined.values_mut().into_iter().zip(part.into_values()) {
                into.extend(from);
            }
        }
        joined
    }

    /// Replaces every value of element `i` with NaN and flags it.
    pub(super) fn invalidate(&mut self, i: usize) {
        for values in self.values_mut() {
            values[i] = f64::NAN;
        }
        self.flag[i] = Flag::NumericalFailure;
        self.converged[i] = false;
    }

    /// Returns `true` if every flux, the friction velocity and the aerodynamic
    /// resistance of element `i` are finite.
    pub(super) fn is_finite(&self, i: usize) -> bool {
        [
            self.sn_canopy[i],
            self.sn_soil[i],
            self.ln_canopy[i],
            self.ln_soil[i],
            self.h_canopy[i],
            self.h_soil[i],
            self.le_canopy[i],
            self.le_soil[i],
            self.g[i],
            self.u_friction[i],
            self.r_a[i],
        ]
        .iter()
        .all(|value| value.is_finite())
    }

    fn values_mut(&mut self) -> [&mut Vec<f64>; 19] {
        [
            &mut self.t_canopy,
            &mut self.t_soil,
            &mut self.t_canopy_air,
            &mut self.sn_canopy,
            &mut self.sn_soil,
            &mut self.ln_canopy,
            &mut self.ln_soil,
            &mut self.h_canopy,
            &mut self.h_soil,
            &mut self.le_canopy,
            &mut self.le_soil,
            &mut self.g,
            &mut self.u_friction,
            &mut self.obukhov_length,
            &mut self.r_a,
            &mut self.r_x,
            &mut self.r_s,
            &mut self.alpha_pt,
            &mut self.richardson,
        ]
    }

    fn into_values(self) -> [Vec<f64>; 19] {
        [
            self.t_canopy,
            self.t_soil,
            self.t_canopy_air,
            self.sn_canopy,
            self.sn_soil,
            self.ln_canopy,
            self.ln_soil,
            self.h_canopy,
            self.h_soil,
            self.le_canopy,
            self.le_soil,
            self.g,
            self.u_friction,
            self.obukhov_length,
            self.r_a,
            self.r_x,
            self.r_s,
            self.alpha_pt,
            self.richardson,
        ]
    }
}
