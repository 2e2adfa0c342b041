use super::super::Flag;

/// Progress of the Priestley-Taylor back-off of one element in one pass.
///
/// Transpiration starts at its potential rate. When the soil would need to
/// condense to close the balance, the coefficient is lowered step by step
/// until soil latent heat becomes non-negative or the floor is reached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) enum State {
    /// First evaluation at the configured coefficient.
    Seed(f64),
    /// Evaluation at a reduced coefficient.
    Adjust(f64),
    /// The fluxes at this coefficient were kept.
    Accept(f64),
    /// The coefficient reached its floor and soil latent heat was clipped.
    BoundedReject(f64),
}

/// What the caller does with the fluxes it just evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Step {
    /// Evaluate again at the lowered coefficient.
    Retry,
    /// Keep the fluxes.
    Accept(Flag),
    /// The canopy no longer transpires; remove latent heat from the soil too.
    NoTranspiration,
    /// Keep the canopy fluxes and clip soil latent heat to zero.
    Clip,
}

#[derive(Debug, Clone, Copy)]
pub(super) struct Backoff {
    initial: f64,
    /// Green fraction of the canopy; only green leaves transpire.
    f_g: f64,
    step: f64,
    floor: f64,
    state: State,
}

impl Backoff {
    pub(super) fn new(alpha: f64, f_g: f64, step: f64, floor: f64) -> Self {
        Self {
            initial: alpha,
            f_g,
            step,
            floor,
            state: State::Seed(alpha),
        }
    }

    /// Coefficient of the current evaluation.
    pub(super) fn alpha(&self) -> f64 {
        match self.state {
            State::Seed(alpha)
            | State::Adjust(alpha)
            | State::Accept(alpha)
            | State::BoundedReject(alpha) => alpha,
        }
    }

    pub(super) fn state(&self) -> State {
        self.state
    }

    /// Judges the soil latent heat evaluated at [`Backoff::alpha`].
    pub(super) fn judge(&mut self, le_soil: f64) -> Step {
        let alpha = self.alpha();
        let (step, state) = if alpha * self.f_g <= 0.0 {
            (Step::NoTranspiration, State::Accept(alpha))
        } else if le_soil >= 0.0 {
            let flag = if alpha < self.initial {
                Flag::AlphaReduced
            } else {
                Flag::AllFluxes
            };
            (Step::Accept(flag), State::Accept(alpha))
        } else if alpha <= self.floor {
            (Step::Clip, State::BoundedReject(alpha))
        } else {
            let lowered = (alpha - self.step).max(self.floor).max(0.0);
            (Step::Retry, State::Adjust(lowered))
        };
        self.state = state;
        step
    }
}
