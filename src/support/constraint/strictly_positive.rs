use std::cmp::Ordering;

use num_traits::Zero;

use super::{Constrained, Constraint, ConstraintError};

/// Marker type enforcing that a value is strictly positive (greater than zero).
///
/// Resistances, roughness lengths and measurement heights all carry this
/// constraint: a zero value would collapse the logarithmic wind profile.
///
/// # Examples
///
/// ```
/// use tseb_models::support::constraint::{Constrained, StrictlyPositive};
///
/// let z_u = Constrained::<_, StrictlyPositive>::new(10.0).unwrap();
/// assert_eq!(z_u.into_inner(), 10.0);
///
/// let c_dash = StrictlyPositive::new(90.0).unwrap();
/// assert_eq!(c_dash.into_inner(), 90.0);
///
/// assert!(StrictlyPositive::new(0.0).is_err());
/// assert!(StrictlyPositive::new(-1.0).is_err());
/// assert!(StrictlyPositive::new(f64::NAN).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct StrictlyPositive;

impl StrictlyPositive {
    /// Constructs a [`Constrained<T, StrictlyPositive>`] if the value is strictly positive.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is zero, negative, or not a number (`NaN`).
    pub fn new<T: PartialOrd + Zero>(
        value: T,
    ) -> Result<Constrained<T, StrictlyPositive>, ConstraintError> {
        Constrained::<T, StrictlyPositive>::new(value)
    }
}

impl<T: PartialOrd + Zero> Constraint<T> for StrictlyPositive {
    fn check(value: &T) -> Result<(), ConstraintError> {
        match value.partial_cmp(&T::zero()) {
            Some(Ordering::Greater) => Ok(()),
            Some(Ordering::Equal) => Err(ConstraintError::Zero),
            Some(Ordering::Less) => Err(ConstraintError::Negative),
            None => Err(ConstraintError::NotANumber),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use uom::si::{f64::Velocity, velocity::meter_per_second};

    #[test]
    fn floats() {
        assert!(Constrained::<f64, StrictlyPositive>::new(0.012).is_ok());
        assert_eq!(StrictlyPositive::new(0.0), Err(ConstraintError::Zero));
        assert_eq!(StrictlyPositive::new(-5.0), Err(ConstraintError::Negative));
        assert_eq!(
            StrictlyPositive::new(f64::NAN),
            Err(ConstraintError::NotANumber)
        );
    }

    #[test]
    fn velocities() {
        let floor = Velocity::new::<meter_per_second>(0.01);
        assert!(StrictlyPositive::new(floor).is_ok());

        let calm = Velocity::new::<meter_per_second>(0.0);
        assert!(StrictlyPositive::new(calm).is_err());
    }
}
