use thiserror::Error;

use crate::support::constraint::ConstraintError;

/// Errors that reject a whole call before any element is solved.
///
/// Per-element numerical problems are never reported here; they are recorded
/// in the output [`Flag`](super::Flag) of the affected element.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    /// An input array does not match the length of the others.
    #[error("`{field}` has {found} elements, expected {expected}")]
    LengthMismatch {
        /// Name of the offending array.
        field: &'static str,
        /// Length shared by the reference arrays.
        expected: usize,
        /// Length of the offending array.
        found: usize,
    },

    /// A model parameter violates its physical constraint.
    #[error("invalid parameter `{name}`")]
    InvalidParameter {
        /// Name of the offending parameter.
        name: &'static str,
        /// The violated constraint.
        #[source]
        source: ConstraintError,
    },
}
