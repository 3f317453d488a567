use crate::Real;
use thiserror::Error;

/// Errors raised by hand-eye primitives, solvers and pipelines.
///
/// Every variant is detected at the earliest point where it can be observed
/// and returned to the caller; none of them is recovered internally.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HandEyeError {
    /// Malformed pose or non-unit orientation quaternion.
    #[error("invalid pose: {0}")]
    InvalidPose(String),
    /// Two sequences that must be paired index-wise have different lengths.
    #[error("sequence length mismatch: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },
    /// An operation that needs at least one element received none.
    #[error("empty pose sequence")]
    EmptySequence,
    /// The motion set does not constrain the hand-eye transform.
    #[error("insufficient motion: {0}")]
    InsufficientMotion(String),
    /// Alignment index outside the sequence.
    #[error("alignment index {index} out of range for sequence of length {len}")]
    IndexOutOfRange { index: usize, len: usize },
    /// Linear algebra backend failure.
    #[error("numerical failure: {0}")]
    Numerical(&'static str),
}

impl HandEyeError {
    pub(crate) fn non_unit_orientation(norm: Real) -> Self {
        Self::InvalidPose(format!(
            "orientation quaternion norm {norm} is not within {} of 1",
            crate::UNIT_NORM_TOL
        ))
    }
}

/// Check that two paired sequences have the same length.
pub fn ensure_same_len(left: usize, right: usize) -> Result<(), HandEyeError> {
    if left != right {
        return Err(HandEyeError::LengthMismatch { left, right });
    }
    Ok(())
}
