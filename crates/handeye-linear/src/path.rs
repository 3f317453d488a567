//! Path normalization.
//!
//! Two sensors record their trajectories in unrelated global frames. Rebasing
//! each trajectory on one of its own poses makes them comparable: with
//! `origin = path[index]`, entry `i` becomes `origin⁻¹ · path[i]`, i.e. the
//! motion from the origin pose to pose `i`, expressed in the origin frame.

use handeye_core::{DualQuaternion, HandEyeError};
use log::debug;

/// Rebase `path` on the pose at `index`.
///
/// Each output entry is re-normalized; with `enforce_positive_real_w` its
/// sign is also fixed so that the real part has a non-negative scalar.
///
/// Errors:
/// - [`HandEyeError::EmptySequence`] for an empty path,
/// - [`HandEyeError::IndexOutOfRange`] when `index >= path.len()`,
/// - [`HandEyeError::InvalidPose`] when an entry cannot be normalized.
pub fn align_paths_at_index(
    path: &[DualQuaternion],
    index: usize,
    enforce_positive_real_w: bool,
) -> Result<Vec<DualQuaternion>, HandEyeError> {
    if path.is_empty() {
        return Err(HandEyeError::EmptySequence);
    }
    let origin = path.get(index).ok_or(HandEyeError::IndexOutOfRange {
        index,
        len: path.len(),
    })?;
    debug!("aligning path of {} poses at index {index}", path.len());

    let origin_inv = origin.inverse();
    path.iter()
        .map(|dq| {
            let aligned = (origin_inv * *dq).normalize()?;
            Ok(if enforce_positive_real_w {
                aligned.enforce_positive_real_w()
            } else {
                aligned
            })
        })
        .collect()
}

/// Rebase `path` on its first pose with a positive-scalar sign convention.
///
/// The first entry of the result is the identity; applying the function to
/// its own output returns the same sequence (up to rounding).
pub fn normalize_path(path: &[DualQuaternion]) -> Result<Vec<DualQuaternion>, HandEyeError> {
    align_paths_at_index(path, 0, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use handeye_core::synthetic::trajectory::wobbling_path;

    fn sample_path() -> Vec<DualQuaternion> {
        wobbling_path(8)
            .iter()
            .map(DualQuaternion::from_isometry)
            .collect()
    }

    #[test]
    fn first_entry_becomes_identity() {
        let normalized = normalize_path(&sample_path()).unwrap();
        assert!(normalized[0].approx_eq(&DualQuaternion::identity(), 1e-12));
        assert!(normalized.iter().all(|dq| dq.real().w >= 0.0));
        assert!(normalized.iter().all(|dq| dq.is_normalized(1e-12)));
    }

    #[test]
    fn normalization_is_idempotent() {
        let once = normalize_path(&sample_path()).unwrap();
        let twice = normalize_path(&once).unwrap();
        for (a, b) in once.iter().zip(twice.iter()) {
            assert!(a.approx_eq(b, 1e-12), "{a:?} vs {b:?}");
        }
    }

    #[test]
    fn aligns_at_arbitrary_index() {
        let path = sample_path();
        let aligned = align_paths_at_index(&path, 3, false).unwrap();
        assert!(aligned[3].approx_eq_up_to_sign(&DualQuaternion::identity(), 1e-12));
        // Relative motions are preserved by rebasing.
        let rel_before = path[1].inverse() * path[5];
        let rel_after = aligned[1].inverse() * aligned[5];
        assert!(rel_before.approx_eq_up_to_sign(&rel_after, 1e-10));
    }

    #[test]
    fn rejects_empty_and_out_of_range() {
        assert_eq!(normalize_path(&[]), Err(HandEyeError::EmptySequence));
        assert_eq!(
            align_paths_at_index(&sample_path(), 8, true),
            Err(HandEyeError::IndexOutOfRange { index: 8, len: 8 })
        );
    }
}
