//! Alignment quality metrics between two pose sequences.

use handeye_core::{ensure_same_len, HandEyeError, Pose, Real};
use serde::{Deserialize, Serialize};

/// Residual between two corresponding poses.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoseError {
    /// Euclidean distance between the positions.
    pub position: Real,
    /// Geodesic angle between the orientations, in degrees.
    pub orientation_deg: Real,
}

/// Summary of the residual disagreement between two trajectories.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlignmentMetrics {
    /// Root-mean-square position error.
    pub position_rmse: Real,
    /// Root-mean-square orientation error in degrees.
    pub orientation_rmse_deg: Real,
}

/// Per-index position and orientation errors.
pub fn compute_pose_errors(
    poses_a: &[Pose],
    poses_b: &[Pose],
) -> Result<Vec<PoseError>, HandEyeError> {
    ensure_same_len(poses_a.len(), poses_b.len())?;
    Ok(poses_a
        .iter()
        .zip(poses_b)
        .map(|(a, b)| PoseError {
            position: a.position_distance(b),
            orientation_deg: a.orientation_distance(b).to_degrees(),
        })
        .collect())
}

/// Position and orientation RMSE between two index-aligned trajectories.
///
/// Fails with [`HandEyeError::LengthMismatch`] on different lengths and
/// [`HandEyeError::EmptySequence`] on empty input.
pub fn evaluate_alignment(
    poses_a: &[Pose],
    poses_b: &[Pose],
) -> Result<AlignmentMetrics, HandEyeError> {
    rmse_from_pose_errors(&compute_pose_errors(poses_a, poses_b)?)
}

/// RMSE summary of already computed per-pose errors.
pub fn rmse_from_pose_errors(errors: &[PoseError]) -> Result<AlignmentMetrics, HandEyeError> {
    if errors.is_empty() {
        return Err(HandEyeError::EmptySequence);
    }

    let n = errors.len() as Real;
    let position_sq = errors.iter().map(|e| e.position * e.position).sum::<Real>();
    let orientation_sq = errors
        .iter()
        .map(|e| e.orientation_deg * e.orientation_deg)
        .sum::<Real>();

    Ok(AlignmentMetrics {
        position_rmse: (position_sq / n).sqrt(),
        orientation_rmse_deg: (orientation_sq / n).sqrt(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use handeye_core::{Quat, Vec3};
    use nalgebra::UnitQuaternion;

    fn poses() -> Vec<Pose> {
        (0..5)
            .map(|k| {
                let kf = k as Real;
                Pose::new(
                    Vec3::new(kf, -0.5 * kf, 0.1),
                    UnitQuaternion::from_euler_angles(0.1 * kf, 0.2, -0.3 * kf).into_inner(),
                )
            })
            .collect()
    }

    #[test]
    fn identical_trajectories_have_zero_error() {
        let metrics = evaluate_alignment(&poses(), &poses()).unwrap();
        assert_eq!(metrics.position_rmse, 0.0);
        assert!(metrics.orientation_rmse_deg < 1e-12);
    }

    #[test]
    fn sign_flipped_orientations_have_zero_error() {
        let flipped: Vec<Pose> = poses()
            .iter()
            .map(|p| Pose::new(p.position, -p.orientation))
            .collect();
        let metrics = evaluate_alignment(&poses(), &flipped).unwrap();
        assert!(metrics.orientation_rmse_deg < 1e-12);
    }

    #[test]
    fn known_offsets() {
        let a = vec![Pose::identity(), Pose::identity()];
        let b = vec![
            Pose::new(Vec3::new(3.0, 4.0, 0.0), Quat::identity()),
            Pose::new(
                Vec3::zeros(),
                UnitQuaternion::from_euler_angles(0.0, 0.0, 10.0_f64.to_radians()).into_inner(),
            ),
        ];

        let errors = compute_pose_errors(&a, &b).unwrap();
        assert_eq!(errors[0].position, 5.0);
        assert!((errors[1].orientation_deg - 10.0).abs() < 1e-9);

        let metrics = evaluate_alignment(&a, &b).unwrap();
        assert_eq!(rmse_from_pose_errors(&errors).unwrap(), metrics);
        assert!((metrics.position_rmse - (25.0_f64 / 2.0).sqrt()).abs() < 1e-12);
        assert!((metrics.orientation_rmse_deg - (100.0_f64 / 2.0).sqrt()).abs() < 1e-9);
    }

    #[test]
    fn rejects_mismatch_and_empty() {
        let p = poses();
        assert_eq!(
            evaluate_alignment(&p, &p[..3]),
            Err(HandEyeError::LengthMismatch { left: 5, right: 3 })
        );
        assert_eq!(evaluate_alignment(&[], &[]), Err(HandEyeError::EmptySequence));
    }
}
