//! End-to-end hand-eye calibration pipeline.
//!
//! Runs the full flow on two paired pose streams:
//!
//! 1. convert both streams to dual quaternions (`^B T_H` and `^W T_E`),
//! 2. optionally rebase both paths on the pose at `align_index`,
//! 3. solve `A X = X B` for `X = ^H T_E` (Daniilidis),
//! 4. re-express the eye path in the hand frame (`^W T_H = ^W T_E · ^E T_H`)
//!    and rebase it,
//! 5. compare it with the hand path (position / orientation RMSE).
//!
//! ```no_run
//! use handeye_pipeline::{
//!     run_hand_eye_calibration, EyePoses, HandEyeConfig, HandEyeInput, HandPoses,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let input = HandEyeInput {
//!     hand: HandPoses::BaseToHand(/* load poses */ vec![]),
//!     eye: EyePoses::WorldToEye(vec![]),
//! };
//! let report = run_hand_eye_calibration(&input, &HandEyeConfig::default())?;
//! println!("RMSE position: {} m", report.result.position_rmse);
//! # Ok(())
//! # }
//! ```

mod config;
mod input;

pub use config::HandEyeConfig;
pub use input::{EyePoses, HandEyeInput, HandPoses};

pub use handeye_core::{DualQuaternion, HandEyeError, Pose, Real};
pub use handeye_linear::{AlignmentMetrics, DualQuaternionHandEyeOptions, PoseError};

use handeye_core::{ensure_same_len, poses_from_dual_quaternions, POSE_VECTOR_LEN};
use handeye_linear::{
    align_paths_at_index, compute_pose_errors, rmse_from_pose_errors, DualQuaternionHandEye,
};
use log::info;
use serde::{Deserialize, Serialize};

/// Estimated transform and its accuracy summary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlignmentResult {
    /// Hand-eye transform `X = ^H T_E` (normalized).
    pub hand_se3_eye: DualQuaternion,
    /// Position RMSE in metres between the hand path and the aligned eye path.
    pub position_rmse: Real,
    /// Orientation RMSE in degrees between the hand path and the aligned eye path.
    pub orientation_rmse_deg: Real,
}

/// Full report of a pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandEyeReport {
    pub result: AlignmentResult,
    /// `X` as `(tx, ty, tz, qx, qy, qz, qw)`.
    pub hand_se3_eye_pose: [Real; POSE_VECTOR_LEN],
    /// Norm of the translation of `X`.
    pub translation_norm: Real,
    /// Per-pose residuals behind the RMSE values.
    pub pose_errors: Vec<PoseError>,
    /// Hand path rebased on `align_index`.
    pub hand_path: Vec<Pose>,
    /// Eye path as passed to the solver.
    pub eye_path: Vec<Pose>,
    /// Eye path re-expressed in the hand frame, rebased on `align_index`.
    pub eye_path_in_hand_frame: Vec<Pose>,
    /// Configuration used for this run.
    pub config: HandEyeConfig,
}

/// Run the hand-eye calibration on paired pose streams.
///
/// Errors are returned as soon as they are detected: invalid poses while
/// converting, length mismatch before anything else, an out-of-range
/// `align_index` when rebasing, and degenerate motion from the solver.
pub fn run_hand_eye_calibration(
    input: &HandEyeInput,
    config: &HandEyeConfig,
) -> Result<HandEyeReport, HandEyeError> {
    ensure_same_len(input.hand.len(), input.eye.len())?;
    if input.hand.is_empty() {
        return Err(HandEyeError::EmptySequence);
    }

    let base_se3_hand = input.hand.base_se3_hand()?;
    let world_se3_eye = input.eye.world_se3_eye()?;

    let hand_path = align_paths_at_index(&base_se3_hand, config.align_index, true)?;
    let eye_path = if config.paths_start_at_origin {
        align_paths_at_index(&world_se3_eye, config.align_index, true)?
    } else {
        world_se3_eye
    };
    let solver_hand_path = if config.paths_start_at_origin {
        hand_path.clone()
    } else {
        base_se3_hand
    };

    let hand_se3_eye =
        DualQuaternionHandEye::solve(&solver_hand_path, &eye_path, &config.solver)?;
    let eye_se3_hand = hand_se3_eye.inverse().normalize()?.enforce_positive_real_w();

    let world_se3_hand = eye_path
        .iter()
        .map(|world_se3_eye| {
            (*world_se3_eye * eye_se3_hand)
                .normalize()
                .map(|dq| dq.enforce_positive_real_w())
        })
        .collect::<Result<Vec<_>, _>>()?;
    let eye_path_in_hand_frame = align_paths_at_index(&world_se3_hand, config.align_index, true)?;

    let hand_poses = poses_from_dual_quaternions(&hand_path);
    let aligned_poses = poses_from_dual_quaternions(&eye_path_in_hand_frame);
    let pose_errors = compute_pose_errors(&hand_poses, &aligned_poses)?;
    let metrics = rmse_from_pose_errors(&pose_errors)?;

    let hand_se3_eye_pose = hand_se3_eye.to_pose_vector();
    let translation_norm = hand_se3_eye.translation().norm();
    info!(
        "hand-eye calibration on {} poses: RMSE position {:.6} m, RMSE orientation {:.6} deg",
        hand_poses.len(),
        metrics.position_rmse,
        metrics.orientation_rmse_deg
    );
    info!("hand-eye pose {hand_se3_eye_pose:?} (translation norm {translation_norm:.6} m)");

    Ok(HandEyeReport {
        result: AlignmentResult {
            hand_se3_eye,
            position_rmse: metrics.position_rmse,
            orientation_rmse_deg: metrics.orientation_rmse_deg,
        },
        hand_se3_eye_pose,
        translation_norm,
        pose_errors,
        hand_path: hand_poses,
        eye_path: poses_from_dual_quaternions(&eye_path),
        eye_path_in_hand_frame: aligned_poses,
        config: *config,
    })
}
