//! Pose streams fed into the pipeline.

use handeye_core::{dual_quaternions_from_poses, DualQuaternion, HandEyeError, Pose};
use serde::{Deserialize, Serialize};

/// First pose stream: the hand, in either direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HandPoses {
    /// Hand poses in the base frame (`^B T_H`).
    BaseToHand(Vec<Pose>),
    /// Base poses in the hand frame (`^H T_B`); inverted on load.
    HandToBase(Vec<Pose>),
}

/// Second pose stream: the eye, in either direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EyePoses {
    /// Eye poses in the world frame (`^W T_E`).
    WorldToEye(Vec<Pose>),
    /// World poses in the eye frame (`^E T_W`); inverted on load.
    EyeToWorld(Vec<Pose>),
}

/// Paired, time-aligned hand and eye trajectories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandEyeInput {
    pub hand: HandPoses,
    pub eye: EyePoses,
}

impl HandPoses {
    pub fn len(&self) -> usize {
        match self {
            HandPoses::BaseToHand(p) | HandPoses::HandToBase(p) => p.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `^B T_H` as dual quaternions.
    pub fn base_se3_hand(&self) -> Result<Vec<DualQuaternion>, HandEyeError> {
        match self {
            HandPoses::BaseToHand(p) => dual_quaternions_from_poses(p),
            HandPoses::HandToBase(p) => inverted(p),
        }
    }
}

impl EyePoses {
    pub fn len(&self) -> usize {
        match self {
            EyePoses::WorldToEye(p) | EyePoses::EyeToWorld(p) => p.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `^W T_E` as dual quaternions.
    pub fn world_se3_eye(&self) -> Result<Vec<DualQuaternion>, HandEyeError> {
        match self {
            EyePoses::WorldToEye(p) => dual_quaternions_from_poses(p),
            EyePoses::EyeToWorld(p) => inverted(p),
        }
    }
}

fn inverted(poses: &[Pose]) -> Result<Vec<DualQuaternion>, HandEyeError> {
    poses
        .iter()
        .map(|p| DualQuaternion::from_pose_record(p).map(|dq| dq.inverse()))
        .collect()
}
