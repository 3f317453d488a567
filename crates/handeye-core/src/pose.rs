//! Rigid pose samples.
//!
//! A [`Pose`] is the raw record read from a pose log: a position and an
//! orientation quaternion. It is deliberately permissive (the quaternion is
//! not required to be unit); validation happens when converting into a
//! [`crate::DualQuaternion`].

use crate::{quat_angle_between, HandEyeError, Iso3, Quat, Real, Vec3};
use serde::{Deserialize, Serialize};

/// Number of values in a pose vector `(tx, ty, tz, qx, qy, qz, qw)`.
pub const POSE_VECTOR_LEN: usize = 7;

/// Rigid transform sample: position and orientation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// Translation in metres.
    pub position: Vec3,
    /// Orientation quaternion.
    pub orientation: Quat,
}

impl Pose {
    pub fn new(position: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            orientation,
        }
    }

    pub fn identity() -> Self {
        Self::new(Vec3::zeros(), Quat::identity())
    }

    /// Build from `(tx, ty, tz, qx, qy, qz, qw)` (scalar-last quaternion).
    pub fn from_pose_vector(v: &[Real; POSE_VECTOR_LEN]) -> Self {
        Self::new(
            Vec3::new(v[0], v[1], v[2]),
            Quat::new(v[6], v[3], v[4], v[5]),
        )
    }

    /// Build from a slice holding exactly one pose vector.
    pub fn from_slice(v: &[Real]) -> Result<Self, HandEyeError> {
        let arr: &[Real; POSE_VECTOR_LEN] = v.try_into().map_err(|_| {
            HandEyeError::InvalidPose(format!(
                "expected {POSE_VECTOR_LEN} pose values, got {}",
                v.len()
            ))
        })?;
        Ok(Self::from_pose_vector(arr))
    }

    /// Flatten into `(tx, ty, tz, qx, qy, qz, qw)`.
    pub fn to_pose_vector(&self) -> [Real; POSE_VECTOR_LEN] {
        let (p, q) = (&self.position, &self.orientation);
        [p.x, p.y, p.z, q.i, q.j, q.k, q.w]
    }

    /// Convert from an isometry.
    pub fn from_isometry(iso: &Iso3) -> Self {
        Self::new(iso.translation.vector, iso.rotation.into_inner())
    }

    /// Euclidean distance between the positions of two poses.
    pub fn position_distance(&self, other: &Pose) -> Real {
        (self.position - other.position).norm()
    }

    /// Geodesic angle (radians) between the orientations of two poses.
    pub fn orientation_distance(&self, other: &Pose) -> Real {
        quat_angle_between(&self.orientation, &other.orientation)
    }
}
