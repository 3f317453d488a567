//! Dual-quaternion representation of rigid transforms.
//!
//! A rigid transform with rotation `r` (unit quaternion) and translation `t`
//! is encoded as the pair `(q_rot, q_dual) = (r, 0.5 · t · r)`, where `t` is
//! embedded as a pure quaternion.
//!
//! # Conventions
//!
//! - `a * b` applies `b` first, then `a` (same as `T_a · T_b`). The real part
//!   of the product is `r_a r_b`, the dual part is `r_a d_b + d_a r_b`.
//! - A dual quaternion is *normalized* when `‖q_rot‖ = 1` and
//!   `<q_rot, q_dual> = 0`. Products of normalized values are normalized only
//!   up to rounding, so callers re-normalize explicitly at pipeline
//!   boundaries with [`DualQuaternion::normalize`].
//! - `q` and `-q` encode the same transform. Sign selection is an explicit,
//!   pure operation: [`DualQuaternion::enforce_positive_real_w`] and
//!   [`DualQuaternion::enforce_matching_sign`].

use crate::{
    HandEyeError, Iso3, Mat4, Pose, Pt3, Quat, Real, Vec3, POSE_VECTOR_LEN, UNIT_NORM_TOL,
    ZERO_NORM_TOL,
};
use nalgebra::{Translation3, UnitQuaternion};
use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Neg, Sub};

/// Rigid transform stored as a pair of quaternions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DualQuaternion {
    q_rot: Quat,
    q_dual: Quat,
}

impl Default for DualQuaternion {
    fn default() -> Self {
        Self::identity()
    }
}

impl DualQuaternion {
    /// The identity transform `(1, 0)`.
    pub fn identity() -> Self {
        Self {
            q_rot: Quat::identity(),
            q_dual: Quat::new(0.0, 0.0, 0.0, 0.0),
        }
    }

    /// Assemble from raw parts without any validation.
    pub fn from_parts(q_rot: Quat, q_dual: Quat) -> Self {
        Self { q_rot, q_dual }
    }

    /// Build from a translation and a unit orientation quaternion.
    ///
    /// Fails with [`HandEyeError::InvalidPose`] when the orientation norm is
    /// not within [`UNIT_NORM_TOL`] of one, or when any input is not finite.
    /// The orientation is rescaled to exactly unit norm.
    pub fn from_pose(position: &Vec3, orientation: &Quat) -> Result<Self, HandEyeError> {
        if !position.iter().all(|v| v.is_finite()) {
            return Err(HandEyeError::InvalidPose(format!(
                "non-finite position {:?}",
                position.as_slice()
            )));
        }
        let norm = orientation.norm();
        if !norm.is_finite() || (norm - 1.0).abs() > UNIT_NORM_TOL {
            return Err(HandEyeError::non_unit_orientation(norm));
        }
        let q_rot = *orientation / norm;
        let t = Quat::from_imag(*position);
        Ok(Self {
            q_rot,
            q_dual: (t * q_rot) * 0.5,
        })
    }

    /// Build from a [`Pose`] record.
    pub fn from_pose_record(pose: &Pose) -> Result<Self, HandEyeError> {
        Self::from_pose(&pose.position, &pose.orientation)
    }

    /// Build from `(tx, ty, tz, qx, qy, qz, qw)`.
    pub fn from_pose_vector(v: &[Real; POSE_VECTOR_LEN]) -> Result<Self, HandEyeError> {
        Self::from_pose_record(&Pose::from_pose_vector(v))
    }

    /// Build from an 8-vector `[qx, qy, qz, qw, dx, dy, dz, dw]`.
    pub fn from_vector(v: &[Real; 8]) -> Self {
        Self {
            q_rot: Quat::new(v[3], v[0], v[1], v[2]),
            q_dual: Quat::new(v[7], v[4], v[5], v[6]),
        }
    }

    /// Flatten into `[qx, qy, qz, qw, dx, dy, dz, dw]`.
    pub fn to_vector(&self) -> [Real; 8] {
        let (r, d) = (&self.q_rot, &self.q_dual);
        [r.i, r.j, r.k, r.w, d.i, d.j, d.k, d.w]
    }

    /// Build from an isometry.
    pub fn from_isometry(iso: &Iso3) -> Self {
        let q_rot = iso.rotation.into_inner();
        let t = Quat::from_imag(iso.translation.vector);
        Self {
            q_rot,
            q_dual: (t * q_rot) * 0.5,
        }
    }

    /// Real (rotation) part.
    pub fn real(&self) -> &Quat {
        &self.q_rot
    }

    /// Dual part.
    pub fn dual(&self) -> &Quat {
        &self.q_dual
    }

    /// Rotation as a unit quaternion.
    pub fn rotation(&self) -> UnitQuaternion<Real> {
        UnitQuaternion::from_quaternion(self.q_rot)
    }

    /// Translation `t = 2 q_dual conj(q_rot) / ‖q_rot‖²`.
    ///
    /// The real part must be non-zero.
    pub fn translation(&self) -> Vec3 {
        let t = (self.q_dual * self.q_rot.conjugate()) * (2.0 / self.q_rot.norm_squared());
        t.imag()
    }

    /// Convert back to a position and a unit orientation.
    pub fn to_pose(&self) -> Pose {
        Pose::new(self.translation(), self.rotation().into_inner())
    }

    /// Flatten into `(tx, ty, tz, qx, qy, qz, qw)`.
    pub fn to_pose_vector(&self) -> [Real; POSE_VECTOR_LEN] {
        self.to_pose().to_pose_vector()
    }

    /// Convert to an isometry.
    pub fn to_isometry(&self) -> Iso3 {
        Iso3::from_parts(Translation3::from(self.translation()), self.rotation())
    }

    /// 4×4 homogeneous transformation matrix.
    pub fn to_matrix(&self) -> Mat4 {
        self.to_isometry().to_homogeneous()
    }

    /// Compose two transforms: `a.multiply(b)` applies `b`, then `a`.
    pub fn multiply(&self, other: &DualQuaternion) -> DualQuaternion {
        Self {
            q_rot: self.q_rot * other.q_rot,
            q_dual: self.q_rot * other.q_dual + self.q_dual * other.q_rot,
        }
    }

    /// Quaternion conjugate of both parts `(r*, d*)`.
    ///
    /// For normalized values this equals [`DualQuaternion::inverse`].
    pub fn conjugate(&self) -> Self {
        Self {
            q_rot: self.q_rot.conjugate(),
            q_dual: self.q_dual.conjugate(),
        }
    }

    /// Dual-number conjugate `(r, -d)`.
    pub fn dual_number_conjugate(&self) -> Self {
        Self {
            q_rot: self.q_rot,
            q_dual: -self.q_dual,
        }
    }

    /// Combined conjugate `(r*, -d*)`.
    pub fn combined_conjugate(&self) -> Self {
        Self {
            q_rot: self.q_rot.conjugate(),
            q_dual: -self.q_dual.conjugate(),
        }
    }

    /// Multiplicative inverse `(r⁻¹, -r⁻¹ d r⁻¹)`.
    ///
    /// Valid for any non-zero real part, normalized or not.
    pub fn inverse(&self) -> Self {
        let r_inv = self.q_rot.conjugate() / self.q_rot.norm_squared();
        Self {
            q_rot: r_inv,
            q_dual: -(r_inv * self.q_dual * r_inv),
        }
    }

    /// Rescale to a unit real part and project the dual part onto the
    /// orthogonal complement of the real part.
    ///
    /// Idempotent. Fails when the real part is (numerically) zero.
    pub fn normalize(&self) -> Result<Self, HandEyeError> {
        let norm = self.q_rot.norm();
        if !norm.is_finite() || norm < ZERO_NORM_TOL {
            return Err(HandEyeError::InvalidPose(format!(
                "cannot normalize dual quaternion with real part norm {norm}"
            )));
        }
        let q_rot = self.q_rot / norm;
        let q_dual = self.q_dual / norm;
        let q_dual = q_dual - q_rot * q_rot.dot(&q_dual);
        Ok(Self { q_rot, q_dual })
    }

    /// Whether `‖q_rot‖ = 1` and `<q_rot, q_dual> = 0` within `tol`.
    pub fn is_normalized(&self, tol: Real) -> bool {
        (self.q_rot.norm() - 1.0).abs() <= tol && self.q_rot.dot(&self.q_dual).abs() <= tol
    }

    /// Return `-q` when the real part's scalar component is negative.
    pub fn enforce_positive_real_w(&self) -> Self {
        if self.q_rot.w < 0.0 {
            -*self
        } else {
            *self
        }
    }

    /// Return `-q` when the real part's scalar component has the opposite
    /// sign to the one of `reference`. Zero scalars never trigger a flip.
    pub fn enforce_matching_sign(&self, reference: &DualQuaternion) -> Self {
        if self.q_rot.w * reference.q_rot.w < 0.0 {
            -*self
        } else {
            *self
        }
    }

    /// Scalar parts `(q_rot.w, q_dual.w)`.
    ///
    /// These encode the rotation angle and the screw pitch; for `A X = X B`
    /// they must coincide between `A` and `B`.
    pub fn scalar(&self) -> (Real, Real) {
        (self.q_rot.w, self.q_dual.w)
    }

    /// Apply the transform to a point: `R p + t`.
    pub fn transform_point(&self, p: &Pt3) -> Pt3 {
        self.rotation().transform_point(p) + self.translation()
    }

    /// Apply the inverse transform to a point: `Rᵀ (p - t)`.
    pub fn inverse_transform_point(&self, p: &Pt3) -> Pt3 {
        self.rotation()
            .inverse_transform_point(&(p - self.translation()))
    }

    /// Component-wise comparison (sign sensitive).
    pub fn approx_eq(&self, other: &DualQuaternion, tol: Real) -> bool {
        self.to_vector()
            .iter()
            .zip(other.to_vector().iter())
            .all(|(a, b)| (a - b).abs() <= tol)
    }

    /// Component-wise comparison accepting either `other` or `-other`.
    pub fn approx_eq_up_to_sign(&self, other: &DualQuaternion, tol: Real) -> bool {
        self.approx_eq(other, tol) || self.approx_eq(&-*other, tol)
    }
}

/// Convert pose records into dual quaternions, failing on the first invalid one.
pub fn dual_quaternions_from_poses(poses: &[Pose]) -> Result<Vec<DualQuaternion>, HandEyeError> {
    poses.iter().map(DualQuaternion::from_pose_record).collect()
}

/// Convert dual quaternions back into pose records.
pub fn poses_from_dual_quaternions(dqs: &[DualQuaternion]) -> Vec<Pose> {
    dqs.iter().map(DualQuaternion::to_pose).collect()
}

impl Mul for DualQuaternion {
    type Output = DualQuaternion;

    fn mul(self, rhs: DualQuaternion) -> DualQuaternion {
        self.multiply(&rhs)
    }
}

impl<'a> Mul<&'a DualQuaternion> for &'a DualQuaternion {
    type Output = DualQuaternion;

    fn mul(self, rhs: &'a DualQuaternion) -> DualQuaternion {
        self.multiply(rhs)
    }
}

impl Mul<Real> for DualQuaternion {
    type Output = DualQuaternion;

    fn mul(self, rhs: Real) -> DualQuaternion {
        Self {
            q_rot: self.q_rot * rhs,
            q_dual: self.q_dual * rhs,
        }
    }
}

impl Add for DualQuaternion {
    type Output = DualQuaternion;

    fn add(self, rhs: DualQuaternion) -> DualQuaternion {
        Self {
            q_rot: self.q_rot + rhs.q_rot,
            q_dual: self.q_dual + rhs.q_dual,
        }
    }
}

impl Sub for DualQuaternion {
    type Output = DualQuaternion;

    fn sub(self, rhs: DualQuaternion) -> DualQuaternion {
        Self {
            q_rot: self.q_rot - rhs.q_rot,
            q_dual: self.q_dual - rhs.q_dual,
        }
    }
}

impl Neg for DualQuaternion {
    type Output = DualQuaternion;

    fn neg(self) -> DualQuaternion {
        Self {
            q_rot: -self.q_rot,
            q_dual: -self.q_dual,
        }
    }
}
