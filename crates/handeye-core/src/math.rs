//! Mathematical type aliases and quaternion helpers.
//!
//! Quaternions are stored as [`nalgebra::Quaternion`]. Whenever a quaternion
//! is flattened into a vector or matrix for linear algebra, the component
//! order is scalar-first `(w, x, y, z)`. Pose vectors read from files use the
//! scalar-last order `(x, y, z, w)`; see [`crate::Pose`].

use nalgebra::{Isometry3, Matrix3, Matrix4, Point3, Quaternion, Vector3, Vector4};

/// Scalar type used throughout the workspace (currently `f64`).
pub type Real = f64;

/// 3D vector with [`Real`] components.
pub type Vec3 = Vector3<Real>;
/// 4D vector with [`Real`] components.
pub type Vec4 = Vector4<Real>;
/// 3D point with [`Real`] coordinates.
pub type Pt3 = Point3<Real>;
/// 3×3 matrix with [`Real`] entries.
pub type Mat3 = Matrix3<Real>;
/// 4×4 matrix with [`Real`] entries.
pub type Mat4 = Matrix4<Real>;
/// Quaternion with [`Real`] components (not necessarily unit).
pub type Quat = Quaternion<Real>;
/// 3D rigid transform (SE(3)) using [`Real`].
pub type Iso3 = Isometry3<Real>;

/// Maximum deviation of an orientation quaternion norm from 1.
pub const UNIT_NORM_TOL: Real = 1e-6;
/// Norms below this are treated as zero.
pub const ZERO_NORM_TOL: Real = 1e-9;

/// Flatten a quaternion into `(w, x, y, z)`.
pub fn quat_to_wxyz(q: &Quat) -> Vec4 {
    Vec4::new(q.w, q.i, q.j, q.k)
}

/// Build a quaternion from a `(w, x, y, z)` vector.
pub fn quat_from_wxyz(v: &Vec4) -> Quat {
    Quat::new(v[0], v[1], v[2], v[3])
}

/// Left multiplication matrix: `q * p == L(q) p` in `(w, x, y, z)` order.
pub fn quat_left_matrix(q: &Quat) -> Mat4 {
    let (w, x, y, z) = (q.w, q.i, q.j, q.k);
    Mat4::new(w, -x, -y, -z, x, w, -z, y, y, z, w, -x, z, -y, x, w)
}

/// Right multiplication matrix: `p * q == R(q) p` in `(w, x, y, z)` order.
pub fn quat_right_matrix(q: &Quat) -> Mat4 {
    let (w, x, y, z) = (q.w, q.i, q.j, q.k);
    Mat4::new(w, -x, -y, -z, x, w, z, -y, y, -z, w, x, z, y, -x, w)
}

/// Geodesic angle (radians) between the rotations encoded by `a` and `b`.
///
/// Equals `2 acos(|<a, b>|)` on the normalized quaternions, so `q` and `-q`
/// are at distance zero. It is evaluated as `2 atan2(‖v‖, |w|)` of the
/// relative rotation `(w, v) = conj(a) b`, which has no domain issues and
/// returns exactly zero for identical inputs instead of the `~1e-8` that
/// `acos` of a rounded `1 - ε` produces.
pub fn quat_angle_between(a: &Quat, b: &Quat) -> Real {
    let denom = a.norm() * b.norm();
    if denom < ZERO_NORM_TOL {
        return 0.0;
    }
    let rel = (a.conjugate() * b) / denom;
    2.0 * rel.imag().norm().atan2(rel.w.abs())
}
