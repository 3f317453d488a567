//! Hand-eye calibration (AX = XB) using Daniilidis' dual-quaternion method.
//!
//! Given hand motions `A_i` and eye motions `B_i` (typically both paths
//! rebased on their first pose, see [`crate::path`]), finds the rigid
//! transform `X = ^H T_E` with `A_i X = X B_i` for all `i`.
//!
//! Writing quaternion products as matrices (`p q = L(p) q = R(q) p`, entries
//! in `(w, x, y, z)` order), the real and dual parts of `A X - X B = 0` read
//!
//! ```text
//! (L(a)  - R(b))  q                       = 0
//! (L(a') - R(b')) q + (L(a) - R(b)) q'    = 0
//! ```
//!
//! where `(a, a')`, `(b, b')`, `(q, q')` are the real/dual parts of `A`, `B`
//! and `X`. The scalar rows vanish identically for screw-congruent pairs,
//! leaving a 6×8 block per pair. The stacked system has a two-dimensional
//! null space `λ1 v7 + λ2 v8`; the unit-norm and orthogonality constraints
//! of a normalized dual quaternion fix `(λ1, λ2)` up to a global sign.
//!
//! Reference: K. Daniilidis, "Hand-Eye Calibration Using Dual Quaternions",
//! IJRR 18(3), 1999.

use crate::math::{solve_quadratic_real, sorted_right_singular_vectors};
use handeye_core::{
    ensure_same_len, quat_from_wxyz, quat_left_matrix, quat_right_matrix, DualQuaternion,
    HandEyeError, Mat4, Real, Vec4, ZERO_NORM_TOL,
};
use log::{debug, warn};
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

/// Rows contributed by each motion pair.
const ROWS_PER_PAIR: usize = 6;
/// Unknowns: real and dual part of `X`.
const UNKNOWNS: usize = 8;
/// Rotational scalar mismatch above which a pair is logged as not screw congruent.
const SCREW_CONGRUENCE_WARN: Real = 1e-2;

/// Options for [`DualQuaternionHandEye::solve`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DualQuaternionHandEyeOptions {
    /// Flip each eye motion so that its real scalar has the sign of the
    /// matching hand motion before stacking the constraints.
    pub enforce_same_non_dual_scalar_sign: bool,
    /// Return the estimate with a non-negative real scalar.
    pub enforce_positive_non_dual_scalar_sign: bool,
    /// Minimum ratio `σ6 / σ1` of the stacked system. Smaller ratios mean
    /// the null space is larger than two-dimensional.
    pub null_space_tol: Real,
    /// Maximum ratio `σ7 / σ6`. The two null-space singular values must sit
    /// well below the rest of the spectrum; with noisy single-axis motion
    /// `σ5..σ8` all end up at the noise level.
    pub gap_tol: Real,
    /// Minimum sine of the angle between hand rotation axes.
    pub min_axis_spread: Real,
}

impl Default for DualQuaternionHandEyeOptions {
    fn default() -> Self {
        Self {
            enforce_same_non_dual_scalar_sign: true,
            enforce_positive_non_dual_scalar_sign: true,
            null_space_tol: 1e-6,
            gap_tol: 0.25,
            min_axis_spread: 1e-3,
        }
    }
}

/// Closed-form dual-quaternion hand-eye solver.
#[derive(Debug, Clone, Copy)]
pub struct DualQuaternionHandEye;

/// Estimate `X = ^H T_E` from paired hand and eye motions.
///
/// Shorthand for [`DualQuaternionHandEye::solve`].
pub fn estimate_handeye_daniilidis(
    hand_motions: &[DualQuaternion],
    eye_motions: &[DualQuaternion],
    opts: &DualQuaternionHandEyeOptions,
) -> Result<DualQuaternion, HandEyeError> {
    DualQuaternionHandEye::solve(hand_motions, eye_motions, opts)
}

impl DualQuaternionHandEye {
    /// Solve `A_i X = X B_i` in the least-squares sense.
    ///
    /// The returned dual quaternion is normalized. Errors:
    /// - [`HandEyeError::LengthMismatch`] if the inputs differ in length,
    /// - [`HandEyeError::EmptySequence`] if they are empty,
    /// - [`HandEyeError::InsufficientMotion`] if the motions do not span
    ///   enough independent rotation axes,
    /// - [`HandEyeError::Numerical`] if the SVD backend fails.
    pub fn solve(
        hand_motions: &[DualQuaternion],
        eye_motions: &[DualQuaternion],
        opts: &DualQuaternionHandEyeOptions,
    ) -> Result<DualQuaternion, HandEyeError> {
        ensure_same_len(hand_motions.len(), eye_motions.len())?;
        if hand_motions.is_empty() {
            return Err(HandEyeError::EmptySequence);
        }

        let eye_motions: Vec<DualQuaternion> = if opts.enforce_same_non_dual_scalar_sign {
            hand_motions
                .iter()
                .zip(eye_motions)
                .map(|(a, b)| b.enforce_matching_sign(a))
                .collect()
        } else {
            eye_motions.to_vec()
        };

        for (idx, (rot, _)) in screw_congruence_residuals(hand_motions, &eye_motions)?
            .iter()
            .enumerate()
        {
            if *rot > SCREW_CONGRUENCE_WARN {
                warn!("motion pair {idx} is not screw congruent (scalar mismatch {rot:.3e})");
            }
        }

        let system = build_constraint_matrix(hand_motions, &eye_motions);
        if system.nrows() < UNKNOWNS {
            return Err(HandEyeError::InsufficientMotion(format!(
                "need at least 2 motion pairs, got {}",
                hand_motions.len()
            )));
        }

        let spread = rotation_axis_spread(hand_motions);
        debug!("hand rotation axis spread: {spread:.3e}");
        if spread < opts.min_axis_spread {
            return Err(HandEyeError::InsufficientMotion(format!(
                "hand rotations share a single axis (axis spread {spread:.3e}); \
                 rotations must span at least two independent axes"
            )));
        }

        let (v7, v8) = two_dimensional_null_space(system, opts)?;
        let x = combine_null_vectors(&v7, &v8)?;

        let estimate = DualQuaternion::from_parts(
            quat_from_wxyz(&Vec4::new(x[0], x[1], x[2], x[3])),
            quat_from_wxyz(&Vec4::new(x[4], x[5], x[6], x[7])),
        )
        .normalize()?;

        Ok(if opts.enforce_positive_non_dual_scalar_sign {
            estimate.enforce_positive_real_w()
        } else {
            estimate
        })
    }
}

/// Per-pair screw congruence residuals `(|a.w - b.w|, |a'.w - b'.w|)`.
///
/// For exact data satisfying `A X = X B` both residuals are zero.
pub fn screw_congruence_residuals(
    hand_motions: &[DualQuaternion],
    eye_motions: &[DualQuaternion],
) -> Result<Vec<(Real, Real)>, HandEyeError> {
    ensure_same_len(hand_motions.len(), eye_motions.len())?;
    Ok(hand_motions
        .iter()
        .zip(eye_motions)
        .map(|(a, b)| {
            let (a_rot, a_dual) = a.scalar();
            let (b_rot, b_dual) = b.scalar();
            ((a_rot - b_rot).abs(), (a_dual - b_dual).abs())
        })
        .collect())
}

/// Residual of the hand-eye constraint for one pair: `‖A X - X B‖` over the
/// eight dual-quaternion components, minimized over the sign of `B`.
pub fn constraint_residual(a: &DualQuaternion, b: &DualQuaternion, x: &DualQuaternion) -> Real {
    let residual = |b: &DualQuaternion| {
        let diff = (a * x) - (x * b);
        diff.to_vector().iter().map(|v| v * v).sum::<Real>().sqrt()
    };
    residual(b).min(residual(&-*b))
}

/// Stack the 6×8 blocks of all pairs.
fn build_constraint_matrix(hand: &[DualQuaternion], eye: &[DualQuaternion]) -> DMatrix<Real> {
    let mut s = DMatrix::<Real>::zeros(ROWS_PER_PAIR * hand.len(), UNKNOWNS);

    for (idx, (a, b)) in hand.iter().zip(eye).enumerate() {
        let real_block: Mat4 = quat_left_matrix(a.real()) - quat_right_matrix(b.real());
        let dual_block: Mat4 = quat_left_matrix(a.dual()) - quat_right_matrix(b.dual());

        // Drop the scalar row (row 0) of each 4×4 block.
        let row = ROWS_PER_PAIR * idx;
        s.view_mut((row, 0), (3, 4))
            .copy_from(&real_block.fixed_view::<3, 4>(1, 0));
        s.view_mut((row + 3, 0), (3, 4))
            .copy_from(&dual_block.fixed_view::<3, 4>(1, 0));
        s.view_mut((row + 3, 4), (3, 4))
            .copy_from(&real_block.fixed_view::<3, 4>(1, 0));
    }

    s
}

/// Largest sine of the angle between the rotation axis of the strongest
/// motion and any other motion's axis.
///
/// Zero when all rotations share one axis (or when there is at most one
/// non-identity rotation). Invariant to the `q` / `-q` sign.
pub fn rotation_axis_spread(motions: &[DualQuaternion]) -> Real {
    let axes: Vec<_> = motions
        .iter()
        .map(|m| m.real().imag())
        .filter(|v| v.norm() > ZERO_NORM_TOL)
        .collect();
    let Some(reference) = axes
        .iter()
        .max_by(|x, y| x.norm().partial_cmp(&y.norm()).unwrap_or(std::cmp::Ordering::Equal))
    else {
        return 0.0;
    };

    axes.iter()
        .map(|v| reference.cross(v).norm() / (reference.norm() * v.norm()))
        .fold(0.0, Real::max)
}

/// Right singular vectors of the two smallest singular values.
///
/// Fails when the null space is not two-dimensional: either `σ6` is not
/// separated from zero relative to `σ1`, or `σ7` is not separated from `σ6`.
fn two_dimensional_null_space(
    system: DMatrix<Real>,
    opts: &DualQuaternionHandEyeOptions,
) -> Result<(DVector<Real>, DVector<Real>), HandEyeError> {
    let mut pairs = sorted_right_singular_vectors(system)
        .ok_or(HandEyeError::Numerical("svd failed during hand-eye estimation"))?;
    if pairs.len() < UNKNOWNS {
        return Err(HandEyeError::InsufficientMotion(format!(
            "constraint system has rank at most {}",
            pairs.len()
        )));
    }

    let sigma: Vec<Real> = pairs.iter().map(|p| p.0).collect();
    debug!("hand-eye singular values: {sigma:?}");

    let sigma_max = sigma[0];
    if sigma_max < ZERO_NORM_TOL {
        return Err(HandEyeError::InsufficientMotion(
            "all motions are identity".to_string(),
        ));
    }
    let ratio = sigma[5] / sigma_max;
    if ratio <= opts.null_space_tol {
        return Err(HandEyeError::InsufficientMotion(format!(
            "null space is larger than two-dimensional (sigma6/sigma1 = {ratio:.3e}); \
             rotations must span at least two independent axes"
        )));
    }
    let gap = sigma[6] / sigma[5];
    if gap >= opts.gap_tol {
        return Err(HandEyeError::InsufficientMotion(format!(
            "null space is not separated from the spectrum (sigma7/sigma6 = {gap:.3e}); \
             rotations must span at least two independent axes"
        )));
    }

    let v8 = pairs.pop().map(|p| p.1);
    let v7 = pairs.pop().map(|p| p.1);
    match (v7, v8) {
        (Some(v7), Some(v8)) => Ok((v7, v8)),
        _ => Err(HandEyeError::Numerical("missing null-space vectors")),
    }
}

/// Find `x = λ1 v7 + λ2 v8` with a unit real part and a dual part
/// orthogonal to it.
///
/// With `v7 = (u1, w1)`, `v8 = (u2, w2)` the orthogonality constraint is
/// `λ1² u1·w1 + λ1 λ2 (u1·w2 + u2·w1) + λ2² u2·w2 = 0`. Among its roots the
/// one with the largest real-part norm `‖λ1 u1 + λ2 u2‖` is kept (the other
/// is the spurious, nearly pure-dual combination) and rescaled to unit norm.
fn combine_null_vectors(
    v7: &DVector<Real>,
    v8: &DVector<Real>,
) -> Result<DVector<Real>, HandEyeError> {
    let u1 = v7.rows(0, 4);
    let w1 = v7.rows(4, 4);
    let u2 = v8.rows(0, 4);
    let w2 = v8.rows(4, 4);

    let a = u1.dot(&w1);
    let b = u1.dot(&w2) + u2.dot(&w1);
    let c = u2.dot(&w2);

    // Mixing ratios (λ1, λ2) up to scale; parametrize by the larger
    // leading coefficient to keep the quadratic well conditioned.
    let mut candidates: Vec<(Real, Real)> = Vec::with_capacity(2);
    if a.abs().max(c.abs()) < ZERO_NORM_TOL {
        candidates.push((1.0, 0.0));
        candidates.push((0.0, 1.0));
    } else if a.abs() >= c.abs() {
        candidates.extend(solve_quadratic_real(a, b, c, 1e-6).into_iter().map(|s| (s, 1.0)));
    } else {
        candidates.extend(solve_quadratic_real(c, b, a, 1e-6).into_iter().map(|t| (1.0, t)));
    }

    let uu11 = u1.dot(&u1);
    let uu12 = u1.dot(&u2);
    let uu22 = u2.dot(&u2);
    let real_norm_sq =
        |(l1, l2): (Real, Real)| l1 * l1 * uu11 + 2.0 * l1 * l2 * uu12 + l2 * l2 * uu22;

    let best = candidates
        .into_iter()
        .map(|l| (l, real_norm_sq(l)))
        .max_by(|x, y| x.1.partial_cmp(&y.1).unwrap_or(std::cmp::Ordering::Equal));

    match best {
        Some(((l1, l2), norm_sq)) if norm_sq > ZERO_NORM_TOL => {
            debug!("null-space mixing: lambda1 = {l1:.6}, lambda2 = {l2:.6}");
            Ok((v7 * l1 + v8 * l2) / norm_sq.sqrt())
        }
        _ => Err(HandEyeError::InsufficientMotion(
            "no real combination of the null-space vectors satisfies the rigidity constraints"
                .to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::normalize_path;
    use handeye_core::synthetic::noise::UniformPoseNoise;
    use handeye_core::synthetic::trajectory::{
        eye_path_from_hand, planar_path, single_axis_path, wobbling_path,
    };
    use handeye_core::{Iso3, Vec3};
    use nalgebra::{Translation3, UnitQuaternion};

    fn hand_eye_gt() -> Iso3 {
        Iso3::from_parts(
            Translation3::new(0.1, -0.05, 0.2),
            UnitQuaternion::from_euler_angles(0.2, -0.1, 0.05),
        )
    }

    fn world_base() -> Iso3 {
        Iso3::from_parts(
            Translation3::new(2.0, -1.0, 0.5),
            UnitQuaternion::from_euler_angles(0.4, 0.3, -1.2),
        )
    }

    fn to_dqs(poses: &[Iso3]) -> Vec<DualQuaternion> {
        poses.iter().map(DualQuaternion::from_isometry).collect()
    }

    /// Compare two transforms via translation norm and rotation angle.
    fn pose_error(a: &DualQuaternion, b: &DualQuaternion) -> (Real, Real) {
        let dt = (a.translation() - b.translation()).norm();
        let ang = a.rotation().angle_to(&b.rotation());
        (dt, ang)
    }

    #[test]
    fn recovers_ground_truth_from_conjugated_motions() {
        let x_gt = DualQuaternion::from_isometry(&hand_eye_gt());
        let hand = normalize_path(&to_dqs(&wobbling_path(6))).unwrap();
        let eye: Vec<DualQuaternion> = hand.iter().map(|a| x_gt.inverse() * *a * x_gt).collect();

        let x_est = estimate_handeye_daniilidis(&hand, &eye, &Default::default()).unwrap();

        let (dt, ang) = pose_error(&x_est, &x_gt);
        assert!(dt < 1e-6, "translation error too large: {dt}");
        assert!(ang < 1e-6, "rotation error too large: {ang}");
        assert!(x_est.is_normalized(1e-9));
        assert!(x_est.real().w >= 0.0);

        for (a, b) in hand.iter().zip(&eye) {
            assert!(constraint_residual(a, b, &x_est) < 1e-6);
        }
    }

    #[test]
    fn recovers_ground_truth_from_world_frame_paths() {
        let base_hand = wobbling_path(10);
        let world_eye = eye_path_from_hand(&base_hand, &hand_eye_gt(), &world_base());

        let hand = normalize_path(&to_dqs(&base_hand)).unwrap();
        let eye = normalize_path(&to_dqs(&world_eye)).unwrap();
        let x_est = estimate_handeye_daniilidis(&hand, &eye, &Default::default()).unwrap();

        let (dt, ang) = pose_error(&x_est, &DualQuaternion::from_isometry(&hand_eye_gt()));
        assert!(dt < 1e-6, "translation error too large: {dt}");
        assert!(ang < 1e-6, "rotation error too large: {ang}");
    }

    #[test]
    fn mixed_signs_are_reconciled() {
        let x_gt = DualQuaternion::from_isometry(&hand_eye_gt());
        let hand = normalize_path(&to_dqs(&wobbling_path(6))).unwrap();
        let eye: Vec<DualQuaternion> = hand
            .iter()
            .enumerate()
            .map(|(i, a)| {
                let b = x_gt.inverse() * *a * x_gt;
                if i % 2 == 0 {
                    -b
                } else {
                    b
                }
            })
            .collect();

        let x_est = estimate_handeye_daniilidis(&hand, &eye, &Default::default()).unwrap();
        let (dt, ang) = pose_error(&x_est, &x_gt);
        assert!(dt < 1e-6 && ang < 1e-6, "dt = {dt}, ang = {ang}");
    }

    #[test]
    fn rejects_single_axis_motion() {
        let base_hand = single_axis_path(6, &Vec3::z());
        let world_eye = eye_path_from_hand(&base_hand, &hand_eye_gt(), &Iso3::identity());
        let hand = normalize_path(&to_dqs(&base_hand)).unwrap();
        let eye = normalize_path(&to_dqs(&world_eye)).unwrap();

        let err = estimate_handeye_daniilidis(&hand, &eye, &Default::default()).unwrap_err();
        assert!(matches!(err, HandEyeError::InsufficientMotion(_)), "{err:?}");
    }

    fn noise(seed: u64, translation: Real, angle: Real) -> UniformPoseNoise {
        UniformPoseNoise {
            seed,
            max_abs_translation: translation,
            max_abs_angle: angle,
        }
    }

    #[test]
    fn rejects_planar_motion_with_noisy_rotations() {
        // Rotation noise on both streams lifts the axis spread above its
        // threshold; the singular value gap must still flag the data.
        let base_hand = planar_path(20);
        let world_eye = eye_path_from_hand(&base_hand, &hand_eye_gt(), &world_base());
        for seed in 0..5 {
            let hand_noisy = noise(seed + 1000, 1e-3, 1e-3).apply_all(&base_hand);
            let eye_noisy = noise(seed, 1e-3, 1e-3).apply_all(&world_eye);
            let hand = normalize_path(&to_dqs(&hand_noisy)).unwrap();
            let eye = normalize_path(&to_dqs(&eye_noisy)).unwrap();

            let err = estimate_handeye_daniilidis(&hand, &eye, &Default::default()).unwrap_err();
            assert!(matches!(err, HandEyeError::InsufficientMotion(_)), "seed {seed}: {err:?}");
        }
    }

    #[test]
    fn rejects_planar_motion_with_noisy_translations() {
        let base_hand = planar_path(20);
        let world_eye = eye_path_from_hand(&base_hand, &hand_eye_gt(), &world_base());
        let hand = normalize_path(&to_dqs(&base_hand)).unwrap();
        for seed in 0..5 {
            let eye_noisy = noise(seed, 1e-3, 0.0).apply_all(&world_eye);
            let eye = normalize_path(&to_dqs(&eye_noisy)).unwrap();

            let err = estimate_handeye_daniilidis(&hand, &eye, &Default::default()).unwrap_err();
            assert!(matches!(err, HandEyeError::InsufficientMotion(_)), "seed {seed}: {err:?}");
        }
    }

    #[test]
    fn noisy_well_posed_motion_is_accepted() {
        let base_hand = wobbling_path(30);
        let world_eye = eye_path_from_hand(&base_hand, &hand_eye_gt(), &world_base());
        let hand = normalize_path(&to_dqs(&base_hand)).unwrap();
        for seed in 0..5 {
            let eye_noisy = noise(seed, 1e-3, 1e-3).apply_all(&world_eye);
            let eye = normalize_path(&to_dqs(&eye_noisy)).unwrap();

            let x_est = estimate_handeye_daniilidis(&hand, &eye, &Default::default()).unwrap();
            let (dt, ang) = pose_error(&x_est, &DualQuaternion::from_isometry(&hand_eye_gt()));
            assert!(dt < 1e-2 && ang < 1e-2, "seed {seed}: dt = {dt}, ang = {ang}");
        }
    }

    #[test]
    fn axis_spread_detects_shared_axis() {
        let planar = normalize_path(&to_dqs(&planar_path(10))).unwrap();
        assert!(rotation_axis_spread(&planar) < 1e-12);

        let wobbling = normalize_path(&to_dqs(&wobbling_path(6))).unwrap();
        assert!(rotation_axis_spread(&wobbling) > 0.5);

        let flipped: Vec<DualQuaternion> = wobbling.iter().map(|dq| -*dq).collect();
        assert_eq!(rotation_axis_spread(&flipped), rotation_axis_spread(&wobbling));

        assert_eq!(rotation_axis_spread(&[DualQuaternion::identity()]), 0.0);
    }

    #[test]
    fn rejects_too_few_motions() {
        let hand = normalize_path(&to_dqs(&wobbling_path(2))).unwrap();
        let x_gt = DualQuaternion::from_isometry(&hand_eye_gt());
        let eye: Vec<DualQuaternion> = hand.iter().map(|a| x_gt.inverse() * *a * x_gt).collect();

        let err =
            estimate_handeye_daniilidis(&hand[..1], &eye[..1], &Default::default()).unwrap_err();
        assert!(matches!(err, HandEyeError::InsufficientMotion(_)));

        let err = estimate_handeye_daniilidis(&hand, &eye, &Default::default()).unwrap_err();
        assert!(matches!(err, HandEyeError::InsufficientMotion(_)));
    }

    #[test]
    fn rejects_length_mismatch_and_empty_input() {
        let hand = to_dqs(&wobbling_path(5));
        let err = estimate_handeye_daniilidis(&hand, &hand[..4], &Default::default()).unwrap_err();
        assert_eq!(err, HandEyeError::LengthMismatch { left: 5, right: 4 });

        let err = estimate_handeye_daniilidis(&[], &[], &Default::default()).unwrap_err();
        assert_eq!(err, HandEyeError::EmptySequence);
    }

    #[test]
    fn screw_congruence_holds_for_exact_data() {
        let x_gt = DualQuaternion::from_isometry(&hand_eye_gt());
        let hand = to_dqs(&wobbling_path(4));
        let eye: Vec<DualQuaternion> = hand.iter().map(|a| x_gt.inverse() * *a * x_gt).collect();
        for (rot, dual) in screw_congruence_residuals(&hand, &eye).unwrap() {
            assert!(rot < 1e-12 && dual < 1e-12);
        }
    }
}
