//! Closed-form pose trajectories.

use crate::{Iso3, Real, Vec3};
use nalgebra::{Translation3, Unit, UnitQuaternion};

/// Hand trajectory whose rotation axis changes from pose to pose.
///
/// Roll, pitch and yaw follow incommensurate sinusoids, so every relative
/// motion has a different rotation axis and the hand-eye problem is well
/// posed for `n >= 3`.
pub fn wobbling_path(n: usize) -> Vec<Iso3> {
    (0..n)
        .map(|k| {
            let kf = k as Real;
            let rot = UnitQuaternion::from_euler_angles(
                0.6 * (0.7 * kf).sin(),
                0.5 * (1.3 * kf + 0.2).cos() - 0.5,
                0.8 * (0.45 * kf + 0.3).sin(),
            );
            let t = Translation3::new(
                0.5 * (0.3 * kf).cos(),
                0.4 * (0.5 * kf).sin(),
                0.8 + 0.05 * kf,
            );
            Iso3::from_parts(t, rot)
        })
        .collect()
}

/// Trajectory rotating about a single fixed `axis`, translating along it.
///
/// All relative motions share one rotation axis, which leaves the hand-eye
/// transform unobservable.
pub fn single_axis_path(n: usize, axis: &Vec3) -> Vec<Iso3> {
    let axis = Unit::new_normalize(*axis);
    (0..n)
        .map(|k| {
            let kf = k as Real;
            let rot = UnitQuaternion::from_axis_angle(&axis, 0.3 * kf);
            let t = Translation3::from(axis.into_inner() * (0.1 * kf));
            Iso3::from_parts(t, rot)
        })
        .collect()
}

/// Planar trajectory: rotations about `z` only, translations in the `xy` plane.
///
/// Typical of a mobile base; like [`single_axis_path`] it leaves the
/// hand-eye transform unobservable.
pub fn planar_path(n: usize) -> Vec<Iso3> {
    (0..n)
        .map(|k| {
            let kf = k as Real;
            let yaw = 0.9 * (0.6 * kf).sin() + 0.15 * kf;
            let t = Translation3::new(0.5 * (0.3 * kf).cos(), 0.4 * (0.5 * kf).sin(), 0.0);
            Iso3::from_parts(t, UnitQuaternion::from_axis_angle(&Vec3::z_axis(), yaw))
        })
        .collect()
}

/// Eye poses for a rigidly mounted sensor.
///
/// Given hand poses `^B T_H`, the hand-eye transform `^H T_E` and the offset
/// `^W T_B` between the eye's world frame and the hand's base frame, returns
/// `^W T_E = ^W T_B · ^B T_H · ^H T_E`.
pub fn eye_path_from_hand(base_hand: &[Iso3], hand_eye: &Iso3, world_base: &Iso3) -> Vec<Iso3> {
    base_hand
        .iter()
        .map(|base_se3_hand| world_base * base_se3_hand * hand_eye)
        .collect()
}
