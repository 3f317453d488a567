//! Deterministic noise helpers for synthetic trajectories.
//!
//! The functions here avoid thread-local RNGs so that synthetic datasets are
//! stable across versions and platforms.

use crate::{Iso3, Real, Vec3};
use nalgebra::{Translation3, UnitQuaternion};

/// Deterministic uniform pose noise.
///
/// Translation noise is uniform in `[-max_abs_translation, +max_abs_translation]`
/// per axis; rotation noise is a rotation vector with uniform components in
/// `[-max_abs_angle, +max_abs_angle]` radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformPoseNoise {
    /// Base seed controlling the pseudo-random sequence.
    pub seed: u64,
    /// Maximum absolute per-axis translation noise (metres).
    pub max_abs_translation: Real,
    /// Maximum absolute per-axis rotation-vector noise (radians).
    pub max_abs_angle: Real,
}

impl Default for UniformPoseNoise {
    fn default() -> Self {
        Self {
            seed: 0,
            max_abs_translation: 0.0,
            max_abs_angle: 0.0,
        }
    }
}

impl UniformPoseNoise {
    /// Sample `(translation, rotation_vector)` noise for pose `index`.
    pub fn sample(&self, index: usize) -> (Vec3, Vec3) {
        let key = mix_key(self.seed, index);
        let t = uniform_vec3(key, self.max_abs_translation.abs());
        let r = uniform_vec3(key ^ 0xD6E8_FEB8_6659_FD93, self.max_abs_angle.abs());
        (t, r)
    }

    /// Perturb a pose: `T_noisy = δ · T` with `δ` the sampled noise transform.
    pub fn apply(&self, index: usize, pose: &Iso3) -> Iso3 {
        let (dt, dr) = self.sample(index);
        let delta = Iso3::from_parts(Translation3::from(dt), UnitQuaternion::from_scaled_axis(dr));
        delta * pose
    }

    /// Perturb a whole trajectory, keyed by index.
    pub fn apply_all(&self, poses: &[Iso3]) -> Vec<Iso3> {
        poses
            .iter()
            .enumerate()
            .map(|(i, pose)| self.apply(i, pose))
            .collect()
    }
}

fn uniform_vec3(key: u64, max_abs: Real) -> Vec3 {
    if max_abs == 0.0 {
        return Vec3::zeros();
    }
    let a = splitmix64(key);
    let b = splitmix64(a);
    let c = splitmix64(b);
    // Map [0, 1) -> [-max_abs, +max_abs].
    Vec3::new(
        (u64_to_unit_f64(a) - 0.5) * 2.0 * max_abs,
        (u64_to_unit_f64(b) - 0.5) * 2.0 * max_abs,
        (u64_to_unit_f64(c) - 0.5) * 2.0 * max_abs,
    )
}

#[inline]
fn mix_key(seed: u64, index: usize) -> u64 {
    seed ^ (index as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

#[inline]
fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

#[inline]
fn u64_to_unit_f64(x: u64) -> Real {
    // Top 53 bits as a double in [0, 1).
    let mantissa = x >> 11;
    (mantissa as Real) * (1.0 / ((1u64 << 53) as Real))
}
