//! Core math and pose primitives for dual-quaternion hand-eye calibration.
//!
//! This crate contains:
//! - linear algebra type aliases (`Real`, `Vec3`, `Quat`, `Iso3`, ...),
//! - the [`Pose`] value type read from pose logs,
//! - the [`DualQuaternion`] rigid-transform algebra,
//! - the shared [`HandEyeError`] type,
//! - deterministic synthetic trajectories for tests and demos.
//!
//! Composition convention used everywhere in the workspace:
//! `a * b` applies `b` first and then `a`, exactly like `T_a · T_b` for
//! homogeneous matrices.

/// Dual-quaternion rigid transforms.
pub mod dual_quaternion;
/// Error type shared by all hand-eye crates.
pub mod error;
/// Linear algebra type aliases and quaternion helpers.
pub mod math;
/// Rigid pose samples as read from pose logs.
pub mod pose;
/// Deterministic synthetic trajectories.
pub mod synthetic;

pub use dual_quaternion::*;
pub use error::*;
pub use math::*;
pub use pose::*;
