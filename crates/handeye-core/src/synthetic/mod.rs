//! Deterministic synthetic trajectories for hand-eye tests and demos.
//!
//! This module provides small building blocks for constructing synthetic
//! hand-eye problems:
//! - smooth hand trajectories with rotations about varying axes,
//! - degenerate single-axis and planar trajectories,
//! - the matching eye trajectory for a known hand-eye transform,
//! - deterministic pseudo-random pose noise.
//!
//! Everything is deterministic (explicit seeds, closed-form generators) so
//! test expectations are stable across platforms.
//!
//! # Example
//!
//! ```
//! use handeye_core::synthetic::trajectory;
//! use handeye_core::Iso3;
//! use nalgebra::{Translation3, UnitQuaternion};
//!
//! let hand_eye = Iso3::from_parts(
//!     Translation3::new(0.05, -0.02, 0.1),
//!     UnitQuaternion::from_euler_angles(0.1, 0.2, -0.3),
//! );
//! let base_hand = trajectory::wobbling_path(10);
//! let world_eye = trajectory::eye_path_from_hand(&base_hand, &hand_eye, &Iso3::identity());
//! assert_eq!(world_eye.len(), 10);
//! ```

pub mod noise;
pub mod trajectory;
