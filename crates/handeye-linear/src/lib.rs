//! Closed-form hand-eye calibration on dual-quaternion trajectories.
//!
//! - [`path`]: rebase a trajectory so that a chosen pose becomes the origin,
//! - [`daniilidis`]: the dual-quaternion `A X = X B` solver,
//! - [`evaluation`]: position/orientation RMSE between two trajectories,
//! - [`math`]: small numeric helpers shared by the above.
//!
//! All functions are pure: inputs are borrowed and never mutated, outputs
//! are freshly materialized sequences.

pub mod daniilidis;
pub mod evaluation;
pub mod math;
pub mod path;

pub use daniilidis::*;
pub use evaluation::*;
pub use path::*;
