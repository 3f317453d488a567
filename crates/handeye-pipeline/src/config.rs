//! Explicit configuration threaded through the calibration pipeline.

use handeye_linear::DualQuaternionHandEyeOptions;
use serde::{Deserialize, Serialize};

/// Configuration of [`crate::run_hand_eye_calibration`].
///
/// Every field has a default, so partial JSON documents are accepted:
///
/// ```
/// use handeye_pipeline::HandEyeConfig;
///
/// let config: HandEyeConfig = serde_json::from_str(r#"{ "align_index": 2 }"#).unwrap();
/// assert_eq!(config.align_index, 2);
/// assert!(config.paths_start_at_origin);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandEyeConfig {
    /// Rebase both input paths on the pose at `align_index` before solving.
    pub paths_start_at_origin: bool,
    /// Index of the pose used as path origin.
    pub align_index: usize,
    /// Solver options (sign policies and null-space tolerance).
    pub solver: DualQuaternionHandEyeOptions,
}

impl Default for HandEyeConfig {
    fn default() -> Self {
        Self {
            paths_start_at_origin: true,
            align_index: 0,
            solver: DualQuaternionHandEyeOptions::default(),
        }
    }
}
