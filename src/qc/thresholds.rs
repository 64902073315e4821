use serde::{Deserialize, Serialize};

use crate::metrics::FunctionalMetrics;

/// Fixed pass/fail cut-offs. Comparisons are strict; a missing metric
/// never passes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QcThresholds {
    /// Upper bound on mean framewise displacement (mm).
    pub mean_fd: f64,
    /// Volumes with displacement at or above this (mm) are scrubbed.
    pub scrubbing_fd: f64,
    /// Lower bound on the fraction of volumes surviving scrubbing.
    pub proportion_kept: f64,
    pub anatomical_dice: f64,
    pub functional_dice: f64,
}

impl QcThresholds {
    pub const STANDARD: Self = Self {
        mean_fd: 0.55,
        scrubbing_fd: 0.2,
        proportion_kept: 0.5,
        anatomical_dice: 0.99,
        functional_dice: 0.89,
    };

    pub fn passes_functional(&self, metrics: &FunctionalMetrics) -> bool {
        let fd_ok = metrics.mean_fd_raw().is_some_and(|v| v < self.mean_fd);
        let kept_ok = metrics
            .proportion_kept()
            .is_some_and(|v| v > self.proportion_kept);
        let dice_ok = metrics
            .functional_dice
            .is_some_and(|v| v > self.functional_dice);
        fd_ok && kept_ok && dice_ok
    }

    pub fn passes_anatomical(&self, anatomical_dice: f64) -> bool {
        anatomical_dice > self.anatomical_dice
    }
}

impl Default for QcThresholds {
    fn default() -> Self {
        Self::STANDARD
    }
}
