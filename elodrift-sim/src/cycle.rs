//! Population turnover policy
//!
//! Level 4 - Utilities and configuration

use serde::{Deserialize, Serialize};

/// When and how much of the roster to replace
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CyclePolicy {
    /// Fraction of the roster replaced per cycle
    pub fraction: f64,
    /// Generations between cycles; a cycle lands on every multiple,
    /// generation 0 included
    pub interval: u64,
}

impl Default for CyclePolicy {
    fn default() -> Self {
        Self {
            fraction: 0.10,
            interval: 200,
        }
    }
}

impl CyclePolicy {
    /// Default fraction at the given interval
    pub fn every(interval: u64) -> Self {
        Self {
            interval,
            ..Default::default()
        }
    }

    /// Set the fraction replaced per cycle
    pub fn with_fraction(mut self, fraction: f64) -> Self {
        self.fraction = fraction;
        self
    }

    /// Whether a cycle is due before this generation's matches
    pub fn due(&self, generation: u64) -> bool {
        self.interval > 0 && generation % self.interval == 0
    }

    /// How many players one cycle removes, rounded down
    pub fn drop_count(&self, population_size: usize) -> usize {
        (population_size as f64 * self.fraction) as usize
    }
}
