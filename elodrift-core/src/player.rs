//! Player entity - observed rating and latent skill

use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

/// Stable player identifier, assigned monotonically by `Population`
pub type PlayerId = u64;

/// Standard deviation of a single performance sample
pub const PERFORMANCE_SPREAD: f64 = 100.0;

/// A simulated competitor
///
/// `rating` is the published score the match engine adjusts; `true_skill`
/// is the hidden ability that actually drives performance. The two start
/// far apart and the simulation watches whether they converge.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Unique for the lifetime of the population
    pub id: PlayerId,
    /// Observed competitive rating, never below zero
    pub rating: f64,
    /// Latent ability, unclamped
    pub true_skill: f64,
}

impl Player {
    /// Create a player with explicit starting values
    pub fn new(id: PlayerId, rating: f64, true_skill: f64) -> Self {
        Self {
            id,
            rating,
            true_skill,
        }
    }

    /// Draw one performance sample: Normal(true_skill, PERFORMANCE_SPREAD)
    ///
    /// Each call is an independent draw; a player can over- or
    /// under-perform on any given match.
    pub fn sample_performance<R: Rng>(&self, rng: &mut R) -> f64 {
        let z: f64 = rng.sample(StandardNormal);
        self.true_skill + PERFORMANCE_SPREAD * z
    }

    /// Shift the rating, clamping at the zero floor
    ///
    /// Returns true when the floor absorbed part of the loss.
    pub fn apply_rating_delta(&mut self, delta: f64) -> bool {
        let raw = self.rating + delta;
        if raw < 0.0 {
            self.rating = 0.0;
            true
        } else {
            self.rating = raw;
            false
        }
    }

    /// Move the latent skill; nothing clamps here
    pub fn advance_skill(&mut self, gain: f64) {
        self.true_skill += gain;
    }
}
