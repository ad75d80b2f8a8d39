//! Roster management - player identity, seeding, and turnover

use rand::Rng;
use rand_distr::StandardNormal;

use crate::config::SimConfig;
use crate::player::{Player, PlayerId};

/// The full roster of players plus the id counter for newcomers
///
/// Ids are handed out once and never reused, so a player phased out in
/// one generation cannot be confused with a later arrival.
#[derive(Clone, Debug, Default)]
pub struct Population {
    players: Vec<Player>,
    next_id: PlayerId,
}

impl Population {
    /// Empty roster starting ids at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Roster filled to the configured size with fresh players
    pub fn seeded<R: Rng>(config: &SimConfig, rng: &mut R) -> Self {
        let mut population = Self::new();
        population.refill(config, rng);
        population
    }

    /// Add one player, assigning the next id
    pub fn spawn(&mut self, rating: f64, true_skill: f64) -> PlayerId {
        let id = self.next_id;
        self.next_id += 1;
        self.players.push(Player::new(id, rating, true_skill));
        id
    }

    /// Top the roster back up to the configured size
    ///
    /// Newcomers start at the configured initial rating with a true skill
    /// drawn from the configured normal distribution. Returns how many
    /// players were added.
    pub fn refill<R: Rng>(&mut self, config: &SimConfig, rng: &mut R) -> usize {
        let mut added = 0;
        while self.players.len() < config.population_size {
            let z: f64 = rng.sample(StandardNormal);
            let true_skill = config.skill_mean + config.skill_spread * z;
            self.spawn(config.initial_rating, true_skill);
            added += 1;
        }
        added
    }

    /// Remove `count` players chosen uniformly at random
    ///
    /// Removal ignores rating and skill entirely. Asking for more players
    /// than exist empties the roster. Returns how many were removed.
    pub fn phase_out_random<R: Rng>(&mut self, count: usize, rng: &mut R) -> usize {
        let count = count.min(self.players.len());
        if count == 0 {
            return 0;
        }
        let mut doomed = rand::seq::index::sample(rng, self.players.len(), count).into_vec();
        // Remove from the back so earlier indices stay valid
        doomed.sort_unstable();
        for pos in doomed.into_iter().rev() {
            self.players.swap_remove(pos);
        }
        count
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Current roster, in storage order
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Mutable roster access for applying match outcomes
    pub fn players_mut(&mut self) -> &mut [Player] {
        &mut self.players
    }

    /// Owned copy of the roster, for snapshots and reports
    pub fn snapshot(&self) -> Vec<Player> {
        self.players.clone()
    }
}
