//! Simulation driver - the generation loop over a shared roster
//!
//! Level 1 - Orchestration and Level 2 - Phases

use elodrift_core::{
    apply_outcome, sample_outcome, schedule, ConfigError, MatchReport, Matchup, Population,
    ScheduleError, SimConfig,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use crate::cycle::CyclePolicy;

/// What happened during one generation
#[derive(Clone, Debug)]
pub struct GenerationSummary {
    /// Generation that was played (counting from 0)
    pub generation: u64,
    /// Matchups resolved
    pub matchups: usize,
    /// Matchups won by side A
    pub team_a_wins: usize,
    /// Rating updates stopped by the zero floor
    pub floor_clamps: u32,
    /// Mean of the per-matchup performance averages
    pub mean_match_average: f64,
}

/// A running simulation: configuration, roster, and master randomness
pub struct Simulation {
    config: SimConfig,
    population: Population,
    rng: ChaCha8Rng,
    generation: u64,
}

impl Simulation {
    /// Configuration the simulation was built with
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Generations completed so far
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Current roster
    pub fn population(&self) -> &Population {
        &self.population
    }
}

// ============================================================================
// Level 1 - Orchestration
// ============================================================================

impl Simulation {
    /// Set up a simulation with a freshly seeded roster (Level 1)
    ///
    /// # Arguments
    /// * `config` - Simulation parameters, validated before anything is built
    /// * `seed` - Master seed for reproducible runs; `None` seeds from entropy
    pub fn new(config: SimConfig, seed: Option<u64>) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut rng = match seed {
            Some(s) => ChaCha8Rng::seed_from_u64(s),
            None => ChaCha8Rng::from_entropy(),
        };
        let population = Population::seeded(&config, &mut rng);

        Ok(Self {
            config,
            population,
            rng,
            generation: 0,
        })
    }

    /// Step through `generations`, reporting each to `observer` (Level 1)
    ///
    /// Reporting and population cycling live in the caller; the loop itself
    /// only plays generations.
    pub fn run<F>(&mut self, generations: u64, mut observer: F) -> Result<(), ScheduleError>
    where
        F: FnMut(&Simulation, &GenerationSummary),
    {
        for _ in 0..generations {
            let summary = self.step()?;
            observer(self, &summary);
        }
        Ok(())
    }
}

// ============================================================================
// Level 2 - Phases
// ============================================================================

impl Simulation {
    /// Play one generation (Level 2 phase)
    ///
    /// Schedules the roster into matchups, resolves them, applies every
    /// rating delta, then advances everyone's true skill one notch.
    pub fn step(&mut self) -> Result<GenerationSummary, ScheduleError> {
        let matchups = schedule(
            self.population.players(),
            self.config.league_size,
            self.config.team_size,
            &mut self.rng,
        )?;

        let reports = self.resolve_all(&matchups);

        let mut floor_clamps = 0;
        for report in &reports {
            floor_clamps += apply_outcome(self.population.players_mut(), report);
        }

        self.advance_skills();

        let summary = summarize(self.generation, &reports, floor_clamps);
        self.generation += 1;
        Ok(summary)
    }

    /// Phase out part of the roster and refill with newcomers (Level 2 phase)
    ///
    /// Returns how many players were replaced. Refilling always restores the
    /// configured size, so the league partition invariant survives cycling.
    pub fn cycle_population(&mut self, policy: CyclePolicy) -> usize {
        let drop_count = policy.drop_count(self.config.population_size);
        let removed = self.population.phase_out_random(drop_count, &mut self.rng);
        self.population.refill(&self.config, &mut self.rng);

        assert_eq!(
            self.population.len(),
            self.config.population_size,
            "cycling must preserve the roster size"
        );
        removed
    }
}

// ============================================================================
// Level 3 - Steps
// ============================================================================

impl Simulation {
    /// Resolve every matchup into a report without touching ratings (Level 3)
    ///
    /// Each matchup samples from its own rng, derived from one base seed
    /// drawn off the master rng, so the parallel and sequential paths
    /// produce identical reports for the same master seed.
    fn resolve_all(&mut self, matchups: &[Matchup]) -> Vec<MatchReport> {
        let base_seed: u64 = self.rng.gen();
        let players = self.population.players();

        if self.config.parallel {
            matchups
                .par_iter()
                .enumerate()
                .map(|(i, matchup)| {
                    let mut rng = ChaCha8Rng::seed_from_u64(base_seed.wrapping_add(i as u64));
                    sample_outcome(players, matchup, &mut rng)
                })
                .collect()
        } else {
            matchups
                .iter()
                .enumerate()
                .map(|(i, matchup)| {
                    let mut rng = ChaCha8Rng::seed_from_u64(base_seed.wrapping_add(i as u64));
                    sample_outcome(players, matchup, &mut rng)
                })
                .collect()
        }
    }

    /// Advance every player's true skill one generation (Level 3)
    fn advance_skills(&mut self) {
        let growth = self.config.growth;
        for player in self.population.players_mut() {
            let gain = growth.gain(player.true_skill);
            player.advance_skill(gain);
        }
    }
}

/// Fold one generation's reports into a summary (Level 3)
fn summarize(generation: u64, reports: &[MatchReport], floor_clamps: u32) -> GenerationSummary {
    let team_a_wins = reports.iter().filter(|r| r.team_a_won).count();
    let mean_match_average = if reports.is_empty() {
        0.0
    } else {
        reports.iter().map(|r| r.match_average).sum::<f64>() / reports.len() as f64
    };

    GenerationSummary {
        generation,
        matchups: reports.len(),
        team_a_wins,
        floor_clamps,
        mean_match_average,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> SimConfig {
        SimConfig::sized(40, 20, 2).with_parallel(false)
    }

    #[test]
    fn test_new_seeds_full_population() {
        let config = test_config();
        let sim = Simulation::new(config.clone(), Some(42)).unwrap();

        assert_eq!(sim.population().len(), config.population_size);
        assert_eq!(sim.generation(), 0);
        for player in sim.population().players() {
            assert_eq!(player.rating, config.initial_rating);
        }
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let result = Simulation::new(SimConfig::sized(41, 20, 2), Some(42));
        assert!(result.is_err());
    }

    #[test]
    fn test_step_preserves_roster_and_rating_floor() {
        let mut sim = Simulation::new(test_config(), Some(42)).unwrap();

        for _ in 0..5 {
            sim.step().unwrap();
        }

        assert_eq!(sim.generation(), 5);
        assert_eq!(sim.population().len(), 40);
        for player in sim.population().players() {
            assert!(player.rating.is_finite());
            assert!(player.rating >= 0.0);
        }
    }

    #[test]
    fn test_step_summary_counts() {
        let mut sim = Simulation::new(test_config(), Some(42)).unwrap();

        let summary = sim.step().unwrap();

        // 40 players / (2 * 2 per matchup)
        assert_eq!(summary.generation, 0);
        assert_eq!(summary.matchups, 10);
        assert!(summary.team_a_wins <= summary.matchups);
        assert!(summary.mean_match_average.is_finite());
    }

    #[test]
    fn test_deterministic_with_seed() {
        let mut a = Simulation::new(test_config(), Some(7)).unwrap();
        let mut b = Simulation::new(test_config(), Some(7)).unwrap();

        for _ in 0..5 {
            a.step().unwrap();
            b.step().unwrap();
        }

        assert_eq!(a.population().snapshot(), b.population().snapshot());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let mut seq = Simulation::new(test_config().with_parallel(false), Some(42)).unwrap();
        let mut par = Simulation::new(test_config().with_parallel(true), Some(42)).unwrap();

        for _ in 0..3 {
            seq.step().unwrap();
            par.step().unwrap();
        }

        assert_eq!(seq.population().snapshot(), par.population().snapshot());
    }

    #[test]
    fn test_skills_advance_each_step() {
        let mut sim = Simulation::new(test_config(), Some(42)).unwrap();
        let before: f64 = sim.population().players().iter().map(|p| p.true_skill).sum();

        sim.step().unwrap();

        let after: f64 = sim.population().players().iter().map(|p| p.true_skill).sum();
        assert!(after > before, "growth should lift total skill");
    }

    #[test]
    fn test_cycle_replaces_players_with_fresh_ids() {
        let mut sim = Simulation::new(test_config(), Some(42)).unwrap();
        let max_id_before = sim.population().players().iter().map(|p| p.id).max().unwrap();

        let removed = sim.cycle_population(CyclePolicy::default().with_fraction(0.25));

        assert_eq!(removed, 10);
        assert_eq!(sim.population().len(), 40);
        let max_id_after = sim.population().players().iter().map(|p| p.id).max().unwrap();
        assert!(max_id_after > max_id_before);
    }

    #[test]
    fn test_run_invokes_observer_each_generation() {
        let mut sim = Simulation::new(test_config(), Some(42)).unwrap();
        let mut seen = Vec::new();

        sim.run(5, |_, summary| seen.push(summary.generation)).unwrap();

        assert_eq!(seen, vec![0, 1, 2, 3, 4]);
        assert_eq!(sim.generation(), 5);
    }
}
