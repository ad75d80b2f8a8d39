//! Integration tests for the rating drift simulator
//!
//! Tests the full stack: league scheduling, match resolution, skill
//! growth, population cycling, and roster statistics

use elodrift_core::{schedule, SimConfig};
use elodrift_sim::{CyclePolicy, Histogram, PopulationStats, Simulation};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Instant;

// ============================================================================
// TEST FIXTURES
// ============================================================================

/// Small roster that still satisfies every partition rule
fn small_config() -> SimConfig {
    SimConfig::sized(40, 20, 2).with_parallel(false)
}

// ============================================================================
// SIMULATION LOOP TESTS
// ============================================================================

#[test]
fn test_simulation_preserves_invariants() {
    let mut sim = Simulation::new(small_config(), Some(42)).unwrap();

    for _ in 0..10 {
        let summary = sim.step().unwrap();
        assert_eq!(summary.matchups, 10);

        assert_eq!(sim.population().len(), 40);
        for player in sim.population().players() {
            assert!(player.rating >= 0.0, "rating {} below floor", player.rating);
            assert!(player.rating.is_finite());
            assert!(player.true_skill.is_finite());
        }
    }

    let mut ids: Vec<u64> = sim.population().players().iter().map(|p| p.id).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 40, "ids must stay unique");
}

#[test]
fn test_same_seed_reproduces_runs_with_cycling() {
    let policy = CyclePolicy::every(5).with_fraction(0.1);
    let mut a = Simulation::new(small_config(), Some(9)).unwrap();
    let mut b = Simulation::new(small_config(), Some(9)).unwrap();

    for _ in 0..10 {
        if policy.due(a.generation()) {
            a.cycle_population(policy);
            b.cycle_population(policy);
        }
        a.step().unwrap();
        b.step().unwrap();
    }

    assert_eq!(a.population().snapshot(), b.population().snapshot());
}

#[test]
fn test_parallel_equals_sequential() {
    let mut seq = Simulation::new(small_config().with_parallel(false), Some(13)).unwrap();
    let mut par = Simulation::new(small_config().with_parallel(true), Some(13)).unwrap();

    for _ in 0..10 {
        seq.step().unwrap();
        par.step().unwrap();
    }

    assert_eq!(seq.population().snapshot(), par.population().snapshot());
}

// ============================================================================
// SCHEDULING TESTS
// ============================================================================

#[test]
fn test_schedule_covers_full_roster_mid_run() {
    let mut sim = Simulation::new(small_config(), Some(42)).unwrap();
    for _ in 0..3 {
        sim.step().unwrap();
    }

    // Schedule by hand off the live roster and check coverage
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let matchups = schedule(sim.population().players(), 20, 2, &mut rng).unwrap();

    assert_eq!(matchups.len(), 10);
    let mut seen = vec![false; 40];
    for m in &matchups {
        for &pos in m.team_a.iter().chain(&m.team_b) {
            assert!(!seen[pos], "player {} scheduled twice", pos);
            seen[pos] = true;
        }
    }
    assert!(seen.iter().all(|&s| s), "someone was left unscheduled");
}

// ============================================================================
// CYCLING TESTS
// ============================================================================

#[test]
fn test_cycling_refreshes_roster() {
    let mut sim = Simulation::new(small_config(), Some(42)).unwrap();
    for _ in 0..3 {
        sim.step().unwrap();
    }

    let max_id_before = sim.population().players().iter().map(|p| p.id).max().unwrap();
    let replaced = sim.cycle_population(CyclePolicy::every(1).with_fraction(0.25));

    assert_eq!(replaced, 10);
    assert_eq!(sim.population().len(), 40);

    let newcomers: Vec<_> = sim
        .population()
        .players()
        .iter()
        .filter(|p| p.id > max_id_before)
        .collect();
    assert_eq!(newcomers.len(), 10);
    for newcomer in newcomers {
        assert_eq!(newcomer.rating, sim.config().initial_rating);
    }

    // The refreshed roster still schedules cleanly
    sim.step().unwrap();
    assert_eq!(sim.population().len(), 40);
}

// ============================================================================
// STATISTICS TESTS
// ============================================================================

#[test]
fn test_ratings_drift_toward_true_skill() {
    let config = SimConfig::sized(100, 20, 2).with_parallel(false);
    let mut sim = Simulation::new(config, Some(42)).unwrap();

    let start = PopulationStats::compute(sim.population().players());
    for _ in 0..60 {
        sim.step().unwrap();
    }
    let end = PopulationStats::compute(sim.population().players());

    println!(
        "Rating-skill correlation: start {:.3}, end {:.3}",
        start.rating_skill_correlation, end.rating_skill_correlation
    );
    println!(
        "Mean rating: start {:.1}, end {:.1}",
        start.mean_rating, end.mean_rating
    );

    // Every rating starts equal, so the correlation starts at zero
    assert_eq!(start.rating_skill_correlation, 0.0);
    assert!(
        end.rating_skill_correlation > 0.1,
        "ratings should order by skill, correlation {}",
        end.rating_skill_correlation
    );
}

#[test]
fn test_histogram_covers_roster() {
    let mut sim = Simulation::new(small_config(), Some(42)).unwrap();
    for _ in 0..5 {
        sim.step().unwrap();
    }

    let players = sim.population().players();
    let hist = Histogram::of_ratings(players, 4, 1_500.0);

    assert_eq!(hist.counts.len(), 4);
    assert_eq!(hist.total() as usize + hist.excluded, players.len());
}

#[test]
fn test_stats_match_roster_totals() {
    let mut sim = Simulation::new(small_config(), Some(42)).unwrap();
    for _ in 0..5 {
        sim.step().unwrap();
    }

    let players = sim.population().players();
    let stats = PopulationStats::compute(players);

    let total: f64 = players.iter().map(|p| p.rating).sum();
    assert_eq!(stats.count, 40);
    assert!((stats.total_rating - total).abs() < 1e-9);
    assert!(stats.min_rating <= stats.mean_rating);
    assert!(stats.mean_rating <= stats.max_rating);
}

// ============================================================================
// ERROR HANDLING TESTS
// ============================================================================

#[test]
fn test_invalid_sizes_surface_before_any_matches() {
    assert!(Simulation::new(SimConfig::sized(41, 20, 2), Some(42)).is_err());
    assert!(Simulation::new(SimConfig::sized(40, 20, 3), Some(42)).is_err());
    assert!(Simulation::new(SimConfig::sized(30, 15, 5), Some(42)).is_err());
}

// ============================================================================
// PERFORMANCE COMPARISON
// ============================================================================

#[test]
fn test_performance_comparison() {
    println!("\n=== Resolution Performance Comparison ===\n");

    let config = SimConfig::sized(400, 100, 2);

    for parallel in [false, true] {
        let mut sim = Simulation::new(config.clone().with_parallel(parallel), Some(42)).unwrap();

        let start = Instant::now();
        for _ in 0..5 {
            sim.step().unwrap();
        }
        let elapsed = start.elapsed();

        println!("parallel={}: 5 generations in {:?}", parallel, elapsed);
        assert!(elapsed.as_millis() < 30000, "resolution took too long");
    }

    println!("\n=== End Performance Comparison ===\n");
}
