//! Run command - drive a full simulation with periodic reports
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: build_config(), simulate(), report()
//! - Level 3: print_text_report(), print_histogram(), write_snapshot()
//! - Level 4: formatting utilities

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};

use elodrift_core::{SimConfig, SkillGrowth};
use elodrift_sim::{CyclePolicy, Histogram, PopulationStats, Simulation};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct RunArgs {
    /// Generations to simulate
    #[arg(long, default_value = "1000")]
    pub generations: u64,

    /// Total players in the roster
    #[arg(long, default_value = "10000")]
    pub population: usize,

    /// Players per league
    #[arg(long, default_value = "1000")]
    pub league_size: usize,

    /// Players per team
    #[arg(long, default_value = "5")]
    pub team_size: usize,

    /// Rating every newcomer starts at
    #[arg(long, default_value = "250")]
    pub initial_rating: f64,

    /// Mean of the newcomer true skill distribution
    #[arg(long, default_value = "500")]
    pub skill_mean: f64,

    /// Spread of the newcomer true skill distribution
    #[arg(long, default_value = "125")]
    pub skill_spread: f64,

    /// Largest per-generation skill gain
    #[arg(long, default_value = "10")]
    pub max_gain: f64,

    /// Skill scale over which the gain decays
    #[arg(long, default_value = "250")]
    pub growth_scale: f64,

    /// Generations between reports (0 disables periodic reports)
    #[arg(long, default_value = "200")]
    pub report_interval: u64,

    /// Cycle the population at each report interval
    #[arg(long)]
    pub cycle: bool,

    /// Fraction of the roster replaced per cycle
    #[arg(long, default_value = "0.1")]
    pub cycle_fraction: f64,

    /// Resolve matchups on one thread
    #[arg(long)]
    pub no_parallel: bool,

    /// Histogram bins (defaults to two per league)
    #[arg(long)]
    pub bins: Option<usize>,

    /// Ratings at or beyond this magnitude stay out of the histogram
    #[arg(long, default_value = "1500")]
    pub cutoff: f64,

    /// Load the simulation configuration from a JSON file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output reports as JSON
    #[arg(long)]
    pub json: bool,

    /// Directory for JSON snapshots and the run summary
    #[arg(long, value_name = "DIR")]
    pub output: Option<PathBuf>,
}

/// Counters accumulated over the whole run
#[derive(Clone, Copy, Debug, Default)]
struct RunTotals {
    matchups: usize,
    team_a_wins: usize,
    floor_clamps: u64,
    players_cycled: usize,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run the simulation command
///
/// This function reads like a table of contents:
/// 1. Build and validate the configuration
/// 2. Simulate, reporting and cycling on the configured interval
/// 3. Report the final roster and write the run summary
pub fn run(args: RunArgs, seed: Option<u64>) -> Result<()> {
    let config = build_config(&args)?;
    let policy = cycle_policy(&args);
    let master_seed = seed.unwrap_or_else(rand::random);

    tracing::info!(
        "Starting run: {} players, leagues of {}, teams of {}, {} generations (seed {})",
        config.population_size,
        config.league_size,
        config.team_size,
        args.generations,
        master_seed
    );

    let mut sim =
        Simulation::new(config, Some(master_seed)).context("Invalid simulation configuration")?;

    let totals = simulate(&mut sim, &args, policy)?;

    report(&sim, &args)?;
    if !args.json {
        print_run_totals(&totals, args.generations);
    }

    if let Some(dir) = &args.output {
        save_run_summary(&sim, &args, &totals, master_seed, policy, dir)?;
    }

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Assemble the simulation configuration from flags or a file
fn build_config(args: &RunArgs) -> Result<SimConfig> {
    let mut config = match &args.config {
        Some(path) => SimConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => SimConfig::sized(args.population, args.league_size, args.team_size)
            .with_initial_rating(args.initial_rating)
            .with_skill_distribution(args.skill_mean, args.skill_spread)
            .with_growth(SkillGrowth {
                max_gain: args.max_gain,
                scale: args.growth_scale,
            }),
    };

    if args.no_parallel {
        config = config.with_parallel(false);
    }
    Ok(config)
}

/// Drive every generation, reporting and cycling on the interval
fn simulate(
    sim: &mut Simulation,
    args: &RunArgs,
    policy: Option<CyclePolicy>,
) -> Result<RunTotals> {
    let progress = create_progress_bar(args);
    let mut totals = RunTotals::default();

    for _ in 0..args.generations {
        let generation = sim.generation();

        // Reports and cycling land before the generation's matches
        if args.report_interval > 0 && generation % args.report_interval == 0 {
            progress.suspend(|| report(sim, args))?;
        }

        if let Some(policy) = policy {
            if policy.due(generation) {
                let replaced = sim.cycle_population(policy);
                totals.players_cycled += replaced;
                tracing::info!("Generation {}: cycled {} players", generation, replaced);
            }
        }

        let summary = sim.step()?;
        totals.matchups += summary.matchups;
        totals.team_a_wins += summary.team_a_wins;
        totals.floor_clamps += summary.floor_clamps as u64;
        progress.inc(1);
    }

    progress.finish_and_clear();
    Ok(totals)
}

/// Report the current roster (Level 2 phase)
fn report(sim: &Simulation, args: &RunArgs) -> Result<()> {
    let players = sim.population().players();
    let stats = PopulationStats::compute(players);
    let bins = args.bins.unwrap_or_else(|| default_bins(sim.config()));
    let histogram = Histogram::of_ratings(players, bins, args.cutoff);

    if args.json {
        print_json_report(sim.generation(), &stats, &histogram);
    } else {
        print_text_report(sim.generation(), &stats);
        print_histogram(&histogram);
    }

    if let Some(dir) = &args.output {
        write_snapshot(sim, dir)?;
    }

    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Print the stats block for one report
fn print_text_report(generation: u64, stats: &PopulationStats) {
    println!("\n=== Generation {} ===", generation);
    println!("Players:         {}", stats.count);
    println!("Total rating:    {:.1}", stats.total_rating);
    println!(
        "Mean rating:     {:.1} (min {:.1}, max {:.1})",
        stats.mean_rating, stats.min_rating, stats.max_rating
    );
    println!("Mean true skill: {:.1}", stats.mean_true_skill);
    println!("Rating-skill r:  {:.3}", stats.rating_skill_correlation);
}

/// Print the rating histogram as proportional bars
fn print_histogram(histogram: &Histogram) {
    let peak = histogram.counts.iter().copied().max().unwrap_or(0);
    if peak == 0 {
        println!("(no ratings inside the cutoff)");
        return;
    }

    println!("\nRating distribution:");
    for (lo, hi, count) in histogram.rows() {
        let width = (count * 40 / peak) as usize;
        println!(
            "  [{:>8.1}, {:>8.1})  {:>6}  {}",
            lo,
            hi,
            count,
            "#".repeat(width)
        );
    }
    if histogram.excluded > 0 {
        println!("  ({} players beyond the cutoff)", histogram.excluded);
    }
}

/// Print a machine-readable report
fn print_json_report(generation: u64, stats: &PopulationStats, histogram: &Histogram) {
    #[derive(serde::Serialize)]
    struct JsonReport<'a> {
        generation: u64,
        stats: &'a PopulationStats,
        histogram: &'a Histogram,
    }

    let output = JsonReport {
        generation,
        stats,
        histogram,
    };

    if let Ok(json) = serde_json::to_string_pretty(&output) {
        println!("{}", json);
    }
}

/// Write the roster to a per-generation JSON snapshot
fn write_snapshot(sim: &Simulation, dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;

    let path = dir.join(format!("snapshot_gen{:06}.json", sim.generation()));
    let json = serde_json::to_string_pretty(&sim.population().snapshot())?;
    std::fs::write(&path, json)
        .with_context(|| format!("Failed to write snapshot: {}", path.display()))?;

    Ok(())
}

/// Print the end-of-run counters
fn print_run_totals(totals: &RunTotals, generations: u64) {
    println!("\n=== Run Complete ===");
    println!("Generations:    {}", generations);
    println!("Matchups:       {}", totals.matchups);
    println!(
        "Side A wins:    {} ({:.1}%)",
        totals.team_a_wins,
        percentage(totals.team_a_wins, totals.matchups)
    );
    println!("Floor clamps:   {}", totals.floor_clamps);
    println!("Players cycled: {}", totals.players_cycled);
}

/// Write the whole-run summary next to the snapshots
fn save_run_summary(
    sim: &Simulation,
    args: &RunArgs,
    totals: &RunTotals,
    seed: u64,
    policy: Option<CyclePolicy>,
    dir: &Path,
) -> Result<()> {
    #[derive(serde::Serialize)]
    struct RunSummary<'a> {
        finished_at: String,
        seed: u64,
        generations: u64,
        matchups: usize,
        team_a_wins: usize,
        floor_clamps: u64,
        players_cycled: usize,
        cycle: Option<CyclePolicy>,
        config: &'a SimConfig,
        final_stats: PopulationStats,
    }

    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;

    let summary = RunSummary {
        finished_at: chrono::Local::now().to_rfc3339(),
        seed,
        generations: args.generations,
        matchups: totals.matchups,
        team_a_wins: totals.team_a_wins,
        floor_clamps: totals.floor_clamps,
        players_cycled: totals.players_cycled,
        cycle: policy,
        config: sim.config(),
        final_stats: PopulationStats::compute(sim.population().players()),
    };

    let path = dir.join("run_summary.json");
    let json = serde_json::to_string_pretty(&summary)?;
    std::fs::write(&path, json)
        .with_context(|| format!("Failed to write run summary: {}", path.display()))?;

    tracing::info!("Run summary written to {}", path.display());
    Ok(())
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Cycling policy from the flags; None when cycling is off
fn cycle_policy(args: &RunArgs) -> Option<CyclePolicy> {
    args.cycle
        .then(|| CyclePolicy::every(args.report_interval).with_fraction(args.cycle_fraction))
}

/// Progress bar over generations; hidden when reports stream as JSON
fn create_progress_bar(args: &RunArgs) -> ProgressBar {
    if args.json {
        return ProgressBar::hidden();
    }

    let bar = ProgressBar::new(args.generations);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("[{bar:40}] {pos}/{len} generations ({eta})")
            .expect("valid template")
            .progress_chars("=> "),
    );
    bar
}

/// Default histogram bin count: two bins per league
fn default_bins(config: &SimConfig) -> usize {
    (2 * config.population_size / config.league_size.max(1)).max(1)
}

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

// ============================================================================
// TESTS
// ============================================================================
