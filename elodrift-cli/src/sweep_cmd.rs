//! Sweep command - compare final outcomes across one parameter's values
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: run_sweep(), report_sweep()
//! - Level 3: run_single(), apply_value()
//! - Level 4: value parsing and formatting utilities

use anyhow::{bail, Context, Result};
use clap::{Args, ValueEnum};

use elodrift_core::SimConfig;
use elodrift_sim::{CyclePolicy, PopulationStats, Simulation};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

/// Which knob the sweep varies
#[derive(Clone, Copy, Debug, PartialEq, ValueEnum)]
pub enum SweepParam {
    /// Players per league
    LeagueSize,
    /// Players per team
    TeamSize,
    /// Fraction of the roster replaced per cycle
    CycleFraction,
}

#[derive(Args)]
pub struct SweepArgs {
    /// Parameter to vary
    #[arg(long, value_enum)]
    pub param: SweepParam,

    /// Values to try, comma separated
    #[arg(long, value_delimiter = ',', required = true)]
    pub values: Vec<f64>,

    /// Generations per run
    #[arg(long, default_value = "200")]
    pub generations: u64,

    /// Total players in the roster
    #[arg(long, default_value = "10000")]
    pub population: usize,

    /// Players per league (unless swept)
    #[arg(long, default_value = "1000")]
    pub league_size: usize,

    /// Players per team (unless swept)
    #[arg(long, default_value = "5")]
    pub team_size: usize,

    /// Generations between cycles (cycle-fraction sweeps only)
    #[arg(long, default_value = "200")]
    pub cycle_interval: u64,

    /// Resolve matchups on one thread
    #[arg(long)]
    pub no_parallel: bool,

    /// Output the comparison as JSON
    #[arg(long)]
    pub json: bool,
}

/// Final measurements for one swept value
#[derive(Clone, Debug)]
struct SweepRow {
    value: f64,
    mean_rating: f64,
    correlation: f64,
    floor_clamps: u64,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run the sweep command
///
/// This function reads like a table of contents:
/// 1. Check the requested values
/// 2. Run one simulation per value, seeds derived from one base
/// 3. Print the comparison
pub fn run(args: SweepArgs, seed: Option<u64>) -> Result<()> {
    if args.values.is_empty() {
        bail!("--values needs at least one entry");
    }

    let base_seed = seed.unwrap_or_else(rand::random);
    tracing::info!(
        "Sweeping {:?} over {} values ({} generations each, base seed {})",
        args.param,
        args.values.len(),
        args.generations,
        base_seed
    );

    let rows = run_sweep(&args, base_seed)?;
    report_sweep(&args, &rows);

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Run every requested value with its own derived seed
fn run_sweep(args: &SweepArgs, base_seed: u64) -> Result<Vec<SweepRow>> {
    let mut rows = Vec::with_capacity(args.values.len());

    for (run_index, &value) in args.values.iter().enumerate() {
        let seed = base_seed.wrapping_add(run_index as u64);
        let row = run_single(args, value, seed)
            .with_context(|| format!("Sweep run failed for value {}", value))?;

        tracing::info!(
            "{:?} = {}: mean rating {:.1}, correlation {:.3}",
            args.param,
            value,
            row.mean_rating,
            row.correlation
        );
        rows.push(row);
    }

    Ok(rows)
}

/// Print the comparison
fn report_sweep(args: &SweepArgs, rows: &[SweepRow]) {
    if args.json {
        print_json_rows(args, rows);
    } else {
        print_table(args, rows);
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Run one simulation to completion and measure the final roster
fn run_single(args: &SweepArgs, value: f64, seed: u64) -> Result<SweepRow> {
    let config = apply_value(args, value)?;
    let policy = match args.param {
        SweepParam::CycleFraction => {
            Some(CyclePolicy::every(args.cycle_interval).with_fraction(value))
        }
        _ => None,
    };

    let mut sim =
        Simulation::new(config, Some(seed)).context("Invalid simulation configuration")?;

    let mut floor_clamps = 0u64;
    for _ in 0..args.generations {
        if let Some(policy) = policy {
            if policy.due(sim.generation()) {
                sim.cycle_population(policy);
            }
        }
        let summary = sim.step()?;
        floor_clamps += summary.floor_clamps as u64;
    }

    let stats = PopulationStats::compute(sim.population().players());
    Ok(SweepRow {
        value,
        mean_rating: stats.mean_rating,
        correlation: stats.rating_skill_correlation,
        floor_clamps,
    })
}

/// Build the configuration with the swept value in place
fn apply_value(args: &SweepArgs, value: f64) -> Result<SimConfig> {
    let mut config = SimConfig::sized(args.population, args.league_size, args.team_size)
        .with_parallel(!args.no_parallel);

    match args.param {
        SweepParam::LeagueSize => config.league_size = as_size(value)?,
        SweepParam::TeamSize => config.team_size = as_size(value)?,
        // Varied through the cycle policy, not the config
        SweepParam::CycleFraction => {}
    }

    Ok(config)
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Whole positive integer out of a sweep value
fn as_size(value: f64) -> Result<usize> {
    if value < 1.0 || value.fract() != 0.0 {
        bail!("{} is not a whole positive size", value);
    }
    Ok(value as usize)
}

/// Print the comparison as an aligned table
fn print_table(args: &SweepArgs, rows: &[SweepRow]) {
    println!("\n=== Sweep Results: {:?} ===", args.param);
    println!(
        "{:>12} {:>12} {:>8} {:>12}",
        "value", "mean rating", "corr", "floor clamps"
    );
    for row in rows {
        println!(
            "{:>12} {:>12.1} {:>8.3} {:>12}",
            row.value, row.mean_rating, row.correlation, row.floor_clamps
        );
    }
}

/// Print the comparison as JSON
fn print_json_rows(args: &SweepArgs, rows: &[SweepRow]) {
    #[derive(serde::Serialize)]
    struct JsonRow {
        value: f64,
        mean_rating: f64,
        correlation: f64,
        floor_clamps: u64,
    }

    #[derive(serde::Serialize)]
    struct JsonOutput {
        param: String,
        generations: u64,
        rows: Vec<JsonRow>,
    }

    let output = JsonOutput {
        param: format!("{:?}", args.param),
        generations: args.generations,
        rows: rows
            .iter()
            .map(|r| JsonRow {
                value: r.value,
                mean_rating: r.mean_rating,
                correlation: r.correlation,
                floor_clamps: r.floor_clamps,
            })
            .collect(),
    };

    if let Ok(json) = serde_json::to_string_pretty(&output) {
        println!("{}", json);
    }
}

// ============================================================================
// TESTS
// ============================================================================
