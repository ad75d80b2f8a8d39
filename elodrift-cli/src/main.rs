//! ELODRIFT CLI - Command-line interface
//!
//! Commands:
//! - run: Drive a rating drift simulation with periodic reports
//! - sweep: Compare final outcomes across one parameter's values

mod run_cmd;
mod sweep_cmd;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "elodrift")]
#[command(about = "Rating drift simulator for league-based matchmaking")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Seed for reproducible runs (random when omitted)
    #[arg(long, global = true)]
    seed: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a simulation with periodic reports
    Run(run_cmd::RunArgs),
    /// Re-run the simulation across values of one parameter
    Sweep(sweep_cmd::SweepArgs),
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => run_cmd::run(args, cli.seed),
        Commands::Sweep(args) => sweep_cmd::run(args, cli.seed),
    }
}
