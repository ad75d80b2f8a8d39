//! ELODRIFT Sim - generation driver for rating drift experiments
//!
//! This crate provides the simulation loop:
//! - Generation stepping (schedule, resolve, apply, grow)
//! - Population cycling (phase out and refill)
//! - Roster statistics and rating histograms
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: Simulation::run (orchestration)
//! - Level 2: Simulation::step, Simulation::cycle_population (phases)
//! - Level 3: resolve_all, PopulationStats::compute (steps)
//! - Level 4: CyclePolicy, utilities

mod cycle;
mod driver;
mod stats;

pub use cycle::CyclePolicy;
pub use driver::{GenerationSummary, Simulation};
pub use stats::{Histogram, PopulationStats};
