//! ELODRIFT Core - rating drift simulation building blocks
//!
//! This crate provides the mechanics of the rating simulation:
//! - Player entities with an observed rating and a latent true skill
//! - Performance sampling around true skill
//! - Match resolution with floor-clamped rating deltas
//! - Rating-sorted league partitioning and team pairing
//! - An owned population roster with stable id allocation

pub mod config;
pub mod matchup;
pub mod player;
pub mod population;
pub mod schedule;

// Re-exports for convenient access
pub use config::{ConfigError, SimConfig, SkillGrowth};
pub use matchup::{
    apply_outcome, resolve, sample_outcome, settle, MatchReport, Matchup, BASE_DELTA,
    PERFORMANCE_DIVISOR, WIN_SWING,
};
pub use player::{Player, PlayerId, PERFORMANCE_SPREAD};
pub use population::Population;
pub use schedule::{check_partition, schedule, ScheduleError};
