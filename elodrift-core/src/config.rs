//! Simulation configuration - sizes, distributions, and skill growth

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::schedule::{check_partition, ScheduleError};

/// A configuration the simulation cannot run with
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ConfigError {
    /// Sizes do not partition into leagues and paired teams
    #[error(transparent)]
    Partition(#[from] ScheduleError),
    /// Skill spread would produce nonsense draws
    #[error("skill spread must be finite and non-negative, got {0}")]
    SkillSpread(f64),
    /// Growth scale of zero or below breaks the logistic curve
    #[error("growth scale must be positive, got {0}")]
    GrowthScale(f64),
}

/// Logistic skill growth applied after each generation
///
/// Low-skilled players improve quickly and the gain tapers toward zero
/// as skill rises: `gain(s) = max_gain / (1 + e^(s / scale))`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SkillGrowth {
    /// Asymptotic gain for very low skill
    pub max_gain: f64,
    /// Skill scale over which the gain decays
    pub scale: f64,
}

impl Default for SkillGrowth {
    fn default() -> Self {
        Self {
            max_gain: 10.0,
            scale: 250.0,
        }
    }
}

impl SkillGrowth {
    /// Per-generation true skill gain at skill level `s`
    pub fn gain(&self, s: f64) -> f64 {
        self.max_gain / (1.0 + (s / self.scale).exp())
    }
}

/// Everything a simulation run needs to know up front
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Total players in the roster
    pub population_size: usize,
    /// Rating every newcomer starts at
    pub initial_rating: f64,
    /// Players per league
    pub league_size: usize,
    /// Players per team
    pub team_size: usize,
    /// Mean of the true skill distribution for newcomers
    pub skill_mean: f64,
    /// Standard deviation of the true skill distribution
    pub skill_spread: f64,
    /// Skill growth curve
    pub growth: SkillGrowth,
    /// Resolve matchups across threads
    pub parallel: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            population_size: 10_000,
            initial_rating: 250.0,
            league_size: 1_000,
            team_size: 5,
            skill_mean: 500.0,
            skill_spread: 125.0,
            growth: SkillGrowth::default(),
            parallel: true,
        }
    }
}

impl SimConfig {
    /// Configuration with the given partition sizes and default everything else
    pub fn sized(population_size: usize, league_size: usize, team_size: usize) -> Self {
        Self {
            population_size,
            league_size,
            team_size,
            ..Default::default()
        }
    }

    /// Set the rating newcomers start at
    pub fn with_initial_rating(mut self, rating: f64) -> Self {
        self.initial_rating = rating;
        self
    }

    /// Set the true skill distribution for newcomers
    pub fn with_skill_distribution(mut self, mean: f64, spread: f64) -> Self {
        self.skill_mean = mean;
        self.skill_spread = spread;
        self
    }

    /// Set the skill growth curve
    pub fn with_growth(mut self, growth: SkillGrowth) -> Self {
        self.growth = growth;
        self
    }

    /// Enable or disable parallel match resolution
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Reject configurations the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_partition(self.population_size, self.league_size, self.team_size)?;
        if !self.skill_spread.is_finite() || self.skill_spread < 0.0 {
            return Err(ConfigError::SkillSpread(self.skill_spread));
        }
        if !self.growth.scale.is_finite() || self.growth.scale <= 0.0 {
            return Err(ConfigError::GrowthScale(self.growth.scale));
        }
        Ok(())
    }

    /// Load a configuration from a JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Save this configuration to a JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn test_sized_overrides_partition_fields() {
        let config = SimConfig::sized(40, 20, 2);

        assert_eq!(config.population_size, 40);
        assert_eq!(config.league_size, 20);
        assert_eq!(config.team_size, 2);
        assert_eq!(config.initial_rating, 250.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_ragged_population() {
        let config = SimConfig::sized(10_001, 1_000, 5);

        let err = config.validate().unwrap_err();
        assert_eq!(
            err,
            ConfigError::Partition(ScheduleError::PopulationIndivisible {
                population: 10_001,
                league_size: 1_000,
            })
        );
    }

    #[test]
    fn test_validate_rejects_odd_team_count() {
        let config = SimConfig::sized(30, 15, 5);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_spread_and_scale() {
        let bad_spread = SimConfig::default().with_skill_distribution(500.0, -1.0);
        assert_eq!(bad_spread.validate(), Err(ConfigError::SkillSpread(-1.0)));

        let bad_scale = SimConfig::default().with_growth(SkillGrowth {
            max_gain: 10.0,
            scale: 0.0,
        });
        assert_eq!(bad_scale.validate(), Err(ConfigError::GrowthScale(0.0)));
    }

    #[test]
    fn test_growth_gain_at_zero_skill_is_half_max() {
        let growth = SkillGrowth::default();
        assert!((growth.gain(0.0) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_growth_gain_decays_with_skill() {
        let growth = SkillGrowth::default();

        let low = growth.gain(100.0);
        let mid = growth.gain(500.0);
        let high = growth.gain(2_000.0);

        assert!(low > mid);
        assert!(mid > high);
        assert!(high < 0.01, "gain {} should be near zero", high);
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = SimConfig::sized(40, 20, 2)
            .with_initial_rating(100.0)
            .with_parallel(false);

        let json = serde_json::to_string(&config).unwrap();
        let back: SimConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(back, config);
    }
}
