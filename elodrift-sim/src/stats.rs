//! Roster statistics and rating histograms
//!
//! Level 3 - Steps

use elodrift_core::Player;
use serde::Serialize;

/// Summary statistics over one roster snapshot
#[derive(Clone, Debug, Serialize)]
pub struct PopulationStats {
    /// Players measured
    pub count: usize,
    /// Sum of all ratings
    pub total_rating: f64,
    /// Mean rating
    pub mean_rating: f64,
    /// Lowest rating
    pub min_rating: f64,
    /// Highest rating
    pub max_rating: f64,
    /// Mean true skill
    pub mean_true_skill: f64,
    /// Pearson correlation between rating and true skill
    pub rating_skill_correlation: f64,
}

impl PopulationStats {
    /// Measure the roster (Level 3)
    pub fn compute(players: &[Player]) -> Self {
        if players.is_empty() {
            return Self {
                count: 0,
                total_rating: 0.0,
                mean_rating: 0.0,
                min_rating: 0.0,
                max_rating: 0.0,
                mean_true_skill: 0.0,
                rating_skill_correlation: 0.0,
            };
        }

        let count = players.len();
        let total_rating: f64 = players.iter().map(|p| p.rating).sum();
        let mean_true_skill =
            players.iter().map(|p| p.true_skill).sum::<f64>() / count as f64;

        Self {
            count,
            total_rating,
            mean_rating: total_rating / count as f64,
            min_rating: players.iter().map(|p| p.rating).fold(f64::INFINITY, f64::min),
            max_rating: players
                .iter()
                .map(|p| p.rating)
                .fold(f64::NEG_INFINITY, f64::max),
            mean_true_skill,
            rating_skill_correlation: pearson(players),
        }
    }
}

/// Pearson correlation of rating against true skill; 0 when either side
/// has no variance
fn pearson(players: &[Player]) -> f64 {
    let n = players.len() as f64;
    let mean_rating = players.iter().map(|p| p.rating).sum::<f64>() / n;
    let mean_skill = players.iter().map(|p| p.true_skill).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_rating = 0.0;
    let mut var_skill = 0.0;
    for p in players {
        let dr = p.rating - mean_rating;
        let ds = p.true_skill - mean_skill;
        cov += dr * ds;
        var_rating += dr * dr;
        var_skill += ds * ds;
    }

    if var_rating == 0.0 || var_skill == 0.0 {
        return 0.0;
    }
    cov / (var_rating * var_skill).sqrt()
}

/// Fixed-width rating histogram over players near the origin
#[derive(Clone, Debug, Serialize)]
pub struct Histogram {
    /// Lower edge of the first bin
    pub lo: f64,
    /// Width of every bin
    pub bin_width: f64,
    /// Players per bin, lowest ratings first
    pub counts: Vec<u64>,
    /// Players outside the cutoff, not binned
    pub excluded: usize,
}

impl Histogram {
    /// Bin the ratings with `|rating| < cutoff` into `bins` equal-width
    /// bins spanning the retained range (Level 3)
    pub fn of_ratings(players: &[Player], bins: usize, cutoff: f64) -> Self {
        let ratings: Vec<f64> = players
            .iter()
            .map(|p| p.rating)
            .filter(|r| r.abs() < cutoff)
            .collect();
        let excluded = players.len() - ratings.len();

        if bins == 0 || ratings.is_empty() {
            return Self {
                lo: 0.0,
                bin_width: 0.0,
                counts: vec![0; bins],
                excluded,
            };
        }

        let lo = ratings.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = ratings.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let span = hi - lo;

        let mut counts = vec![0u64; bins];
        if span <= 0.0 {
            // Every retained rating is identical
            counts[0] = ratings.len() as u64;
            return Self {
                lo,
                bin_width: 0.0,
                counts,
                excluded,
            };
        }

        let bin_width = span / bins as f64;
        for r in ratings {
            // The top edge closes the last bin instead of opening a new one
            let idx = (((r - lo) / bin_width) as usize).min(bins - 1);
            counts[idx] += 1;
        }

        Self {
            lo,
            bin_width,
            counts,
            excluded,
        }
    }

    /// Players counted across all bins
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Bin rows as (lower edge, upper edge, count)
    pub fn rows(&self) -> Vec<(f64, f64, u64)> {
        self.counts
            .iter()
            .enumerate()
            .map(|(i, &count)| {
                let edge = self.lo + i as f64 * self.bin_width;
                (edge, edge + self.bin_width, count)
            })
            .collect()
    }
}
