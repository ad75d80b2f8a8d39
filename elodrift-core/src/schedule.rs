//! League partitioning - rating-sorted leagues paired into matchups

use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

use crate::matchup::Matchup;
use crate::player::Player;

/// Why a roster cannot be split into leagues and paired teams
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    /// A zero size cannot partition anything
    #[error("league size and team size must be nonzero")]
    ZeroSize,
    /// Population does not divide into whole leagues
    #[error("population {population} does not divide into leagues of {league_size}")]
    PopulationIndivisible { population: usize, league_size: usize },
    /// League does not divide into whole teams
    #[error("league size {league_size} does not divide into teams of {team_size}")]
    LeagueIndivisible { league_size: usize, team_size: usize },
    /// An odd team count leaves one team without an opponent
    #[error("league size {league_size} and team size {team_size} leave an odd team count")]
    OddTeamsPerLeague { league_size: usize, team_size: usize },
}

/// Check that `population` players split cleanly into leagues of
/// `league_size` and paired teams of `team_size`
///
/// Sizes that would leave anyone unscheduled are rejected outright; the
/// partitioner never truncates a ragged remainder.
pub fn check_partition(
    population: usize,
    league_size: usize,
    team_size: usize,
) -> Result<(), ScheduleError> {
    if league_size == 0 || team_size == 0 {
        return Err(ScheduleError::ZeroSize);
    }
    if population % league_size != 0 {
        return Err(ScheduleError::PopulationIndivisible {
            population,
            league_size,
        });
    }
    if league_size % team_size != 0 {
        return Err(ScheduleError::LeagueIndivisible {
            league_size,
            team_size,
        });
    }
    if (league_size / team_size) % 2 != 0 {
        return Err(ScheduleError::OddTeamsPerLeague {
            league_size,
            team_size,
        });
    }
    Ok(())
}

/// Build one generation's matchups
///
/// Players are sorted by rating and cut into contiguous leagues, so
/// everyone competes near their own level. Within a league the order is
/// shuffled and consecutive team-size runs are paired off.
///
/// # Arguments
/// * `players` - Current roster; positions in the returned matchups index into it
/// * `league_size` - Players per league
/// * `team_size` - Players per team
/// * `rng` - Randomness for the within-league shuffle
///
/// # Returns
/// `players.len() / (2 * team_size)` matchups covering every player
/// exactly once
pub fn schedule<R: Rng>(
    players: &[Player],
    league_size: usize,
    team_size: usize,
    rng: &mut R,
) -> Result<Vec<Matchup>, ScheduleError> {
    check_partition(players.len(), league_size, team_size)?;

    let order = rating_order(players);

    let mut matchups = Vec::with_capacity(players.len() / (2 * team_size));
    for league in order.chunks(league_size) {
        // The league rating is the mean before any of its matches resolve
        let league_rating = mean_rating(players, league);

        let mut pool = league.to_vec();
        pool.shuffle(rng);

        let mut teams = pool.chunks_exact(team_size);
        while let (Some(a), Some(b)) = (teams.next(), teams.next()) {
            matchups.push(Matchup {
                team_a: a.to_vec(),
                team_b: b.to_vec(),
                league_rating,
            });
        }
    }

    Ok(matchups)
}

/// Positions sorted by ascending rating; ties keep an arbitrary order
fn rating_order(players: &[Player]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..players.len()).collect();
    order.sort_unstable_by(|&a, &b| {
        players[a]
            .rating
            .partial_cmp(&players[b].rating)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    order
}

/// Mean rating over one league's positions
fn mean_rating(players: &[Player], league: &[usize]) -> f64 {
    let total: f64 = league.iter().map(|&pos| players[pos].rating).sum();
    total / league.len() as f64
}
