//! Match resolution - performance totals and floor-clamped rating deltas

use rand::Rng;

use crate::player::Player;

/// Base adjustment applied to every participant, win or lose
pub const BASE_DELTA: f64 = -10.0;
/// Bonus on top of the base adjustment for being on the winning team
pub const WIN_SWING: f64 = 20.0;
/// Divisor scaling the individual performance term
pub const PERFORMANCE_DIVISOR: f64 = 5.0;

/// A scheduled pairing of two equal-size teams
///
/// Teams hold positions into the population slice the schedule was built
/// from, so a matchup is only valid for the generation that produced it.
#[derive(Clone, Debug, PartialEq)]
pub struct Matchup {
    /// First team's positions
    pub team_a: Vec<usize>,
    /// Second team's positions
    pub team_b: Vec<usize>,
    /// Mean pre-match rating of the league both teams came from
    pub league_rating: f64,
}

/// Outcome of a resolved matchup
#[derive(Clone, Debug, PartialEq)]
pub struct MatchReport {
    /// True when team A outscored team B; an exact tie goes to team B
    pub team_a_won: bool,
    /// Sum of team A's performance samples
    pub total_a: f64,
    /// Sum of team B's performance samples
    pub total_b: f64,
    /// Mean performance across both teams, not the league rating
    pub match_average: f64,
    /// Rating delta per participant, keyed by population position
    pub deltas: Vec<(usize, f64)>,
}

/// Sample both teams and compute deltas without touching the players
pub fn sample_outcome<R: Rng>(players: &[Player], matchup: &Matchup, rng: &mut R) -> MatchReport {
    let samples_a = draw_team(players, &matchup.team_a, rng);
    let samples_b = draw_team(players, &matchup.team_b, rng);
    settle(matchup, &samples_a, &samples_b)
}

/// Turn raw performance samples into a report
///
/// Split out from sampling so exact outcomes can be pinned in tests.
/// Each participant's delta is the base adjustment, plus the win bonus
/// for the winning side, plus its own sample measured against the league
/// rating.
///
/// # Panics
/// Panics if the teams are empty, differ in size, or do not match the
/// sample counts.
pub fn settle(matchup: &Matchup, samples_a: &[f64], samples_b: &[f64]) -> MatchReport {
    assert!(!matchup.team_a.is_empty(), "Teams cannot be empty");
    assert_eq!(
        matchup.team_a.len(),
        matchup.team_b.len(),
        "Teams must have the same size"
    );
    assert_eq!(
        matchup.team_a.len(),
        samples_a.len(),
        "Team A needs one sample per player"
    );
    assert_eq!(
        matchup.team_b.len(),
        samples_b.len(),
        "Team B needs one sample per player"
    );

    let total_a: f64 = samples_a.iter().sum();
    let total_b: f64 = samples_b.iter().sum();
    // A dead-even total counts as a team B win
    let team_a_won = total_a > total_b;

    let team_size = matchup.team_a.len() as f64;
    let match_average = (total_a + total_b) / (2.0 * team_size);

    let mut deltas = Vec::with_capacity(matchup.team_a.len() * 2);
    for (&pos, &sample) in matchup.team_a.iter().zip(samples_a) {
        deltas.push((pos, player_delta(team_a_won, sample, matchup.league_rating)));
    }
    for (&pos, &sample) in matchup.team_b.iter().zip(samples_b) {
        deltas.push((pos, player_delta(!team_a_won, sample, matchup.league_rating)));
    }

    MatchReport {
        team_a_won,
        total_a,
        total_b,
        match_average,
        deltas,
    }
}

/// Apply a report's deltas through the rating floor
///
/// Returns how many adjustments the floor absorbed.
pub fn apply_outcome(players: &mut [Player], report: &MatchReport) -> u32 {
    let mut clamped = 0;
    for &(pos, delta) in &report.deltas {
        if players[pos].apply_rating_delta(delta) {
            clamped += 1;
        }
    }
    clamped
}

/// Resolve a matchup in place: sample performances, then apply deltas
pub fn resolve<R: Rng>(players: &mut [Player], matchup: &Matchup, rng: &mut R) -> MatchReport {
    let report = sample_outcome(players, matchup, rng);
    apply_outcome(players, &report);
    report
}

/// Rating delta for one participant
fn player_delta(won: bool, sample: f64, league_rating: f64) -> f64 {
    let win_bonus = if won { WIN_SWING } else { 0.0 };
    BASE_DELTA + win_bonus + (sample - league_rating) / PERFORMANCE_DIVISOR
}

/// One performance sample per team member, in team order
fn draw_team<R: Rng>(players: &[Player], team: &[usize], rng: &mut R) -> Vec<f64> {
    team.iter()
        .map(|&pos| players[pos].sample_performance(rng))
        .collect()
}
