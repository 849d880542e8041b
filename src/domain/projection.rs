//! Next-round score projection.
//!
//! Blends season average, recent form, opponent history and venue history
//! with fixed weights. Missing signals contribute zero and are *not*
//! removed from the weight sum; the shortfall shows up in confidence and
//! data completeness instead.

use serde::Serialize;
use tracing::debug;

use super::confidence;
use super::player::{Player, PlayerId};
use super::record::{Fixture, PerformanceRecord, SplitStats};
use super::stats;

/// Relative change against the season average that flips a factor label.
const FACTOR_THRESHOLD: f64 = 0.10;

/// Blend weights. The defaults add up to 1.15, not 1.0, and are applied
/// without renormalization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionWeights {
    pub season_average: f64,
    pub last_three: f64,
    pub last_five: f64,
    pub last_vs_opponent: f64,
    pub last_three_vs_opponent: f64,
    pub last_at_venue: f64,
    pub last_three_at_venue: f64,
}

impl Default for ProjectionWeights {
    fn default() -> Self {
        ProjectionWeights {
            season_average: 0.30,
            last_three: 0.20,
            last_five: 0.20,
            last_vs_opponent: 0.15,
            last_three_vs_opponent: 0.10,
            last_at_venue: 0.15,
            last_three_at_venue: 0.05,
        }
    }
}

impl ProjectionWeights {
    pub fn total(&self) -> f64 {
        self.season_average
            + self.last_three
            + self.last_five
            + self.last_vs_opponent
            + self.last_three_vs_opponent
            + self.last_at_venue
            + self.last_three_at_venue
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    SeasonAverage,
    LastThree,
    LastFive,
    LastVsOpponent,
    LastThreeVsOpponent,
    LastAtVenue,
    LastThreeAtVenue,
}

/// One weighted input to the blend. `value` is `None` when the signal was
/// missing, in which case `contribution` is zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Component {
    pub kind: ComponentKind,
    pub value: Option<f64>,
    pub weight: f64,
    pub contribution: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OpponentDifficulty {
    Easy,
    Neutral,
    Hard,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VenueAdvantage {
    Favourable,
    Neutral,
    Unfavourable,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RecentForm {
    Hot,
    Steady,
    Cold,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Factors {
    pub opponent_difficulty: OpponentDifficulty,
    pub venue_advantage: VenueAdvantage,
    pub recent_form: RecentForm,
    /// Percentage of blended signals that were present, one decimal.
    pub data_completeness: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionResult {
    pub player_id: PlayerId,
    pub round: u32,
    pub projected_score: i32,
    pub confidence: u8,
    pub breakdown: Vec<Component>,
    pub factors: Factors,
}

impl ProjectionResult {
    pub fn component(&self, kind: ComponentKind) -> Option<&Component> {
        self.breakdown.iter().find(|c| c.kind == kind)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScoreProjector {
    weights: ProjectionWeights,
}

impl ScoreProjector {
    pub fn new(weights: ProjectionWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &ProjectionWeights {
        &self.weights
    }

    /// Projects `player`'s score for `fixture.round`.
    ///
    /// `recent` is the player's latest records, newest first, of any length.
    /// `opponent_records` and `venue_records` may contain rows for any
    /// opponent or venue; they are filtered against the fixture here.
    pub fn project(
        &self,
        player: &Player,
        recent: &[PerformanceRecord],
        opponent_records: &[PerformanceRecord],
        venue_records: &[PerformanceRecord],
        fixture: &Fixture,
    ) -> ProjectionResult {
        let recent_scores: Vec<f64> = recent.iter().map(|r| r.score).collect();
        let last_three = stats::mean_of_first(&recent_scores, 3);
        let last_five = stats::mean_of_first(&recent_scores, 5);

        let opponent = SplitStats::against(opponent_records, fixture.opponent.as_deref());
        let venue = SplitStats::at(venue_records, fixture.venue.as_deref());

        let season_average = player.has_average().then_some(player.average);
        let w = &self.weights;
        let breakdown = vec![
            component(ComponentKind::SeasonAverage, season_average, w.season_average),
            component(ComponentKind::LastThree, last_three, w.last_three),
            component(ComponentKind::LastFive, last_five, w.last_five),
            component(ComponentKind::LastVsOpponent, opponent.last_score, w.last_vs_opponent),
            component(
                ComponentKind::LastThreeVsOpponent,
                opponent.last_three_average,
                w.last_three_vs_opponent,
            ),
            component(ComponentKind::LastAtVenue, venue.last_score, w.last_at_venue),
            component(
                ComponentKind::LastThreeAtVenue,
                venue.last_three_average,
                w.last_three_at_venue,
            ),
        ];

        let weighted_sum: f64 = breakdown.iter().map(|c| c.contribution).sum();
        let projected_score = weighted_sum.round() as i32;
        let confidence = confidence::estimate(recent, &opponent, &venue);

        let present = breakdown.iter().filter(|c| c.value.is_some()).count();
        let factors = Factors {
            opponent_difficulty: opponent_difficulty(player.average, &opponent),
            venue_advantage: venue_advantage(player.average, &venue),
            recent_form: recent_form(player.average, last_three),
            data_completeness: stats::round1(present as f64 / breakdown.len() as f64 * 100.0),
        };

        debug!(
            player_id = player.id,
            round = fixture.round,
            projected_score,
            confidence,
            "projected score"
        );

        ProjectionResult {
            player_id: player.id,
            round: fixture.round,
            projected_score,
            confidence,
            breakdown,
            factors,
        }
    }
}

fn component(kind: ComponentKind, value: Option<f64>, weight: f64) -> Component {
    Component {
        kind,
        value,
        weight,
        contribution: value.map_or(0.0, |v| v * weight),
    }
}

/// Compares `value` with `average`: `Some(1)` above the band, `Some(-1)`
/// below, `Some(0)` inside, `None` when either side is unavailable.
fn relative_band(average: f64, value: Option<f64>) -> Option<i8> {
    let value = value?;
    if average <= 0.0 {
        return None;
    }
    let ratio = (value - average) / average;
    Some(if ratio >= FACTOR_THRESHOLD {
        1
    } else if ratio <= -FACTOR_THRESHOLD {
        -1
    } else {
        0
    })
}

fn opponent_difficulty(average: f64, split: &SplitStats) -> OpponentDifficulty {
    match relative_band(average, split.last_three_average) {
        Some(1) => OpponentDifficulty::Easy,
        Some(-1) => OpponentDifficulty::Hard,
        Some(_) => OpponentDifficulty::Neutral,
        None => OpponentDifficulty::Unknown,
    }
}

fn venue_advantage(average: f64, split: &SplitStats) -> VenueAdvantage {
    match relative_band(average, split.last_three_average) {
        Some(1) => VenueAdvantage::Favourable,
        Some(-1) => VenueAdvantage::Unfavourable,
        Some(_) => VenueAdvantage::Neutral,
        None => VenueAdvantage::Unknown,
    }
}

fn recent_form(average: f64, last_three: Option<f64>) -> RecentForm {
    match relative_band(average, last_three) {
        Some(1) => RecentForm::Hot,
        Some(-1) => RecentForm::Cold,
        Some(_) => RecentForm::Steady,
        None => RecentForm::Unknown,
    }
}
