//! Per-round performance records, fixtures and opponent/venue splits.

use chrono::NaiveDate;
use serde::Serialize;

use super::player::PlayerId;
use super::stats;

/// One player's score in one round.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceRecord {
    pub player_id: PlayerId,
    pub round: u32,
    pub score: f64,
    pub opponent: String,
    pub venue: String,
    pub date: Option<NaiveDate>,
}

/// Upcoming match for a team. A bye round has no opponent or venue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fixture {
    pub team: String,
    pub round: u32,
    pub opponent: Option<String>,
    pub venue: Option<String>,
}

impl Fixture {
    pub fn new(team: &str, round: u32, opponent: &str, venue: &str) -> Self {
        Fixture {
            team: team.to_string(),
            round,
            opponent: Some(opponent.to_string()),
            venue: Some(venue.to_string()),
        }
    }

    pub fn bye(team: &str, round: u32) -> Self {
        Fixture {
            team: team.to_string(),
            round,
            opponent: None,
            venue: None,
        }
    }

    pub fn is_bye(&self) -> bool {
        self.opponent.is_none()
    }
}

/// Aggregate of a player's history against one opponent or at one venue.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SplitStats {
    pub last_score: Option<f64>,
    pub last_three_average: Option<f64>,
    pub games: usize,
}

impl SplitStats {
    /// Builds the split from records ordered newest first.
    pub fn from_scores(scores: &[f64]) -> Self {
        SplitStats {
            last_score: scores.first().copied(),
            last_three_average: stats::mean_of_first(scores, 3),
            games: scores.len(),
        }
    }

    /// Split against `opponent`, records newest first. `None` yields an
    /// empty split.
    pub fn against(records: &[PerformanceRecord], opponent: Option<&str>) -> Self {
        let Some(opponent) = opponent else {
            return SplitStats::default();
        };
        let scores: Vec<f64> = records
            .iter()
            .filter(|r| r.opponent.eq_ignore_ascii_case(opponent))
            .map(|r| r.score)
            .collect();
        SplitStats::from_scores(&scores)
    }

    /// Split at `venue`, records newest first.
    pub fn at(records: &[PerformanceRecord], venue: Option<&str>) -> Self {
        let Some(venue) = venue else {
            return SplitStats::default();
        };
        let scores: Vec<f64> = records
            .iter()
            .filter(|r| r.venue.eq_ignore_ascii_case(venue))
            .map(|r| r.score)
            .collect();
        SplitStats::from_scores(&scores)
    }

    pub fn is_empty(&self) -> bool {
        self.games == 0
    }
}
