//! Confidence heuristic for score projections.
//!
//! Starts from full trust and subtracts penalties for thin history and
//! volatile recent scoring. This is a trust score, not a statistical
//! interval, and it saturates at [`MIN_CONFIDENCE`].

use super::record::{PerformanceRecord, SplitStats};
use super::stats;

pub const MAX_CONFIDENCE: u8 = 100;
pub const MIN_CONFIDENCE: u8 = 30;

const FEWER_THAN_THREE_GAMES: i32 = 20;
const FEWER_THAN_FIVE_GAMES: i32 = 10;
const NO_LAST_SCORE: i32 = 15;
const NO_LAST_THREE: i32 = 10;
const HIGH_VOLATILITY: f64 = 30.0;
const HIGH_VOLATILITY_PENALTY: i32 = 15;
const MODERATE_VOLATILITY: f64 = 20.0;
const MODERATE_VOLATILITY_PENALTY: i32 = 10;

/// Scores `recent` (newest first) and the opponent/venue splits into 30..=100.
pub fn estimate(recent: &[PerformanceRecord], opponent: &SplitStats, venue: &SplitStats) -> u8 {
    let mut confidence = i32::from(MAX_CONFIDENCE);

    if recent.len() < 3 {
        confidence -= FEWER_THAN_THREE_GAMES;
    }
    if recent.len() < 5 {
        confidence -= FEWER_THAN_FIVE_GAMES;
    }

    confidence -= split_penalty(opponent);
    confidence -= split_penalty(venue);

    let scores: Vec<f64> = recent.iter().map(|r| r.score).collect();
    let volatility = stats::stddev_of_first(&scores, 3);
    if volatility > HIGH_VOLATILITY {
        confidence -= HIGH_VOLATILITY_PENALTY;
    } else if volatility > MODERATE_VOLATILITY {
        confidence -= MODERATE_VOLATILITY_PENALTY;
    }

    confidence.clamp(i32::from(MIN_CONFIDENCE), i32::from(MAX_CONFIDENCE)) as u8
}

fn split_penalty(split: &SplitStats) -> i32 {
    let mut penalty = 0;
    if split.last_score.is_none() {
        penalty += NO_LAST_SCORE;
    }
    if split.last_three_average.is_none() {
        penalty += NO_LAST_THREE;
    }
    penalty
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(scores: &[f64]) -> Vec<PerformanceRecord> {
        scores
            .iter()
            .enumerate()
            .map(|(i, &score)| PerformanceRecord {
                player_id: 1,
                round: (scores.len() - i) as u32,
                score,
                opponent: "ESS".into(),
                venue: "MCG".into(),
                date: None,
            })
            .collect()
    }

    fn full_split() -> SplitStats {
        SplitStats::from_scores(&[90.0, 95.0, 100.0])
    }

    #[test]
    fn complete_steady_history_is_fully_trusted() {
        let recent = records(&[90.0, 92.0, 95.0, 91.0, 93.0]);
        assert_eq!(estimate(&recent, &full_split(), &full_split()), 100);
    }

    #[test]
    fn no_data_saturates_at_floor() {
        let empty = SplitStats::default();
        assert_eq!(estimate(&[], &empty, &empty), MIN_CONFIDENCE);
    }

    #[test]
    fn short_history_penalties_stack() {
        let recent = records(&[90.0, 92.0]);
        assert_eq!(estimate(&recent, &full_split(), &full_split()), 70);

        let recent = records(&[90.0, 92.0, 91.0, 93.0]);
        assert_eq!(estimate(&recent, &full_split(), &full_split()), 90);
    }

    #[test]
    fn missing_opponent_split_costs_twenty_five() {
        let recent = records(&[90.0, 92.0, 95.0, 91.0, 93.0]);
        let empty = SplitStats::default();
        assert_eq!(estimate(&recent, &empty, &full_split()), 75);
        assert_eq!(estimate(&recent, &empty, &empty), 50);
    }

    #[test]
    fn volatility_bands() {
        // stddev of [60, 90, 120] is ~24.5
        let recent = records(&[60.0, 90.0, 120.0, 90.0, 90.0]);
        assert_eq!(estimate(&recent, &full_split(), &full_split()), 90);

        // stddev of [40, 90, 140] is ~40.8
        let recent = records(&[40.0, 90.0, 140.0, 90.0, 90.0]);
        assert_eq!(estimate(&recent, &full_split(), &full_split()), 85);
    }

    #[test]
    fn volatility_only_uses_last_three() {
        let recent = records(&[90.0, 90.0, 90.0, 10.0, 200.0]);
        assert_eq!(estimate(&recent, &full_split(), &full_split()), 100);
    }
}
