//! Ceiling/floor valuation, price-trend classification and recommendations.

use serde::Serialize;
use std::fmt;

use super::player::Player;
use super::price::{DEFAULT_MAGIC_NUMBER, PriceTrajectory};
use super::stats;

const STRONG_CHANGE: f64 = 10_000.0;
const MODERATE_CHANGE: f64 = 5_000.0;
/// Gain/loss ratio beyond which a valuation is called asymmetric.
const ASYMMETRY_RATIO: i64 = 2;

/// Multipliers and last-resort scores used to derive price bounds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValuationConfig {
    pub magic_number: f64,
    pub ceiling_multiplier: f64,
    pub floor_multiplier: f64,
    pub default_ceiling_score: f64,
    pub default_floor_score: f64,
}

impl Default for ValuationConfig {
    fn default() -> Self {
        ValuationConfig {
            magic_number: DEFAULT_MAGIC_NUMBER,
            ceiling_multiplier: 1.2,
            floor_multiplier: 0.8,
            default_ceiling_score: 100.0,
            default_floor_score: 40.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Trend {
    StrongGrowth,
    ModerateGrowth,
    SlightGrowth,
    Stable,
    SlightDecline,
    ModerateDecline,
    StrongDecline,
    InsufficientData,
}

impl Trend {
    pub fn is_growth(&self) -> bool {
        matches!(
            self,
            Trend::StrongGrowth | Trend::ModerateGrowth | Trend::SlightGrowth
        )
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Trend::StrongGrowth => "strong growth",
            Trend::ModerateGrowth => "moderate growth",
            Trend::SlightGrowth => "slight growth",
            Trend::Stable => "stable",
            Trend::SlightDecline => "slight decline",
            Trend::ModerateDecline => "moderate decline",
            Trend::StrongDecline => "strong decline",
            Trend::InsufficientData => "insufficient data",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Momentum {
    Accelerating,
    Decelerating,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendAnalysis {
    pub trend: Trend,
    pub average_change: f64,
    pub momentum: Option<Momentum>,
    pub recommendation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValuationResult {
    pub ceiling_score: f64,
    pub floor_score: f64,
    pub ceiling_price: i64,
    pub floor_price: i64,
    pub potential_gain: i64,
    pub potential_loss: i64,
    pub projected_price: i64,
    pub trend: Trend,
    pub trend_recommendation: String,
    pub recommendation: String,
}

/// Explicit score bounds supplied by the caller; each falls back
/// independently.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScoreHints {
    pub ceiling: Option<f64>,
    pub floor: Option<f64>,
    pub projected_score: Option<i32>,
}

#[derive(Debug, Clone, Default)]
pub struct ValuationAnalyzer {
    config: ValuationConfig,
}

impl ValuationAnalyzer {
    pub fn new(config: ValuationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ValuationConfig {
        &self.config
    }

    pub fn analyze(
        &self,
        player: &Player,
        trajectory: &PriceTrajectory,
        hints: ScoreHints,
    ) -> ValuationResult {
        let (ceiling_score, floor_score) = self.score_bounds(player, hints);
        let ceiling_price = self.price_for(ceiling_score);
        let floor_price = self.price_for(floor_score);
        let potential_gain = ceiling_price - player.price;
        let potential_loss = player.price - floor_price;

        let trend = analyze_trend(&player.price_history);

        ValuationResult {
            ceiling_score,
            floor_score,
            ceiling_price,
            floor_price,
            potential_gain,
            potential_loss,
            projected_price: if trajectory.points.is_empty() {
                player.price
            } else {
                trajectory.final_price()
            },
            trend: trend.trend,
            trend_recommendation: trend.recommendation,
            recommendation: recommend(potential_gain, potential_loss),
        }
    }

    /// Resolves ceiling and floor scores: explicit hint, then the player's
    /// own estimate, then projected score, then season average, then the
    /// configured constants.
    pub fn score_bounds(&self, player: &Player, hints: ScoreHints) -> (f64, f64) {
        let c = &self.config;
        let base = hints
            .projected_score
            .filter(|&s| s > 0)
            .map(f64::from)
            .or_else(|| player.has_average().then_some(player.average));

        let ceiling = hints
            .ceiling
            .or(player.ceiling)
            .or_else(|| base.map(|b| b * c.ceiling_multiplier))
            .unwrap_or(c.default_ceiling_score);
        let floor = hints
            .floor
            .or(player.floor)
            .or_else(|| base.map(|b| b * c.floor_multiplier))
            .unwrap_or(c.default_floor_score);
        (ceiling, floor)
    }

    pub fn price_for(&self, score: f64) -> i64 {
        (score * self.config.magic_number).round() as i64
    }
}

fn recommend(gain: i64, loss: i64) -> String {
    let up = gain.max(0);
    let down = loss.max(0);
    if up > 0 && up >= down * ASYMMETRY_RATIO {
        format!("Asymmetric upside: potential gain ${up} is at least double the potential loss ${down}. Strong buy.")
    } else if down > 0 && down >= up * ASYMMETRY_RATIO {
        format!("Asymmetric downside: potential loss ${down} is at least double the potential gain ${up}. Consider selling.")
    } else if up > down {
        format!("Upside skewed: potential gain ${up} outweighs potential loss ${down}. Lean buy.")
    } else if down > up {
        format!("Downside skewed: potential loss ${down} outweighs potential gain ${up}. Lean hold or sell.")
    } else {
        format!("Balanced: potential gain and loss are both ${up}. Hold.")
    }
}

/// Classifies a price history ordered oldest first.
pub fn analyze_trend(history: &[i64]) -> TrendAnalysis {
    if history.len() < 2 {
        return TrendAnalysis {
            trend: Trend::InsufficientData,
            average_change: 0.0,
            momentum: None,
            recommendation: "Insufficient price history to identify a trend.".to_string(),
        };
    }

    let changes = stats::deltas(history);
    let average_change = changes.iter().sum::<i64>() as f64 / changes.len() as f64;
    let trend = classify(average_change);

    // only the first and last of the final three changes are compared
    let momentum = if changes.len() >= 3 {
        let recent = &changes[changes.len() - 3..];
        Some(if recent[2] > recent[0] {
            Momentum::Accelerating
        } else {
            Momentum::Decelerating
        })
    } else {
        None
    };

    TrendAnalysis {
        trend,
        average_change,
        momentum,
        recommendation: trend_recommendation(trend, momentum),
    }
}

fn classify(average_change: f64) -> Trend {
    if average_change > STRONG_CHANGE {
        Trend::StrongGrowth
    } else if average_change > MODERATE_CHANGE {
        Trend::ModerateGrowth
    } else if average_change > 0.0 {
        Trend::SlightGrowth
    } else if average_change < -STRONG_CHANGE {
        Trend::StrongDecline
    } else if average_change < -MODERATE_CHANGE {
        Trend::ModerateDecline
    } else if average_change < 0.0 {
        Trend::SlightDecline
    } else {
        Trend::Stable
    }
}

fn trend_recommendation(trend: Trend, momentum: Option<Momentum>) -> String {
    match (trend, momentum) {
        (Trend::InsufficientData, _) => {
            "Insufficient price history to identify a trend.".to_string()
        }
        (t, Some(Momentum::Accelerating)) if t.is_growth() => {
            format!("Hold: {t} with accelerating gains; more upside is likely.")
        }
        (t, Some(Momentum::Decelerating)) if t.is_growth() => {
            format!("Watch: {t} but gains are slowing; consider selling near the peak.")
        }
        (t, None) if t.is_growth() => format!("Hold: {t} so far."),
        (Trend::Stable, _) => "Hold: price is stable.".to_string(),
        (Trend::StrongDecline, _) | (Trend::ModerateDecline, _) => {
            format!("Sell: {trend}; the price is likely to keep falling.")
        }
        (t, _) => format!("Monitor: {t}."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::player::Position;
    use crate::domain::price::PriceSimulator;

    fn player() -> Player {
        Player::new(5, "Test", Position::Mid, "COL")
            .with_price(420_000, 90)
            .with_average(100.0)
    }

    fn flat_trajectory(p: &Player) -> PriceTrajectory {
        PriceSimulator::default().simulate(1, p.price, p.breakeven, &[])
    }

    #[test]
    fn bounds_from_projected_score() {
        let p = player();
        let analyzer = ValuationAnalyzer::default();
        let hints = ScoreHints {
            projected_score: Some(110),
            ..Default::default()
        };
        let (ceiling, floor) = analyzer.score_bounds(&p, hints);
        assert!((ceiling - 132.0).abs() < 1e-9);
        assert!((floor - 88.0).abs() < 1e-9);
    }

    #[test]
    fn bounds_fall_back_to_average_then_constants() {
        let analyzer = ValuationAnalyzer::default();
        let (ceiling, floor) = analyzer.score_bounds(&player(), ScoreHints::default());
        assert!((ceiling - 120.0).abs() < 1e-9);
        assert!((floor - 80.0).abs() < 1e-9);

        let rookie = Player::new(6, "Rookie", Position::Def, "GEE").with_price(200_000, 0);
        let (ceiling, floor) = analyzer.score_bounds(&rookie, ScoreHints::default());
        assert!((ceiling - 100.0).abs() < 1e-9);
        assert!((floor - 40.0).abs() < 1e-9);
    }

    #[test]
    fn explicit_hints_win_over_player_estimates() {
        let mut p = player();
        p.ceiling = Some(140.0);
        p.floor = Some(70.0);
        let analyzer = ValuationAnalyzer::default();

        let (ceiling, floor) = analyzer.score_bounds(&p, ScoreHints::default());
        assert!((ceiling - 140.0).abs() < 1e-9);
        assert!((floor - 70.0).abs() < 1e-9);

        let hints = ScoreHints {
            ceiling: Some(150.0),
            floor: None,
            projected_score: Some(90),
        };
        let (ceiling, floor) = analyzer.score_bounds(&p, hints);
        assert!((ceiling - 150.0).abs() < 1e-9);
        assert!((floor - 70.0).abs() < 1e-9);
    }

    #[test]
    fn gain_and_loss_from_bounds() {
        let p = player();
        let result = ValuationAnalyzer::default().analyze(&p, &flat_trajectory(&p), ScoreHints::default());
        // 120 * 4200 = 504_000, 80 * 4200 = 336_000
        assert_eq!(result.ceiling_price, 504_000);
        assert_eq!(result.floor_price, 336_000);
        assert_eq!(result.potential_gain, 84_000);
        assert_eq!(result.potential_loss, 84_000);
        assert!(result.recommendation.starts_with("Balanced"));
        assert_eq!(result.trend, Trend::InsufficientData);
        assert_eq!(result.projected_price, 420_000);
    }

    #[test]
    fn recommendation_thresholds() {
        assert!(recommend(100_000, 40_000).starts_with("Asymmetric upside"));
        assert!(recommend(40_000, 100_000).starts_with("Asymmetric downside"));
        assert!(recommend(60_000, 40_000).starts_with("Upside skewed"));
        assert!(recommend(40_000, 60_000).starts_with("Downside skewed"));
        assert!(recommend(-10_000, 50_000).starts_with("Asymmetric downside"));
        assert!(recommend(0, 0).starts_with("Balanced"));
    }

    #[test]
    fn trend_requires_two_points() {
        assert_eq!(analyze_trend(&[]).trend, Trend::InsufficientData);
        assert_eq!(analyze_trend(&[500_000]).trend, Trend::InsufficientData);
    }

    #[test]
    fn trend_bands() {
        assert_eq!(analyze_trend(&[100_000, 115_000]).trend, Trend::StrongGrowth);
        assert_eq!(analyze_trend(&[100_000, 108_000]).trend, Trend::ModerateGrowth);
        assert_eq!(analyze_trend(&[100_000, 105_000]).trend, Trend::SlightGrowth);
        assert_eq!(analyze_trend(&[100_000, 100_000]).trend, Trend::Stable);
        assert_eq!(analyze_trend(&[100_000, 96_000]).trend, Trend::SlightDecline);
        assert_eq!(analyze_trend(&[100_000, 92_000]).trend, Trend::ModerateDecline);
        assert_eq!(analyze_trend(&[100_000, 80_000]).trend, Trend::StrongDecline);
    }

    #[test]
    fn momentum_compares_first_and_last_of_final_three_changes() {
        // changes: 5k, 50k, 8k -> last (8k) > first (5k)
        let accelerating = analyze_trend(&[100_000, 105_000, 155_000, 163_000]);
        assert_eq!(accelerating.momentum, Some(Momentum::Accelerating));
        assert!(accelerating.recommendation.starts_with("Hold"));

        // changes: 20k, 1k, 15k -> last (15k) < first (20k)
        let decelerating = analyze_trend(&[100_000, 120_000, 121_000, 136_000]);
        assert_eq!(decelerating.momentum, Some(Momentum::Decelerating));
        assert!(decelerating.recommendation.starts_with("Watch"));
    }

    #[test]
    fn short_growth_history_has_no_momentum() {
        let analysis = analyze_trend(&[100_000, 112_000, 125_000]);
        assert_eq!(analysis.trend, Trend::StrongGrowth);
        assert_eq!(analysis.momentum, None);
    }

    #[test]
    fn analyze_uses_price_history_not_trajectory() {
        let mut p = player();
        p.price_history = vec![450_000, 443_000, 436_000, 420_000];
        let trajectory = PriceSimulator::default().simulate(4, p.price, p.breakeven, &[150, 150]);
        let result = ValuationAnalyzer::default().analyze(&p, &trajectory, ScoreHints::default());
        assert_eq!(result.trend, Trend::ModerateDecline);
        assert!(result.trend_recommendation.starts_with("Sell"));
        assert!(result.projected_price > p.price);
    }
}
