//! Trade comparison and trade-option enumeration.
//!
//! `price_factor` here is the per-point weekly price movement used for
//! trade projections. It is a different constant from the simulator's
//! magic number and the two must not be swapped.

use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashSet;
use tracing::debug;

use super::error::EngineError;
use super::player::{Player, PlayerId, Position};

/// Price unit that ROI and value-per-dollar are expressed against.
pub const PRICE_UNIT: f64 = 10_000.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeConfig {
    pub price_factor: f64,
    pub rookie_max_price: i64,
    pub premium_min_price: i64,
    pub weeks: u32,
}

impl Default for TradeConfig {
    fn default() -> Self {
        TradeConfig {
            price_factor: 975.0,
            rookie_max_price: 300_000,
            premium_min_price: 800_000,
            weeks: 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WeeksToBreakeven {
    Rounds(u32),
    /// The incoming player never recovers the price difference.
    Unbounded,
}

/// One side of a trade: current state and projected price after the
/// evaluation window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeSide {
    pub id: PlayerId,
    pub name: String,
    pub price: i64,
    pub average: f64,
    pub breakeven: i32,
    pub projected_price_change: i64,
    pub projected_price: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeComparison {
    pub player_in: TradeSide,
    pub player_out: TradeSide,
    pub weeks: u32,
    pub price_diff: i64,
    pub weekly_score_diff: f64,
    pub total_score_diff: f64,
    pub roi: f64,
    pub weeks_to_breakeven: WeeksToBreakeven,
    pub is_price_upgrade: bool,
    pub is_score_upgrade: bool,
    pub is_rookie_to_premium: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeOption {
    pub out_id: PlayerId,
    pub out_name: String,
    pub in_id: PlayerId,
    pub in_name: String,
    pub price_diff: i64,
    pub score_diff: f64,
    /// Score gained per $10k spent; 0 when the prices are equal.
    pub value: f64,
}

#[derive(Debug, Clone, Default)]
pub struct TradeEvaluator {
    config: TradeConfig,
}

impl TradeEvaluator {
    pub fn new(config: TradeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TradeConfig {
        &self.config
    }

    /// Projected price change over `weeks` from the gap between average
    /// and breakeven.
    pub fn projected_price_change(&self, player: &Player, weeks: u32) -> i64 {
        ((player.average - f64::from(player.breakeven)) * self.config.price_factor * f64::from(weeks))
            .round() as i64
    }

    pub fn evaluate(&self, player_in: &Player, player_out: &Player, weeks: u32) -> TradeComparison {
        let price_diff = player_in.price - player_out.price;
        let weekly_score_diff = player_in.average - player_out.average;
        let total_score_diff = weekly_score_diff * f64::from(weeks);

        let roi = if price_diff != 0 {
            total_score_diff / (price_diff as f64 / PRICE_UNIT)
        } else {
            0.0
        };

        let weeks_to_breakeven = if weekly_score_diff > 0.0 {
            let rounds = (price_diff.abs() as f64 / (weekly_score_diff * PRICE_UNIT)).ceil();
            WeeksToBreakeven::Rounds(rounds as u32)
        } else {
            WeeksToBreakeven::Unbounded
        };

        TradeComparison {
            player_in: self.side(player_in, weeks),
            player_out: self.side(player_out, weeks),
            weeks,
            price_diff,
            weekly_score_diff,
            total_score_diff,
            roi,
            weeks_to_breakeven,
            is_price_upgrade: price_diff > 0,
            is_score_upgrade: weekly_score_diff > 0.0,
            is_rookie_to_premium: player_out.price < self.config.rookie_max_price
                && player_in.price > self.config.premium_min_price,
        }
    }

    /// Like [`evaluate`](Self::evaluate) but checks the trade against the
    /// current roster first.
    pub fn evaluate_for_team(
        &self,
        current_team: &[PlayerId],
        player_in: &Player,
        player_out: &Player,
        weeks: u32,
    ) -> Result<TradeComparison, EngineError> {
        if !current_team.contains(&player_out.id) {
            return Err(EngineError::NotOnRoster { id: player_out.id });
        }
        if current_team.contains(&player_in.id) {
            return Err(EngineError::AlreadyOnRoster { id: player_in.id });
        }
        Ok(self.evaluate(player_in, player_out, weeks))
    }

    fn side(&self, player: &Player, weeks: u32) -> TradeSide {
        let change = self.projected_price_change(player, weeks);
        TradeSide {
            id: player.id,
            name: player.name.clone(),
            price: player.price,
            average: player.average,
            breakeven: player.breakeven,
            projected_price_change: change,
            projected_price: player.price + change,
        }
    }
}

/// Enumerates every (out, in) trade at `position`.
///
/// Outgoing players come from `current_team` (repeated ids count once),
/// incoming ones from the rest of `all_players`. A pair is kept when the
/// cash cost fits `available_cash`, the incoming average is at least
/// `min_score`, and the score improves.
/// Results are ranked by score gained per $10k, best first.
pub fn find_trade_options(
    position: Position,
    available_cash: i64,
    all_players: &[Player],
    current_team: &[PlayerId],
    min_score: f64,
) -> Result<Vec<TradeOption>, EngineError> {
    let mut roster: HashSet<PlayerId> = HashSet::with_capacity(current_team.len());
    let mut outgoing = Vec::new();
    for id in current_team {
        if !roster.insert(*id) {
            continue;
        }
        let player = all_players
            .iter()
            .find(|p| p.id == *id)
            .ok_or(EngineError::UnknownPlayer { id: *id })?;
        if player.position == position {
            outgoing.push(player);
        }
    }

    let candidates: Vec<&Player> = all_players
        .iter()
        .filter(|p| p.position == position && !roster.contains(&p.id) && p.average >= min_score)
        .collect();

    let mut options: Vec<TradeOption> = outgoing
        .iter()
        .flat_map(|out| candidates.iter().map(move |inc| (*out, *inc)))
        .filter_map(|(out, inc)| {
            let price_diff = inc.price - out.price;
            let score_diff = inc.average - out.average;
            if price_diff > available_cash || score_diff <= 0.0 {
                return None;
            }
            let value = if price_diff != 0 {
                score_diff / (price_diff as f64 / PRICE_UNIT)
            } else {
                0.0
            };
            Some(TradeOption {
                out_id: out.id,
                out_name: out.name.clone(),
                in_id: inc.id,
                in_name: inc.name.clone(),
                price_diff,
                score_diff,
                value,
            })
        })
        .collect();

    options.sort_by(|a, b| {
        b.value
            .partial_cmp(&a.value)
            .unwrap_or(Ordering::Equal)
            .then_with(|| {
                b.score_diff
                    .partial_cmp(&a.score_diff)
                    .unwrap_or(Ordering::Equal)
            })
            .then_with(|| a.out_id.cmp(&b.out_id))
            .then_with(|| a.in_id.cmp(&b.in_id))
    });

    debug!(
        %position,
        outgoing = outgoing.len(),
        candidates = candidates.len(),
        options = options.len(),
        "enumerated trade options"
    );
    Ok(options)
}
