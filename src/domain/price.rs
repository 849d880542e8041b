//! Round-by-round price simulation.
//!
//! Each projected score moves the price by the magic-number-scaled gap to
//! breakeven, and the new price feeds the next round's breakeven:
//!
//!   delta[i]      = round((score[i] - breakeven[i]) * magic / PRICE_WINDOW_ROUNDS)
//!   price[i+1]    = price[i] + delta[i]
//!   breakeven[i+1] = round(price[i+1] / magic * BREAKEVEN_FACTOR)
//!
//! The breakeven rule is an approximation of the platform's, kept as is.

use serde::Serialize;

pub const DEFAULT_MAGIC_NUMBER: f64 = 4200.0;
/// Rounds over which the platform spreads a score's price effect.
pub const PRICE_WINDOW_ROUNDS: f64 = 3.0;
pub const BREAKEVEN_FACTOR: f64 = 0.9;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceConfig {
    pub magic_number: f64,
}

impl Default for PriceConfig {
    fn default() -> Self {
        PriceConfig {
            magic_number: DEFAULT_MAGIC_NUMBER,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PricePoint {
    pub round: u32,
    pub price: i64,
    pub breakeven: i32,
}

/// Simulated price path. The first point is always the real current state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceTrajectory {
    pub points: Vec<PricePoint>,
}

impl PriceTrajectory {
    pub fn anchor(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// Number of simulated rounds beyond the anchor.
    pub fn simulated_rounds(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    pub fn final_price(&self) -> i64 {
        self.last().map_or(0, |p| p.price)
    }

    pub fn total_change(&self) -> i64 {
        match (self.anchor(), self.last()) {
            (Some(first), Some(last)) => last.price - first.price,
            _ => 0,
        }
    }

    pub fn peak(&self) -> Option<&PricePoint> {
        self.points.iter().max_by_key(|p| p.price)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PriceSimulator {
    magic_number: f64,
}

impl Default for PriceSimulator {
    fn default() -> Self {
        Self::new(DEFAULT_MAGIC_NUMBER)
    }
}

impl PriceSimulator {
    pub fn new(magic_number: f64) -> Self {
        Self { magic_number }
    }

    pub fn from_config(config: &PriceConfig) -> Self {
        Self::new(config.magic_number)
    }

    pub fn magic_number(&self) -> f64 {
        self.magic_number
    }

    /// Price change produced by `score` against `breakeven`.
    pub fn price_delta(&self, score: i32, breakeven: i32) -> i64 {
        (f64::from(score - breakeven) * self.magic_number / PRICE_WINDOW_ROUNDS).round() as i64
    }

    /// Breakeven implied by `price`.
    pub fn breakeven_for(&self, price: i64) -> i32 {
        (price as f64 / self.magic_number * BREAKEVEN_FACTOR).round() as i32
    }

    /// Simulates one round per projected score, starting at round
    /// `current_round` with the untouched current price and breakeven.
    /// Round numbers saturate at `u32::MAX`.
    pub fn simulate(
        &self,
        current_round: u32,
        current_price: i64,
        current_breakeven: i32,
        projected_scores: &[i32],
    ) -> PriceTrajectory {
        let anchor = PricePoint {
            round: current_round,
            price: current_price,
            breakeven: current_breakeven,
        };
        let points = projected_scores.iter().fold(vec![anchor], |mut acc, &score| {
            let prev = acc[acc.len() - 1];
            let price = prev.price + self.price_delta(score, prev.breakeven);
            acc.push(PricePoint {
                round: prev.round.saturating_add(1),
                price,
                breakeven: self.breakeven_for(price),
            });
            acc
        });
        PriceTrajectory { points }
    }
}
