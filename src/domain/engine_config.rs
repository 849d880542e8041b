//! Aggregate engine configuration and the components built from it.

use serde::Serialize;

use super::price::{PriceConfig, PriceSimulator};
use super::projection::{ProjectionWeights, ScoreProjector};
use super::trade::{TradeConfig, TradeEvaluator};
use super::valuation::{ValuationAnalyzer, ValuationConfig};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EngineConfig {
    pub weights: ProjectionWeights,
    pub price: PriceConfig,
    pub valuation: ValuationConfig,
    pub trade: TradeConfig,
}

impl EngineConfig {
    pub fn projector(&self) -> ScoreProjector {
        ScoreProjector::new(self.weights.clone())
    }

    pub fn simulator(&self) -> PriceSimulator {
        PriceSimulator::from_config(&self.price)
    }

    pub fn analyzer(&self) -> ValuationAnalyzer {
        ValuationAnalyzer::new(self.valuation.clone())
    }

    pub fn evaluator(&self) -> TradeEvaluator {
        TradeEvaluator::new(self.trade.clone())
    }
}
