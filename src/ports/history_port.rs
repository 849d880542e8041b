//! Read-only access to player snapshots, score history and fixtures.
//!
//! Record lookups take `before_round` and only return rows from earlier
//! rounds, so a projection never sees the round it forecasts or later ones.

use crate::domain::error::EngineError;
use crate::domain::player::{Player, PlayerId};
use crate::domain::record::{Fixture, PerformanceRecord};

pub trait HistoryPort {
    fn list_players(&self) -> Result<Vec<Player>, EngineError>;

    fn get_player(&self, id: PlayerId) -> Result<Option<Player>, EngineError>;

    /// Latest `limit` records before `before_round`, newest first.
    fn recent_records(
        &self,
        id: PlayerId,
        before_round: u32,
        limit: usize,
    ) -> Result<Vec<PerformanceRecord>, EngineError>;

    /// Records against `opponent` before `before_round`, newest first.
    fn opponent_records(
        &self,
        id: PlayerId,
        before_round: u32,
        opponent: &str,
    ) -> Result<Vec<PerformanceRecord>, EngineError>;

    /// Records at `venue` before `before_round`, newest first.
    fn venue_records(
        &self,
        id: PlayerId,
        before_round: u32,
        venue: &str,
    ) -> Result<Vec<PerformanceRecord>, EngineError>;

    fn fixture(&self, team: &str, round: u32) -> Result<Option<Fixture>, EngineError>;
}
