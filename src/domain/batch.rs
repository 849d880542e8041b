//! Port-backed projection for single players, horizons and whole pools.
//!
//! Every player's projection is independent, so pool-wide work is spread
//! over rayon's thread pool. Output order always matches input order.

use rayon::prelude::*;
use serde::Serialize;
use std::cmp::Reverse;
use tracing::{debug, info};

use super::error::EngineError;
use super::player::{Player, PlayerId};
use super::price::{PriceSimulator, PriceTrajectory};
use super::projection::{ProjectionResult, ScoreProjector};
use crate::ports::history_port::HistoryPort;

/// Recent records fetched per projection; the widest blend window.
pub const RECENT_WINDOW: usize = 5;

/// Fetches the history `player` has before `round` and projects it.
pub fn project_player(
    projector: &ScoreProjector,
    port: &dyn HistoryPort,
    player: &Player,
    round: u32,
) -> Result<ProjectionResult, EngineError> {
    let fixture = port
        .fixture(&player.team, round)?
        .ok_or_else(|| EngineError::NoFixture {
            team: player.team.clone(),
            round,
        })?;

    let recent = port.recent_records(player.id, round, RECENT_WINDOW)?;
    let opponent_records = match fixture.opponent.as_deref() {
        Some(opponent) => port.opponent_records(player.id, round, opponent)?,
        None => Vec::new(),
    };
    let venue_records = match fixture.venue.as_deref() {
        Some(venue) => port.venue_records(player.id, round, venue)?,
        None => Vec::new(),
    };

    Ok(projector.project(player, &recent, &opponent_records, &venue_records, &fixture))
}

/// Resolves `id` through the port, failing loudly when it is unknown.
pub fn require_player(port: &dyn HistoryPort, id: PlayerId) -> Result<Player, EngineError> {
    port.get_player(id)?.ok_or(EngineError::UnknownPlayer { id })
}

/// Projects `rounds` consecutive rounds starting at `first_round`.
pub fn project_horizon(
    projector: &ScoreProjector,
    port: &dyn HistoryPort,
    player: &Player,
    first_round: u32,
    rounds: u32,
) -> Result<Vec<ProjectionResult>, EngineError> {
    let end = first_round
        .checked_add(rounds)
        .ok_or_else(|| EngineError::Data {
            reason: format!("{rounds} rounds from round {first_round} is out of range"),
        })?;
    (first_round..end)
        .map(|round| project_player(projector, port, player, round))
        .collect()
}

/// Projects the horizon and feeds the scores through the simulator. The
/// trajectory is anchored at the round before `first_round`.
pub fn simulate_player(
    projector: &ScoreProjector,
    simulator: &PriceSimulator,
    port: &dyn HistoryPort,
    player: &Player,
    first_round: u32,
    rounds: u32,
) -> Result<(Vec<ProjectionResult>, PriceTrajectory), EngineError> {
    let projections = project_horizon(projector, port, player, first_round, rounds)?;
    let scores: Vec<i32> = projections.iter().map(|p| p.projected_score).collect();
    let trajectory = simulator.simulate(
        first_round.saturating_sub(1),
        player.price,
        player.breakeven,
        &scores,
    );
    Ok((projections, trajectory))
}

/// Projects every player in parallel. Failures are returned per player so
/// one bad record does not sink the pool.
pub fn project_pool(
    projector: &ScoreProjector,
    port: &(dyn HistoryPort + Sync),
    players: &[Player],
    round: u32,
) -> Vec<(PlayerId, Result<ProjectionResult, EngineError>)> {
    info!(players = players.len(), round, "projecting player pool");
    players
        .par_iter()
        .map(|player| (player.id, project_player(projector, port, player, round)))
        .collect()
}

/// A low-priced player ranked by simulated price growth.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CashCow {
    pub player_id: PlayerId,
    pub name: String,
    pub price: i64,
    pub projected_price: i64,
    pub projected_gain: i64,
    pub peak_round: u32,
}

/// Ranks players priced at or below `max_price` by simulated price gain over
/// `rounds` rounds, largest first. Players whose projection fails are
/// skipped.
pub fn rank_cash_cows(
    projector: &ScoreProjector,
    simulator: &PriceSimulator,
    port: &(dyn HistoryPort + Sync),
    players: &[Player],
    first_round: u32,
    rounds: u32,
    max_price: i64,
) -> Vec<CashCow> {
    let mut cows: Vec<CashCow> = players
        .par_iter()
        .filter(|p| p.price <= max_price)
        .filter_map(|player| {
            match simulate_player(projector, simulator, port, player, first_round, rounds) {
                Ok((_, trajectory)) => {
                    let peak_round = trajectory.peak().map_or(first_round, |p| p.round);
                    Some(CashCow {
                        player_id: player.id,
                        name: player.name.clone(),
                        price: player.price,
                        projected_price: trajectory.final_price(),
                        projected_gain: trajectory.total_change(),
                        peak_round,
                    })
                }
                Err(e) => {
                    debug!(player_id = player.id, error = %e, "skipping cash cow candidate");
                    None
                }
            }
        })
        .collect();

    cows.sort_by_key(|c| (Reverse(c.projected_gain), c.player_id));
    cows
}
