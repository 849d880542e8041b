#![allow(dead_code)]

use rosteredge::domain::error::EngineError;
use rosteredge::domain::player::{Player, PlayerId, Position};
use rosteredge::domain::record::{Fixture, PerformanceRecord};
use rosteredge::ports::history_port::HistoryPort;
use std::cmp::Reverse;
use std::collections::HashSet;

/// In-memory history. Records are returned newest first regardless of the
/// order they were added in.
pub struct MockHistoryPort {
    pub players: Vec<Player>,
    pub records: Vec<PerformanceRecord>,
    pub fixtures: Vec<Fixture>,
    pub failing: HashSet<PlayerId>,
}

impl MockHistoryPort {
    pub fn new() -> Self {
        Self {
            players: Vec::new(),
            records: Vec::new(),
            fixtures: Vec::new(),
            failing: HashSet::new(),
        }
    }

    pub fn with_player(mut self, player: Player) -> Self {
        self.players.push(player);
        self
    }

    pub fn with_records(mut self, records: Vec<PerformanceRecord>) -> Self {
        self.records.extend(records);
        self.records
            .sort_by_key(|r| (r.player_id, Reverse(r.round)));
        self
    }

    pub fn with_fixture(mut self, fixture: Fixture) -> Self {
        self.fixtures.push(fixture);
        self
    }

    /// Every record lookup for `id` fails with a data error.
    pub fn with_failure(mut self, id: PlayerId) -> Self {
        self.failing.insert(id);
        self
    }

    fn records_for(
        &self,
        id: PlayerId,
        before_round: u32,
    ) -> Result<impl Iterator<Item = &PerformanceRecord>, EngineError> {
        if self.failing.contains(&id) {
            return Err(EngineError::Data {
                reason: format!("history unavailable for player {id}"),
            });
        }
        Ok(self
            .records
            .iter()
            .filter(move |r| r.player_id == id && r.round < before_round))
    }
}

impl HistoryPort for MockHistoryPort {
    fn list_players(&self) -> Result<Vec<Player>, EngineError> {
        Ok(self.players.clone())
    }

    fn get_player(&self, id: PlayerId) -> Result<Option<Player>, EngineError> {
        Ok(self.players.iter().find(|p| p.id == id).cloned())
    }

    fn recent_records(
        &self,
        id: PlayerId,
        before_round: u32,
        limit: usize,
    ) -> Result<Vec<PerformanceRecord>, EngineError> {
        Ok(self.records_for(id, before_round)?.take(limit).cloned().collect())
    }

    fn opponent_records(
        &self,
        id: PlayerId,
        before_round: u32,
        opponent: &str,
    ) -> Result<Vec<PerformanceRecord>, EngineError> {
        Ok(self
            .records_for(id, before_round)?
            .filter(|r| r.opponent.eq_ignore_ascii_case(opponent))
            .cloned()
            .collect())
    }

    fn venue_records(
        &self,
        id: PlayerId,
        before_round: u32,
        venue: &str,
    ) -> Result<Vec<PerformanceRecord>, EngineError> {
        Ok(self
            .records_for(id, before_round)?
            .filter(|r| r.venue.eq_ignore_ascii_case(venue))
            .cloned()
            .collect())
    }

    fn fixture(&self, team: &str, round: u32) -> Result<Option<Fixture>, EngineError> {
        Ok(self
            .fixtures
            .iter()
            .find(|f| f.team.eq_ignore_ascii_case(team) && f.round == round)
            .cloned())
    }
}

pub fn make_player(id: PlayerId, position: Position, team: &str, price: i64, breakeven: i32, average: f64) -> Player {
    Player::new(id, &format!("Player {id}"), position, team)
        .with_price(price, breakeven)
        .with_average(average)
}

pub fn make_record(player_id: PlayerId, round: u32, score: f64, opponent: &str, venue: &str) -> PerformanceRecord {
    PerformanceRecord {
        player_id,
        round,
        score,
        opponent: opponent.to_string(),
        venue: venue.to_string(),
        date: None,
    }
}

/// Five rounds of `score` against ESS at the MCG, rounds 1..=5.
pub fn steady_history(player_id: PlayerId, score: f64) -> Vec<PerformanceRecord> {
    (1..=5)
        .map(|round| make_record(player_id, round, score, "ESS", "MCG"))
        .collect()
}

/// COL play ESS at the MCG in every round of `rounds`.
pub fn col_fixtures(port: MockHistoryPort, rounds: std::ops::RangeInclusive<u32>) -> MockHistoryPort {
    rounds.fold(port, |port, round| {
        port.with_fixture(Fixture::new("COL", round, "ESS", "MCG"))
    })
}
