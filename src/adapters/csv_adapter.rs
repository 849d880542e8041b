//! CSV directory history adapter.
//!
//! Reads `players.csv`, `scores.csv`, `fixtures.csv` and the optional
//! `prices.csv` once at construction; lookups are served from memory.

use crate::domain::error::EngineError;
use crate::domain::player::{Player, PlayerId, Position};
use crate::domain::record::{Fixture, PerformanceRecord};
use crate::ports::history_port::HistoryPort;
use chrono::NaiveDate;
use csv::StringRecord;
use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info};

pub struct CsvHistoryAdapter {
    base_path: PathBuf,
    players: Vec<Player>,
    records: Vec<PerformanceRecord>,
    fixtures: Vec<Fixture>,
}

impl CsvHistoryAdapter {
    pub fn from_dir<P: AsRef<Path>>(base_path: P) -> Result<Self, EngineError> {
        let base_path = base_path.as_ref().to_path_buf();

        let mut players = read_rows(&base_path.join("players.csv"), parse_player)?;
        let mut records = read_rows(&base_path.join("scores.csv"), parse_record)?;
        let fixtures = read_rows(&base_path.join("fixtures.csv"), parse_fixture)?;

        let prices_path = base_path.join("prices.csv");
        if prices_path.exists() {
            let prices = read_rows(&prices_path, parse_price)?;
            attach_price_history(&mut players, prices);
        } else {
            debug!(path = %prices_path.display(), "no price history file");
        }

        records.sort_by_key(|r| (r.player_id, Reverse(r.round)));

        info!(
            path = %base_path.display(),
            players = players.len(),
            records = records.len(),
            fixtures = fixtures.len(),
            "loaded history"
        );

        Ok(Self {
            base_path,
            players,
            records,
            fixtures,
        })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn player_records(
        &self,
        id: PlayerId,
        before_round: u32,
    ) -> impl Iterator<Item = &PerformanceRecord> {
        self.records
            .iter()
            .filter(move |r| r.player_id == id && r.round < before_round)
    }
}

impl HistoryPort for CsvHistoryAdapter {
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
        Ok(self.player_records(id, before_round).take(limit).cloned().collect())
    }

    fn opponent_records(
        &self,
        id: PlayerId,
        before_round: u32,
        opponent: &str,
    ) -> Result<Vec<PerformanceRecord>, EngineError> {
        Ok(self
            .player_records(id, before_round)
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
            .player_records(id, before_round)
            .filter(|r| r.venue.eq_ignore_ascii_case(venue))
            .cloned()
            .collect())
    }

    fn fixture(&self, team: &str, round: u32) -> Result<Option<Fixture>, EngineError> {
        Ok(self
            .fixtures
            .iter()
            .find(|f| f.round == round && f.team.eq_ignore_ascii_case(team))
            .cloned())
    }
}

fn read_rows<T>(
    path: &Path,
    parse: fn(&StringRecord) -> Result<T, EngineError>,
) -> Result<Vec<T>, EngineError> {
    let content = fs::read_to_string(path).map_err(|e| EngineError::Data {
        reason: format!("failed to read {}: {}", path.display(), e),
    })?;

    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut rows = Vec::new();
    for (line, result) in rdr.records().enumerate() {
        let record = result.map_err(|e| EngineError::Data {
            reason: format!("CSV parse error in {}: {}", path.display(), e),
        })?;
        let row = parse(&record).map_err(|e| {
            let detail = match e {
                EngineError::Data { reason } => reason,
                other => other.to_string(),
            };
            EngineError::Data {
                reason: format!("{} row {}: {}", path.display(), line + 1, detail),
            }
        })?;
        rows.push(row);
    }
    Ok(rows)
}

fn field<'a>(record: &'a StringRecord, index: usize, name: &str) -> Result<&'a str, EngineError> {
    record.get(index).ok_or_else(|| EngineError::Data {
        reason: format!("missing {} column", name),
    })
}

fn parse_field<T: FromStr>(record: &StringRecord, index: usize, name: &str) -> Result<T, EngineError>
where
    T::Err: std::fmt::Display,
{
    field(record, index, name)?
        .parse()
        .map_err(|e| EngineError::Data {
            reason: format!("invalid {} value: {}", name, e),
        })
}

/// Blank or absent trailing columns read as `None`.
fn optional_field<T: FromStr>(
    record: &StringRecord,
    index: usize,
    name: &str,
) -> Result<Option<T>, EngineError>
where
    T::Err: std::fmt::Display,
{
    match record.get(index) {
        None => Ok(None),
        Some(s) if s.is_empty() => Ok(None),
        Some(_) => parse_field(record, index, name).map(Some),
    }
}

fn optional_text(record: &StringRecord, index: usize) -> Option<String> {
    record
        .get(index)
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

fn parse_player(record: &StringRecord) -> Result<Player, EngineError> {
    let position = Position::from_str(field(record, 2, "position")?)
        .map_err(|reason| EngineError::Data { reason })?;
    Ok(Player {
        id: parse_field(record, 0, "id")?,
        name: field(record, 1, "name")?.to_string(),
        position,
        team: field(record, 3, "team")?.to_string(),
        price: parse_field(record, 4, "price")?,
        breakeven: parse_field(record, 5, "breakeven")?,
        average: parse_field(record, 6, "average")?,
        games_played: optional_field(record, 7, "games")?.unwrap_or(0),
        ceiling: optional_field(record, 8, "ceiling")?,
        floor: optional_field(record, 9, "floor")?,
        price_history: Vec::new(),
    })
}

fn parse_record(record: &StringRecord) -> Result<PerformanceRecord, EngineError> {
    let date = match optional_text(record, 5) {
        Some(s) => Some(NaiveDate::parse_from_str(&s, "%Y-%m-%d").map_err(|e| {
            EngineError::Data {
                reason: format!("invalid date format: {}", e),
            }
        })?),
        None => None,
    };
    Ok(PerformanceRecord {
        player_id: parse_field(record, 0, "player_id")?,
        round: parse_field(record, 1, "round")?,
        score: parse_field(record, 2, "score")?,
        opponent: field(record, 3, "opponent")?.to_string(),
        venue: field(record, 4, "venue")?.to_string(),
        date,
    })
}

fn parse_fixture(record: &StringRecord) -> Result<Fixture, EngineError> {
    Ok(Fixture {
        team: field(record, 0, "team")?.to_string(),
        round: parse_field(record, 1, "round")?,
        opponent: optional_text(record, 2),
        venue: optional_text(record, 3),
    })
}

fn parse_price(record: &StringRecord) -> Result<(PlayerId, u32, i64), EngineError> {
    Ok((
        parse_field(record, 0, "player_id")?,
        parse_field(record, 1, "round")?,
        parse_field(record, 2, "price")?,
    ))
}

fn attach_price_history(players: &mut [Player], prices: Vec<(PlayerId, u32, i64)>) {
    let mut by_player: BTreeMap<PlayerId, BTreeMap<u32, i64>> = BTreeMap::new();
    for (id, round, price) in prices {
        by_player.entry(id).or_default().insert(round, price);
    }
    for player in players.iter_mut() {
        if let Some(rounds) = by_player.remove(&player.id) {
            player.price_history = rounds.into_values().collect();
        }
    }
}
