//! Roster lists supplied on the command line or in config.

use std::collections::HashSet;

use super::player::PlayerId;

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum RosterError {
    #[error("empty token in player list")]
    EmptyToken,

    #[error("invalid player id: {0}")]
    InvalidId(String),

    #[error("duplicate player id: {0}")]
    DuplicateId(PlayerId),
}

/// Parses a comma-separated list of player ids, rejecting blanks and
/// duplicates.
pub fn parse_player_ids(input: &str) -> Result<Vec<PlayerId>, RosterError> {
    let mut ids = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(RosterError::EmptyToken);
        }
        let id: PlayerId = trimmed
            .parse()
            .map_err(|_| RosterError::InvalidId(trimmed.to_string()))?;
        if !seen.insert(id) {
            return Err(RosterError::DuplicateId(id));
        }
        ids.push(id);
    }

    Ok(ids)
}
