//! Domain error types.

use crate::domain::player::PlayerId;

/// Top-level error type for rosteredge.
///
/// Missing history is never an error: it degrades confidence instead. These
/// variants cover broken configuration, unreadable source data, and callers
/// violating roster invariants.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("unknown player {id}")]
    UnknownPlayer { id: PlayerId },

    #[error("player {id} is not on the current roster")]
    NotOnRoster { id: PlayerId },

    #[error("player {id} is already on the current roster")]
    AlreadyOnRoster { id: PlayerId },

    #[error("no fixture for {team} in round {round}")]
    NoFixture { team: String, round: u32 },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&EngineError> for std::process::ExitCode {
    fn from(err: &EngineError) -> Self {
        let code: u8 = match err {
            EngineError::Io(_) => 1,
            EngineError::ConfigParse { .. }
            | EngineError::ConfigMissing { .. }
            | EngineError::ConfigInvalid { .. } => 2,
            EngineError::Data { .. } => 3,
            EngineError::NotOnRoster { .. } | EngineError::AlreadyOnRoster { .. } => 4,
            EngineError::UnknownPlayer { .. } | EngineError::NoFixture { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
