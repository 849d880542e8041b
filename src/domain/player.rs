//! Player snapshots and positions.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

pub type PlayerId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Position {
    Def,
    Mid,
    Ruc,
    Fwd,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Position::Def => "DEF",
            Position::Mid => "MID",
            Position::Ruc => "RUC",
            Position::Fwd => "FWD",
        };
        write!(f, "{s}")
    }
}

impl FromStr for Position {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "DEF" => Ok(Position::Def),
            "MID" => Ok(Position::Mid),
            "RUC" => Ok(Position::Ruc),
            "FWD" => Ok(Position::Fwd),
            other => Err(format!("unknown position '{other}'")),
        }
    }
}

/// Read-only snapshot of a player as supplied by the history port.
///
/// `price_history` is ordered oldest first and does not need to end with
/// `price`; trend classification only looks at the history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub position: Position,
    pub team: String,
    pub price: i64,
    pub breakeven: i32,
    pub average: f64,
    pub games_played: u32,
    pub ceiling: Option<f64>,
    pub floor: Option<f64>,
    pub price_history: Vec<i64>,
}

impl Player {
    pub fn new(id: PlayerId, name: &str, position: Position, team: &str) -> Self {
        Player {
            id,
            name: name.to_string(),
            position,
            team: team.to_string(),
            price: 0,
            breakeven: 0,
            average: 0.0,
            games_played: 0,
            ceiling: None,
            floor: None,
            price_history: Vec::new(),
        }
    }

    pub fn with_price(mut self, price: i64, breakeven: i32) -> Self {
        self.price = price;
        self.breakeven = breakeven;
        self
    }

    pub fn with_average(mut self, average: f64) -> Self {
        self.average = average;
        self
    }

    /// True when the player has a usable season average.
    pub fn has_average(&self) -> bool {
        self.average > 0.0
    }
}
