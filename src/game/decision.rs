use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use strum_macros::EnumIter;

use super::core::GameError;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter,
)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Rock,
    Paper,
    Scissors,
}

/// Winning pairs: `(a, b)` means `a` beats `b`.
pub const BEATS: &[(Decision, Decision)] = &[
    (Decision::Rock, Decision::Scissors),
    (Decision::Scissors, Decision::Paper),
    (Decision::Paper, Decision::Rock),
];

impl Decision {
    pub fn beats(self, other: Decision) -> bool {
        BEATS.contains(&(self, other))
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Decision::Rock => "rock",
                Decision::Paper => "paper",
                Decision::Scissors => "scissors",
            }
        )
    }
}

impl FromStr for Decision {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rock" => Ok(Decision::Rock),
            "paper" => Ok(Decision::Paper),
            "scissors" => Ok(Decision::Scissors),
            _ => Err(GameError::UnknownDecision(s.to_string())),
        }
    }
}

/// A player's pending decision for the turn in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", content = "decision", rename_all = "snake_case")]
pub enum DecisionSlot {
    #[default]
    Empty,
    Submitted(Decision),
}

impl DecisionSlot {
    pub fn is_submitted(&self) -> bool {
        matches!(self, DecisionSlot::Submitted(_))
    }

    pub fn decision(&self) -> Option<Decision> {
        match self {
            DecisionSlot::Empty => None,
            DecisionSlot::Submitted(decision) => Some(*decision),
        }
    }
}
