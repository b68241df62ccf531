use serde::{Deserialize, Serialize};
use std::fmt;

use super::core::GameError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    WaitingToStart,
    Playing,
    Finished,
    Canceled,
}

impl GameStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, GameStatus::Finished | GameStatus::Canceled)
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                GameStatus::WaitingToStart => "WaitingToStart",
                GameStatus::Playing => "Playing",
                GameStatus::Finished => "Finished",
                GameStatus::Canceled => "Canceled",
            }
        )
    }
}

/// Events fed to the transition table by the game's operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// A player took a seat; `seats_filled` is true once both seats are taken.
    AdmitPlayer { seats_filled: bool },
    SubmitDecision,
    /// A turn was scored; `last_turn` is true when it was the final one.
    ResolveTurn { last_turn: bool },
    Cancel,
}

impl Transition {
    pub fn operation(&self) -> &'static str {
        match self {
            Transition::AdmitPlayer { .. } => "add_player",
            Transition::SubmitDecision => "submit_decision",
            Transition::ResolveTurn { .. } => "resolve_turn",
            Transition::Cancel => "cancel",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The operation is allowed and the game moves to (or stays in) this status.
    Move(GameStatus),
    /// The operation is accepted but changes nothing.
    Ignore,
}

impl GameStatus {
    /// The full status x operation table. Every pair not listed as allowed is rejected.
    pub fn apply(self, transition: Transition) -> Result<Step, GameError> {
        use GameStatus::*;
        use Transition::*;

        match (self, transition) {
            (WaitingToStart, AdmitPlayer { seats_filled: false }) => Ok(Step::Move(WaitingToStart)),
            (WaitingToStart, AdmitPlayer { seats_filled: true }) => Ok(Step::Move(Playing)),

            (Playing, SubmitDecision) => Ok(Step::Move(Playing)),
            (Playing, ResolveTurn { last_turn: false }) => Ok(Step::Move(Playing)),
            (Playing, ResolveTurn { last_turn: true }) => Ok(Step::Move(Finished)),

            (WaitingToStart | Playing, Cancel) => Ok(Step::Move(Canceled)),
            (Finished | Canceled, Cancel) => Ok(Step::Ignore),

            (status, transition) => Err(GameError::InvalidState {
                status,
                operation: transition.operation(),
            }),
        }
    }
}
