// Public API
pub use self::core::{
    DuplicatePlayerPolicy, Game, GameError, GameSnapshot, Player, TurnOutcome, TurnResult,
    MAX_PLAYERS,
};
pub use decision::{Decision, DecisionSlot, BEATS};
pub use repository::{GameRepository, InMemoryGameRepository};
pub use service::{DecisionOutcome, GameService};
pub use status::{GameStatus, Step, Transition};

// Internal modules
mod core;
mod decision;
mod repository;
mod service;
mod status;
