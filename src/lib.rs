// Library crate for the rock-paper-scissors game core
// This file exposes the public API for integration tests and the demo binary

pub mod config;
pub mod game;
pub mod shared;
pub mod user;

// Re-export commonly used types for easier access in tests
pub use config::GameConfig;
pub use game::{
    Decision, Game, GameError, GameRepository, GameService, GameStatus, InMemoryGameRepository,
    TurnOutcome, TurnResult,
};
pub use shared::{AppError, AppState};
pub use user::{InMemoryUserRepository, UserModel, UserRepository};
