use std::sync::Arc;
use thiserror::Error;

use crate::config::GameConfig;
use crate::game::{GameError, GameRepository, GameService};
use crate::user::UserRepository;

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub game_repository: Arc<dyn GameRepository>,
    pub user_repository: Arc<dyn UserRepository>,
    pub game_service: Arc<GameService>,
    pub config: GameConfig,
}

impl AppState {
    pub fn new(
        game_repository: Arc<dyn GameRepository>,
        user_repository: Arc<dyn UserRepository>,
        config: GameConfig,
    ) -> Self {
        let game_service = Arc::new(GameService::new(
            game_repository.clone(),
            user_repository.clone(),
            config.clone(),
        ));

        Self {
            game_repository,
            user_repository,
            game_service,
            config,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Game error: {0}")]
    Game(#[from] GameError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether the operation may succeed if retried against freshly loaded state
    pub fn is_conflict(&self) -> bool {
        matches!(self, AppError::Conflict(_))
    }
}
