use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use super::core::Game;
use super::status::GameStatus;
use crate::shared::AppError;

/// Trait for game repository operations
#[async_trait]
pub trait GameRepository: Send + Sync {
    async fn insert(&self, game: &Game) -> Result<Game, AppError>;
    async fn find_by_id(&self, game_id: Uuid) -> Result<Option<Game>, AppError>;

    /// Stores the game only if nobody saved it since it was loaded, i.e. the stored revision
    /// still equals `game.revision()`. Fails with `AppError::Conflict` otherwise.
    /// Returns the stored copy, which carries the next revision.
    async fn save(&self, game: &Game) -> Result<Game, AppError>;

    /// At most `limit` games in the given status, oldest first
    async fn find_by_status(&self, status: GameStatus, limit: usize)
        -> Result<Vec<Game>, AppError>;

    /// Returns whether a game was removed
    async fn delete(&self, game_id: Uuid) -> Result<bool, AppError>;
}

#[derive(Default)]
struct GameStore {
    games: HashMap<Uuid, Game>,
    insertion_order: Vec<Uuid>,
}

/// In-memory implementation of GameRepository for development and testing
pub struct InMemoryGameRepository {
    store: RwLock<GameStore>,
}

impl Default for InMemoryGameRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryGameRepository {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(GameStore::default()),
        }
    }

    pub async fn game_count(&self) -> usize {
        self.store.read().await.games.len()
    }
}

#[async_trait]
impl GameRepository for InMemoryGameRepository {
    #[instrument(skip(self, game), fields(game_id = %game.id()))]
    async fn insert(&self, game: &Game) -> Result<Game, AppError> {
        let mut store = self.store.write().await;
        if store.games.contains_key(&game.id()) {
            warn!("Game already exists in memory");
            return Err(AppError::Conflict(format!(
                "Game {} already exists",
                game.id()
            )));
        }

        store.games.insert(game.id(), game.clone());
        store.insertion_order.push(game.id());

        debug!(turns_count = game.turns_count(), "Game inserted in memory");
        Ok(game.clone())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, game_id: Uuid) -> Result<Option<Game>, AppError> {
        let store = self.store.read().await;
        let game = store.games.get(&game_id).cloned();

        match &game {
            Some(g) => debug!(status = %g.status(), revision = g.revision(), "Game found in memory"),
            None => debug!("Game not found in memory"),
        }

        Ok(game)
    }

    #[instrument(skip(self, game), fields(game_id = %game.id(), revision = game.revision()))]
    async fn save(&self, game: &Game) -> Result<Game, AppError> {
        let mut store = self.store.write().await;

        let stored = store
            .games
            .get(&game.id())
            .ok_or_else(|| AppError::NotFound(format!("Game {} not found", game.id())))?;

        if stored.revision() != game.revision() {
            debug!(
                stored_revision = stored.revision(),
                "Rejecting save of stale game"
            );
            return Err(AppError::Conflict(format!(
                "Game {} was modified concurrently (revision {} != {})",
                game.id(),
                stored.revision(),
                game.revision()
            )));
        }

        let mut saved = game.clone();
        saved.mark_saved();
        store.games.insert(saved.id(), saved.clone());

        debug!(status = %saved.status(), "Game saved in memory");
        Ok(saved)
    }

    #[instrument(skip(self))]
    async fn find_by_status(
        &self,
        status: GameStatus,
        limit: usize,
    ) -> Result<Vec<Game>, AppError> {
        let store = self.store.read().await;
        let games: Vec<Game> = store
            .insertion_order
            .iter()
            .filter_map(|id| store.games.get(id))
            .filter(|g| g.status() == status)
            .take(limit)
            .cloned()
            .collect();

        debug!(found = games.len(), "Listed games by status");
        Ok(games)
    }

    #[instrument(skip(self))]
    async fn delete(&self, game_id: Uuid) -> Result<bool, AppError> {
        let mut store = self.store.write().await;
        let removed = store.games.remove(&game_id).is_some();
        if removed {
            store.insertion_order.retain(|id| *id != game_id);
            debug!("Game deleted from memory");
        }
        Ok(removed)
    }
}
