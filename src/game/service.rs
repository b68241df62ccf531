use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::{
    config::GameConfig,
    game::{
        core::{Game, GameError, TurnResult},
        decision::Decision,
        repository::GameRepository,
        status::GameStatus,
    },
    shared::AppError,
    user::{UserModel, UserRepository},
};

#[derive(Debug, Clone)]
pub struct DecisionOutcome {
    pub game: Game,
    /// Present when this decision completed the turn and it was resolved
    pub turn_result: Option<TurnResult>,
}

pub struct GameService {
    game_repository: Arc<dyn GameRepository>,
    user_repository: Arc<dyn UserRepository>,
    config: GameConfig,
}

impl GameService {
    pub fn new(
        game_repository: Arc<dyn GameRepository>,
        user_repository: Arc<dyn UserRepository>,
        config: GameConfig,
    ) -> Self {
        Self {
            game_repository,
            user_repository,
            config,
        }
    }

    /// Create an empty game waiting for players
    #[instrument(skip(self))]
    pub async fn create_game(&self, turns_count: Option<u32>) -> Result<Game, AppError> {
        let turns_count = turns_count.unwrap_or(self.config.default_turns_count);
        let game = Game::with_policy(turns_count, self.config.duplicate_players)?;
        let game = self.game_repository.insert(&game).await?;

        info!(game_id = %game.id(), turns_count, "Created game");
        Ok(game)
    }

    pub async fn get_game(&self, game_id: Uuid) -> Result<Game, AppError> {
        self.game_repository
            .find_by_id(game_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Game {} not found", game_id)))
    }

    /// Seat the user in a waiting game, opening a new one if none has room.
    /// A user already seated in an unfinished game gets that game back.
    #[instrument(skip(self))]
    pub async fn join_game(&self, user_id: Uuid) -> Result<Game, AppError> {
        let user = self.get_user(user_id).await?;

        if let Some(current_id) = user.current_game_id {
            if let Some(current) = self.game_repository.find_by_id(current_id).await? {
                if !current.is_finished() {
                    debug!(game_id = %current_id, "User is already seated in a game");
                    return Ok(current);
                }
            }
        }

        let candidates = self
            .game_repository
            .find_by_status(GameStatus::WaitingToStart, self.config.matchmaking_scan_limit)
            .await?;

        for mut game in candidates {
            if let Err(e) = game.add_player(&user) {
                debug!(game_id = %game.id(), error = %e, "Skipping waiting game");
                continue;
            }

            match self.game_repository.save(&game).await {
                Ok(saved) => {
                    info!(game_id = %saved.id(), status = %saved.status(), "User joined waiting game");
                    self.user_repository
                        .set_current_game(user.id, saved.id())
                        .await?;
                    return Ok(saved);
                }
                Err(e) if e.is_conflict() => {
                    debug!(game_id = %game.id(), "Waiting game changed underneath, trying next");
                }
                Err(e) => return Err(e),
            }
        }

        let mut game =
            Game::with_policy(self.config.default_turns_count, self.config.duplicate_players)?;
        game.add_player(&user)?;
        let game = self.game_repository.insert(&game).await?;

        info!(game_id = %game.id(), "No waiting game had room, opened a new one");
        self.user_repository
            .set_current_game(user.id, game.id())
            .await?;
        Ok(game)
    }

    /// Seat the user in a specific game
    #[instrument(skip(self))]
    pub async fn add_player(&self, game_id: Uuid, user_id: Uuid) -> Result<Game, AppError> {
        let user = self.get_user(user_id).await?;
        let (game, ()) = self
            .update_game(game_id, |game| game.add_player(&user))
            .await?;

        info!(status = %game.status(), "Player added to game");
        self.user_repository
            .set_current_game(user.id, game.id())
            .await?;
        Ok(game)
    }

    #[instrument(skip(self))]
    pub async fn submit_decision(
        &self,
        game_id: Uuid,
        user_id: Uuid,
        decision: Decision,
    ) -> Result<Game, AppError> {
        let (game, ()) = self
            .update_game(game_id, |game| game.submit_decision(user_id, decision))
            .await?;

        debug!(
            all_submitted = game.all_decisions_submitted(),
            "Decision submitted"
        );
        Ok(game)
    }

    #[instrument(skip(self))]
    pub async fn resolve_turn(&self, game_id: Uuid) -> Result<(Game, TurnResult), AppError> {
        let (game, result) = self.update_game(game_id, Game::resolve_turn).await?;

        self.log_turn(&game, &result);
        self.record_if_finished(&game).await?;
        Ok((game, result))
    }

    /// Submit a decision and, if it was the last one missing, resolve the turn in the same save
    #[instrument(skip(self))]
    pub async fn play_decision(
        &self,
        game_id: Uuid,
        user_id: Uuid,
        decision: Decision,
    ) -> Result<DecisionOutcome, AppError> {
        let (game, turn_result) = self
            .update_game(game_id, |game| {
                game.submit_decision(user_id, decision)?;
                if game.all_decisions_submitted() {
                    game.resolve_turn().map(Some)
                } else {
                    Ok(None)
                }
            })
            .await?;

        if let Some(result) = &turn_result {
            self.log_turn(&game, result);
            self.record_if_finished(&game).await?;
        }

        Ok(DecisionOutcome { game, turn_result })
    }

    /// Cancel a game that has not finished yet; finished games are returned unchanged
    #[instrument(skip(self))]
    pub async fn cancel_game(&self, game_id: Uuid) -> Result<Game, AppError> {
        let current = self.get_game(game_id).await?;
        if current.is_finished() {
            debug!(status = %current.status(), "Game already over, nothing to cancel");
            return Ok(current);
        }

        let (game, canceled) = self.update_game(game_id, |game| Ok(game.cancel())).await?;

        if canceled {
            info!("Game canceled");
            for user_id in seated_users(&game) {
                match self.user_repository.leave_game(user_id, game_id).await {
                    Ok(()) => {}
                    Err(AppError::NotFound(_)) => {
                        warn!(user_id = %user_id, "Player of canceled game no longer exists");
                    }
                    Err(e) => return Err(e),
                }
            }
        }

        Ok(game)
    }

    /// Load, apply, conditionally save. A concurrent save makes the whole cycle start over on
    /// fresh state, up to `max_conflict_retries` times. Game errors are never retried.
    async fn update_game<T, F>(&self, game_id: Uuid, mut apply: F) -> Result<(Game, T), AppError>
    where
        F: FnMut(&mut Game) -> Result<T, GameError> + Send,
        T: Send,
    {
        let mut attempt = 0;
        loop {
            let mut game = self.get_game(game_id).await?;
            let value = apply(&mut game)?;

            match self.game_repository.save(&game).await {
                Ok(saved) => return Ok((saved, value)),
                Err(e) if e.is_conflict() && attempt < self.config.max_conflict_retries => {
                    attempt += 1;
                    warn!(
                        game_id = %game_id,
                        attempt,
                        error = %e,
                        "Concurrent update, reloading game and retrying"
                    );
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn get_user(&self, user_id: Uuid) -> Result<UserModel, AppError> {
        self.user_repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))
    }

    async fn record_if_finished(&self, game: &Game) -> Result<(), AppError> {
        if game.status() != GameStatus::Finished {
            return Ok(());
        }

        for user_id in seated_users(game) {
            match self
                .user_repository
                .record_finished_game(user_id, game.id())
                .await
            {
                Ok(()) => {}
                Err(AppError::NotFound(_)) => {
                    warn!(user_id = %user_id, "Player of finished game no longer exists");
                }
                Err(e) => return Err(e),
            }
        }

        match game.leader() {
            Some(leader) => info!(
                game_id = %game.id(),
                winner = %leader.login(),
                score = leader.score(),
                "Game finished"
            ),
            None => info!(game_id = %game.id(), "Game finished in a tie"),
        }
        Ok(())
    }

    fn log_turn(&self, game: &Game, result: &TurnResult) {
        info!(
            game_id = %game.id(),
            turn_index = result.turn_index,
            winner = ?result.winner_id(),
            "Turn resolved"
        );
    }
}

/// Each seated user once, in seat order
fn seated_users(game: &Game) -> Vec<Uuid> {
    let mut users: Vec<Uuid> = Vec::new();
    for player in game.players() {
        if !users.contains(&player.user_id()) {
            users.push(player.user_id());
        }
    }
    users
}
