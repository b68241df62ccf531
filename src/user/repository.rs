use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::models::UserModel;
use crate::shared::AppError;

/// Trait for user repository operations
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert(&self, user: &UserModel) -> Result<UserModel, AppError>;
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<UserModel>, AppError>;

    /// Returns the user with this login, creating it first if needed.
    /// Concurrent calls with the same login resolve to the same user.
    async fn get_or_create_by_login(&self, login: &str) -> Result<UserModel, AppError>;

    async fn update(&self, user: &UserModel) -> Result<(), AppError>;
    async fn delete(&self, user_id: Uuid) -> Result<(), AppError>;

    // Single-field updates. Each one reads and writes the stored user atomically, so concurrent
    // callers touching different fields never overwrite each other.

    /// Points the user at the game they are seated in
    async fn set_current_game(&self, user_id: Uuid, game_id: Uuid) -> Result<(), AppError>;

    /// Clears the user's current game, but only if it is still `game_id`
    async fn leave_game(&self, user_id: Uuid, game_id: Uuid) -> Result<(), AppError>;

    /// Counts `game_id` as played and clears it as the current game
    async fn record_finished_game(&self, user_id: Uuid, game_id: Uuid) -> Result<(), AppError>;
}

/// In-memory implementation of UserRepository for development and testing
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<Uuid, UserModel>>,
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
        }
    }

    pub async fn user_count(&self) -> usize {
        self.users.read().await.len()
    }

    /// Applies `change` to the stored user while holding the write lock
    async fn modify<F>(&self, user_id: Uuid, change: F) -> Result<(), AppError>
    where
        F: FnOnce(&mut UserModel) + Send,
    {
        let mut users = self.users.write().await;
        let user = users.get_mut(&user_id).ok_or_else(|| {
            warn!(user_id = %user_id, "User not found for update in memory");
            AppError::NotFound(format!("User {} not found", user_id))
        })?;
        change(user);
        Ok(())
    }
}

fn login_taken(users: &HashMap<Uuid, UserModel>, login: &str, except: Uuid) -> bool {
    users.values().any(|u| u.login == login && u.id != except)
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    #[instrument(skip(self, user))]
    async fn insert(&self, user: &UserModel) -> Result<UserModel, AppError> {
        debug!(user_id = %user.id, login = %user.login, "Inserting user in memory");

        let mut users = self.users.write().await;
        if users.contains_key(&user.id) {
            warn!(user_id = %user.id, "User already exists in memory");
            return Err(AppError::Conflict(format!("User {} already exists", user.id)));
        }
        if login_taken(&users, &user.login, user.id) {
            warn!(login = %user.login, "Login already taken");
            return Err(AppError::Conflict(format!(
                "Login {} already taken",
                user.login
            )));
        }
        users.insert(user.id, user.clone());

        Ok(user.clone())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<UserModel>, AppError> {
        let users = self.users.read().await;
        let user = users.get(&user_id).cloned();

        match &user {
            Some(u) => debug!(user_id = %user_id, login = %u.login, "User found in memory"),
            None => debug!(user_id = %user_id, "User not found in memory"),
        }

        Ok(user)
    }

    #[instrument(skip(self))]
    async fn get_or_create_by_login(&self, login: &str) -> Result<UserModel, AppError> {
        let login = login.trim();
        if login.is_empty() {
            return Err(AppError::BadRequest("Login cannot be empty".to_string()));
        }

        // Lookup and insert happen under one write lock, so two callers cannot both create
        let mut users = self.users.write().await;
        if let Some(existing) = users.values().find(|u| u.login == login) {
            debug!(user_id = %existing.id, login = %login, "Found existing user by login");
            return Ok(existing.clone());
        }

        let user = UserModel::new(login.to_string());
        users.insert(user.id, user.clone());

        info!(user_id = %user.id, login = %login, "Created user");
        Ok(user)
    }

    #[instrument(skip(self, user))]
    async fn update(&self, user: &UserModel) -> Result<(), AppError> {
        debug!(user_id = %user.id, "Updating user in memory");

        let mut users = self.users.write().await;
        if !users.contains_key(&user.id) {
            warn!(user_id = %user.id, "User not found for update in memory");
            return Err(AppError::NotFound(format!("User {} not found", user.id)));
        }
        if login_taken(&users, &user.login, user.id) {
            return Err(AppError::Conflict(format!(
                "Login {} already taken",
                user.login
            )));
        }
        users.insert(user.id, user.clone());

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, user_id: Uuid) -> Result<(), AppError> {
        let mut users = self.users.write().await;
        if users.remove(&user_id).is_none() {
            warn!(user_id = %user_id, "User not found for deletion in memory");
            return Err(AppError::NotFound(format!("User {} not found", user_id)));
        }

        debug!(user_id = %user_id, "User deleted from memory");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn set_current_game(&self, user_id: Uuid, game_id: Uuid) -> Result<(), AppError> {
        self.modify(user_id, |user| user.current_game_id = Some(game_id))
            .await
    }

    #[instrument(skip(self))]
    async fn leave_game(&self, user_id: Uuid, game_id: Uuid) -> Result<(), AppError> {
        self.modify(user_id, |user| {
            if user.current_game_id == Some(game_id) {
                user.current_game_id = None;
            }
        })
        .await
    }

    #[instrument(skip(self))]
    async fn record_finished_game(&self, user_id: Uuid, game_id: Uuid) -> Result<(), AppError> {
        self.modify(user_id, |user| {
            user.games_played += 1;
            if user.current_game_id == Some(game_id) {
                user.current_game_id = None;
            }
        })
        .await
    }
}
