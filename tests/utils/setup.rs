use std::sync::Arc;

use rps_game::{
    AppState, GameConfig, GameService, InMemoryGameRepository, InMemoryUserRepository, UserModel,
    UserRepository,
};

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct TestSetup {
    pub state: AppState,
    pub game_repository: Arc<InMemoryGameRepository>,
    pub user_repository: Arc<InMemoryUserRepository>,
    pub users: Vec<UserModel>,
}

impl TestSetup {
    pub fn service(&self) -> Arc<GameService> {
        self.state.game_service.clone()
    }

    pub fn user(&self, login: &str) -> &UserModel {
        self.users
            .iter()
            .find(|u| u.login == login)
            .unwrap_or_else(|| panic!("no test user with login {}", login))
    }

    pub async fn reload_user(&self, login: &str) -> UserModel {
        let id = self.user(login).id;
        self.user_repository
            .find_by_id(id)
            .await
            .unwrap()
            .expect("user should exist")
    }
}

pub struct TestSetupBuilder {
    logins: Vec<String>,
    config: GameConfig,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            logins: vec![],
            config: GameConfig::default(),
        }
    }

    pub fn with_users(mut self, logins: Vec<&str>) -> Self {
        self.logins = logins.into_iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_two_users(self) -> Self {
        self.with_users(vec!["alice", "bob"])
    }

    pub fn with_turns(mut self, turns_count: u32) -> Self {
        self.config.default_turns_count = turns_count;
        self
    }

    pub async fn build(self) -> TestSetup {
        let game_repository = Arc::new(InMemoryGameRepository::new());
        let user_repository = Arc::new(InMemoryUserRepository::new());

        let mut users = Vec::new();
        for login in &self.logins {
            users.push(user_repository.get_or_create_by_login(login).await.unwrap());
        }

        let state = AppState::new(
            game_repository.clone(),
            user_repository.clone(),
            self.config,
        );

        TestSetup {
            state,
            game_repository,
            user_repository,
            users,
        }
    }
}
