use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user who can be seated in games
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserModel {
    pub id: Uuid,
    pub login: String,                 // Unique across users
    pub games_played: u32,             // Finished games only
    pub current_game_id: Option<Uuid>, // Game the user is seated in, until it finishes or is canceled
}

impl UserModel {
    /// Creates a new user with a generated ID
    pub fn new(login: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            login,
            games_played: 0,
            current_game_id: None,
        }
    }
}
