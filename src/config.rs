use std::str::FromStr;

use crate::game::DuplicatePlayerPolicy;
use crate::shared::AppError;

/// Runtime settings for the game service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    /// Turns per game when the caller does not pick a number
    pub default_turns_count: u32,
    pub duplicate_players: DuplicatePlayerPolicy,
    /// How many times an operation is reloaded and re-applied after a concurrent save
    pub max_conflict_retries: usize,
    /// How many waiting games matchmaking looks at before opening a new one
    pub matchmaking_scan_limit: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            default_turns_count: 3,
            duplicate_players: DuplicatePlayerPolicy::Allow,
            max_conflict_retries: 5,
            matchmaking_scan_limit: 10,
        }
    }
}

impl GameConfig {
    /// Reads settings from `RPS_*` environment variables, falling back to defaults
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let default_turns_count =
            parse_or(&lookup, "RPS_DEFAULT_TURNS", defaults.default_turns_count)?;
        if default_turns_count == 0 {
            return Err(AppError::Config(
                "RPS_DEFAULT_TURNS must be greater than 0".to_string(),
            ));
        }

        let duplicate_players = match lookup("RPS_DUPLICATE_PLAYERS") {
            None => defaults.duplicate_players,
            Some(value) => match value.trim().to_ascii_lowercase().as_str() {
                "allow" => DuplicatePlayerPolicy::Allow,
                "reject" => DuplicatePlayerPolicy::Reject,
                other => {
                    return Err(AppError::Config(format!(
                        "RPS_DUPLICATE_PLAYERS must be allow or reject, got {}",
                        other
                    )))
                }
            },
        };

        // Zero would skip every waiting game and open a new one per join
        let matchmaking_scan_limit = parse_or(
            &lookup,
            "RPS_MATCHMAKING_SCAN_LIMIT",
            defaults.matchmaking_scan_limit,
        )?;
        if matchmaking_scan_limit == 0 {
            return Err(AppError::Config(
                "RPS_MATCHMAKING_SCAN_LIMIT must be greater than 0".to_string(),
            ));
        }

        Ok(Self {
            default_turns_count,
            duplicate_players,
            max_conflict_retries: parse_or(
                &lookup,
                "RPS_MAX_CONFLICT_RETRIES",
                defaults.max_conflict_retries,
            )?,
            matchmaking_scan_limit,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, AppError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("{} has invalid value: {}", key, value))),
    }
}
