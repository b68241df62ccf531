use rand::seq::IteratorRandom;
use std::sync::Arc;
use strum::IntoEnumIterator;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rps_game::{
    AppError, AppState, Decision, GameConfig, InMemoryGameRepository, InMemoryUserRepository,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), AppError> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rps_game=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = GameConfig::from_env()?;
    info!(?config, "Starting rock-paper-scissors demo");

    // In-memory collaborators; a real deployment plugs its own repositories in here
    let app_state = AppState::new(
        Arc::new(InMemoryGameRepository::new()),
        Arc::new(InMemoryUserRepository::new()),
        config,
    );
    let service = &app_state.game_service;

    let alice = app_state
        .user_repository
        .get_or_create_by_login("alice")
        .await?;
    let bob = app_state
        .user_repository
        .get_or_create_by_login("bob")
        .await?;

    service.join_game(alice.id).await?;
    let mut game = service.join_game(bob.id).await?;

    let mut rng = rand::rng();
    while !game.is_finished() {
        for user in [&alice, &bob] {
            let decision = Decision::iter()
                .choose(&mut rng)
                .ok_or_else(|| AppError::Internal("empty decision set".to_string()))?;
            info!(login = %user.login, %decision, "Player decided");

            let outcome = service.play_decision(game.id(), user.id, decision).await?;
            game = outcome.game;
        }
    }

    for player in game.players() {
        info!(login = %player.login(), score = player.score(), "Final score");
    }
    match game.leader() {
        Some(leader) => info!(winner = %leader.login(), "We have a winner"),
        None => info!("The game ended in a tie"),
    }

    Ok(())
}
