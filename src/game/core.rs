// A game is a fixed number of turns between exactly two players. Each turn both players submit a
// decision, then the turn is resolved: the decision that beats the other scores a point for its
// owner, identical decisions are a draw.

// The game starts once the second player is seated, and finishes when the last turn is resolved.
// Any game that has not finished can be canceled.

// The game does no I/O. Callers load it, apply one operation and save it back through the
// repository, which rejects the save if someone else saved in between.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::decision::{Decision, DecisionSlot};
use super::status::{GameStatus, Step, Transition};
use crate::user::models::UserModel;

pub const MAX_PLAYERS: usize = 2;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GameError {
    #[error("Cannot {operation} while game is {status}")]
    InvalidState {
        status: GameStatus,
        operation: &'static str,
    },
    #[error("Player {user_id} is not seated in this game")]
    PlayerNotFound { user_id: Uuid },
    #[error("Player {user_id} already submitted a decision this turn")]
    DecisionAlreadySubmitted { user_id: Uuid },
    #[error("Precondition not met: {0}")]
    PreconditionNotMet(String),
    #[error("User {user_id} is already seated in this game")]
    DuplicatePlayer { user_id: Uuid },
    #[error("Unknown decision: {0}")]
    UnknownDecision(String),
    #[error("Corrupt game state: {0}")]
    CorruptState(String),
}

/// Whether the same user may take both seats of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePlayerPolicy {
    #[default]
    Allow,
    Reject,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    user_id: Uuid,
    login: String,
    score: u32,
    decision: DecisionSlot,
}

impl Player {
    fn new(user_id: Uuid, login: String) -> Self {
        Self {
            user_id,
            login,
            score: 0,
            decision: DecisionSlot::Empty,
        }
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn login(&self) -> &str {
        &self.login
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn decision(&self) -> DecisionSlot {
        self.decision
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "user_id", rename_all = "lowercase")]
pub enum TurnOutcome {
    Winner(Uuid),
    Draw,
}

/// Emitted once per resolved turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnResult {
    pub turn_index: u32,
    pub outcome: TurnOutcome,
}

impl TurnResult {
    pub fn winner_id(&self) -> Option<Uuid> {
        match self.outcome {
            TurnOutcome::Winner(user_id) => Some(user_id),
            TurnOutcome::Draw => None,
        }
    }
}

/// Stored form of a game. Turning it back into a [`Game`] re-checks every invariant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub id: Uuid,
    pub status: GameStatus,
    pub turns_count: u32,
    pub current_turn_index: u32,
    pub players: Vec<Player>,
    #[serde(default)]
    pub duplicate_players: DuplicatePlayerPolicy,
    #[serde(default)]
    pub revision: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GameSnapshot", into = "GameSnapshot")]
pub struct Game {
    id: Uuid,
    status: GameStatus,
    turns_count: u32,
    current_turn_index: u32,
    players: Vec<Player>, // Seat order matters: players[0] is compared against players[1]
    duplicate_players: DuplicatePlayerPolicy,
    revision: u64,
}

impl Game {
    pub fn new(turns_count: u32) -> Result<Self, GameError> {
        Self::with_policy(turns_count, DuplicatePlayerPolicy::default())
    }

    pub fn with_policy(
        turns_count: u32,
        duplicate_players: DuplicatePlayerPolicy,
    ) -> Result<Self, GameError> {
        if turns_count == 0 {
            return Err(GameError::PreconditionNotMet(
                "turns count must be greater than 0".to_string(),
            ));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            status: GameStatus::WaitingToStart,
            turns_count,
            current_turn_index: 0,
            players: Vec::with_capacity(MAX_PLAYERS),
            duplicate_players,
            revision: 0,
        })
    }

    /// Rebuild a game from its stored parts.
    pub fn restore(snapshot: GameSnapshot) -> Result<Self, GameError> {
        let game = Self {
            id: snapshot.id,
            status: snapshot.status,
            turns_count: snapshot.turns_count,
            current_turn_index: snapshot.current_turn_index,
            players: snapshot.players,
            duplicate_players: snapshot.duplicate_players,
            revision: snapshot.revision,
        };
        game.check_invariants()?;
        Ok(game)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn turns_count(&self) -> u32 {
        self.turns_count
    }

    pub fn current_turn_index(&self) -> u32 {
        self.current_turn_index
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, user_id: Uuid) -> Option<&Player> {
        self.players.iter().find(|p| p.user_id == user_id)
    }

    pub fn duplicate_players(&self) -> DuplicatePlayerPolicy {
        self.duplicate_players
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Called by repositories after a successful save.
    pub fn mark_saved(&mut self) {
        self.revision += 1;
    }

    pub fn add_player(&mut self, user: &UserModel) -> Result<(), GameError> {
        let seats_filled = self.players.len() + 1 == MAX_PLAYERS;
        let step = self
            .status
            .apply(Transition::AdmitPlayer { seats_filled })?;

        if self.duplicate_players == DuplicatePlayerPolicy::Reject && self.player(user.id).is_some()
        {
            return Err(GameError::DuplicatePlayer { user_id: user.id });
        }

        self.players.push(Player::new(user.id, user.login.clone()));
        self.enter(step);
        Ok(())
    }

    pub fn submit_decision(&mut self, user_id: Uuid, decision: Decision) -> Result<(), GameError> {
        let step = self.status.apply(Transition::SubmitDecision)?;

        // The user id has to identify exactly one seat.
        let mut seats = self.players.iter_mut().filter(|p| p.user_id == user_id);
        let player = match (seats.next(), seats.next()) {
            (Some(player), None) => player,
            _ => return Err(GameError::PlayerNotFound { user_id }),
        };

        if player.decision.is_submitted() {
            return Err(GameError::DecisionAlreadySubmitted { user_id });
        }

        player.decision = DecisionSlot::Submitted(decision);
        self.enter(step);
        Ok(())
    }

    pub fn all_decisions_submitted(&self) -> bool {
        self.players.iter().all(|p| p.decision.is_submitted())
    }

    pub fn resolve_turn(&mut self) -> Result<TurnResult, GameError> {
        // current_turn_index <= turns_count, so this cannot underflow
        let last_turn = self.turns_count - self.current_turn_index == 1;
        let step = self.status.apply(Transition::ResolveTurn { last_turn })?;

        if self.players.len() != MAX_PLAYERS {
            return Err(GameError::PreconditionNotMet(format!(
                "a turn needs exactly {} players, game has {}",
                MAX_PLAYERS,
                self.players.len()
            )));
        }

        let (first, second) = match (self.players[0].decision, self.players[1].decision) {
            (DecisionSlot::Submitted(first), DecisionSlot::Submitted(second)) => (first, second),
            _ => {
                return Err(GameError::PreconditionNotMet(
                    "not all players have submitted a decision".to_string(),
                ))
            }
        };

        let winner = if first.beats(second) {
            Some(0)
        } else if second.beats(first) {
            Some(1)
        } else {
            None
        };

        let outcome = match winner {
            Some(seat) => {
                let player = &mut self.players[seat];
                player.score += 1;
                TurnOutcome::Winner(player.user_id)
            }
            None => TurnOutcome::Draw,
        };

        let result = TurnResult {
            turn_index: self.current_turn_index,
            outcome,
        };

        for player in &mut self.players {
            player.decision = DecisionSlot::Empty;
        }
        self.current_turn_index += 1;
        self.enter(step);

        Ok(result)
    }

    /// Cancels a game that has not finished. Returns false if the game was already terminal.
    pub fn cancel(&mut self) -> bool {
        match self.status.apply(Transition::Cancel) {
            Ok(step @ Step::Move(_)) => {
                for player in &mut self.players {
                    player.decision = DecisionSlot::Empty;
                }
                self.enter(step);
                true
            }
            _ => false,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_terminal()
    }

    /// The player with the strictly highest score of a finished game.
    pub fn leader(&self) -> Option<&Player> {
        if self.status != GameStatus::Finished {
            return None;
        }

        let best = self.players.iter().map(|p| p.score).max()?;
        let mut leaders = self.players.iter().filter(|p| p.score == best);
        match (leaders.next(), leaders.next()) {
            (Some(leader), None) => Some(leader),
            _ => None,
        }
    }

    pub fn check_invariants(&self) -> Result<(), GameError> {
        let corrupt = |msg: String| Err(GameError::CorruptState(msg));
        let player_count = self.players.len();

        if self.turns_count == 0 {
            return corrupt("turns count is 0".to_string());
        }
        if player_count > MAX_PLAYERS {
            return corrupt(format!("{} players seated", player_count));
        }
        if self.current_turn_index > self.turns_count {
            return corrupt(format!(
                "turn index {} is past turns count {}",
                self.current_turn_index, self.turns_count
            ));
        }
        if (self.current_turn_index == self.turns_count) != (self.status == GameStatus::Finished) {
            return corrupt(format!(
                "status {} disagrees with turn {} of {}",
                self.status, self.current_turn_index, self.turns_count
            ));
        }

        match self.status {
            GameStatus::WaitingToStart if player_count == MAX_PLAYERS => {
                return corrupt("waiting to start with every seat taken".to_string());
            }
            GameStatus::WaitingToStart if self.current_turn_index != 0 => {
                return corrupt("waiting to start after turns were played".to_string());
            }
            GameStatus::Playing | GameStatus::Finished if player_count != MAX_PLAYERS => {
                return corrupt(format!("{} with {} players", self.status, player_count));
            }
            _ => {}
        }

        if self.status != GameStatus::Playing && self.players.iter().any(|p| p.decision.is_submitted())
        {
            return corrupt(format!("pending decision while {}", self.status));
        }

        Ok(())
    }

    fn enter(&mut self, step: Step) {
        if let Step::Move(next) = step {
            self.status = next;
        }
        debug_assert!(
            self.check_invariants().is_ok(),
            "{:?}",
            self.check_invariants()
        );
    }
}

impl TryFrom<GameSnapshot> for Game {
    type Error = GameError;

    fn try_from(snapshot: GameSnapshot) -> Result<Self, Self::Error> {
        Game::restore(snapshot)
    }
}

impl From<Game> for GameSnapshot {
    fn from(game: Game) -> Self {
        Self {
            id: game.id,
            status: game.status,
            turns_count: game.turns_count,
            current_turn_index: game.current_turn_index,
            players: game.players,
            duplicate_players: game.duplicate_players,
            revision: game.revision,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn user(login: &str) -> UserModel {
        UserModel::new(login.to_string())
    }

    fn started_game(turns_count: u32) -> (Game, UserModel, UserModel) {
        let alice = user("alice");
        let bob = user("bob");
        let mut game = Game::new(turns_count).unwrap();
        game.add_player(&alice).unwrap();
        game.add_player(&bob).unwrap();
        (game, alice, bob)
    }

    fn play_turn(
        game: &mut Game,
        first: (&UserModel, Decision),
        second: (&UserModel, Decision),
    ) -> TurnResult {
        game.submit_decision(first.0.id, first.1).unwrap();
        game.submit_decision(second.0.id, second.1).unwrap();
        game.resolve_turn().unwrap()
    }

    #[rstest]
    #[case(1)]
    #[case(3)]
    #[case(100)]
    fn test_new_game(#[case] turns_count: u32) {
        let game = Game::new(turns_count).unwrap();
        assert_eq!(game.status(), GameStatus::WaitingToStart);
        assert_eq!(game.current_turn_index(), 0);
        assert_eq!(game.turns_count(), turns_count);
        assert!(game.players().is_empty());
        assert!(!game.is_finished());
    }

    #[test]
    fn test_new_game_rejects_zero_turns() {
        assert!(matches!(
            Game::new(0),
            Err(GameError::PreconditionNotMet(_))
        ));
    }

    #[test]
    fn test_games_get_distinct_ids() {
        let a = Game::new(1).unwrap();
        let b = Game::new(1).unwrap();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_second_player_starts_game() {
        let alice = user("alice");
        let mut game = Game::new(3).unwrap();

        game.add_player(&alice).unwrap();
        assert_eq!(game.status(), GameStatus::WaitingToStart);
        assert_eq!(game.players().len(), 1);

        game.add_player(&user("bob")).unwrap();
        assert_eq!(game.status(), GameStatus::Playing);

        let first = &game.players()[0];
        assert_eq!(first.user_id(), alice.id);
        assert_eq!(first.login(), "alice");
        assert_eq!(first.score(), 0);
        assert_eq!(first.decision(), DecisionSlot::Empty);
        assert_eq!(game.players()[1].login(), "bob");
    }

    #[test]
    fn test_third_player_rejected() {
        let (mut game, _, _) = started_game(3);

        let result = game.add_player(&user("carol"));
        assert_eq!(
            result,
            Err(GameError::InvalidState {
                status: GameStatus::Playing,
                operation: "add_player",
            })
        );
        assert_eq!(game.players().len(), 2);
    }

    #[test]
    fn test_duplicate_player_allowed_by_default() {
        let alice = user("alice");
        let mut game = Game::new(1).unwrap();
        game.add_player(&alice).unwrap();
        game.add_player(&alice).unwrap();

        assert_eq!(game.status(), GameStatus::Playing);
        // Both seats belong to alice, so her id no longer identifies a single seat.
        assert_eq!(
            game.submit_decision(alice.id, Decision::Rock),
            Err(GameError::PlayerNotFound { user_id: alice.id })
        );
    }

    #[test]
    fn test_duplicate_player_rejected_by_policy() {
        let alice = user("alice");
        let mut game = Game::with_policy(1, DuplicatePlayerPolicy::Reject).unwrap();
        game.add_player(&alice).unwrap();

        assert_eq!(
            game.add_player(&alice),
            Err(GameError::DuplicatePlayer { user_id: alice.id })
        );
        assert_eq!(game.players().len(), 1);
        assert_eq!(game.status(), GameStatus::WaitingToStart);
    }

    #[test]
    fn test_submit_decision() {
        let (mut game, alice, bob) = started_game(3);

        game.submit_decision(alice.id, Decision::Paper).unwrap();

        assert_eq!(
            game.player(alice.id).unwrap().decision(),
            DecisionSlot::Submitted(Decision::Paper)
        );
        assert_eq!(game.player(bob.id).unwrap().decision(), DecisionSlot::Empty);
        assert!(!game.all_decisions_submitted());

        game.submit_decision(bob.id, Decision::Rock).unwrap();
        assert!(game.all_decisions_submitted());
        // Submitting never resolves the turn on its own.
        assert_eq!(game.current_turn_index(), 0);
    }

    #[test]
    fn test_submit_decision_twice_rejected() {
        let (mut game, alice, _) = started_game(3);

        game.submit_decision(alice.id, Decision::Rock).unwrap();
        assert_eq!(
            game.submit_decision(alice.id, Decision::Paper),
            Err(GameError::DecisionAlreadySubmitted { user_id: alice.id })
        );
        // The first submission stands.
        assert_eq!(
            game.player(alice.id).unwrap().decision(),
            DecisionSlot::Submitted(Decision::Rock)
        );
    }

    #[test]
    fn test_submit_decision_unknown_player() {
        let (mut game, _, _) = started_game(3);
        let stranger = Uuid::new_v4();

        assert_eq!(
            game.submit_decision(stranger, Decision::Rock),
            Err(GameError::PlayerNotFound { user_id: stranger })
        );
    }

    #[rstest]
    #[case(GameStatus::WaitingToStart)]
    #[case(GameStatus::Canceled)]
    fn test_invalid_state_takes_precedence_over_unknown_player(#[case] status: GameStatus) {
        let mut game = Game::new(3).unwrap();
        if status == GameStatus::Canceled {
            game.cancel();
        }
        let stranger = Uuid::new_v4();

        assert_eq!(
            game.submit_decision(stranger, Decision::Rock),
            Err(GameError::InvalidState {
                status,
                operation: "submit_decision",
            })
        );
    }

    #[rstest]
    #[case(Decision::Rock, Decision::Scissors, Some(0))]
    #[case(Decision::Scissors, Decision::Rock, Some(1))]
    #[case(Decision::Paper, Decision::Rock, Some(0))]
    #[case(Decision::Paper, Decision::Scissors, Some(1))]
    #[case(Decision::Rock, Decision::Rock, None)]
    #[case(Decision::Paper, Decision::Paper, None)]
    fn test_resolve_turn(
        #[case] first: Decision,
        #[case] second: Decision,
        #[case] winning_seat: Option<usize>,
    ) {
        let (mut game, alice, bob) = started_game(3);

        let result = play_turn(&mut game, (&alice, first), (&bob, second));

        assert_eq!(result.turn_index, 0);
        let seats = [&alice, &bob];
        match winning_seat {
            Some(seat) => {
                assert_eq!(result.outcome, TurnOutcome::Winner(seats[seat].id));
                assert_eq!(result.winner_id(), Some(seats[seat].id));
                assert_eq!(game.players()[seat].score(), 1);
                assert_eq!(game.players()[1 - seat].score(), 0);
            }
            None => {
                assert_eq!(result.outcome, TurnOutcome::Draw);
                assert_eq!(result.winner_id(), None);
                assert!(game.players().iter().all(|p| p.score() == 0));
            }
        }

        assert_eq!(game.current_turn_index(), 1);
        assert!(game
            .players()
            .iter()
            .all(|p| p.decision() == DecisionSlot::Empty));
        assert_eq!(game.status(), GameStatus::Playing);
    }

    #[test]
    fn test_resolve_turn_requires_all_decisions() {
        let (mut game, alice, _) = started_game(3);

        assert!(matches!(
            game.resolve_turn(),
            Err(GameError::PreconditionNotMet(_))
        ));

        game.submit_decision(alice.id, Decision::Rock).unwrap();
        assert!(matches!(
            game.resolve_turn(),
            Err(GameError::PreconditionNotMet(_))
        ));
        assert_eq!(game.current_turn_index(), 0);
    }

    #[test]
    fn test_resolve_turn_not_repeatable_without_new_decisions() {
        let (mut game, alice, bob) = started_game(3);
        play_turn(&mut game, (&alice, Decision::Rock), (&bob, Decision::Paper));

        assert!(matches!(
            game.resolve_turn(),
            Err(GameError::PreconditionNotMet(_))
        ));
        assert_eq!(game.current_turn_index(), 1);
    }

    #[test]
    fn test_resolve_turn_before_start() {
        let mut game = Game::new(3).unwrap();
        game.add_player(&user("alice")).unwrap();

        assert_eq!(
            game.resolve_turn(),
            Err(GameError::InvalidState {
                status: GameStatus::WaitingToStart,
                operation: "resolve_turn",
            })
        );
    }

    #[test]
    fn test_game_finishes_after_last_turn() {
        let (mut game, alice, bob) = started_game(3);

        let first = play_turn(&mut game, (&alice, Decision::Rock), (&bob, Decision::Scissors));
        let second = play_turn(&mut game, (&alice, Decision::Rock), (&bob, Decision::Rock));
        assert_eq!(game.status(), GameStatus::Playing);
        let third = play_turn(&mut game, (&alice, Decision::Scissors), (&bob, Decision::Rock));

        assert_eq!(first.turn_index, 0);
        assert_eq!(second.turn_index, 1);
        assert_eq!(third.turn_index, 2);
        assert_eq!(game.status(), GameStatus::Finished);
        assert_eq!(game.current_turn_index(), 3);
        assert!(game.is_finished());
        assert_eq!(game.leader(), None); // 1 - 1

        assert!(!game.cancel());
        assert_eq!(game.status(), GameStatus::Finished);

        assert!(matches!(
            game.submit_decision(alice.id, Decision::Rock),
            Err(GameError::InvalidState { .. })
        ));
    }

    #[test]
    fn test_leader_of_finished_game() {
        let (mut game, alice, bob) = started_game(1);
        assert_eq!(game.leader(), None);

        play_turn(&mut game, (&alice, Decision::Paper), (&bob, Decision::Rock));
        assert_eq!(game.leader().map(|p| p.user_id()), Some(alice.id));
    }

    #[test]
    fn test_cancel_waiting_game() {
        let mut game = Game::new(3).unwrap();

        assert!(game.cancel());
        assert_eq!(game.status(), GameStatus::Canceled);
        assert!(game.is_finished());

        // Canceling twice is a no-op.
        assert!(!game.cancel());
        assert_eq!(game.status(), GameStatus::Canceled);

        assert!(matches!(
            game.add_player(&user("alice")),
            Err(GameError::InvalidState { .. })
        ));
    }

    #[test]
    fn test_cancel_playing_game_drops_pending_decisions() {
        let (mut game, alice, _) = started_game(3);
        game.submit_decision(alice.id, Decision::Rock).unwrap();

        assert!(game.cancel());
        assert_eq!(game.status(), GameStatus::Canceled);
        assert!(game.is_finished());
        assert!(game
            .players()
            .iter()
            .all(|p| p.decision() == DecisionSlot::Empty));
        assert!(game.check_invariants().is_ok());
    }

    #[test]
    fn test_single_turn_scenario() {
        let alice = user("alice");
        let bob = user("bob");
        let mut game = Game::new(1).unwrap();

        game.add_player(&alice).unwrap();
        game.add_player(&bob).unwrap();
        assert_eq!(game.status(), GameStatus::Playing);

        game.submit_decision(alice.id, Decision::Rock).unwrap();
        game.submit_decision(bob.id, Decision::Scissors).unwrap();
        let result = game.resolve_turn().unwrap();

        assert_eq!(
            result,
            TurnResult {
                turn_index: 0,
                outcome: TurnOutcome::Winner(alice.id),
            }
        );
        assert_eq!(game.status(), GameStatus::Finished);
    }

    #[test]
    fn test_snapshot_round_trip() {
        let (mut game, alice, _) = started_game(2);
        game.submit_decision(alice.id, Decision::Scissors).unwrap();

        let json = serde_json::to_string(&game).unwrap();
        let restored: Game = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, game);
    }

    #[rstest]
    #[case(GameStatus::Playing, 0, 1)] // playing with one player
    #[case(GameStatus::Finished, 1, 2)] // finished before the last turn
    #[case(GameStatus::Playing, 3, 2)] // every turn played but still playing
    #[case(GameStatus::WaitingToStart, 0, 2)] // waiting with every seat taken
    fn test_restore_rejects_corrupt_snapshot(
        #[case] status: GameStatus,
        #[case] current_turn_index: u32,
        #[case] player_count: usize,
    ) {
        let players = (0..player_count)
            .map(|i| Player::new(Uuid::new_v4(), format!("player-{}", i)))
            .collect();
        let snapshot = GameSnapshot {
            id: Uuid::new_v4(),
            status,
            turns_count: 3,
            current_turn_index,
            players,
            duplicate_players: DuplicatePlayerPolicy::Allow,
            revision: 0,
        };

        assert!(matches!(
            Game::restore(snapshot),
            Err(GameError::CorruptState(_))
        ));
    }

    #[test]
    fn test_restore_rejects_pending_decision_outside_play() {
        let (mut game, alice, _) = started_game(2);
        game.submit_decision(alice.id, Decision::Rock).unwrap();

        let mut snapshot = GameSnapshot::from(game);
        snapshot.status = GameStatus::Canceled;

        assert!(matches!(
            Game::restore(snapshot),
            Err(GameError::CorruptState(_))
        ));
    }

    #[test]
    fn test_resolve_turn_on_finished_game_at_max_turns() {
        let (game, _, _) = started_game(1);
        let mut snapshot = GameSnapshot::from(game);
        snapshot.status = GameStatus::Finished;
        snapshot.turns_count = u32::MAX;
        snapshot.current_turn_index = u32::MAX;
        let mut game = Game::restore(snapshot).unwrap();

        assert_eq!(
            game.resolve_turn(),
            Err(GameError::InvalidState {
                status: GameStatus::Finished,
                operation: "resolve_turn",
            })
        );
        assert_eq!(game.current_turn_index(), u32::MAX);
    }

    #[test]
    fn test_mark_saved_bumps_revision() {
        let mut game = Game::new(1).unwrap();
        assert_eq!(game.revision(), 0);
        game.mark_saved();
        assert_eq!(game.revision(), 1);
    }
}
