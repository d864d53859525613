//! Integration tests for the turn orchestrator

use std::time::Duration;

use trilha_core::{Action, GameMode, GameState, HeuristicAi, MoveError, Phase, Player, Point};
use trilha_session::{DelayRange, Session, SessionConfig, Snapshot, SubmitError};

fn slow_config(think_ms: u64) -> SessionConfig {
    SessionConfig {
        think_delay: DelayRange::new(think_ms, think_ms),
        commit_delay: DelayRange::none(),
        ..SessionConfig::instant(GameMode::PlayerVsAi).with_seed(1)
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("trilha_session=debug")
        .with_test_writer()
        .try_init();
}

/// Wait until the human seat may act (or the game is over)
async fn human_turn(session: &Session) -> Snapshot {
    let mut rx = session.subscribe();
    let wait = rx.wait_for(|s| !s.ai_thinking && !s.state.is_computer_turn());
    let snapshot = tokio::time::timeout(Duration::from_secs(5), wait)
        .await
        .expect("computer turn did not finish")
        .expect("session dropped")
        .clone();
    snapshot
}

#[test]
fn test_pvp_without_runtime() {
    let session = Session::new(SessionConfig::instant(GameMode::PlayerVsPlayer));
    let state = session.submit_point_selection(0).unwrap();
    assert_eq!(state.current_player(), Player::Two);

    let err = session.submit_point_selection(0).unwrap_err();
    assert_eq!(err, SubmitError::Rule(MoveError::OccupiedDestination(Point::new(0).unwrap())));
    assert!(session.state().last_error().is_some());
    assert_eq!(session.state().pieces(Player::Two).to_place, 9);
    assert_eq!(session.status_text(), "Movimento inválido. Posição ocupada.");
}

#[test]
fn test_invalid_index_rejected() {
    let session = Session::new(SessionConfig::instant(GameMode::PlayerVsPlayer));
    let err = session.submit_point_selection(42).unwrap_err();
    assert_eq!(err, SubmitError::Rule(MoveError::InvalidPoint(42)));
    assert_eq!(session.state().board(), GameState::new(GameMode::PlayerVsPlayer).board());
}

#[tokio::test]
async fn test_ai_replies_to_placement() {
    let session = Session::new(SessionConfig::instant(GameMode::PlayerVsAi).with_seed(1));
    session.submit_point_selection(0).unwrap();

    let snapshot = human_turn(&session).await;
    assert_eq!(snapshot.state.current_player(), Player::One);
    assert_eq!(snapshot.state.pieces(Player::Two).on_board, 1);
    assert_eq!(snapshot.state.pieces(Player::Two).to_place, 8);
    assert!(!session.is_ai_thinking());
}

#[tokio::test]
async fn test_human_blocked_while_ai_thinks() {
    let session = Session::new(slow_config(200));
    session.submit_point_selection(0).unwrap();

    assert!(session.is_ai_thinking());
    assert!(session.snapshot().ai_thinking);
    assert_eq!(session.submit_point_selection(1), Err(SubmitError::AiThinking));
    assert_eq!(session.status_text(), "I.A. está pensando...");

    let snapshot = human_turn(&session).await;
    assert_eq!(snapshot.state.pieces(Player::Two).on_board, 1);
}

#[tokio::test]
async fn test_restart_discards_pending_ai_turn() {
    let session = Session::new(slow_config(100));
    session.submit_point_selection(0).unwrap();
    assert!(session.is_ai_thinking());

    session.restart_game();
    assert!(!session.is_ai_thinking());

    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(session.state(), GameState::new(GameMode::PlayerVsAi));
    assert!(!session.is_ai_thinking());
}

#[tokio::test]
async fn test_restart_during_commit_delay() {
    let config = SessionConfig {
        commit_delay: DelayRange::new(300, 300),
        ..SessionConfig::instant(GameMode::PlayerVsAi).with_seed(3)
    };
    let session = Session::new(config);
    let mut human = HeuristicAi::with_seed(11);
    let mut rx = session.subscribe();

    // Play until the computer has picked a piece and waits to move it
    loop {
        let snapshot = tokio::time::timeout(
            Duration::from_secs(5),
            rx.wait_for(|s| {
                let picked = s.state.is_computer_turn() && s.state.selected().is_some();
                picked || s.state.is_over() || (!s.ai_thinking && !s.state.is_computer_turn())
            }),
        )
        .await
        .expect("session stalled")
        .expect("session dropped")
        .clone();

        let state = snapshot.state;
        assert!(!state.is_over(), "game ended before the computer moved a piece");
        if state.is_computer_turn() {
            assert!(snapshot.ai_thinking);
            break;
        }

        if state.phase() == Phase::RemovingPiece {
            let point = human.choose_removal(&state).expect("removal available");
            session.submit_point_selection(point.index()).unwrap();
            continue;
        }
        match human.choose_action(&state).expect("action available") {
            Action::Place(point) => {
                session.submit_point_selection(point.index()).unwrap();
            }
            Action::Move { from, to } => {
                session.submit_point_selection(from.index()).unwrap();
                session.submit_point_selection(to.index()).unwrap();
            }
        }
    }

    session.restart_game();
    tokio::time::sleep(Duration::from_millis(600)).await;

    assert_eq!(session.state(), GameState::new(GameMode::PlayerVsAi));
    assert!(!session.is_ai_thinking());
}

#[tokio::test]
async fn test_new_game_while_computer_pending_moves_once() {
    let session = Session::new(slow_config(100));
    session.submit_point_selection(0).unwrap();
    assert!(session.is_ai_thinking());

    // The first computer turn is stale from here on
    session.start_game(GameMode::PlayerVsAi);
    session.restart_game();
    assert!(!session.is_ai_thinking());

    session.submit_point_selection(5).unwrap();
    assert!(session.is_ai_thinking());

    tokio::time::sleep(Duration::from_millis(400)).await;
    let state = session.state();
    assert_eq!(state.pieces(Player::One).on_board, 1);
    assert_eq!(state.pieces(Player::Two).on_board, 1);
    assert_eq!(state.pieces(Player::Two).to_place, 8);
    assert_eq!(state.current_player(), Player::One);
    assert_eq!(state.turn(), 2);
    assert!(!session.is_ai_thinking());
}

#[tokio::test]
async fn test_start_game_switches_mode() {
    let session = Session::new(slow_config(100));
    session.submit_point_selection(0).unwrap();

    session.start_game(GameMode::PlayerVsPlayer);
    tokio::time::sleep(Duration::from_millis(300)).await;

    let state = session.state();
    assert_eq!(state.mode(), GameMode::PlayerVsPlayer);
    assert_eq!(state.board().count(Player::One), 0);
    assert_eq!(session.config().mode, GameMode::PlayerVsPlayer);

    // Both seats are human now
    session.submit_point_selection(0).unwrap();
    session.submit_point_selection(1).unwrap();
    assert_eq!(session.state().current_player(), Player::One);
}

#[tokio::test]
async fn test_full_game_against_ai() {
    init_tracing();
    let session = Session::new(SessionConfig::instant(GameMode::PlayerVsAi).with_seed(3));
    let mut human = HeuristicAi::with_seed(11);

    loop {
        let snapshot = human_turn(&session).await;
        let state = snapshot.state;
        check_counts(&state);
        if state.is_over() || state.turn() >= 200 {
            break;
        }

        if state.phase() == Phase::RemovingPiece {
            let point = human.choose_removal(&state).expect("removal available");
            session.submit_point_selection(point.index()).unwrap();
            continue;
        }

        match human.choose_action(&state).expect("action available") {
            Action::Place(point) => {
                session.submit_point_selection(point.index()).unwrap();
            }
            Action::Move { from, to } => {
                session.submit_point_selection(from.index()).unwrap();
                session.submit_point_selection(to.index()).unwrap();
            }
        }
    }

    let final_state = session.state();
    assert!(final_state.is_over() || final_state.turn() >= 200);
    if final_state.is_over() {
        assert!(final_state.winner().is_some());
    }
}

fn check_counts(state: &GameState) {
    for player in [Player::One, Player::Two] {
        let counts = state.pieces(player);
        assert!(counts.on_board + counts.to_place <= 9);
        assert_eq!(state.board().count(player), counts.on_board as usize);
    }
}
