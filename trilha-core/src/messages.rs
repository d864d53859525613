//! Status line and rules text
//!
//! Everything here is a pure function of a `GameState`; the engine keeps no
//! display state of its own.

use crate::error::MoveError;
use crate::game::{GameMode, GameState, Phase, AI_PLAYER};
use crate::position::Player;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Locale {
    #[default]
    PtBr,
    En,
}

struct Catalog {
    player_one: &'static str,
    player_two: &'static str,
    ai_name: &'static str,
    turn: &'static str,
    place_piece: &'static str,
    move_piece: &'static str,
    select_destination: &'static str,
    fly_phase: &'static str,
    remove_piece: &'static str,
    wins: &'static str,
    game_over: &'static str,
    ai_thinking: &'static str,
    invalid_move: &'static str,
    occupied: &'static str,
    invalid_destination: &'static str,
    select_own_piece: &'static str,
    select_opponent_piece: &'static str,
    protected_piece: &'static str,
    invalid_point: &'static str,
    empty_hand: &'static str,
    wrong_phase: &'static str,
    in_hand: &'static str,
    on_board: &'static str,
}

const PT_BR: Catalog = Catalog {
    player_one: "Jogador 1",
    player_two: "Jogador 2",
    ai_name: "I.A.",
    turn: "Vez de",
    place_piece: "Posicione sua peça.",
    move_piece: "Mova sua peça.",
    select_destination: "Selecione um local vazio adjacente.",
    fly_phase: "Você tem 3 peças, pode voar para qualquer local vazio!",
    remove_piece: "remova uma peça do oponente.",
    wins: "venceu!",
    game_over: "Fim de Jogo!",
    ai_thinking: "I.A. está pensando...",
    invalid_move: "Movimento inválido.",
    occupied: "Posição ocupada.",
    invalid_destination: "Destino inválido.",
    select_own_piece: "Selecione sua peça.",
    select_opponent_piece: "Selecione uma peça do oponente.",
    protected_piece: "Não pode remover peça de uma trilha, a menos que todas as peças do oponente estejam em trilhas.",
    invalid_point: "Posição inexistente.",
    empty_hand: "Você não tem mais peças para colocar.",
    wrong_phase: "Ação não permitida nesta fase.",
    in_hand: "peças na mão",
    on_board: "no tabuleiro",
};

const EN: Catalog = Catalog {
    player_one: "Player 1",
    player_two: "Player 2",
    ai_name: "AI",
    turn: "Turn:",
    place_piece: "Place a piece.",
    move_piece: "Move a piece.",
    select_destination: "Select an adjacent empty point.",
    fly_phase: "You have 3 pieces, you may fly to any empty point!",
    remove_piece: "remove one of your opponent's pieces.",
    wins: "wins!",
    game_over: "Game over!",
    ai_thinking: "AI is thinking...",
    invalid_move: "Invalid move.",
    occupied: "Point occupied.",
    invalid_destination: "Invalid destination.",
    select_own_piece: "Select one of your pieces.",
    select_opponent_piece: "Select an opponent piece.",
    protected_piece: "A piece in a mill cannot be removed unless all of the opponent's pieces are in mills.",
    invalid_point: "No such point.",
    empty_hand: "You have no pieces left to place.",
    wrong_phase: "Not allowed in this phase.",
    in_hand: "pieces in hand",
    on_board: "on the board",
};

fn catalog(locale: Locale) -> &'static Catalog {
    match locale {
        Locale::PtBr => &PT_BR,
        Locale::En => &EN,
    }
}

/// Display name of a seat; the computer seat gets its own name in PvA
pub fn player_name(player: Player, mode: GameMode, locale: Locale) -> &'static str {
    let c = catalog(locale);
    match player {
        _ if mode == GameMode::PlayerVsAi && player == AI_PLAYER => c.ai_name,
        Player::One => c.player_one,
        Player::Two => c.player_two,
    }
}

/// Text for a rejected selection
pub fn error_text(error: MoveError, locale: Locale) -> String {
    let c = catalog(locale);
    let detail = match error {
        MoveError::InvalidPoint(_) => c.invalid_point,
        MoveError::OccupiedDestination(_) => c.occupied,
        MoveError::NonAdjacentMove { .. } => c.invalid_destination,
        MoveError::WrongPieceOwner { .. } => c.select_own_piece,
        MoveError::ProtectedMillRemoval(_) => return c.protected_piece.to_string(),
        MoveError::OutOfPhaseAction(Phase::GameOver) => return c.game_over.to_string(),
        MoveError::OutOfPhaseAction(Phase::Placing) => c.empty_hand,
        MoveError::OutOfPhaseAction(_) => c.wrong_phase,
    };
    format!("{} {}", c.invalid_move, detail)
}

/// One line per seat: pieces still to place and pieces on the board
pub fn piece_summary(state: &GameState, player: Player, locale: Locale) -> String {
    let c = catalog(locale);
    let counts = state.pieces(player);
    format!(
        "{}: {} {}, {} {}",
        player_name(player, state.mode(), locale),
        counts.to_place,
        c.in_hand,
        counts.on_board,
        c.on_board
    )
}

/// Status line for a state.
///
/// `ai_thinking` is the orchestrator's latch; a pending rejection takes
/// precedence over the regular prompt.
pub fn status_text(state: &GameState, locale: Locale, ai_thinking: bool) -> String {
    let c = catalog(locale);
    let mode = state.mode();
    let mover = state.current_player();
    let name = player_name(mover, mode, locale);

    if let Some(winner) = state.winner() {
        return format!("{} {} {}", player_name(winner, mode, locale), c.wins, c.game_over);
    }

    if let Some(error) = state.last_error() {
        return rejection_text(state, error, locale);
    }

    match state.phase() {
        Phase::RemovingPiece => format!("TRILHA! {}, {}", name, c.remove_piece),
        _ if ai_thinking || state.is_computer_turn() => c.ai_thinking.to_string(),
        Phase::Placing => format!("{} {} {}", c.turn, name, c.place_piece),
        Phase::Moving | Phase::Flying if state.selected().is_some() => {
            if state.phase() == Phase::Flying {
                format!("{} {} {}", c.turn, name, c.fly_phase)
            } else {
                c.select_destination.to_string()
            }
        }
        Phase::Flying => format!("{} {} {}", c.turn, name, c.fly_phase),
        Phase::Moving => format!("{} {} {}", c.turn, name, c.move_piece),
        Phase::GameOver => c.game_over.to_string(),
    }
}

/// Rejection message, worded for the phase the selection was made in
fn rejection_text(state: &GameState, error: MoveError, locale: Locale) -> String {
    let c = catalog(locale);
    match error {
        MoveError::WrongPieceOwner { .. } if state.phase() == Phase::RemovingPiece => {
            format!("{} {}", c.invalid_move, c.select_opponent_piece)
        }
        _ => error_text(error, locale),
    }
}

/// Rules of the game as (title, body) sections
pub fn rules_text(locale: Locale) -> &'static [(&'static str, &'static str)] {
    match locale {
        Locale::PtBr => RULES_PT_BR,
        Locale::En => RULES_EN,
    }
}

const RULES_PT_BR: &[(&str, &str)] = &[
    (
        "Objetivo",
        "Reduzir o número de peças do oponente a duas, ou deixá-lo sem movimentos válidos.",
    ),
    (
        "Preparação",
        "Cada jogador começa com 9 peças. O tabuleiro está inicialmente vazio.",
    ),
    (
        "Fase 1: Colocação",
        "Os jogadores alternam colocando uma peça em qualquer interseção vazia até que as 18 peças estejam no tabuleiro.",
    ),
    (
        "Trilha",
        "Três peças do mesmo jogador alinhadas formam uma trilha. Quem forma uma trilha remove uma peça do oponente, que não pode fazer parte de uma trilha a menos que todas as peças do oponente estejam em trilhas.",
    ),
    (
        "Fase 2: Movimentação",
        "Os jogadores alternam movendo uma peça para um ponto adjacente vazio ao longo de uma linha.",
    ),
    (
        "Fase 3: Voar",
        "Com apenas três peças, o jogador pode mover uma peça para qualquer interseção vazia.",
    ),
    (
        "Fim de Jogo",
        "O jogo termina quando um jogador tem menos de três peças ou não pode fazer um movimento. O adversário vence.",
    ),
];

const RULES_EN: &[(&str, &str)] = &[
    (
        "Goal",
        "Reduce your opponent to two pieces, or leave them without a legal move.",
    ),
    (
        "Setup",
        "Each player starts with 9 pieces. The board starts empty.",
    ),
    (
        "Phase 1: Placing",
        "Players take turns placing a piece on any empty point until all 18 pieces are on the board.",
    ),
    (
        "Mill",
        "Three of a player's pieces on a line form a mill. Forming a mill removes one opponent piece, which may not be part of a mill unless all of the opponent's pieces are in mills.",
    ),
    (
        "Phase 2: Moving",
        "Players take turns moving a piece to an adjacent empty point along a line.",
    ),
    (
        "Phase 3: Flying",
        "A player down to three pieces may move a piece to any empty point.",
    ),
    (
        "Game over",
        "The game ends when a player has fewer than three pieces or cannot move. Their opponent wins.",
    ),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Point;

    #[test]
    fn test_opening_prompt() {
        let state = GameState::new(GameMode::PlayerVsPlayer);
        assert_eq!(
            status_text(&state, Locale::PtBr, false),
            "Vez de Jogador 1 Posicione sua peça."
        );
        assert_eq!(status_text(&state, Locale::En, false), "Turn: Player 1 Place a piece.");
    }

    #[test]
    fn test_ai_thinking() {
        let state = GameState::new(GameMode::PlayerVsAi).select(0);
        assert_eq!(status_text(&state, Locale::PtBr, false), "I.A. está pensando...");
    }

    #[test]
    fn test_removal_prompt() {
        let state = [0, 8, 1, 16, 2]
            .iter()
            .fold(GameState::new(GameMode::PlayerVsPlayer), |s, &i| s.select(i));
        assert_eq!(
            status_text(&state, Locale::PtBr, false),
            "TRILHA! Jogador 1, remova uma peça do oponente."
        );
        let rejected = state.select(0);
        assert_eq!(
            status_text(&rejected, Locale::En, false),
            "Invalid move. Select an opponent piece."
        );
    }

    #[test]
    fn test_occupied_message() {
        let state = GameState::new(GameMode::PlayerVsPlayer).select(0).select(0);
        assert_eq!(
            status_text(&state, Locale::PtBr, false),
            "Movimento inválido. Posição ocupada."
        );
    }

    #[test]
    fn test_winner_announcement() {
        let pts = |v: &[usize]| v.iter().map(|&i| Point::new(i).unwrap()).collect::<Vec<_>>();
        let state = GameState::with_position(
            GameMode::PlayerVsAi,
            &pts(&[0, 1, 2, 4]),
            &pts(&[3, 5, 7, 9]),
            [0, 0],
            Player::One,
        )
        .unwrap();
        assert_eq!(status_text(&state, Locale::PtBr, false), "I.A. venceu! Fim de Jogo!");
    }

    #[test]
    fn test_player_names() {
        assert_eq!(player_name(Player::Two, GameMode::PlayerVsAi, Locale::En), "AI");
        assert_eq!(player_name(Player::Two, GameMode::PlayerVsPlayer, Locale::En), "Player 2");
    }

    #[test]
    fn test_out_of_phase_worded_by_phase() {
        assert_eq!(
            error_text(MoveError::OutOfPhaseAction(Phase::GameOver), Locale::PtBr),
            "Fim de Jogo!"
        );
        assert_eq!(
            error_text(MoveError::OutOfPhaseAction(Phase::Placing), Locale::En),
            "Invalid move. You have no pieces left to place."
        );
        assert_eq!(
            error_text(MoveError::OutOfPhaseAction(Phase::Moving), Locale::En),
            "Invalid move. Not allowed in this phase."
        );
    }

    #[test]
    fn test_piece_summary() {
        let state = GameState::new(GameMode::PlayerVsAi).select(0);
        assert_eq!(
            piece_summary(&state, Player::One, Locale::PtBr),
            "Jogador 1: 8 peças na mão, 1 no tabuleiro"
        );
        assert_eq!(
            piece_summary(&state, Player::Two, Locale::En),
            "AI: 9 pieces in hand, 0 on the board"
        );
    }

    #[test]
    fn test_rules_sections() {
        assert_eq!(rules_text(Locale::PtBr).len(), rules_text(Locale::En).len());
    }
}
