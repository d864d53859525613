//! Play command - interactive game on the terminal
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: build_config(), play_loop()
//! - Level 3: wait_for_human(), handle_command()
//! - Level 4: input parsing and printing

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, ValueEnum};
use tokio::io::{AsyncBufReadExt, BufReader};

use trilha_core::messages::{piece_summary, rules_text};
use trilha_core::{GameMode, GameState, Locale, Player};
use trilha_session::{Session, SessionConfig, Snapshot, SubmitError};

use crate::render::render_board;
use crate::LocaleArg;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct PlayArgs {
    /// Opponent: another human at the same terminal, or the computer
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Session config JSON file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Language of the status line
    #[arg(long, value_enum)]
    pub locale: Option<LocaleArg>,

    /// Computer plays without pauses
    #[arg(long)]
    pub instant: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Pvp,
    Pva,
}

impl From<ModeArg> for GameMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Pvp => GameMode::PlayerVsPlayer,
            ModeArg::Pva => GameMode::PlayerVsAi,
        }
    }
}

/// One line of player input
#[derive(Clone, Debug, PartialEq, Eq)]
enum Command {
    Select(usize),
    Restart,
    NewGame(GameMode),
    Rules,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run play command
///
/// 1. Build the session config (file, then command-line overrides)
/// 2. Run the input loop on a tokio runtime
pub fn run(args: PlayArgs, seed: Option<u64>) -> Result<()> {
    let config = build_config(&args, seed)?;

    tracing::info!("Starting interactive game: {:?}", config.mode);

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(play_loop(config))
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn build_config(args: &PlayArgs, seed: Option<u64>) -> Result<SessionConfig> {
    let mut config = match &args.config {
        Some(path) => SessionConfig::load(path)?,
        None => SessionConfig::default(),
    };

    if let Some(mode) = args.mode {
        config.mode = mode.into();
    }
    if let Some(locale) = args.locale {
        config.locale = locale.into();
    }
    if args.instant {
        config = SessionConfig {
            seed: config.seed,
            locale: config.locale,
            ..SessionConfig::instant(config.mode)
        };
    }
    if seed.is_some() {
        config.seed = seed;
    }

    Ok(config)
}

async fn play_loop(config: SessionConfig) -> Result<()> {
    let locale = config.locale;
    let session = Session::new(config);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    print_help(locale);

    loop {
        let snapshot = wait_for_human(&session, locale).await?;
        show(&snapshot, locale);
        if snapshot.state.is_over() {
            println!("{}", game_over_hint(locale));
        }
        prompt()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if !handle_command(&session, parse_command(&line), locale) {
            break;
        }
    }

    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Block until the human seat may act, showing the board while the computer thinks
async fn wait_for_human(session: &Session, locale: Locale) -> Result<Snapshot> {
    let mut rx = session.subscribe();
    let current = rx.borrow_and_update().clone();
    if current.ai_thinking || current.state.is_computer_turn() {
        show(&current, locale);
    }

    let snapshot = rx
        .wait_for(|s| s.state.is_over() || (!s.ai_thinking && !s.state.is_computer_turn()))
        .await?
        .clone();
    Ok(snapshot)
}

/// Apply one command; false ends the loop
fn handle_command(session: &Session, command: Command, locale: Locale) -> bool {
    match command {
        Command::Select(index) => {
            if let Err(err) = session.submit_point_selection(index) {
                tracing::debug!(index, %err, "selection not accepted");
                // Rule violations already show up in the status line
                if !matches!(err, SubmitError::Rule(_)) {
                    println!("{}", err);
                }
            }
        }
        Command::Restart => session.restart_game(),
        Command::NewGame(mode) => session.start_game(mode),
        Command::Rules => print_rules(locale),
        Command::Help => print_help(locale),
        Command::Quit => return false,
        Command::Empty => {}
        Command::Unknown(input) => println!("? {}", input),
    }
    true
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn parse_command(line: &str) -> Command {
    let input = line.trim().to_lowercase();
    match input.as_str() {
        "" => Command::Empty,
        "q" | "quit" | "sair" => Command::Quit,
        "r" | "restart" | "reiniciar" => Command::Restart,
        "pvp" => Command::NewGame(GameMode::PlayerVsPlayer),
        "pva" => Command::NewGame(GameMode::PlayerVsAi),
        "rules" | "regras" => Command::Rules,
        "h" | "help" | "ajuda" | "?" => Command::Help,
        _ => match input.parse::<usize>() {
            Ok(index) => Command::Select(index),
            Err(_) => Command::Unknown(line.trim().to_string()),
        },
    }
}

fn show(snapshot: &Snapshot, locale: Locale) {
    println!();
    println!("{}", render_board(&snapshot.state));
    println!();
    println!("{}", piece_lines(&snapshot.state, locale));
    println!("{}", snapshot.status_text(locale));
}

fn piece_lines(state: &GameState, locale: Locale) -> String {
    [Player::One, Player::Two]
        .iter()
        .map(|&player| piece_summary(state, player, locale))
        .collect::<Vec<_>>()
        .join("\n")
}

fn prompt() -> Result<()> {
    print!("> ");
    std::io::stdout().flush()?;
    Ok(())
}

fn game_over_hint(locale: Locale) -> &'static str {
    match locale {
        Locale::PtBr => "Digite r para jogar novamente ou q para sair.",
        Locale::En => "Type r to play again or q to quit.",
    }
}

fn print_help(locale: Locale) {
    let text = match locale {
        Locale::PtBr => {
            "Digite o número de um ponto (0-23) para colocar, escolher, mover ou remover uma peça.\n\
             Uma peça escolhida é marcada com *; escolha-a de novo para cancelar.\n\
             Comandos: r (reiniciar), pvp / pva (novo jogo), regras, ajuda, q (sair)."
        }
        Locale::En => {
            "Type a point number (0-23) to place, pick, move or remove a piece.\n\
             A picked piece is marked with *; pick it again to cancel.\n\
             Commands: r (restart), pvp / pva (new game), rules, help, q (quit)."
        }
    };
    println!("{}", text);
}

fn rules_page(locale: Locale) -> String {
    rules_text(locale)
        .iter()
        .map(|(title, body)| format!("== {} ==\n{}\n", title, body))
        .collect::<Vec<_>>()
        .join("\n")
}

pub(crate) fn print_rules(locale: Locale) {
    println!("{}", rules_page(locale));
}

#[cfg(test)]
mod tests {
    use super::*;
    use trilha_session::DelayRange;

    fn args() -> PlayArgs {
        PlayArgs {
            mode: None,
            config: None,
            locale: None,
            instant: false,
        }
    }

    #[test]
    fn test_parse_command() {
        assert_eq!(parse_command(" 7 "), Command::Select(7));
        assert_eq!(parse_command("42"), Command::Select(42));
        assert_eq!(parse_command("Q"), Command::Quit);
        assert_eq!(parse_command("r"), Command::Restart);
        assert_eq!(parse_command("pvp"), Command::NewGame(GameMode::PlayerVsPlayer));
        assert_eq!(parse_command(""), Command::Empty);
        assert_eq!(parse_command("-1"), Command::Unknown("-1".to_string()));
    }

    #[test]
    fn test_default_config() {
        let config = build_config(&args(), None).unwrap();
        assert_eq!(config, SessionConfig::default());
    }

    #[test]
    fn test_overrides() {
        let args = PlayArgs {
            mode: Some(ModeArg::Pvp),
            locale: Some(LocaleArg::En),
            instant: true,
            ..args()
        };
        let config = build_config(&args, Some(5)).unwrap();
        assert_eq!(config.mode, GameMode::PlayerVsPlayer);
        assert_eq!(config.locale, Locale::En);
        assert_eq!(config.seed, Some(5));
        assert_eq!(config.think_delay, DelayRange::none());
    }

    #[test]
    fn test_missing_config_file() {
        let args = PlayArgs {
            config: Some(PathBuf::from("/nonexistent/trilha.json")),
            ..args()
        };
        assert!(build_config(&args, None).is_err());
    }

    #[test]
    fn test_piece_lines() {
        let state = GameState::new(GameMode::PlayerVsPlayer).select(0);
        assert_eq!(
            piece_lines(&state, Locale::En),
            "Player 1: 8 pieces in hand, 1 on the board\nPlayer 2: 9 pieces in hand, 0 on the board"
        );
    }

    #[test]
    fn test_rules_page() {
        let page = rules_page(Locale::En);
        for (title, body) in rules_text(Locale::En) {
            assert_eq!(page.matches(&format!("== {} ==", title)).count(), 1);
            assert!(page.contains(body));
        }
        assert!(page.starts_with("== Goal ==\n"));
    }

    #[test]
    fn test_commands_drive_session() {
        let session = Session::new(SessionConfig::instant(GameMode::PlayerVsPlayer));
        assert!(handle_command(&session, Command::Select(3), Locale::En));
        assert_eq!(session.state().board().count(trilha_core::Player::One), 1);
        assert!(handle_command(&session, Command::Restart, Locale::En));
        assert_eq!(session.state().board().count(trilha_core::Player::One), 0);
        assert!(!handle_command(&session, Command::Quit, Locale::En));
    }
}
