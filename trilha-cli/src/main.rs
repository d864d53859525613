//! Trilha CLI - Command-line interface
//!
//! Commands:
//! - play: Interactive game on the terminal (against the computer or a friend)
//! - selfplay: Pit the heuristic opponent against itself
//! - rules: Print the rules of the game

mod play;
mod render;
mod selfplay;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;
use trilha_core::Locale;

use play::PlayArgs;
use selfplay::SelfplayArgs;

#[derive(Parser)]
#[command(name = "trilha")]
#[command(about = "Trilha (Nine Men's Morris) on the terminal")]
struct Cli {
    /// Random seed for the computer player
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a game on the terminal
    Play(PlayArgs),
    /// Run computer-vs-computer games
    Selfplay(SelfplayArgs),
    /// Print the rules
    Rules {
        #[arg(long, value_enum, default_value = "pt-br")]
        locale: LocaleArg,
    },
}

/// Locale as accepted on the command line
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LocaleArg {
    PtBr,
    En,
}

impl From<LocaleArg> for Locale {
    fn from(arg: LocaleArg) -> Self {
        match arg {
            LocaleArg::PtBr => Locale::PtBr,
            LocaleArg::En => Locale::En,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Interactive play keeps stderr quiet unless RUST_LOG says otherwise
    let default_level = match cli.command {
        Commands::Play(_) => "warn",
        _ => "info",
    };
    init_logging(default_level);

    match cli.command {
        Commands::Play(args) => play::run(args, cli.seed),
        Commands::Selfplay(args) => selfplay::run(args, cli.seed),
        Commands::Rules { locale } => {
            play::print_rules(locale.into());
            Ok(())
        }
    }
}

fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
