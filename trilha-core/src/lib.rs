//! Trilha Core - Game engine and AI
//!
//! This crate provides the core game logic for Trilha (Nine Men's Morris):
//! - Board topology (24 points, adjacency, mill lines)
//! - Position model and mill detection
//! - Game state and the phase state machine
//! - Rule-priority heuristic opponent
//! - Status text for front-ends

pub mod board;
pub mod position;
pub mod game;
pub mod error;
pub mod ai;
pub mod messages;

// Re-exports for convenient access
pub use board::{Point, MillLine, ADJACENCY, MILL_LINES, POINT_COUNT};
pub use position::{Board, PieceCount, Player, PIECES_PER_PLAYER, FLYING_THRESHOLD};
pub use game::{Action, GameMode, GameState, Phase, AI_PLAYER};
pub use error::MoveError;
pub use ai::{HeuristicAi, Reason};
pub use messages::{status_text, Locale};
