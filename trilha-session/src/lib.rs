//! Trilha Session - Turn orchestration
//!
//! This crate sits between the engine and a front-end:
//! - Owns the current game state (single writer)
//! - Runs computer turns on tokio timers with a thinking delay
//! - Guards against double submission while the computer is thinking
//! - Broadcasts snapshots for rendering

mod config;
mod session;

pub use config::{DelayRange, SessionConfig};
pub use session::{Session, Snapshot, SubmitError};
