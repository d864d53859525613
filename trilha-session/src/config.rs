//! Session configuration
//!
//! Loaded from JSON; any missing field falls back to its default.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};
use trilha_core::{GameMode, Locale};

/// Inclusive millisecond range a delay is drawn from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayRange {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl DelayRange {
    pub const fn new(min_ms: u64, max_ms: u64) -> Self {
        Self { min_ms, max_ms }
    }

    /// No delay at all, for headless play and tests
    pub const fn none() -> Self {
        Self::new(0, 0)
    }

    pub fn sample<R: Rng>(&self, rng: &mut R) -> Duration {
        let (lo, hi) = if self.min_ms <= self.max_ms {
            (self.min_ms, self.max_ms)
        } else {
            (self.max_ms, self.min_ms)
        };
        Duration::from_millis(rng.gen_range(lo..=hi))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Game mode used by `restart_game`
    pub mode: GameMode,
    /// Pause before the computer decides
    pub think_delay: DelayRange,
    /// Pause between picking a piece and moving it
    pub commit_delay: DelayRange,
    /// Seed for the computer player and its delays (None = entropy)
    pub seed: Option<u64>,
    pub locale: Locale,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            mode: GameMode::PlayerVsAi,
            think_delay: DelayRange::new(500, 1300),
            commit_delay: DelayRange::new(200, 700),
            seed: None,
            locale: Locale::PtBr,
        }
    }
}

impl SessionConfig {
    /// Default config with instant AI turns
    pub fn instant(mode: GameMode) -> Self {
        Self {
            mode,
            think_delay: DelayRange::none(),
            commit_delay: DelayRange::none(),
            ..Default::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Load from JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read session config: {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("Invalid session config: {}", path.display()))?;
        Ok(config)
    }

    /// Save to JSON file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
