//! Turn orchestrator
//!
//! A `Session` owns the current `GameState` and is the single writer for it.
//! Human selections and computer decisions go through the same validated
//! entry point. Computer turns run as tokio tasks that sleep for a cosmetic
//! "thinking" delay, then submit their selections.
//!
//! Each accepted transition bumps a generation counter. A computer task
//! remembers the generation it expects; on wake-up a mismatch (restart,
//! new game) turns the task into a no-op.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tokio::sync::watch;
use trilha_core::{status_text, Action, GameMode, GameState, HeuristicAi, MoveError, Phase};

use crate::config::SessionConfig;

/// Why a human selection was not forwarded to the engine
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error("the computer is thinking")]
    AiThinking,

    #[error("it is the computer's turn")]
    NotYourTurn,

    #[error(transparent)]
    Rule(#[from] MoveError),
}

/// What front-ends render
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub state: GameState,
    pub ai_thinking: bool,
    pub generation: u64,
}

impl Snapshot {
    pub fn status_text(&self, locale: trilha_core::Locale) -> String {
        status_text(&self.state, locale, self.ai_thinking)
    }
}

struct Inner {
    config: SessionConfig,
    state: GameState,
    generation: u64,
    /// Latch: a computer task is scheduled or running
    ai_in_progress: bool,
    ai: HeuristicAi,
    rng: ChaCha8Rng,
}

impl Inner {
    fn snapshot(&self) -> Snapshot {
        Snapshot {
            state: self.state.clone(),
            ai_thinking: self.ai_in_progress,
            generation: self.generation,
        }
    }

    /// Run a selection through the engine, recording rejections in the state
    fn apply(&mut self, index: usize) -> Result<GameState, MoveError> {
        match self.state.try_select(index) {
            Ok(next) => {
                self.state = next;
                self.generation += 1;
                tracing::debug!(
                    index,
                    phase = ?self.state.phase(),
                    player = %self.state.current_player(),
                    generation = self.generation,
                    "selection accepted"
                );
                if let Some(winner) = self.state.winner() {
                    tracing::info!("Game over: player {} wins after {} turns", winner, self.state.turn());
                }
                Ok(self.state.clone())
            }
            Err(err) => {
                self.state = self.state.select(index);
                tracing::debug!(index, %err, "selection rejected");
                Err(err)
            }
        }
    }

    fn reset(&mut self) {
        self.state = GameState::new(self.config.mode);
        self.generation += 1;
        self.ai_in_progress = false;
    }
}

struct Shared {
    inner: Mutex<Inner>,
    updates: watch::Sender<Snapshot>,
}

/// Handle to a running game; clones share the same game
#[derive(Clone)]
pub struct Session {
    shared: Arc<Shared>,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        let (ai, rng) = match config.seed {
            Some(seed) => (HeuristicAi::with_seed(seed), ChaCha8Rng::seed_from_u64(seed)),
            None => (HeuristicAi::new(), ChaCha8Rng::from_entropy()),
        };
        let inner = Inner {
            state: GameState::new(config.mode),
            config,
            generation: 0,
            ai_in_progress: false,
            ai,
            rng,
        };
        let (updates, _) = watch::channel(inner.snapshot());

        Self {
            shared: Arc::new(Shared {
                inner: Mutex::new(inner),
                updates,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.shared.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, inner: &Inner) {
        self.shared.updates.send_replace(inner.snapshot());
    }

    // ========================================================================
    // LIFECYCLE
    // ========================================================================

    /// Start a fresh game in `mode`; it becomes the mode for later restarts
    pub fn start_game(&self, mode: GameMode) {
        {
            let mut inner = self.lock();
            inner.config.mode = mode;
            inner.reset();
            tracing::info!("Starting new game: {:?}", mode);
            self.publish(&inner);
        }
        self.schedule_ai();
    }

    /// Start over in the current mode. A pending computer turn becomes stale.
    pub fn restart_game(&self) {
        {
            let mut inner = self.lock();
            inner.reset();
            tracing::info!("Restarting game: {:?}", inner.config.mode);
            self.publish(&inner);
        }
        self.schedule_ai();
    }

    // ========================================================================
    // INPUT
    // ========================================================================

    /// The only mutating entry point for the human seat(s).
    ///
    /// Must run inside a tokio runtime when the next turn may be the
    /// computer's, since that turn is spawned as a task.
    pub fn submit_point_selection(&self, index: usize) -> Result<GameState, SubmitError> {
        let result = {
            let mut inner = self.lock();
            if inner.state.is_computer_turn() {
                return Err(if inner.ai_in_progress {
                    SubmitError::AiThinking
                } else {
                    SubmitError::NotYourTurn
                });
            }
            let result = inner.apply(index);
            self.publish(&inner);
            result
        };

        let state = result?;
        self.schedule_ai();
        Ok(state)
    }

    // ========================================================================
    // OUTPUT
    // ========================================================================

    pub fn state(&self) -> GameState {
        self.lock().state.clone()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.lock().snapshot()
    }

    pub fn status_text(&self) -> String {
        let inner = self.lock();
        status_text(&inner.state, inner.config.locale, inner.ai_in_progress)
    }

    pub fn is_ai_thinking(&self) -> bool {
        self.lock().ai_in_progress
    }

    pub fn config(&self) -> SessionConfig {
        self.lock().config.clone()
    }

    /// Receiver that sees every published snapshot
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.shared.updates.subscribe()
    }

    // ========================================================================
    // COMPUTER TURNS
    // ========================================================================

    /// Spawn a computer turn if the computer is to act and none is pending
    fn schedule_ai(&self) {
        let (generation, think) = {
            let mut inner = self.lock();
            if inner.ai_in_progress || !inner.state.is_computer_turn() {
                return;
            }
            if tokio::runtime::Handle::try_current().is_err() {
                tracing::warn!("No tokio runtime; computer turn not scheduled");
                return;
            }
            inner.ai_in_progress = true;
            let think_delay = inner.config.think_delay;
            let think = think_delay.sample(&mut inner.rng);
            self.publish(&inner);
            (inner.generation, think)
        };

        tracing::debug!(generation, ?think, "computer turn scheduled");
        tokio::spawn(self.clone().run_ai_turn(generation, think));
    }

    async fn run_ai_turn(self, generation: u64, think: Duration) {
        tokio::time::sleep(think).await;

        let pending = {
            let mut inner = self.lock();
            if inner.generation != generation {
                tracing::debug!(generation, current = inner.generation, "stale computer turn dropped");
                return;
            }
            let pending = self.decide_and_submit(&mut inner);
            if pending.is_none() {
                inner.ai_in_progress = false;
            }
            self.publish(&inner);
            pending
        };

        if let Some((to, generation)) = pending {
            let commit = {
                let mut inner = self.lock();
                let commit_delay = inner.config.commit_delay;
                commit_delay.sample(&mut inner.rng)
            };
            tokio::time::sleep(commit).await;

            let mut inner = self.lock();
            if inner.generation != generation {
                tracing::debug!(generation, current = inner.generation, "stale computer move dropped");
                return;
            }
            if let Err(err) = inner.apply(to) {
                tracing::warn!(%err, "computer destination rejected");
            }
            inner.ai_in_progress = false;
            self.publish(&inner);
        }

        // A mill hands the turn straight back to the computer for the removal
        self.schedule_ai();
    }

    /// Make the computer's first (often only) selection of its turn.
    ///
    /// Returns the destination still to submit, with the generation it is
    /// valid for, when the decision is a two-step move.
    fn decide_and_submit(&self, inner: &mut Inner) -> Option<(usize, u64)> {
        let state = inner.state.clone();

        if state.phase() == Phase::RemovingPiece {
            match inner.ai.choose_removal(&state) {
                Some(point) => {
                    tracing::debug!(%point, "computer removes");
                    if let Err(err) = inner.apply(point.index()) {
                        tracing::warn!(%err, "computer removal rejected");
                    }
                }
                None => tracing::error!("computer found nothing to remove"),
            }
            return None;
        }

        let action = match inner.ai.choose_action_with_reason(&state) {
            Some((action, reason)) => {
                tracing::debug!(?action, ?reason, "computer decided");
                action
            }
            None => {
                tracing::error!(phase = ?state.phase(), "computer found no legal action");
                return None;
            }
        };

        match action {
            Action::Place(point) => {
                if let Err(err) = inner.apply(point.index()) {
                    tracing::warn!(%err, "computer placement rejected");
                }
                None
            }
            Action::Move { from, to } => match inner.apply(from.index()) {
                Ok(_) => Some((to.index(), inner.generation)),
                Err(err) => {
                    tracing::warn!(%err, "computer piece selection rejected");
                    None
                }
            },
        }
    }
}
