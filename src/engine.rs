//! Engine: session lifecycle and the surface collaborators talk to
//!
//! The engine owns the authoritative [`GameState`], the session-scoped
//! [`Timers`] and the observer port. Each tick ends with one snapshot
//! published to the shared [`SnapshotCell`].

use std::sync::Arc;

use crate::sim::{ContinueOutcome, Cue, GameState, SessionPhase, TickInput, TimerKind, Timers, tick};
use crate::snapshot::{Snapshot, SnapshotCell};
use crate::tuning::Tuning;

/// Port for the audio and game-over collaborators
///
/// Injected per engine, so separate engines (and tests) never share hidden state.
pub trait EngineObserver: Send {
    fn on_cue(&mut self, _cue: Cue) {}

    /// Fired exactly once per session, when it ends
    fn on_game_over(&mut self, _final_score: u32) {}
}

/// Observer that ignores everything
#[derive(Debug, Default)]
pub struct NullObserver;

impl EngineObserver for NullObserver {}

pub struct Engine {
    tuning: Tuning,
    seed: u64,
    sessions: u32,
    state: Option<GameState>,
    timers: Timers,
    /// Input latched since the last tick
    input: TickInput,
    /// Cues already dispatched outside a tick, waiting for the next snapshot
    carried_cues: Vec<Cue>,
    observer: Box<dyn EngineObserver>,
    published: Arc<SnapshotCell>,
    halted: bool,
}

impl Engine {
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        let published = Arc::new(SnapshotCell::new(Snapshot::idle(&tuning)));
        Self {
            tuning,
            seed,
            sessions: 0,
            state: None,
            timers: Timers::new(),
            input: TickInput::default(),
            carried_cues: Vec::new(),
            observer: Box::new(NullObserver),
            published,
            halted: false,
        }
    }

    pub fn with_observer(mut self, observer: impl EngineObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    pub fn set_observer(&mut self, observer: Box<dyn EngineObserver>) {
        self.observer = observer;
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn state(&self) -> Option<&GameState> {
        self.state.as_ref()
    }

    /// Direct access for scripted layouts and tests
    pub fn state_mut(&mut self) -> Option<&mut GameState> {
        self.state.as_mut()
    }

    pub fn phase(&self) -> Option<SessionPhase> {
        self.state.as_ref().map(|s| s.ledger.phase())
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Pending timers of the current session
    pub fn pending_timers(&self) -> usize {
        self.timers.pending()
    }

    /// Begin a new session, abandoning any previous one. Returns the session number.
    pub fn start(&mut self, now_ms: u64) -> u32 {
        if let Some(old) = &self.state {
            if !old.ledger.is_ended() {
                log::info!("Abandoning session {} at score {}", old.session, old.ledger.score());
            }
        }

        self.sessions += 1;
        let generation = self.timers.begin_session();
        let seed = self.session_seed(self.sessions);
        self.state = Some(GameState::new(seed, self.sessions, &self.tuning));
        self.timers
            .schedule(TimerKind::EndGracePeriod, now_ms + self.tuning.grace_period_ms);
        self.input = TickInput::default();
        self.carried_cues.clear();
        self.halted = false;

        log::info!(
            "Session {} started (seed {}, timer generation {})",
            self.sessions,
            seed,
            generation
        );
        self.flush();
        self.sessions
    }

    /// Record one jump-request edge for the next tick.
    ///
    /// Returns false when it would be ignored: no live session, hit-paused,
    /// or the jump budget is spent.
    pub fn request_jump(&mut self) -> bool {
        if self.halted {
            return false;
        }
        let Some(state) = &self.state else {
            return false;
        };
        if !state.ledger.is_live() || !state.body.can_jump(&self.tuning) {
            return false;
        }
        self.input.jump = true;
        true
    }

    /// Pay a life (and maybe points) to resume after a hit
    pub fn continue_after_hit(&mut self, now_ms: u64) -> Option<ContinueOutcome> {
        if self.halted {
            return None;
        }
        let state = self.state.as_mut()?;
        let outcome = state.ledger.continue_after_hit(now_ms, &self.tuning)?;

        self.emit(Cue::Lose);
        if let ContinueOutcome::Resumed { invincible_until } = outcome {
            self.timers.reschedule(TimerKind::EndInvincibility, invincible_until);
        }
        self.flush();
        Some(outcome)
    }

    /// End the session from hit-pause without paying
    pub fn quit_after_hit(&mut self) -> bool {
        if self.halted {
            return false;
        }
        let ended = self
            .state
            .as_mut()
            .is_some_and(|state| state.ledger.quit_after_hit());
        if ended {
            self.flush();
        }
        ended
    }

    /// Player-initiated quit from any live phase
    pub fn quit(&mut self) -> bool {
        if self.halted {
            return false;
        }
        let ended = self.state.as_mut().is_some_and(|state| state.ledger.quit());
        if ended {
            self.flush();
        }
        ended
    }

    /// Run one simulation step and publish its snapshot.
    ///
    /// Before start, after the session ended, or once halted, this returns
    /// the last published snapshot unchanged.
    pub fn advance_tick(&mut self, now_ms: u64) -> Arc<Snapshot> {
        if self.halted {
            return self.snapshot();
        }
        let Some(state) = self.state.as_mut() else {
            return self.snapshot();
        };
        if state.ledger.is_ended() {
            return self.snapshot();
        }

        let input = std::mem::take(&mut self.input);
        tick(state, &mut self.timers, &input, now_ms, &self.tuning);
        self.flush()
    }

    /// Stop synchronously: no further ticks, every pending timer invalidated
    pub fn halt(&mut self) {
        if self.halted {
            return;
        }
        self.halted = true;
        self.timers.cancel_all();
        self.input = TickInput::default();
        log::info!("Engine halted after {} session(s)", self.sessions);
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.published.load()
    }

    /// Shared publication cell for readers on other threads
    pub fn snapshot_cell(&self) -> Arc<SnapshotCell> {
        Arc::clone(&self.published)
    }

    /// Per-session seed so every restart gets a fresh but reproducible layout
    fn session_seed(&self, session: u32) -> u64 {
        self.seed
            .wrapping_add(u64::from(session).wrapping_mul(0x9E37_79B9_7F4A_7C15))
    }

    /// Dispatch a cue raised outside a tick
    fn emit(&mut self, cue: Cue) {
        self.observer.on_cue(cue);
        self.carried_cues.push(cue);
    }

    /// Dispatch tick cues, report game over once, then publish
    fn flush(&mut self) -> Arc<Snapshot> {
        let Some(state) = self.state.as_mut() else {
            return self.snapshot();
        };

        let mut cues = std::mem::take(&mut self.carried_cues);
        for cue in state.cues.drain(..) {
            self.observer.on_cue(cue);
            cues.push(cue);
        }

        let game_over = state.ledger.take_game_over();
        let snapshot = Arc::new(Snapshot::capture(state, &self.tuning, cues));

        if let Some(final_score) = game_over {
            self.timers.cancel_all();
            self.observer.on_game_over(final_score);
        }

        self.published.store(Arc::clone(&snapshot));
        snapshot
    }
}
