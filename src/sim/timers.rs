//! Session-scoped deferred actions
//!
//! Every timer is tagged with the session generation that scheduled it.
//! Beginning a new session (or cancelling everything) bumps the generation,
//! so a stale timer can never fire into the next session's state.

/// Deferred actions the engine knows how to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Clear the transient jump/land animation flag
    ClearBodyAction,
    EndInvincibility,
    EndGracePeriod,
}

/// Handle for cancelling one scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle {
    generation: u32,
    id: u64,
}

#[derive(Debug, Clone)]
struct Pending {
    handle: TimerHandle,
    kind: TimerKind,
    due_ms: u64,
}

#[derive(Debug, Clone, Default)]
pub struct Timers {
    generation: u32,
    next_id: u64,
    pending: Vec<Pending>,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Invalidate every timer from earlier sessions and return the new generation
    pub fn begin_session(&mut self) -> u32 {
        self.cancel_all();
        self.generation
    }

    pub fn schedule(&mut self, kind: TimerKind, due_ms: u64) -> TimerHandle {
        let handle = TimerHandle {
            generation: self.generation,
            id: self.next_id,
        };
        self.next_id += 1;
        self.pending.push(Pending {
            handle,
            kind,
            due_ms,
        });
        handle
    }

    /// Schedule `kind`, replacing any pending timer of the same kind
    pub fn reschedule(&mut self, kind: TimerKind, due_ms: u64) -> TimerHandle {
        self.cancel_kind(kind);
        self.schedule(kind, due_ms)
    }

    /// Returns true if the timer was still pending
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.handle != handle);
        self.pending.len() != before
    }

    pub fn cancel_kind(&mut self, kind: TimerKind) {
        self.pending.retain(|p| p.kind != kind);
    }

    pub fn cancel_all(&mut self) {
        if !self.pending.is_empty() {
            log::debug!("Cancelling {} pending timers", self.pending.len());
        }
        self.pending.clear();
        self.generation = self.generation.wrapping_add(1);
    }

    /// Number of live timers in the current generation
    pub fn pending(&self) -> usize {
        self.pending
            .iter()
            .filter(|p| p.handle.generation == self.generation)
            .count()
    }

    /// Remove and return every current-generation timer due at `now_ms`, earliest first
    pub fn drain_due(&mut self, now_ms: u64) -> Vec<TimerKind> {
        let generation = self.generation;
        let mut due: Vec<Pending> = Vec::new();
        self.pending.retain(|p| {
            if p.handle.generation != generation {
                return false;
            }
            if p.due_ms <= now_ms {
                due.push(p.clone());
                return false;
            }
            true
        });
        due.sort_by_key(|p| (p.due_ms, p.handle.id));
        due.into_iter().map(|p| p.kind).collect()
    }
}
