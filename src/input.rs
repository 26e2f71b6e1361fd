//! Jump-request sources
//!
//! Taps, head nods and voice spikes all collapse into one boolean per poll.
//! A source that failed to initialise is simply absent (or [`NoInput`]): the
//! engine only ever learns "no jump this tick".

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::sim::ObstacleKind;
use crate::snapshot::Snapshot;

/// Anything that can request a jump
pub trait JumpSource {
    /// Consume any pending request. Called once per tick.
    fn poll(&mut self, now_ms: u64, snapshot: &Snapshot) -> bool;
}

impl<F> JumpSource for F
where
    F: FnMut(u64, &Snapshot) -> bool,
{
    fn poll(&mut self, now_ms: u64, snapshot: &Snapshot) -> bool {
        self(now_ms, snapshot)
    }
}

/// Silent source, used when nothing else is available
#[derive(Debug, Default, Clone, Copy)]
pub struct NoInput;

impl JumpSource for NoInput {
    fn poll(&mut self, _now_ms: u64, _snapshot: &Snapshot) -> bool {
        false
    }
}

/// Latched tap requests, settable from any thread
#[derive(Debug, Default, Clone)]
pub struct TapLatch {
    pending: Arc<AtomicBool>,
}

impl TapLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a tap; several taps before the next poll count once
    pub fn tap(&self) {
        self.pending.store(true, Ordering::Release);
    }
}

impl JumpSource for TapLatch {
    fn poll(&mut self, _now_ms: u64, _snapshot: &Snapshot) -> bool {
        self.pending.swap(false, Ordering::AcqRel)
    }
}

/// Fan-in of several sources; any of them requesting counts as one jump
#[derive(Default)]
pub struct AnyOf {
    sources: Vec<Box<dyn JumpSource + Send>>,
}

impl AnyOf {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, source: impl JumpSource + Send + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl JumpSource for AnyOf {
    fn poll(&mut self, now_ms: u64, snapshot: &Snapshot) -> bool {
        // Poll every source so none keeps a stale request around
        let mut any = false;
        for source in &mut self.sources {
            any |= source.poll(now_ms, snapshot);
        }
        any
    }
}

/// Demo player: jumps over whatever is about to hit it
#[derive(Debug, Clone)]
pub struct Autopilot {
    /// Look-ahead in ticks of travel at the current speed
    pub lookahead_ticks: f32,
    /// Minimum spacing between two jumps of the same arc
    pub min_interval_ms: u64,
    last_jump_ms: Option<u64>,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self {
            lookahead_ticks: 8.0,
            min_interval_ms: 150,
            last_jump_ms: None,
        }
    }
}

impl Autopilot {
    /// Is the obstacle something a grounded body has to clear?
    fn blocks_ground(kind: ObstacleKind, snapshot: &Snapshot, obstacle_bottom: f32) -> bool {
        match kind {
            ObstacleKind::Pillar | ObstacleKind::Pit => true,
            // Ground bombs sit in the body's lane, airborne ones float above it
            ObstacleKind::Bomb => obstacle_bottom > snapshot.body.y,
            ObstacleKind::Flying | ObstacleKind::Coin | ObstacleKind::Heart => false,
        }
    }
}

impl JumpSource for Autopilot {
    fn poll(&mut self, now_ms: u64, snapshot: &Snapshot) -> bool {
        let body = &snapshot.body;
        let front = body.x + body.width;
        let reach = snapshot.speed * self.lookahead_ticks;

        let threat = snapshot.obstacles.iter().find(|o| {
            o.x + o.width > body.x && Self::blocks_ground(o.kind, snapshot, o.y + o.height)
        });
        let Some(threat) = threat else {
            return false;
        };

        let cooled = self
            .last_jump_ms
            .is_none_or(|last| now_ms.saturating_sub(last) >= self.min_interval_ms);

        let approaching = threat.x - front <= reach && threat.x >= body.x;
        // Extra height while coming down over or in front of the threat
        let sinking = !body.on_ground && body.vel_y > 0.0 && threat.x < front + reach;

        let jump = cooled && ((body.on_ground && approaching) || sinking);
        if jump {
            self.last_jump_ms = Some(now_ms);
        }
        jump
    }
}
