//! Immutable render snapshots and their publication
//!
//! The engine builds one [`Snapshot`] at the end of every tick and swaps it
//! into a [`SnapshotCell`]. Readers on any thread get an `Arc` to a complete
//! snapshot; they never see a half-updated obstacle list.

use std::sync::{Arc, PoisonError, RwLock};

use serde::Serialize;

use crate::error::Result;
use crate::sim::{BodyAction, Cue, EndReason, GameState, Obstacle, SessionPhase, scroll_speed};
use crate::tuning::Tuning;

/// Player body as the renderer needs it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BodyPose {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub vel_y: f32,
    pub on_ground: bool,
    pub jumps_used: u8,
    /// Degrees, negative is nose-up
    pub tilt: f32,
    pub action: Option<BodyAction>,
}

/// Everything a frame needs to draw, frozen at the end of a tick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    /// Session number (0 before the first start)
    pub session: u32,
    pub tick: u64,
    /// `None` until a session has started
    pub phase: Option<SessionPhase>,
    pub end_reason: Option<EndReason>,
    pub body: BodyPose,
    /// Live obstacles, oldest first
    pub obstacles: Vec<Obstacle>,
    pub score: u32,
    pub lives: u8,
    pub lives_max: u8,
    pub invincible: bool,
    /// What a continue would cost right now
    pub continue_penalty: u32,
    /// Background theme counter; take it modulo the palette size
    pub background: u32,
    pub speed: f32,
    /// Cues raised since the previous snapshot
    pub cues: Vec<Cue>,
}

impl Snapshot {
    /// Snapshot shown before any session exists
    pub fn idle(tuning: &Tuning) -> Self {
        Self {
            session: 0,
            tick: 0,
            phase: None,
            end_reason: None,
            body: BodyPose {
                x: tuning.body_x,
                y: tuning.body_ground_y(),
                width: tuning.body_width,
                height: tuning.body_height,
                vel_y: 0.0,
                on_ground: true,
                jumps_used: 0,
                tilt: 0.0,
                action: None,
            },
            obstacles: Vec::new(),
            score: 0,
            lives: tuning.lives_max,
            lives_max: tuning.lives_max,
            invincible: false,
            continue_penalty: 0,
            background: 0,
            speed: scroll_speed(0, tuning),
            cues: Vec::new(),
        }
    }

    pub fn capture(state: &GameState, tuning: &Tuning, cues: Vec<Cue>) -> Self {
        let body = &state.body;
        let ledger = &state.ledger;
        Self {
            session: state.session,
            tick: state.time_ticks,
            phase: Some(ledger.phase()),
            end_reason: ledger.end_reason(),
            body: BodyPose {
                x: tuning.body_x,
                y: body.y,
                width: tuning.body_width,
                height: tuning.body_height,
                vel_y: body.vel_y,
                on_ground: body.on_ground,
                jumps_used: body.jumps_used,
                tilt: body.tilt(),
                action: body.action,
            },
            obstacles: state.field.obstacles().to_vec(),
            score: ledger.score(),
            lives: ledger.lives(),
            lives_max: ledger.lives_max(),
            invincible: ledger.is_invincible(),
            continue_penalty: ledger.pending_penalty(tuning),
            background: state.backdrop.index,
            speed: state.speed,
            cues,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Single-slot publication point for the latest snapshot
#[derive(Debug)]
pub struct SnapshotCell {
    current: RwLock<Arc<Snapshot>>,
}

impl SnapshotCell {
    pub fn new(initial: Snapshot) -> Self {
        Self {
            current: RwLock::new(Arc::new(initial)),
        }
    }

    /// Latest complete snapshot
    pub fn load(&self) -> Arc<Snapshot> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the published snapshot in one pointer swap
    pub fn store(&self, snapshot: Arc<Snapshot>) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = snapshot;
    }
}
