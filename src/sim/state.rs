//! Game state and core simulation types
//!
//! One authoritative, mutable state per session. Renderers never see it
//! directly; they get an immutable [`crate::Snapshot`] at the end of each tick.

use serde::{Deserialize, Serialize};

use super::body::PlayerBody;
use super::difficulty::{Backdrop, scroll_speed};
use super::ledger::SessionLedger;
use super::obstacle::ObstacleField;
use crate::tuning::Tuning;

/// Discrete cues for the audio collaborator, raised on the tick they happen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cue {
    Jump,
    Land,
    /// Entered hit-pause
    Hit,
    /// A life was spent on a continue
    Lose,
    Coin,
    Heart,
    Bomb,
}

/// Complete state of one play session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed for this session's obstacle RNG
    pub seed: u64,
    /// Session number (1-based, per engine)
    pub session: u32,
    /// Simulation tick counter (only advances while live)
    pub time_ticks: u64,
    pub body: PlayerBody,
    pub field: ObstacleField,
    pub ledger: SessionLedger,
    pub backdrop: Backdrop,
    /// Scroll speed used on the latest tick
    pub speed: f32,
    /// Cues raised since the engine last flushed them
    pub cues: Vec<Cue>,
}

impl GameState {
    pub fn new(seed: u64, session: u32, tuning: &Tuning) -> Self {
        Self {
            seed,
            session,
            time_ticks: 0,
            body: PlayerBody::grounded(tuning),
            field: ObstacleField::new(seed),
            ledger: SessionLedger::new(tuning),
            backdrop: Backdrop::new(tuning),
            speed: scroll_speed(0, tuning),
            cues: Vec::new(),
        }
    }
}
