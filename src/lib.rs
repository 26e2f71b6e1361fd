//! Dino Nod - A reflex-timing runner game engine
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, obstacles, collisions, session ledger)
//! - `engine`: Session lifecycle, observers and snapshot publication
//! - `runner`: Display-frame scheduling on top of the fixed tick
//! - `input`: Jump-request sources collapsed into one signal
//! - `tuning`: Data-driven game balance
//! - `highscores`: Leaderboard model

pub mod engine;
pub mod error;
pub mod highscores;
pub mod input;
pub mod runner;
pub mod sim;
pub mod snapshot;
pub mod tuning;

pub use engine::{Engine, EngineObserver, NullObserver};
pub use error::{Error, Result};
pub use highscores::HighScores;
pub use snapshot::{Snapshot, SnapshotCell};
pub use tuning::Tuning;

/// Game configuration constants
///
/// Screen coordinates: `y` grows downward, origin at the playfield's top-left.
/// Velocities and gravity are per tick, one tick per display frame.
pub mod consts {
    /// Fixed tick duration in milliseconds (60 Hz display)
    pub const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Maximum catch-up ticks per display frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Playfield dimensions
    pub const FIELD_WIDTH: f32 = 400.0;
    pub const FIELD_HEIGHT: f32 = 700.0;
    pub const GROUND_HEIGHT: f32 = 60.0;

    /// Player body - fixed horizontal position, only moves vertically
    pub const BODY_X: f32 = 50.0;
    pub const BODY_WIDTH: f32 = 50.0;
    pub const BODY_HEIGHT: f32 = 50.0;
    /// Body top when standing on the ground
    pub const BODY_GROUND_Y: f32 = FIELD_HEIGHT - GROUND_HEIGHT - BODY_HEIGHT;

    /// Physics
    pub const GRAVITY: f32 = 0.4;
    pub const JUMP_IMPULSE: f32 = -9.0;
    pub const MAX_JUMPS: u8 = 3;
    /// Extra height on the last jump of the budget
    pub const FINAL_JUMP_MULTIPLIER: f32 = 1.2;

    /// Difficulty: speed = base + floor(score / interval) * increment
    pub const BASE_SPEED: f32 = 2.0;
    pub const SPEED_INTERVAL: u32 = 5;
    pub const SPEED_INCREMENT: f32 = 0.15;

    /// Spawn gap between the right edge and the newest obstacle
    pub const GAP_MIN: f32 = 200.0;
    pub const GAP_MAX: f32 = 280.0;
    /// Extra distance past the left edge before an obstacle is dropped
    pub const CULL_MARGIN: f32 = 50.0;

    /// Session ledger
    pub const LIVES_MAX: u8 = 3;
    pub const PENALTY_START: u32 = 5;
    pub const PENALTY_STEP: u32 = 5;
    pub const PENALTY_CAP: u32 = 15;
    /// Continue is free below this score
    pub const PENALTY_MIN_SCORE: u32 = 10;
    pub const COIN_BONUS: u32 = 5;
    pub const PIT_CREDIT: u32 = 3;
    pub const PASS_CREDIT: u32 = 1;
    pub const HEART_REARM_DELAY: u32 = 15;

    /// Timers (milliseconds)
    pub const INVINCIBILITY_MS: u64 = 2000;
    pub const GRACE_PERIOD_MS: u64 = 3000;
    pub const JUMP_FLAG_MS: u64 = 300;
    pub const LAND_FLAG_MS: u64 = 200;

    /// Background theme advances every this many points
    pub const BACKGROUND_MILESTONE: u32 = 75;
}
