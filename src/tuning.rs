//! Data-driven game balance
//!
//! Every balance value the simulation reads lives here. Defaults come from
//! [`crate::consts`]; a JSON file may override any subset of fields.

use std::path::Path;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Error, Result};

/// Closed numeric range sampled uniformly
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub min: f32,
    pub max: f32,
}

impl Span {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Uniform sample in `[min, max)` (returns `min` for a degenerate span)
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        self.min + rng.random::<f32>() * (self.max - self.min)
    }

    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }
}

/// Cumulative spawn weights; pillars take whatever probability is left
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnWeights {
    pub bomb: f32,
    pub coin: f32,
    pub pit: f32,
    pub flying: f32,
}

impl Default for SpawnWeights {
    fn default() -> Self {
        Self {
            bomb: 0.10,
            coin: 0.35,
            pit: 0.20,
            flying: 0.15,
        }
    }
}

impl SpawnWeights {
    /// Probability left over for pillars
    pub fn pillar(&self) -> f32 {
        1.0 - (self.bomb + self.coin + self.pit + self.flying)
    }
}

/// Per-kind placement ranges
///
/// "Lift" values are the gap between the top of a grounded body and the
/// bottom of the obstacle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObstacleTuning {
    pub heart_size: f32,
    pub heart_y: f32,
    pub bomb_size: f32,
    /// Chance a bomb floats instead of sitting on the ground
    pub bomb_airborne_chance: f32,
    pub bomb_lift: Span,
    pub coin_size: f32,
    pub coin_lift: Span,
    pub pit_width: Span,
    pub flying_width: Span,
    pub flying_height: Span,
    pub flying_lift: Span,
    pub pillar_width: Span,
    pub pillar_height: Span,
}

impl Default for ObstacleTuning {
    fn default() -> Self {
        Self {
            heart_size: 40.0,
            heart_y: FIELD_HEIGHT / 2.0 - 50.0,
            bomb_size: 40.0,
            bomb_airborne_chance: 0.6,
            bomb_lift: Span::new(20.0, 100.0),
            coin_size: 30.0,
            coin_lift: Span::new(30.0, 100.0),
            pit_width: Span::new(100.0, 150.0),
            flying_width: Span::new(50.0, 80.0),
            flying_height: Span::new(40.0, 80.0),
            flying_lift: Span::new(20.0, 80.0),
            pillar_width: Span::new(30.0, 60.0),
            pillar_height: Span::new(40.0, 120.0),
        }
    }
}

/// Complete balance sheet for one engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Playfield ===
    pub field_width: f32,
    pub field_height: f32,
    pub ground_height: f32,

    // === Body ===
    pub body_x: f32,
    pub body_width: f32,
    pub body_height: f32,
    pub gravity: f32,
    pub jump_impulse: f32,
    pub max_jumps: u8,
    pub final_jump_multiplier: f32,

    // === Difficulty ===
    pub base_speed: f32,
    pub speed_interval: u32,
    pub speed_increment: f32,
    pub background_milestone: u32,

    // === Obstacle field ===
    pub gap: Span,
    pub cull_margin: f32,
    pub weights: SpawnWeights,
    pub obstacles: ObstacleTuning,

    // === Ledger ===
    pub lives_max: u8,
    pub penalty_start: u32,
    pub penalty_step: u32,
    pub penalty_cap: u32,
    pub penalty_min_score: u32,
    pub coin_bonus: u32,
    pub pit_credit: u32,
    pub pass_credit: u32,
    pub heart_rearm_delay: u32,

    // === Timing (ms) ===
    pub frame_ms: f64,
    pub invincibility_ms: u64,
    pub grace_period_ms: u64,
    pub jump_flag_ms: u64,
    pub land_flag_ms: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,
            ground_height: GROUND_HEIGHT,

            body_x: BODY_X,
            body_width: BODY_WIDTH,
            body_height: BODY_HEIGHT,
            gravity: GRAVITY,
            jump_impulse: JUMP_IMPULSE,
            max_jumps: MAX_JUMPS,
            final_jump_multiplier: FINAL_JUMP_MULTIPLIER,

            base_speed: BASE_SPEED,
            speed_interval: SPEED_INTERVAL,
            speed_increment: SPEED_INCREMENT,
            background_milestone: BACKGROUND_MILESTONE,

            gap: Span::new(GAP_MIN, GAP_MAX),
            cull_margin: CULL_MARGIN,
            weights: SpawnWeights::default(),
            obstacles: ObstacleTuning::default(),

            lives_max: LIVES_MAX,
            penalty_start: PENALTY_START,
            penalty_step: PENALTY_STEP,
            penalty_cap: PENALTY_CAP,
            penalty_min_score: PENALTY_MIN_SCORE,
            coin_bonus: COIN_BONUS,
            pit_credit: PIT_CREDIT,
            pass_credit: PASS_CREDIT,
            heart_rearm_delay: HEART_REARM_DELAY,

            frame_ms: FRAME_MS,
            invincibility_ms: INVINCIBILITY_MS,
            grace_period_ms: GRACE_PERIOD_MS,
            jump_flag_ms: JUMP_FLAG_MS,
            land_flag_ms: LAND_FLAG_MS,
        }
    }
}

impl Tuning {
    /// Top edge of the ground strip
    #[inline]
    pub fn ground_y(&self) -> f32 {
        self.field_height - self.ground_height
    }

    /// Body top when standing on the ground
    #[inline]
    pub fn body_ground_y(&self) -> f32 {
        self.ground_y() - self.body_height
    }

    /// Horizontal center of the body (used for pit detection)
    #[inline]
    pub fn body_center_x(&self) -> f32 {
        self.body_x + self.body_width / 2.0
    }

    /// Fixed tick duration in milliseconds
    #[inline]
    pub fn frame_ms(&self) -> f64 {
        self.frame_ms
    }

    /// Parse and validate a (possibly partial) JSON tuning file body
    pub fn from_json(json: &str) -> Result<Self> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load and validate a tuning file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: &str| -> Result<()> { Err(Error::InvalidTuning(msg.to_string())) };

        if !(self.field_width > 0.0 && self.field_height > 0.0) {
            return invalid("playfield must have positive size");
        }
        if !(self.ground_height >= 0.0 && self.ground_height < self.field_height) {
            return invalid("ground strip must fit inside the playfield");
        }
        if !(self.body_width > 0.0 && self.body_height > 0.0) {
            return invalid("body must have positive size");
        }
        if self.max_jumps == 0 {
            return invalid("max_jumps must be at least 1");
        }
        if self.lives_max == 0 {
            return invalid("lives_max must be at least 1");
        }
        if self.speed_interval == 0 {
            return invalid("speed_interval must be non-zero");
        }
        if self.background_milestone == 0 {
            return invalid("background_milestone must be non-zero");
        }
        if !(self.frame_ms > 0.0 && self.frame_ms.is_finite()) {
            return invalid("frame_ms must be positive");
        }
        if self.penalty_start > self.penalty_cap {
            return invalid("penalty_start exceeds penalty_cap");
        }

        let o = &self.obstacles;
        let spans = [
            ("gap", self.gap),
            ("bomb_lift", o.bomb_lift),
            ("coin_lift", o.coin_lift),
            ("pit_width", o.pit_width),
            ("flying_width", o.flying_width),
            ("flying_height", o.flying_height),
            ("flying_lift", o.flying_lift),
            ("pillar_width", o.pillar_width),
            ("pillar_height", o.pillar_height),
        ];
        for (name, span) in spans {
            if !span.is_valid() {
                return Err(Error::InvalidTuning(format!(
                    "{name}: min {} exceeds max {}",
                    span.min, span.max
                )));
            }
        }

        let w = &self.weights;
        if [w.bomb, w.coin, w.pit, w.flying].iter().any(|p| *p < 0.0) {
            return invalid("spawn weights must be non-negative");
        }
        if w.pillar() < -f32::EPSILON {
            return invalid("spawn weights sum past 1.0");
        }
        if !(0.0..=1.0).contains(&o.bomb_airborne_chance) {
            return invalid("bomb_airborne_chance must be a probability");
        }

        Ok(())
    }
}
