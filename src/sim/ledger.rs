//! Session ledger: score, lives, penalties and the session state machine
//!
//! ```text
//! GracePeriod -> Running -> HitPaused -> Running | Ended
//!                Running -> Ended   (bomb, quit)
//! ```
//!
//! Every rejected transition is a silent no-op reported through the return value.

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// Simulation runs but nothing is lethal yet
    GracePeriod,
    /// Active gameplay
    Running,
    /// Waiting for a continue/quit decision after a hit
    HitPaused,
    /// Run over (terminal)
    Ended,
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    Bomb,
    LivesExhausted,
    Quit,
}

/// Result of paying for a continue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContinueOutcome {
    /// Back to running, invincible until the given time
    Resumed { invincible_until: u64 },
    /// That was the last life
    Ended { final_score: u32 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionLedger {
    score: u32,
    lives: u8,
    lives_max: u8,
    /// Cost of the next paid continue
    score_penalty: u32,
    phase: SessionPhase,
    invincible_until: Option<u64>,
    /// Score after which a heart may spawn (`None` = disarmed)
    heart_threshold: Option<u32>,
    end_reason: Option<EndReason>,
    game_over_reported: bool,
}

impl SessionLedger {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            score: 0,
            lives: tuning.lives_max,
            lives_max: tuning.lives_max,
            score_penalty: tuning.penalty_start,
            phase: SessionPhase::GracePeriod,
            invincible_until: None,
            heart_threshold: None,
            end_reason: None,
            game_over_reported: false,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives(&self) -> u8 {
        self.lives
    }

    pub fn lives_max(&self) -> u8 {
        self.lives_max
    }

    pub fn score_penalty(&self) -> u32 {
        self.score_penalty
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn heart_threshold(&self) -> Option<u32> {
        self.heart_threshold
    }

    pub fn end_reason(&self) -> Option<EndReason> {
        self.end_reason
    }

    pub fn is_invincible(&self) -> bool {
        self.invincible_until.is_some()
    }

    pub fn invincible_until(&self) -> Option<u64> {
        self.invincible_until
    }

    pub fn is_hit_paused(&self) -> bool {
        self.phase == SessionPhase::HitPaused
    }

    pub fn is_ended(&self) -> bool {
        self.phase == SessionPhase::Ended
    }

    /// Whether the simulation should advance this tick
    pub fn is_live(&self) -> bool {
        matches!(self.phase, SessionPhase::GracePeriod | SessionPhase::Running)
    }

    /// Points a continue would cost right now
    pub fn pending_penalty(&self, tuning: &Tuning) -> u32 {
        if self.score >= tuning.penalty_min_score {
            self.score_penalty
        } else {
            0
        }
    }

    /// Add pass credit or bonus points
    pub fn credit(&mut self, points: u32) {
        if self.is_ended() {
            return;
        }
        self.score = self.score.saturating_add(points);
    }

    pub fn collect_coin(&mut self, tuning: &Tuning) {
        self.credit(tuning.coin_bonus);
    }

    /// Restore one life, capped at the maximum
    pub fn heal(&mut self) {
        self.lives = self.lives.saturating_add(1).min(self.lives_max);
    }

    pub fn disarm_heart(&mut self) {
        self.heart_threshold = None;
    }

    pub fn end_grace_period(&mut self) -> bool {
        if self.phase != SessionPhase::GracePeriod {
            return false;
        }
        self.phase = SessionPhase::Running;
        log::debug!("Grace period over");
        true
    }

    pub fn end_invincibility(&mut self) {
        self.invincible_until = None;
    }

    /// Collisions only count while running without invincibility
    fn is_vulnerable(&self) -> bool {
        self.phase == SessionPhase::Running && !self.is_invincible()
    }

    /// Non-fatal collision. Returns true if the session entered hit-pause.
    pub fn register_hit(&mut self) -> bool {
        if !self.is_vulnerable() {
            return false;
        }
        self.phase = SessionPhase::HitPaused;
        log::debug!("Hit! score={} lives={}", self.score, self.lives);
        true
    }

    /// Bomb contact. Returns true if the session ended.
    pub fn detonate(&mut self) -> bool {
        if !self.is_vulnerable() {
            return false;
        }
        self.end(EndReason::Bomb);
        true
    }

    /// Pay for a continue from hit-pause. `None` if not hit-paused.
    pub fn continue_after_hit(&mut self, now_ms: u64, tuning: &Tuning) -> Option<ContinueOutcome> {
        if !self.is_hit_paused() {
            return None;
        }

        self.lives = self.lives.saturating_sub(1);
        if self.score >= tuning.penalty_min_score {
            self.score = self.score.saturating_sub(self.score_penalty);
            self.score_penalty = (self.score_penalty + tuning.penalty_step).min(tuning.penalty_cap);
        }

        if self.lives == 0 {
            self.end(EndReason::LivesExhausted);
            return Some(ContinueOutcome::Ended {
                final_score: self.score,
            });
        }

        self.heart_threshold = Some(self.score + tuning.heart_rearm_delay);
        let invincible_until = now_ms + tuning.invincibility_ms;
        self.invincible_until = Some(invincible_until);
        self.phase = SessionPhase::Running;
        log::debug!(
            "Continue: lives={} score={} next penalty={}",
            self.lives,
            self.score,
            self.score_penalty
        );
        Some(ContinueOutcome::Resumed { invincible_until })
    }

    /// Leave from hit-pause without paying. Returns true if the session ended.
    pub fn quit_after_hit(&mut self) -> bool {
        if !self.is_hit_paused() {
            return false;
        }
        self.end(EndReason::Quit);
        true
    }

    /// Player-initiated quit from any live phase
    pub fn quit(&mut self) -> bool {
        if self.is_ended() {
            return false;
        }
        self.end(EndReason::Quit);
        true
    }

    /// Final score, handed out exactly once after the session ends
    pub fn take_game_over(&mut self) -> Option<u32> {
        if !self.is_ended() || self.game_over_reported {
            return None;
        }
        self.game_over_reported = true;
        Some(self.score)
    }

    fn end(&mut self, reason: EndReason) {
        self.phase = SessionPhase::Ended;
        self.end_reason = Some(reason);
        self.invincible_until = None;
        log::info!("Session ended ({:?}) with score {}", reason, self.score);
    }
}
