//! Player body: vertical physics and the multi-jump budget
//!
//! The body never moves horizontally; the world scrolls past it.

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Transient animation flag, cleared by a timer shortly after it is set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyAction {
    Jump,
    Land,
}

/// What happened to the body during one physics step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BodyStep {
    /// Touched solid ground after being airborne
    pub landed: bool,
    /// Dropped past the bottom of the playfield (missed a pit)
    pub fell_out: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerBody {
    /// Top edge, screen coordinates (grows downward)
    pub y: f32,
    /// Vertical velocity per tick (negative is up)
    pub vel_y: f32,
    pub on_ground: bool,
    /// Jump impulses spent since the last grounding
    pub jumps_used: u8,
    pub action: Option<BodyAction>,
}

impl PlayerBody {
    /// A body standing on solid ground
    pub fn grounded(tuning: &Tuning) -> Self {
        Self {
            y: tuning.body_ground_y(),
            vel_y: 0.0,
            on_ground: true,
            jumps_used: 0,
            action: None,
        }
    }

    pub fn can_jump(&self, tuning: &Tuning) -> bool {
        self.jumps_used < tuning.max_jumps
    }

    /// Impulse the next jump would apply (the last one in the budget is stronger)
    pub fn next_impulse(&self, tuning: &Tuning) -> f32 {
        if self.jumps_used + 1 == tuning.max_jumps {
            tuning.jump_impulse * tuning.final_jump_multiplier
        } else {
            tuning.jump_impulse
        }
    }

    /// Spend one jump from the budget. Returns false (and does nothing) when exhausted.
    pub fn jump(&mut self, tuning: &Tuning) -> bool {
        if !self.can_jump(tuning) {
            return false;
        }
        self.vel_y = self.next_impulse(tuning);
        self.on_ground = false;
        self.jumps_used += 1;
        self.action = Some(BodyAction::Jump);
        true
    }

    /// Integrate one tick of gravity and resolve grounding.
    ///
    /// `pit_under` is whether a live pit spans the body's horizontal center;
    /// if so the ground does not catch the body.
    pub fn integrate(&mut self, tuning: &Tuning, pit_under: bool) -> BodyStep {
        let mut step = BodyStep::default();

        self.vel_y += tuning.gravity;
        self.y += self.vel_y;

        let ground = tuning.body_ground_y();
        if self.y >= ground {
            if pit_under {
                // Falling through the gap
                if self.y > ground {
                    self.on_ground = false;
                }
            } else {
                if !self.on_ground {
                    step.landed = true;
                    self.action = Some(BodyAction::Land);
                }
                self.settle(ground);
            }
        }

        if self.y > tuning.field_height {
            step.fell_out = true;
            // Put the body back so the fall only triggers once
            self.settle(ground);
        }

        step
    }

    /// Rendering tilt in degrees: level on the ground, nose-up while rising
    pub fn tilt(&self) -> f32 {
        if self.on_ground {
            0.0
        } else {
            (self.vel_y * 2.0).max(-20.0)
        }
    }

    fn settle(&mut self, ground: f32) {
        self.y = ground;
        self.vel_y = 0.0;
        self.on_ground = true;
        self.jumps_used = 0;
    }
}
