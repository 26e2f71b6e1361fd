//! Difficulty curve and background milestones
//!
//! Speed depends on score alone, never on elapsed time.

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Scroll speed (pixels per tick) for a given score
pub fn scroll_speed(score: u32, tuning: &Tuning) -> f32 {
    let steps = score / tuning.speed_interval;
    tuning.base_speed + steps as f32 * tuning.speed_increment
}

/// Cosmetic background cycle, advanced each time score crosses a milestone
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Backdrop {
    /// Monotonic counter; renderers take it modulo their palette size
    pub index: u32,
    /// Score at which the next advance happens
    pub next_milestone: u32,
}

impl Backdrop {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            index: 0,
            next_milestone: tuning.background_milestone,
        }
    }

    /// Advance once if `score` reached the pending milestone. Returns true on change.
    pub fn observe(&mut self, score: u32, tuning: &Tuning) -> bool {
        if score < self.next_milestone {
            return false;
        }
        self.index += 1;
        self.next_milestone += tuning.background_milestone;
        log::debug!(
            "Background {} at score {} (next at {})",
            self.index,
            score,
            self.next_milestone
        );
        true
    }
}
