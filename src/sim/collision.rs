//! Collision detection and per-kind resolution
//!
//! Plain axis-aligned boxes: the body is a rectangle, so is every obstacle.
//! Pits are never tested here; falling through them is the physics layer's job.

use glam::Vec2;

use super::ledger::SessionLedger;
use super::obstacle::{Obstacle, ObstacleField, ObstacleKind};
use super::state::Cue;
use crate::tuning::Tuning;

/// Axis-aligned bounding box (screen coordinates)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            max: Vec2::new(x + width, y + height),
        }
    }

    /// Strict overlap; touching edges do not count
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}

/// Box of the player body at its current height
pub fn body_aabb(body_y: f32, tuning: &Tuning) -> Aabb {
    Aabb::new(tuning.body_x, body_y, tuning.body_width, tuning.body_height)
}

/// Obstacles overlapping the body this tick, grouped by outcome
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Contacts {
    pub bombs: Vec<u32>,
    pub coins: Vec<u32>,
    pub hearts: Vec<u32>,
    /// Pillars and flying blocks
    pub solids: Vec<u32>,
}

impl Contacts {
    pub fn is_empty(&self) -> bool {
        self.bombs.is_empty() && self.coins.is_empty() && self.hearts.is_empty() && self.solids.is_empty()
    }
}

/// Collect every live obstacle overlapping `body`
pub fn detect(body: &Aabb, obstacles: &[Obstacle]) -> Contacts {
    let mut contacts = Contacts::default();
    for obstacle in obstacles {
        if obstacle.kind == ObstacleKind::Pit || !body.intersects(&obstacle.aabb()) {
            continue;
        }
        let bucket = match obstacle.kind {
            ObstacleKind::Bomb => &mut contacts.bombs,
            ObstacleKind::Coin => &mut contacts.coins,
            ObstacleKind::Heart => &mut contacts.hearts,
            ObstacleKind::Pillar | ObstacleKind::Flying => &mut contacts.solids,
            ObstacleKind::Pit => continue,
        };
        bucket.push(obstacle.id);
    }
    contacts
}

/// Apply kind-specific outcomes for this tick's contacts.
///
/// A live bomb wins over everything else: if it ends the session, nothing
/// else is resolved. Pickups are consumed even while invincible.
pub fn resolve(
    contacts: &Contacts,
    ledger: &mut SessionLedger,
    field: &mut ObstacleField,
    tuning: &Tuning,
    cues: &mut Vec<Cue>,
) {
    if !contacts.bombs.is_empty() && ledger.detonate() {
        cues.push(Cue::Bomb);
        return;
    }

    for &id in &contacts.coins {
        if field.remove(id).is_some() {
            ledger.collect_coin(tuning);
            cues.push(Cue::Coin);
        }
    }

    for &id in &contacts.hearts {
        if field.remove(id).is_some() {
            ledger.heal();
            cues.push(Cue::Heart);
        }
    }

    if !contacts.solids.is_empty() && ledger.register_hit() {
        cues.push(Cue::Hit);
    }
}
