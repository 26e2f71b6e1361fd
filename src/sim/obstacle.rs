//! Obstacle field: procedural spawning, scrolling, culling and pass credit
//!
//! Obstacles are kept in spawn order (oldest first). Identity comes from a
//! monotonic counter owned by the field, so ids never collide within a tick.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::tuning::Tuning;

/// Obstacle types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObstacleKind {
    /// Ground-anchored column
    Pillar,
    /// Gap in the ground; handled by physics, never by collision
    Pit,
    /// Airborne block
    Flying,
    /// Restores one life
    Heart,
    /// Bonus points
    Coin,
    /// Ends the run on contact
    Bomb,
}

impl ObstacleKind {
    /// Pickups are consumed on contact and never credit by scrolling past
    pub fn is_pickup(self) -> bool {
        matches!(self, ObstacleKind::Heart | ObstacleKind::Coin)
    }

    /// Score credited when the obstacle scrolls past the body
    pub fn pass_credit(self, tuning: &Tuning) -> u32 {
        match self {
            ObstacleKind::Pit => tuning.pit_credit,
            _ => tuning.pass_credit,
        }
    }
}

/// An obstacle entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Score for this obstacle has already been credited
    pub passed: bool,
}

impl Obstacle {
    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.x, self.y, self.width, self.height)
    }
}

/// Ledger values the spawner reads
#[derive(Debug, Clone, Copy)]
pub struct SpawnContext {
    pub score: u32,
    pub lives: u8,
    /// Score after which a heart may spawn (`None` = disarmed)
    pub heart_threshold: Option<u32>,
}

/// Owns every live obstacle plus the id counter and the spawn RNG
#[derive(Debug, Clone)]
pub struct ObstacleField {
    obstacles: Vec<Obstacle>,
    next_id: u32,
    rng: Pcg32,
}

impl ObstacleField {
    pub fn new(seed: u64) -> Self {
        Self {
            obstacles: Vec::new(),
            next_id: 1,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    /// Whether a live pit spans the given horizontal position
    pub fn pit_under(&self, x: f32) -> bool {
        self.obstacles
            .iter()
            .any(|o| o.kind == ObstacleKind::Pit && x > o.x && x < o.right())
    }

    pub fn has_heart(&self) -> bool {
        self.obstacles.iter().any(|o| o.kind == ObstacleKind::Heart)
    }

    /// Scroll everything left by `speed` and drop what has left the screen
    pub fn advance(&mut self, speed: f32, tuning: &Tuning) {
        for obstacle in &mut self.obstacles {
            obstacle.x -= speed;
        }
        let margin = tuning.cull_margin;
        self.obstacles.retain(|o| o.x > -o.width - margin);
    }

    /// Spawn one obstacle at the right edge if the gap since the newest one is wide enough
    pub fn maybe_spawn(&mut self, ctx: &SpawnContext, tuning: &Tuning) -> Option<ObstacleKind> {
        let gap = tuning.gap.sample(&mut self.rng);
        let wide_enough = match self.obstacles.last() {
            None => true,
            Some(last) => tuning.field_width - last.x > gap,
        };
        if !wide_enough {
            return None;
        }

        let kind = self.select_kind(ctx, tuning);
        let obstacle = self.build(kind, tuning);
        log::trace!(
            "Spawned {:?} #{} at y={:.1} ({:.1}x{:.1})",
            obstacle.kind,
            obstacle.id,
            obstacle.y,
            obstacle.width,
            obstacle.height
        );
        self.obstacles.push(obstacle);
        Some(kind)
    }

    /// Mark obstacles whose right edge crossed the body and return the total credit
    pub fn credit_passed(&mut self, tuning: &Tuning) -> u32 {
        let mut credit = 0;
        for obstacle in &mut self.obstacles {
            if !obstacle.passed && obstacle.right() < tuning.body_x {
                obstacle.passed = true;
                credit += obstacle.kind.pass_credit(tuning);
            }
        }
        credit
    }

    /// Remove an obstacle by id, keeping spawn order
    pub fn remove(&mut self, id: u32) -> Option<Obstacle> {
        let idx = self.obstacles.iter().position(|o| o.id == id)?;
        Some(self.obstacles.remove(idx))
    }

    /// Place an obstacle directly (scripted layouts and tests)
    pub fn place(&mut self, kind: ObstacleKind, x: f32, y: f32, width: f32, height: f32) -> u32 {
        let id = self.next_entity_id();
        self.obstacles.push(Obstacle {
            id,
            kind,
            x,
            y,
            width,
            height,
            passed: kind.is_pickup(),
        });
        id
    }

    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Heart first when eligible, otherwise a weighted draw
    fn select_kind(&mut self, ctx: &SpawnContext, tuning: &Tuning) -> ObstacleKind {
        let heart_armed = ctx.heart_threshold.is_some_and(|t| ctx.score >= t);
        if ctx.lives < tuning.lives_max && heart_armed && !self.has_heart() {
            return ObstacleKind::Heart;
        }

        let w = &tuning.weights;
        let r: f32 = self.rng.random();
        let mut edge = w.bomb;
        if r < edge {
            return ObstacleKind::Bomb;
        }
        edge += w.coin;
        if r < edge {
            return ObstacleKind::Coin;
        }
        edge += w.pit;
        if r < edge {
            return ObstacleKind::Pit;
        }
        edge += w.flying;
        if r < edge {
            return ObstacleKind::Flying;
        }
        ObstacleKind::Pillar
    }

    fn build(&mut self, kind: ObstacleKind, tuning: &Tuning) -> Obstacle {
        let o = &tuning.obstacles;
        let body_top = tuning.body_ground_y();
        let rng = &mut self.rng;

        let (y, width, height) = match kind {
            ObstacleKind::Heart => (o.heart_y, o.heart_size, o.heart_size),
            ObstacleKind::Bomb => {
                let airborne = rng.random_bool(f64::from(o.bomb_airborne_chance));
                let y = if airborne {
                    body_top - tuning.body_height - o.bomb_lift.sample(rng)
                } else {
                    body_top
                };
                (y, o.bomb_size, o.bomb_size)
            }
            ObstacleKind::Coin => {
                let y = body_top - tuning.body_height - o.coin_lift.sample(rng);
                (y, o.coin_size, o.coin_size)
            }
            ObstacleKind::Pit => {
                let width = o.pit_width.sample(rng);
                (tuning.ground_y(), width, tuning.ground_height)
            }
            ObstacleKind::Flying => {
                let height = o.flying_height.sample(rng);
                let width = o.flying_width.sample(rng);
                let y = body_top - height - o.flying_lift.sample(rng);
                (y, width, height)
            }
            ObstacleKind::Pillar => {
                let height = o.pillar_height.sample(rng);
                let width = o.pillar_width.sample(rng);
                (tuning.ground_y() - height, width, height)
            }
        };

        Obstacle {
            id: self.next_entity_id(),
            kind,
            x: tuning.field_width,
            y,
            width,
            height,
            passed: kind.is_pickup(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(score: u32, lives: u8, heart_threshold: Option<u32>) -> SpawnContext {
        SpawnContext {
            score,
            lives,
            heart_threshold,
        }
    }

    #[test]
    fn test_spawns_on_empty_field() {
        let tuning = Tuning::default();
        let mut field = ObstacleField::new(1);
        let kind = field.maybe_spawn(&ctx(0, 3, None), &tuning);
        assert!(kind.is_some());
        assert_eq!(field.len(), 1);
        assert_eq!(field.obstacles()[0].x, tuning.field_width);
        assert_ne!(kind, Some(ObstacleKind::Heart));
    }

    #[test]
    fn test_gap_blocks_spawn() {
        let tuning = Tuning::default();
        let mut field = ObstacleField::new(1);
        field.place(ObstacleKind::Pillar, tuning.field_width - 150.0, 600.0, 40.0, 40.0);
        assert_eq!(field.maybe_spawn(&ctx(0, 3, None), &tuning), None);

        // Past the maximum gap a spawn is guaranteed
        let mut field = ObstacleField::new(1);
        field.place(ObstacleKind::Pillar, tuning.field_width - 281.0, 600.0, 40.0, 40.0);
        assert!(field.maybe_spawn(&ctx(0, 3, None), &tuning).is_some());
    }

    #[test]
    fn test_heart_priority() {
        let tuning = Tuning::default();

        let mut field = ObstacleField::new(3);
        assert_eq!(
            field.maybe_spawn(&ctx(20, 2, Some(20)), &tuning),
            Some(ObstacleKind::Heart)
        );
        let heart = &field.obstacles()[0];
        assert_eq!(heart.y, tuning.obstacles.heart_y);
        assert!(heart.passed);
    }

    #[test]
    fn test_heart_requires_every_condition() {
        let tuning = Tuning::default();
        let not_heart = |c: SpawnContext| {
            let mut field = ObstacleField::new(3);
            field.maybe_spawn(&c, &tuning) != Some(ObstacleKind::Heart)
        };
        // Full lives
        assert!(not_heart(ctx(50, 3, Some(0))));
        // Threshold not reached
        assert!(not_heart(ctx(10, 2, Some(20))));
        // Disarmed
        assert!(not_heart(ctx(1000, 1, None)));

        // Heart already live
        let mut field = ObstacleField::new(3);
        field.place(ObstacleKind::Heart, 10.0, 300.0, 40.0, 40.0);
        assert_ne!(
            field.maybe_spawn(&ctx(30, 1, Some(0)), &tuning),
            Some(ObstacleKind::Heart)
        );
    }

    #[test]
    fn test_advance_and_cull() {
        let tuning = Tuning::default();
        let mut field = ObstacleField::new(1);
        let id = field.place(ObstacleKind::Pillar, 0.0, 600.0, 40.0, 40.0);
        field.place(ObstacleKind::Pit, 200.0, 640.0, 100.0, 60.0);

        field.advance(85.0, &tuning);
        assert_eq!(field.obstacles()[0].x, -85.0);
        assert_eq!(field.len(), 2);

        // -90 is exactly -(width + margin): dropped
        field.advance(5.0, &tuning);
        assert_eq!(field.len(), 1);
        assert!(field.obstacles().iter().all(|o| o.id != id));
    }

    #[test]
    fn test_pass_credit() {
        let tuning = Tuning::default();
        let mut field = ObstacleField::new(1);
        field.place(ObstacleKind::Pillar, 0.0, 600.0, 40.0, 40.0);
        field.place(ObstacleKind::Pit, -100.0, 640.0, 120.0, 60.0);
        field.place(ObstacleKind::Coin, -40.0, 450.0, 30.0, 30.0);
        field.place(ObstacleKind::Flying, 100.0, 450.0, 50.0, 40.0);

        // Pillar right edge 40 < 50, pit right edge 20 < 50; coin pre-credited
        assert_eq!(field.credit_passed(&tuning), 1 + 3);
        // Never credited twice
        assert_eq!(field.credit_passed(&tuning), 0);
    }

    #[test]
    fn test_pit_under() {
        let mut field = ObstacleField::new(1);
        field.place(ObstacleKind::Pit, 50.0, 640.0, 100.0, 60.0);
        assert!(field.pit_under(75.0));
        assert!(!field.pit_under(50.0));
        assert!(!field.pit_under(160.0));
    }

    #[test]
    fn test_ids_monotonic_and_order_kept() {
        let tuning = Tuning::default();
        let mut field = ObstacleField::new(9);
        let mut last_id = 0;
        for _ in 0..2000 {
            field.advance(4.0, &tuning);
            field.maybe_spawn(&ctx(0, 3, None), &tuning);
        }
        for o in field.obstacles() {
            assert!(o.id > last_id);
            last_id = o.id;
        }
        let removed = field.obstacles()[0].id;
        assert!(field.remove(removed).is_some());
        assert!(field.remove(removed).is_none());
    }

    #[test]
    fn test_placement_ranges() {
        let tuning = Tuning::default();
        let mut field = ObstacleField::new(42);
        let body_top = tuning.body_ground_y();

        for _ in 0..5000 {
            field.advance(10.0, &tuning);
            field.maybe_spawn(&ctx(0, 3, None), &tuning);
            let Some(o) = field.obstacles().last() else { continue };
            if o.x != tuning.field_width {
                continue;
            }
            match o.kind {
                ObstacleKind::Pillar => {
                    assert!((30.0..60.0).contains(&o.width));
                    assert!((40.0..120.0).contains(&o.height));
                    assert!((o.y + o.height - tuning.ground_y()).abs() < 1e-3);
                }
                ObstacleKind::Pit => {
                    assert!((100.0..150.0).contains(&o.width));
                    assert_eq!(o.y, tuning.ground_y());
                }
                ObstacleKind::Flying => {
                    let lift = body_top - o.height - o.y;
                    assert!((20.0 - 1e-3..80.0 + 1e-3).contains(&lift));
                }
                ObstacleKind::Coin => {
                    assert!(o.passed);
                    assert!(o.y < body_top - tuning.body_height);
                }
                ObstacleKind::Bomb => {
                    assert!(o.y == body_top || o.y < body_top - tuning.body_height);
                }
                ObstacleKind::Heart => panic!("heart spawned at full lives"),
            }
        }
    }

    #[test]
    fn test_kind_mix_follows_weights() {
        let tuning = Tuning::default();
        let mut field = ObstacleField::new(1234);
        let mut counts = std::collections::HashMap::new();
        let trials = 10_000;
        for _ in 0..trials {
            let kind = field.select_kind(&ctx(0, 3, None), &tuning);
            *counts.entry(kind).or_insert(0u32) += 1;
        }
        let share = |k: ObstacleKind| counts.get(&k).copied().unwrap_or(0) as f32 / trials as f32;
        assert!((share(ObstacleKind::Bomb) - 0.10).abs() < 0.03);
        assert!((share(ObstacleKind::Coin) - 0.35).abs() < 0.03);
        assert!((share(ObstacleKind::Pit) - 0.20).abs() < 0.03);
        assert!((share(ObstacleKind::Flying) - 0.15).abs() < 0.03);
        assert!((share(ObstacleKind::Pillar) - 0.20).abs() < 0.03);
    }
}
