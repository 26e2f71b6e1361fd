//! Fixed-step simulation tick
//!
//! One call advances the session by exactly one display frame. Per-tick
//! constants are not scaled by wall-clock time; the scheduler decides how
//! many ticks a frame gets.
//!
//! Phase order: timers, body physics, obstacle field, collisions, ledger.

use super::collision::{body_aabb, detect, resolve};
use super::difficulty::scroll_speed;
use super::obstacle::{ObstacleKind, SpawnContext};
use super::state::{Cue, GameState};
use super::timers::{TimerKind, Timers};
use crate::tuning::Tuning;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// One jump-request edge (tap, nod, voice: all the same here)
    pub jump: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, timers: &mut Timers, input: &TickInput, now_ms: u64, tuning: &Tuning) {
    for kind in timers.drain_due(now_ms) {
        apply_timer(state, kind);
    }

    // Hit-pause freezes the world until the player decides
    if !state.ledger.is_live() {
        return;
    }

    state.time_ticks += 1;

    // --- Body ---
    if input.jump && state.body.jump(tuning) {
        state.cues.push(Cue::Jump);
        timers.reschedule(TimerKind::ClearBodyAction, now_ms + tuning.jump_flag_ms);
    }
    let pit_under = state.field.pit_under(tuning.body_center_x());
    let step = state.body.integrate(tuning, pit_under);
    if step.landed {
        state.cues.push(Cue::Land);
        timers.reschedule(TimerKind::ClearBodyAction, now_ms + tuning.land_flag_ms);
    }

    // --- Obstacle field ---
    state.speed = scroll_speed(state.ledger.score(), tuning);
    state.field.advance(state.speed, tuning);

    let ctx = SpawnContext {
        score: state.ledger.score(),
        lives: state.ledger.lives(),
        heart_threshold: state.ledger.heart_threshold(),
    };
    if state.field.maybe_spawn(&ctx, tuning) == Some(ObstacleKind::Heart) {
        state.ledger.disarm_heart();
        log::debug!("Heart spawned at score {}", ctx.score);
    }

    let credit = state.field.credit_passed(tuning);
    if credit > 0 {
        state.ledger.credit(credit);
        state.backdrop.observe(state.ledger.score(), tuning);
    }

    // --- Collisions ---
    let contacts = detect(&body_aabb(state.body.y, tuning), state.field.obstacles());
    resolve(&contacts, &mut state.ledger, &mut state.field, tuning, &mut state.cues);

    // --- Ledger ---
    // Dropping out of the playfield counts like hitting an obstacle
    if step.fell_out && state.ledger.register_hit() {
        state.cues.push(Cue::Hit);
    }
}

fn apply_timer(state: &mut GameState, kind: TimerKind) {
    match kind {
        TimerKind::ClearBodyAction => state.body.action = None,
        TimerKind::EndInvincibility => state.ledger.end_invincibility(),
        TimerKind::EndGracePeriod => {
            if state.ledger.end_grace_period() {
                log::info!("Session {}: go!", state.session);
            }
        }
    }
}
