//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order, monotonic ids)
//! - No rendering, audio or platform dependencies

pub mod body;
pub mod collision;
pub mod difficulty;
pub mod ledger;
pub mod obstacle;
pub mod state;
pub mod tick;
pub mod timers;

pub use body::{BodyAction, BodyStep, PlayerBody};
pub use collision::{Aabb, Contacts, body_aabb, detect, resolve};
pub use difficulty::{Backdrop, scroll_speed};
pub use ledger::{ContinueOutcome, EndReason, SessionLedger, SessionPhase};
pub use obstacle::{Obstacle, ObstacleField, ObstacleKind, SpawnContext};
pub use state::{Cue, GameState};
pub use tick::{TickInput, tick};
pub use timers::{TimerHandle, TimerKind, Timers};
