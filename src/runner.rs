//! Display-frame scheduling
//!
//! The simulation is fixed-step: every tick is one nominal frame. The
//! runner converts variable frame callbacks into a whole number of ticks
//! with an accumulator, so game speed does not depend on refresh rate.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use crate::consts::MAX_SUBSTEPS;
use crate::engine::Engine;
use crate::input::JumpSource;
use crate::snapshot::Snapshot;

/// Longest frame gap honoured; anything longer (tab switch, debugger) is clamped
pub const MAX_FRAME_DELTA_MS: f64 = 100.0;

/// Monotonic millisecond clock
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Wall-clock time since construction
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Hand-driven clock for tests and headless runs
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, now_ms: u64) {
        self.now.store(now_ms, Ordering::Relaxed);
    }

    pub fn advance(&self, delta_ms: u64) -> u64 {
        self.now.fetch_add(delta_ms, Ordering::Relaxed) + delta_ms
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::Relaxed)
    }
}

/// Drives an [`Engine`] from display-frame callbacks
pub struct FrameRunner<S: JumpSource> {
    source: S,
    accumulator: f64,
    last_frame_ms: Option<u64>,
    stopped: bool,
}

impl<S: JumpSource> FrameRunner<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            accumulator: 0.0,
            last_frame_ms: None,
            stopped: false,
        }
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Run however many ticks this frame owes and return the newest snapshot
    pub fn frame(&mut self, engine: &mut Engine, now_ms: u64) -> Arc<Snapshot> {
        if self.stopped {
            return engine.snapshot();
        }

        let tick_ms = engine.tuning().frame_ms();
        let delta = match self.last_frame_ms {
            // First frame owes exactly one tick
            None => tick_ms,
            Some(last) => now_ms.saturating_sub(last) as f64,
        };
        self.last_frame_ms = Some(now_ms);
        self.accumulator += delta.min(MAX_FRAME_DELTA_MS);

        let mut snapshot = engine.snapshot();
        let mut substeps = 0;
        while self.accumulator >= tick_ms && substeps < MAX_SUBSTEPS {
            if self.source.poll(now_ms, &snapshot) {
                engine.request_jump();
            }
            snapshot = engine.advance_tick(now_ms);
            self.accumulator -= tick_ms;
            substeps += 1;
        }
        snapshot
    }

    /// Stop scheduling and halt the engine (navigating away, shutting down)
    pub fn stop(&mut self, engine: &mut Engine) {
        self.stopped = true;
        self.accumulator = 0.0;
        engine.halt();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tuning;
    use crate::input::{NoInput, TapLatch};

    #[test]
    fn test_manual_clock() {
        let clock = ManualClock::new();
        assert_eq!(clock.now_ms(), 0);
        assert_eq!(clock.advance(17), 17);
        clock.set(1_000);
        assert_eq!(clock.now_ms(), 1_000);
    }

    #[test]
    fn test_monotonic_clock_never_goes_back() {
        let clock = MonotonicClock::new();
        let mut last = clock.now_ms();
        for _ in 0..1_000 {
            let now = clock.now_ms();
            assert!(now >= last);
            last = now;
        }
        std::thread::sleep(std::time::Duration::from_millis(5));
        assert!(clock.now_ms() >= 5);
    }

    #[test]
    fn test_ticks_follow_elapsed_time() {
        let mut engine = Engine::new(Tuning::default(), 3);
        engine.start(0);
        let mut runner = FrameRunner::new(NoInput);

        // 60 Hz display: one tick per frame
        let mut now = 0;
        for _ in 0..60 {
            now += 17;
            runner.frame(&mut engine, now);
        }
        let at_60hz = engine.snapshot().tick;
        assert!((58..=61).contains(&at_60hz), "got {at_60hz}");

        // 30 Hz display over the same span: still about one tick per 16.7 ms
        let mut engine = Engine::new(Tuning::default(), 3);
        engine.start(0);
        let mut runner = FrameRunner::new(NoInput);
        let mut now = 0;
        for _ in 0..30 {
            now += 34;
            runner.frame(&mut engine, now);
        }
        let at_30hz = engine.snapshot().tick;
        assert!((58..=62).contains(&at_30hz), "got {at_30hz}");
    }

    #[test]
    fn test_long_gap_is_clamped() {
        let mut engine = Engine::new(Tuning::default(), 3);
        engine.start(0);
        let mut runner = FrameRunner::new(NoInput);
        runner.frame(&mut engine, 0);
        let snap = runner.frame(&mut engine, 60_000);
        assert!(snap.tick <= 1 + u64::from(MAX_SUBSTEPS));
    }

    #[test]
    fn test_tap_reaches_engine() {
        let mut engine = Engine::new(Tuning::default(), 3);
        engine.start(0);
        let tap = TapLatch::new();
        let mut runner = FrameRunner::new(tap.clone());
        tap.tap();
        let snap = runner.frame(&mut engine, 0);
        assert_eq!(snap.body.jumps_used, 1);
    }

    #[test]
    fn test_stop_halts_engine() {
        let mut engine = Engine::new(Tuning::default(), 3);
        engine.start(0);
        let mut runner = FrameRunner::new(NoInput);
        runner.frame(&mut engine, 0);
        runner.stop(&mut engine);
        assert!(runner.is_stopped());
        assert!(engine.is_halted());
        let tick = engine.snapshot().tick;
        assert_eq!(runner.frame(&mut engine, 1_000).tick, tick);
    }
}
