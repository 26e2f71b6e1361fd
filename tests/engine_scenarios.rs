//! Session scenarios driven through the public engine surface

use std::sync::{Arc, Mutex};

use dino_nod::sim::{ContinueOutcome, Cue, EndReason, ObstacleKind, SessionPhase};
use dino_nod::{Engine, EngineObserver, Tuning};

#[derive(Default, Clone)]
struct Recorder {
    cues: Arc<Mutex<Vec<Cue>>>,
    game_overs: Arc<Mutex<Vec<u32>>>,
}

impl EngineObserver for Recorder {
    fn on_cue(&mut self, cue: Cue) {
        self.cues.lock().unwrap().push(cue);
    }

    fn on_game_over(&mut self, final_score: u32) {
        self.game_overs.lock().unwrap().push(final_score);
    }
}

/// Engine past its grace period, plus the time it is at
fn running_engine(seed: u64) -> (Engine, Recorder, u64) {
    let recorder = Recorder::default();
    let mut engine = Engine::new(Tuning::default(), seed).with_observer(recorder.clone());
    engine.start(0);
    let now = engine.tuning().grace_period_ms;
    engine.advance_tick(now);
    assert_eq!(engine.phase(), Some(SessionPhase::Running));
    (engine, recorder, now)
}

fn place(engine: &mut Engine, kind: ObstacleKind, x: f32, y: f32, width: f32, height: f32) -> u32 {
    engine
        .state_mut()
        .map(|state| state.field.place(kind, x, y, width, height))
        .expect("session started")
}

fn place_pillar(engine: &mut Engine) -> u32 {
    place(engine, ObstacleKind::Pillar, 95.0, 560.0, 30.0, 80.0)
}

fn credit(engine: &mut Engine, points: u32) {
    if let Some(state) = engine.state_mut() {
        state.ledger.credit(points);
    }
}

#[test]
fn test_fresh_session_defaults() {
    let mut engine = Engine::new(Tuning::default(), 7);
    engine.start(0);
    let snap = engine.snapshot();
    assert_eq!(snap.phase, Some(SessionPhase::GracePeriod));
    assert_eq!(snap.score, 0);
    assert_eq!(snap.lives, 3);
    assert_eq!(snap.lives_max, 3);
    assert_eq!(snap.continue_penalty, 0);
    assert!(!snap.invincible);
    assert_eq!(snap.body.jumps_used, 0);
    assert!(snap.body.on_ground);

    let state = engine.state().expect("session");
    assert_eq!(state.ledger.score_penalty(), 5);
    assert_eq!(state.ledger.heart_threshold(), None);
}

#[test]
fn test_pass_then_hit_then_continue() {
    let (mut engine, recorder, now) = running_engine(11);

    for i in 0..9 {
        place(&mut engine, ObstacleKind::Flying, -30.0 - i as f32, 10.0, 50.0, 20.0);
    }
    let snap = engine.advance_tick(now + 16);
    assert_eq!(snap.score, 9);

    place_pillar(&mut engine);
    let snap = engine.advance_tick(now + 32);
    assert_eq!(snap.phase, Some(SessionPhase::HitPaused));
    assert!(snap.cues.contains(&Cue::Hit));

    let outcome = engine.continue_after_hit(now + 40);
    let invincible_until = now + 40 + engine.tuning().invincibility_ms;
    assert_eq!(outcome, Some(ContinueOutcome::Resumed { invincible_until }));

    let snap = engine.snapshot();
    assert_eq!(snap.phase, Some(SessionPhase::Running));
    assert_eq!(snap.lives, 2);
    assert_eq!(snap.score, 9);
    assert!(snap.invincible);
    assert!(snap.cues.contains(&Cue::Lose));
    assert!(recorder.cues.lock().unwrap().contains(&Cue::Lose));

    // Still overlapping the pillar, but invincible
    let snap = engine.advance_tick(now + 48);
    assert_eq!(snap.phase, Some(SessionPhase::Running));

    let snap = engine.advance_tick(invincible_until);
    assert!(!snap.invincible);
}

#[test]
fn test_continue_charges_penalty() {
    let (mut engine, _recorder, now) = running_engine(12);
    credit(&mut engine, 12);
    place_pillar(&mut engine);
    let snap = engine.advance_tick(now + 16);
    assert_eq!(snap.phase, Some(SessionPhase::HitPaused));
    assert_eq!(snap.continue_penalty, 5);

    engine.continue_after_hit(now + 20);
    let snap = engine.snapshot();
    assert_eq!(snap.score, 7);
    assert_eq!(snap.lives, 2);
    assert_eq!(engine.state().map(|s| s.ledger.score_penalty()), Some(10));
    // Below the minimum score no penalty would be charged
    assert_eq!(snap.continue_penalty, 0);
}

#[test]
fn test_last_life_ends_session() {
    let (mut engine, recorder, mut now) = running_engine(13);

    for round in 0..3 {
        let id = place_pillar(&mut engine);
        now += 16;
        let snap = engine.advance_tick(now);
        assert_eq!(snap.phase, Some(SessionPhase::HitPaused), "round {round}");
        engine.state_mut().and_then(|s| s.field.remove(id));

        now += 16;
        match engine.continue_after_hit(now) {
            Some(ContinueOutcome::Resumed { invincible_until }) => {
                assert!(round < 2);
                now = invincible_until;
                let snap = engine.advance_tick(now);
                assert!(!snap.invincible);
            }
            Some(ContinueOutcome::Ended { final_score }) => {
                assert_eq!(round, 2);
                assert_eq!(final_score, 0);
            }
            None => panic!("continue refused in round {round}"),
        }
    }

    let snap = engine.snapshot();
    assert_eq!(snap.phase, Some(SessionPhase::Ended));
    assert_eq!(snap.end_reason, Some(EndReason::LivesExhausted));
    assert_eq!(snap.lives, 0);
    assert_eq!(engine.pending_timers(), 0);

    // Further ticks and continues change nothing and never re-report
    engine.advance_tick(now + 1_000);
    assert_eq!(engine.continue_after_hit(now + 1_000), None);
    assert_eq!(*recorder.game_overs.lock().unwrap(), vec![0]);
    let loses = recorder.cues.lock().unwrap().iter().filter(|c| **c == Cue::Lose).count();
    assert_eq!(loses, 3);
}

#[test]
fn test_bomb_beats_pillar() {
    let (mut engine, recorder, now) = running_engine(14);
    credit(&mut engine, 20);
    let ground = engine.tuning().body_ground_y();
    place(&mut engine, ObstacleKind::Pillar, 60.0, 560.0, 30.0, 80.0);
    place(&mut engine, ObstacleKind::Bomb, 60.0, ground, 40.0, 40.0);

    let snap = engine.advance_tick(now + 16);
    assert_eq!(snap.phase, Some(SessionPhase::Ended));
    assert_eq!(snap.end_reason, Some(EndReason::Bomb));
    assert!(snap.cues.contains(&Cue::Bomb));
    assert!(!snap.cues.contains(&Cue::Hit));
    assert_eq!(*recorder.game_overs.lock().unwrap(), vec![20]);
}

#[test]
fn test_quit_after_hit() {
    let (mut engine, recorder, now) = running_engine(15);
    credit(&mut engine, 3);
    place_pillar(&mut engine);
    engine.advance_tick(now + 16);

    assert!(engine.quit_after_hit());
    assert!(!engine.quit_after_hit());
    let snap = engine.snapshot();
    assert_eq!(snap.end_reason, Some(EndReason::Quit));
    assert_eq!(snap.lives, 3);
    assert_eq!(*recorder.game_overs.lock().unwrap(), vec![3]);
}

#[test]
fn test_jump_budget() {
    let (mut engine, recorder, now) = running_engine(16);

    for i in 1..=3u8 {
        assert!(engine.request_jump(), "jump {i}");
        let snap = engine.advance_tick(now + 16 * u64::from(i));
        assert_eq!(snap.body.jumps_used, i);
        assert!(!snap.body.on_ground);
    }
    assert!(!engine.request_jump());

    let jumps = recorder.cues.lock().unwrap().iter().filter(|c| **c == Cue::Jump).count();
    assert_eq!(jumps, 3);

    // Landing restores the budget
    let mut t = now + 100;
    for _ in 0..200 {
        t += 16;
        if engine.advance_tick(t).body.on_ground {
            break;
        }
    }
    let snap = engine.snapshot();
    assert!(snap.body.on_ground);
    assert_eq!(snap.body.jumps_used, 0);
    assert!(engine.request_jump());
}

#[test]
fn test_jump_refused_while_hit_paused() {
    let (mut engine, _recorder, now) = running_engine(17);
    place_pillar(&mut engine);
    engine.advance_tick(now + 16);
    assert_eq!(engine.phase(), Some(SessionPhase::HitPaused));
    assert!(!engine.request_jump());
}

#[test]
fn test_same_seed_same_run() {
    let run = |seed: u64| {
        let mut engine = Engine::new(Tuning::default(), seed);
        engine.start(0);
        let mut snaps = Vec::new();
        for i in 0..400u64 {
            if i % 45 == 0 {
                engine.request_jump();
            }
            snaps.push(engine.advance_tick(i * 17));
        }
        snaps
    };
    assert_eq!(run(2024), run(2024));
}

#[test]
fn test_snapshots_readable_from_other_thread() {
    let (mut engine, _recorder, now) = running_engine(18);
    let cell = engine.snapshot_cell();

    let reader = std::thread::spawn(move || {
        let mut last_tick = 0;
        for _ in 0..2_000 {
            let snap = cell.load();
            assert!(snap.tick >= last_tick);
            assert!(snap.lives <= snap.lives_max);
            assert!(snap.obstacles.windows(2).all(|w| w[0].id < w[1].id));
            last_tick = snap.tick;
        }
    });

    for i in 1..=500u64 {
        engine.advance_tick(now + i * 17);
    }
    reader.join().expect("reader thread");
}
