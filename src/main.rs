//! Dino Nod headless entry point
//!
//! Runs one autopiloted session on a manual clock and reports the result.
//!
//! Usage: `dino-nod [seed] [tuning.json]`

use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result, bail};

use dino_nod::input::Autopilot;
use dino_nod::runner::{Clock, FrameRunner, ManualClock};
use dino_nod::sim::{ContinueOutcome, Cue, SessionPhase};
use dino_nod::{Engine, EngineObserver, HighScores, Tuning};

/// Stop after this many frames even if the autopilot never loses
const MAX_FRAMES: u32 = 60 * 60 * 10;

/// Simulated display interval
const FRAME_INTERVAL_MS: u64 = 17;

struct CueLog;

impl EngineObserver for CueLog {
    fn on_cue(&mut self, cue: Cue) {
        log::debug!("cue: {:?}", cue);
    }

    fn on_game_over(&mut self, final_score: u32) {
        log::info!("Game over, final score {}", final_score);
    }
}

fn parse_args() -> Result<(u64, Tuning)> {
    let mut args = std::env::args().skip(1);

    let seed = match args.next() {
        Some(raw) => raw
            .parse::<u64>()
            .with_context(|| format!("invalid seed {raw:?}"))?,
        None => 42,
    };

    let tuning = match args.next() {
        Some(path) => Tuning::load(&path).with_context(|| format!("loading tuning from {path}"))?,
        None => Tuning::default(),
    };

    if args.next().is_some() {
        bail!("usage: dino-nod [seed] [tuning.json]");
    }
    Ok((seed, tuning))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let (seed, tuning) = parse_args()?;
    log::info!("Dino Nod (headless) starting with seed {}", seed);

    let clock = ManualClock::new();
    let mut engine = Engine::new(tuning, seed).with_observer(CueLog);
    let mut runner = FrameRunner::new(Autopilot::default());

    engine.start(clock.now_ms());

    let mut frames = 0;
    while frames < MAX_FRAMES {
        let now = clock.advance(FRAME_INTERVAL_MS);
        let snapshot = runner.frame(&mut engine, now);
        frames += 1;

        match snapshot.phase {
            Some(SessionPhase::HitPaused) => {
                log::info!(
                    "Hit at score {}, {} lives left, continuing for {} points",
                    snapshot.score,
                    snapshot.lives,
                    snapshot.continue_penalty
                );
                if let Some(ContinueOutcome::Ended { final_score }) =
                    engine.continue_after_hit(clock.now_ms())
                {
                    log::info!("Out of lives at {}", final_score);
                }
            }
            Some(SessionPhase::Ended) | None => break,
            Some(SessionPhase::GracePeriod | SessionPhase::Running) => {}
        }
    }

    if engine.phase().is_some_and(|phase| phase != SessionPhase::Ended) {
        log::info!("Frame cap reached, quitting");
        engine.quit();
    }

    let snapshot = engine.snapshot();
    runner.stop(&mut engine);

    let timestamp_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis() as u64);
    let mut scores = HighScores::new();
    let rank = scores.add_score("Autopilot", snapshot.score, timestamp_ms);

    println!("seed:        {}", seed);
    println!("ticks:       {}", snapshot.tick);
    println!("final score: {}", snapshot.score);
    println!("ended by:    {:?}", snapshot.end_reason);
    match rank {
        Some(rank) => println!("rank:        #{}", rank),
        None => println!("rank:        unranked"),
    }
    log::debug!("leaderboard: {}", scores.to_json()?);

    Ok(())
}
