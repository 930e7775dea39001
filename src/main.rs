//! Brick Breaker entry point
//!
//! Runs a headless session: the tick loop runs on its own thread while the
//! main thread plays the part of the event thread, steering the bat toward
//! the ball through the input router. Each change notification rebuilds the
//! display list a real backend would draw.
//!
//! Usage: `breakout [settings.json]`

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use brick_breaker::{
    DisplayList, Engine, EngineError, GameEvent, InputRouter, Key, Settings, Snapshot, TaskHandle,
};
use glam::IVec2;

/// How long the demo plays before pressing stop
const DEMO_DURATION: Duration = Duration::from_secs(30);
/// Switch to fast mode after this long
const FAST_AFTER: Duration = Duration::from_secs(10);
/// How often the autopilot looks at the game
const POLL_INTERVAL: Duration = Duration::from_millis(15);

fn main() {
    env_logger::init();
    log::info!("Brick Breaker (headless) starting...");

    if let Err(err) = run() {
        log::error!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), EngineError> {
    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    let router = InputRouter::new(&settings);
    let playfield = IVec2::new(settings.width, settings.height);
    let engine = Engine::new(settings)?;

    // What a backend would show while the window opens
    let splash = DisplayList::empty(playfield);
    log::debug!("splash frame has {} draw commands", splash.len());

    let frames = Arc::new(AtomicU64::new(0));
    let bottom_hits = Arc::new(AtomicU64::new(0));
    {
        let frames = Arc::clone(&frames);
        let bottom_hits = Arc::clone(&bottom_hits);
        let view_engine = engine.clone();
        engine.on_change(move |time_ticks, events| {
            for event in events {
                match event {
                    GameEvent::BrickDestroyed(index) => {
                        log::debug!("tick {time_ticks}: brick {index} destroyed");
                    }
                    GameEvent::Bottom => {
                        bottom_hits.fetch_add(1, Ordering::Relaxed);
                    }
                    _ => {}
                }
            }

            let snapshot = view_engine.snapshot().ok();
            let list = DisplayList::build_or_empty(snapshot.as_ref(), playfield);
            frames.fetch_add(1, Ordering::Relaxed);
            if let Some(snapshot) = snapshot.filter(|_| time_ticks % 250 == 0) {
                log::info!(
                    "tick {time_ticks}: score {} with {} bricks left ({} draw commands)",
                    snapshot.score,
                    snapshot.bricks_remaining(),
                    list.len()
                );
            }
        });
    }

    let handle = engine.start()?;
    if let Err(err) = play(&engine, &router, &handle) {
        handle.cancel();
        handle.join();
        return Err(err);
    }
    handle.join();

    let snapshot = engine.snapshot()?;
    log::info!(
        "Final score {} after {} ticks, {} of {} bricks destroyed, {} bottom hits, {} frames built",
        snapshot.score,
        snapshot.time_ticks,
        snapshot.bricks.len() - snapshot.bricks_remaining(),
        snapshot.bricks.len(),
        bottom_hits.load(Ordering::Relaxed),
        frames.load(Ordering::Relaxed)
    );
    Ok(())
}

/// Steer the bat until the wall is cleared or the demo time runs out
fn play(engine: &Engine, router: &InputRouter, handle: &TaskHandle) -> Result<(), EngineError> {
    let started = Instant::now();
    let mut fast = false;

    while !handle.is_finished() {
        let snapshot = engine.snapshot()?;
        if snapshot.bricks_remaining() == 0 || started.elapsed() >= DEMO_DURATION {
            router.handle_key(Key::Stop, engine)?;
            return Ok(());
        }
        if !fast && started.elapsed() >= FAST_AFTER {
            router.handle_key(Key::Fast, engine)?;
            fast = true;
        }
        if let Some(key) = autopilot(&snapshot) {
            router.handle_key(key, engine)?;
        }
        thread::sleep(POLL_INTERVAL);
    }
    Ok(())
}

/// Press toward the ball when the bat centre is more than a key step away
fn autopilot(snapshot: &Snapshot) -> Option<Key> {
    let ball_centre = snapshot.ball.x() + snapshot.ball.width() / 2;
    let bat_centre = snapshot.bat.x() + snapshot.bat.width() / 2;
    let gap = ball_centre - bat_centre;
    if gap > snapshot.bat.width() / 4 {
        Some(Key::Right)
    } else if gap < -snapshot.bat.width() / 4 {
        Some(Key::Left)
    } else {
        None
    }
}
