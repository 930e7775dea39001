//! Thread-safe state engine
//!
//! Wraps a [`GameState`] in a single mutex. Commands and snapshot reads take
//! the lock for their whole duration, and so does each tick, so a reader
//! never sees a half-updated frame. After every tick the registered change
//! observers run on the tick thread with the lock released, receiving the
//! tick number and what happened during that tick; they pull a snapshot if
//! they want one.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, RwLock};
use std::time::Duration;

use crate::error::EngineError;
use crate::settings::Settings;
use crate::sim::{GameEvent, GameState, RunState, Snapshot, SpeedMode, tick};
use crate::ticker::{Step, TaskHandle, spawn_periodic};

/// Name of the background tick thread
pub const TICK_THREAD_NAME: &str = "breakout-tick";

/// Change notification, called with the tick number just completed and the
/// events of that tick
pub type Observer = Arc<dyn Fn(u64, &[GameEvent]) + Send + Sync>;

struct Shared {
    state: Mutex<GameState>,
    observers: RwLock<Vec<Observer>>,
    started: AtomicBool,
}

/// Cloneable handle to one game session
#[derive(Clone)]
pub struct Engine {
    shared: Arc<Shared>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("started", &self.shared.started.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Validate `settings` and lay out a fresh game
    pub fn new(settings: Settings) -> Result<Self, EngineError> {
        let state = GameState::new(settings)?;
        Ok(Self {
            shared: Arc::new(Shared {
                state: Mutex::new(state),
                observers: RwLock::new(Vec::new()),
                started: AtomicBool::new(false),
            }),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, GameState>, EngineError> {
        self.shared.state.lock().map_err(|_| EngineError::StatePoisoned)
    }

    /// Register a change observer
    pub fn on_change<F>(&self, observer: F)
    where
        F: Fn(u64, &[GameEvent]) + Send + Sync + 'static,
    {
        let mut observers = self
            .shared
            .observers
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        observers.push(Arc::new(observer));
    }

    /// Atomic copy of the whole game
    pub fn snapshot(&self) -> Result<Snapshot, EngineError> {
        Ok(self.lock()?.snapshot())
    }

    /// Move the bat by `direction * bat_move` if it stays within range
    pub fn move_bat(&self, direction: i32) -> Result<bool, EngineError> {
        let mut state = self.lock()?;
        let moved = state.move_bat(direction);
        if moved {
            log::debug!("bat moved {direction} to x={}", state.bat.x());
        } else {
            log::debug!("bat move {direction} rejected at x={}", state.bat.x());
        }
        Ok(moved)
    }

    /// Switch between normal and fast pacing; used from the next sleep on
    pub fn set_speed(&self, speed: SpeedMode) -> Result<(), EngineError> {
        let mut state = self.lock()?;
        if state.speed != speed {
            log::info!("speed set to {speed:?}");
            state.speed = speed;
        }
        Ok(())
    }

    pub fn speed(&self) -> Result<SpeedMode, EngineError> {
        Ok(self.lock()?.speed)
    }

    /// Change the run state. `Finished` is terminal.
    pub fn set_run_state(&self, run_state: RunState) -> Result<(), EngineError> {
        let mut state = self.lock()?;
        if state.set_run_state(run_state) {
            log::info!("run state set to {run_state:?} (score {})", state.score);
        } else if state.is_finished() && run_state == RunState::Running {
            log::warn!("game already finished, cannot resume");
        }
        Ok(())
    }

    pub fn run_state(&self) -> Result<RunState, EngineError> {
        Ok(self.lock()?.run_state)
    }

    /// Finish the game
    pub fn stop(&self) -> Result<(), EngineError> {
        self.set_run_state(RunState::Finished)
    }

    /// Sleep interval for the current speed mode
    pub fn current_interval(&self) -> Duration {
        match self.lock() {
            Ok(state) => state.settings.interval(state.speed),
            // The loop is about to end on the same error; any short value works
            Err(_) => Duration::from_millis(Settings::default().normal_interval_ms),
        }
    }

    /// One loop iteration: tick under the lock, then notify observers
    pub fn step(&self) -> Result<Step, EngineError> {
        let (time_ticks, events) = {
            let mut state = self.lock()?;
            if state.is_finished() {
                log::info!(
                    "game finished after {} ticks with score {}",
                    state.time_ticks,
                    state.score
                );
                return Ok(Step::Finish);
            }
            let events = tick(&mut state)?;
            log::trace!(
                "tick {}: ball {:?} dir {:?}",
                state.time_ticks,
                state.ball.pos,
                state.ball.dir
            );
            (state.time_ticks, events)
        };

        self.notify(time_ticks, &events);
        Ok(Step::Continue)
    }

    fn notify(&self, time_ticks: u64, events: &[GameEvent]) {
        let observers: Vec<Observer> = self
            .shared
            .observers
            .read()
            .map(|observers| observers.to_vec())
            .unwrap_or_else(|poisoned| poisoned.into_inner().to_vec());
        for observer in &observers {
            observer(time_ticks, events);
        }
    }

    /// Start the background tick loop
    ///
    /// Each engine runs at most one loop. The loop exits once the game is
    /// finished, or on the first tick fault, which it logs.
    pub fn start(&self) -> Result<TaskHandle, EngineError> {
        if self.shared.started.swap(true, Ordering::AcqRel) {
            return Err(EngineError::AlreadyStarted);
        }

        let interval_engine = self.clone();
        let step_engine = self.clone();
        spawn_periodic(
            TICK_THREAD_NAME,
            move || interval_engine.current_interval(),
            move || step_engine.step(),
        )
        .map_err(EngineError::Spawn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec2;
    use std::sync::atomic::AtomicU64;

    fn engine() -> Engine {
        Engine::new(Settings::default()).unwrap()
    }

    #[test]
    fn test_new_rejects_bad_settings() {
        let settings = Settings {
            height: 0,
            ..Settings::default()
        };
        assert!(matches!(
            Engine::new(settings),
            Err(EngineError::InvalidSettings(_))
        ));
    }

    #[test]
    fn test_snapshot_before_first_tick() {
        let snap = engine().snapshot().unwrap();
        assert_eq!(snap.time_ticks, 0);
        assert_eq!(snap.score, 0);
        assert_eq!(snap.bricks.len(), 44);
        assert_eq!(snap.ball.pos, IVec2::new(300, 400));
    }

    #[test]
    fn test_step_ticks_and_notifies() {
        let engine = engine();
        let seen = Arc::new(AtomicU64::new(0));
        let observer_seen = Arc::clone(&seen);
        engine.on_change(move |t, _| observer_seen.store(t, Ordering::SeqCst));

        assert_eq!(engine.step().unwrap(), Step::Continue);
        assert_eq!(engine.step().unwrap(), Step::Continue);
        assert_eq!(seen.load(Ordering::SeqCst), 2);
        assert_eq!(engine.snapshot().unwrap().ball.pos, IVec2::new(308, 408));
    }

    #[test]
    fn test_observer_can_pull_snapshot() {
        let engine = engine();
        let score = Arc::new(AtomicU64::new(u64::MAX));
        let observer_engine = engine.clone();
        let observer_score = Arc::clone(&score);
        engine.on_change(move |_, _| {
            let snap = observer_engine.snapshot().unwrap();
            observer_score.store(snap.time_ticks, Ordering::SeqCst);
        });
        engine.step().unwrap();
        assert_eq!(score.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_observers_receive_tick_events() {
        let engine = engine();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let observer_seen = Arc::clone(&seen);
        engine.on_change(move |t, events| {
            observer_seen.lock().unwrap().push((t, events.to_vec()));
        });

        // Next move lands on the right wall
        engine.lock().unwrap().ball.pos = IVec2::new(560, 400);
        engine.step().unwrap();
        // Free space
        engine.step().unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![(1, vec![GameEvent::SideWall]), (2, Vec::new())]
        );
    }

    #[test]
    fn test_observers_see_brick_destruction() {
        let engine = engine();
        let destroyed = Arc::new(Mutex::new(Vec::new()));
        let observer_destroyed = Arc::clone(&destroyed);
        engine.on_change(move |_, events| {
            let mut destroyed = observer_destroyed.lock().unwrap();
            for event in events {
                if let GameEvent::BrickDestroyed(index) = event {
                    destroyed.push(*index);
                }
            }
        });

        // Moving up-right into the first brick of the bottom row
        {
            let mut state = engine.lock().unwrap();
            state.ball.pos = IVec2::new(16, 224);
            state.ball.dir = IVec2::new(1, -1);
        }
        engine.step().unwrap();

        assert_eq!(*destroyed.lock().unwrap(), vec![33]);
        assert_eq!(engine.snapshot().unwrap().score, 50);
    }

    #[test]
    fn test_stop_finishes_step() {
        let engine = engine();
        engine.stop().unwrap();
        assert_eq!(engine.step().unwrap(), Step::Finish);
        assert_eq!(engine.snapshot().unwrap().time_ticks, 0);

        engine.set_run_state(RunState::Running).unwrap();
        assert_eq!(engine.run_state().unwrap(), RunState::Finished);
    }

    #[test]
    fn test_speed_changes_interval() {
        let engine = engine();
        assert_eq!(engine.current_interval(), Duration::from_millis(20));
        engine.set_speed(SpeedMode::Fast).unwrap();
        assert_eq!(engine.speed().unwrap(), SpeedMode::Fast);
        assert_eq!(engine.current_interval(), Duration::from_millis(10));
        engine.set_speed(SpeedMode::Normal).unwrap();
        assert_eq!(engine.current_interval(), Duration::from_millis(20));
    }

    #[test]
    fn test_speed_is_independent_of_run_state() {
        let engine = engine();
        engine.stop().unwrap();
        engine.set_speed(SpeedMode::Fast).unwrap();
        assert_eq!(engine.speed().unwrap(), SpeedMode::Fast);
        assert_eq!(engine.run_state().unwrap(), RunState::Finished);
    }

    #[test]
    fn test_move_bat_through_engine() {
        let engine = engine();
        assert!(engine.move_bat(1).unwrap());
        assert_eq!(engine.snapshot().unwrap().bat.x(), 305);
        assert!(!engine.move_bat(100).unwrap());
        assert_eq!(engine.snapshot().unwrap().bat.x(), 305);
    }

    #[test]
    fn test_start_twice_is_rejected() {
        let engine = engine();
        engine.stop().unwrap();
        let handle = engine.start().unwrap();
        assert!(matches!(engine.start(), Err(EngineError::AlreadyStarted)));
        handle.join();
    }

    #[test]
    fn test_score_overflow_stops_loop() {
        let engine = engine();
        {
            let mut state = engine.lock().unwrap();
            for brick in &mut state.bricks {
                brick.visible = false;
            }
            state.score = i64::MIN + 1;
            state.ball.pos = IVec2::new(40, 760);
        }
        let handle = engine.start().unwrap();
        handle.join();

        // Loop ended on the fault; the game itself was never finished
        let snap = engine.snapshot().unwrap();
        assert_eq!(snap.run_state, RunState::Running);
        assert_eq!(snap.time_ticks, 1);
    }
}
