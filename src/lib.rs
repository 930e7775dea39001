//! Brick Breaker - the classic Breakout game engine
//!
//! Core modules:
//! - `sim`: Simulation (entities, collisions, tick)
//! - `engine`: Thread-safe state engine and its background tick loop
//! - `ticker`: Cancellable periodic task
//! - `input`: Key to command routing
//! - `renderer`: Backend-independent display list
//! - `settings`: Layout, physics and scoring tunables

pub mod engine;
pub mod error;
pub mod input;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod ticker;

pub use engine::Engine;
pub use error::{EngineError, SettingsError};
pub use input::{Command, InputRouter, Key};
pub use renderer::{DisplayList, DrawCommand};
pub use settings::Settings;
pub use sim::{Colour, Entity, GameEvent, RunState, Snapshot, SpeedMode};
pub use ticker::{Step, TaskHandle};
