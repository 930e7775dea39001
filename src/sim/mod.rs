//! Simulation module
//!
//! All gameplay logic lives here. Nothing in this module knows about threads,
//! timing or rendering:
//! - Integer positions, fixed step per tick
//! - Collision rules resolved in a fixed order
//! - Stable brick order (row-major)

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::{WallContact, overlaps, wall_contact};
pub use state::{Colour, Entity, GameState, RunState, Snapshot, SpeedMode};
pub use tick::{GameEvent, tick};
