//! Game state and core simulation types
//!
//! Everything the tick mutates lives in [`GameState`]. The presentation side
//! only ever sees a [`Snapshot`], an owned copy taken in one piece.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::collision::overlaps;
use crate::error::{EngineError, SettingsError};
use crate::settings::Settings;

/// Display colour tag of an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Colour {
    Red,
    Black,
    Yellow,
}

/// Whether the tick loop should keep going. `Finished` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RunState {
    #[default]
    Running,
    Finished,
}

/// Tick pacing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SpeedMode {
    #[default]
    Normal,
    Fast,
}

/// An axis-aligned rectangle in the playfield
///
/// `pos` is the top-left corner. `dir` components are always -1, 0 or 1.
/// An invisible entity keeps its geometry but takes no part in collision or
/// rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub pos: IVec2,
    size: IVec2,
    pub visible: bool,
    pub dir: IVec2,
    pub colour: Colour,
}

impl Entity {
    pub fn new(x: i32, y: i32, width: i32, height: i32, colour: Colour) -> Self {
        debug_assert!(width >= 0 && height >= 0);
        Self {
            pos: IVec2::new(x, y),
            size: IVec2::new(width, height),
            visible: true,
            dir: IVec2::ONE,
            colour,
        }
    }

    /// Same as [`Entity::new`] but with no direction of travel
    pub fn stationary(x: i32, y: i32, width: i32, height: i32, colour: Colour) -> Self {
        Self {
            dir: IVec2::ZERO,
            ..Self::new(x, y, width, height, colour)
        }
    }

    pub fn x(&self) -> i32 {
        self.pos.x
    }

    pub fn y(&self) -> i32 {
        self.pos.y
    }

    pub fn width(&self) -> i32 {
        self.size.x
    }

    pub fn height(&self) -> i32 {
        self.size.y
    }

    pub fn size(&self) -> IVec2 {
        self.size
    }

    /// Move `units` along each axis of the current direction
    pub fn step(&mut self, units: i32) {
        self.pos += self.dir * units;
    }

    /// Translate horizontally, ignoring direction
    pub fn shift_x(&mut self, dx: i32) {
        self.pos.x += dx;
    }

    pub fn flip_x(&mut self) {
        self.dir.x = -self.dir.x;
    }

    pub fn flip_y(&mut self) {
        self.dir.y = -self.dir.y;
    }

    /// True if the two rectangles overlap
    pub fn hit_by(&self, other: &Entity) -> bool {
        overlaps(self, other)
    }
}

/// Atomic read-only copy of the game for presentation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub ball: Entity,
    pub bat: Entity,
    /// All bricks in row-major order, destroyed ones with `visible == false`
    pub bricks: Vec<Entity>,
    pub score: i64,
    pub run_state: RunState,
    pub speed: SpeedMode,
    pub time_ticks: u64,
    /// Playfield size (width, height)
    pub playfield: IVec2,
}

impl Snapshot {
    pub fn visible_bricks(&self) -> impl Iterator<Item = &Entity> {
        self.bricks.iter().filter(|b| b.visible)
    }

    pub fn bricks_remaining(&self) -> usize {
        self.visible_bricks().count()
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    pub settings: Settings,
    pub ball: Entity,
    pub bat: Entity,
    /// Row-major brick wall, fixed at creation
    pub bricks: Vec<Entity>,
    pub score: i64,
    pub run_state: RunState,
    pub speed: SpeedMode,
    /// Simulation tick counter
    pub time_ticks: u64,
}

impl GameState {
    /// Lay out a fresh game: score 0, ball in the middle, bat near the
    /// bottom, full brick wall.
    pub fn new(settings: Settings) -> Result<Self, SettingsError> {
        settings.validate()?;

        let s = &settings;
        let ball = Entity::new(s.width / 2, s.height / 2, s.ball_size, s.ball_size, Colour::Red);
        let bat = Entity::stationary(
            s.width / 2,
            s.height - s.brick_height * 3 / 2,
            s.brick_width * 3,
            s.brick_height / 4,
            Colour::Black,
        );

        let mut bricks = Vec::with_capacity(s.brick_count());
        for row in 0..s.brick_rows as i32 {
            let y = s.wall_top + row * (s.brick_height + s.brick_separation);
            for col in 0..s.brick_columns as i32 {
                let x = s.brick_x_offset + col * (s.brick_width + s.brick_separation);
                bricks.push(Entity::stationary(
                    x,
                    y,
                    s.brick_width,
                    s.brick_height,
                    Colour::Yellow,
                ));
            }
        }

        log::debug!(
            "Laid out {}x{} playfield with {} bricks",
            s.width,
            s.height,
            bricks.len()
        );

        Ok(Self {
            settings,
            ball,
            bat,
            bricks,
            score: 0,
            run_state: RunState::Running,
            speed: SpeedMode::Normal,
            time_ticks: 0,
        })
    }

    pub fn is_finished(&self) -> bool {
        self.run_state == RunState::Finished
    }

    /// Add to the score, failing rather than wrapping
    pub fn add_to_score(&mut self, delta: i64) -> Result<(), EngineError> {
        self.score = self
            .score
            .checked_add(delta)
            .ok_or(EngineError::ScoreOverflow {
                score: self.score,
                delta,
            })?;
        Ok(())
    }

    /// Move the bat by `direction * bat_move`
    ///
    /// The move is applied only if the bat's new x stays within
    /// `[bat_min_x, bat_max_x]`; otherwise the bat stays put. Returns whether
    /// the bat moved.
    pub fn move_bat(&mut self, direction: i32) -> bool {
        let Some(delta) = direction.checked_mul(self.settings.bat_move) else {
            return false;
        };
        let Some(target) = self.bat.x().checked_add(delta) else {
            return false;
        };
        if delta == 0 || target < self.settings.bat_min_x || target > self.settings.bat_max_x {
            return false;
        }
        self.bat.shift_x(delta);
        true
    }

    /// Change run state. Once finished, the game cannot be resumed.
    pub fn set_run_state(&mut self, run_state: RunState) -> bool {
        if self.is_finished() || self.run_state == run_state {
            return false;
        }
        self.run_state = run_state;
        true
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            ball: self.ball,
            bat: self.bat,
            bricks: self.bricks.clone(),
            score: self.score,
            run_state: self.run_state,
            speed: self.speed,
            time_ticks: self.time_ticks,
            playfield: IVec2::new(self.settings.width, self.settings.height),
        }
    }
}
