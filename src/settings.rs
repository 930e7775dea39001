//! Game settings
//!
//! Every layout, physics and scoring tunable lives here. Settings are plain
//! data: build them with `Default`, or load them from JSON where any missing
//! field falls back to its default.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;
use crate::sim::SpeedMode;

/// Largest accepted playfield width or height
pub const MAX_PLAYFIELD: i32 = 16_384;
/// Largest accepted number of brick rows or columns
pub const MAX_BRICK_GRID: u32 = 256;

/// Game settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Playfield ===
    /// Playfield width in pixels
    pub width: i32,
    /// Playfield height in pixels
    pub height: i32,
    /// Border round the edge of the playfield
    pub border: i32,
    /// Height of the menu bar space at the top
    pub menu_height: i32,

    // === Ball ===
    pub ball_size: i32,
    /// Units the ball moves along each axis per tick
    pub ball_move: i32,

    // === Bricks ===
    pub brick_width: i32,
    pub brick_height: i32,
    /// Gap between neighbouring bricks
    pub brick_separation: i32,
    /// Left margin of the first brick column
    pub brick_x_offset: i32,
    /// How far down the playfield the wall starts
    pub wall_top: i32,
    pub brick_rows: u32,
    pub brick_columns: u32,

    // === Bat ===
    /// Distance the bat moves per unit of direction
    pub bat_move: i32,
    pub bat_min_x: i32,
    pub bat_max_x: i32,
    /// Direction magnitude the input router passes per key press
    pub key_step: i32,

    // === Scoring ===
    /// Score for destroying a brick
    pub hit_brick: i64,
    /// Score (penalty) for hitting the bottom of the playfield
    pub hit_bottom: i64,

    // === Pacing ===
    pub normal_interval_ms: u64,
    pub fast_interval_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: 600,
            height: 800,
            border: 6,
            menu_height: 40,

            ball_size: 30,
            ball_move: 4,

            brick_width: 50,
            brick_height: 30,
            brick_separation: 2,
            brick_x_offset: 10,
            wall_top: 100,
            brick_rows: 4,
            brick_columns: 11,

            bat_move: 5,
            bat_min_x: 10,
            bat_max_x: 440,
            key_step: 4,

            hit_brick: 50,
            hit_bottom: -200,

            normal_interval_ms: 20,
            fast_interval_ms: 10,
        }
    }
}

impl Settings {
    /// Parse settings from a JSON document
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Tick interval for a speed mode
    pub fn interval(&self, speed: SpeedMode) -> Duration {
        match speed {
            SpeedMode::Normal => Duration::from_millis(self.normal_interval_ms),
            SpeedMode::Fast => Duration::from_millis(self.fast_interval_ms),
        }
    }

    /// Total number of bricks in the wall
    pub fn brick_count(&self) -> usize {
        self.brick_rows as usize * self.brick_columns as usize
    }

    /// Reject settings that would make the rectangle math meaningless.
    pub fn validate(&self) -> Result<(), SettingsError> {
        positive("width", self.width)?;
        positive("height", self.height)?;
        positive("ball_size", self.ball_size)?;
        positive("ball_move", self.ball_move)?;
        positive("brick_width", self.brick_width)?;
        positive("brick_height", self.brick_height)?;
        positive("bat_move", self.bat_move)?;
        positive("key_step", self.key_step)?;

        non_negative("border", self.border)?;
        non_negative("menu_height", self.menu_height)?;
        non_negative("brick_separation", self.brick_separation)?;
        non_negative("brick_x_offset", self.brick_x_offset)?;
        non_negative("wall_top", self.wall_top)?;

        if self.brick_rows == 0 {
            return Err(invalid("brick_rows", "must be at least 1"));
        }
        if self.brick_columns == 0 {
            return Err(invalid("brick_columns", "must be at least 1"));
        }
        if self.normal_interval_ms == 0 {
            return Err(invalid("normal_interval_ms", "must be at least 1"));
        }
        if self.fast_interval_ms == 0 {
            return Err(invalid("fast_interval_ms", "must be at least 1"));
        }
        if self.width > MAX_PLAYFIELD || self.height > MAX_PLAYFIELD {
            return Err(invalid(
                "width",
                &format!("playfield must be at most {MAX_PLAYFIELD} in each direction"),
            ));
        }
        if self.brick_rows > MAX_BRICK_GRID || self.brick_columns > MAX_BRICK_GRID {
            return Err(invalid(
                "brick_rows",
                &format!("brick grid must be at most {MAX_BRICK_GRID} in each direction"),
            ));
        }
        if self.bat_min_x > self.bat_max_x {
            return Err(invalid("bat_min_x", "must not exceed bat_max_x"));
        }

        // Widened so out-of-range values fail here instead of overflowing
        let width = i64::from(self.width);
        let height = i64::from(self.height);
        let border = i64::from(self.border);
        let ball_size = i64::from(self.ball_size);
        let brick_width = i64::from(self.brick_width);
        let brick_height = i64::from(self.brick_height);
        let separation = i64::from(self.brick_separation);

        if width <= 2 * border + ball_size {
            return Err(invalid("width", "too narrow for the border and ball"));
        }
        if height <= i64::from(self.menu_height) + border + ball_size {
            return Err(invalid("height", "too short for the menu bar, border and ball"));
        }
        if self.ball_move > self.ball_size {
            return Err(invalid("ball_move", "must not exceed ball_size"));
        }

        if brick_width + separation > width || brick_height + separation > height {
            return Err(invalid("brick_separation", "brick pitch larger than the playfield"));
        }
        let wall_right = i64::from(self.brick_x_offset)
            + i64::from(self.brick_columns) * (brick_width + separation)
            - separation;
        if wall_right > width {
            return Err(invalid(
                "brick_columns",
                &format!("wall ends at x={wall_right}, past the playfield width {width}"),
            ));
        }
        let wall_bottom = i64::from(self.wall_top)
            + i64::from(self.brick_rows) * (brick_height + separation)
            - separation;
        if wall_bottom > height {
            return Err(invalid(
                "brick_rows",
                &format!("wall ends at y={wall_bottom}, past the playfield height {height}"),
            ));
        }

        // The bat starts at width / 2 and must be able to move from there
        let bat_start = width / 2;
        let bat_min_x = i64::from(self.bat_min_x);
        let bat_max_x = i64::from(self.bat_max_x);
        if bat_start < bat_min_x || bat_start > bat_max_x {
            return Err(invalid(
                "bat_max_x",
                &format!("bat starts at x={bat_start}, outside [{bat_min_x}, {bat_max_x}]"),
            ));
        }
        if bat_min_x < border {
            return Err(invalid("bat_min_x", "bat would cross the left border"));
        }
        if bat_max_x + 3 * brick_width > width - border {
            return Err(invalid("bat_max_x", "bat would cross the right border"));
        }
        if brick_height * 3 / 2 >= height {
            return Err(invalid("brick_height", "bat would start above the playfield"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> SettingsError {
    SettingsError::Invalid {
        field,
        reason: reason.to_string(),
    }
}

fn positive(field: &'static str, value: i32) -> Result<(), SettingsError> {
    if value > 0 {
        Ok(())
    } else {
        Err(invalid(field, &format!("must be positive, got {value}")))
    }
}

fn non_negative(field: &'static str, value: i32) -> Result<(), SettingsError> {
    if value >= 0 {
        Ok(())
    } else {
        Err(invalid(field, &format!("must not be negative, got {value}")))
    }
}
