//! Collision detection for axis-aligned rectangles
//!
//! Everything in the playfield is a rectangle, so a single overlap test
//! covers ball/brick and ball/bat. Walls are checked against the ball's
//! top-left corner.

use glam::IVec2;

use super::state::Entity;
use crate::settings::Settings;

/// Axis-aligned overlap test
///
/// Two rectangles are separate if one lies entirely left of, right of, above
/// or below the other. Touching edges count as separate.
pub fn overlaps(a: &Entity, b: &Entity) -> bool {
    let separate = a.x() >= b.x() + b.width()
        || a.x() + a.width() <= b.x()
        || a.y() >= b.y() + b.height()
        || a.y() + a.height() <= b.y();
    !separate
}

/// Which playfield edges a ball at `pos` is touching or past
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WallContact {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub bottom: bool,
}

/// Check the ball's top-left corner against the playfield edges
///
/// The top edge sits below the menu bar; the other three are inset by the
/// border.
pub fn wall_contact(pos: IVec2, settings: &Settings) -> WallContact {
    WallContact {
        left: pos.x <= settings.border,
        right: pos.x >= settings.width - settings.border - settings.ball_size,
        top: pos.y <= settings.menu_height,
        bottom: pos.y >= settings.height - settings.border - settings.ball_size,
    }
}
