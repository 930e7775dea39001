//! Display list generation

use glam::IVec2;

use super::colors;
use crate::sim::{Entity, Snapshot};

/// Where the score overlay sits, measured from the top-left corner
pub const SCORE_TEXT_POS: IVec2 = IVec2::new(50, 10);

/// One drawing primitive
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Fill the whole playfield
    Clear { size: IVec2, color: [f32; 4] },
    /// Oval inscribed in the rectangle at `pos` of `size`
    Oval { pos: IVec2, size: IVec2, color: [f32; 4] },
    Rect { pos: IVec2, size: IVec2, color: [f32; 4] },
    Text { pos: IVec2, text: String, color: [f32; 4] },
}

impl DrawCommand {
    fn rect(entity: &Entity) -> Self {
        DrawCommand::Rect {
            pos: entity.pos,
            size: entity.size(),
            color: colors::rgba(entity.colour),
        }
    }

    fn oval(entity: &Entity) -> Self {
        DrawCommand::Oval {
            pos: entity.pos,
            size: entity.size(),
            color: colors::rgba(entity.colour),
        }
    }
}

pub fn score_text(score: i64) -> String {
    format!("BreakOut: Score = {score}")
}

/// Ordered draw commands for one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayList {
    pub commands: Vec<DrawCommand>,
}

impl DisplayList {
    /// Frame shown before any snapshot is available: background and a zero
    /// score
    pub fn empty(playfield: IVec2) -> Self {
        Self {
            commands: vec![
                DrawCommand::Clear {
                    size: playfield,
                    color: colors::BACKGROUND,
                },
                DrawCommand::Text {
                    pos: SCORE_TEXT_POS,
                    text: score_text(0),
                    color: colors::TEXT,
                },
            ],
        }
    }

    /// Background, ball, bat, visible bricks, then the score on top
    pub fn build(snapshot: &Snapshot) -> Self {
        let mut commands = Vec::with_capacity(snapshot.bricks.len() + 4);
        commands.push(DrawCommand::Clear {
            size: snapshot.playfield,
            color: colors::BACKGROUND,
        });

        if snapshot.ball.visible {
            commands.push(DrawCommand::oval(&snapshot.ball));
        }
        if snapshot.bat.visible {
            commands.push(DrawCommand::rect(&snapshot.bat));
        }
        commands.extend(snapshot.visible_bricks().map(DrawCommand::rect));

        commands.push(DrawCommand::Text {
            pos: SCORE_TEXT_POS,
            text: score_text(snapshot.score),
            color: colors::TEXT,
        });

        Self { commands }
    }

    /// Build from an optional snapshot, falling back to an empty frame
    pub fn build_or_empty(snapshot: Option<&Snapshot>, playfield: IVec2) -> Self {
        snapshot.map_or_else(|| Self::empty(playfield), Self::build)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Number of rectangle commands (bat and bricks)
    pub fn rect_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Rect { .. }))
            .count()
    }
}
