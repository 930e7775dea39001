//! Presentation layer
//!
//! Backend-independent: builds an ordered list of draw commands from a
//! snapshot. Whatever actually puts pixels on screen just walks the list.

pub mod display_list;

pub use display_list::{DisplayList, DrawCommand, score_text};

/// Colors for game elements
pub mod colors {
    use crate::sim::Colour;

    pub const BACKGROUND: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const TEXT: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    pub const RED: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
    pub const BLACK: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    pub const YELLOW: [f32; 4] = [1.0, 1.0, 0.0, 1.0];

    /// RGBA for an entity colour tag
    pub fn rgba(colour: Colour) -> [f32; 4] {
        match colour {
            Colour::Red => RED,
            Colour::Black => BLACK,
            Colour::Yellow => YELLOW,
        }
    }
}
