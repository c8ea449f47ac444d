//! Rendering module
//!
//! Screens draw through the [`Surface`] trait in world coordinates. The only
//! backend is the crossterm terminal renderer.

pub mod shapes;
pub mod terminal;

use std::io;

use glam::Vec2;

pub use crossterm::style::Color;
pub use shapes::Sprite;
pub use terminal::{TerminalRenderer, Viewport};

use crate::sim::Rect;

/// A line of text centred on a point, drawn over a filled box with a border
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    pub center: Vec2,
    pub color: Color,
    pub background: Color,
    pub border: Color,
}

impl Label {
    /// Text on black with a border matching the text colour
    pub fn new(text: impl Into<String>, center: Vec2, color: Color) -> Self {
        Self {
            text: text.into(),
            center,
            color,
            background: Color::Black,
            border: color,
        }
    }
}

/// Drawing target for the game screens
pub trait Surface {
    /// Size of the world area the surface shows
    fn world_size(&self) -> Vec2;

    fn fill_background(&mut self, color: Color);

    /// Draw a sprite stretched over `rect`
    fn blit(&mut self, sprite: Sprite, rect: Rect);

    fn draw_label(&mut self, label: &Label);

    /// Show everything drawn since the last present
    fn present(&mut self) -> io::Result<()>;
}
