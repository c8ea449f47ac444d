//! Sprite definitions for the terminal
//!
//! Each sprite is a glyph pattern stretched over the entity's cells.

use crossterm::style::Color;

/// Everything that can be blitted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sprite {
    Bear,
    Cub,
    Hunter,
    /// One of the stone variants
    Stone(u8),
}

const STONE_GLYPHS: [char; 5] = ['o', 'O', '0', '@', '*'];
const STONE_COLORS: [Color; 5] = [
    Color::Rgb { r: 160, g: 160, b: 160 },
    Color::Rgb { r: 130, g: 125, b: 120 },
    Color::Rgb { r: 190, g: 180, b: 165 },
    Color::Rgb { r: 110, g: 110, b: 125 },
    Color::Rgb { r: 200, g: 200, b: 200 },
];

impl Sprite {
    pub fn color(&self) -> Color {
        match self {
            Sprite::Bear => Color::Rgb { r: 139, g: 90, b: 43 },
            Sprite::Cub => Color::Rgb { r: 210, g: 160, b: 100 },
            Sprite::Hunter => Color::Rgb { r: 70, g: 150, b: 60 },
            Sprite::Stone(v) => STONE_COLORS[*v as usize % STONE_COLORS.len()],
        }
    }

    /// Glyph for cell (`col`, `row`) of a sprite `cols` x `rows` cells big
    pub fn glyph(&self, col: u16, row: u16, cols: u16, rows: u16) -> char {
        match self {
            Sprite::Stone(v) => STONE_GLYPHS[*v as usize % STONE_GLYPHS.len()],
            Sprite::Bear | Sprite::Cub | Sprite::Hunter => {
                if cols < 3 || rows < 3 {
                    return self.fill();
                }
                let (right, bottom) = (cols - 1, rows - 1);
                match (col, row) {
                    (0, 0) => '┌',
                    (c, 0) if c == right => '┐',
                    (0, r) if r == bottom => '└',
                    (c, r) if c == right && r == bottom => '┘',
                    (_, 0) => '─',
                    (_, r) if r == bottom => '─',
                    (0, _) => '│',
                    (c, _) if c == right => '│',
                    (c, 1) if c == cols / 2 => self.face(),
                    _ => self.fill(),
                }
            }
        }
    }

    fn fill(&self) -> char {
        match self {
            Sprite::Bear => '▓',
            Sprite::Cub => '▒',
            Sprite::Hunter => '░',
            Sprite::Stone(_) => 'o',
        }
    }

    fn face(&self) -> char {
        match self {
            Sprite::Bear => 'B',
            Sprite::Cub => 'b',
            Sprite::Hunter => 'H',
            Sprite::Stone(_) => 'o',
        }
    }
}
