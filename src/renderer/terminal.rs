//! Crossterm terminal backend
//!
//! Draws into a cell buffer and flushes only the cells that changed since the
//! last frame.

use std::io::{self, Write};

use crossterm::{
    cursor,
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, BeginSynchronizedUpdate, Clear, ClearType, EndSynchronizedUpdate},
};
use glam::Vec2;

use super::{Label, Sprite, Surface};
use crate::sim::Rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Color,
    pub bg: Color,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: Color::White,
            bg: Color::Black,
        }
    }
}

struct CellBuffer {
    w: u16,
    h: u16,
    cells: Vec<Cell>,
}

impl CellBuffer {
    fn new(w: u16, h: u16) -> Self {
        Self {
            w,
            h,
            cells: vec![Cell::default(); w as usize * h as usize],
        }
    }

    fn idx(&self, x: u16, y: u16) -> usize {
        y as usize * self.w as usize + x as usize
    }

    fn set(&mut self, x: i32, y: i32, c: Cell) {
        if x >= 0 && y >= 0 && (x as u16) < self.w && (y as u16) < self.h {
            let i = self.idx(x as u16, y as u16);
            self.cells[i] = c;
        }
    }

    fn get(&self, x: u16, y: u16) -> Cell {
        if x < self.w && y < self.h {
            self.cells[self.idx(x, y)]
        } else {
            Cell::default()
        }
    }

    fn clear(&mut self, bg: Color) {
        self.cells.fill(Cell {
            bg,
            ..Cell::default()
        });
    }
}

/// Maps world coordinates onto terminal cells. Cells are treated as twice as
/// tall as they are wide; the world is scaled to fit and centred.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// World units covered by one column
    pub unit_x: f32,
    /// World units covered by one row
    pub unit_y: f32,
    pub origin_col: i32,
    pub origin_row: i32,
    pub world: Vec2,
}

impl Viewport {
    pub fn new(cols: u16, rows: u16, world: Vec2) -> Self {
        let cols_f = f32::from(cols.max(1));
        let rows_f = f32::from(rows.max(1));
        let unit_y = (world.y / rows_f).max(2.0 * world.x / cols_f);
        let unit_x = unit_y / 2.0;
        let used_cols = (world.x / unit_x).round();
        let used_rows = (world.y / unit_y).round();
        Self {
            unit_x,
            unit_y,
            origin_col: ((cols_f - used_cols) / 2.0).max(0.0) as i32,
            origin_row: ((rows_f - used_rows) / 2.0).max(0.0) as i32,
            world,
        }
    }

    /// Cell containing a world point
    pub fn cell_at(&self, p: Vec2) -> (i32, i32) {
        (
            self.origin_col + (p.x / self.unit_x).floor() as i32,
            self.origin_row + (p.y / self.unit_y).floor() as i32,
        )
    }

    /// Half-open cell range `(col0, row0, col1, row1)` covered by a rect,
    /// clipped to the world. `None` if nothing of it is inside.
    pub fn cell_span(&self, rect: &Rect) -> Option<(i32, i32, i32, i32)> {
        let left = rect.left().max(0.0);
        let top = rect.top().max(0.0);
        let right = rect.right().min(self.world.x);
        let bottom = rect.bottom().min(self.world.y);
        if left >= right || top >= bottom {
            return None;
        }
        let col0 = (left / self.unit_x).floor() as i32;
        let row0 = (top / self.unit_y).floor() as i32;
        let col1 = ((right / self.unit_x).round() as i32).max(col0 + 1);
        let row1 = ((bottom / self.unit_y).round() as i32).max(row0 + 1);
        Some((
            self.origin_col + col0,
            self.origin_row + row0,
            self.origin_col + col1,
            self.origin_row + row1,
        ))
    }
}

/// Terminal implementation of [`Surface`]
pub struct TerminalRenderer<W: Write> {
    out: W,
    viewport: Viewport,
    prev: CellBuffer,
    cur: CellBuffer,
    /// Force a full repaint on the next present
    dirty: bool,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, cols: u16, rows: u16, world: Vec2) -> Self {
        Self {
            out,
            viewport: Viewport::new(cols, rows, world),
            prev: CellBuffer::new(cols, rows),
            cur: CellBuffer::new(cols, rows),
            dirty: true,
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn size(&self) -> (u16, u16) {
        (self.cur.w, self.cur.h)
    }

    /// Cell currently drawn at a terminal position
    pub fn cell(&self, col: u16, row: u16) -> Cell {
        self.cur.get(col, row)
    }

    /// Text of one terminal row as drawn so far
    pub fn row_text(&self, row: u16) -> String {
        (0..self.cur.w).map(|col| self.cur.get(col, row).ch).collect()
    }

    /// Adopt a new terminal size. Returns true if it changed.
    pub fn resize(&mut self, cols: u16, rows: u16) -> bool {
        if cols == self.cur.w && rows == self.cur.h {
            return false;
        }
        log::info!("Terminal resized to {}x{}", cols, rows);
        self.viewport = Viewport::new(cols, rows, self.viewport.world);
        self.prev = CellBuffer::new(cols, rows);
        self.cur = CellBuffer::new(cols, rows);
        self.dirty = true;
        true
    }

    fn fill_span(&mut self, rect: &Rect, mut cell_for: impl FnMut(u16, u16, u16, u16) -> Cell) {
        let Some((c0, r0, c1, r1)) = self.viewport.cell_span(rect) else {
            return;
        };
        let (cols, rows) = ((c1 - c0) as u16, (r1 - r0) as u16);
        for y in r0..r1 {
            for x in c0..c1 {
                let cell = cell_for((x - c0) as u16, (y - r0) as u16, cols, rows);
                self.cur.set(x, y, cell);
            }
        }
    }

    fn print_at(&mut self, col: i32, row: i32, text: &str, fg: Color, bg: Color) {
        for (i, ch) in text.chars().enumerate() {
            self.cur.set(col + i as i32, row, Cell { ch, fg, bg });
        }
    }
}

impl<W: Write> Surface for TerminalRenderer<W> {
    fn world_size(&self) -> Vec2 {
        self.viewport.world
    }

    fn fill_background(&mut self, color: Color) {
        self.cur.clear(color);
    }

    fn blit(&mut self, sprite: Sprite, rect: Rect) {
        let fg = sprite.color();
        self.fill_span(&rect, |col, row, cols, rows| Cell {
            ch: sprite.glyph(col, row, cols, rows),
            fg,
            bg: Color::Black,
        });
    }

    fn draw_label(&mut self, label: &Label) {
        let width = label.text.chars().count() as i32;
        let (cx, cy) = self.viewport.cell_at(label.center);
        let left = cx - width / 2 - 2;
        let right = left + width + 3;
        let (top, bottom) = (cy - 1, cy + 1);
        let (border, bg) = (label.border, label.background);

        for x in left..=right {
            for y in top..=bottom {
                let ch = match (x == left || x == right, y == top || y == bottom) {
                    (true, true) => corner(x == left, y == top),
                    (false, true) => '─',
                    (true, false) => '│',
                    (false, false) => ' ',
                };
                self.cur.set(x, y, Cell { ch, fg: border, bg });
            }
        }
        self.print_at(left + 2, cy, &label.text, label.color, bg);
    }

    fn present(&mut self) -> io::Result<()> {
        queue!(self.out, BeginSynchronizedUpdate)?;
        if self.dirty {
            queue!(self.out, ResetColor, Clear(ClearType::All))?;
        }

        let mut last_fg = None;
        let mut last_bg = None;
        for y in 0..self.cur.h {
            for x in 0..self.cur.w {
                let i = self.cur.idx(x, y);
                let c = self.cur.cells[i];
                if !self.dirty && c == self.prev.cells[i] {
                    continue;
                }

                queue!(self.out, cursor::MoveTo(x, y))?;
                if last_fg != Some(c.fg) {
                    queue!(self.out, SetForegroundColor(c.fg))?;
                    last_fg = Some(c.fg);
                }
                if last_bg != Some(c.bg) {
                    queue!(self.out, SetBackgroundColor(c.bg))?;
                    last_bg = Some(c.bg);
                }
                queue!(self.out, Print(c.ch))?;
            }
        }

        queue!(self.out, ResetColor, EndSynchronizedUpdate)?;
        self.out.flush()?;
        self.prev.cells.copy_from_slice(&self.cur.cells);
        self.dirty = false;
        Ok(())
    }
}

fn corner(left: bool, top: bool) -> char {
    match (left, top) {
        (true, true) => '┌',
        (false, true) => '┐',
        (true, false) => '└',
        (false, false) => '┘',
    }
}

/// Switch the terminal into game mode: alternate screen, raw input, no cursor
pub fn enter(out: &mut impl Write) -> io::Result<()> {
    crossterm::execute!(
        out,
        terminal::EnterAlternateScreen,
        cursor::Hide,
        terminal::DisableLineWrap,
        Clear(ClearType::All)
    )?;
    terminal::enable_raw_mode()?;
    // Release events let held keys end exactly; without them input falls
    // back to a hold window
    if terminal::supports_keyboard_enhancement().unwrap_or(false) {
        crossterm::execute!(
            out,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )?;
        log::info!("Key release reporting enabled");
    }
    Ok(())
}

/// [`enter`], undoing any partial setup with [`leave`] if it fails
pub fn enter_or_restore<W: Write>(out: &mut W) -> io::Result<()> {
    setup_or_undo(out, |o| enter(o), |o| leave(o))
}

/// Run `setup`; if it fails, run `undo` before returning the error
pub fn setup_or_undo<W: Write>(
    out: &mut W,
    setup: impl FnOnce(&mut W) -> io::Result<()>,
    undo: impl FnOnce(&mut W) -> io::Result<()>,
) -> io::Result<()> {
    if let Err(e) = setup(out) {
        if let Err(undo_err) = undo(out) {
            log::warn!("Could not undo terminal setup: {}", undo_err);
        }
        return Err(e);
    }
    Ok(())
}

/// Undo [`enter`]
pub fn leave(out: &mut impl Write) -> io::Result<()> {
    if terminal::supports_keyboard_enhancement().unwrap_or(false) {
        queue!(out, PopKeyboardEnhancementFlags)?;
    }
    queue!(
        out,
        ResetColor,
        Clear(ClearType::All),
        cursor::Show,
        terminal::EnableLineWrap,
        terminal::LeaveAlternateScreen
    )?;
    out.flush()?;
    terminal::disable_raw_mode()
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORLD: Vec2 = Vec2::new(600.0, 800.0);

    #[test]
    fn test_viewport_fits_height() {
        // 80 rows -> 10 units per row, 5 per column -> 120 columns of arena
        let vp = Viewport::new(200, 80, WORLD);
        assert_eq!(vp.unit_y, 10.0);
        assert_eq!(vp.unit_x, 5.0);
        assert_eq!(vp.origin_col, 40);
        assert_eq!(vp.origin_row, 0);
    }

    #[test]
    fn test_viewport_fits_width() {
        // Narrow terminal: width is the constraint
        let vp = Viewport::new(60, 100, WORLD);
        assert_eq!(vp.unit_x, 10.0);
        assert_eq!(vp.unit_y, 20.0);
        assert_eq!(vp.origin_col, 0);
        assert_eq!(vp.origin_row, 30);
    }

    #[test]
    fn test_cell_span_clips_to_world() {
        let vp = Viewport::new(120, 80, WORLD);
        assert_eq!(vp.cell_span(&Rect::new(0.0, -300.0, 100.0, 100.0)), None);
        assert_eq!(
            vp.cell_span(&Rect::new(0.0, -50.0, 100.0, 100.0)),
            Some((0, 0, 20, 5))
        );
        // Tiny rects still get one cell
        assert_eq!(vp.cell_span(&Rect::new(12.0, 12.0, 1.0, 1.0)), Some((2, 1, 3, 2)));
    }

    #[test]
    fn test_blit_and_label() {
        let mut r = TerminalRenderer::new(Vec::new(), 120, 80, WORLD);
        r.fill_background(Color::Black);
        r.blit(Sprite::Hunter, Rect::new(0.0, 0.0, 100.0, 100.0));
        assert_eq!(r.cell(0, 0).ch, '┌');
        assert_eq!(r.cell(19, 9).ch, '┘');

        r.draw_label(&Label::new("PAUSED", Vec2::new(300.0, 400.0), Color::Red));
        assert!(r.row_text(40).contains("PAUSED"));
        assert!(r.row_text(39).contains("──────"));
    }

    #[test]
    fn test_present_writes_changes_only() {
        let mut r = TerminalRenderer::new(Vec::new(), 10, 4, Vec2::new(5.0, 4.0));
        r.fill_background(Color::Black);
        r.present().unwrap();
        let first = r.out.len();
        assert!(first > 0);

        r.out.clear();
        r.present().unwrap();
        let idle = r.out.len();

        r.out.clear();
        r.blit(Sprite::Stone(0), Rect::new(0.0, 0.0, 1.0, 1.0));
        r.present().unwrap();
        assert!(r.out.len() > idle);
        assert!(idle < first);
    }

    #[test]
    fn test_failed_setup_is_undone() {
        let mut out = Vec::new();
        let result = setup_or_undo(
            &mut out,
            |o| {
                o.extend_from_slice(b"enter;");
                Err(io::Error::other("raw mode unavailable"))
            },
            |o| {
                o.extend_from_slice(b"leave;");
                Ok(())
            },
        );
        assert!(result.is_err());
        assert_eq!(out, b"enter;leave;");

        let mut out = Vec::new();
        setup_or_undo(
            &mut out,
            |o| {
                o.extend_from_slice(b"enter;");
                Ok(())
            },
            |o| {
                o.extend_from_slice(b"leave;");
                Ok(())
            },
        )
        .unwrap();
        assert_eq!(out, b"enter;");
    }

    #[test]
    fn test_resize_detects_change() {
        let mut r = TerminalRenderer::new(Vec::new(), 10, 4, WORLD);
        assert!(!r.resize(10, 4));
        assert!(r.resize(20, 8));
        assert_eq!(r.size(), (20, 8));
    }
}
