//! Axis-aligned rectangle geometry
//!
//! World space has +y pointing down: the arena top is y = 0 and the bottom is
//! y = arena height.

use glam::Vec2;

/// An axis-aligned rectangle given by its top-left corner and size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    /// Rectangle of the given size centred on `center`
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        Self {
            pos: center - size / 2.0,
            size,
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.pos += delta;
    }

    /// True if the interiors intersect. Rectangles that only share an edge do
    /// not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Move the rectangle so it lies inside `bounds`. A rectangle larger than
    /// the bounds on an axis is centred on that axis.
    pub fn clamp_within(&mut self, bounds: &Rect) {
        self.pos.x = clamp_axis(self.pos.x, self.size.x, bounds.pos.x, bounds.size.x);
        self.pos.y = clamp_axis(self.pos.y, self.size.y, bounds.pos.y, bounds.size.y);
    }
}

fn clamp_axis(pos: f32, len: f32, bound_pos: f32, bound_len: f32) -> f32 {
    if len > bound_len {
        bound_pos + (bound_len - len) / 2.0
    } else {
        pos.clamp(bound_pos, bound_pos + bound_len - len)
    }
}
