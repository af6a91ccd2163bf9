//! Axis-aligned rectangles in screen space (origin top-left, y grows downward).

use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle of the given size placed with its top-left corner at `origin`.
    pub fn at(origin: Vec2, width: f32, height: f32) -> Self {
        Self::new(origin.x, origin.y, width, height)
    }

    /// A rectangle with a negative extent. Degenerate rects never overlap.
    /// Zero-extent rects are points or lines and still overlap anything that
    /// strictly contains them.
    pub fn is_degenerate(&self) -> bool {
        self.width < 0.0 || self.height < 0.0
    }

    /// Shrink by `padding` on every side. Padding past half the size yields a
    /// negative extent (a degenerate rect).
    pub fn inset(&self, padding: f32) -> Self {
        Self::new(
            self.x + padding,
            self.y + padding,
            self.width - 2.0 * padding,
            self.height - 2.0 * padding,
        )
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Strict overlap test: touching edges do not count.
    pub fn overlaps(&self, other: &Rect) -> bool {
        if self.is_degenerate() || other.is_degenerate() {
            return false;
        }
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }
}
