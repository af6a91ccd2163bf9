//! Sprite-sheet strip animation.
//!
//! A sprite sheet is a grid of equally sized frames. An [`AnimatedSprite`] walks
//! the first row left to right, advancing one frame every `frame_interval`
//! seconds and wrapping back to frame 0 after `max_frame`. The frame index and
//! the source rectangle are updated together so the renderer only ever reads
//! `frame_rect`.

use glam::Vec2;

use crate::geometry::Rect;

/// Column/row layout of a sprite sheet texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetLayout {
    pub columns: u32,
    pub rows: u32,
}

impl SheetLayout {
    pub const fn new(columns: u32, rows: u32) -> Self {
        Self { columns, rows }
    }

    /// Size of one frame in pixels for a texture of `texture_size`.
    pub fn frame_size(&self, texture_size: (u32, u32)) -> (f32, f32) {
        (
            texture_size.0 as f32 / self.columns.max(1) as f32,
            texture_size.1 as f32 / self.rows.max(1) as f32,
        )
    }
}

/// One animated, positioned actor: the player or an obstacle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimatedSprite {
    pub frame_rect: Rect,
    pub position: Vec2,
    pub current_frame: u32,
    pub frame_interval: f32,
    pub elapsed_since_frame: f32,
}

impl AnimatedSprite {
    pub fn new(frame_width: f32, frame_height: f32, position: Vec2, frame_interval: f32) -> Self {
        Self {
            frame_rect: Rect::new(0.0, 0.0, frame_width, frame_height),
            position,
            current_frame: 0,
            frame_interval,
            elapsed_since_frame: 0.0,
        }
    }

    pub fn width(&self) -> f32 {
        self.frame_rect.width
    }

    pub fn height(&self) -> f32 {
        self.frame_rect.height
    }

    /// Accumulate `dt` and step to the next frame once `frame_interval` is reached.
    /// The accumulator resets to zero rather than carrying the remainder.
    pub fn update_animation(&mut self, dt: f32, max_frame: u32) {
        self.elapsed_since_frame += dt;
        if self.elapsed_since_frame < self.frame_interval {
            return;
        }

        self.elapsed_since_frame = 0.0;
        self.current_frame += 1;
        if self.current_frame > max_frame {
            self.current_frame = 0;
        }
        self.frame_rect.x = self.current_frame as f32 * self.frame_rect.width;
    }

    /// True when the sprite's bottom edge is at or below `window_height`.
    pub fn is_on_ground(&self, window_height: f32) -> bool {
        self.position.y >= window_height - self.frame_rect.height
    }

    /// Screen-space bounds of the sprite at its current position.
    pub fn bounds(&self) -> Rect {
        Rect::at(self.position, self.frame_rect.width, self.frame_rect.height)
    }
}
