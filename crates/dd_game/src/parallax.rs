//! Horizontally tiling background layers.
//!
//! Each layer is drawn twice side by side, the second copy starting where the
//! first ends. Once the first copy has scrolled fully off screen the offset
//! snaps back to 0, which is indistinguishable from the second copy's position.

use crate::config::ParallaxLayerConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParallaxLayer {
    pub offset_x: f32,
    /// Leftward scroll speed, pixels/s.
    pub speed: f32,
    pub scale: f32,
    /// Unscaled texture width in pixels.
    pub texture_width: f32,
}

impl ParallaxLayer {
    pub fn new(texture_width: f32, speed: f32, scale: f32) -> Self {
        Self {
            offset_x: 0.0,
            speed,
            scale,
            texture_width,
        }
    }

    pub fn from_config(config: &ParallaxLayerConfig, texture_width: u32) -> Self {
        Self::new(texture_width as f32, config.speed, config.scale)
    }

    /// On-screen width of one copy.
    pub fn scaled_width(&self) -> f32 {
        self.texture_width * self.scale
    }

    pub fn scroll(&mut self, dt: f32) {
        self.offset_x -= self.speed * dt;
        if self.offset_x <= -self.scaled_width() {
            self.offset_x = 0.0;
        }
    }

    /// X positions of the two copies.
    pub fn copy_positions(&self) -> [f32; 2] {
        [self.offset_x, self.offset_x + self.scaled_width()]
    }
}
