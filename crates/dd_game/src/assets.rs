//! GPU textures for every [`TextureSlot`].
//!
//! A texture that cannot be read or decoded is replaced by a checkerboard of a
//! plausible size so the game still runs and the problem is visible on screen.

use std::path::{Path, PathBuf};

use dd_render::{placeholder_image, SpritePipeline, Texture};

use crate::config::GameConfig;
use crate::mesh::{TextureSizes, TextureSlot};

struct GpuSpriteTexture {
    texture: Texture,
    bind_group: wgpu::BindGroup,
}

pub struct TextureSet {
    slots: Vec<GpuSpriteTexture>,
    placeholders: usize,
}

impl TextureSet {
    pub fn load(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        pipeline: &SpritePipeline,
        config: &GameConfig,
    ) -> Self {
        let mut placeholders = 0;
        let slots = TextureSlot::ALL
            .iter()
            .map(|&slot| {
                let path = texture_path(config, slot);
                let texture = match load_texture_asset(device, queue, &path) {
                    Ok(texture) => {
                        log::info!(
                            "Loaded {} texture {} ({}x{})",
                            slot.label(),
                            path.display(),
                            texture.size.0,
                            texture.size.1
                        );
                        texture
                    }
                    Err(err) => {
                        log::warn!("{err}. Using placeholder for {}.", slot.label());
                        placeholders += 1;
                        let (w, h) = placeholder_size(config, slot);
                        Texture::from_image(device, queue, &placeholder_image(w, h), slot.label())
                    }
                };
                let bind_group = pipeline.create_texture_bind_group(device, &texture);
                GpuSpriteTexture {
                    texture,
                    bind_group,
                }
            })
            .collect();
        Self {
            slots,
            placeholders,
        }
    }

    pub fn bind_group(&self, slot: TextureSlot) -> &wgpu::BindGroup {
        &self.slots[slot.index()].bind_group
    }

    pub fn sizes(&self) -> TextureSizes {
        TextureSizes(TextureSlot::ALL.map(|slot| self.slots[slot.index()].texture.size))
    }

    pub fn placeholder_count(&self) -> usize {
        self.placeholders
    }
}

pub fn texture_path(config: &GameConfig, slot: TextureSlot) -> PathBuf {
    let relative = match slot {
        TextureSlot::Player => &config.player.texture,
        TextureSlot::Obstacle => &config.obstacles.texture,
        TextureSlot::Background => &config.parallax[0].texture,
        TextureSlot::Midground => &config.parallax[1].texture,
        TextureSlot::Foreground => &config.parallax[2].texture,
    };
    PathBuf::from(relative)
}

/// Size for a stand-in texture: one 128px cell per sheet frame for actors, and
/// a 256x192 tile for backdrop layers.
pub fn placeholder_size(config: &GameConfig, slot: TextureSlot) -> (u32, u32) {
    const CELL: u32 = 128;
    match slot {
        TextureSlot::Player => (config.player.columns * CELL, config.player.rows * CELL),
        TextureSlot::Obstacle => (
            config.obstacles.columns * CELL,
            config.obstacles.rows * CELL,
        ),
        TextureSlot::Background | TextureSlot::Midground | TextureSlot::Foreground => (256, 192),
    }
}

fn load_texture_asset(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    path: &Path,
) -> Result<Texture, String> {
    let bytes = std::fs::read(path)
        .map_err(|e| format!("Failed to read texture '{}': {e}", path.display()))?;
    Texture::from_bytes(device, queue, &bytes, &path.to_string_lossy())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_map_to_configured_paths() {
        let config = GameConfig::default();
        assert_eq!(
            texture_path(&config, TextureSlot::Player),
            PathBuf::from("textures/scarfy.png")
        );
        assert_eq!(
            texture_path(&config, TextureSlot::Foreground),
            PathBuf::from("textures/foreground.png")
        );
    }

    #[test]
    fn placeholder_sizes_follow_sheet_layout() {
        let config = GameConfig::default();
        assert_eq!(placeholder_size(&config, TextureSlot::Player), (768, 128));
        assert_eq!(placeholder_size(&config, TextureSlot::Obstacle), (1024, 1024));
        assert_eq!(placeholder_size(&config, TextureSlot::Midground), (256, 192));
    }

    #[test]
    fn placeholder_obstacle_still_has_a_hitbox() {
        let config = GameConfig::default();
        let (w, h) = placeholder_size(&config, TextureSlot::Obstacle);
        let (frame_w, frame_h) = config.obstacles.layout().frame_size((w, h));
        assert!(frame_w > 2.0 * config.obstacles.collision_padding);
        assert!(frame_h > 2.0 * config.obstacles.collision_padding);
    }
}
