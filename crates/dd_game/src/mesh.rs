//! CPU-side sprite mesh for one frame.
//!
//! Quads are emitted back to front (far, middle and near parallax layers, then
//! obstacles, then the player) and consecutive quads that sample the same
//! texture collapse into a single draw call.

use dd_core::{AnimatedSprite, Rect};
use dd_render::{SpriteVertex, QUAD_INDICES};

use crate::world::{Outcome, SheetSizes, World};

const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
const RED: [f32; 4] = [0.9, 0.16, 0.22, 1.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureSlot {
    Player,
    Obstacle,
    Background,
    Midground,
    Foreground,
}

impl TextureSlot {
    pub const ALL: [TextureSlot; 5] = [
        TextureSlot::Player,
        TextureSlot::Obstacle,
        TextureSlot::Background,
        TextureSlot::Midground,
        TextureSlot::Foreground,
    ];

    pub const PARALLAX: [TextureSlot; 3] = [
        TextureSlot::Background,
        TextureSlot::Midground,
        TextureSlot::Foreground,
    ];

    pub fn index(self) -> usize {
        match self {
            Self::Player => 0,
            Self::Obstacle => 1,
            Self::Background => 2,
            Self::Midground => 3,
            Self::Foreground => 4,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Player => "player",
            Self::Obstacle => "obstacle",
            Self::Background => "background",
            Self::Midground => "midground",
            Self::Foreground => "foreground",
        }
    }
}

/// Pixel size of every loaded texture, indexed by [`TextureSlot::index`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureSizes(pub [(u32, u32); 5]);

impl TextureSizes {
    pub fn get(&self, slot: TextureSlot) -> (u32, u32) {
        self.0[slot.index()]
    }

    pub fn sheet_sizes(&self) -> SheetSizes {
        SheetSizes {
            player: self.get(TextureSlot::Player),
            obstacle: self.get(TextureSlot::Obstacle),
            parallax_widths: TextureSlot::PARALLAX.map(|slot| self.get(slot).0),
        }
    }
}

/// A contiguous run of indices that share the same texture binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawCall {
    pub texture: TextureSlot,
    pub index_start: u32,
    pub index_count: u32,
}

#[derive(Debug, Default)]
pub struct FrameMesh {
    pub vertices: Vec<SpriteVertex>,
    pub indices: Vec<u32>,
    pub draw_calls: Vec<DrawCall>,
}

impl FrameMesh {
    pub fn sprite_count(&self) -> usize {
        self.vertices.len() / 4
    }

    /// Append one textured quad at screen rect `dest`, sampling pixel rect
    /// `source` of a texture of `texture_size`.
    pub fn push_quad(
        &mut self,
        texture: TextureSlot,
        texture_size: (u32, u32),
        dest: Rect,
        source: Rect,
        color: [f32; 4],
    ) {
        let base_index = self.vertices.len() as u32;
        self.vertices.extend(SpriteVertex::quad(
            dest.x,
            dest.y,
            dest.width,
            dest.height,
            source_uv(source, texture_size),
            color,
        ));

        let draw_start = self.indices.len() as u32;
        self.indices
            .extend(QUAD_INDICES.iter().map(|i| base_index + i));
        push_draw_call(&mut self.draw_calls, texture, draw_start, 6);
    }
}

/// Normalized `[u0, v0, u1, v1]` for a pixel rect.
pub fn source_uv(source: Rect, texture_size: (u32, u32)) -> [f32; 4] {
    let w = texture_size.0.max(1) as f32;
    let h = texture_size.1.max(1) as f32;
    [
        source.x / w,
        source.y / h,
        source.right() / w,
        source.bottom() / h,
    ]
}

/// Obstacle tint alternates by spawn index so neighbours are easy to tell apart.
pub fn obstacle_tint(index: usize) -> [f32; 4] {
    if index % 2 == 0 {
        WHITE
    } else {
        RED
    }
}

pub fn build_frame_mesh(world: &World, sizes: &TextureSizes) -> FrameMesh {
    let mut mesh = FrameMesh::default();

    for (layer, slot) in world.layers.iter().zip(TextureSlot::PARALLAX) {
        let texture_size = sizes.get(slot);
        let full = Rect::new(0.0, 0.0, texture_size.0 as f32, texture_size.1 as f32);
        let height = texture_size.1 as f32 * layer.scale;
        for x in layer.copy_positions() {
            mesh.push_quad(
                slot,
                texture_size,
                Rect::new(x, 0.0, layer.scaled_width(), height),
                full,
                WHITE,
            );
        }
    }

    // Actors disappear once the player is hit; the backdrop keeps scrolling.
    if world.outcome() == Outcome::Lost {
        return mesh;
    }

    let obstacle_size = sizes.get(TextureSlot::Obstacle);
    for (i, obstacle) in world.obstacles.iter().enumerate() {
        push_sprite(&mut mesh, TextureSlot::Obstacle, obstacle_size, obstacle, obstacle_tint(i));
    }

    push_sprite(
        &mut mesh,
        TextureSlot::Player,
        sizes.get(TextureSlot::Player),
        &world.player,
        WHITE,
    );

    mesh
}

fn push_sprite(
    mesh: &mut FrameMesh,
    texture: TextureSlot,
    texture_size: (u32, u32),
    sprite: &AnimatedSprite,
    color: [f32; 4],
) {
    mesh.push_quad(texture, texture_size, sprite.bounds(), sprite.frame_rect, color);
}

/// Append a draw call, merging with the previous one when the texture matches
/// and indices are contiguous.
fn push_draw_call(
    draw_calls: &mut Vec<DrawCall>,
    texture: TextureSlot,
    index_start: u32,
    index_count: u32,
) {
    if let Some(last) = draw_calls.last_mut() {
        let contiguous = last.index_start + last.index_count == index_start;
        if last.texture == texture && contiguous {
            last.index_count += index_count;
            return;
        }
    }
    draw_calls.push(DrawCall {
        texture,
        index_start,
        index_count,
    });
}
