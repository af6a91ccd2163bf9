//! All gameplay state for one playthrough, and the per-tick update.
//!
//! `World::tick` runs the systems in a fixed order:
//!
//!   1. animate the player (only while grounded) and every obstacle
//!   2. vertical physics + jump for the player
//!   3. scroll the parallax layers
//!   4. move obstacles left and drag the finish line with the last one
//!   5. test player vs obstacles, latching game over on any hit
//!
//! Nothing here touches the GPU; sizes of the sprite sheets are passed in so
//! the world can be built and stepped in tests.

use glam::Vec2;

use dd_core::AnimatedSprite;

use crate::collision::{check_collisions, CollisionLatch};
use crate::config::{validate_config, GameConfig, PARALLAX_LAYER_COUNT};
use crate::controller::{ControllerInput, VerticalController};
use crate::parallax::ParallaxLayer;

/// Pixel sizes of the loaded textures the world depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetSizes {
    pub player: (u32, u32),
    pub obstacle: (u32, u32),
    pub parallax_widths: [u32; PARALLAX_LAYER_COUNT],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Playing,
    /// The player passed the finish line. Play continues underneath the banner.
    Won,
    /// The player touched an obstacle. Never leaves this state.
    Lost,
}

impl Outcome {
    pub fn label(self) -> &'static str {
        match self {
            Self::Playing => "Playing",
            Self::Won => "Won",
            Self::Lost => "Lost",
        }
    }
}

pub struct World {
    pub player: AnimatedSprite,
    pub obstacles: Vec<AnimatedSprite>,
    pub controller: VerticalController,
    pub collision: CollisionLatch,
    pub layers: [ParallaxLayer; PARALLAX_LAYER_COUNT],
    pub finish_line_x: f32,
    pub window_size: (f32, f32),
    player_max_frame: u32,
    obstacle_max_frame: u32,
    obstacle_velocity: f32,
    collision_padding: f32,
    last_outcome: Outcome,
}

impl World {
    pub fn new(config: &GameConfig, sizes: &SheetSizes) -> Result<Self, String> {
        validate_config(config)?;
        let window_w = config.window.width as f32;
        let window_h = config.window.height as f32;

        let (player_w, player_h) = config.player.layout().frame_size(sizes.player);
        let player = AnimatedSprite::new(
            player_w,
            player_h,
            Vec2::new(window_w / 2.0 - player_w / 2.0, window_h - player_h),
            config.player.frame_interval,
        );

        let (obstacle_w, obstacle_h) = config.obstacles.layout().frame_size(sizes.obstacle);
        let obstacles: Vec<AnimatedSprite> = (0..config.obstacles.count)
            .map(|i| {
                AnimatedSprite::new(
                    obstacle_w,
                    obstacle_h,
                    Vec2::new(
                        window_w + i as f32 * config.obstacles.spacing,
                        window_h - obstacle_h,
                    ),
                    config.obstacles.frame_interval,
                )
            })
            .collect();

        let layers = std::array::from_fn(|i| {
            ParallaxLayer::from_config(&config.parallax[i], sizes.parallax_widths[i])
        });

        let finish_line_x = obstacles.last().map_or(window_w, |o| o.position.x);

        log::info!(
            "World ready: player {}x{}, {} obstacles of {}x{}, finish line at x={}",
            player_w,
            player_h,
            obstacles.len(),
            obstacle_w,
            obstacle_h,
            finish_line_x
        );

        Ok(Self {
            player,
            obstacles,
            controller: VerticalController::new(config.physics),
            collision: CollisionLatch::default(),
            layers,
            finish_line_x,
            window_size: (window_w, window_h),
            player_max_frame: config.player.max_frame,
            obstacle_max_frame: config.obstacles.max_frame,
            obstacle_velocity: config.obstacles.velocity,
            collision_padding: config.obstacles.collision_padding,
            last_outcome: Outcome::Playing,
        })
    }

    pub fn tick(&mut self, input: ControllerInput, dt: f32) -> Outcome {
        // Airborne player holds its last frame.
        if !self.controller.airborne {
            self.player.update_animation(dt, self.player_max_frame);
        }
        for obstacle in &mut self.obstacles {
            obstacle.update_animation(dt, self.obstacle_max_frame);
        }

        self.controller
            .step(&mut self.player, input, dt, self.window_size.1);

        for layer in &mut self.layers {
            layer.scroll(dt);
        }

        self.finish_line_x = move_obstacles(&mut self.obstacles, self.obstacle_velocity, dt)
            .unwrap_or(self.finish_line_x);

        check_collisions(
            &self.player,
            &self.obstacles,
            self.collision_padding,
            &mut self.collision,
        );

        let outcome = self.outcome();
        if outcome != self.last_outcome {
            log::info!(
                "Outcome: {} -> {}",
                self.last_outcome.label(),
                outcome.label()
            );
            self.last_outcome = outcome;
        }
        outcome
    }

    pub fn outcome(&self) -> Outcome {
        if self.collision.is_set() {
            Outcome::Lost
        } else if self.player.position.x >= self.finish_line_x {
            Outcome::Won
        } else {
            Outcome::Playing
        }
    }

    /// Apply tunables from a reloaded config without resetting positions,
    /// animation state or the collision latch.
    pub fn retune(&mut self, config: &GameConfig) {
        self.controller.config = config.physics;
        self.player.frame_interval = config.player.frame_interval;
        self.player_max_frame = config.player.max_frame;
        self.obstacle_max_frame = config.obstacles.max_frame;
        self.obstacle_velocity = config.obstacles.velocity;
        self.collision_padding = config.obstacles.collision_padding;
        for obstacle in &mut self.obstacles {
            obstacle.frame_interval = config.obstacles.frame_interval;
            // Keep the frame index inside a possibly shorter strip.
            if obstacle.current_frame > self.obstacle_max_frame {
                obstacle.current_frame = 0;
                obstacle.frame_rect.x = 0.0;
            }
        }
        if self.player.current_frame > self.player_max_frame {
            self.player.current_frame = 0;
            self.player.frame_rect.x = 0.0;
        }
        for (layer, layer_config) in self.layers.iter_mut().zip(&config.parallax) {
            layer.speed = layer_config.speed;
            layer.scale = layer_config.scale;
        }
        if config.obstacles.count != self.obstacles.len() {
            log::warn!(
                "Config reload: obstacles.count changed to {} but only takes effect on restart",
                config.obstacles.count
            );
        }
    }
}

/// Move every obstacle by the shared velocity. Returns the last obstacle's new
/// x position, which is where the finish line sits.
pub fn move_obstacles(obstacles: &mut [AnimatedSprite], velocity: f32, dt: f32) -> Option<f32> {
    for obstacle in obstacles.iter_mut() {
        obstacle.position.x += velocity * dt;
    }
    obstacles.last().map(|o| o.position.x)
}
