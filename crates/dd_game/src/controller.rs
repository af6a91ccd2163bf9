use dd_core::AnimatedSprite;

use crate::config::PhysicsConfig;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControllerInput {
    /// Edge-triggered: true only on the frame the jump key went down.
    pub jump_pressed: bool,
}

/// Vertical-only character physics: gravity, a ground line at the bottom of the
/// window, and a fixed jump impulse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerticalController {
    pub velocity_y: f32,
    pub airborne: bool,
    pub config: PhysicsConfig,
}

impl VerticalController {
    pub fn new(config: PhysicsConfig) -> Self {
        Self {
            velocity_y: 0.0,
            airborne: false,
            config,
        }
    }

    pub fn step(
        &mut self,
        sprite: &mut AnimatedSprite,
        input: ControllerInput,
        dt: f32,
        window_height: f32,
    ) {
        if sprite.is_on_ground(window_height) {
            self.velocity_y = 0.0;
            sprite.position.y = window_height - sprite.height();
            self.airborne = false;
        } else {
            self.velocity_y += self.config.gravity * dt;
            self.airborne = true;
        }

        // Jump is edge-triggered and only legal from grounded state.
        if input.jump_pressed && !self.airborne {
            self.velocity_y = self.config.jump_velocity;
        }

        // Explicit Euler, after the branch so a jump this tick moves immediately.
        sprite.position.y += self.velocity_y * dt;
    }

    pub fn is_grounded(&self) -> bool {
        !self.airborne
    }
}
