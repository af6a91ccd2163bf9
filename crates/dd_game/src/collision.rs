//! Player-vs-obstacle hit detection.
//!
//! Obstacle hitboxes are the frame rectangle shrunk by a fixed padding on every
//! side, since the nebula art only fills the middle of each frame. The player
//! uses its full frame rectangle. There is no resolution: a hit only latches
//! the game-over flag.

use dd_core::{AnimatedSprite, Rect};

/// A flag that can be set but never cleared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionLatch {
    hit: bool,
}

impl CollisionLatch {
    pub fn is_set(&self) -> bool {
        self.hit
    }

    /// Record `hit`. Returns true only on the transition from clear to set.
    pub fn record(&mut self, hit: bool) -> bool {
        let newly_set = hit && !self.hit;
        self.hit |= hit;
        newly_set
    }
}

pub fn obstacle_hitbox(obstacle: &AnimatedSprite, padding: f32) -> Rect {
    obstacle.bounds().inset(padding)
}

/// Test every obstacle against the player and fold the result into `latch`.
/// All obstacles are tested even once the latch is set. Returns how many
/// obstacles overlapped the player this tick.
pub fn check_collisions(
    player: &AnimatedSprite,
    obstacles: &[AnimatedSprite],
    padding: f32,
    latch: &mut CollisionLatch,
) -> usize {
    let player_rect = player.bounds();
    let mut hits = 0;
    for obstacle in obstacles {
        if obstacle_hitbox(obstacle, padding).overlaps(&player_rect) {
            hits += 1;
        }
    }
    if latch.record(hits > 0) {
        log::info!("Player hit an obstacle");
    }
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn sprite_at(x: f32, y: f32, w: f32, h: f32) -> AnimatedSprite {
        AnimatedSprite::new(w, h, Vec2::new(x, y), 1.0 / 12.0)
    }

    #[test]
    fn latch_never_clears() {
        let mut latch = CollisionLatch::default();
        assert!(!latch.record(false));
        assert!(latch.record(true));
        assert!(!latch.record(true));
        assert!(!latch.record(false));
        assert!(latch.is_set());
    }

    #[test]
    fn overlapping_hitbox_sets_latch() {
        let player = sprite_at(200.0, 252.0, 128.0, 128.0);
        let obstacle = sprite_at(220.0, 280.0, 100.0, 100.0);
        let mut latch = CollisionLatch::default();
        assert_eq!(check_collisions(&player, &[obstacle], 20.0, &mut latch), 1);
        assert!(latch.is_set());
    }

    #[test]
    fn padding_forgives_corner_grazes() {
        // Frames overlap by 10px, but a 20px inset pulls the hitbox clear.
        let player = sprite_at(0.0, 0.0, 100.0, 100.0);
        let obstacle = sprite_at(90.0, 0.0, 100.0, 100.0);
        let mut latch = CollisionLatch::default();
        assert_eq!(check_collisions(&player, &[obstacle], 20.0, &mut latch), 0);
        assert!(!latch.is_set());
    }

    #[test]
    fn negative_extent_hitbox_never_collides() {
        let obstacle = sprite_at(100.0, 100.0, 64.0, 64.0);
        let hitbox = obstacle_hitbox(&obstacle, 50.0);
        assert_eq!(hitbox, Rect::new(150.0, 150.0, -36.0, -36.0));

        let player = sprite_at(90.0, 90.0, 40.0, 110.0);
        let mut latch = CollisionLatch::default();
        assert_eq!(check_collisions(&player, &[obstacle], 50.0, &mut latch), 0);
        assert!(!latch.is_set());

        // Player sitting right on top of the collapsed hitbox still misses.
        let centered = sprite_at(100.0, 100.0, 64.0, 64.0);
        assert_eq!(check_collisions(&centered, &[obstacle], 50.0, &mut latch), 0);
        assert!(!latch.is_set());
    }

    #[test]
    fn zero_extent_hitbox_inside_player_collides() {
        // 100px frame with 50px padding shrinks to a single point.
        let obstacle = sprite_at(200.0, 280.0, 100.0, 100.0);
        let hitbox = obstacle_hitbox(&obstacle, 50.0);
        assert_eq!(hitbox, Rect::new(250.0, 330.0, 0.0, 0.0));

        let player = sprite_at(192.0, 252.0, 128.0, 128.0);
        let mut latch = CollisionLatch::default();
        assert_eq!(check_collisions(&player, &[obstacle], 50.0, &mut latch), 1);
        assert!(latch.is_set());
    }

    #[test]
    fn latch_stays_set_after_obstacles_move_away() {
        let player = sprite_at(200.0, 252.0, 128.0, 128.0);
        let mut obstacle = sprite_at(220.0, 280.0, 100.0, 100.0);
        let mut latch = CollisionLatch::default();
        check_collisions(&player, &[obstacle], 20.0, &mut latch);
        assert!(latch.is_set());

        for _ in 0..10 {
            obstacle.position.x -= 500.0;
            assert_eq!(check_collisions(&player, &[obstacle], 20.0, &mut latch), 0);
            assert!(latch.is_set());
        }
    }

    #[test]
    fn every_obstacle_is_counted() {
        let player = sprite_at(0.0, 0.0, 400.0, 400.0);
        let obstacles = [
            sprite_at(0.0, 0.0, 100.0, 100.0),
            sprite_at(150.0, 0.0, 100.0, 100.0),
            sprite_at(1000.0, 0.0, 100.0, 100.0),
        ];
        let mut latch = CollisionLatch::default();
        assert_eq!(check_collisions(&player, &obstacles, 10.0, &mut latch), 2);
    }
}
