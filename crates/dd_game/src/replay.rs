use crate::controller::ControllerInput;
use crate::world::{Outcome, World};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct ReplaySequence {
    #[serde(default = "default_dt")]
    pub dt: f32,
    pub frames: Vec<ReplayFrame>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReplayFrame {
    #[serde(default)]
    pub jump_pressed: bool,
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

/// Outcome after every tick of a replay run.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayResult {
    pub outcomes: Vec<Outcome>,
}

impl ReplayResult {
    pub fn final_outcome(&self) -> Option<Outcome> {
        self.outcomes.last().copied()
    }

    pub fn first_tick_with(&self, outcome: Outcome) -> Option<usize> {
        self.outcomes.iter().position(|o| *o == outcome)
    }
}

impl ReplaySequence {
    pub fn expanded_inputs(&self) -> Vec<ControllerInput> {
        let mut out = Vec::new();
        for frame in &self.frames {
            for _ in 0..frame.repeat.max(1) {
                out.push(ControllerInput {
                    jump_pressed: frame.jump_pressed,
                });
            }
        }
        out
    }

    pub fn run(&self, world: &mut World) -> ReplayResult {
        let outcomes = self
            .expanded_inputs()
            .into_iter()
            .map(|input| world.tick(input, self.dt))
            .collect();
        ReplayResult { outcomes }
    }
}

pub fn load_replay_from_path(path: &Path) -> Result<ReplaySequence, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let replay: ReplaySequence = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse replay JSON {}: {e}", path.display()))?;
    validate_replay(&replay)?;
    Ok(replay)
}

fn validate_replay(replay: &ReplaySequence) -> Result<(), String> {
    if replay.dt <= 0.0 {
        return Err("Replay validation failed: dt must be > 0".to_string());
    }
    if replay.frames.is_empty() {
        return Err("Replay validation failed: frames list is empty".to_string());
    }
    Ok(())
}

const fn default_dt() -> f32 {
    1.0 / 60.0
}

const fn default_repeat() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::world::SheetSizes;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "dd_replay_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    fn write_replay(name_hint: &str, json: &str) -> ReplaySequence {
        let path = temp_file_path(name_hint);
        fs::write(&path, json).expect("write replay file");
        let replay = load_replay_from_path(&path).expect("replay should load");
        let _ = fs::remove_file(path);
        replay
    }

    fn sizes() -> SheetSizes {
        SheetSizes {
            player: (768, 128),
            obstacle: (1024, 1024),
            parallax_widths: [256, 256, 352],
        }
    }

    fn single_obstacle_world() -> World {
        let mut config = GameConfig::default();
        config.obstacles.count = 1;
        World::new(&config, &sizes()).expect("single obstacle world")
    }

    #[test]
    fn replay_file_parses_and_expands() {
        let replay = write_replay(
            "parse",
            r#"{
              "dt": 0.016666667,
              "frames": [
                { "repeat": 3 },
                { "jump_pressed": true }
              ]
            }"#,
        );
        let expanded = replay.expanded_inputs();
        assert_eq!(expanded.len(), 4);
        assert!(!expanded[2].jump_pressed);
        assert!(expanded[3].jump_pressed);
    }

    #[test]
    fn empty_replay_is_rejected() {
        let path = temp_file_path("empty");
        fs::write(&path, r#"{ "frames": [] }"#).expect("write replay file");
        let err = load_replay_from_path(&path).expect_err("empty frames should fail");
        assert!(err.contains("frames list is empty"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn replay_run_is_deterministic() {
        let replay = write_replay(
            "deterministic",
            r#"{
              "frames": [
                { "repeat": 40 },
                { "jump_pressed": true },
                { "repeat": 70 },
                { "jump_pressed": true },
                { "repeat": 90 }
              ]
            }"#,
        );

        let mut world_a = World::new(&GameConfig::default(), &sizes()).expect("world");
        let mut world_b = World::new(&GameConfig::default(), &sizes()).expect("world");
        let result_a = replay.run(&mut world_a);
        let result_b = replay.run(&mut world_b);

        assert_eq!(result_a, result_b);
        assert_eq!(world_a.player, world_b.player);
        assert_eq!(world_a.obstacles, world_b.obstacles);
        assert_eq!(world_a.layers, world_b.layers);
        assert_eq!(world_a.controller, world_b.controller);
    }

    #[test]
    fn standing_still_runs_into_the_first_obstacle() {
        let replay = write_replay("idle", r#"{ "frames": [ { "repeat": 120 } ] }"#);
        let mut world = single_obstacle_world();
        let result = replay.run(&mut world);
        assert_eq!(result.final_outcome(), Some(Outcome::Lost));
        assert_eq!(result.first_tick_with(Outcome::Won), None);
    }

    #[test]
    fn well_timed_jump_clears_obstacle_and_wins() {
        // One second in, the obstacle is 200px closer; jumping then keeps the
        // player above its hitbox for the whole crossing.
        let replay = write_replay(
            "win",
            r#"{
              "frames": [
                { "repeat": 60 },
                { "jump_pressed": true },
                { "repeat": 119 }
              ]
            }"#,
        );
        let mut world = single_obstacle_world();
        let result = replay.run(&mut world);

        assert_eq!(result.first_tick_with(Outcome::Lost), None);
        assert_eq!(result.final_outcome(), Some(Outcome::Won));
        let won_at = result
            .first_tick_with(Outcome::Won)
            .expect("player should pass the finish line");
        assert!(result.outcomes[won_at..]
            .iter()
            .all(|o| *o == Outcome::Won));
        assert!(world.controller.is_grounded());
    }

    #[test]
    fn loss_persists_for_rest_of_replay() {
        let replay = write_replay(
            "sticky",
            r#"{
              "frames": [
                { "repeat": 100 },
                { "jump_pressed": true },
                { "repeat": 200 }
              ]
            }"#,
        );
        let mut world = single_obstacle_world();
        let result = replay.run(&mut world);
        let lost_at = result
            .first_tick_with(Outcome::Lost)
            .expect("late jump should still collide");
        assert!(result.outcomes[lost_at..]
            .iter()
            .all(|o| *o == Outcome::Lost));
    }
}
