//! Game configuration loaded from JSON, with every field defaulted.
//!
//! A missing file means "use the built-in defaults". A file that exists but
//! fails to parse or validate is reported as an error so typos are not silently
//! ignored. The watcher polls the file's mtime so tunables can be edited while
//! the game runs.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use dd_core::SheetLayout;

pub const PARALLAX_LAYER_COUNT: usize = 3;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    pub window: WindowConfig,
    pub physics: PhysicsConfig,
    pub player: PlayerConfig,
    pub obstacles: ObstacleConfig,
    pub parallax: Vec<ParallaxLayerConfig>,
    pub audio: AudioConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub target_fps: u32,
    pub vsync: bool,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Downward acceleration, pixels/s².
    pub gravity: f32,
    /// Velocity set by a jump, pixels/s. Negative is up.
    pub jump_velocity: f32,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct PlayerConfig {
    pub texture: String,
    pub columns: u32,
    pub rows: u32,
    pub max_frame: u32,
    pub frame_interval: f32,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ObstacleConfig {
    pub texture: String,
    pub columns: u32,
    pub rows: u32,
    pub max_frame: u32,
    pub frame_interval: f32,
    pub count: usize,
    /// Horizontal gap between consecutive obstacles at spawn.
    pub spacing: f32,
    /// Shared horizontal velocity, pixels/s. Negative moves left.
    pub velocity: f32,
    /// Inset applied to every side of an obstacle's hitbox.
    pub collision_padding: f32,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ParallaxLayerConfig {
    pub texture: String,
    /// Leftward scroll speed, pixels/s.
    pub speed: f32,
    #[serde(default = "default_parallax_scale")]
    pub scale: f32,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AudioConfig {
    pub enabled: bool,
    pub music: String,
    pub initial_volume: f32,
}

impl PlayerConfig {
    pub fn layout(&self) -> SheetLayout {
        SheetLayout::new(self.columns, self.rows)
    }
}

impl ObstacleConfig {
    pub fn layout(&self) -> SheetLayout {
        SheetLayout::new(self.columns, self.rows)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            physics: PhysicsConfig::default(),
            player: PlayerConfig::default(),
            obstacles: ObstacleConfig::default(),
            parallax: vec![
                ParallaxLayerConfig {
                    texture: "textures/far-buildings.png".to_string(),
                    speed: 20.0,
                    scale: default_parallax_scale(),
                },
                ParallaxLayerConfig {
                    texture: "textures/back-buildings.png".to_string(),
                    speed: 40.0,
                    scale: default_parallax_scale(),
                },
                ParallaxLayerConfig {
                    texture: "textures/foreground.png".to_string(),
                    speed: 80.0,
                    scale: default_parallax_scale(),
                },
            ],
            audio: AudioConfig::default(),
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Dapper Dasher".to_string(),
            width: 512,
            height: 380,
            target_fps: 60,
            vsync: true,
        }
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 1_000.0,
            jump_velocity: -600.0,
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            texture: "textures/scarfy.png".to_string(),
            columns: 6,
            rows: 1,
            max_frame: 5,
            frame_interval: 1.0 / 12.0,
        }
    }
}

impl Default for ObstacleConfig {
    fn default() -> Self {
        Self {
            texture: "textures/12_nebula_spritesheet.png".to_string(),
            columns: 8,
            rows: 8,
            max_frame: 7,
            frame_interval: 1.0 / 12.0,
            count: 10,
            spacing: 300.0,
            velocity: -200.0,
            collision_padding: 50.0,
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            music: "audio/music.mp3".to_string(),
            initial_volume: 1.0,
        }
    }
}

const fn default_parallax_scale() -> f32 {
    2.0
}

pub fn load_config_from_path(path: &Path) -> Result<GameConfig, String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config file {}: {e}", path.display()))?;
    let config: GameConfig = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse config JSON {}: {e}", path.display()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Load `path`, falling back to defaults when it is missing or invalid.
pub fn load_config_or_default(path: &Path) -> GameConfig {
    if !path.exists() {
        log::warn!(
            "Config '{}' not found. Using built-in defaults.",
            path.display()
        );
        return GameConfig::default();
    }
    match load_config_from_path(path) {
        Ok(config) => {
            log::info!("Config loaded: {}", path.display());
            config
        }
        Err(err) => {
            log::error!("{err}. Using built-in defaults.");
            GameConfig::default()
        }
    }
}

pub fn validate_config(config: &GameConfig) -> Result<(), String> {
    let window = &config.window;
    if window.width == 0 || window.height == 0 {
        return Err("Config validation failed: window width and height must be > 0".to_string());
    }

    if config.physics.gravity <= 0.0 {
        return Err("Config validation failed: physics.gravity must be > 0".to_string());
    }
    if config.physics.jump_velocity >= 0.0 {
        return Err(
            "Config validation failed: physics.jump_velocity must be < 0 (upward)".to_string(),
        );
    }

    validate_sheet(
        "player",
        config.player.columns,
        config.player.rows,
        config.player.max_frame,
        config.player.frame_interval,
    )?;
    validate_sheet(
        "obstacles",
        config.obstacles.columns,
        config.obstacles.rows,
        config.obstacles.max_frame,
        config.obstacles.frame_interval,
    )?;
    if config.obstacles.count == 0 {
        return Err("Config validation failed: obstacles.count must be >= 1".to_string());
    }
    if config.obstacles.collision_padding < 0.0 {
        return Err(
            "Config validation failed: obstacles.collision_padding must be >= 0".to_string(),
        );
    }

    if config.parallax.len() != PARALLAX_LAYER_COUNT {
        return Err(format!(
            "Config validation failed: expected {} parallax layers, found {}",
            PARALLAX_LAYER_COUNT,
            config.parallax.len()
        ));
    }
    for (i, layer) in config.parallax.iter().enumerate() {
        if layer.scale <= 0.0 {
            return Err(format!(
                "Config validation failed: parallax layer {} scale must be > 0",
                i
            ));
        }
        if layer.texture.is_empty() {
            return Err(format!(
                "Config validation failed: parallax layer {} has empty texture path",
                i
            ));
        }
    }

    if !(0.1..=1.0).contains(&config.audio.initial_volume) {
        return Err(
            "Config validation failed: audio.initial_volume must be within [0.1, 1.0]".to_string(),
        );
    }
    Ok(())
}

fn validate_sheet(
    name: &str,
    columns: u32,
    rows: u32,
    max_frame: u32,
    frame_interval: f32,
) -> Result<(), String> {
    if columns == 0 || rows == 0 {
        return Err(format!(
            "Config validation failed: {name} columns and rows must be > 0"
        ));
    }
    if max_frame >= columns {
        return Err(format!(
            "Config validation failed: {name}.max_frame {max_frame} exceeds sheet columns {columns}"
        ));
    }
    if frame_interval <= 0.0 {
        return Err(format!(
            "Config validation failed: {name}.frame_interval must be > 0"
        ));
    }
    Ok(())
}

pub struct ConfigWatcher {
    path: PathBuf,
    last_seen_modified: Option<SystemTime>,
}

impl ConfigWatcher {
    pub fn new(path: PathBuf) -> Self {
        let last_seen_modified = modified_time(&path);
        Self {
            path,
            last_seen_modified,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn should_reload(&mut self) -> bool {
        let current = modified_time(&self.path);
        match (self.last_seen_modified, current) {
            (Some(old), Some(now)) if now > old => {
                self.last_seen_modified = Some(now);
                true
            }
            (None, Some(now)) => {
                self.last_seen_modified = Some(now);
                true
            }
            _ => false,
        }
    }
}

fn modified_time(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).ok()?.modified().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::UNIX_EPOCH;

    fn temp_file_path(name_hint: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "dd_config_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    #[test]
    fn defaults_are_valid() {
        validate_config(&GameConfig::default()).expect("defaults should validate");
    }

    #[test]
    fn empty_object_yields_defaults() {
        let path = temp_file_path("empty");
        fs::write(&path, "{}").expect("write temp file");
        let config = load_config_from_path(&path).expect("empty config should load");
        assert_eq!(config, GameConfig::default());
        let _ = fs::remove_file(path);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let path = temp_file_path("partial");
        fs::write(
            &path,
            r#"{
              "physics": { "gravity": 1500.0 },
              "obstacles": { "count": 3, "velocity": -250.0 }
            }"#,
        )
        .expect("write temp file");

        let config = load_config_from_path(&path).expect("partial config should load");
        assert_eq!(config.physics.gravity, 1500.0);
        assert_eq!(config.physics.jump_velocity, -600.0);
        assert_eq!(config.obstacles.count, 3);
        assert_eq!(config.obstacles.velocity, -250.0);
        assert_eq!(config.obstacles.collision_padding, 50.0);
        assert_eq!(config.window.width, 512);
        assert!(config.window.vsync);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn parallax_scale_defaults_to_two() {
        let path = temp_file_path("parallax");
        fs::write(
            &path,
            r#"{
              "parallax": [
                { "texture": "a.png", "speed": 1.0 },
                { "texture": "b.png", "speed": 2.0, "scale": 3.0 },
                { "texture": "c.png", "speed": 3.0 }
              ]
            }"#,
        )
        .expect("write temp file");

        let config = load_config_from_path(&path).expect("parallax config should load");
        assert_eq!(config.parallax[0].scale, 2.0);
        assert_eq!(config.parallax[1].scale, 3.0);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn rejects_wrong_parallax_layer_count() {
        let mut config = GameConfig::default();
        config.parallax.pop();
        let err = validate_config(&config).expect_err("two layers should fail");
        assert!(err.contains("expected 3 parallax layers"));
    }

    #[test]
    fn rejects_zero_obstacles() {
        let mut config = GameConfig::default();
        config.obstacles.count = 0;
        let err = validate_config(&config).expect_err("zero obstacles should fail");
        assert!(err.contains("obstacles.count"));
    }

    #[test]
    fn rejects_max_frame_outside_sheet() {
        let mut config = GameConfig::default();
        config.player.max_frame = 6;
        let err = validate_config(&config).expect_err("max_frame 6 of 6 columns should fail");
        assert!(err.contains("exceeds sheet columns"));
    }

    #[test]
    fn rejects_downward_jump() {
        let mut config = GameConfig::default();
        config.physics.jump_velocity = 600.0;
        let err = validate_config(&config).expect_err("positive jump should fail");
        assert!(err.contains("jump_velocity"));
    }

    #[test]
    fn rejects_out_of_range_volume() {
        let mut config = GameConfig::default();
        config.audio.initial_volume = 0.0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn malformed_json_is_an_error() {
        let path = temp_file_path("malformed");
        fs::write(&path, "{ not json").expect("write temp file");
        let err = load_config_from_path(&path).expect_err("malformed json should fail");
        assert!(err.contains("Failed to parse config JSON"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let path = temp_file_path("missing");
        let _ = fs::remove_file(&path);
        assert_eq!(load_config_or_default(&path), GameConfig::default());
    }

    #[test]
    fn invalid_file_falls_back_to_defaults() {
        let path = temp_file_path("invalid");
        fs::write(&path, r#"{ "obstacles": { "count": 0 } }"#).expect("write temp file");
        assert_eq!(load_config_or_default(&path), GameConfig::default());
        let _ = fs::remove_file(path);
    }

    #[test]
    fn config_watcher_detects_newly_created_file() {
        let path = temp_file_path("watcher_create");
        let _ = fs::remove_file(&path);

        let mut watcher = ConfigWatcher::new(path.clone());
        assert!(!watcher.should_reload(), "missing file should not reload");

        fs::write(&path, "{}").expect("write temp file");

        assert!(
            watcher.should_reload(),
            "creating file should trigger reload once"
        );
        assert!(
            !watcher.should_reload(),
            "without changes, second poll should not reload"
        );

        let _ = fs::remove_file(path);
    }
}
