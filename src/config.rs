//! Game configuration and project paths
//!
//! Tunables live in `config.ron` at the project root. Every field has a
//! default, so the file only needs the values it overrides and a missing
//! file means "all defaults".

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use macroquad::math::Vec2;
use serde::{Deserialize, Serialize};

use crate::game::runtime::FpsLimit;
use crate::input::HorizontalTieBreak;

/// Name of the config file under the project root.
pub const CONFIG_FILE: &str = "config.ron";
/// Directory whose presence marks the project root.
pub const RESOURCES_DIR: &str = "resources";

#[derive(Debug)]
pub enum ConfigError {
    IoError(io::Error),
    ParseError(ron::error::SpannedError),
}

impl From<io::Error> for ConfigError {
    fn from(e: io::Error) -> Self {
        ConfigError::IoError(e)
    }
}

impl From<ron::error::SpannedError> for ConfigError {
    fn from(e: ron::error::SpannedError) -> Self {
        ConfigError::ParseError(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {}", e),
            ConfigError::ParseError(e) => write!(f, "Parse error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Player spawn and physics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub start: (f32, f32),
    pub jump_force: f32,
    pub move_speed: f32,
    pub max_health: i32,
}

impl PlayerConfig {
    pub fn start_position(&self) -> Vec2 {
        Vec2::new(self.start.0, self.start.1)
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            start: (100.0, 300.0),
            jump_force: 12.0,
            move_speed: 4.0,
            max_health: 5,
        }
    }
}

/// Mob dimensions and behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MobConfig {
    pub collider_size: (f32, f32),
    pub move_speed: f32,
    /// How far left of its spawn point a mob patrols
    pub patrol_distance: f32,
    /// Where mobs are spawned at level start
    pub spawn_points: Vec<(f32, f32)>,
}

impl Default for MobConfig {
    fn default() -> Self {
        Self {
            collider_size: (48.0, 32.0),
            move_speed: 1.0,
            patrol_distance: 100.0,
            spawn_points: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub screen_width: i32,
    pub screen_height: i32,
    pub fps_limit: FpsLimit,
    pub gravity: f32,
    pub hero_scaling: f32,
    pub player: PlayerConfig,
    pub mob: MobConfig,
    pub tie_break: HorizontalTieBreak,
    /// Map file, relative to the project root
    pub map_path: String,
    /// Initial state of the collider outline toggle
    pub highlight_borders: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            screen_width: 800,
            screen_height: 600,
            fps_limit: FpsLimit::default(),
            gravity: 0.6,
            hero_scaling: 1.7,
            player: PlayerConfig::default(),
            mob: MobConfig::default(),
            tie_break: HorizontalTieBreak::default(),
            map_path: "maps/custom_map.json".to_string(),
            highlight_borders: false,
        }
    }
}

impl GameConfig {
    pub fn from_ron_str(s: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(s)?)
    }

    /// Load from a RON file. A missing file yields the defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => {
                let config = Self::from_ron_str(&contents)?;
                log::info!("loaded config from {}", path.display());
                Ok(config)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("no config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Resolved project root plus helpers for paths under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPaths {
    root: PathBuf,
}

impl ProjectPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Walk up from `start` to the first directory containing `resources/`.
    /// Falls back to `.` when none is found.
    pub fn discover_from(start: &Path) -> Self {
        let found = start
            .ancestors()
            .find(|dir| dir.join(RESOURCES_DIR).is_dir())
            .map(Path::to_path_buf);
        match found {
            Some(root) => Self::new(root),
            None => {
                log::warn!("no {}/ directory above {}, using .", RESOURCES_DIR, start.display());
                Self::new(".")
            }
        }
    }

    /// Discover from the current working directory.
    pub fn discover() -> Self {
        match std::env::current_dir() {
            Ok(cwd) => Self::discover_from(&cwd),
            Err(e) => {
                log::warn!("cannot read working directory ({}), using .", e);
                Self::new(".")
            }
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of a file relative to the project root.
    pub fn resolve(&self, rel: impl AsRef<Path>) -> PathBuf {
        self.root.join(rel)
    }

    pub fn config_file(&self) -> PathBuf {
        self.resolve(CONFIG_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GameConfig::default();
        assert_eq!(config.screen_width, 800);
        assert_eq!(config.gravity, 0.6);
        assert_eq!(config.player.start_position(), Vec2::new(100.0, 300.0));
        assert_eq!(config.mob.collider_size, (48.0, 32.0));
        assert_eq!(config.map_path, "maps/custom_map.json");
        assert_eq!(config.fps_limit, FpsLimit::Fps60);
    }

    #[test]
    fn test_partial_ron_keeps_defaults() {
        let config = GameConfig::from_ron_str(
            "(gravity: 0.8, player: (jump_force: 10.0), tie_break: PreferRight, fps_limit: Fps30)",
        )
        .unwrap();
        assert_eq!(config.gravity, 0.8);
        assert_eq!(config.player.jump_force, 10.0);
        assert_eq!(config.player.move_speed, 4.0);
        assert_eq!(config.tie_break, HorizontalTieBreak::PreferRight);
        assert_eq!(config.fps_limit, FpsLimit::Fps30);
        assert_eq!(config.hero_scaling, 1.7);
    }

    #[test]
    fn test_load_missing_and_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let missing = GameConfig::load(dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(missing, GameConfig::default());

        let path = dir.path().join("bad.ron");
        fs::write(&path, "(gravity: ").unwrap();
        assert!(matches!(GameConfig::load(&path), Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_discover_walks_up_to_resources() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("resources")).unwrap();
        let nested = dir.path().join("target").join("debug");
        fs::create_dir_all(&nested).unwrap();

        let paths = ProjectPaths::discover_from(&nested);
        assert_eq!(paths.root(), dir.path());
        assert_eq!(paths.resolve("maps/custom_map.json"), dir.path().join("maps/custom_map.json"));
    }

    #[test]
    fn test_discover_falls_back_to_dot() {
        let dir = tempfile::tempdir().unwrap();
        // tempdir is usually under /tmp, which has no resources/ above it
        let paths = ProjectPaths::discover_from(dir.path());
        if paths.root() != Path::new(".") {
            assert!(paths.root().join(RESOURCES_DIR).is_dir());
        }
    }
}
