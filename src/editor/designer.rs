//! Designer state: the map being edited, where it is saved, and the
//! transient status line.

use std::path::{Path, PathBuf};

use macroquad::color::{Color, DARKGREEN, ORANGE, RED};
use macroquad::math::Vec2;

use crate::game::components::TileType;
use crate::world::{save_map, LevelMap};

/// How long a status message stays on screen
pub const STATUS_DURATION: f64 = 2.0;

pub struct Designer {
    pub map: LevelMap,
    path: PathBuf,
    tile_size: Vec2,
    /// (message, color, expiry_time)
    status_message: Option<(String, Color, f64)>,
}

impl Designer {
    pub fn new(map: LevelMap, path: impl Into<PathBuf>, tile_size: Vec2) -> Self {
        Self {
            map,
            path: path.into(),
            tile_size,
            status_message: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn tile_size(&self) -> Vec2 {
        self.tile_size
    }

    /// Top-left corner of the grid cell containing `pos`.
    pub fn snap_to_grid(&self, pos: Vec2) -> Vec2 {
        (pos / self.tile_size).floor() * self.tile_size
    }

    /// Place a grass tile in the cell under `pos`. Returns false if the cell
    /// was already taken.
    pub fn add_tile_at(&mut self, pos: Vec2, now: f64) -> bool {
        let cell = self.snap_to_grid(pos);
        let added = self.map.add_tile(cell.x, cell.y, TileType::Grass);
        if added {
            self.set_status("Tile added", DARKGREEN, now);
        }
        added
    }

    /// Remove the tile in the cell under `pos`, if any.
    pub fn remove_tile_at(&mut self, pos: Vec2, now: f64) -> bool {
        let cell = self.snap_to_grid(pos);
        let removed = self.map.remove_tile_at(cell.x, cell.y);
        if removed {
            self.set_status("Tile removed", ORANGE, now);
        }
        removed
    }

    /// Write the map to its path and report the outcome in the status line.
    pub fn save(&mut self, now: f64) -> bool {
        match save_map(&self.map, &self.path) {
            Ok(()) => {
                let file = self
                    .path
                    .file_name()
                    .map(|f| f.to_string_lossy().into_owned())
                    .unwrap_or_else(|| self.path.display().to_string());
                self.set_status(&format!("Saved to {}", file), DARKGREEN, now);
                true
            }
            Err(e) => {
                log::error!("saving {} failed: {}", self.path.display(), e);
                self.set_status(&format!("Save failed: {}", e), RED, now);
                false
            }
        }
    }

    pub fn set_status(&mut self, message: &str, color: Color, now: f64) {
        self.status_message = Some((message.to_string(), color, now + STATUS_DURATION));
    }

    /// Current status message, if it hasn't expired at `now`.
    pub fn status(&self, now: f64) -> Option<(&str, Color)> {
        match &self.status_message {
            Some((msg, color, expiry)) if now < *expiry => Some((msg.as_str(), *color)),
            _ => None,
        }
    }
}
