//! Level map loading and saving
//!
//! A level is a flat list of tile placements stored as pretty-printed JSON:
//!
//! ```json
//! { "tiles": [ { "x": 0.0, "y": 544.0, "tileType": 0 } ] }
//! ```
//!
//! Placements keep their insertion order on disk. The editing API keeps
//! (x, y) unique; files written by hand may still contain duplicates and are
//! loaded as-is.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::game::components::TileType;

/// Validation limits to prevent resource exhaustion from malicious files
pub mod limits {
    /// Maximum number of tiles in a map
    pub const MAX_TILES: usize = 100_000;
    /// Maximum coordinate value (prevents overflow issues)
    pub const MAX_COORD: f32 = 1_000_000.0;
}

/// Error type for level map loading and saving
#[derive(Debug)]
pub enum LevelError {
    IoError(io::Error),
    ParseError(serde_json::Error),
    ValidationError(String),
}

impl From<io::Error> for LevelError {
    fn from(e: io::Error) -> Self {
        LevelError::IoError(e)
    }
}

impl From<serde_json::Error> for LevelError {
    fn from(e: serde_json::Error) -> Self {
        LevelError::ParseError(e)
    }
}

impl std::fmt::Display for LevelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LevelError::IoError(e) => write!(f, "IO error: {}", e),
            LevelError::ParseError(e) => write!(f, "Parse error: {}", e),
            LevelError::ValidationError(e) => write!(f, "Validation error: {}", e),
        }
    }
}

impl std::error::Error for LevelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LevelError::IoError(e) => Some(e),
            LevelError::ParseError(e) => Some(e),
            LevelError::ValidationError(_) => None,
        }
    }
}

/// One tile in the map file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TilePlacement {
    pub x: f32,
    pub y: f32,
    #[serde(rename = "tileType")]
    pub tile_type: TileType,
}

/// Ordered list of tile placements.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LevelMap {
    pub tiles: Vec<TilePlacement>,
}

impl LevelMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Placement at exactly (x, y), if any.
    pub fn tile_at(&self, x: f32, y: f32) -> Option<&TilePlacement> {
        self.tiles.iter().find(|t| t.x == x && t.y == y)
    }

    /// Place a tile. An occupied coordinate has its type replaced in place.
    /// Returns true if the map changed.
    pub fn add_tile(&mut self, x: f32, y: f32, tile_type: TileType) -> bool {
        if let Some(existing) = self.tiles.iter_mut().find(|t| t.x == x && t.y == y) {
            if existing.tile_type == tile_type {
                return false;
            }
            existing.tile_type = tile_type;
            return true;
        }
        self.tiles.push(TilePlacement { x, y, tile_type });
        true
    }

    /// Remove the first tile at (x, y). Returns true if one was removed.
    pub fn remove_tile_at(&mut self, x: f32, y: f32) -> bool {
        match self.tiles.iter().position(|t| t.x == x && t.y == y) {
            Some(idx) => {
                self.tiles.remove(idx);
                true
            }
            None => false,
        }
    }
}

/// Check if a coordinate is valid (not NaN or Inf, within range)
fn is_valid_coord(f: f32) -> bool {
    f.is_finite() && f.abs() <= limits::MAX_COORD
}

/// Validate a whole map
pub fn validate_map(map: &LevelMap) -> Result<(), LevelError> {
    if map.tiles.len() > limits::MAX_TILES {
        return Err(LevelError::ValidationError(format!(
            "too many tiles ({} > {})",
            map.tiles.len(),
            limits::MAX_TILES
        )));
    }
    for (i, tile) in map.tiles.iter().enumerate() {
        if !is_valid_coord(tile.x) || !is_valid_coord(tile.y) {
            return Err(LevelError::ValidationError(format!(
                "tile {} has invalid position ({}, {})",
                i, tile.x, tile.y
            )));
        }
    }
    Ok(())
}

/// Parse and validate a map from JSON text.
pub fn load_map_from_str(s: &str) -> Result<LevelMap, LevelError> {
    let map: LevelMap = serde_json::from_str(s)?;
    validate_map(&map)?;
    Ok(map)
}

/// Load a map from disk. A missing file is an empty map, not an error.
pub fn load_map<P: AsRef<Path>>(path: P) -> Result<LevelMap, LevelError> {
    let path = path.as_ref();
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::warn!("map {} not found, starting empty", path.display());
            return Ok(LevelMap::new());
        }
        Err(e) => return Err(e.into()),
    };

    let map = load_map_from_str(&contents).inspect_err(|e| {
        log::error!("failed to load map {}: {}", path.display(), e);
    })?;
    log::info!("loaded map {} ({} tiles)", path.display(), map.len());
    Ok(map)
}

/// Serialize a map to pretty JSON (fields in order x, y, tileType).
pub fn serialize_map(map: &LevelMap) -> Result<String, LevelError> {
    Ok(serde_json::to_string_pretty(map)?)
}

/// Save a map, creating parent directories as needed.
///
/// Writes to a sibling temp file and renames it over the target, so a crash
/// mid-write leaves the previous file intact.
pub fn save_map<P: AsRef<Path>>(map: &LevelMap, path: P) -> Result<(), LevelError> {
    let path = path.as_ref();
    let json = serialize_map(map)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut tmp_name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    let written = fs::File::create(&tmp_path)
        .and_then(|mut file| {
            file.write_all(json.as_bytes())?;
            file.sync_all()
        })
        .and_then(|()| fs::rename(&tmp_path, path));
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp_path);
        return Err(e.into());
    }

    log::info!("saved map {} ({} tiles)", path.display(), map.len());
    Ok(())
}
