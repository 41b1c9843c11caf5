//! Game Components
//!
//! All the component types used by the platformer.
//! Components are plain data structs - behavior lives in systems.

use std::collections::HashMap;
use std::sync::Arc;

use macroquad::math::{Rect, Vec2};
use serde::{Deserialize, Serialize};

use super::entity::EntityId;

// =============================================================================
// Spatial
// =============================================================================

/// Authoritative spatial state of an entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec2,
    pub velocity: Vec2,
    pub acceleration: Vec2,
    pub facing_right: bool,
}

impl Transform {
    /// Transform at rest at `position`, facing right.
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            facing_right: true,
        }
    }

    pub fn facing(mut self, facing_right: bool) -> Self {
        self.facing_right = facing_right;
        self
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::at(Vec2::ZERO)
    }
}

/// Which group a collider belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColliderLayer {
    Player,
    Enemy,
    Ground,
    Collectible,
}

/// Axis-aligned collision box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collider {
    /// Bounds relative to the entity's position
    pub bounds: Rect,
    /// Detects overlap but never blocks
    pub is_trigger: bool,
    pub layer: ColliderLayer,
}

impl Collider {
    /// Solid box of the given size anchored at the entity's position.
    pub fn solid(width: f32, height: f32, layer: ColliderLayer) -> Self {
        Self {
            bounds: Rect::new(0.0, 0.0, width, height),
            is_trigger: false,
            layer,
        }
    }

    /// Collider bounds in world coordinates.
    pub fn world_bounds(&self, position: Vec2) -> Rect {
        Rect::new(
            position.x + self.bounds.x,
            position.y + self.bounds.y,
            self.bounds.w,
            self.bounds.h,
        )
    }
}

// =============================================================================
// Control / Physics
// =============================================================================

/// Per-frame player intent, written by the input system.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Input {
    /// -1.0 (left) to 1.0 (right)
    pub move_x: f32,
    /// True only on the frame the jump was initiated
    pub jump_pressed: bool,
    /// True while the jump key is held
    pub jump_held: bool,
}

/// Per-entity physics tuning plus the derived ground flag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Physics {
    pub gravity: f32,
    pub jump_force: f32,
    pub move_speed: f32,
    /// Set by the collision system, true only after a top-side contact this frame
    pub on_ground: bool,
}

impl Physics {
    pub fn new(gravity: f32, jump_force: f32, move_speed: f32) -> Self {
        Self {
            gravity,
            jump_force,
            move_speed,
            on_ground: false,
        }
    }
}

// =============================================================================
// Combat
// =============================================================================

/// Hit points. `current` always stays within [0, max].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Health {
    pub current: i32,
    pub max: i32,
}

impl Health {
    pub fn new(max: i32) -> Self {
        let max = max.max(0);
        Self { current: max, max }
    }

    pub fn take_damage(&mut self, amount: i32) {
        self.current = self.current.saturating_sub(amount).clamp(0, self.max);
    }

    pub fn heal(&mut self, amount: i32) {
        self.current = self.current.saturating_add(amount).clamp(0, self.max);
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0
    }
}

// =============================================================================
// Tiles
// =============================================================================

/// Kind of static level tile. Stored in map files as its integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum TileType {
    Grass,
    Stone,
    Water,
    Tree,
    Rock,
}

impl TileType {
    pub const ALL: [TileType; 5] = [
        TileType::Grass,
        TileType::Stone,
        TileType::Water,
        TileType::Tree,
        TileType::Rock,
    ];

    pub fn code(self) -> i32 {
        match self {
            TileType::Grass => 0,
            TileType::Stone => 1,
            TileType::Water => 2,
            TileType::Tree => 3,
            TileType::Rock => 4,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TileType::Grass => "Grass",
            TileType::Stone => "Stone",
            TileType::Water => "Water",
            TileType::Tree => "Tree",
            TileType::Rock => "Rock",
        }
    }
}

impl TryFrom<i32> for TileType {
    type Error = String;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        TileType::ALL
            .into_iter()
            .find(|t| t.code() == code)
            .ok_or_else(|| format!("unknown tile type {}", code))
    }
}

impl From<TileType> for i32 {
    fn from(tile: TileType) -> Self {
        tile.code()
    }
}

/// Marks an entity as a static tile. Tiles never move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub tile_type: TileType,
}

// =============================================================================
// AI
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AiBehavior {
    #[default]
    Idle,
    Patrol,
    Chase,
}

/// AI state for mobs. Driven by gameplay code outside the core systems.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Ai {
    pub behavior: AiBehavior,
    pub patrol_path: Vec<Vec2>,
    pub path_index: usize,
    /// `EntityId::NONE` when there is no target
    pub target: EntityId,
}

impl Ai {
    pub fn patrol(path: Vec<Vec2>) -> Self {
        Self {
            behavior: AiBehavior::Patrol,
            patrol_path: path,
            path_index: 0,
            target: EntityId::NONE,
        }
    }

    pub fn current_waypoint(&self) -> Option<Vec2> {
        self.patrol_path.get(self.path_index).copied()
    }

    pub fn has_target(&self) -> bool {
        !self.target.is_none()
    }
}

// =============================================================================
// Sprites / Animation
// =============================================================================

/// Visual mode of an entity. Purely cosmetic, not a gameplay state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum AnimationState {
    #[default]
    Idle,
    Running,
    Jumping,
    Falling,
}

/// Index of a GPU texture owned by the texture provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

/// A texture reference plus its pixel size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureHandle {
    pub id: TextureId,
    pub width: f32,
    pub height: f32,
}

impl TextureHandle {
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

/// How an animation's frames are stored.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameSource {
    /// All frames side by side in one texture; playback moves the source rect.
    SpriteSheet,
    /// Frames decoded into one RGBA buffer, back to back. Playback uploads
    /// the current frame's bytes into the texture.
    Decoded {
        pixels: Arc<[u8]>,
        /// Bytes per frame (width * height * 4)
        frame_bytes: usize,
    },
}

/// Playback state for a single animation.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationData {
    pub texture: TextureHandle,
    pub frame_count: u32,
    pub current_frame: u32,
    /// Ticks between frame advances
    pub frame_delay: u32,
    /// Ticks elapsed since the last advance
    pub frame_counter: u32,
    /// Pixels per frame
    pub frame_size: u32,
    pub frames: FrameSource,
}

impl AnimationData {
    /// Sprite sheet with `frame_count` frames laid out horizontally.
    pub fn sprite_sheet(texture: TextureHandle, frame_count: u32, frame_delay: u32, frame_size: u32) -> Self {
        Self {
            texture,
            frame_count,
            current_frame: 0,
            frame_delay,
            frame_counter: 0,
            frame_size,
            frames: FrameSource::SpriteSheet,
        }
    }

    /// Decoded multi-frame image; `pixels` holds every frame as RGBA.
    pub fn decoded(texture: TextureHandle, pixels: Arc<[u8]>, frame_count: u32, frame_delay: u32) -> Self {
        let frame_size = (texture.width * texture.height) as u32;
        Self {
            texture,
            frame_count,
            current_frame: 0,
            frame_delay,
            frame_counter: 0,
            frame_size,
            frames: FrameSource::Decoded {
                pixels,
                frame_bytes: frame_size as usize * 4,
            },
        }
    }

    pub fn is_sprite_sheet(&self) -> bool {
        matches!(self.frames, FrameSource::SpriteSheet)
    }

    /// Size of one frame in pixels, as drawn.
    pub fn frame_dimensions(&self) -> Vec2 {
        match self.frames {
            FrameSource::SpriteSheet => Vec2::new(
                self.texture.width / self.frame_count.max(1) as f32,
                self.texture.height,
            ),
            FrameSource::Decoded { .. } => self.texture.size(),
        }
    }
}

/// Visual representation: one animation per state, plus a uniform scale.
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    pub animations: HashMap<AnimationState, AnimationData>,
    pub current: AnimationState,
    pub scale: f32,
}

impl Sprite {
    pub fn new(animations: HashMap<AnimationState, AnimationData>, current: AnimationState, scale: f32) -> Self {
        Self {
            animations,
            current,
            scale,
        }
    }

    pub fn current_animation(&self) -> Option<&AnimationData> {
        self.animations.get(&self.current)
    }

    pub fn current_animation_mut(&mut self) -> Option<&mut AnimationData> {
        self.animations.get_mut(&self.current)
    }
}
