//! Game Runtime
//!
//! Owns the World for play mode: registers the five systems in frame order
//! (input, physics, collision, animation, render), spawns the level and
//! delivers queued events after each frame.

use std::cell::Cell;
use std::rc::Rc;

use macroquad::math::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::input::InputSource;
use crate::world::LevelMap;

use super::animation::{AnimationSystem, FrameUploader};
use super::collision::CollisionSystem;
use super::components::TileType;
use super::controls::InputSystem;
use super::entity::EntityId;
use super::physics::PhysicsSystem;
use super::renderer::{Canvas, RenderSystem, RenderTextures};
use super::spawn::{self, SpriteAssets};
use super::world::World;

/// Tile size used when there is no tile texture to measure.
pub const DEFAULT_TILE_SIZE: Vec2 = Vec2::new(32.0, 32.0);

/// FPS limit setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FpsLimit {
    /// 30 FPS
    Fps30,
    /// 60 FPS (the physics tuning assumes this)
    #[default]
    Fps60,
    /// Unlocked (as fast as possible)
    Unlocked,
}

impl FpsLimit {
    /// Get the target frame time in seconds (None = unlocked)
    pub fn frame_time(&self) -> Option<f64> {
        match self {
            FpsLimit::Fps30 => Some(1.0 / 30.0),
            FpsLimit::Fps60 => Some(1.0 / 60.0),
            FpsLimit::Unlocked => None,
        }
    }

    /// Cycle to next value
    pub fn next(self) -> Self {
        match self {
            FpsLimit::Fps30 => FpsLimit::Fps60,
            FpsLimit::Fps60 => FpsLimit::Unlocked,
            FpsLimit::Unlocked => FpsLimit::Fps30,
        }
    }

    /// Cycle to previous value
    pub fn prev(self) -> Self {
        match self {
            FpsLimit::Fps30 => FpsLimit::Unlocked,
            FpsLimit::Fps60 => FpsLimit::Fps30,
            FpsLimit::Unlocked => FpsLimit::Fps60,
        }
    }

    /// Display name
    pub fn label(&self) -> &'static str {
        match self {
            FpsLimit::Fps30 => "30",
            FpsLimit::Fps60 => "60",
            FpsLimit::Unlocked => "Unlocked",
        }
    }
}

/// Device-facing pieces the systems are built on.
pub struct RuntimeSeams {
    pub input: Box<dyn InputSource>,
    pub canvas: Box<dyn Canvas>,
    pub uploader: Box<dyn FrameUploader>,
    pub textures: RenderTextures,
}

/// Play-mode state.
pub struct GameRuntime {
    pub world: World,
    player: EntityId,
    highlight: Rc<Cell<bool>>,
    config: GameConfig,
    assets: SpriteAssets,
    tile_size: Vec2,
}

impl GameRuntime {
    pub fn new(config: GameConfig, assets: SpriteAssets, seams: RuntimeSeams, map: &LevelMap) -> Self {
        let highlight = Rc::new(Cell::new(config.highlight_borders));
        let tile_size = seams
            .textures
            .tile(TileType::Grass)
            .map(|t| t.size())
            .unwrap_or(DEFAULT_TILE_SIZE);

        let mut world = World::new();
        world.add_system(Box::new(InputSystem::new(seams.input, config.tie_break)));
        world.add_system(Box::new(PhysicsSystem::new()));
        world.add_system(Box::new(CollisionSystem::new()));
        world.add_system(Box::new(AnimationSystem::new(seams.uploader)));
        world.add_system(Box::new(RenderSystem::new(
            seams.canvas,
            seams.textures,
            Rc::clone(&highlight),
        )));

        let mut runtime = Self {
            world,
            player: EntityId::NONE,
            highlight,
            config,
            assets,
            tile_size,
        };
        runtime.populate(map);
        runtime
    }

    fn populate(&mut self, map: &LevelMap) {
        spawn::spawn_tiles(&mut self.world, map, self.tile_size);
        self.player = spawn::spawn_player(&mut self.world, &self.assets, &self.config);
        for &(x, y) in &self.config.mob.spawn_points {
            spawn::spawn_mob(&mut self.world, &self.assets, &self.config, x, y);
        }
        log::info!(
            "level ready: {} tiles, {} entities",
            map.len(),
            self.world.entity_count()
        );
    }

    /// Run one frame: all systems, then deliver the events they queued.
    pub fn tick(&mut self, dt: f32) {
        self.world.update(dt);
        self.world.events.process();
    }

    /// Put the player back at the start position.
    pub fn reset_player(&mut self) {
        let start = self.config.player.start_position();
        spawn::reset_player_position(&mut self.world, start);
    }

    /// Drop every entity and spawn the level again from `map`.
    /// Systems and event subscriptions are kept.
    pub fn reload_level(&mut self, map: &LevelMap) {
        for id in self.world.entities.ids() {
            self.world.remove_entity(id);
        }
        self.populate(map);
    }

    pub fn player(&self) -> EntityId {
        self.player
    }

    pub fn highlight(&self) -> bool {
        self.highlight.get()
    }

    pub fn set_highlight(&self, on: bool) {
        self.highlight.set(on);
    }

    pub fn toggle_highlight(&self) -> bool {
        let on = !self.highlight.get();
        self.highlight.set(on);
        on
    }

    pub fn tile_size(&self) -> Vec2 {
        self.tile_size
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }
}
