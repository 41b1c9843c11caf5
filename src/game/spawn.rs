//! Convenience Spawners
//!
//! Build the player, mobs and level tiles out of components. Each spawner
//! registers the stores it uses, so it works on a fresh world.

use std::collections::HashMap;

use macroquad::math::Vec2;

use crate::config::GameConfig;
use crate::world::LevelMap;

use super::components::*;
use super::entity::EntityId;
use super::world::World;

/// Animations the spawners hand out to entities.
#[derive(Debug, Clone, Default)]
pub struct SpriteAssets {
    /// One animation per state; Idle sizes the player's collider
    pub hero: HashMap<AnimationState, AnimationData>,
    /// The mob only walks
    pub mob_walk: Option<AnimationData>,
}

/// Create the player at the configured start position.
pub fn spawn_player(world: &mut World, assets: &SpriteAssets, config: &GameConfig) -> EntityId {
    world.components.register::<Transform>();
    world.components.register::<Sprite>();
    world.components.register::<Collider>();
    world.components.register::<Input>();
    world.components.register::<Physics>();
    world.components.register::<Health>();

    let player = world.create_entity(&["player"]);
    let scale = config.hero_scaling;

    world
        .components
        .insert(player, Transform::at(config.player.start_position()));

    let idle_size = match assets.hero.get(&AnimationState::Idle) {
        Some(idle) => idle.frame_dimensions(),
        None => {
            log::warn!("hero has no idle animation, player collider is empty");
            Vec2::ZERO
        }
    };
    world
        .components
        .insert(player, Sprite::new(assets.hero.clone(), AnimationState::Idle, scale));
    world.components.insert(
        player,
        Collider::solid(idle_size.x * scale, idle_size.y * scale, ColliderLayer::Player),
    );
    world.components.insert(player, Input::default());
    world.components.insert(
        player,
        Physics::new(config.gravity, config.player.jump_force, config.player.move_speed),
    );
    world.components.insert(player, Health::new(config.player.max_health));

    player
}

/// Create a patrolling mob at (x, y), facing left.
pub fn spawn_mob(world: &mut World, assets: &SpriteAssets, config: &GameConfig, x: f32, y: f32) -> EntityId {
    world.components.register::<Transform>();
    world.components.register::<Sprite>();
    world.components.register::<Collider>();
    world.components.register::<Physics>();
    world.components.register::<Ai>();

    let mob = world.create_entity(&["enemy", "mob"]);

    world
        .components
        .insert(mob, Transform::at(Vec2::new(x, y)).facing(false));

    // Walk is mapped to both idle and running
    let mut animations = HashMap::new();
    if let Some(walk) = &assets.mob_walk {
        animations.insert(AnimationState::Idle, walk.clone());
        animations.insert(AnimationState::Running, walk.clone());
    }
    world
        .components
        .insert(mob, Sprite::new(animations, AnimationState::Running, 1.0));

    let (w, h) = config.mob.collider_size;
    world.components.insert(mob, Collider::solid(w, h, ColliderLayer::Enemy));
    world
        .components
        .insert(mob, Physics::new(config.gravity, 0.0, config.mob.move_speed));
    world.components.insert(
        mob,
        Ai::patrol(vec![Vec2::new(x, y), Vec2::new(x - config.mob.patrol_distance, y)]),
    );

    mob
}

/// Create one static tile entity per map placement.
pub fn spawn_tiles(world: &mut World, map: &LevelMap, tile_size: Vec2) -> Vec<EntityId> {
    world.components.register::<Transform>();
    world.components.register::<Collider>();
    world.components.register::<Tile>();

    let ids: Vec<EntityId> = map
        .tiles
        .iter()
        .map(|placement| {
            let id = world.create_entity(&["tile", "ground"]);
            world
                .components
                .insert(id, Transform::at(Vec2::new(placement.x, placement.y)));
            world
                .components
                .insert(id, Collider::solid(tile_size.x, tile_size.y, ColliderLayer::Ground));
            world.components.insert(
                id,
                Tile {
                    tile_type: placement.tile_type,
                },
            );
            id
        })
        .collect();

    log::debug!("spawned {} tiles", ids.len());
    ids
}

/// Put every player back at `start`, at rest and airborne.
/// Returns how many players were reset.
pub fn reset_player_position(world: &mut World, start: Vec2) -> usize {
    let Some(mut transforms) = world.components.store_mut::<Transform>() else {
        return 0;
    };
    let mut bodies = world.components.store_mut::<Physics>();

    let mut count = 0;
    for entity in world.entities.with_tag("player") {
        if let Some(transform) = transforms.get_mut(entity.id) {
            transform.position = start;
            transform.velocity = Vec2::ZERO;
            transform.acceleration = Vec2::ZERO;
            count += 1;
        }
        if let Some(physics) = bodies.as_mut().and_then(|b| b.get_mut(entity.id)) {
            physics.on_ground = false;
        }
    }
    count
}
