//! Physics System
//!
//! Frame-step integration. Units are pixels per frame; `dt` is not used,
//! the game runs at a fixed frame rate.
//!
//! Gravity accumulates into `acceleration.y` while airborne and is zeroed on
//! the ground. Input-driven entities get their velocity rebuilt every frame
//! from intent plus acceleration; everything else only integrates vertical
//! acceleration and keeps its horizontal velocity.

use macroquad::math::Vec2;

use super::components::{Input, Physics, Transform};
use super::entity::EntityId;
use super::event::{Event, EventData, EventKind};
use super::world::{System, World};

/// Share of `Physics::gravity` added to vertical acceleration per frame.
pub const GRAVITY_STEP: f32 = 0.2;

pub struct PhysicsSystem;

impl PhysicsSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PhysicsSystem {
    fn default() -> Self {
        Self::new()
    }
}

/// One integration step. Returns true if a jump started this frame.
pub fn step(transform: &mut Transform, physics: &mut Physics, input: Option<&Input>) -> bool {
    if physics.on_ground {
        transform.acceleration.y = 0.0;
    } else {
        transform.acceleration.y += physics.gravity * GRAVITY_STEP;
    }

    let mut jumped = false;
    match input {
        Some(input) => {
            let mut impulse_y = 0.0;
            if input.jump_pressed && physics.on_ground {
                impulse_y = -physics.jump_force;
                physics.on_ground = false;
                jumped = true;
            }

            if input.move_x < 0.0 {
                transform.facing_right = false;
            } else if input.move_x > 0.0 {
                transform.facing_right = true;
            }

            transform.velocity = Vec2::new(
                input.move_x * physics.move_speed + transform.acceleration.x,
                impulse_y + transform.acceleration.y,
            );
        }
        None => {
            transform.velocity.y += transform.acceleration.y;
        }
    }

    transform.position += transform.velocity;
    jumped
}

impl System for PhysicsSystem {
    fn name(&self) -> &'static str {
        "physics"
    }

    fn update(&mut self, world: &mut World, _dt: f32) {
        let (Some(mut transforms), Some(mut bodies)) = (
            world.components.store_mut::<Transform>(),
            world.components.store_mut::<Physics>(),
        ) else {
            return;
        };
        let inputs = world.components.store::<Input>();

        let mut jumpers: Vec<(EntityId, Vec2)> = Vec::new();
        for (id, physics) in bodies.iter_mut() {
            if !world.entities.is_active(id) {
                continue;
            }
            let Some(transform) = transforms.get_mut(id) else {
                continue;
            };
            let input = inputs.as_ref().and_then(|store| store.get(id));
            if step(transform, physics, input) {
                jumpers.push((id, transform.position));
            }
        }

        for (id, position) in jumpers {
            world
                .events
                .publish(Event::new(EventKind::PlayerJump, id).with_data(EventData::Position(position)));
        }
    }
}
