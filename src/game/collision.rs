//! Collision System
//!
//! Resolves movable entities against static tiles with a minimum
//! translation push-out. Movable means Transform + Collider and no Tile.
//!
//! Each movable entity gets two passes over all tiles:
//! 1. vertical: push out along y, kill velocity into the surface, a top-side
//!    contact grounds the entity
//! 2. horizontal: same along x, using the position fixed by the first pass
//!
//! Trigger colliders overlap freely and are never resolved.

use macroquad::math::{Rect, Vec2};

use super::components::{Collider, Physics, Tile, Transform};
use super::entity::EntityId;
use super::event::{Event, EventData, EventKind};
use super::world::{System, World};

/// Side of the static rect the moving rect should be pushed out through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    Left,
    Right,
    /// Landing on top of the static rect
    Top,
    /// Hitting its underside
    Bottom,
}

impl Contact {
    /// Unit push-out direction.
    pub fn normal(self) -> Vec2 {
        match self {
            Contact::Left => Vec2::new(-1.0, 0.0),
            Contact::Right => Vec2::new(1.0, 0.0),
            Contact::Top => Vec2::new(0.0, -1.0),
            Contact::Bottom => Vec2::new(0.0, 1.0),
        }
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Contact::Top | Contact::Bottom)
    }
}

/// Which side `moving` should leave `fixed` through, or None if they are
/// separated. Touching edges count as contact.
///
/// Overlaps are compared in the order left, right, top, bottom. Top uses
/// `<=` and so wins ties against left/right, which keeps an entity walking
/// across a seam between two tiles from snagging on the second tile's edge.
pub fn contact_direction(moving: Rect, fixed: Rect) -> Option<Contact> {
    let (l1, t1, r1, b1) = (moving.x, moving.y, moving.right(), moving.bottom());
    let (l2, t2, r2, b2) = (fixed.x, fixed.y, fixed.right(), fixed.bottom());

    if l1 > r2 || r1 < l2 || b1 < t2 || t1 > b2 {
        return None;
    }

    let overlap_left = r1 - l2;
    let overlap_right = r2 - l1;
    let overlap_top = b1 - t2;
    let overlap_bottom = b2 - t1;

    let mut min = overlap_left;
    let mut contact = Contact::Left;
    if overlap_right < min {
        min = overlap_right;
        contact = Contact::Right;
    }
    if overlap_top <= min {
        min = overlap_top;
        contact = Contact::Top;
    }
    if overlap_bottom < min {
        contact = Contact::Bottom;
    }
    Some(contact)
}

/// Intersection of two rects. Separated or touching rects give a
/// zero-sized rect.
pub fn overlap_rect(a: Rect, b: Rect) -> Rect {
    let left = a.x.max(b.x);
    let top = a.y.max(b.y);
    let right = a.right().min(b.right());
    let bottom = a.bottom().min(b.bottom());
    Rect::new(left, top, (right - left).max(0.0), (bottom - top).max(0.0))
}

/// Run one resolution pass over `tiles`, handling only vertical or only
/// horizontal contacts. Returns true if a top contact grounded the entity.
fn resolve_pass(transform: &mut Transform, collider: &Collider, tiles: &[Rect], vertical: bool) -> bool {
    let mut grounded = false;
    for &tile in tiles {
        let bounds = collider.world_bounds(transform.position);
        let Some(contact) = contact_direction(bounds, tile) else {
            continue;
        };
        if contact.is_vertical() != vertical {
            continue;
        }

        let overlap = overlap_rect(bounds, tile);
        let normal = contact.normal();
        if vertical {
            transform.position.y += normal.y * overlap.h;
            if normal.y * transform.velocity.y < 0.0 {
                transform.velocity.y = 0.0;
            }
            grounded |= contact == Contact::Top;
        } else {
            transform.position.x += normal.x * overlap.w;
            if normal.x * transform.velocity.x < 0.0 {
                transform.velocity.x = 0.0;
            }
        }
    }
    grounded
}

/// Resolve one entity against all tiles. Returns true if it ended up grounded.
pub fn resolve_against_tiles(transform: &mut Transform, collider: &Collider, tiles: &[Rect]) -> bool {
    let grounded = resolve_pass(transform, collider, tiles, true);
    resolve_pass(transform, collider, tiles, false);
    grounded
}

pub struct CollisionSystem;

impl CollisionSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CollisionSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for CollisionSystem {
    fn name(&self) -> &'static str {
        "collision"
    }

    fn update(&mut self, world: &mut World, _dt: f32) {
        let (Some(mut transforms), Some(colliders)) = (
            world.components.store_mut::<Transform>(),
            world.components.store::<Collider>(),
        ) else {
            return;
        };
        let tiles = world.components.store::<Tile>();
        let mut bodies = world.components.store_mut::<Physics>();

        // Tiles are static, so their world rects are fixed for the frame.
        let tile_rects: Vec<Rect> = match &tiles {
            Some(tiles) => tiles
                .iter()
                .filter(|(id, _)| world.entities.is_active(*id))
                .filter_map(|(id, _)| {
                    let collider = colliders.get(id)?;
                    if collider.is_trigger {
                        return None;
                    }
                    Some(collider.world_bounds(transforms.get(id)?.position))
                })
                .collect(),
            None => Vec::new(),
        };

        let mut landed: Vec<(EntityId, Vec2)> = Vec::new();
        for (id, collider) in colliders.iter() {
            if collider.is_trigger || !world.entities.is_active(id) {
                continue;
            }
            if tiles.as_ref().is_some_and(|t| t.contains(id)) {
                continue;
            }
            let Some(transform) = transforms.get_mut(id) else {
                continue;
            };

            let mut physics = bodies.as_mut().and_then(|store| store.get_mut(id));
            let was_grounded = physics.as_ref().is_some_and(|p| p.on_ground);
            if let Some(physics) = physics.as_mut() {
                physics.on_ground = false;
            }

            let grounded = resolve_against_tiles(transform, collider, &tile_rects);

            if let Some(physics) = physics {
                physics.on_ground = grounded;
                if grounded && !was_grounded {
                    let is_player = world.entities.get(id).is_some_and(|e| e.has_tag("player"));
                    if is_player {
                        landed.push((id, transform.position));
                    }
                }
            }
        }

        for (id, position) in landed {
            world
                .events
                .publish(Event::new(EventKind::PlayerLand, id).with_data(EventData::Position(position)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::components::{ColliderLayer, TileType};

    const TILE: f32 = 32.0;

    fn add_tile(world: &mut World, x: f32, y: f32) -> EntityId {
        let id = world.create_entity(&["tile", "ground"]);
        world.components.insert(id, Transform::at(Vec2::new(x, y)));
        world.components.insert(id, Collider::solid(TILE, TILE, ColliderLayer::Ground));
        world.components.insert(
            id,
            Tile {
                tile_type: TileType::Grass,
            },
        );
        id
    }

    fn add_player(world: &mut World, x: f32, y: f32) -> EntityId {
        let id = world.create_entity(&["player"]);
        world.components.insert(id, Transform::at(Vec2::new(x, y)));
        world.components.insert(id, Collider::solid(20.0, 40.0, ColliderLayer::Player));
        world.components.insert(id, Physics::new(0.6, 12.0, 4.0));
        id
    }

    fn world_with_collision() -> World {
        let mut world = World::new();
        world.add_system(Box::new(CollisionSystem::new()));
        world
    }

    #[test]
    fn test_separated_rects() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(20.0, 0.0, 10.0, 10.0);
        assert_eq!(contact_direction(a, b), None);
    }

    #[test]
    fn test_landing_prefers_top() {
        // Feet 2px into a tile, well inside it horizontally
        let a = Rect::new(5.0, -38.0, 20.0, 40.0);
        let b = Rect::new(0.0, 0.0, 32.0, 32.0);
        assert_eq!(contact_direction(a, b), Some(Contact::Top));
    }

    #[test]
    fn test_top_wins_tie_with_side() {
        // Corner overlap of 2x2: left and top tie
        let a = Rect::new(-8.0, -8.0, 10.0, 10.0);
        let b = Rect::new(0.0, 0.0, 32.0, 32.0);
        assert_eq!(contact_direction(a, b), Some(Contact::Top));
    }

    #[test]
    fn test_side_and_ceiling_contacts() {
        let tile = Rect::new(0.0, 0.0, 32.0, 32.0);
        // Walking into the tile's left face
        assert_eq!(
            contact_direction(Rect::new(-18.0, 2.0, 20.0, 28.0), tile),
            Some(Contact::Left)
        );
        // Walking into its right face
        assert_eq!(
            contact_direction(Rect::new(30.0, 2.0, 20.0, 28.0), tile),
            Some(Contact::Right)
        );
        // Head bump from below
        assert_eq!(
            contact_direction(Rect::new(6.0, 30.0, 20.0, 40.0), tile),
            Some(Contact::Bottom)
        );
    }

    #[test]
    fn test_overlap_rect_touching_is_empty() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        let overlap = overlap_rect(a, b);
        assert_eq!(overlap.w, 0.0);
        assert_eq!(overlap.h, 10.0);
    }

    #[test]
    fn test_landing_pushes_out_and_grounds() {
        let mut world = world_with_collision();
        add_tile(&mut world, 0.0, 100.0);
        let player = add_player(&mut world, 4.0, 63.0);
        world.components.store_mut::<Transform>().unwrap().get_mut(player).unwrap().velocity.y = 3.0;

        world.update(0.016);

        let transform = world.components.get_cloned::<Transform>(player).unwrap();
        assert_eq!(transform.position, Vec2::new(4.0, 60.0));
        assert_eq!(transform.velocity.y, 0.0);
        assert!(world.components.get_cloned::<Physics>(player).unwrap().on_ground);

        let landed: Vec<_> = world.events.pending().map(|e| e.kind).collect();
        assert_eq!(landed, vec![EventKind::PlayerLand]);
    }

    #[test]
    fn test_resting_is_fixed_point() {
        let mut world = world_with_collision();
        add_tile(&mut world, 0.0, 100.0);
        add_tile(&mut world, 32.0, 100.0);
        let player = add_player(&mut world, 20.0, 60.0);

        for _ in 0..5 {
            world.update(0.016);
            let transform = world.components.get_cloned::<Transform>(player).unwrap();
            assert_eq!(transform.position, Vec2::new(20.0, 60.0));
            assert!(world.components.get_cloned::<Physics>(player).unwrap().on_ground);
        }
        // Only the first frame is a landing
        assert_eq!(world.events.pending_count(), 1);
    }

    #[test]
    fn test_wall_stops_horizontal_motion() {
        let mut world = world_with_collision();
        add_tile(&mut world, 100.0, 0.0);
        let player = add_player(&mut world, 83.0, -4.0);
        {
            let mut transforms = world.components.store_mut::<Transform>().unwrap();
            transforms.get_mut(player).unwrap().velocity.x = 4.0;
        }

        world.update(0.016);

        let transform = world.components.get_cloned::<Transform>(player).unwrap();
        assert_eq!(transform.position.x, 80.0);
        assert_eq!(transform.velocity.x, 0.0);
        assert!(!world.components.get_cloned::<Physics>(player).unwrap().on_ground);
    }

    #[test]
    fn test_airborne_clears_on_ground() {
        let mut world = world_with_collision();
        add_tile(&mut world, 0.0, 100.0);
        let player = add_player(&mut world, 0.0, -200.0);
        world.components.store_mut::<Physics>().unwrap().get_mut(player).unwrap().on_ground = true;

        world.update(0.016);
        assert!(!world.components.get_cloned::<Physics>(player).unwrap().on_ground);
        assert_eq!(world.events.pending_count(), 0);
    }

    #[test]
    fn test_triggers_and_inactive_tiles_ignored() {
        let mut world = world_with_collision();
        let tile = add_tile(&mut world, 0.0, 100.0);
        world.entities.set_active(tile, false);

        let coin = world.create_entity(&["coin"]);
        world.components.insert(coin, Transform::at(Vec2::new(0.0, 80.0)));
        world.components.insert(
            coin,
            Collider {
                bounds: Rect::new(0.0, 0.0, 32.0, 32.0),
                is_trigger: true,
                layer: ColliderLayer::Collectible,
            },
        );

        let player = add_player(&mut world, 4.0, 70.0);
        world.update(0.016);

        let transform = world.components.get_cloned::<Transform>(player).unwrap();
        assert_eq!(transform.position, Vec2::new(4.0, 70.0));
        assert_eq!(
            world.components.get_cloned::<Transform>(coin).unwrap().position,
            Vec2::new(0.0, 80.0)
        );
    }

    #[test]
    fn test_tiles_never_move() {
        let mut world = world_with_collision();
        let a = add_tile(&mut world, 0.0, 0.0);
        let b = add_tile(&mut world, 16.0, 0.0);
        world.update(0.016);
        assert_eq!(world.components.get_cloned::<Transform>(a).unwrap().position, Vec2::ZERO);
        assert_eq!(
            world.components.get_cloned::<Transform>(b).unwrap().position,
            Vec2::new(16.0, 0.0)
        );
    }
}
