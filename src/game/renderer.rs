//! Render System
//!
//! Draws the world in three layers: tiles, then sprites, then the HUD.
//! Rendering only reads the world; all drawing goes through a `Canvas` so
//! the system can run without a window.

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use macroquad::color::{Color, BLACK, GREEN, RED};
use macroquad::math::{Rect, Vec2};

use super::components::{AnimationData, Collider, FrameSource, Health, Sprite, Tile, TileType, TextureHandle, TextureId, Transform};
use super::world::{System, World};

/// Background is authored small and stretched over the screen.
pub const BACKGROUND_SCALE: f32 = 2.7;
/// The heart texture is large; it's drawn at this scale.
pub const HEART_SCALE: f32 = 0.02;
pub const HEART_ORIGIN: Vec2 = Vec2::new(10.0, 10.0);
pub const HEART_SPACING: f32 = 40.0;

/// Draw primitive provider.
pub trait Canvas {
    fn clear(&mut self, color: Color);

    /// Copy `source` (texture pixels) into `dest` (screen pixels).
    /// A negative `source.w` means mirrored horizontally.
    fn draw_texture_region(&mut self, texture: TextureId, source: Rect, dest: Rect);

    fn draw_outline(&mut self, rect: Rect, color: Color);
}

/// Textures the renderer draws that don't belong to any entity.
#[derive(Debug, Clone, Default)]
pub struct RenderTextures {
    pub background: Option<TextureHandle>,
    pub tiles: HashMap<TileType, TextureHandle>,
    pub heart: Option<TextureHandle>,
}

impl RenderTextures {
    /// Texture for a tile type. Types without their own texture use grass.
    pub fn tile(&self, tile_type: TileType) -> Option<&TextureHandle> {
        self.tiles
            .get(&tile_type)
            .or_else(|| self.tiles.get(&TileType::Grass))
    }
}

/// Source rect for the animation's current frame, mirrored when facing left.
pub fn source_rect(anim: &AnimationData, facing_right: bool) -> Rect {
    let mut source = match anim.frames {
        FrameSource::SpriteSheet => {
            let width = anim.texture.width / anim.frame_count.max(1) as f32;
            Rect::new(anim.current_frame as f32 * width, 0.0, width, anim.texture.height)
        }
        FrameSource::Decoded { .. } => Rect::new(0.0, 0.0, anim.texture.width, anim.texture.height),
    };
    if !facing_right {
        source.w = -source.w;
    }
    source
}

pub struct RenderSystem {
    canvas: Box<dyn Canvas>,
    textures: RenderTextures,
    /// Shared with the app so F1 can flip it
    highlight: Rc<Cell<bool>>,
}

impl RenderSystem {
    pub fn new(canvas: Box<dyn Canvas>, textures: RenderTextures, highlight: Rc<Cell<bool>>) -> Self {
        Self {
            canvas,
            textures,
            highlight,
        }
    }

    pub fn draw(&mut self, world: &World) {
        self.canvas.clear(BLACK);

        if let Some(bg) = self.textures.background {
            let dest = Rect::new(0.0, 0.0, bg.width * BACKGROUND_SCALE, bg.height * BACKGROUND_SCALE);
            self.canvas
                .draw_texture_region(bg.id, Rect::new(0.0, 0.0, bg.width, bg.height), dest);
        }

        self.draw_tiles(world);
        self.draw_sprites(world);
        self.draw_hud(world);
    }

    fn draw_tiles(&mut self, world: &World) {
        let (Some(transforms), Some(tiles)) = (
            world.components.store::<Transform>(),
            world.components.store::<Tile>(),
        ) else {
            return;
        };
        let colliders = world.components.store::<Collider>();
        let highlight = self.highlight.get();

        for (id, tile) in tiles.iter() {
            if !world.entities.is_active(id) {
                continue;
            }
            let Some(transform) = transforms.get(id) else {
                continue;
            };

            if let Some(texture) = self.textures.tile(tile.tile_type) {
                let source = Rect::new(0.0, 0.0, texture.width, texture.height);
                let dest = Rect::new(transform.position.x, transform.position.y, texture.width, texture.height);
                self.canvas.draw_texture_region(texture.id, source, dest);
            }

            if highlight {
                if let Some(collider) = colliders.as_ref().and_then(|c| c.get(id)) {
                    self.canvas
                        .draw_outline(collider.world_bounds(transform.position), GREEN);
                }
            }
        }
    }

    fn draw_sprites(&mut self, world: &World) {
        let (Some(transforms), Some(sprites)) = (
            world.components.store::<Transform>(),
            world.components.store::<Sprite>(),
        ) else {
            return;
        };
        let colliders = world.components.store::<Collider>();
        let highlight = self.highlight.get();

        for (id, sprite) in sprites.iter() {
            if !world.entities.is_active(id) {
                continue;
            }
            let Some(transform) = transforms.get(id) else {
                continue;
            };
            let Some(anim) = sprite.current_animation() else {
                continue;
            };

            let frame = anim.frame_dimensions();
            let dest = Rect::new(
                transform.position.x,
                transform.position.y,
                frame.x * sprite.scale,
                frame.y * sprite.scale,
            );
            self.canvas
                .draw_texture_region(anim.texture.id, source_rect(anim, transform.facing_right), dest);

            if highlight {
                if let Some(collider) = colliders.as_ref().and_then(|c| c.get(id)) {
                    self.canvas
                        .draw_outline(collider.world_bounds(transform.position), RED);
                }
            }
        }
    }

    /// One heart per point of the player's current health.
    fn draw_hud(&mut self, world: &World) {
        let Some(heart) = self.textures.heart else {
            return;
        };
        let Some(health) = world.components.store::<Health>() else {
            return;
        };
        let Some(current) = world
            .entities
            .with_tag("player")
            .find_map(|e| health.get(e.id).map(|h| h.current))
        else {
            return;
        };

        let size = heart.size() * HEART_SCALE;
        let source = Rect::new(0.0, 0.0, heart.width, heart.height);
        for i in 0..current.max(0) {
            let dest = Rect::new(HEART_ORIGIN.x + i as f32 * HEART_SPACING, HEART_ORIGIN.y, size.x, size.y);
            self.canvas.draw_texture_region(heart.id, source, dest);
        }
    }
}

impl System for RenderSystem {
    fn name(&self) -> &'static str {
        "render"
    }

    fn update(&mut self, world: &mut World, _dt: f32) {
        self.draw(world);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::components::{ColliderLayer, AnimationState};
    use crate::game::testing::{DrawCall, RecordingCanvas};
    use crate::game::EntityId;

    const GRASS: TextureHandle = TextureHandle {
        id: TextureId(10),
        width: 32.0,
        height: 32.0,
    };
    const HEART: TextureHandle = TextureHandle {
        id: TextureId(11),
        width: 500.0,
        height: 500.0,
    };
    const MOB_SHEET: TextureHandle = TextureHandle {
        id: TextureId(12),
        width: 384.0,
        height: 32.0,
    };

    fn textures() -> RenderTextures {
        let mut tiles = HashMap::new();
        tiles.insert(TileType::Grass, GRASS);
        RenderTextures {
            background: None,
            tiles,
            heart: Some(HEART),
        }
    }

    fn setup(highlight: bool) -> (World, RecordingCanvas, Rc<Cell<bool>>) {
        let canvas = RecordingCanvas::new();
        let flag = Rc::new(Cell::new(highlight));
        let mut world = World::new();
        world.add_system(Box::new(RenderSystem::new(
            Box::new(canvas.clone()),
            textures(),
            Rc::clone(&flag),
        )));
        (world, canvas, flag)
    }

    fn add_tile(world: &mut World, x: f32, y: f32, tile_type: TileType) -> EntityId {
        let id = world.create_entity(&["tile", "ground"]);
        world.components.insert(id, Transform::at(Vec2::new(x, y)));
        world.components.insert(id, Collider::solid(32.0, 32.0, ColliderLayer::Ground));
        world.components.insert(id, Tile { tile_type });
        id
    }

    fn add_mob(world: &mut World, x: f32, frame: u32) -> EntityId {
        let id = world.create_entity(&["enemy", "mob"]);
        world.components.insert(id, Transform::at(Vec2::new(x, 50.0)).facing(false));
        world.components.insert(id, Collider::solid(48.0, 32.0, ColliderLayer::Enemy));
        let mut anim = AnimationData::sprite_sheet(MOB_SHEET, 8, 8, 48 * 32);
        anim.current_frame = frame;
        let mut animations = HashMap::new();
        animations.insert(AnimationState::Running, anim);
        world
            .components
            .insert(id, Sprite::new(animations, AnimationState::Running, 1.0));
        id
    }

    #[test]
    fn test_sprite_sheet_source_rect() {
        let mut anim = AnimationData::sprite_sheet(MOB_SHEET, 8, 8, 48 * 32);
        anim.current_frame = 3;
        assert_eq!(source_rect(&anim, true), Rect::new(144.0, 0.0, 48.0, 32.0));
        assert_eq!(source_rect(&anim, false), Rect::new(144.0, 0.0, -48.0, 32.0));
    }

    #[test]
    fn test_decoded_source_rect_is_full_texture() {
        let texture = TextureHandle {
            id: TextureId(1),
            width: 120.0,
            height: 80.0,
        };
        let anim = AnimationData::decoded(texture, vec![0u8; 120 * 80 * 4].into(), 1, 6);
        assert_eq!(source_rect(&anim, true), Rect::new(0.0, 0.0, 120.0, 80.0));
    }

    #[test]
    fn test_layer_order_tiles_then_sprites_then_hud() {
        let (mut world, canvas, _) = setup(false);
        add_mob(&mut world, 200.0, 2);
        add_tile(&mut world, 0.0, 100.0, TileType::Stone);
        let player = world.create_entity(&["player"]);
        world.components.insert(player, Health::new(3));

        world.update(0.016);

        let textures: Vec<TextureId> = canvas
            .calls()
            .into_iter()
            .filter_map(|call| match call {
                DrawCall::Texture { texture, .. } => Some(texture),
                _ => None,
            })
            .collect();
        assert_eq!(
            textures,
            vec![GRASS.id, MOB_SHEET.id, HEART.id, HEART.id, HEART.id]
        );
    }

    #[test]
    fn test_mob_drawn_mirrored_at_frame() {
        let (mut world, canvas, _) = setup(false);
        add_mob(&mut world, 200.0, 2);
        world.update(0.016);

        let calls = canvas.calls();
        assert!(calls.contains(&DrawCall::Texture {
            texture: MOB_SHEET.id,
            source: Rect::new(96.0, 0.0, -48.0, 32.0),
            dest: Rect::new(200.0, 50.0, 48.0, 32.0),
        }));
    }

    #[test]
    fn test_outlines_follow_highlight_flag() {
        let (mut world, canvas, flag) = setup(false);
        add_tile(&mut world, 0.0, 100.0, TileType::Grass);
        add_mob(&mut world, 200.0, 0);

        world.update(0.016);
        assert!(!canvas.calls().iter().any(|c| matches!(c, DrawCall::Outline { .. })));

        flag.set(true);
        canvas.reset();
        world.update(0.016);
        let outlines: Vec<_> = canvas
            .calls()
            .into_iter()
            .filter(|c| matches!(c, DrawCall::Outline { .. }))
            .collect();
        assert_eq!(
            outlines,
            vec![
                DrawCall::Outline {
                    rect: Rect::new(0.0, 100.0, 32.0, 32.0),
                    color: GREEN,
                },
                DrawCall::Outline {
                    rect: Rect::new(200.0, 50.0, 48.0, 32.0),
                    color: RED,
                },
            ]
        );
    }

    #[test]
    fn test_hearts_match_health() {
        let (mut world, canvas, _) = setup(false);
        let player = world.create_entity(&["player"]);
        world.components.insert(player, Health::new(5));
        world
            .components
            .store_mut::<Health>()
            .unwrap()
            .get_mut(player)
            .unwrap()
            .take_damage(2);

        world.update(0.016);

        let hearts: Vec<Rect> = canvas
            .calls()
            .into_iter()
            .filter_map(|call| match call {
                DrawCall::Texture { texture, dest, .. } if texture == HEART.id => Some(dest),
                _ => None,
            })
            .collect();
        assert_eq!(hearts.len(), 3);
        assert_eq!(hearts[2].x, 90.0);
        assert!((hearts[0].w - 10.0).abs() < 1e-3);
    }

    #[test]
    fn test_render_does_not_mutate_world() {
        let (mut world, _, _) = setup(true);
        let mob = add_mob(&mut world, 10.0, 4);
        let before = world.components.get_cloned::<Sprite>(mob);
        world.update(0.016);
        assert_eq!(world.components.get_cloned::<Sprite>(mob), before);
    }
}
