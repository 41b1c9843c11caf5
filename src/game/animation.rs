//! Animation System
//!
//! Picks the animation state for controllable entities and advances the
//! selected animation's frame counter.
//!
//! Sprite sheets only move their source rect (the renderer reads
//! `current_frame`). Decoded animations keep every frame in a CPU-side
//! buffer and copy the new frame into their texture when the frame changes;
//! that upload is the only place texture contents are ever modified.

use super::components::{AnimationData, AnimationState, FrameSource, Input, Physics, Sprite, TextureId, Transform};
use super::world::{System, World};

/// Receives decoded frame pixels (RGBA8) for a texture.
pub trait FrameUploader {
    fn upload_frame(&mut self, texture: TextureId, rgba: &[u8]);
}

/// Visual state for an entity with physics and input.
pub fn derive_state(physics: &Physics, input: &Input, transform: Option<&Transform>) -> AnimationState {
    if !physics.on_ground {
        match transform {
            Some(t) if t.velocity.y > 0.0 => AnimationState::Falling,
            Some(_) => AnimationState::Jumping,
            None => AnimationState::Falling,
        }
    } else if input.move_x != 0.0 {
        AnimationState::Running
    } else {
        AnimationState::Idle
    }
}

/// Advance one tick. Returns the byte range of the new frame when a decoded
/// animation changed frame and needs an upload.
pub fn advance(anim: &mut AnimationData) -> Option<std::ops::Range<usize>> {
    if anim.frame_count <= 1 {
        return None;
    }

    anim.frame_counter += 1;
    if anim.frame_counter < anim.frame_delay {
        return None;
    }

    anim.current_frame = (anim.current_frame + 1) % anim.frame_count;
    anim.frame_counter = 0;

    match anim.frames {
        FrameSource::SpriteSheet => None,
        FrameSource::Decoded { frame_bytes, .. } => {
            let start = frame_bytes * anim.current_frame as usize;
            Some(start..start + frame_bytes)
        }
    }
}

pub struct AnimationSystem {
    uploader: Box<dyn FrameUploader>,
}

impl AnimationSystem {
    pub fn new(uploader: Box<dyn FrameUploader>) -> Self {
        Self { uploader }
    }
}

impl System for AnimationSystem {
    fn name(&self) -> &'static str {
        "animation"
    }

    fn update(&mut self, world: &mut World, _dt: f32) {
        let Some(mut sprites) = world.components.store_mut::<Sprite>() else {
            return;
        };
        let transforms = world.components.store::<Transform>();
        let bodies = world.components.store::<Physics>();
        let inputs = world.components.store::<Input>();

        for (id, sprite) in sprites.iter_mut() {
            if !world.entities.is_active(id) {
                continue;
            }

            let physics = bodies.as_ref().and_then(|s| s.get(id));
            let input = inputs.as_ref().and_then(|s| s.get(id));
            if let (Some(physics), Some(input)) = (physics, input) {
                let transform = transforms.as_ref().and_then(|s| s.get(id));
                sprite.current = derive_state(physics, input, transform);
            }

            let Some(anim) = sprite.current_animation_mut() else {
                continue;
            };
            let Some(range) = advance(anim) else {
                continue;
            };
            if let FrameSource::Decoded { pixels, .. } = &anim.frames {
                match pixels.get(range.clone()) {
                    Some(frame) => self.uploader.upload_frame(anim.texture.id, frame),
                    None => log::warn!(
                        "entity {}: frame {} bytes {:?} outside buffer of {}",
                        id,
                        anim.current_frame,
                        range,
                        pixels.len()
                    ),
                }
            }
        }
    }
}
