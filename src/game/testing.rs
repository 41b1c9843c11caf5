//! Test doubles for the seams systems talk through.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use macroquad::color::Color;
use macroquad::math::Rect;

use crate::input::{Action, InputSource};

use super::animation::FrameUploader;
use super::components::{AnimationData, AnimationState, TextureHandle, TextureId};
use super::renderer::Canvas;
use super::spawn::SpriteAssets;

/// Input source driven by the test. Clones share state, so a test keeps one
/// handle and gives the other to the system.
#[derive(Clone, Default)]
pub struct ScriptedInput {
    held: Rc<RefCell<HashSet<Action>>>,
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hold(&self, action: Action) {
        self.held.borrow_mut().insert(action);
    }

    pub fn release(&self, action: Action) {
        self.held.borrow_mut().remove(&action);
    }
}

impl InputSource for ScriptedInput {
    fn action_down(&self, action: Action) -> bool {
        self.held.borrow().contains(&action)
    }

    // No device edges; consumers derive them from `action_down`.
    fn action_pressed(&self, _action: Action) -> bool {
        false
    }
}

#[derive(Clone, Default)]
pub struct RecordingUploader {
    uploads: Rc<RefCell<Vec<(TextureId, Vec<u8>)>>>,
}

impl RecordingUploader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn uploads(&self) -> Vec<(TextureId, Vec<u8>)> {
        self.uploads.borrow().clone()
    }
}

impl FrameUploader for RecordingUploader {
    fn upload_frame(&mut self, texture: TextureId, rgba: &[u8]) {
        self.uploads.borrow_mut().push((texture, rgba.to_vec()));
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Clear(Color),
    Texture { texture: TextureId, source: Rect, dest: Rect },
    Outline { rect: Rect, color: Color },
}

#[derive(Clone, Default)]
pub struct RecordingCanvas {
    calls: Rc<RefCell<Vec<DrawCall>>>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<DrawCall> {
        self.calls.borrow().clone()
    }

    pub fn reset(&self) {
        self.calls.borrow_mut().clear();
    }
}

impl Canvas for RecordingCanvas {
    fn clear(&mut self, color: Color) {
        self.calls.borrow_mut().push(DrawCall::Clear(color));
    }

    fn draw_texture_region(&mut self, texture: TextureId, source: Rect, dest: Rect) {
        self.calls.borrow_mut().push(DrawCall::Texture { texture, source, dest });
    }

    fn draw_outline(&mut self, rect: Rect, color: Color) {
        self.calls.borrow_mut().push(DrawCall::Outline { rect, color });
    }
}

/// Hero with a single-frame 120x80 idle animation, mob with an 8-frame
/// 48x32 walk sheet.
pub fn sprite_assets() -> SpriteAssets {
    let idle_tex = TextureHandle {
        id: TextureId(1),
        width: 120.0,
        height: 80.0,
    };
    let mut hero = HashMap::new();
    hero.insert(
        AnimationState::Idle,
        AnimationData::decoded(idle_tex, vec![0u8; 120 * 80 * 4].into(), 1, 8),
    );
    let mob_tex = TextureHandle {
        id: TextureId(2),
        width: 384.0,
        height: 32.0,
    };
    SpriteAssets {
        hero,
        mob_walk: Some(AnimationData::sprite_sheet(mob_tex, 8, 8, 48 * 32)),
    }
}
