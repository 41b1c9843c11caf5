//! Input state management
//!
//! Polls the keyboard through macroquad and maps keys onto actions.

use macroquad::prelude::*;

use super::{Action, InputSource};

/// Keyboard-backed input source. macroquad keeps key state per frame, so
/// there is nothing to poll here; the struct only carries the key mapping.
#[derive(Debug, Clone, Default)]
pub struct KeyboardInput;

impl KeyboardInput {
    pub fn new() -> Self {
        Self
    }

    fn keys(action: Action) -> &'static [KeyCode] {
        match action {
            Action::MoveLeft => &[KeyCode::Left],
            Action::MoveRight => &[KeyCode::Right],
            Action::Jump => &[KeyCode::Up, KeyCode::Space],
            Action::ToggleHighlight => &[KeyCode::F1],
            Action::ToggleDesign => &[KeyCode::F2],
            Action::ResetPlayer => &[KeyCode::R],
            Action::Quit => &[KeyCode::Escape],
        }
    }
}

impl InputSource for KeyboardInput {
    fn action_down(&self, action: Action) -> bool {
        Self::keys(action).iter().any(|&key| is_key_down(key))
    }

    fn action_pressed(&self, action: Action) -> bool {
        Self::keys(action).iter().any(|&key| is_key_pressed(key))
    }
}
