//! Input System
//!
//! Reads device state once per frame and writes it into every active
//! entity's `Input` component. This is the only system that talks to an
//! `InputSource`; everything downstream reads the components.

use crate::input::{Action, HorizontalTieBreak, InputSource};

use super::components::Input;
use super::world::{System, World};

pub struct InputSystem {
    source: Box<dyn InputSource>,
    tie_break: HorizontalTieBreak,
    /// Jump key level on the previous update, for edge detection
    jump_was_down: bool,
}

impl InputSystem {
    pub fn new(source: Box<dyn InputSource>, tie_break: HorizontalTieBreak) -> Self {
        Self {
            source,
            tie_break,
            jump_was_down: false,
        }
    }
}

impl System for InputSystem {
    fn name(&self) -> &'static str {
        "input"
    }

    fn update(&mut self, world: &mut World, _dt: f32) {
        let left = self.source.action_down(Action::MoveLeft);
        let right = self.source.action_down(Action::MoveRight);
        let jump_down = self.source.action_down(Action::Jump);
        let jump_edge = self.source.action_pressed(Action::Jump) || (jump_down && !self.jump_was_down);
        self.jump_was_down = jump_down;

        let Some(mut inputs) = world.components.store_mut::<Input>() else {
            return;
        };

        let move_x = self.tie_break.resolve(left, right);
        for (id, input) in inputs.iter_mut() {
            if !world.entities.is_active(id) {
                continue;
            }
            input.move_x = move_x;
            input.jump_pressed = jump_edge;
            input.jump_held = jump_down;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::testing::ScriptedInput;

    fn setup(tie_break: HorizontalTieBreak) -> (World, ScriptedInput, crate::game::EntityId) {
        let mut world = World::new();
        let script = ScriptedInput::new();
        world.add_system(Box::new(InputSystem::new(Box::new(script.clone()), tie_break)));
        let player = world.create_entity(&["player"]);
        world.components.insert(player, Input::default());
        (world, script, player)
    }

    fn input_of(world: &World, id: crate::game::EntityId) -> Input {
        world.components.get_cloned::<Input>(id).unwrap()
    }

    #[test]
    fn test_horizontal_axis() {
        let (mut world, script, player) = setup(HorizontalTieBreak::Cancel);

        script.hold(Action::MoveRight);
        world.update(0.016);
        assert_eq!(input_of(&world, player).move_x, 1.0);

        script.release(Action::MoveRight);
        script.hold(Action::MoveLeft);
        world.update(0.016);
        assert_eq!(input_of(&world, player).move_x, -1.0);

        script.hold(Action::MoveRight);
        world.update(0.016);
        assert_eq!(input_of(&world, player).move_x, 0.0);

        script.release(Action::MoveLeft);
        script.release(Action::MoveRight);
        world.update(0.016);
        assert_eq!(input_of(&world, player).move_x, 0.0);
    }

    #[test]
    fn test_tie_break_prefer_right() {
        let (mut world, script, player) = setup(HorizontalTieBreak::PreferRight);
        script.hold(Action::MoveLeft);
        script.hold(Action::MoveRight);
        world.update(0.016);
        assert_eq!(input_of(&world, player).move_x, 1.0);
    }

    #[test]
    fn test_jump_pressed_only_on_edge() {
        let (mut world, script, player) = setup(HorizontalTieBreak::Cancel);

        script.hold(Action::Jump);
        world.update(0.016);
        let first = input_of(&world, player);
        assert!(first.jump_pressed);
        assert!(first.jump_held);

        world.update(0.016);
        let second = input_of(&world, player);
        assert!(!second.jump_pressed);
        assert!(second.jump_held);

        script.release(Action::Jump);
        world.update(0.016);
        let third = input_of(&world, player);
        assert!(!third.jump_pressed);
        assert!(!third.jump_held);
    }

    #[test]
    fn test_inactive_entities_untouched() {
        let (mut world, script, player) = setup(HorizontalTieBreak::Cancel);
        world.entities.set_active(player, false);

        script.hold(Action::MoveRight);
        world.update(0.016);
        assert_eq!(input_of(&world, player), Input::default());
    }

    #[test]
    fn test_no_input_store_is_noop() {
        let mut world = World::new();
        let script = ScriptedInput::new();
        script.hold(Action::Jump);
        world.add_system(Box::new(InputSystem::new(Box::new(script), HorizontalTieBreak::Cancel)));
        world.update(0.016);
        assert!(!world.components.is_registered::<Input>());
    }
}
