//! Input handling
//!
//! Action-based input. Game systems never ask about keys directly; they ask
//! an `InputSource` whether an action is held or was just pressed. The
//! keyboard implementation lives in `state`, tests use scripted sources.

mod actions;
mod state;

pub use actions::*;
pub use state::KeyboardInput;

/// Device state provider.
pub trait InputSource {
    /// Check if action is currently held down
    fn action_down(&self, action: Action) -> bool;

    /// Check if action was just pressed this frame
    fn action_pressed(&self, action: Action) -> bool;
}
