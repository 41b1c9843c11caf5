//! Game action definitions
//!
//! Keyboard layout:
//! - Left / Right arrows = move
//! - Up / Space = jump
//! - F1 = toggle collider outlines
//! - F2 = toggle design mode
//! - R = reset player
//! - Escape = quit

/// All actions the game and the map designer react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    // Movement
    MoveLeft,
    MoveRight,
    Jump,

    // System
    ToggleHighlight,
    ToggleDesign,
    ResetPlayer,
    Quit,
}

impl Action {
    /// Get display name for action (for debug overlays and help text)
    pub fn name(&self) -> &'static str {
        match self {
            Action::MoveLeft => "Move Left",
            Action::MoveRight => "Move Right",
            Action::Jump => "Jump",
            Action::ToggleHighlight => "Toggle Borders",
            Action::ToggleDesign => "Design Mode",
            Action::ResetPlayer => "Reset",
            Action::Quit => "Quit",
        }
    }

    /// Key label shown in help text.
    pub fn key_hint(&self) -> &'static str {
        match self {
            Action::MoveLeft => "Left",
            Action::MoveRight => "Right",
            Action::Jump => "Up/Space",
            Action::ToggleHighlight => "F1",
            Action::ToggleDesign => "F2",
            Action::ResetPlayer => "R",
            Action::Quit => "Esc",
        }
    }
}

/// What to do when left and right are held on the same frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum HorizontalTieBreak {
    /// Both held → no horizontal movement
    #[default]
    Cancel,
    /// Both held → move right
    PreferRight,
    /// Both held → move left
    PreferLeft,
}

impl HorizontalTieBreak {
    /// Resolve a left/right pair into a move axis value in [-1, 1].
    pub fn resolve(self, left: bool, right: bool) -> f32 {
        match (left, right) {
            (false, false) => 0.0,
            (true, false) => -1.0,
            (false, true) => 1.0,
            (true, true) => match self {
                HorizontalTieBreak::Cancel => 0.0,
                HorizontalTieBreak::PreferRight => 1.0,
                HorizontalTieBreak::PreferLeft => -1.0,
            },
        }
    }
}
