//! Map Designer
//!
//! Click-to-place tile editing on a grid sized from the grass tile, with
//! saving back to the map file the game loads.

mod designer;
mod view;

pub use designer::*;
pub use view::{draw, handle_input};
