//! World module - tile level maps
//!
//! The level is a list of tile placements. It is loaded once at level start,
//! turned into tile entities by `game::spawn::spawn_tiles`, and edited and
//! saved by the designer.

mod level;

pub use level::*;
