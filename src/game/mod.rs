//! Game Foundation Module
//!
//! A small ECS for a 2D tile platformer.
//!
//! Key concepts:
//! - Entity: numeric id plus active flag and tags
//! - Component: plain data stored per type, looked up by entity id
//! - System: per-frame logic run in a fixed order over the World
//! - Event: decoupled communication between systems
//!
//! Frame order is input → physics → collision → animation → render. Each
//! system only ever sees the output of the ones before it.

pub mod entity;
pub mod component;
pub mod components;
pub mod world;
pub mod event;
pub mod controls;
pub mod physics;
pub mod collision;
pub mod animation;
pub mod renderer;
pub mod spawn;
pub mod runtime;

#[cfg(test)]
pub mod testing;

// Re-export main types
pub use entity::EntityId;
pub use world::{System, World};
pub use event::{Event, EventBus, EventKind};
pub use runtime::{FpsLimit, GameRuntime, RuntimeSeams};
