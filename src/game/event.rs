//! Event System
//!
//! Events allow decoupled communication between game systems.
//! Instead of systems directly calling each other, they publish events
//! that subscribers react to.
//!
//! Example flow:
//! 1. Collision system lands the player → publishes PlayerLand
//! 2. Audio code subscribed to PlayerLand plays a thud
//! 3. VFX code subscribed to PlayerLand spawns dust
//!
//! Queued events are delivered by `EventBus::process`. Anything a handler
//! publishes while `process` runs goes to the queue for the *next* call.

use std::collections::HashMap;

use macroquad::math::Vec2;

use super::entity::EntityId;

/// A queue for events of a single type.
/// Events are collected during the frame and drained at specific points.
#[derive(Debug)]
pub struct EventQueue<T> {
    events: Vec<T>,
}

impl<T> EventQueue<T> {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Send an event (add to queue)
    pub fn send(&mut self, event: T) {
        self.events.push(event);
    }

    /// Iterate over events without clearing
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.events.iter()
    }

    /// Drain all events (returns iterator and clears queue)
    pub fn drain(&mut self) -> impl Iterator<Item = T> + '_ {
        self.events.drain(..)
    }

    /// Check if there are any events
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Clear all events without processing
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Number of events in queue
    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Event Types
// =============================================================================

/// What happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// The player initiated a jump
    PlayerJump,
    /// The player touched ground after being airborne
    PlayerLand,
    /// Two entities collided
    Collision,
    /// An entity took damage
    Damage,
    /// An entity's health reached zero
    Death,
    /// A coin was picked up
    CoinCollected,
}

/// Extra data carried by an event.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum EventData {
    #[default]
    None,
    Amount(i32),
    Position(Vec2),
}

/// A game event with source, target and payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub kind: EventKind,
    pub source: EntityId,
    pub target: EntityId,
    pub data: EventData,
}

impl Event {
    pub fn new(kind: EventKind, source: EntityId) -> Self {
        Self {
            kind,
            source,
            target: EntityId::NONE,
            data: EventData::None,
        }
    }

    pub fn with_target(mut self, target: EntityId) -> Self {
        self.target = target;
        self
    }

    pub fn with_data(mut self, data: EventData) -> Self {
        self.data = data;
        self
    }
}

/// Handler callback. The outbox collects follow-up events, which are queued
/// for the next `process` call.
pub type EventHandler = Box<dyn FnMut(&Event, &mut EventQueue<Event>)>;

/// Publish/subscribe bus with a deferred queue.
#[derive(Default)]
pub struct EventBus {
    handlers: HashMap<EventKind, Vec<EventHandler>>,
    queue: EventQueue<Event>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for one event kind. Handlers run in subscription order.
    pub fn subscribe<F>(&mut self, kind: EventKind, handler: F)
    where
        F: FnMut(&Event, &mut EventQueue<Event>) + 'static,
    {
        self.handlers.entry(kind).or_default().push(Box::new(handler));
    }

    /// Queue an event for the next `process` call.
    pub fn publish(&mut self, event: Event) {
        self.queue.send(event);
    }

    /// Deliver every queued event, then clear the queue.
    /// Returns the number of events delivered.
    pub fn process(&mut self) -> usize {
        let pending: Vec<Event> = self.queue.drain().collect();
        let mut outbox = EventQueue::new();

        for event in &pending {
            self.dispatch(event, &mut outbox);
        }

        for event in outbox.drain() {
            self.queue.send(event);
        }
        pending.len()
    }

    /// Deliver an event right away, bypassing the queue.
    pub fn publish_immediate(&mut self, event: Event) {
        let mut outbox = EventQueue::new();
        self.dispatch(&event, &mut outbox);
        for follow_up in outbox.drain() {
            self.queue.send(follow_up);
        }
    }

    fn dispatch(&mut self, event: &Event, outbox: &mut EventQueue<Event>) {
        if let Some(handlers) = self.handlers.get_mut(&event.kind) {
            for handler in handlers.iter_mut() {
                handler(event, outbox);
            }
        }
    }

    /// Events waiting for the next `process` call.
    pub fn pending(&self) -> impl Iterator<Item = &Event> {
        self.queue.iter()
    }

    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    /// Remove all handlers and queued events.
    pub fn clear(&mut self) {
        self.handlers.clear();
        self.queue.clear();
    }
}
