//! Collision events delivered to gameplay code
//!
//! Key principles:
//! - Physics never calls back into gameplay during a step
//! - Every object owns an outbox that the step appends to
//! - Gameplay drains the outbox explicitly, so clearing has a single owner

use crate::foundation::collections::ObjectHandle;
use crate::physics::CollisionType;

/// What happened between two objects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollisionEventKind {
    /// The pair came into contact this frame
    Began,
    /// The pair has not been in contact for the configured number of frames
    Ended,
}

/// A collision notification as seen from one of the two objects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionEvent {
    /// Begin or end
    pub kind: CollisionEventKind,
    /// The other object in the pair
    pub other: ObjectHandle,
    /// Gameplay tag of the other object at the time of the event
    pub other_type: CollisionType,
}

impl CollisionEvent {
    /// Create a `Began` event
    pub fn began(other: ObjectHandle, other_type: CollisionType) -> Self {
        Self { kind: CollisionEventKind::Began, other, other_type }
    }

    /// Create an `Ended` event
    pub fn ended(other: ObjectHandle, other_type: CollisionType) -> Self {
        Self { kind: CollisionEventKind::Ended, other, other_type }
    }
}

/// Per-object queue of events produced by physics steps
#[derive(Debug, Clone, Default)]
pub struct EventOutbox {
    events: Vec<CollisionEvent>,
}

impl EventOutbox {
    /// Create an empty outbox
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event
    pub fn push(&mut self, event: CollisionEvent) {
        self.events.push(event);
    }

    /// Take every pending event, oldest first
    pub fn drain(&mut self) -> Vec<CollisionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Number of pending events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether nothing is pending
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::collections::ObjectMap;

    #[test]
    fn test_drain_empties_outbox() {
        let mut handles: ObjectMap<()> = ObjectMap::with_key();
        let other = handles.insert(());

        let mut outbox = EventOutbox::new();
        outbox.push(CollisionEvent::began(other, CollisionType::Lake));
        outbox.push(CollisionEvent::ended(other, CollisionType::Lake));
        assert_eq!(outbox.len(), 2);

        let drained = outbox.drain();
        assert_eq!(drained[0].kind, CollisionEventKind::Began);
        assert_eq!(drained[1].kind, CollisionEventKind::Ended);
        assert!(outbox.is_empty());
        assert!(outbox.drain().is_empty());
    }
}
