//! Double-buffered game events
//!
//! The simulation pushes events while a frame runs; the game layer reads them
//! after the next [`EventQueue::swap`]. Producers never need to know who is
//! listening (log output, sound, a HUD).
//!
//! # Example
//!
//! ```ignore
//! // During the frame
//! events.push(GameEvent::PlayerSpotted { guard, position });
//!
//! // In the game layer, next frame
//! for event in events.iter() {
//!     if let GameEvent::PlayerCaught { .. } = event {
//!         ctx.quit();
//!     }
//! }
//! ```

use std::collections::VecDeque;

use glam::Vec2;
use hecs::Entity;

// ============================================================================
// Event Types
// ============================================================================

/// Things that happened in the maze during a frame.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum GameEvent {
    // -------------------------------------------------------------------------
    // Guard Events
    // -------------------------------------------------------------------------
    /// A patrolling guard saw the player and started chasing.
    PlayerSpotted {
        guard: Entity,
        /// Player center when spotted
        position: Vec2,
    },

    /// A chasing guard lost sight of the player.
    PlayerLost {
        guard: Entity,
        /// Patrol endpoint the guard heads back to, if it has one
        resume_toward: Option<Vec2>,
    },

    /// A guard reached one end of its patrol and turned around.
    PatrolTurned {
        guard: Entity,
        /// The endpoint it now heads for
        toward: Vec2,
    },

    /// A guard's hitbox overlaps the player's. Sent every frame it holds.
    PlayerCaught {
        guard: Entity,
        /// Guard top-left at the time
        position: Vec2,
    },

    // -------------------------------------------------------------------------
    // Game State Events
    // -------------------------------------------------------------------------
    /// The player's center entered a goal tile.
    GoalReached { player: Entity },

    /// The level was rebuilt from its config.
    LevelRestarted,
}

// ============================================================================
// Event Queue
// ============================================================================

/// Double-buffered event queue for frame-consistent event processing.
///
/// Events pushed during frame N are available for reading during frame N+1.
#[derive(Debug)]
pub struct EventQueue {
    /// Events being written this frame
    pending: VecDeque<GameEvent>,
    /// Events from previous frame, ready for processing
    processing: VecDeque<GameEvent>,
}

impl EventQueue {
    /// Default initial capacity for event queues.
    const DEFAULT_CAPACITY: usize = 64;

    /// Create a new event queue with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Create a new event queue with specified initial capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            pending: VecDeque::with_capacity(capacity),
            processing: VecDeque::with_capacity(capacity),
        }
    }

    /// Push an event to be processed next frame.
    #[inline]
    pub fn push(&mut self, event: GameEvent) {
        self.pending.push_back(event);
    }

    /// Swap the pending and processing queues.
    ///
    /// Call this once per frame, at the start of the update loop.
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.pending, &mut self.processing);
        self.pending.clear();
    }

    /// Iterate over events from the previous frame.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &GameEvent> {
        self.processing.iter()
    }

    /// Drain all events from the previous frame.
    #[inline]
    pub fn drain(&mut self) -> impl Iterator<Item = GameEvent> + '_ {
        self.processing.drain(..)
    }

    /// Check if there are any events to process.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.processing.is_empty()
    }

    /// Get the number of events ready for processing.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.processing.len()
    }

    /// Get the number of events pending for next frame.
    #[must_use]
    #[inline]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Drop events pushed this frame, keeping the ones ready for processing.
    pub fn clear_pending(&mut self) {
        self.pending.clear();
    }

    /// Clear all events (both pending and processing).
    pub fn clear(&mut self) {
        self.pending.clear();
        self.processing.clear();
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn test_entity() -> Entity {
        let mut world = hecs::World::new();
        world.spawn(())
    }

    #[test]
    fn test_event_queue_push_and_swap() {
        let mut queue = EventQueue::new();

        queue.push(GameEvent::LevelRestarted);
        assert!(queue.is_empty(), "Events should not be visible before swap");

        queue.swap();
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.iter().next(), Some(&GameEvent::LevelRestarted));
    }

    #[test]
    fn test_event_queue_double_buffer_isolation() {
        let guard = test_entity();
        let mut queue = EventQueue::new();

        queue.push(GameEvent::PatrolTurned {
            guard,
            toward: Vec2::X,
        });
        queue.swap();

        queue.push(GameEvent::PatrolTurned {
            guard,
            toward: Vec2::Y,
        });

        let events: Vec<_> = queue.iter().collect();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], GameEvent::PatrolTurned { toward, .. } if *toward == Vec2::X));

        queue.swap();
        let events: Vec<_> = queue.iter().collect();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], GameEvent::PatrolTurned { toward, .. } if *toward == Vec2::Y));
    }

    #[test]
    fn test_event_queue_drain() {
        let guard = test_entity();
        let mut queue = EventQueue::new();

        queue.push(GameEvent::PlayerSpotted {
            guard,
            position: Vec2::ZERO,
        });
        queue.push(GameEvent::PlayerLost {
            guard,
            resume_toward: None,
        });
        queue.swap();

        let events: Vec<_> = queue.drain().collect();
        assert_eq!(events.len(), 2);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_event_queue_clear_pending_keeps_previous_frame() {
        let mut queue = EventQueue::new();

        queue.push(GameEvent::LevelRestarted);
        queue.swap();
        queue.push(GameEvent::LevelRestarted);

        queue.clear_pending();

        assert_eq!(queue.len(), 1);
        assert_eq!(queue.pending_count(), 0);
    }

    #[test]
    fn test_event_queue_clear() {
        let mut queue = EventQueue::new();

        queue.push(GameEvent::LevelRestarted);
        queue.swap();
        queue.push(GameEvent::LevelRestarted);

        queue.clear();

        assert!(queue.is_empty());
        assert_eq!(queue.pending_count(), 0);
    }
}
