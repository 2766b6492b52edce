//! Opponent event bus.
//!
//! The opponent publishes notable decisions here so the host can log them,
//! drive UI, or assert on them in tests without reaching into AI state.

use crossbeam_channel::{bounded, Receiver, Sender};
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::agent::AiMode;

/// Why the opponent abandoned a stuck route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecoveryKind {
    /// Picked a node from an unexplored region
    Exploration,
    /// Picked a uniformly random node after repeated failures
    Random,
}

/// Events emitted by the opponent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AiEvent {
    /// A new target was assigned
    TargetChanged {
        /// New target position
        target: Vec2,
        /// Mode the target was assigned under
        mode: AiMode,
    },
    /// The last node of the path was reached
    TargetReached {
        /// Position that was reached
        position: Vec2,
    },
    /// A path was planned
    PathComputed {
        /// Number of nodes in the path
        nodes: usize,
    },
    /// No route exists to the requested target
    PathUnreachable {
        /// Target that could not be reached
        target: Vec2,
    },
    /// The opponent was stuck and picked a new target
    StuckRecovered {
        /// How the new target was chosen
        kind: RecoveryKind,
        /// Consecutive recoveries so far
        attempts: u32,
    },
    /// A hint matched a landmark and is being followed
    HintMatched {
        /// Landmark name
        landmark: String,
    },
    /// A hint did not lead to a pickup in time
    HintAbandoned {
        /// Landmark name
        landmark: String,
    },
    /// A new hotspot was learned from a pickup
    HotspotAdded {
        /// Hotspot position
        position: Vec2,
    },
    /// A speed boost began
    BoostStarted {
        /// Boost length in seconds
        duration: f32,
    },
    /// A speed boost ran out
    BoostEnded,
}

/// Bounded channel of [`AiEvent`]s.
#[derive(Debug)]
pub struct AiEventBus {
    sender: Sender<AiEvent>,
    receiver: Receiver<AiEvent>,
    capacity: usize,
}

impl Default for AiEventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

impl AiEventBus {
    /// Creates a bus holding at most `capacity` undrained events.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity.max(1));
        Self {
            sender,
            receiver,
            capacity: capacity.max(1),
        }
    }

    /// Publishes an event. Dropped if the bus is full.
    pub fn publish(&self, event: AiEvent) {
        let _ = self.sender.try_send(event);
    }

    /// Takes all pending events.
    pub fn drain(&self) -> Vec<AiEvent> {
        self.receiver.try_iter().collect()
    }

    /// Number of undrained events.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Channel capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns a sender handle for publishing from elsewhere.
    #[must_use]
    pub fn sender(&self) -> Sender<AiEvent> {
        self.sender.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_and_drain() {
        let bus = AiEventBus::new(8);
        bus.publish(AiEvent::BoostEnded);
        bus.publish(AiEvent::PathComputed { nodes: 4 });
        assert_eq!(bus.pending_count(), 2);

        let events = bus.drain();
        assert_eq!(events, vec![AiEvent::BoostEnded, AiEvent::PathComputed { nodes: 4 }]);
        assert_eq!(bus.pending_count(), 0);
    }

    #[test]
    fn test_full_bus_drops() {
        let bus = AiEventBus::new(1);
        bus.publish(AiEvent::BoostEnded);
        bus.publish(AiEvent::BoostStarted { duration: 1.0 });
        assert_eq!(bus.drain(), vec![AiEvent::BoostEnded]);
    }

    #[test]
    fn test_sender_handle() {
        let bus = AiEventBus::default();
        bus.sender()
            .try_send(AiEvent::HotspotAdded { position: Vec2::ONE })
            .expect("send");
        assert_eq!(bus.drain().len(), 1);
    }
}
