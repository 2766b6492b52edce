//! Treasure-collection event record.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use trove_common::{MapId, RoundNumber};

/// One treasure pickup, by either the player or the AI.
///
/// Events are immutable once created and are only ever appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreasureCollectionEvent {
    /// Round the pickup happened in
    pub round: RoundNumber,
    /// Map the pickup happened on
    pub map_id: MapId,
    /// Where the treasure lay
    pub treasure_position: Vec2,
    /// Where the collector stood
    pub collector_position: Vec2,
    /// Whether the player (not the AI) collected it
    pub collected_by_player: bool,
    /// Seconds since the Unix epoch
    pub timestamp: u64,
}

impl TreasureCollectionEvent {
    /// Creates an event stamped with the current time.
    #[must_use]
    pub fn new(
        round: RoundNumber,
        map_id: MapId,
        treasure_position: Vec2,
        collector_position: Vec2,
        collected_by_player: bool,
    ) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Self {
            round,
            map_id,
            treasure_position,
            collector_position,
            collected_by_player,
            timestamp,
        }
    }

    /// Overrides the timestamp.
    #[must_use]
    pub const fn with_timestamp(mut self, timestamp: u64) -> Self {
        self.timestamp = timestamp;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_shape() {
        let event = TreasureCollectionEvent::new(
            RoundNumber::new(3),
            MapId::new("cove"),
            Vec2::new(1.0, 2.0),
            Vec2::new(3.0, 4.0),
            true,
        )
        .with_timestamp(42);

        let json = serde_json::to_string(&event).expect("serialize");
        assert!(json.contains("\"map_id\":\"cove\""));
        assert!(json.contains("\"round\":3"));

        let back: TreasureCollectionEvent = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, event);
    }
}
