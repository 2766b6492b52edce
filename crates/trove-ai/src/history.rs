//! Store access for the opponent.
//!
//! Persistence failures never reach the tick loop: they are logged and
//! treated as "no history".

use glam::Vec2;
use tracing::error;
use trove_common::MapId;
use trove_store::{HistoryStore, TreasureCollectionEvent};

/// Treasure positions previously collected on `map`.
///
/// Returns an empty list if the store fails.
#[must_use]
pub fn load_hotspot_points(store: &dyn HistoryStore, map: &MapId) -> Vec<Vec2> {
    match store.query_by_map(map) {
        Ok(events) => events.into_iter().map(|e| e.treasure_position).collect(),
        Err(e) => {
            error!("Failed to load treasure history for map {map}: {e}");
            Vec::new()
        }
    }
}

/// Persists a collection event. Returns whether it was saved.
pub fn record_collection(store: &mut dyn HistoryStore, event: &TreasureCollectionEvent) -> bool {
    match store.save(event) {
        Ok(()) => true,
        Err(e) => {
            error!("Failed to save treasure collection on {}: {e}", event.map_id);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trove_common::RoundNumber;
    use trove_store::{MemoryStore, StoreError, StoreResult};

    struct BrokenStore;

    impl HistoryStore for BrokenStore {
        fn save(&mut self, _event: &TreasureCollectionEvent) -> StoreResult<()> {
            Err(StoreError::Unavailable("disk on fire".to_string()))
        }

        fn query_by_map(&self, _map: &MapId) -> StoreResult<Vec<TreasureCollectionEvent>> {
            Err(StoreError::Unavailable("disk on fire".to_string()))
        }
    }

    fn event(map: &str, x: f32) -> TreasureCollectionEvent {
        TreasureCollectionEvent::new(
            RoundNumber::FIRST,
            MapId::new(map),
            Vec2::new(x, 1.0),
            Vec2::new(x, 2.0),
            false,
        )
    }

    #[test]
    fn test_load_points_for_map() {
        let store = MemoryStore::with_events(vec![event("a", 1.0), event("b", 2.0), event("a", 3.0)]);
        let points = load_hotspot_points(&store, &MapId::new("a"));
        assert_eq!(points, vec![Vec2::new(1.0, 1.0), Vec2::new(3.0, 1.0)]);
    }

    #[test]
    fn test_failing_store_is_empty() {
        assert!(load_hotspot_points(&BrokenStore, &MapId::new("a")).is_empty());
        assert!(!record_collection(&mut BrokenStore, &event("a", 1.0)));
    }

    #[test]
    fn test_record_saves() {
        let mut store = MemoryStore::new();
        assert!(record_collection(&mut store, &event("a", 1.0)));
        assert_eq!(store.len(), 1);
    }
}
