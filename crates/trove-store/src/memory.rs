//! In-memory history store.

use trove_common::MapId;

use crate::error::StoreResult;
use crate::event::TreasureCollectionEvent;
use crate::HistoryStore;

/// History kept in a vector; lost when dropped.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    events: Vec<TreasureCollectionEvent>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-filled with events.
    #[must_use]
    pub fn with_events(events: Vec<TreasureCollectionEvent>) -> Self {
        Self { events }
    }

    /// Total number of events across all maps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl HistoryStore for MemoryStore {
    fn save(&mut self, event: &TreasureCollectionEvent) -> StoreResult<()> {
        self.events.push(event.clone());
        Ok(())
    }

    fn query_by_map(&self, map: &MapId) -> StoreResult<Vec<TreasureCollectionEvent>> {
        Ok(self
            .events
            .iter()
            .filter(|e| &e.map_id == map)
            .cloned()
            .collect())
    }
}
