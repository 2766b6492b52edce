//! # Trove Store
//!
//! Persistence of treasure-collection history.
//!
//! This crate provides:
//! - The treasure-collection event record
//! - The historical data store contract
//! - In-memory and JSON-lines file implementations

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod error;
pub mod event;
pub mod file;
pub mod memory;

use trove_common::MapId;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::error::*;
    pub use crate::event::*;
    pub use crate::file::*;
    pub use crate::memory::*;
    pub use crate::HistoryStore;
}

pub use prelude::*;

/// Storage interface for collection history.
///
/// Calls are synchronous. Implementations report failures as errors;
/// callers in the AI core decide how to degrade.
pub trait HistoryStore {
    /// Appends an event.
    fn save(&mut self, event: &TreasureCollectionEvent) -> StoreResult<()>;

    /// Returns every event recorded for a map, oldest first.
    fn query_by_map(&self, map: &MapId) -> StoreResult<Vec<TreasureCollectionEvent>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use trove_common::RoundNumber;

    fn exercise(store: &mut dyn HistoryStore) {
        let map = MapId::new("cove");
        let event = TreasureCollectionEvent::new(
            RoundNumber::FIRST,
            map.clone(),
            Vec2::new(10.0, 20.0),
            Vec2::new(12.0, 18.0),
            false,
        );
        store.save(&event).expect("save");
        let events = store.query_by_map(&map).expect("query");
        assert_eq!(events, vec![event]);
    }

    #[test]
    fn test_store_trait_object() {
        let mut store = MemoryStore::new();
        exercise(&mut store);
    }
}
