//! Error types for map loading and lookup.

use thiserror::Error;
use trove_common::MapId;

/// Errors raised while building or looking up maps.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavError {
    /// Map has no rows or no columns
    #[error("map is empty")]
    EmptyMap,

    /// Row length differs from the first row
    #[error("row {row} has {found} tiles, expected {expected}")]
    RaggedRow {
        /// Zero-based row index
        row: usize,
        /// Expected column count
        expected: usize,
        /// Actual column count
        found: usize,
    },

    /// Glyph that does not name a tile
    #[error("unknown tile '{glyph}' at row {row}, column {col}")]
    UnknownTile {
        /// Offending character
        glyph: char,
        /// Zero-based row index
        row: usize,
        /// Zero-based column index
        col: usize,
    },

    /// Map ID not present in the registry
    #[error("unknown map: {0}")]
    UnknownMap(MapId),

    /// Map ID registered twice
    #[error("map already registered: {0}")]
    DuplicateMap(MapId),
}

/// Result type for navigation/map operations.
pub type NavResult<T> = Result<T, NavError>;
