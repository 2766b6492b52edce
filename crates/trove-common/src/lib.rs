//! # Trove Common
//!
//! Common types, utilities, and shared abstractions for Trove.
//!
//! This crate provides foundational types used across all Trove subsystems:
//! - Coordinate types (world pixels, grid cells)
//! - Cardinal facing directions
//! - ID types (MapId, RoundNumber)
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod coords;
pub mod direction;
pub mod ids;

pub use glam::Vec2;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::coords::*;
    pub use crate::direction::*;
    pub use crate::ids::*;
    pub use glam::Vec2;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_world_conversion() {
        let tile = TileSize::new(32.0, 16.0);
        let cell = GridCoord::from_world(Vec2::new(100.0, 40.0), tile);
        assert_eq!(cell, GridCoord::new(3, 2));
        assert_eq!(cell.center(tile), Vec2::new(112.0, 40.0));
    }

    #[test]
    fn test_map_id_equality() {
        let a = MapId::new("harbor");
        let b = MapId::from("harbor");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "harbor");
    }

    #[test]
    fn test_direction_reversal() {
        assert!(Direction::Up.is_reversal_of(Direction::Down));
        assert!(!Direction::Up.is_reversal_of(Direction::Left));
    }
}
