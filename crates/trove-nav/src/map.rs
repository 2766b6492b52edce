//! Map descriptors, landmarks, and the map registry.
//!
//! The registry is an ordinary value built by the caller and handed to
//! whoever needs map info; there is no process-wide map list.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use trove_common::{MapId, RoundNumber};

use crate::error::{NavError, NavResult};
use crate::tilemap::TileMap;
use crate::walkable::MapGeometry;

/// A named, radius-bounded map location that hints can refer to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    /// Display name, matched case-insensitively against hint text
    pub name: String,
    /// World position of the landmark center
    pub position: Vec2,
    /// Radius of the landmark area in pixels
    pub radius: f32,
}

impl Landmark {
    /// Creates a new landmark.
    #[must_use]
    pub fn new(name: impl Into<String>, position: Vec2, radius: f32) -> Self {
        Self {
            name: name.into(),
            position,
            radius,
        }
    }

    /// Checks whether a world position lies within the landmark radius.
    #[must_use]
    pub fn contains(&self, pos: Vec2) -> bool {
        self.position.distance(pos) <= self.radius
    }
}

/// Everything the AI core needs to know about one playable map.
#[derive(Debug, Clone)]
pub struct MapDescriptor {
    /// Stable identifier (persistence key for historical data)
    pub id: MapId,
    /// Human-readable name
    pub name: String,
    /// Tile layout
    pub tiles: TileMap,
    /// Landmarks used for hint resolution
    pub landmarks: Vec<Landmark>,
}

impl MapDescriptor {
    /// Creates a map descriptor without landmarks.
    #[must_use]
    pub fn new(id: MapId, name: impl Into<String>, tiles: TileMap) -> Self {
        Self {
            id,
            name: name.into(),
            tiles,
            landmarks: Vec::new(),
        }
    }

    /// Adds a landmark.
    #[must_use]
    pub fn with_landmark(mut self, landmark: Landmark) -> Self {
        self.landmarks.push(landmark);
        self
    }

    /// Returns the map geometry.
    #[must_use]
    pub const fn geometry(&self) -> MapGeometry {
        self.tiles.geometry()
    }

    /// Returns the landmark closest to a position.
    #[must_use]
    pub fn nearest_landmark(&self, pos: Vec2) -> Option<&Landmark> {
        self.landmarks.iter().min_by(|a, b| {
            a.position
                .distance_squared(pos)
                .total_cmp(&b.position.distance_squared(pos))
        })
    }
}

/// Ordered collection of playable maps.
#[derive(Debug, Clone, Default)]
pub struct MapRegistry {
    maps: Vec<MapDescriptor>,
}

impl MapRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a map. Map IDs must be unique.
    pub fn register(&mut self, map: MapDescriptor) -> NavResult<()> {
        if self.maps.iter().any(|m| m.id == map.id) {
            return Err(NavError::DuplicateMap(map.id));
        }
        self.maps.push(map);
        Ok(())
    }

    /// Looks up a map by ID.
    pub fn get(&self, id: &MapId) -> NavResult<&MapDescriptor> {
        self.maps
            .iter()
            .find(|m| &m.id == id)
            .ok_or_else(|| NavError::UnknownMap(id.clone()))
    }

    /// Picks the map for a round, cycling through maps in registration order.
    #[must_use]
    pub fn for_round(&self, round: RoundNumber) -> Option<&MapDescriptor> {
        if self.maps.is_empty() {
            return None;
        }
        let slot = (round.raw().saturating_sub(1) as usize) % self.maps.len();
        self.maps.get(slot)
    }

    /// Returns the number of registered maps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.maps.len()
    }

    /// Returns whether no maps are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }

    /// Iterates maps in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &MapDescriptor> {
        self.maps.iter()
    }
}
