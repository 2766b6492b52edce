//! Walkability predicate and map geometry contracts.
//!
//! These are the only two things the navigation core needs from map and
//! collision code: "can an agent stand here?" and "how big is the grid?".

use glam::Vec2;
use serde::{Deserialize, Serialize};
use trove_common::TileSize;

/// World interface answering whether a world position is passable.
///
/// Must accept arbitrary coordinates, including positions off the map,
/// which are never walkable.
pub trait Walkability {
    /// Checks if a world position is walkable.
    fn is_walkable(&self, pos: Vec2) -> bool;
}

impl<F> Walkability for F
where
    F: Fn(Vec2) -> bool,
{
    fn is_walkable(&self, pos: Vec2) -> bool {
        self(pos)
    }
}

/// Grid dimensions (in tiles) and tile dimensions (in pixels) of a map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapGeometry {
    /// Grid width in tiles
    pub grid_width: u32,
    /// Grid height in tiles
    pub grid_height: u32,
    /// Tile size in pixels
    pub tile: TileSize,
}

impl MapGeometry {
    /// Creates a new map geometry.
    #[must_use]
    pub const fn new(grid_width: u32, grid_height: u32, tile: TileSize) -> Self {
        Self {
            grid_width,
            grid_height,
            tile,
        }
    }

    /// Map width in pixels.
    #[must_use]
    pub fn pixel_width(&self) -> f32 {
        self.grid_width as f32 * self.tile.width
    }

    /// Map height in pixels.
    #[must_use]
    pub fn pixel_height(&self) -> f32 {
        self.grid_height as f32 * self.tile.height
    }

    /// Total number of cells.
    #[must_use]
    pub const fn cell_count(&self) -> usize {
        self.grid_width as usize * self.grid_height as usize
    }

    /// Checks if a world position lies within the map rectangle.
    #[must_use]
    pub fn contains(&self, pos: Vec2) -> bool {
        pos.x >= 0.0 && pos.y >= 0.0 && pos.x < self.pixel_width() && pos.y < self.pixel_height()
    }

    /// Clamps a position to the map rectangle shrunk by `margin_tiles` tiles
    /// on every side.
    ///
    /// If the margin would leave no room on an axis, that axis is clamped
    /// to the map's midline.
    #[must_use]
    pub fn clamp_with_margin(&self, pos: Vec2, margin_tiles: f32) -> Vec2 {
        let mx = self.tile.width * margin_tiles;
        let my = self.tile.height * margin_tiles;
        Vec2::new(
            clamp_axis(pos.x, mx, self.pixel_width() - mx),
            clamp_axis(pos.y, my, self.pixel_height() - my),
        )
    }
}

fn clamp_axis(value: f32, lo: f32, hi: f32) -> f32 {
    if lo > hi {
        (lo + hi) * 0.5
    } else {
        value.clamp(lo, hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_is_walkable() {
        let pred = |p: Vec2| p.x < 10.0;
        assert!(pred.is_walkable(Vec2::new(5.0, 0.0)));
        assert!(!pred.is_walkable(Vec2::new(15.0, 0.0)));
    }

    #[test]
    fn test_geometry_dimensions() {
        let geo = MapGeometry::new(10, 5, TileSize::new(32.0, 16.0));
        assert!((geo.pixel_width() - 320.0).abs() < f32::EPSILON);
        assert!((geo.pixel_height() - 80.0).abs() < f32::EPSILON);
        assert_eq!(geo.cell_count(), 50);
        assert!(geo.contains(Vec2::new(0.0, 0.0)));
        assert!(!geo.contains(Vec2::new(320.0, 10.0)));
    }

    #[test]
    fn test_clamp_with_margin() {
        let geo = MapGeometry::new(10, 10, TileSize::square(32.0));
        let clamped = geo.clamp_with_margin(Vec2::new(-50.0, 400.0), 1.0);
        assert_eq!(clamped, Vec2::new(32.0, 288.0));
    }

    #[test]
    fn test_clamp_degenerate_margin() {
        let geo = MapGeometry::new(1, 1, TileSize::square(32.0));
        let clamped = geo.clamp_with_margin(Vec2::new(0.0, 0.0), 1.0);
        assert_eq!(clamped, Vec2::new(16.0, 16.0));
    }
}
