//! Tile maps parsed from ASCII art.
//!
//! Glyphs:
//! - `.` floor (walkable)
//! - `#` wall
//! - `~` water

use glam::Vec2;
use serde::{Deserialize, Serialize};
use trove_common::{GridCoord, TileSize};

use crate::error::{NavError, NavResult};
use crate::walkable::{MapGeometry, Walkability};

/// Kind of tile occupying a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Tile {
    /// Open ground
    #[default]
    Floor,
    /// Solid obstacle
    Wall,
    /// Impassable water
    Water,
}

impl Tile {
    /// Parses a map glyph.
    #[must_use]
    pub const fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            '.' => Some(Tile::Floor),
            '#' => Some(Tile::Wall),
            '~' => Some(Tile::Water),
            _ => None,
        }
    }

    /// Returns the glyph used for this tile.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Tile::Floor => '.',
            Tile::Wall => '#',
            Tile::Water => '~',
        }
    }

    /// Whether agents can stand on this tile.
    #[must_use]
    pub const fn is_passable(self) -> bool {
        matches!(self, Tile::Floor)
    }
}

/// Rectangular grid of tiles.
#[derive(Debug, Clone, PartialEq)]
pub struct TileMap {
    geometry: MapGeometry,
    tiles: Vec<Tile>,
}

impl TileMap {
    /// Creates a map where every cell is floor.
    #[must_use]
    pub fn open(width: u32, height: u32, tile: TileSize) -> Self {
        let geometry = MapGeometry::new(width, height, tile);
        Self {
            tiles: vec![Tile::Floor; geometry.cell_count()],
            geometry,
        }
    }

    /// Parses a map from ASCII rows. All rows must have the same length.
    pub fn from_ascii<S: AsRef<str>>(rows: &[S], tile: TileSize) -> NavResult<Self> {
        let Some(first) = rows.first() else {
            return Err(NavError::EmptyMap);
        };
        let width = first.as_ref().chars().count();
        if width == 0 {
            return Err(NavError::EmptyMap);
        }

        let mut tiles = Vec::with_capacity(width * rows.len());
        for (row, line) in rows.iter().enumerate() {
            let line = line.as_ref();
            let found = line.chars().count();
            if found != width {
                return Err(NavError::RaggedRow {
                    row,
                    expected: width,
                    found,
                });
            }
            for (col, glyph) in line.chars().enumerate() {
                let tile = Tile::from_glyph(glyph).ok_or(NavError::UnknownTile { glyph, row, col })?;
                tiles.push(tile);
            }
        }

        Ok(Self {
            geometry: MapGeometry::new(width as u32, rows.len() as u32, tile),
            tiles,
        })
    }

    /// Parses a map from a multi-line string, ignoring blank lines and
    /// surrounding whitespace on each line.
    pub fn parse(text: &str, tile: TileSize) -> NavResult<Self> {
        let rows: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        Self::from_ascii(&rows, tile)
    }

    /// Returns the map geometry.
    #[must_use]
    pub const fn geometry(&self) -> MapGeometry {
        self.geometry
    }

    /// Gets the tile at a cell, or `None` when out of bounds.
    #[must_use]
    pub fn tile_at(&self, cell: GridCoord) -> Option<Tile> {
        if !cell.in_bounds(self.geometry.grid_width, self.geometry.grid_height) {
            return None;
        }
        self.tiles
            .get(cell.to_index(self.geometry.grid_width))
            .copied()
    }

    /// Replaces the tile at a cell. Out-of-bounds cells are ignored.
    pub fn set_tile(&mut self, cell: GridCoord, tile: Tile) {
        if !cell.in_bounds(self.geometry.grid_width, self.geometry.grid_height) {
            return;
        }
        let index = cell.to_index(self.geometry.grid_width);
        if let Some(slot) = self.tiles.get_mut(index) {
            *slot = tile;
        }
    }

    /// Counts passable cells.
    #[must_use]
    pub fn passable_count(&self) -> usize {
        self.tiles.iter().filter(|t| t.is_passable()).count()
    }

    /// Renders the map back to ASCII rows.
    #[must_use]
    pub fn to_ascii(&self) -> Vec<String> {
        self.tiles
            .chunks(self.geometry.grid_width as usize)
            .map(|row| row.iter().map(|t| t.glyph()).collect())
            .collect()
    }
}

impl Walkability for TileMap {
    fn is_walkable(&self, pos: Vec2) -> bool {
        if !self.geometry.contains(pos) {
            return false;
        }
        let cell = GridCoord::from_world(pos, self.geometry.tile);
        self.tile_at(cell).is_some_and(Tile::is_passable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tile() -> TileSize {
        TileSize::square(32.0)
    }

    #[test]
    fn test_parse_dimensions() {
        let map = TileMap::from_ascii(&["..#", "~.."], tile()).expect("valid map");
        assert_eq!(map.geometry().grid_width, 3);
        assert_eq!(map.geometry().grid_height, 2);
        assert_eq!(map.tile_at(GridCoord::new(2, 0)), Some(Tile::Wall));
        assert_eq!(map.tile_at(GridCoord::new(0, 1)), Some(Tile::Water));
        assert_eq!(map.passable_count(), 4);
    }

    #[test]
    fn test_parse_trims_blank_lines() {
        let map = TileMap::parse("\n  ...\n  .#.\n\n", tile()).expect("valid map");
        assert_eq!(map.to_ascii(), vec!["...".to_string(), ".#.".to_string()]);
    }

    #[test]
    fn test_parse_errors() {
        let empty: [&str; 0] = [];
        assert_eq!(TileMap::from_ascii(&empty, tile()), Err(NavError::EmptyMap));
        assert_eq!(
            TileMap::from_ascii(&["...", ".."], tile()),
            Err(NavError::RaggedRow {
                row: 1,
                expected: 3,
                found: 2
            })
        );
        assert_eq!(
            TileMap::from_ascii(&[".x."], tile()),
            Err(NavError::UnknownTile {
                glyph: 'x',
                row: 0,
                col: 1
            })
        );
    }

    #[test]
    fn test_walkability_off_grid() {
        let map = TileMap::open(4, 4, tile());
        assert!(map.is_walkable(Vec2::new(16.0, 16.0)));
        assert!(!map.is_walkable(Vec2::new(-1.0, 16.0)));
        assert!(!map.is_walkable(Vec2::new(16.0, 128.0)));
    }

    #[test]
    fn test_set_tile() {
        let mut map = TileMap::open(3, 3, tile());
        map.set_tile(GridCoord::new(1, 1), Tile::Wall);
        map.set_tile(GridCoord::new(9, 9), Tile::Wall);
        assert!(!map.is_walkable(Vec2::new(48.0, 48.0)));
        assert_eq!(map.passable_count(), 8);
    }
}
