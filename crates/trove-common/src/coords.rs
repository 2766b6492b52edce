//! Coordinate types for world (pixel) and grid (tile) positions.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Size of a single map tile in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TileSize {
    /// Tile width in pixels
    pub width: f32,
    /// Tile height in pixels
    pub height: f32,
}

impl TileSize {
    /// Creates a new tile size.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Creates a square tile size.
    #[must_use]
    pub const fn square(size: f32) -> Self {
        Self::new(size, size)
    }

    /// Returns the tile size as a vector.
    #[must_use]
    pub const fn as_vec2(self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

impl Default for TileSize {
    fn default() -> Self {
        Self::square(32.0)
    }
}

/// Grid coordinate (identifies a tile cell on the map).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCoord {
    /// Column
    pub x: i32,
    /// Row
    pub y: i32,
}

impl GridCoord {
    /// Creates a new grid coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Converts a world position to the cell containing it.
    ///
    /// Uses floored division, so positions left of or above the origin map
    /// to negative cells rather than folding onto cell zero.
    #[must_use]
    pub fn from_world(pos: Vec2, tile: TileSize) -> Self {
        Self {
            x: (pos.x / tile.width).floor() as i32,
            y: (pos.y / tile.height).floor() as i32,
        }
    }

    /// Returns the world-space center of this cell.
    #[must_use]
    pub fn center(self, tile: TileSize) -> Vec2 {
        Vec2::new(
            (self.x as f32 + 0.5) * tile.width,
            (self.y as f32 + 0.5) * tile.height,
        )
    }

    /// Manhattan distance to another cell.
    #[must_use]
    pub const fn manhattan(self, other: Self) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Returns the four cardinal neighbors (up, down, left, right).
    #[must_use]
    pub const fn cardinal_neighbors(self) -> [Self; 4] {
        [
            Self::new(self.x, self.y - 1),
            Self::new(self.x, self.y + 1),
            Self::new(self.x - 1, self.y),
            Self::new(self.x + 1, self.y),
        ]
    }

    /// Checks whether this cell lies inside a grid of the given size.
    #[must_use]
    pub const fn in_bounds(self, width: u32, height: u32) -> bool {
        self.x >= 0 && self.y >= 0 && (self.x as u32) < width && (self.y as u32) < height
    }

    /// Checks whether this cell is on the outermost ring of the grid.
    #[must_use]
    pub const fn is_border(self, width: u32, height: u32) -> bool {
        self.x == 0
            || self.y == 0
            || self.x as u32 + 1 >= width
            || self.y as u32 + 1 >= height
    }

    /// Converts to a row-major linear index. The cell must be in bounds.
    #[must_use]
    pub const fn to_index(self, width: u32) -> usize {
        (self.y as usize) * (width as usize) + (self.x as usize)
    }

    /// Creates from a row-major linear index.
    #[must_use]
    pub const fn from_index(index: usize, width: u32) -> Self {
        let w = width as usize;
        Self {
            x: (index % w) as i32,
            y: (index / w) as i32,
        }
    }
}
