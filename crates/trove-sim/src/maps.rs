//! Built-in maps.

use trove_common::{GridCoord, MapId, TileSize};
use trove_nav::{Landmark, MapDescriptor, MapRegistry, NavResult, TileMap};

/// Tile size of every built-in map.
pub const TILE_SIZE: TileSize = TileSize::square(32.0);

const COVE: &str = "\
####################
#........#.........#
#..~~~...#....##...#
#..~~~.........#...#
#........#.........#
######.######..#####
#..................#
#...##.......~~~...#
#...##.......~~~...#
#..................#
#.......#####......#
#..................#
####################";

const RUINS: &str = "\
########################
#......#.......#.......#
#......#.......#.......#
#..##..#...#...#..##...#
#..##......#......##...#
#......#...#...#.......#
####.###########.###.###
#......................#
#...#######..#######...#
#...#.............#....#
#...#...~~~~~.....#....#
#.......~~~~~..........#
#...#.............#....#
#...###.#######.###....#
#......................#
########################";

const MARSH: &str = "\
##################
#.....~~~~.......#
#.....~~~~...#...#
#..#.........#...#
#..#..~~~~...#...#
#.....~~~~.......#
#~~~.......~~~~..#
#~~~..###..~~~~..#
#.....###........#
#................#
##################";

fn landmark(name: &str, x: i32, y: i32, radius_tiles: f32) -> Landmark {
    Landmark::new(
        name,
        GridCoord::new(x, y).center(TILE_SIZE),
        radius_tiles * TILE_SIZE.width,
    )
}

fn cove() -> NavResult<MapDescriptor> {
    let tiles = TileMap::parse(COVE, TILE_SIZE)?;
    Ok(MapDescriptor::new(MapId::new("cove"), "Smuggler's Cove", tiles)
        .with_landmark(landmark("Tide_Pool", 2, 3, 2.5))
        .with_landmark(landmark("Lighthouse", 16, 2, 2.0))
        .with_landmark(landmark("Lagoon", 12, 7, 2.5))
        .with_landmark(landmark("Shipwreck", 10, 11, 3.0)))
}

fn ruins() -> NavResult<MapDescriptor> {
    let tiles = TileMap::parse(RUINS, TILE_SIZE)?;
    Ok(MapDescriptor::new(MapId::new("ruins"), "Sunken Ruins", tiles)
        .with_landmark(landmark("Old_Tower", 5, 3, 2.0))
        .with_landmark(landmark("Chapel", 9, 3, 2.5))
        .with_landmark(landmark("Armory", 21, 3, 2.0))
        .with_landmark(landmark("Fountain", 14, 10, 3.0))
        .with_landmark(landmark("Gatehouse", 12, 14, 2.0)))
}

fn marsh() -> NavResult<MapDescriptor> {
    let tiles = TileMap::parse(MARSH, TILE_SIZE)?;
    Ok(MapDescriptor::new(MapId::new("marsh"), "Mistmarsh", tiles)
        .with_landmark(landmark("Heron_Nest", 2, 2, 1.5))
        .with_landmark(landmark("Stone_Hut", 5, 8, 2.0))
        .with_landmark(landmark("Bog", 16, 6, 2.5)))
}

/// Registry holding every built-in map, in a fixed order.
pub fn builtin_registry() -> NavResult<MapRegistry> {
    let mut registry = MapRegistry::new();
    registry.register(cove()?)?;
    registry.register(ruins()?)?;
    registry.register(marsh()?)?;
    Ok(registry)
}
