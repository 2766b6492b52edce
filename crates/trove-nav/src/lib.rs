//! # Trove Nav
//!
//! Map-side navigation for Trove.
//!
//! This crate turns a continuous, tile-based world into something an agent
//! can plan over:
//! - Walkability predicate and map geometry contracts
//! - ASCII tile maps and an explicit map registry with landmarks
//! - Navigation graph of walkable cells with cardinal connectivity
//! - A* pathfinding over the navigation graph
//! - Paths with a progress cursor

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod astar;
pub mod error;
pub mod graph;
pub mod map;
pub mod path;
pub mod tilemap;
pub mod walkable;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::astar::*;
    pub use crate::error::*;
    pub use crate::graph::*;
    pub use crate::map::*;
    pub use crate::path::*;
    pub use crate::tilemap::*;
    pub use crate::walkable::*;
}

pub use prelude::*;
