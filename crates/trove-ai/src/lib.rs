//! # Trove AI
//!
//! The computer-controlled treasure hunter.
//!
//! This crate provides:
//! - Agent state and a minimal steering contract
//! - Direction debounce and the per-tick motion controller
//! - Stuck detection and recovery
//! - Hotspot selection from collection history and a runtime hotspot cache
//! - Hint matching against landmarks and the hint-follow search
//! - The layered target policy
//! - The [`Opponent`] session tying it all together
//! - An event bus for observing AI decisions

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod agent;
pub mod config;
pub mod debounce;
pub mod events;
pub mod hint;
pub mod history;
pub mod hotspot;
pub mod motion;
pub mod opponent;
pub mod policy;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::agent::*;
    pub use crate::config::*;
    pub use crate::debounce::*;
    pub use crate::events::*;
    pub use crate::hint::*;
    pub use crate::history::*;
    pub use crate::hotspot::*;
    pub use crate::motion::*;
    pub use crate::opponent::*;
    pub use crate::policy::*;
}

pub use prelude::*;
