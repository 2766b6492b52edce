//! ID types for maps and rounds.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a map, stable across sessions (used as a persistence key).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MapId(String);

impl MapId {
    /// Creates a map ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the raw ID string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MapId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for MapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One-based round counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoundNumber(u32);

impl RoundNumber {
    /// The first round.
    pub const FIRST: Self = Self(1);

    /// Creates a round number from a raw value.
    #[must_use]
    pub const fn new(round: u32) -> Self {
        Self(round)
    }

    /// Returns the raw round value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Returns the following round.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for RoundNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
