//! Sprint levels
//!
//! A project moves through four fixed sprint stages. The level gates which
//! tasks the aggregation pipeline surfaces: only tasks filed under the
//! project's current level are visible.

use serde::{Deserialize, Serialize};

/// Error for out-of-range sprint values
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("sprint level {0} outside the 1..=4 lifecycle")]
pub struct SprintLevelError(pub u8);

/// Sprint stage of a project, always within `1..=4`
///
/// The bounds are part of the data model: no stored document ever carries a
/// level outside the range, and deserialization rejects one that does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct SprintLevel(u8);

impl SprintLevel {
    /// First stage, assigned to every new project
    pub const FIRST: SprintLevel = SprintLevel(1);

    /// Final stage; advancing past it reports instead of incrementing
    pub const LAST: SprintLevel = SprintLevel(4);

    /// Build a level, rejecting values outside `1..=4`
    #[inline]
    pub fn new(level: u8) -> Result<Self, SprintLevelError> {
        if (Self::FIRST.0..=Self::LAST.0).contains(&level) {
            Ok(Self(level))
        } else {
            Err(SprintLevelError(level))
        }
    }

    /// Numeric value of the stage
    #[inline]
    #[must_use]
    pub fn get(self) -> u8 {
        self.0
    }

    /// The following stage, or `None` from the final one
    ///
    /// `None` is the signal the progression controller turns into the
    /// terminal report state; the stored value never goes above 4.
    #[inline]
    #[must_use]
    pub fn next(self) -> Option<Self> {
        if self.0 < Self::LAST.0 {
            Some(Self(self.0 + 1))
        } else {
            None
        }
    }

    /// Whether this is the final stage
    #[inline]
    #[must_use]
    pub fn is_last(self) -> bool {
        self.0 == Self::LAST.0
    }

    /// All stages in order, first to last
    pub fn all() -> impl Iterator<Item = SprintLevel> {
        (Self::FIRST.0..=Self::LAST.0).map(SprintLevel)
    }
}

impl Default for SprintLevel {
    fn default() -> Self {
        Self::FIRST
    }
}

impl TryFrom<u8> for SprintLevel {
    type Error = SprintLevelError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        Self::new(level)
    }
}

impl From<SprintLevel> for u8 {
    fn from(level: SprintLevel) -> Self {
        level.0
    }
}

impl std::fmt::Display for SprintLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
