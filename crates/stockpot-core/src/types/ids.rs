//! Identifier types for goods and simulation runs.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a simulation run.
///
/// Internally represented as a UUID v4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(Uuid);

impl RunId {
    /// Creates a new random run ID.
    ///
    /// # Examples
    ///
    /// ```
    /// use stockpot_core::RunId;
    ///
    /// let id = RunId::new();
    /// println!("Run ID: {}", id);
    /// ```
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a run ID from a UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Converts to the inner UUID.
    pub fn into_uuid(self) -> Uuid {
        self.0
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for RunId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl std::str::FromStr for RunId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Identifier of a tradable good.
///
/// Goods are numbered in catalog order starting at zero. The id also drives
/// the good's resting value, so it is part of the pricing model rather than
/// an opaque key.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct GoodId(u8);

impl GoodId {
    /// Creates a good ID from its catalog index.
    ///
    /// # Examples
    ///
    /// ```
    /// use stockpot_core::GoodId;
    ///
    /// let id = GoodId::new(4);
    /// assert_eq!(id.index(), 4);
    /// ```
    pub const fn new(index: u8) -> Self {
        Self(index)
    }

    /// Returns the catalog index as a `usize`.
    pub const fn index(&self) -> usize {
        self.0 as usize
    }

    /// Returns the raw numeric id.
    pub const fn get(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for GoodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u8> for GoodId {
    fn from(index: u8) -> Self {
        Self(index)
    }
}

impl std::str::FromStr for GoodId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}
