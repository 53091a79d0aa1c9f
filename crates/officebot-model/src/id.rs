//! Knowledge-base identifiers
//!
//! Provides [`EntityId`] (`Q…`), [`PropertyId`] (`P…`) and [`StatementId`]
//! newtypes. Entity and property ids are validated on construction so a raw
//! link title can never masquerade as a resolved reference.

use crate::error::ModelError;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

fn parse_prefixed(s: &str, prefix: char) -> Option<u64> {
    let rest = s.strip_prefix(prefix)?;
    if rest.is_empty() || rest.starts_with('0') || !rest.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    rest.parse().ok()
}

/// Entity identifier (`Q42`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(u64);

impl EntityId {
    /// Create from the numeric part
    #[inline]
    #[must_use]
    pub const fn new(number: u64) -> Self {
        Self(number)
    }

    /// Numeric part of the id
    #[inline]
    #[must_use]
    pub fn number(&self) -> u64 {
        self.0
    }
}

impl Display for EntityId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Q{}", self.0)
    }
}

impl FromStr for EntityId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_prefixed(s.trim(), 'Q')
            .map(Self)
            .ok_or_else(|| ModelError::InvalidEntityId(s.to_string()))
    }
}

impl Serialize for EntityId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Property identifier (`P39`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PropertyId(u64);

impl PropertyId {
    /// Create from the numeric part
    #[inline]
    #[must_use]
    pub const fn new(number: u64) -> Self {
        Self(number)
    }

    /// Numeric part of the id
    #[inline]
    #[must_use]
    pub fn number(&self) -> u64 {
        self.0
    }
}

impl Display for PropertyId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

impl FromStr for PropertyId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_prefixed(s.trim(), 'P')
            .map(Self)
            .ok_or_else(|| ModelError::InvalidPropertyId(s.to_string()))
    }
}

impl Serialize for PropertyId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PropertyId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Opaque statement GUID assigned by the knowledge base
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatementId(String);

impl StatementId {
    /// Wrap a GUID
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// GUID text
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for StatementId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Properties and entities the pipeline reads or writes
pub mod props {
    use super::{EntityId, PropertyId};

    /// position held
    pub const POSITION_HELD: PropertyId = PropertyId::new(39);
    /// start time
    pub const START_TIME: PropertyId = PropertyId::new(580);
    /// end time
    pub const END_TIME: PropertyId = PropertyId::new(582);
    /// replaces
    pub const REPLACES: PropertyId = PropertyId::new(1365);
    /// replaced by
    pub const REPLACED_BY: PropertyId = PropertyId::new(1366);
    /// electoral district
    pub const ELECTORAL_DISTRICT: PropertyId = PropertyId::new(768);
    /// appointed by
    pub const APPOINTED_BY: PropertyId = PropertyId::new(748);
    /// series ordinal
    pub const SERIES_ORDINAL: PropertyId = PropertyId::new(1545);
    /// together with
    pub const TOGETHER_WITH: PropertyId = PropertyId::new(1706);
    /// diocese
    pub const DIOCESE: PropertyId = PropertyId::new(708);

    /// imported from Wikimedia project
    pub const IMPORTED_FROM: PropertyId = PropertyId::new(143);
    /// retrieved
    pub const RETRIEVED: PropertyId = PropertyId::new(813);

    /// office held by head of government
    pub const HEAD_OF_GOVERNMENT_OFFICE: PropertyId = PropertyId::new(1313);
    /// office held by head of the organization
    pub const HEAD_OF_ORGANIZATION_OFFICE: PropertyId = PropertyId::new(2388);
    /// office held by head of state
    pub const HEAD_OF_STATE_OFFICE: PropertyId = PropertyId::new(1906);
    /// has part
    pub const HAS_PART: PropertyId = PropertyId::new(527);
    /// has parts of the class
    pub const HAS_PARTS_OF_CLASS: PropertyId = PropertyId::new(2670);
    /// is a list of
    pub const IS_A_LIST_OF: PropertyId = PropertyId::new(360);

    /// human
    pub const HUMAN: EntityId = EntityId::new(5);
    /// Catalan Wikipedia
    pub const CATALAN_WIKIPEDIA: EntityId = EntityId::new(199_693);
}
