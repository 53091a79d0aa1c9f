//! Claims: (property, value) assertions
//!
//! Values are one of entity reference, date with precision, plain string or
//! quantity. Existing statements fetched from the knowledge base may carry
//! value shapes the pipeline does not model; those land in
//! [`ClaimValue::Unknown`] and are never considered equal to anything.

use crate::date::WikiDate;
use crate::id::{EntityId, PropertyId};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Value of a claim
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ClaimValue {
    /// Reference to another entity
    Entity(EntityId),

    /// Point in time with explicit precision
    Time(WikiDate),

    /// Opaque string (series ordinals are stored this way)
    String(String),

    /// Decimal amount, kept as text to avoid float rounding
    Quantity(String),

    /// Shape not understood (somevalue, novalue, unsupported datatype)
    Unknown(String),
}

impl ClaimValue {
    /// Entity id, when this is an entity value
    #[inline]
    #[must_use]
    pub fn as_entity(&self) -> Option<EntityId> {
        match self {
            Self::Entity(id) => Some(*id),
            _ => None,
        }
    }

    /// Date, when this is a time value
    #[inline]
    #[must_use]
    pub fn as_time(&self) -> Option<&WikiDate> {
        match self {
            Self::Time(date) => Some(date),
            _ => None,
        }
    }

    /// Whether the value shape is understood
    #[inline]
    #[must_use]
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }

    /// Type-aware equality
    ///
    /// Entities compare by id, dates on their overlapping components, the
    /// rest by value. Returns `None` when either side has an unknown shape.
    #[must_use]
    pub fn matches(&self, other: &Self) -> Option<bool> {
        match (self, other) {
            (Self::Unknown(_), _) | (_, Self::Unknown(_)) => None,
            (Self::Entity(a), Self::Entity(b)) => Some(a == b),
            (Self::Time(a), Self::Time(b)) => Some(a.agrees_with(b)),
            (Self::String(a), Self::String(b)) | (Self::Quantity(a), Self::Quantity(b)) => {
                Some(a == b)
            }
            _ => Some(false),
        }
    }
}

impl Display for ClaimValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Entity(id) => write!(f, "{id}"),
            Self::Time(date) => write!(f, "{date}"),
            Self::String(s) => write!(f, "\"{s}\""),
            Self::Quantity(q) => write!(f, "{q}"),
            Self::Unknown(kind) => write!(f, "<{kind}>"),
        }
    }
}

/// A (property, value) pair
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Claim {
    /// Property asserted
    pub property: PropertyId,
    /// Asserted value
    pub value: ClaimValue,
}

impl Claim {
    /// Create claim from parts
    #[inline]
    #[must_use]
    pub fn new(property: PropertyId, value: ClaimValue) -> Self {
        Self { property, value }
    }

    /// Entity-valued claim
    #[inline]
    #[must_use]
    pub fn entity(property: PropertyId, id: EntityId) -> Self {
        Self::new(property, ClaimValue::Entity(id))
    }

    /// Time-valued claim
    #[inline]
    #[must_use]
    pub fn time(property: PropertyId, date: WikiDate) -> Self {
        Self::new(property, ClaimValue::Time(date))
    }

    /// String-valued claim
    #[inline]
    #[must_use]
    pub fn string(property: PropertyId, value: impl Into<String>) -> Self {
        Self::new(property, ClaimValue::String(value.into()))
    }

    /// Quantity-valued claim
    #[inline]
    #[must_use]
    pub fn quantity(property: PropertyId, amount: impl Into<String>) -> Self {
        Self::new(property, ClaimValue::Quantity(amount.into()))
    }
}

impl Display for Claim {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.property, self.value)
    }
}
