//! Statements: a main claim plus rank, qualifiers and sources
//!
//! Statements are immutable values. They are assembled with
//! [`StatementBuilder`] and "changed" by deriving a new value through
//! [`Statement::to_builder`].

use crate::claim::{Claim, ClaimValue};
use crate::id::{PropertyId, StatementId};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Statement rank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rank {
    /// Preferred over normal statements
    Preferred,
    /// Default rank
    #[default]
    Normal,
    /// Known to be wrong or superseded
    Deprecated,
}

/// Qualifier claims keyed by property, insertion order preserved
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Qualifiers(IndexMap<PropertyId, Vec<Claim>>);

impl Qualifiers {
    /// Empty container
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a qualifier under its property
    pub fn push(&mut self, claim: Claim) {
        self.0.entry(claim.property).or_default().push(claim);
    }

    /// Replace the `index`-th qualifier of `property`
    ///
    /// Returns `false` when there is no such qualifier.
    pub fn replace(&mut self, property: PropertyId, index: usize, claim: Claim) -> bool {
        match self.0.get_mut(&property).and_then(|v| v.get_mut(index)) {
            Some(slot) => {
                *slot = claim;
                true
            }
            None => false,
        }
    }

    /// Qualifiers recorded for `property`
    #[inline]
    #[must_use]
    pub fn get(&self, property: PropertyId) -> &[Claim] {
        self.0.get(&property).map_or(&[], Vec::as_slice)
    }

    /// Whether any qualifier is recorded for `property`
    #[inline]
    #[must_use]
    pub fn contains(&self, property: PropertyId) -> bool {
        self.0.get(&property).is_some_and(|v| !v.is_empty())
    }

    /// Properties in insertion order
    pub fn properties(&self) -> impl Iterator<Item = PropertyId> + '_ {
        self.0.iter().filter(|(_, v)| !v.is_empty()).map(|(p, _)| *p)
    }

    /// All qualifier claims in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Claim> {
        self.0.values().flatten()
    }

    /// Total number of qualifier claims
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    /// True when no qualifier is recorded
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FromIterator<Claim> for Qualifiers {
    fn from_iter<I: IntoIterator<Item = Claim>>(iter: I) -> Self {
        let mut qualifiers = Self::new();
        for claim in iter {
            qualifiers.push(claim);
        }
        qualifiers
    }
}

/// One reference group (provenance)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Source {
    claims: Vec<Claim>,
}

impl Source {
    /// Group the given claims
    #[inline]
    #[must_use]
    pub fn new(claims: Vec<Claim>) -> Self {
        Self { claims }
    }

    /// Claims of this group
    #[inline]
    #[must_use]
    pub fn claims(&self) -> &[Claim] {
        &self.claims
    }

    /// Whether the group carries `property` with an equal value
    #[must_use]
    pub fn carries(&self, property: PropertyId, value: &ClaimValue) -> bool {
        self.claims
            .iter()
            .any(|c| c.property == property && c.value.matches(value) == Some(true))
    }
}

/// Main claim with rank, qualifiers and sources
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    claim: Claim,
    #[serde(default)]
    rank: Rank,
    #[serde(default)]
    qualifiers: Qualifiers,
    #[serde(default)]
    sources: Vec<Source>,
}

impl Statement {
    /// Start building a statement for `claim`
    #[inline]
    #[must_use]
    pub fn builder(claim: Claim) -> StatementBuilder {
        StatementBuilder::new(claim)
    }

    /// Main claim
    #[inline]
    #[must_use]
    pub fn claim(&self) -> &Claim {
        &self.claim
    }

    /// Rank
    #[inline]
    #[must_use]
    pub fn rank(&self) -> Rank {
        self.rank
    }

    /// Qualifiers
    #[inline]
    #[must_use]
    pub fn qualifiers(&self) -> &Qualifiers {
        &self.qualifiers
    }

    /// Reference groups
    #[inline]
    #[must_use]
    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    /// Builder seeded with this statement, for deriving a changed copy
    #[must_use]
    pub fn to_builder(&self) -> StatementBuilder {
        StatementBuilder {
            claim: self.claim.clone(),
            rank: self.rank,
            qualifiers: self.qualifiers.clone(),
            sources: self.sources.clone(),
        }
    }
}

/// Builder for [`Statement`]
#[derive(Debug, Clone)]
pub struct StatementBuilder {
    claim: Claim,
    rank: Rank,
    qualifiers: Qualifiers,
    sources: Vec<Source>,
}

impl StatementBuilder {
    /// New builder with normal rank
    #[inline]
    #[must_use]
    pub fn new(claim: Claim) -> Self {
        Self {
            claim,
            rank: Rank::Normal,
            qualifiers: Qualifiers::new(),
            sources: Vec::new(),
        }
    }

    /// Set rank
    #[inline]
    #[must_use]
    pub fn rank(mut self, rank: Rank) -> Self {
        self.rank = rank;
        self
    }

    /// Add one qualifier
    #[inline]
    #[must_use]
    pub fn qualifier(mut self, claim: Claim) -> Self {
        self.qualifiers.push(claim);
        self
    }

    /// Add several qualifiers
    #[must_use]
    pub fn qualifiers(mut self, claims: impl IntoIterator<Item = Claim>) -> Self {
        for claim in claims {
            self.qualifiers.push(claim);
        }
        self
    }

    /// Replace an existing qualifier in place
    #[must_use]
    pub fn replace_qualifier(mut self, index: usize, claim: Claim) -> Self {
        let property = claim.property;
        self.qualifiers.replace(property, index, claim);
        self
    }

    /// Add one reference group
    #[inline]
    #[must_use]
    pub fn source(mut self, source: Source) -> Self {
        self.sources.push(source);
        self
    }

    /// Finish
    #[inline]
    #[must_use]
    pub fn build(self) -> Statement {
        Statement {
            claim: self.claim,
            rank: self.rank,
            qualifiers: self.qualifiers,
            sources: self.sources,
        }
    }
}

/// Statement already attached to an entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistingStatement {
    /// Knowledge-base GUID
    pub id: StatementId,
    /// Current content
    pub statement: Statement,
}

impl ExistingStatement {
    /// Pair a GUID with its content
    #[inline]
    #[must_use]
    pub fn new(id: StatementId, statement: Statement) -> Self {
        Self { id, statement }
    }
}
