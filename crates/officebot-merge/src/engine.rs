//! Statement merge engine
//!
//! # Policy
//!
//! The first existing statement with the same office decides:
//! - new statement without qualifiers → duplicate, skip
//! - no qualifier property in common → merge (append)
//! - every common qualifier equal to some existing value → merge
//! - any common qualifier with no equal value → a distinct statement
//!
//! When the first statement differs but a later one with the same office
//! already holds every new qualifier, nothing is written, so a rerun does
//! not create the same term twice.
//!
//! Merging never removes information. It appends missing properties,
//! upgrades coarser dates that the new value refines, and appends a date
//! whose only coarse match was already upgraded by another value.

use crate::decision::{MergeDecision, MergePlan, QualifierChange, SkipCause};
use officebot_model::{
    props, Claim, ClaimValue, ExistingStatement, PropertyId, Statement, WikiDate,
};

/// Decides how a new statement lands on an entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeEngine {
    provenance: Claim,
}

impl Default for MergeEngine {
    fn default() -> Self {
        Self::new(Claim::entity(props::IMPORTED_FROM, props::CATALAN_WIKIPEDIA))
    }
}

impl MergeEngine {
    /// Engine recognizing `provenance` as "already sourced from us"
    #[inline]
    #[must_use]
    pub fn new(provenance: Claim) -> Self {
        Self { provenance }
    }

    /// Provenance claim checked before attaching sources
    #[inline]
    #[must_use]
    pub fn provenance(&self) -> &Claim {
        &self.provenance
    }

    /// Decide for one new statement against the entity's statements
    #[must_use]
    pub fn decide(&self, new: &Statement, existing: &[ExistingStatement]) -> MergeDecision {
        let Some(office) = new.claim().value.as_entity() else {
            return MergeDecision::Create(new.clone());
        };
        let mut candidates = existing.iter().filter(|e| {
            let claim = e.statement.claim();
            claim.property == new.claim().property && claim.value.as_entity() == Some(office)
        });
        let Some(current) = candidates.next() else {
            tracing::debug!(office = %office, "no statement for office");
            return MergeDecision::Create(new.clone());
        };

        if new.qualifiers().is_empty() {
            tracing::info!(office = %office, statement = %current.id, "duplicate without qualifiers");
            return MergeDecision::Skip(SkipCause::Duplicate {
                statement_id: current.id.clone(),
            });
        }

        if let Some((property, value)) = Self::first_difference(current, new) {
            // An earlier run may already have created this term further down
            if let Some(holder) = candidates.find(|e| {
                Self::first_difference(e, new).is_none() && !self.merge(e, new).is_write()
            }) {
                tracing::info!(office = %office, statement = %holder.id, "already recorded as a distinct term");
                return MergeDecision::Skip(SkipCause::Unchanged {
                    statement_id: holder.id.clone(),
                });
            }
            tracing::info!(
                office = %office,
                property = %property,
                value = %value,
                "differing qualifier, distinct statement"
            );
            return MergeDecision::Create(new.clone());
        }

        self.merge(current, new)
    }

    /// First common qualifier of `new` with no equal value on `current`
    fn first_difference<'n>(
        current: &ExistingStatement,
        new: &'n Statement,
    ) -> Option<(PropertyId, &'n ClaimValue)> {
        let stored = current.statement.qualifiers();
        new.qualifiers()
            .properties()
            .filter(|p| stored.contains(*p))
            .flat_map(|p| new.qualifiers().get(p).iter().map(move |claim| (p, claim)))
            .find(|(p, claim)| {
                !stored
                    .get(*p)
                    .iter()
                    .any(|old| old.value.matches(&claim.value) == Some(true))
            })
            .map(|(p, claim)| (p, &claim.value))
    }

    fn merge(&self, current: &ExistingStatement, new: &Statement) -> MergeDecision {
        let stored = current.statement.qualifiers();
        let mut builder = current.statement.to_builder();
        let mut changes = Vec::new();

        for property in new.qualifiers().properties() {
            let incoming = new.qualifiers().get(property);
            if !stored.contains(property) {
                for claim in incoming {
                    builder = builder.qualifier(claim.clone());
                    changes.push(QualifierChange::Added {
                        claim: claim.clone(),
                    });
                }
                continue;
            }

            // Mirrors the merged values of `property` as upgrades land
            let mut values: Vec<Claim> = stored.get(property).to_vec();
            for claim in incoming {
                let Some(date) = claim.value.as_time() else {
                    continue;
                };
                if values.iter().any(|old| covers(old, date)) {
                    continue;
                }
                let target = values
                    .iter()
                    .enumerate()
                    .rev()
                    .find(|(_, old)| old.value.as_time().is_some_and(|old| date.refines(old)))
                    .map(|(index, old)| (index, old.clone()));
                if let Some((index, old)) = target {
                    builder = builder.replace_qualifier(index, claim.clone());
                    values[index] = claim.clone();
                    changes.push(QualifierChange::Upgraded {
                        from: old,
                        to: claim.clone(),
                    });
                } else if !values.iter().any(|old| old.value.matches(&claim.value) == Some(true)) {
                    // Its coarse match was taken by an earlier value of the same property
                    builder = builder.qualifier(claim.clone());
                    values.push(claim.clone());
                    changes.push(QualifierChange::Added {
                        claim: claim.clone(),
                    });
                }
            }
        }

        if changes.is_empty() {
            tracing::info!(statement = %current.id, "nothing to merge");
            return MergeDecision::Skip(SkipCause::Unchanged {
                statement_id: current.id.clone(),
            });
        }

        let already_sourced = current
            .statement
            .sources()
            .iter()
            .any(|source| source.carries(self.provenance.property, &self.provenance.value));
        let sources_added = !already_sourced && !new.sources().is_empty();
        if sources_added {
            for source in new.sources() {
                builder = builder.source(source.clone());
            }
        }

        tracing::info!(
            statement = %current.id,
            changes = changes.len(),
            sources_added,
            "merging into existing statement"
        );
        MergeDecision::Merge(MergePlan {
            statement_id: current.id.clone(),
            merged: builder.build(),
            changes,
            sources_added,
        })
    }
}

/// `old` is a date at least as precise as `date` and agrees with it
fn covers(old: &Claim, date: &WikiDate) -> bool {
    old.value
        .as_time()
        .is_some_and(|old| old.precision() >= date.precision() && old.agrees_with(date))
}
