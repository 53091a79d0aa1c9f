//! Record resolution: title plus qualifiers

use crate::collab::Collaborators;
use crate::error::{ResolveError, ResolveResult};
use crate::lexicon::Lexicon;
use crate::position::{PositionResolver, ResolvedPosition};
use crate::qualifier::{QualifierOutcome, QualifierResolver, SkipReason};
use officebot_extract::PositionRecord;
use officebot_model::{Claim, Source, Statement};
use serde::{Deserialize, Serialize};

/// A field that produced no qualifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedQualifier {
    /// Role or pair label
    pub role: String,
    /// Raw value
    pub value: String,
    /// Reason
    pub reason: SkipReason,
}

/// A fully resolved position record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRecord {
    /// Record index
    pub index: String,
    /// Office claim and in-title qualifiers
    pub position: ResolvedPosition,
    /// Qualifiers from the other fields, in field order
    pub qualifiers: Vec<Claim>,
    /// Fields skipped along the way
    pub skipped: Vec<SkippedQualifier>,
}

impl ResolvedRecord {
    /// Build the statement with the given reference groups
    #[must_use]
    pub fn into_statement(self, sources: impl IntoIterator<Item = Source>) -> Statement {
        let mut builder = Statement::builder(self.position.claim)
            .qualifiers(self.position.qualifiers)
            .qualifiers(self.qualifiers);
        for source in sources {
            builder = builder.source(source);
        }
        builder.build()
    }
}

/// Position record → resolved record
#[derive(Debug, Clone)]
pub struct RecordResolver<'a> {
    positions: PositionResolver<'a>,
    qualifiers: QualifierResolver<'a>,
}

impl<'a> RecordResolver<'a> {
    /// Create resolver
    #[must_use]
    pub fn new(ctx: Collaborators<'a>, lexicon: &'a Lexicon) -> Self {
        Self {
            positions: PositionResolver::new(ctx, lexicon),
            qualifiers: QualifierResolver::new(ctx, lexicon),
        }
    }

    /// Resolve one record
    ///
    /// # Errors
    /// `ResolveError` when the record has no title, the title cannot be
    /// resolved, or a field names an unknown role.
    pub fn resolve(&self, record: &PositionRecord) -> ResolveResult<ResolvedRecord> {
        let title = record.title().ok_or_else(|| {
            tracing::error!(index = record.index(), "record without title");
            ResolveError::MissingTitle {
                index: record.index().to_string(),
            }
        })?;
        let position = self.positions.resolve(title)?;
        let office = position.office();

        let mut qualifiers = Vec::new();
        let mut skipped = Vec::new();

        for (role, value) in record.fields() {
            match self.qualifiers.resolve_role(role, value, office)? {
                QualifierOutcome::Claim(claim) => qualifiers.push(claim),
                QualifierOutcome::Skip(reason) => skipped.push(SkippedQualifier {
                    role: role.to_string(),
                    value: value.to_string(),
                    reason,
                }),
            }
        }
        for pair in record.pairs() {
            match self.qualifiers.resolve_pair(pair, office)? {
                QualifierOutcome::Claim(claim) => qualifiers.push(claim),
                QualifierOutcome::Skip(reason) => skipped.push(SkippedQualifier {
                    role: pair.label.clone(),
                    value: pair.name.clone(),
                    reason,
                }),
            }
        }

        tracing::debug!(
            index = record.index(),
            qualifiers = qualifiers.len() + position.qualifiers.len(),
            skipped = skipped.len(),
            "resolved record"
        );
        Ok(ResolvedRecord {
            index: record.index().to_string(),
            position,
            qualifiers,
            skipped,
        })
    }
}
