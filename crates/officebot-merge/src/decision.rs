//! Merge decisions

use officebot_model::{Claim, Statement, StatementId};
use serde::{Deserialize, Serialize};

/// One change made to an existing statement's qualifiers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "change", rename_all = "snake_case")]
pub enum QualifierChange {
    /// Qualifier appended under a property the statement lacked
    Added { claim: Claim },
    /// Coarser date replaced by a more precise one
    Upgraded { from: Claim, to: Claim },
}

/// Replacement for an existing statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergePlan {
    /// Statement being replaced
    pub statement_id: StatementId,
    /// New content
    pub merged: Statement,
    /// What changed
    pub changes: Vec<QualifierChange>,
    /// Whether the new reference groups were attached
    pub sources_added: bool,
}

/// Why nothing needs writing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "cause", rename_all = "snake_case")]
pub enum SkipCause {
    /// Same office, new statement has no qualifiers
    Duplicate { statement_id: StatementId },
    /// Merge would change nothing
    Unchanged { statement_id: StatementId },
}

/// Outcome for one new statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", content = "detail", rename_all = "snake_case")]
pub enum MergeDecision {
    /// Add as a new statement
    Create(Statement),
    /// Replace an existing statement
    Merge(MergePlan),
    /// Write nothing
    Skip(SkipCause),
}

impl MergeDecision {
    /// True when the decision requires a write
    #[inline]
    #[must_use]
    pub fn is_write(&self) -> bool {
        !matches!(self, Self::Skip(_))
    }

    /// Short name for reports and logs
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Create(_) => "create",
            Self::Merge(_) => "merge",
            Self::Skip(_) => "skip",
        }
    }
}
