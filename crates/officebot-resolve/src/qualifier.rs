//! Qualifier resolution
//!
//! Every non-title field of a position record becomes at most one qualifier.
//! Uninformative or unresolvable values are skipped with a reason; only an
//! unknown role aborts the record.

use crate::collab::Collaborators;
use crate::district::{DistrictRef, DistrictResolver};
use crate::error::{ResolveError, ResolveResult};
use crate::lexicon::Lexicon;
use crate::organization::OrganizationLookup;
use officebot_extract::{find_links, strip_brackets, DateParser, FieldRole, LabelPair};
use officebot_model::{props, Claim, EntityId, PropertyId};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Why a field produced no qualifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    /// `present`, `?` or `-`
    Sentinel(String),
    /// Coat of arms belongs on the office, not the statement
    CoatOfArms,
    /// Date could not be parsed
    MalformedDate(String),
    /// Reference expected but no link found
    NoLink,
    /// Reference could not be resolved
    Unresolved(String),
    /// Label/name pair of a letter that is not transferred
    UnsupportedPair(char),
}

impl Display for SkipReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sentinel(value) => write!(f, "uninformative value '{value}'"),
            Self::CoatOfArms => f.write_str("coat of arms"),
            Self::MalformedDate(message) => write!(f, "malformed date: {message}"),
            Self::NoLink => f.write_str("no link"),
            Self::Unresolved(message) => write!(f, "unresolved: {message}"),
            Self::UnsupportedPair(letter) => write!(f, "unsupported pair '{letter}'"),
        }
    }
}

/// Result of resolving one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QualifierOutcome {
    /// Qualifier to attach
    Claim(Claim),
    /// Nothing to attach
    Skip(SkipReason),
}

/// Field → qualifier
#[derive(Debug, Clone)]
pub struct QualifierResolver<'a> {
    ctx: Collaborators<'a>,
    lexicon: &'a Lexicon,
    dates: DateParser,
}

impl<'a> QualifierResolver<'a> {
    /// Create resolver
    #[must_use]
    pub fn new(ctx: Collaborators<'a>, lexicon: &'a Lexicon) -> Self {
        Self {
            ctx,
            lexicon,
            dates: lexicon.date_parser(),
        }
    }

    /// Resolve one role for the given office
    ///
    /// # Errors
    /// `ResolveError::UnknownRole` for the title role, which is not a
    /// qualifier.
    pub fn resolve_role(
        &self,
        role: FieldRole,
        value: &str,
        office: Option<EntityId>,
    ) -> ResolveResult<QualifierOutcome> {
        let value = value.trim();
        let outcome = match role {
            FieldRole::Title => return Err(ResolveError::UnknownRole(role.to_string())),
            FieldRole::CoatOfArms => QualifierOutcome::Skip(SkipReason::CoatOfArms),
            FieldRole::Start => self.date(props::START_TIME, value),
            FieldRole::End => self.date(props::END_TIME, value),
            FieldRole::Predecessor => self.reference(props::REPLACES, value, Some("-")),
            FieldRole::Successor => self.reference(props::REPLACED_BY, value, Some("-")),
            FieldRole::JointWith => self.reference(props::TOGETHER_WITH, value, None),
            FieldRole::AppointedBy => self.reference(props::APPOINTED_BY, value, None),
            FieldRole::Ordinal => {
                let ordinal = strip_brackets(value);
                if ordinal.trim().is_empty() {
                    QualifierOutcome::Skip(SkipReason::Sentinel(value.to_string()))
                } else {
                    QualifierOutcome::Claim(Claim::string(props::SERIES_ORDINAL, ordinal.trim()))
                }
            }
            FieldRole::ElectoralDistrict => {
                match DistrictResolver::new(self.ctx, self.lexicon)
                    .resolve(&DistrictRef::from_value(value), office)
                {
                    Ok(district) => {
                        QualifierOutcome::Claim(Claim::entity(props::ELECTORAL_DISTRICT, district))
                    }
                    Err(err) => QualifierOutcome::Skip(SkipReason::Unresolved(err.to_string())),
                }
            }
        };

        if let QualifierOutcome::Skip(reason) = &outcome {
            tracing::warn!(role = %role, value, reason = %reason, "skipped qualifier");
        }
        Ok(outcome)
    }

    /// Resolve a label/name pair
    ///
    /// Only the `k` pair is transferred: its label names the role.
    ///
    /// # Errors
    /// `ResolveError::UnknownRole` when the `k` label is not a known role.
    pub fn resolve_pair(
        &self,
        pair: &LabelPair,
        office: Option<EntityId>,
    ) -> ResolveResult<QualifierOutcome> {
        if pair.letter != 'k' {
            tracing::warn!(letter = %pair.letter, label = %pair.label, "pair not transferred");
            return Ok(QualifierOutcome::Skip(SkipReason::UnsupportedPair(pair.letter)));
        }
        let role = FieldRole::from_label(&pair.label)
            .filter(|role| *role != FieldRole::Title)
            .ok_or_else(|| {
                tracing::error!(label = %pair.label, "unknown pair label");
                ResolveError::UnknownRole(pair.label.clone())
            })?;
        self.resolve_role(role, &pair.name, office)
    }

    fn date(&self, property: PropertyId, value: &str) -> QualifierOutcome {
        if value == "present" || value == "?" {
            return QualifierOutcome::Skip(SkipReason::Sentinel(value.to_string()));
        }
        match self.dates.parse(value) {
            Ok(date) => QualifierOutcome::Claim(Claim::time(property, date)),
            Err(err) => QualifierOutcome::Skip(SkipReason::MalformedDate(err.to_string())),
        }
    }

    fn reference(&self, property: PropertyId, value: &str, sentinel: Option<&str>) -> QualifierOutcome {
        if sentinel == Some(value) {
            return QualifierOutcome::Skip(SkipReason::Sentinel(value.to_string()));
        }
        let Some(link) = find_links(value).into_iter().next() else {
            return QualifierOutcome::Skip(SkipReason::NoLink);
        };
        match OrganizationLookup::new(self.ctx).entity_for_link(&link.target) {
            Ok(entity) => QualifierOutcome::Claim(Claim::entity(property, entity)),
            Err(err) => QualifierOutcome::Skip(SkipReason::Unresolved(err.to_string())),
        }
    }
}
