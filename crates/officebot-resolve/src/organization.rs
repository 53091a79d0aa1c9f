//! Organisational indirections
//!
//! Job titles often point at the organisation rather than the office
//! ("Alcalde de [[Vic]]"). These lookups follow the organisation's
//! statements to the office itself.

use crate::collab::{Collaborators, WikiPage};
use crate::error::{ResolveError, ResolveResult};
use officebot_model::{props, ClaimValue, EntityId, ExistingStatement, PropertyId};
use regex::RegexBuilder;

/// Which head office to follow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadOf {
    /// Head of state (P1906)
    State,
    /// Head of government (P1313), falling back to head of the organisation (P2388)
    Government,
}

impl HeadOf {
    fn properties(self) -> &'static [PropertyId] {
        match self {
            Self::State => &[props::HEAD_OF_STATE_OFFICE],
            Self::Government => &[
                props::HEAD_OF_GOVERNMENT_OFFICE,
                props::HEAD_OF_ORGANIZATION_OFFICE,
            ],
        }
    }
}

/// How to read an organisation out of a list page title
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListWord {
    /// Stem of the office word (`alcalde`, `ministr`, …)
    pub word: &'static str,
    /// Noun to put before the organisation (`Ministeri`)
    pub prefix: Option<&'static str>,
}

impl ListWord {
    /// List word without prefix
    #[must_use]
    pub const fn new(word: &'static str) -> Self {
        Self { word, prefix: None }
    }

    /// List word with a prefix noun
    #[must_use]
    pub const fn with_prefix(word: &'static str, prefix: &'static str) -> Self {
        Self {
            word,
            prefix: Some(prefix),
        }
    }

    /// True when `title` names a list of office holders
    #[must_use]
    pub fn is_list_title(&self, title: &str) -> bool {
        let lower = title.to_lowercase();
        lower.starts_with("llista") || lower.starts_with(&format!("{}s", self.word))
    }
}

/// Organisation link embedded in a list title
///
/// `Llista d'alcaldes de Vic` → `Vic`; with the `Ministeri` prefix,
/// `Llista de ministres d'Hisenda` → `Ministeri d'Hisenda`.
#[must_use]
pub fn organization_from_list_title(title: &str, list: ListWord) -> Option<String> {
    let pattern = format!(
        r"^.*{}\w+ (?P<preposition>de la |del|de l' |de |d')(?P<organization>.+)",
        regex::escape(list.word)
    );
    let regex = RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .build()
        .ok()?;
    let caps = regex.captures(title)?;
    let organization = caps.name("organization")?.as_str();
    Some(match list.prefix {
        Some(prefix) => {
            let preposition = caps.name("preposition").map_or("", |m| m.as_str());
            format!("{prefix} {preposition}{organization}")
        }
        None => organization.to_string(),
    })
}

/// Organisation lookups over the collaborators
#[derive(Debug, Clone, Copy)]
pub struct OrganizationLookup<'a> {
    ctx: Collaborators<'a>,
}

impl<'a> OrganizationLookup<'a> {
    /// Create lookup over a collaborator context
    #[must_use]
    pub fn new(ctx: Collaborators<'a>) -> Self {
        Self { ctx }
    }

    /// Page for a link, through the site fallback chain
    ///
    /// # Errors
    /// `ResolveError::NoPage` when no site has the link.
    pub fn page(&self, link: &str) -> ResolveResult<WikiPage> {
        self.ctx.page(link).ok_or_else(|| {
            tracing::error!(link, "no page on any site");
            ResolveError::NoPage(link.to_string())
        })
    }

    /// Entity of a page
    ///
    /// # Errors
    /// `ResolveError::NoEntity` when the page is not connected.
    pub fn entity(&self, page: &WikiPage) -> ResolveResult<EntityId> {
        let entity = self
            .ctx
            .entities
            .entity_for_page(page)
            .ok_or_else(|| ResolveError::NoEntity(page.title.clone()))?;
        tracing::debug!(page = %page, entity = %entity, "entity for page");
        Ok(entity)
    }

    /// Entity of a link
    ///
    /// # Errors
    /// `ResolveError` when the page or its entity is missing.
    pub fn entity_for_link(&self, link: &str) -> ResolveResult<EntityId> {
        let page = self.page(link)?;
        self.entity(&page)
    }

    /// Office held by the head of the organisation on `page`
    ///
    /// With a list word, a list page is first unwrapped to the organisation
    /// named in its title.
    ///
    /// # Errors
    /// `ResolveError` when the organisation or a single office is not found.
    pub fn head_office_of_page(
        &self,
        page: &WikiPage,
        head: HeadOf,
        list: Option<ListWord>,
    ) -> ResolveResult<EntityId> {
        let organization = match list {
            Some(list) if list.is_list_title(&page.title) => {
                let link = organization_from_list_title(&page.title, list)
                    .ok_or_else(|| ResolveError::list_title(&page.title, list.word))?;
                tracing::debug!(list = %page, organization = %link, "organisation from list title");
                self.page(&link)?
            }
            _ => page.clone(),
        };
        let entity = self.entity(&organization)?;
        self.single_entity_value(entity, head.properties())
    }

    /// Office held by the head of the organisation behind `link`
    ///
    /// # Errors
    /// `ResolveError` when the organisation or a single office is not found.
    pub fn head_office_of_link(&self, link: &str, head: HeadOf) -> ResolveResult<EntityId> {
        if link.to_lowercase().starts_with("llista") {
            tracing::warn!(link, "head office looked up on a list link");
        }
        let entity = self.entity_for_link(link)?;
        self.single_entity_value(entity, head.properties())
    }

    /// The single part (P527, else P2670) of the organisation behind `link`
    ///
    /// # Errors
    /// `ResolveError` when the organisation or a single part is not found.
    pub fn has_part_of_link(&self, link: &str) -> ResolveResult<EntityId> {
        let entity = self.entity_for_link(link)?;
        self.single_entity_value(entity, &[props::HAS_PART, props::HAS_PARTS_OF_CLASS])
    }

    /// What a list page is a list of (P360)
    ///
    /// A list of humans is narrowed by the single qualifier of that
    /// statement (e.g. "human, position held: mayor of Vic").
    ///
    /// # Errors
    /// `ResolveError` when the statement or its narrowing qualifier is not
    /// single valued.
    pub fn list_of(&self, list_page: &WikiPage) -> ResolveResult<EntityId> {
        let list = self.entity(list_page)?;
        let statements = self.ctx.properties.statements(list, props::IS_A_LIST_OF);
        let statement = single(list, props::IS_A_LIST_OF, &statements)?;
        let target = entity_value(list, props::IS_A_LIST_OF, &statement.statement.claim().value)?;
        if target != props::HUMAN {
            return Ok(target);
        }

        let qualifiers = statement.statement.qualifiers();
        if qualifiers.len() != 1 {
            return Err(ResolveError::Ambiguous {
                entity: list,
                property: props::IS_A_LIST_OF,
                count: qualifiers.len(),
            });
        }
        let Some(property) = qualifiers.properties().next() else {
            return Err(ResolveError::MissingProperty {
                entity: list,
                property: props::IS_A_LIST_OF,
            });
        };
        match qualifiers.get(property) {
            [claim] => entity_value(list, property, &claim.value),
            claims => Err(ResolveError::Ambiguous {
                entity: list,
                property,
                count: claims.len(),
            }),
        }
    }

    /// Value of the first of `properties` that `entity` has, which must be
    /// single valued
    fn single_entity_value(
        &self,
        entity: EntityId,
        properties: &[PropertyId],
    ) -> ResolveResult<EntityId> {
        for property in properties {
            let statements = self.ctx.properties.statements(entity, *property);
            if statements.is_empty() {
                continue;
            }
            let statement = single(entity, *property, &statements)?;
            return entity_value(entity, *property, &statement.statement.claim().value);
        }
        Err(ResolveError::MissingProperty {
            entity,
            property: properties.first().copied().unwrap_or(props::HAS_PART),
        })
    }
}

fn single(
    entity: EntityId,
    property: PropertyId,
    statements: &[ExistingStatement],
) -> ResolveResult<&ExistingStatement> {
    match statements {
        [] => Err(ResolveError::MissingProperty { entity, property }),
        [statement] => Ok(statement),
        many => Err(ResolveError::Ambiguous {
            entity,
            property,
            count: many.len(),
        }),
    }
}

fn entity_value(entity: EntityId, property: PropertyId, value: &ClaimValue) -> ResolveResult<EntityId> {
    value
        .as_entity()
        .ok_or(ResolveError::NotAnEntity { entity, property })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn organization_from_mayor_list() {
        assert_eq!(
            organization_from_list_title("Llista d'alcaldes de Vic", ListWord::new("alcalde")),
            Some("Vic".to_string())
        );
        assert_eq!(
            organization_from_list_title(
                "Llista de presidents de la Generalitat de Catalunya",
                ListWord::new("president")
            ),
            Some("Generalitat de Catalunya".to_string())
        );
    }

    #[test]
    fn organization_with_prefix() {
        assert_eq!(
            organization_from_list_title(
                "Llista de ministres d'Hisenda d'Espanya",
                ListWord::with_prefix("ministr", "Ministeri")
            ),
            Some("Ministeri d'Hisenda d'Espanya".to_string())
        );
    }

    #[test]
    fn organization_missing_word() {
        assert_eq!(
            organization_from_list_title("Llista de reis de França", ListWord::new("alcalde")),
            None
        );
    }

    #[test]
    fn list_title_detection() {
        let word = ListWord::new("president");
        assert!(word.is_list_title("Llista de presidents de Colòmbia"));
        assert!(word.is_list_title("Presidents de Colòmbia"));
        assert!(!word.is_list_title("Colòmbia"));
    }
}
