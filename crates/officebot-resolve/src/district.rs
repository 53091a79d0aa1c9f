//! Electoral district resolution

use crate::collab::Collaborators;
use crate::error::{ResolveError, ResolveResult};
use crate::lexicon::Lexicon;
use crate::organization::OrganizationLookup;
use officebot_extract::{find_links, WikiLink};
use officebot_model::EntityId;

/// District as written in the infobox
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistrictRef {
    /// Link target, when the district was linked
    pub link: Option<String>,
    /// Display name
    pub name: String,
}

impl DistrictRef {
    /// From a linked district
    #[must_use]
    pub fn from_link(link: &WikiLink) -> Self {
        Self {
            link: Some(link.target.clone()),
            name: link.label().to_string(),
        }
    }

    /// From a raw value: its first link, or the plain text
    #[must_use]
    pub fn from_value(value: &str) -> Self {
        match find_links(value).first() {
            Some(link) => Self::from_link(link),
            None => Self {
                link: None,
                name: value.trim().to_string(),
            },
        }
    }
}

/// `Circumscripció electoral de Girona`, `Circumscripció electoral d'Osca`
#[must_use]
pub fn synthetic_district_title(name: &str) -> String {
    let elides = name
        .chars()
        .next()
        .is_some_and(|c| matches!(c.to_ascii_lowercase(), 'a' | 'e' | 'i' | 'o' | 'u'));
    if elides {
        format!("Circumscripció electoral d'{name}")
    } else {
        format!("Circumscripció electoral de {name}")
    }
}

/// District lookups: per-office overrides, then the district's page
#[derive(Debug, Clone, Copy)]
pub struct DistrictResolver<'a> {
    ctx: Collaborators<'a>,
    lexicon: &'a Lexicon,
}

impl<'a> DistrictResolver<'a> {
    /// Create resolver
    #[must_use]
    pub fn new(ctx: Collaborators<'a>, lexicon: &'a Lexicon) -> Self {
        Self { ctx, lexicon }
    }

    /// Resolve a district for the given office
    ///
    /// # Errors
    /// `ResolveError` when neither the override table nor the district
    /// sites know the district.
    pub fn resolve(&self, district: &DistrictRef, office: Option<EntityId>) -> ResolveResult<EntityId> {
        if let Some(office) = office {
            if let Some(id) = self.lexicon.district(office, &district.name) {
                if self.ctx.entities.exists(id) {
                    tracing::debug!(office = %office, district = %district.name, entity = %id, "district override");
                    return Ok(id);
                }
                tracing::warn!(office = %office, entity = %id, "district override does not exist");
            }
        }

        let link = district
            .link
            .clone()
            .unwrap_or_else(|| synthetic_district_title(&district.name));
        let page = self
            .ctx
            .district_page(&link)
            .ok_or_else(|| ResolveError::NoPage(link.clone()))?;
        OrganizationLookup::new(self.ctx).entity(&page)
    }
}
