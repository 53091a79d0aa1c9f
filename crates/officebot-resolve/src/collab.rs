//! External collaborators
//!
//! The pipeline never talks to a wiki or knowledge base directly. Page
//! fetching, link resolution, entity lookup and the final write are traits
//! bundled in a [`Collaborators`] context that is passed to every resolver.

use officebot_extract::TemplateFieldSet;
use officebot_model::{EntityId, ExistingStatement, PropertyId, Statement, StatementId};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Wiki language edition (`ca`, `es`, …)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SiteId(String);

impl SiteId {
    /// Create site id
    #[inline]
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Language code
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for SiteId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An existing page on one site
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WikiPage {
    /// Site the page lives on
    pub site: SiteId,
    /// Canonical title (after redirects)
    pub title: String,
}

impl WikiPage {
    /// Create page reference
    #[must_use]
    pub fn new(site: SiteId, title: impl Into<String>) -> Self {
        Self {
            site,
            title: title.into(),
        }
    }

    /// Lower-cased title for prefix checks
    #[must_use]
    pub fn lower_title(&self) -> String {
        self.title.to_lowercase()
    }
}

impl Display for WikiPage {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.site, self.title)
    }
}

/// Sites consulted when resolving links
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Fallback order for general links
    pub fallback: Vec<SiteId>,
    /// Sites for electoral district titles
    pub district_sites: Vec<SiteId>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            fallback: ["ca", "es", "gl", "en"].into_iter().map(SiteId::new).collect(),
            district_sites: vec![SiteId::new("ca")],
        }
    }
}

/// Source of infobox fields and page text
pub trait PageSource {
    /// Titles redirecting to `template`, the template itself excluded
    fn template_aliases(&self, template: &str) -> Vec<String>;

    /// Fields of the first invocation of `template` or one of its aliases
    fn template_fields(
        &self,
        page: &WikiPage,
        template: &str,
        aliases: &[String],
    ) -> Option<TemplateFieldSet>;

    /// Current wikitext
    fn page_text(&self, page: &WikiPage) -> Option<String>;

    /// Replace the wikitext
    ///
    /// # Errors
    /// `CommitError` when the write is refused.
    fn save_text(&self, page: &WikiPage, text: &str, summary: &str) -> Result<(), CommitError>;
}

/// Link → page resolution
pub trait LinkResolver {
    /// Resolve on one site, following a single redirect
    fn resolve_on(&self, link: &str, site: &SiteId) -> Option<WikiPage>;

    /// First site of `sites` on which the link exists
    fn resolve(&self, link: &str, sites: &[SiteId]) -> Option<WikiPage> {
        sites.iter().find_map(|site| {
            let page = self.resolve_on(link, site);
            if page.is_none() {
                tracing::debug!(link, site = %site, "no page on site");
            }
            page
        })
    }
}

impl<T: LinkResolver + ?Sized> LinkResolver for &T {
    fn resolve_on(&self, link: &str, site: &SiteId) -> Option<WikiPage> {
        (**self).resolve_on(link, site)
    }
}

/// Page ↔ entity lookups
pub trait EntityLookup {
    /// Entity connected to a page
    fn entity_for_page(&self, page: &WikiPage) -> Option<EntityId>;

    /// True when the entity exists
    fn exists(&self, entity: EntityId) -> bool;
}

/// Statement reads
pub trait EntityProperties {
    /// Statements of `entity` for `property`, in stored order
    fn statements(&self, entity: EntityId, property: PropertyId) -> Vec<ExistingStatement>;
}

/// One change to submit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StatementEdit {
    /// New statement
    Create { statement: Statement },
    /// Replacement of a stored statement
    Replace {
        id: StatementId,
        statement: Statement,
    },
}

/// Acknowledgement of a commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitReceipt {
    /// Entity written
    pub entity: EntityId,
    /// Number of edits applied
    pub applied: usize,
}

/// Errors from the write collaborators
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommitError {
    /// Backend refused the edits
    #[error("commit rejected for {entity}: {reason}")]
    Rejected { entity: String, reason: String },

    /// Backend unreachable
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

impl CommitError {
    /// Create rejected error
    pub fn rejected(entity: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Rejected {
            entity: entity.into(),
            reason: reason.into(),
        }
    }
}

/// All-or-nothing statement writes
pub trait Committer {
    /// Apply every edit or none
    ///
    /// # Errors
    /// `CommitError` when the backend refuses or is unreachable.
    fn commit(
        &self,
        entity: EntityId,
        edits: &[StatementEdit],
        summary: &str,
    ) -> Result<CommitReceipt, CommitError>;
}

/// Explicit context passed through resolution and processing
#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
    /// Infobox and page text source
    pub pages: &'a dyn PageSource,
    /// Link resolution
    pub links: &'a dyn LinkResolver,
    /// Page → entity
    pub entities: &'a dyn EntityLookup,
    /// Statement reads
    pub properties: &'a dyn EntityProperties,
    /// Statement writes
    pub committer: &'a dyn Committer,
    /// Site fallback configuration
    pub sites: &'a SiteConfig,
}

impl fmt::Debug for Collaborators<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collaborators")
            .field("sites", self.sites)
            .finish_non_exhaustive()
    }
}

impl Collaborators<'_> {
    /// Resolve a link through the general fallback chain
    #[must_use]
    pub fn page(&self, link: &str) -> Option<WikiPage> {
        self.links.resolve(link, &self.sites.fallback)
    }

    /// Resolve a link on the district sites only
    #[must_use]
    pub fn district_page(&self, link: &str) -> Option<WikiPage> {
        self.links.resolve(link, &self.sites.district_sites)
    }
}
