//! Testing utilities for the officebot workspace
//!
//! An in-memory wiki and knowledge base implementing every collaborator
//! trait, plus fixture builders and a sample biography page.

#![allow(missing_docs)]

use indexmap::IndexMap;
use officebot_extract::TemplateFieldSet;
use officebot_model::{
    props, Claim, EntityId, ExistingStatement, PropertyId, Statement, StatementId,
};
use officebot_resolve::{
    Collaborators, CommitError, CommitReceipt, Committer, EntityLookup, EntityProperties,
    LinkResolver, PageSource, SiteConfig, SiteId, StatementEdit, WikiPage,
};
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Infobox template used by the fixtures
pub const INFOBOX: &str = "Infotaula persona";

fn default_site() -> SiteId {
    SiteId::new("ca")
}

/// One page of the fake wiki
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageFixture {
    #[serde(default = "default_site")]
    pub site: SiteId,
    pub title: String,
    #[serde(default)]
    pub entity: Option<EntityId>,
    /// Redirect target on the same site
    #[serde(default)]
    pub redirect: Option<String>,
    /// Template the fields belong to; any template matches when unset
    #[serde(default)]
    pub template: Option<String>,
    #[serde(default)]
    pub fields: Option<TemplateFieldSet>,
    #[serde(default)]
    pub text: Option<String>,
}

impl PageFixture {
    pub fn new(site: &str, title: &str) -> Self {
        Self {
            site: SiteId::new(site),
            title: title.to_string(),
            entity: None,
            redirect: None,
            template: None,
            fields: None,
            text: None,
        }
    }
}

/// Serializable snapshot of a wiki plus knowledge base
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Fixture {
    pub pages: Vec<PageFixture>,
    /// Template → redirects to it
    pub template_aliases: IndexMap<String, Vec<String>>,
    /// Entity → stored statements, all properties mixed
    pub entities: IndexMap<EntityId, Vec<ExistingStatement>>,
}

/// One recorded commit call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    pub entity: EntityId,
    pub edits: Vec<StatementEdit>,
    pub summary: String,
}

/// One recorded page save
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedText {
    pub page: WikiPage,
    pub text: String,
    pub summary: String,
}

#[derive(Debug, Default)]
struct State {
    pages: Vec<PageFixture>,
    entities: IndexMap<EntityId, Vec<ExistingStatement>>,
    commits: Vec<CommitRecord>,
    saves: Vec<SavedText>,
    next_statement: usize,
}

/// Wiki titles are case-insensitive on the first letter and treat `_` as space
fn normalize(title: &str) -> String {
    let title = title.trim().replace('_', " ");
    let mut chars = title.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn find_page<'p>(pages: &'p [PageFixture], site: &SiteId, title: &str) -> Option<&'p PageFixture> {
    let wanted = normalize(title);
    pages
        .iter()
        .find(|p| p.site == *site && normalize(&p.title) == wanted)
}

/// In-memory wiki and knowledge base
///
/// Commits are applied to the stored statements, so a second run over the
/// same page sees the first run's writes.
#[derive(Debug, Default)]
pub struct InMemoryWiki {
    template_aliases: IndexMap<String, Vec<String>>,
    fail_commits: bool,
    state: Mutex<State>,
}

impl InMemoryWiki {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fixture(fixture: Fixture) -> Self {
        Self {
            template_aliases: fixture.template_aliases,
            fail_commits: false,
            state: Mutex::new(State {
                pages: fixture.pages,
                entities: fixture.entities,
                ..State::default()
            }),
        }
    }

    /// Parse a JSON [`Fixture`]
    ///
    /// # Errors
    /// Propagates the JSON error.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json).map(Self::from_fixture)
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn state_mut(&mut self) -> &mut State {
        self.state.get_mut().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn with_page_fixture(mut self, page: PageFixture) -> Self {
        self.state_mut().pages.push(page);
        self
    }

    /// Page on the `ca` site connected to `entity`
    #[must_use]
    pub fn with_page(self, title: &str, entity: EntityId) -> Self {
        self.with_page_on("ca", title, Some(entity))
    }

    #[must_use]
    pub fn with_page_on(self, site: &str, title: &str, entity: Option<EntityId>) -> Self {
        let mut page = PageFixture::new(site, title);
        page.entity = entity;
        self.with_page_fixture(page)
    }

    #[must_use]
    pub fn with_redirect(self, site: &str, from: &str, to: &str) -> Self {
        let mut page = PageFixture::new(site, from);
        page.redirect = Some(to.to_string());
        self.with_page_fixture(page)
    }

    /// Biography page on `ca` carrying the infobox fields and wikitext
    #[must_use]
    pub fn with_infobox(self, title: &str, entity: EntityId, fields: TemplateFieldSet, text: &str) -> Self {
        let mut page = PageFixture::new("ca", title);
        page.entity = Some(entity);
        page.template = Some(INFOBOX.to_string());
        page.fields = Some(fields);
        page.text = Some(text.to_string());
        self.with_page_fixture(page)
    }

    #[must_use]
    pub fn with_template_alias(mut self, template: &str, alias: &str) -> Self {
        self.template_aliases
            .entry(template.to_string())
            .or_default()
            .push(alias.to_string());
        self
    }

    /// Entity with no statements, for existence checks
    #[must_use]
    pub fn with_entity(mut self, entity: EntityId) -> Self {
        self.state_mut().entities.entry(entity).or_default();
        self
    }

    #[must_use]
    pub fn with_statement(mut self, entity: EntityId, statement: Statement) -> Self {
        let state = self.state_mut();
        let id = StatementId::new(format!("{entity}$fixture-{}", state.next_statement));
        state.next_statement += 1;
        state
            .entities
            .entry(entity)
            .or_default()
            .push(ExistingStatement::new(id, statement));
        self
    }

    /// Bare entity-valued statement
    #[must_use]
    pub fn with_claim(self, entity: EntityId, property: PropertyId, value: EntityId) -> Self {
        self.with_statement(entity, Statement::builder(Claim::entity(property, value)).build())
    }

    /// Make every commit fail as unavailable
    #[must_use]
    pub fn failing_commits(mut self) -> Self {
        self.fail_commits = true;
        self
    }

    pub fn commits(&self) -> Vec<CommitRecord> {
        self.lock().commits.clone()
    }

    pub fn saved_texts(&self) -> Vec<SavedText> {
        self.lock().saves.clone()
    }

    /// Current statements of `entity` for `property`
    pub fn stored(&self, entity: EntityId, property: PropertyId) -> Vec<ExistingStatement> {
        self.statements(entity, property)
    }

    /// Pages carrying infobox fields, in fixture order
    pub fn infobox_pages(&self) -> Vec<WikiPage> {
        self.lock()
            .pages
            .iter()
            .filter(|p| p.fields.is_some())
            .map(|p| WikiPage::new(p.site.clone(), p.title.clone()))
            .collect()
    }

    /// Context over this wiki for every collaborator role
    pub fn collaborators<'a>(&'a self, sites: &'a SiteConfig) -> Collaborators<'a> {
        Collaborators {
            pages: self,
            links: self,
            entities: self,
            properties: self,
            committer: self,
            sites,
        }
    }
}

impl PageSource for InMemoryWiki {
    fn template_aliases(&self, template: &str) -> Vec<String> {
        self.template_aliases.get(template).cloned().unwrap_or_default()
    }

    fn template_fields(&self, page: &WikiPage, template: &str, aliases: &[String]) -> Option<TemplateFieldSet> {
        let state = self.lock();
        let fixture = find_page(&state.pages, &page.site, &page.title)?;
        let accepted = fixture.template.as_deref().map_or(true, |used| {
            let used = normalize(used);
            normalize(template) == used || aliases.iter().any(|a| normalize(a) == used)
        });
        if accepted {
            fixture.fields.clone()
        } else {
            None
        }
    }

    fn page_text(&self, page: &WikiPage) -> Option<String> {
        let state = self.lock();
        find_page(&state.pages, &page.site, &page.title)?.text.clone()
    }

    fn save_text(&self, page: &WikiPage, text: &str, summary: &str) -> Result<(), CommitError> {
        let mut state = self.lock();
        let wanted = normalize(&page.title);
        let fixture = state
            .pages
            .iter_mut()
            .find(|p| p.site == page.site && normalize(&p.title) == wanted)
            .ok_or_else(|| CommitError::rejected(page.to_string(), "no such page"))?;
        fixture.text = Some(text.to_string());
        state.saves.push(SavedText {
            page: page.clone(),
            text: text.to_string(),
            summary: summary.to_string(),
        });
        Ok(())
    }
}

impl LinkResolver for InMemoryWiki {
    fn resolve_on(&self, link: &str, site: &SiteId) -> Option<WikiPage> {
        let state = self.lock();
        let page = find_page(&state.pages, site, link)?;
        let page = match &page.redirect {
            Some(target) => find_page(&state.pages, site, target)?,
            None => page,
        };
        Some(WikiPage::new(site.clone(), page.title.clone()))
    }
}

impl EntityLookup for InMemoryWiki {
    fn entity_for_page(&self, page: &WikiPage) -> Option<EntityId> {
        let state = self.lock();
        find_page(&state.pages, &page.site, &page.title)?.entity
    }

    fn exists(&self, entity: EntityId) -> bool {
        let state = self.lock();
        state.entities.contains_key(&entity) || state.pages.iter().any(|p| p.entity == Some(entity))
    }
}

impl EntityProperties for InMemoryWiki {
    fn statements(&self, entity: EntityId, property: PropertyId) -> Vec<ExistingStatement> {
        self.lock()
            .entities
            .get(&entity)
            .map(|stored| {
                stored
                    .iter()
                    .filter(|s| s.statement.claim().property == property)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl Committer for InMemoryWiki {
    fn commit(&self, entity: EntityId, edits: &[StatementEdit], summary: &str) -> Result<CommitReceipt, CommitError> {
        if self.fail_commits {
            return Err(CommitError::Unavailable("commits disabled".to_string()));
        }
        let mut guard = self.lock();
        let State {
            entities,
            commits,
            next_statement,
            ..
        } = &mut *guard;
        let stored = entities.entry(entity).or_default();

        // Validate everything before touching the store
        for edit in edits {
            if let StatementEdit::Replace { id, .. } = edit {
                if !stored.iter().any(|s| s.id == *id) {
                    return Err(CommitError::rejected(entity.to_string(), format!("unknown statement {id}")));
                }
            }
        }

        for edit in edits {
            match edit {
                StatementEdit::Create { statement } => {
                    let id = StatementId::new(format!("{entity}$fixture-{next_statement}"));
                    *next_statement += 1;
                    stored.push(ExistingStatement::new(id, statement.clone()));
                }
                StatementEdit::Replace { id, statement } => {
                    if let Some(slot) = stored.iter_mut().find(|s| s.id == *id) {
                        slot.statement = statement.clone();
                    }
                }
            }
        }
        commits.push(CommitRecord {
            entity,
            edits: edits.to_vec(),
            summary: summary.to_string(),
        });
        Ok(CommitReceipt {
            entity,
            applied: edits.len(),
        })
    }
}

pub mod ids {
    //! Entity ids used by [`sample_wiki`](super::sample_wiki)

    use officebot_model::EntityId;

    pub const POLITICIAN: EntityId = EntityId::new(90_001);
    pub const PREDECESSOR: EntityId = EntityId::new(90_002);
    pub const CONGRESS: EntityId = EntityId::new(16_981);
    pub const CONGRESS_MEMBER: EntityId = EntityId::new(18_171_345);
    pub const GIRONA_DISTRICT: EntityId = EntityId::new(5_564_804);
    pub const VIC: EntityId = EntityId::new(13_924);
    pub const MAYOR_OF_VIC: EntityId = EntityId::new(90_010);
}

/// Infobox of the sample biography
pub fn sample_fields() -> TemplateFieldSet {
    TemplateFieldSet::new()
        .with_field("carrec", "[[Congrés dels Diputats|Diputat al Congrés]]")
        .with_field("inici", "[[15 de juny]] de [[1977]]")
        .with_field("final", "1979")
        .with_field("predecessor", "[[Pere Anterior]]")
        .with_field("k_etiqueta", "Circumscripció")
        .with_field("k_nom", "[[Girona]]")
        .with_field("carrec2", "Alcalde de [[Vic]]")
        .with_field("inici2", "1987")
        .with_field("final2", "present")
}

/// Wikitext carrying [`sample_fields`]
pub fn sample_text() -> String {
    let mut text = format!("{{{{{INFOBOX}");
    for (name, value) in sample_fields().iter() {
        text.push_str(&format!("\n| {name} = {value}"));
    }
    text.push_str("\n}}\n'''Joan Exemple''' és un polític català.");
    text
}

/// Biography of a deputy and mayor, with every page the resolvers visit
pub fn sample_wiki() -> InMemoryWiki {
    InMemoryWiki::new()
        .with_infobox("Joan Exemple", ids::POLITICIAN, sample_fields(), &sample_text())
        .with_template_alias(INFOBOX, "Infotaula de persona")
        .with_page("Congrés dels Diputats", ids::CONGRESS)
        .with_claim(ids::CONGRESS, props::HAS_PART, ids::CONGRESS_MEMBER)
        .with_page("Pere Anterior", ids::PREDECESSOR)
        .with_entity(ids::GIRONA_DISTRICT)
        .with_page("Vic", ids::VIC)
        .with_claim(ids::VIC, props::HEAD_OF_GOVERNMENT_OFFICE, ids::MAYOR_OF_VIC)
}
