//! Transfer configuration
//!
//! Loaded from TOML; every key is optional and falls back to the defaults
//! used against Catalan Wikipedia.

use crate::error::ConfigError;
use officebot_model::{props, EntityId};
use officebot_resolve::{Lexicon, LexiconError, SiteConfig, SiteId};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Page processing configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransferConfig {
    /// Infobox template read from each page
    pub template: String,
    /// Link resolution sites
    pub sites: SiteConfig,
    /// Summary of the statement commit
    pub edit_summary: String,
    /// Summary of the source page edit
    pub strip_summary: String,
    /// Project credited in the "imported from" reference
    pub project: EntityId,
    /// Plan edits without committing
    pub dry_run: bool,
    /// Remove transferred fields from the source page afterwards
    pub strip_source_fields: bool,
    /// Page titles never processed
    pub ignored_pages: Vec<String>,
    /// Replacement lexicon file
    pub lexicon: Option<PathBuf>,
    /// Entries of the link resolution cache
    pub link_cache_capacity: u64,
}

impl TransferConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML document
    ///
    /// # Errors
    /// `ConfigError::Parse` for invalid TOML or ids.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load a TOML file
    ///
    /// # Errors
    /// `ConfigError` when the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::io_error(path, e))?;
        let config = Self::from_toml(&text)?;
        tracing::info!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// With template name
    #[inline]
    #[must_use]
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = template.into();
        self
    }

    /// With site fallback order
    #[must_use]
    pub fn with_fallback_sites<I, S>(mut self, sites: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sites.fallback = sites.into_iter().map(SiteId::new).collect();
        self
    }

    /// With dry run switch
    #[inline]
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// With source field stripping
    #[inline]
    #[must_use]
    pub fn with_strip_source_fields(mut self, strip: bool) -> Self {
        self.strip_source_fields = strip;
        self
    }

    /// With an ignored page
    #[must_use]
    pub fn with_ignored_page(mut self, title: impl Into<String>) -> Self {
        self.ignored_pages.push(title.into());
        self
    }

    /// With a replacement lexicon file
    #[must_use]
    pub fn with_lexicon(mut self, path: impl Into<PathBuf>) -> Self {
        self.lexicon = Some(path.into());
        self
    }

    /// True when the page must be left alone
    #[must_use]
    pub fn is_ignored(&self, title: &str) -> bool {
        self.ignored_pages.iter().any(|t| t == title)
    }

    /// Lexicon named by the configuration, or the built-in one
    ///
    /// # Errors
    /// `LexiconError` when the lexicon cannot be read or parsed.
    pub fn load_lexicon(&self) -> Result<Lexicon, LexiconError> {
        match &self.lexicon {
            Some(path) => Lexicon::load(path),
            None => Lexicon::builtin(),
        }
    }
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            template: "Infotaula persona".to_string(),
            sites: SiteConfig::default(),
            edit_summary: "Import from Catalan Wikipedia".to_string(),
            strip_summary: "Exporta a Wikidata".to_string(),
            project: props::CATALAN_WIKIPEDIA,
            dry_run: false,
            strip_source_fields: false,
            ignored_pages: Vec::new(),
            lexicon: None,
            link_cache_capacity: 10_000,
        }
    }
}
