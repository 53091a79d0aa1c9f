//! Lexical tables
//!
//! Everything the resolvers know about specific offices, countries and
//! electoral districts lives in one TOML document. The built-in document is
//! compiled in; a replacement can be loaded from disk.

use crate::error::LexiconError;
use indexmap::IndexMap;
use officebot_extract::DateParser;
use officebot_model::EntityId;
use serde::{Deserialize, Serialize};
use std::path::Path;

const BUILTIN: &str = include_str!("../resources/lexicon.toml");

/// Ambassador office for an (origin, destination) country pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmbassadorEntry {
    /// Sending country
    pub of: String,
    /// Receiving country
    pub to: String,
    /// Ambassador office
    pub office: EntityId,
}

/// Lexical tables used by the resolvers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lexicon {
    /// Month names (lower case) → month number
    pub months: IndexMap<String, u8>,
    /// Country words of ambassador phrases
    pub countries: Vec<String>,
    /// Ambassador offices by country pair
    pub ambassadors: Vec<AmbassadorEntry>,
    /// Organisation name rewrites applied before lookup
    pub organization_aliases: IndexMap<String, String>,
    /// Organisation name → sovereign office
    pub sovereigns: IndexMap<String, EntityId>,
    /// Chamber page title → membership office
    pub member_offices: IndexMap<String, EntityId>,
    /// Resolved office → office to use instead
    pub remaps: IndexMap<EntityId, EntityId>,
    /// Office → district display name → district
    pub districts: IndexMap<EntityId, IndexMap<String, EntityId>>,
}

impl Lexicon {
    /// Compiled-in tables
    ///
    /// # Errors
    /// `LexiconError::Parse` if the embedded document is invalid.
    pub fn builtin() -> Result<Self, LexiconError> {
        Self::from_toml(BUILTIN)
    }

    /// Parse a lexicon document
    ///
    /// # Errors
    /// `LexiconError::Parse` for invalid TOML or ids.
    pub fn from_toml(text: &str) -> Result<Self, LexiconError> {
        Ok(toml::from_str(text)?)
    }

    /// Load a lexicon file
    ///
    /// # Errors
    /// `LexiconError` when the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LexiconError> {
        let path = path.as_ref();
        let text =
            std::fs::read_to_string(path).map_err(|e| LexiconError::io_error(path, e))?;
        let lexicon = Self::from_toml(&text)?;
        tracing::info!(path = %path.display(), "loaded lexicon");
        Ok(lexicon)
    }

    /// Date parser over this lexicon's month names
    #[must_use]
    pub fn date_parser(&self) -> DateParser {
        if self.months.is_empty() {
            return DateParser::catalan();
        }
        DateParser::new(
            self.months
                .iter()
                .map(|(name, n)| (name.to_lowercase(), *n))
                .collect(),
        )
    }

    /// Ambassador office for a country pair
    #[must_use]
    pub fn ambassador(&self, of: &str, to: &str) -> Option<EntityId> {
        self.ambassadors
            .iter()
            .find(|entry| entry.of == of && entry.to == to)
            .map(|entry| entry.office)
    }

    /// True for a recognized country word
    #[must_use]
    pub fn is_country(&self, word: &str) -> bool {
        self.countries.iter().any(|c| c == word)
    }

    /// Countries whose names span several words
    pub fn multi_word_countries(&self) -> impl Iterator<Item = &str> {
        self.countries
            .iter()
            .filter(|c| c.contains('_'))
            .map(String::as_str)
    }

    /// Organisation name after alias rewriting
    #[must_use]
    pub fn organization_name<'a>(&'a self, name: &'a str) -> &'a str {
        self.organization_aliases
            .get(name)
            .map_or(name, String::as_str)
    }

    /// Apply the remap table
    #[must_use]
    pub fn remap(&self, office: EntityId) -> EntityId {
        match self.remaps.get(&office) {
            Some(replacement) => {
                tracing::debug!(from = %office, to = %replacement, "remapped office");
                *replacement
            }
            None => office,
        }
    }

    /// District override for an office
    #[must_use]
    pub fn district(&self, office: EntityId, name: &str) -> Option<EntityId> {
        self.districts.get(&office)?.get(name).copied()
    }
}
