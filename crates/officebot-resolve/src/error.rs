//! Error types for resolution
//!
//! A [`ResolveError`] on the job title or an unknown role aborts the record
//! (and the page batch). Errors on secondary qualifiers are downgraded to
//! skips by the qualifier resolver.

use officebot_model::{EntityId, PropertyId};
use std::path::PathBuf;

/// Errors resolving text into knowledge-base references
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// Record has no title, own or propagated
    #[error("position record {index} has no title")]
    MissingTitle { index: String },

    /// No rule of the table recognizes the phrasing
    #[error("no rule matches position value: '{0}'")]
    NoRule(String),

    /// Link target does not exist on any site tried
    #[error("no page for link: '{0}'")]
    NoPage(String),

    /// Page has no knowledge-base entity
    #[error("no entity for page: '{0}'")]
    NoEntity(String),

    /// Entity lacks every property tried
    #[error("{entity} has no {property} value")]
    MissingProperty {
        entity: EntityId,
        property: PropertyId,
    },

    /// Lookup expected a single value
    #[error("{entity} has {count} values for {property}, expected one")]
    Ambiguous {
        entity: EntityId,
        property: PropertyId,
        count: usize,
    },

    /// Lookup found a value that is not an entity
    #[error("{entity} {property} value is not an entity")]
    NotAnEntity {
        entity: EntityId,
        property: PropertyId,
    },

    /// Organisation name could not be read from a list title
    #[error("no organisation in list title '{title}' for word '{word}'")]
    ListTitle { title: String, word: String },

    /// Ambassador phrase did not name exactly two known countries
    #[error("not a pair of countries: {0:?}")]
    NotACountryPair(Vec<String>),

    /// Lexicon table has no entry for the key
    #[error("missing mapping in {table}: '{key}'")]
    MissingMapping { table: &'static str, key: String },

    /// Role or pair label outside the whitelist
    #[error("unknown position role: '{0}'")]
    UnknownRole(String),
}

impl ResolveError {
    /// Create missing mapping error
    pub fn missing_mapping(table: &'static str, key: impl Into<String>) -> Self {
        Self::MissingMapping {
            table,
            key: key.into(),
        }
    }

    /// Create list title error
    pub fn list_title(title: impl Into<String>, word: impl Into<String>) -> Self {
        Self::ListTitle {
            title: title.into(),
            word: word.into(),
        }
    }
}

/// Result alias for resolution
pub type ResolveResult<T> = Result<T, ResolveError>;

/// Errors loading a lexicon
#[derive(Debug, thiserror::Error)]
pub enum LexiconError {
    /// IO error reading a lexicon file
    #[error("io error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Document is not a valid lexicon
    #[error("invalid lexicon: {0}")]
    Parse(#[from] toml::de::Error),
}

impl LexiconError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
