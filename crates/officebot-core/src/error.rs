//! Error types for page processing

use officebot_model::ModelError;
use officebot_resolve::{CommitError, LexiconError, ResolveError};
use std::path::PathBuf;

/// Page processing errors
///
/// Any of these aborts the page: nothing is committed and the source page
/// is left untouched.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// A position record could not be turned into a statement
    #[error("record {index} of '{page}': {source}")]
    Record {
        page: String,
        index: String,
        source: ResolveError,
    },

    /// Page is not connected to an entity
    #[error("no entity for page '{0}'")]
    NoEntity(String),

    /// Write collaborator refused
    #[error("commit failed: {0}")]
    Commit(#[from] CommitError),

    /// Invalid configuration
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Invalid lexicon
    #[error("lexicon error: {0}")]
    Lexicon(#[from] LexiconError),

    /// Invalid value (retrieval date)
    #[error("model error: {0}")]
    Model(#[from] ModelError),
}

impl PipelineError {
    /// Create record error
    pub fn record(page: impl Into<String>, index: impl Into<String>, source: ResolveError) -> Self {
        Self::Record {
            page: page.into(),
            index: index.into(),
            source,
        }
    }

    /// True when the failure came from the write side
    #[inline]
    #[must_use]
    pub fn is_commit_failure(&self) -> bool {
        matches!(self, Self::Commit(_))
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Document is not a valid configuration
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

impl ConfigError {
    /// Create IO error
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for page processing
pub type PipelineResult<T> = Result<T, PipelineError>;
