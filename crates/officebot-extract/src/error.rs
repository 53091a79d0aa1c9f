//! Error types for infobox extraction

use officebot_model::ModelError;

/// Errors parsing an infobox date
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateError {
    /// Blank value
    #[error("empty date")]
    Empty,

    /// Value not shaped like a date
    #[error("malformed date '{input}': {reason}")]
    Malformed { input: String, reason: String },

    /// Components recovered but out of range
    #[error("date out of range: {0}")]
    OutOfRange(#[from] ModelError),
}

impl DateError {
    /// Create malformed date error
    pub fn malformed(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Malformed {
            input: input.into(),
            reason: reason.into(),
        }
    }
}

/// Result alias for date parsing
pub type DateResult<T> = Result<T, DateError>;
