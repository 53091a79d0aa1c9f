//! Error types for the value model

/// Errors constructing model values
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// Text is not a `Q…` id
    #[error("invalid entity id: '{0}'")]
    InvalidEntityId(String),

    /// Text is not a `P…` id
    #[error("invalid property id: '{0}'")]
    InvalidPropertyId(String),

    /// Date components out of range or inconsistent
    #[error("invalid date: {0}")]
    InvalidDate(String),
}

impl ModelError {
    /// Create invalid date error
    #[inline]
    pub fn invalid_date(message: impl Into<String>) -> Self {
        Self::InvalidDate(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_error_display() {
        let err = ModelError::InvalidEntityId("Senat".to_string());
        assert_eq!(err.to_string(), "invalid entity id: 'Senat'");
        assert!(ModelError::invalid_date("day without month")
            .to_string()
            .contains("day without month"));
    }
}
