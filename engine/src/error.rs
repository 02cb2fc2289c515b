//! Error types for the list-query engine.

use thiserror::Error;

/// All possible errors from the engine.
///
/// Empty results, out-of-range pages and unknown sort fields are not errors;
/// they produce well-defined empty or fallback results.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid query: {0}")]
    InvalidQuery(String),
}

impl Error {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidQuery(msg.into())
    }
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = Error::InvalidQuery("per_page must be positive".into());
        assert_eq!(err.to_string(), "invalid query: per_page must be positive");
    }
}
