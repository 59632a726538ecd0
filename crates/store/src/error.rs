//! Store error model.

use thiserror::Error;

/// Failure reading one source from the record store.
///
/// These never abort a whole dashboard request: the orchestration layer maps
/// a per-source failure to a degraded section.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backing store could not be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A query against one source failed. `origin` names the source
    /// ("employees", "attendance", ...), not an underlying error.
    #[error("query failed for {origin}: {message}")]
    Query { origin: &'static str, message: String },
}

impl StoreError {
    pub fn query(origin: &'static str, message: impl Into<String>) -> Self {
        Self::Query {
            origin,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_error_names_its_origin() {
        let err = StoreError::query("attendance", "relation does not exist");
        assert_eq!(
            err.to_string(),
            "query failed for attendance: relation does not exist"
        );
        assert!(std::error::Error::source(&err).is_none());
    }
}
