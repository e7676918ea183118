//! Abstract storage traits.
//!
//! The engine talks to its fact store only through [`TripleStore`]. By using
//! a trait we enable:
//! - In-memory backends for testing and embedded use
//! - File-backed snapshots for single-process durability
//! - Remote graph databases behind the same contract

use thiserror::Error;

use crate::graph::Graph;
use crate::pattern::TriplePattern;
use crate::term::{Iri, Term, Triple};

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Named graph not found.
    #[error("Graph not found: {0}")]
    GraphNotFound(Iri),

    /// The store could not be reached; the call may be retried.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Backend error.
    #[error("Storage backend error: {0}")]
    Backend(String),

    /// Filesystem failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StorageError {
    /// Returns true if retrying the call may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

/// Storage trait for named graphs of triples.
///
/// Graph-level calls (`get_graph`, `put_graph`) move whole fact sets; the
/// remaining calls address single triples or patterns inside one named graph.
/// Pattern calls on a graph that does not exist behave as on an empty graph.
///
/// # Safety Considerations
/// - Every call is atomic with respect to the named graph it touches
/// - Implementations should handle concurrent access safely
pub trait TripleStore: Send + Sync {
    /// Returns true if the named graph exists.
    fn contains_graph(&self, name: &Iri) -> Result<bool, StorageError>;

    /// Fetches a copy of the named graph.
    ///
    /// # Errors
    /// - `GraphNotFound`: if the graph does not exist
    fn get_graph(&self, name: &Iri) -> Result<Graph, StorageError>;

    /// Replaces the named graph wholesale, creating it if needed.
    fn put_graph(&self, name: &Iri, graph: &Graph) -> Result<(), StorageError>;

    /// Returns true if any triple in the graph matches `pattern`.
    fn ask(&self, name: &Iri, pattern: &TriplePattern) -> Result<bool, StorageError>;

    /// Distinct values of `var` over all matches of `pattern`, sorted.
    fn select(&self, name: &Iri, pattern: &TriplePattern, var: &str)
        -> Result<Vec<Term>, StorageError>;

    /// Inserts an exact triple. Returns false if it was already present.
    fn insert(&self, name: &Iri, triple: Triple) -> Result<bool, StorageError>;

    /// Deletes an exact triple. Returns false if it was absent.
    fn delete(&self, name: &Iri, triple: &Triple) -> Result<bool, StorageError>;

    /// Deletes every triple mentioning `resource` as subject or object.
    ///
    /// Returns the number of deleted triples.
    fn delete_resource(&self, name: &Iri, resource: &Term) -> Result<usize, StorageError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Compile-time test: ensure the trait is object-safe
    fn _assert_triple_store_object_safe(_: &dyn TripleStore) {}

    #[test]
    fn test_storage_error_display() {
        let err = StorageError::GraphNotFound(Iri::parse("urn:g").unwrap());
        assert!(err.to_string().contains("Graph not found"));

        let err = StorageError::Unavailable("connection refused".to_string());
        assert!(err.to_string().contains("connection refused"));
        assert!(err.is_retryable());
        assert!(!StorageError::Backend("x".to_string()).is_retryable());
    }
}
