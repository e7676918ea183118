//! In-memory storage backend.
//!
//! This module provides a thread-safe in-memory implementation of
//! [`TripleStore`]. It is intended for embedded usage, tests, and as a
//! reference implementation.

use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::graph::Graph;
use crate::pattern::TriplePattern;
use crate::storage::traits::{StorageError, TripleStore};
use crate::term::{Iri, Term, Triple};

pub(crate) fn lock_err(context: &'static str) -> StorageError {
    StorageError::Backend(format!("poisoned lock: {context}"))
}

/// Thread-safe in-memory store of named graphs.
#[derive(Debug, Default)]
pub struct InMemoryTripleStore {
    graphs: RwLock<BTreeMap<Iri, Graph>>,
}

impl InMemoryTripleStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with graphs.
    #[must_use]
    pub fn with_graphs(graphs: BTreeMap<Iri, Graph>) -> Self {
        Self {
            graphs: RwLock::new(graphs),
        }
    }

    /// Names of all stored graphs.
    pub fn graph_names(&self) -> Result<Vec<Iri>, StorageError> {
        let graphs = self.graphs.read().map_err(|_| lock_err("graph_names"))?;
        Ok(graphs.keys().cloned().collect())
    }

    /// Copies out every graph.
    pub fn snapshot(&self) -> Result<BTreeMap<Iri, Graph>, StorageError> {
        let graphs = self.graphs.read().map_err(|_| lock_err("snapshot"))?;
        Ok(graphs.clone())
    }
}

impl TripleStore for InMemoryTripleStore {
    fn contains_graph(&self, name: &Iri) -> Result<bool, StorageError> {
        let graphs = self.graphs.read().map_err(|_| lock_err("contains_graph"))?;
        Ok(graphs.contains_key(name))
    }

    fn get_graph(&self, name: &Iri) -> Result<Graph, StorageError> {
        let graphs = self.graphs.read().map_err(|_| lock_err("get_graph"))?;
        graphs
            .get(name)
            .cloned()
            .ok_or_else(|| StorageError::GraphNotFound(name.clone()))
    }

    fn put_graph(&self, name: &Iri, graph: &Graph) -> Result<(), StorageError> {
        let mut graphs = self.graphs.write().map_err(|_| lock_err("put_graph"))?;
        graphs.insert(name.clone(), graph.clone());
        Ok(())
    }

    fn ask(&self, name: &Iri, pattern: &TriplePattern) -> Result<bool, StorageError> {
        let graphs = self.graphs.read().map_err(|_| lock_err("ask"))?;
        Ok(graphs.get(name).is_some_and(|g| g.ask(pattern)))
    }

    fn select(
        &self,
        name: &Iri,
        pattern: &TriplePattern,
        var: &str,
    ) -> Result<Vec<Term>, StorageError> {
        let graphs = self.graphs.read().map_err(|_| lock_err("select"))?;
        Ok(graphs
            .get(name)
            .map(|g| g.select(pattern, var))
            .unwrap_or_default())
    }

    fn insert(&self, name: &Iri, triple: Triple) -> Result<bool, StorageError> {
        let mut graphs = self.graphs.write().map_err(|_| lock_err("insert"))?;
        Ok(graphs.entry(name.clone()).or_default().insert(triple))
    }

    fn delete(&self, name: &Iri, triple: &Triple) -> Result<bool, StorageError> {
        let mut graphs = self.graphs.write().map_err(|_| lock_err("delete"))?;
        Ok(graphs.get_mut(name).is_some_and(|g| g.remove(triple)))
    }

    fn delete_resource(&self, name: &Iri, resource: &Term) -> Result<usize, StorageError> {
        let mut graphs = self.graphs.write().map_err(|_| lock_err("delete_resource"))?;
        Ok(graphs
            .get_mut(name)
            .map(|g| g.remove_resource(resource).len())
            .unwrap_or_default())
    }
}
