//! Storage for named graphs.
//!
//! [`TripleStore`] is the abstract contract; [`InMemoryTripleStore`] is the
//! embedded backend and `persistent::FileTripleStore` (feature `persistent`)
//! keeps graphs on disk.

mod memory;
mod traits;

#[cfg(feature = "persistent")]
pub mod persistent;

pub use memory::InMemoryTripleStore;
pub use traits::{StorageError, TripleStore};

use crate::graph::Graph;
use crate::term::{Iri, Literal, Term, Triple};
use crate::vocab;

/// Fetches a named graph, creating it first if the store lacks it.
///
/// A created graph holds a single `_:v owl:versionInfo "1"` fact so that it
/// is never stored empty.
pub fn load_or_bootstrap(store: &dyn TripleStore, name: &Iri) -> Result<Graph, StorageError> {
    if store.contains_graph(name)? {
        return store.get_graph(name);
    }
    let mut graph = Graph::new();
    graph.insert(Triple::new(
        Term::fresh_blank(),
        vocab::iri(vocab::OWL_VERSION_INFO),
        Literal::string("1"),
    ));
    store.put_graph(name, &graph)?;
    tracing::info!(graph = %name, "created missing graph");
    Ok(graph)
}
