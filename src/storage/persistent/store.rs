//! File-backed triple store.
//!
//! All named graphs live in one snapshot file. Every mutation rewrites the
//! snapshot to a temporary file and renames it over the previous one, so a
//! crash leaves either the old or the new snapshot on disk, never a torn one.

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use chrono::{DateTime, Utc};

use super::codec::{self, NamedGraph, Snapshot};
use super::PersistentConfig;
use crate::graph::Graph;
use crate::pattern::TriplePattern;
use crate::storage::memory::lock_err;
use crate::storage::traits::{StorageError, TripleStore};
use crate::term::{Iri, Term, Triple};

const SNAPSHOT_FILE: &str = "graphs.jtms";
const SNAPSHOT_TMP: &str = "graphs.jtms.tmp";

/// Durable store of named graphs in a single directory.
#[derive(Debug)]
pub struct FileTripleStore {
    dir: PathBuf,
    config: PersistentConfig,
    graphs: RwLock<BTreeMap<Iri, Graph>>,
    saved_at: RwLock<Option<DateTime<Utc>>>,
}

impl FileTripleStore {
    /// Opens the store in `dir`, creating the directory if needed.
    ///
    /// # Errors
    /// - If the directory cannot be created
    /// - If an existing snapshot is corrupt, has the wrong magic bytes or is
    ///   larger than `config.max_snapshot_size`
    pub fn open(dir: impl AsRef<Path>, config: PersistentConfig) -> Result<Self, StorageError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;

        let path = dir.join(SNAPSHOT_FILE);
        let (graphs, saved_at) = if path.exists() {
            let mut reader = BufReader::new(File::open(&path)?);
            let snapshot = codec::read_snapshot(&mut reader, config.max_snapshot_size)?;
            tracing::info!(
                path = %path.display(),
                graphs = snapshot.graphs.len(),
                saved_at = %snapshot.saved_at,
                "loaded graph snapshot"
            );
            let graphs = snapshot
                .graphs
                .into_iter()
                .map(|ng| (ng.name, ng.triples))
                .collect();
            (graphs, Some(snapshot.saved_at))
        } else {
            (BTreeMap::new(), None)
        };

        Ok(Self {
            dir,
            config,
            graphs: RwLock::new(graphs),
            saved_at: RwLock::new(saved_at),
        })
    }

    /// Directory holding the snapshot.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// When the current on-disk snapshot was written, if any.
    pub fn saved_at(&self) -> Result<Option<DateTime<Utc>>, StorageError> {
        let saved = self.saved_at.read().map_err(|_| lock_err("file.saved_at"))?;
        Ok(*saved)
    }

    fn write_snapshot(&self, graphs: &BTreeMap<Iri, Graph>) -> Result<(), StorageError> {
        let saved_at = Utc::now();
        let snapshot = Snapshot {
            saved_at,
            graphs: graphs
                .iter()
                .map(|(name, triples)| NamedGraph {
                    name: name.clone(),
                    triples: triples.clone(),
                })
                .collect(),
        };
        let tmp = self.dir.join(SNAPSHOT_TMP);
        {
            let file = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&tmp)?;
            let mut writer = BufWriter::new(file);
            codec::write_snapshot(&mut writer, &snapshot, self.config.max_snapshot_size)?;
            writer.flush()?;
            if self.config.sync_on_write {
                writer.get_ref().sync_all()?;
            }
        }
        fs::rename(&tmp, self.dir.join(SNAPSHOT_FILE))?;

        let mut saved = self.saved_at.write().map_err(|_| lock_err("file.saved_at"))?;
        *saved = Some(saved_at);
        Ok(())
    }

    /// Applies `mutate` to a copy of the graphs, persists it, then commits it.
    fn mutate<T>(
        &self,
        context: &'static str,
        mutate: impl FnOnce(&mut BTreeMap<Iri, Graph>) -> T,
    ) -> Result<T, StorageError> {
        let mut graphs = self.graphs.write().map_err(|_| lock_err(context))?;
        let mut next = graphs.clone();
        let out = mutate(&mut next);
        self.write_snapshot(&next)?;
        *graphs = next;
        Ok(out)
    }
}

impl TripleStore for FileTripleStore {
    fn contains_graph(&self, name: &Iri) -> Result<bool, StorageError> {
        let graphs = self.graphs.read().map_err(|_| lock_err("file.contains_graph"))?;
        Ok(graphs.contains_key(name))
    }

    fn get_graph(&self, name: &Iri) -> Result<Graph, StorageError> {
        let graphs = self.graphs.read().map_err(|_| lock_err("file.get_graph"))?;
        graphs
            .get(name)
            .cloned()
            .ok_or_else(|| StorageError::GraphNotFound(name.clone()))
    }

    fn put_graph(&self, name: &Iri, graph: &Graph) -> Result<(), StorageError> {
        self.mutate("file.put_graph", |graphs| {
            graphs.insert(name.clone(), graph.clone());
        })
    }

    fn ask(&self, name: &Iri, pattern: &TriplePattern) -> Result<bool, StorageError> {
        let graphs = self.graphs.read().map_err(|_| lock_err("file.ask"))?;
        Ok(graphs.get(name).is_some_and(|g| g.ask(pattern)))
    }

    fn select(
        &self,
        name: &Iri,
        pattern: &TriplePattern,
        var: &str,
    ) -> Result<Vec<Term>, StorageError> {
        let graphs = self.graphs.read().map_err(|_| lock_err("file.select"))?;
        Ok(graphs
            .get(name)
            .map(|g| g.select(pattern, var))
            .unwrap_or_default())
    }

    fn insert(&self, name: &Iri, triple: Triple) -> Result<bool, StorageError> {
        self.mutate("file.insert", |graphs| {
            graphs.entry(name.clone()).or_default().insert(triple)
        })
    }

    fn delete(&self, name: &Iri, triple: &Triple) -> Result<bool, StorageError> {
        self.mutate("file.delete", |graphs| {
            graphs.get_mut(name).is_some_and(|g| g.remove(triple))
        })
    }

    fn delete_resource(&self, name: &Iri, resource: &Term) -> Result<usize, StorageError> {
        self.mutate("file.delete_resource", |graphs| {
            graphs
                .get_mut(name)
                .map(|g| g.remove_resource(resource).len())
                .unwrap_or_default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab;

    fn iri(s: &str) -> Iri {
        Iri::parse(s).unwrap()
    }

    #[test]
    fn test_reopen_sees_committed_graphs() {
        let dir = tempfile::tempdir().unwrap();
        let name = iri("urn:graph:kb");
        {
            let store = FileTripleStore::open(dir.path(), PersistentConfig::default()).unwrap();
            assert!(store.saved_at().unwrap().is_none());
            store
                .insert(
                    &name,
                    Triple::new(iri("urn:b"), vocab::iri(vocab::RDF_TYPE), vocab::iri(vocab::BELIEF)),
                )
                .unwrap();
            assert!(store.saved_at().unwrap().is_some());
        }

        let store = FileTripleStore::open(dir.path(), PersistentConfig::default()).unwrap();
        assert!(store.contains_graph(&name).unwrap());
        assert_eq!(store.get_graph(&name).unwrap().instances_of(vocab::BELIEF), vec![iri("urn:b")]);
        assert!(store.saved_at().unwrap().is_some());
    }

    #[test]
    fn test_corrupt_snapshot_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = FileTripleStore::open(dir.path(), PersistentConfig::default()).unwrap();
            store.put_graph(&iri("urn:graph:kb"), &Graph::new()).unwrap();
        }
        let path = dir.path().join(SNAPSHOT_FILE);
        let mut bytes = fs::read(&path).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xFF;
        fs::write(&path, bytes).unwrap();

        let err = FileTripleStore::open(dir.path(), PersistentConfig::default()).unwrap_err();
        assert!(err.to_string().contains("CRC"));
    }
}
