//! Persistent storage backend.
//!
//! This module provides a durable [`TripleStore`](crate::storage::TripleStore)
//! with:
//! - One snapshot file per store directory holding every named graph
//! - Atomic replacement (write temp file, fsync, rename)
//! - CRC32 checksums for corruption detection
//!
//! # Layout
//!
//! ```text
//! <dir>/graphs.jtms
//!   [magic "JTMS"][version][len u32 LE][JSON { saved_at, graphs: [{ name, triples }] }][crc32 LE]
//! ```

mod codec;
mod store;

pub use store::FileTripleStore;

use std::path::Path;

use crate::error::{TmsError, TmsResult};

/// Configuration for persistent storage.
#[derive(Debug, Clone)]
pub struct PersistentConfig {
    /// Whether to fsync after every write (slower but safer).
    pub sync_on_write: bool,
    /// Largest snapshot body accepted on write and on load (bytes).
    pub max_snapshot_size: u64,
}

impl Default for PersistentConfig {
    fn default() -> Self {
        Self {
            sync_on_write: true,
            max_snapshot_size: 256 * 1024 * 1024, // 256 MB
        }
    }
}

impl PersistentConfig {
    /// Smallest accepted `max_snapshot_size`; an empty store needs a few
    /// hundred bytes.
    pub const MIN_SNAPSHOT_SIZE: u64 = 4 * 1024;

    /// Largest size the length prefix can express.
    pub const MAX_SNAPSHOT_SIZE: u64 = u32::MAX as u64;

    /// Checks the limits, returning the configuration unchanged.
    pub fn validate(self) -> TmsResult<Self> {
        if self.max_snapshot_size < Self::MIN_SNAPSHOT_SIZE {
            return Err(TmsError::config(format!(
                "max_snapshot_size must be at least {} bytes (got {})",
                Self::MIN_SNAPSHOT_SIZE,
                self.max_snapshot_size
            )));
        }
        if self.max_snapshot_size > Self::MAX_SNAPSHOT_SIZE {
            return Err(TmsError::config(format!(
                "max_snapshot_size must be at most {} bytes (got {})",
                Self::MAX_SNAPSHOT_SIZE,
                self.max_snapshot_size
            )));
        }
        Ok(self)
    }
}

/// Open or create a file-backed store at the given directory.
///
/// # Example
/// ```rust,ignore
/// use jtms::storage::persistent::open_store;
///
/// let store = open_store("./beliefs.jtms", None)?;
/// let tms = Tms::open(Arc::new(store), validator, enrichment, TmsConfig::default())?;
/// ```
pub fn open_store(
    path: impl AsRef<Path>,
    config: Option<PersistentConfig>,
) -> TmsResult<FileTripleStore> {
    let config = config.unwrap_or_default().validate()?;
    Ok(FileTripleStore::open(path, config)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(PersistentConfig::default().validate().is_ok());
    }

    #[test]
    fn test_snapshot_limit_bounds() {
        let tiny = PersistentConfig {
            max_snapshot_size: 16,
            ..PersistentConfig::default()
        };
        let err = tiny.validate().unwrap_err();
        assert!(err.to_string().contains("at least"));

        let huge = PersistentConfig {
            max_snapshot_size: u64::from(u32::MAX) + 1,
            ..PersistentConfig::default()
        };
        assert!(huge.validate().is_err());
    }

    #[test]
    fn test_open_store_rejects_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = PersistentConfig {
            max_snapshot_size: 0,
            ..PersistentConfig::default()
        };
        assert!(open_store(dir.path(), Some(config)).is_err());
        assert!(!dir.path().join("graphs.jtms").exists());
    }
}
